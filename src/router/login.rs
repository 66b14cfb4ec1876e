//! Session opening.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use zeroize::Zeroizing;

use crate::AppState;
use crate::dto::{AuthResponse, LoginDto};
use crate::error::Result;
use crate::model::normalize_email;
use crate::router::{Valid, blocking};

/// Handler to log in with email and password.
///
/// Unknown emails and wrong passwords are answered identically, and both
/// pay for one password verification.
pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<LoginDto>,
) -> Result<Json<AuthResponse>> {
    let email = normalize_email(&body.email)?;
    let user = state.db.user_by_email(&email).await;
    let hash = match &user {
        Some(user) => user.password_hash().to_owned(),
        None => {
            tracing::debug!("login attempt on unknown email");
            state.crypto.decoy_hash().to_owned()
        },
    };

    let crypto = Arc::clone(&state.crypto);
    let password = Zeroizing::new(body.password.clone());
    blocking(move || crypto.verify_password(password.as_bytes(), &hash))
        .await??;

    let Some(user) = user else {
        return Err(state.crypto.rejection().into());
    };

    let wallet = state.db.wallet_of(&user.id()).await;
    let response = state.sessions.issue(user, wallet)?;

    tracing::info!(user_id = %response.user.id(), "user logged in");
    Ok(Json(response))
}
