//! Staff account provisioning.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use zeroize::Zeroizing;

use crate::AppState;
use crate::dto::CreateStaffDto;
use crate::error::Result;
use crate::model::{DomainError, Role, User, normalize_email};
use crate::router::{Valid, blocking};

/// Handler to create a staff account. The response never carries the
/// password, in any form.
pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<CreateStaffDto>,
) -> Result<(StatusCode, Json<User>)> {
    let email = normalize_email(&body.email)?;
    if state.db.user_by_email(&email).await.is_some() {
        return Err(DomainError::conflict("user", "email", email).into());
    }

    let crypto = Arc::clone(&state.crypto);
    let password = Zeroizing::new(body.password.clone());
    let hash =
        blocking(move || crypto.hash_password(password.as_bytes())).await??;

    let user = User::new(
        state.ids.as_ref(),
        state.clock.as_ref(),
        &email,
        &body.full_name,
        Role::Staff,
        hash,
    )?;
    let (user, wallet) = state.db.insert_user(state.ids.as_ref(), user).await?;

    tracing::info!(user_id = %user.id(), wallet_id = %wallet.id(), "staff account created");
    Ok((StatusCode::CREATED, Json(user)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use serde_json::json;

    use super::*;
    use crate::*;

    fn request() -> String {
        json!({
            "email": "grace@school.edu",
            "fullName": "Grace Hopper",
            "password": "C0b0l-is-fine",
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_create_staff_handler() {
        let state = router::state();
        let app = app(state.clone());

        let response =
            make_request(app, Method::POST, "/staff", request()).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!text.contains("C0b0l-is-fine"));
        assert!(!text.contains("argon2"));
        assert!(!text.contains("password"));

        let user: User = serde_json::from_str(&text).unwrap();
        assert_eq!(user.role(), Role::Staff);
        assert_eq!(user.full_name(), "Grace Hopper");

        let stored = state.db.user(&user.id()).await.unwrap();
        assert!(stored.password_hash().starts_with("$argon2id$"));
        assert!(state.db.wallet_of(&user.id()).await.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_staff_conflicts() {
        let app = app(router::state());

        let response =
            make_request(app.clone(), Method::POST, "/staff", request()).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = make_request(app, Method::POST, "/staff", request()).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_weak_staff_password() {
        let app = app(router::state());

        let response = make_request(
            app,
            Method::POST,
            "/staff",
            json!({
                "email": "grace@school.edu",
                "fullName": "Grace Hopper",
                "password": "short",
            })
            .to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
