//! HTTP handlers.

pub mod activities;
pub mod login;
pub mod products;
pub mod semesters;
pub mod specializations;
pub mod staff;
pub mod status;
pub mod users;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::ServerError;
use crate::error::Result;

/// JSON body checked against its `validator` rules before reaching the
/// handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct Valid<T>(pub T);

impl<T, S> FromRequest<S> for Valid<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Valid(value))
    }
}

/// Run CPU-heavy work (password hashing) off the async executor.
async fn blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| ServerError::Internal {
            details: "blocking task failed".into(),
            source: Some(Box::new(err)),
        })
}

#[cfg(test)]
pub fn state() -> crate::AppState {
    use std::sync::Arc;

    use crate::auth::SessionIssuer;
    use crate::clock::SystemClock;
    use crate::config::{Argon2, Configuration};
    use crate::crypto::PasswordManager;
    use crate::database::Database;
    use crate::id::SequentialIds;

    let config = Configuration::default();
    let clock: Arc<dyn crate::clock::Clock> = Arc::new(SystemClock);

    crate::AppState {
        sessions: SessionIssuer::new(
            Arc::clone(&clock),
            config.session.lifetime,
        ),
        config: Arc::new(config),
        db: Database::with_clock(Arc::clone(&clock)),
        clock,
        crypto: Arc::new(PasswordManager::new(Some(Argon2::fast())).unwrap()),
        ids: Arc::new(SequentialIds::new()),
        metrics: None,
    }
}

/// Collect a response body and deserialize it.
#[cfg(test)]
pub async fn body<T: DeserializeOwned>(
    response: axum::http::Response<axum::body::Body>,
) -> T {
    use http_body_util::BodyExt;

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
