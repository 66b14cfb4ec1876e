//! Public instance status.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::config::Configuration;

/// Structured configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct Status {
    version: String,
    name: String,
    url: Option<String>,
}

/// Public server status (configuration).
pub async fn status(State(config): State<Arc<Configuration>>) -> Json<Status> {
    Json(Status {
        version: env!("CARGO_PKG_VERSION").into(),
        name: if config.name.is_empty() {
            env!("CARGO_CRATE_NAME").into()
        } else {
            config.name.clone()
        },
        url: Some(config.url.clone()).filter(|url| !url.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::*;

    #[tokio::test]
    async fn test_status() {
        let app = app(router::state());

        let response =
            make_request(app, Method::GET, "/status.json", String::default())
                .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Status = router::body(response).await;
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(body.name, "rewards");
        assert!(body.url.is_none());
    }
}
