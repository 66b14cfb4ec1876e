//! Rewards is the back-end of a campus rewards program: students earn
//! tokens from blockchain activities and redeem them for products.

#![forbid(unsafe_code)]

mod auth;
pub mod clock;
mod crypto;
mod database;
pub mod dto;
pub mod error;
pub mod id;
pub mod model;
mod router;
pub mod telemetry;

pub mod config;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{Method, StatusCode, header};
use axum::routing::get;
use axum::{Router, middleware as AxumMiddleware};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::LatencyUnit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::sensitive_headers::SetSensitiveHeadersLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};

use crate::model::{Role, User};

pub use error::ServerError;

const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

/// MUST NEVER be used in production.
#[cfg(test)]
pub async fn make_request(
    app: Router,
    method: Method,
    path: &str,
    body: String,
) -> axum::http::Response<axum::body::Body> {
    use axum::extract::Request;
    use tower::util::ServiceExt;

    app.oneshot(
        Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// State sharing between routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Configuration>,
    pub clock: Arc<dyn clock::Clock>,
    pub db: database::Database,
    pub crypto: Arc<crypto::PasswordManager>,
    pub ids: Arc<dyn id::IdGenerator>,
    pub sessions: auth::SessionIssuer,
    pub metrics: Option<PrometheusHandle>,
}

/// Create router.
pub fn app(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        // Add high level tracing/logging to all requests.
        .layer(
            TraceLayer::new_for_http()
                .on_body_chunk(|chunk: &Bytes, latency: Duration, _span: &tracing::Span| {
                    tracing::trace!(size_bytes = chunk.len(), latency = ?latency, "sending body chunk")
                })
                .make_span_with(DefaultMakeSpan::new().include_headers(true).level(tracing::Level::INFO))
                .on_request(DefaultOnRequest::new())
                .on_response(DefaultOnResponse::new().include_headers(true).latency_unit(LatencyUnit::Micros)),
        )
        // Set a timeout.
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, Duration::from_secs(10)))
        // Remove sensitive headers from trace.
        .layer(SetSensitiveHeadersLayer::new([header::AUTHORIZATION, header::COOKIE]))
        // Add CORS preflight support.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS])
                .allow_headers(Any),
        );

    Router::new()
        // `GET /status.json` goes to `status`.
        .route("/status.json", get(router::status::status))
        .route("/metrics", get(telemetry::metrics))
        // `POST /login` goes to `login`.
        .route("/login", axum::routing::post(router::login::handler))
        .route("/staff", axum::routing::post(router::staff::handler))
        .nest("/users", router::users::router())
        .nest("/specializations", router::specializations::router())
        .nest("/activities", router::activities::router())
        .nest("/semesters", router::semesters::router())
        .nest("/products", router::products::router())
        .with_state(state)
        .route_layer(AxumMiddleware::from_fn(telemetry::track))
        .layer(middleware)
}

/// Initialize the application state.
pub async fn initialize_state() -> Result<AppState, Box<dyn std::error::Error>>
{
    // read configuration file. let it in memory.
    let mut config = config::Configuration::default();
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        config = config.path(path.into());
    }
    let config = config.read()?;

    let crypto = Arc::new(crypto::PasswordManager::new(config.argon2.clone())?);
    let clock: Arc<dyn clock::Clock> = Arc::new(clock::SystemClock);
    let sessions =
        auth::SessionIssuer::new(Arc::clone(&clock), config.session.lifetime);

    let state = AppState {
        db: database::Database::with_clock(Arc::clone(&clock)),
        clock,
        crypto,
        ids: Arc::new(id::RandomIds),
        sessions,
        metrics: None,
        config,
    };
    seed_admin(&state).await?;

    Ok(state)
}

/// Create the configured administrator when no account uses its email.
async fn seed_admin(state: &AppState) -> Result<(), ServerError> {
    let Some(admin) = &state.config.admin else {
        tracing::warn!("missing `admin` entry on `config.yaml` file");
        return Ok(());
    };

    let email = model::normalize_email(&admin.email)?;
    if state.db.user_by_email(&email).await.is_some() {
        return Ok(());
    }

    let hash = state.crypto.hash_password(&admin.password)?;
    let user = User::new(
        state.ids.as_ref(),
        state.clock.as_ref(),
        &email,
        &admin.full_name,
        Role::Admin,
        hash,
    )?;
    let (user, _) = state.db.insert_user(state.ids.as_ref(), user).await?;

    tracing::info!(user_id = %user.id(), "administrator account created");
    Ok(())
}
