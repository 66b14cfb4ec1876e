//! Users-related HTTP API.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};

use crate::AppState;
use crate::database::Database;
use crate::dto::AssignSpecializationDto;
use crate::error::Result;
use crate::id::UserId;
use crate::model::{DomainError, User, Wallet};
use crate::router::Valid;

pub fn router() -> Router<AppState> {
    Router::new()
        // `GET /users` goes to `list`.
        .route("/", get(list))
        .route("/{user_id}", get(find).delete(delete))
        .route("/{user_id}/specialization", patch(assign))
        .route("/{user_id}/wallet", get(wallet))
}

async fn list(State(db): State<Database>) -> Json<Vec<User>> {
    Json(db.users().await)
}

async fn find(
    State(db): State<Database>,
    Path(user_id): Path<UserId>,
) -> Result<Json<User>> {
    Ok(Json(db.user(&user_id).await?))
}

/// Delete user. Its wallet goes with it.
async fn delete(
    State(db): State<Database>,
    Path(user_id): Path<UserId>,
) -> Result<StatusCode> {
    db.delete_user(&user_id).await?;

    tracing::info!(%user_id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn assign(
    State(db): State<Database>,
    Path(user_id): Path<UserId>,
    Valid(body): Valid<AssignSpecializationDto>,
) -> Result<Json<User>> {
    let specialization = body
        .specialization_id
        .filter(|id| !id.as_uuid().is_nil());

    Ok(Json(db.assign_specialization(&user_id, specialization).await?))
}

async fn wallet(
    State(db): State<Database>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Wallet>> {
    db.user(&user_id).await?;
    db.wallet_of(&user_id)
        .await
        .map(Json)
        .ok_or_else(|| DomainError::not_found("wallet", user_id).into())
}
