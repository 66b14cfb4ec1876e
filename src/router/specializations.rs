//! Specializations HTTP API.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::AppState;
use crate::database::Database;
use crate::dto::CreateSpecializationDto;
use crate::error::Result;
use crate::id::SpecializationId;
use crate::model::Specialization;
use crate::router::Valid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{specialization_id}", get(find).delete(delete))
}

async fn list(State(db): State<Database>) -> Json<Vec<Specialization>> {
    Json(db.specializations().await)
}

async fn create(
    State(state): State<AppState>,
    Valid(body): Valid<CreateSpecializationDto>,
) -> Result<(StatusCode, Json<Specialization>)> {
    let specialization =
        Specialization::new(state.ids.as_ref(), &body.major_code, &body.name)?;
    let specialization = state.db.insert_specialization(specialization).await?;

    tracing::info!(
        specialization_id = %specialization.id(),
        major_code = specialization.major_code(),
        "specialization created"
    );
    Ok((StatusCode::CREATED, Json(specialization)))
}

async fn find(
    State(db): State<Database>,
    Path(id): Path<SpecializationId>,
) -> Result<Json<Specialization>> {
    Ok(Json(db.specialization(&id).await?))
}

async fn delete(
    State(db): State<Database>,
    Path(id): Path<SpecializationId>,
) -> Result<StatusCode> {
    db.delete_specialization(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
