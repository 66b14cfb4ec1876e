//! Semesters HTTP API.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::AppState;
use crate::database::Database;
use crate::dto::SemesterDto;
use crate::error::Result;
use crate::id::SemesterId;
use crate::model::{DomainError, Semester};
use crate::router::Valid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/active", get(active))
        .route("/{semester_id}", get(find).put(update).delete(delete))
        .route("/{semester_id}/activate", post(activate))
}

async fn list(State(db): State<Database>) -> Json<Vec<Semester>> {
    Json(db.semesters().await)
}

async fn active(State(db): State<Database>) -> Result<Json<Semester>> {
    db.active_semester()
        .await
        .map(Json)
        .ok_or_else(|| DomainError::not_found("semester", "active").into())
}

async fn create(
    State(state): State<AppState>,
    Valid(body): Valid<SemesterDto>,
) -> Result<(StatusCode, Json<Semester>)> {
    let semester = Semester::new(state.ids.as_ref(), &body)?;
    let semester = state.db.insert_semester(semester).await?;

    tracing::info!(semester_id = %semester.id(), name = semester.name(), "semester created");
    Ok((StatusCode::CREATED, Json(semester)))
}

async fn find(
    State(db): State<Database>,
    Path(id): Path<SemesterId>,
) -> Result<Json<Semester>> {
    Ok(Json(db.semester(&id).await?))
}

async fn update(
    State(db): State<Database>,
    Path(id): Path<SemesterId>,
    Valid(body): Valid<SemesterDto>,
) -> Result<Json<Semester>> {
    Ok(Json(db.update_semester(&id, &body).await?))
}

async fn delete(
    State(db): State<Database>,
    Path(id): Path<SemesterId>,
) -> Result<StatusCode> {
    db.delete_semester(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn activate(
    State(db): State<Database>,
    Path(id): Path<SemesterId>,
) -> Result<Json<Semester>> {
    Ok(Json(db.activate_semester(&id).await?))
}
