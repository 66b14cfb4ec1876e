//! Product catalog HTTP API.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::AppState;
use crate::database::Database;
use crate::dto::{ProductDto, UserRefDto};
use crate::error::Result;
use crate::id::ProductId;
use crate::model::{Product, Wallet};
use crate::router::Valid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{product_id}", get(find).put(update).delete(delete))
        .route("/{product_id}/redemptions", post(redeem))
}

async fn list(State(db): State<Database>) -> Json<Vec<Product>> {
    Json(db.products().await)
}

async fn create(
    State(state): State<AppState>,
    Valid(body): Valid<ProductDto>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = Product::new(state.ids.as_ref(), &body)?;
    let product = state.db.insert_product(product).await?;

    tracing::info!(product_id = %product.id(), "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

async fn find(
    State(db): State<Database>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    Ok(Json(db.product(&id).await?))
}

async fn update(
    State(db): State<Database>,
    Path(id): Path<ProductId>,
    Valid(body): Valid<ProductDto>,
) -> Result<Json<Product>> {
    Ok(Json(db.update_product(&id, &body).await?))
}

async fn delete(
    State(db): State<Database>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    db.delete_product(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Exchange one unit of a product for tokens.
async fn redeem(
    State(db): State<Database>,
    Path(id): Path<ProductId>,
    Valid(body): Valid<UserRefDto>,
) -> Result<Json<Wallet>> {
    Ok(Json(db.redeem_product(&id, &body.user_id).await?))
}
