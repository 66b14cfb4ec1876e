//! Blockchain activities HTTP API.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::AppState;
use crate::database::Database;
use crate::dto::{UpdateActivityDto, UserRefDto};
use crate::error::Result;
use crate::id::ActivityId;
use crate::model::{BlockchainActivity, Wallet};
use crate::router::Valid;

#[derive(Debug, Default, Deserialize)]
pub struct Filter {
    /// Only list activities visible to students.
    #[serde(default)]
    active: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{activity_id}", get(find).put(update).delete(delete))
        // `POST /activities/{id}/rewards` credits a student's wallet.
        .route("/{activity_id}/rewards", post(reward))
}

async fn list(
    State(db): State<Database>,
    Query(filter): Query<Filter>,
) -> Json<Vec<BlockchainActivity>> {
    Json(db.activities(filter.active).await)
}

async fn create(
    State(state): State<AppState>,
    Valid(body): Valid<UpdateActivityDto>,
) -> Result<(StatusCode, Json<BlockchainActivity>)> {
    let activity = BlockchainActivity::new(state.ids.as_ref(), &body)?;
    let activity = state.db.insert_activity(activity).await?;

    tracing::info!(activity_id = %activity.id(), "activity created");
    Ok((StatusCode::CREATED, Json(activity)))
}

async fn find(
    State(db): State<Database>,
    Path(id): Path<ActivityId>,
) -> Result<Json<BlockchainActivity>> {
    Ok(Json(db.activity(&id).await?))
}

async fn update(
    State(db): State<Database>,
    Path(id): Path<ActivityId>,
    Valid(body): Valid<UpdateActivityDto>,
) -> Result<Json<BlockchainActivity>> {
    Ok(Json(db.update_activity(&id, &body).await?))
}

async fn delete(
    State(db): State<Database>,
    Path(id): Path<ActivityId>,
) -> Result<StatusCode> {
    db.delete_activity(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reward(
    State(db): State<Database>,
    Path(id): Path<ActivityId>,
    Valid(body): Valid<UserRefDto>,
) -> Result<Json<Wallet>> {
    Ok(Json(db.grant_reward(&id, &body.user_id).await?))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::error::ResponseError;
    use crate::model::{Role, User};
    use crate::*;

    async fn create_activity(app: Router, name: &str, reward: &str, active: bool) -> BlockchainActivity {
        let response = make_request(
            app,
            Method::POST,
            "/activities",
            json!({
                "name": name,
                "description": "",
                "rewardAmount": reward,
                "isActive": active,
            })
            .to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        router::body(response).await
    }

    async fn student(state: &AppState) -> User {
        let user = User::new(
            state.ids.as_ref(),
            state.clock.as_ref(),
            "ada@school.edu",
            "Ada",
            Role::Student,
            String::new(),
        )
        .unwrap();
        state.db.insert_user(state.ids.as_ref(), user).await.unwrap().0
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let app = app(router::state());
        let quiz = create_activity(app.clone(), "Quiz", "2.50", true).await;
        create_activity(app.clone(), "Archived", "1", false).await;

        assert_eq!(quiz.reward_amount(), Decimal::new(250, 2));

        let response =
            make_request(app.clone(), Method::GET, "/activities", String::default())
                .await;
        let all: Vec<BlockchainActivity> = router::body(response).await;
        assert_eq!(all.len(), 2);

        let response = make_request(
            app,
            Method::GET,
            "/activities?active=true",
            String::default(),
        )
        .await;
        let active: Vec<BlockchainActivity> = router::body(response).await;
        assert_eq!(active, vec![quiz]);
    }

    #[tokio::test]
    async fn test_negative_reward() {
        let app = app(router::state());

        let response = make_request(
            app,
            Method::POST,
            "/activities",
            json!({
                "name": "Quiz",
                "description": "",
                "rewardAmount": "-1",
                "isActive": true,
            })
            .to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: ResponseError = router::body(response).await;
        assert_eq!(body.errors.unwrap()[0].field, "rewardAmount");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let app = app(router::state());
        let quiz = create_activity(app.clone(), "Quiz", "2", true).await;
        let path = format!("/activities/{}", quiz.id());

        let response = make_request(
            app.clone(),
            Method::PUT,
            &path,
            json!({
                "name": "Final quiz",
                "description": "Last one.",
                "rewardAmount": "5",
                "isActive": false,
            })
            .to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated: BlockchainActivity = router::body(response).await;
        assert_eq!(updated.name(), "Final quiz");
        assert!(!updated.is_active());

        let response =
            make_request(app.clone(), Method::DELETE, &path, String::default())
                .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response =
            make_request(app, Method::GET, &path, String::default()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reward_handler() {
        let state = router::state();
        let app = app(state.clone());
        let user = student(&state).await;
        let quiz = create_activity(app.clone(), "Quiz", "2.5", true).await;
        let archived = create_activity(app.clone(), "Archived", "1", false).await;

        let body = json!({ "userId": user.id() }).to_string();
        let path = format!("/activities/{}/rewards", quiz.id());
        for _ in 0..2 {
            let response =
                make_request(app.clone(), Method::POST, &path, body.clone()).await;
            assert_eq!(response.status(), StatusCode::OK);
        }
        let wallet = state.db.wallet_of(&user.id()).await.unwrap();
        assert_eq!(wallet.balance(), Decimal::new(50, 1));

        let path = format!("/activities/{}/rewards", archived.id());
        let response = make_request(app, Method::POST, &path, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reward_overflow_is_rejected() {
        let state = router::state();
        let app = app(state.clone());
        let user = student(&state).await;
        let jackpot = create_activity(
            app.clone(),
            "Jackpot",
            "79228162514264337593543950335",
            true,
        )
        .await;
        assert_eq!(jackpot.reward_amount(), Decimal::MAX);

        let body = json!({ "userId": user.id() }).to_string();
        let path = format!("/activities/{}/rewards", jackpot.id());
        let response =
            make_request(app.clone(), Method::POST, &path, body.clone()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = make_request(app, Method::POST, &path, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ResponseError = router::body(response).await;
        assert_eq!(error.errors.unwrap()[0].field, "balance");

        let wallet = state.db.wallet_of(&user.id()).await.unwrap();
        assert_eq!(wallet.balance(), Decimal::MAX);
    }
}
