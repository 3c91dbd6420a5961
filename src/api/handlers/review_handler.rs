//! Review handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::extractors::{ApiPath, ApiQuery, ValidatedJson};
use crate::api::middleware::{require_auth, CurrentUser};
use crate::api::AppState;
use crate::config::{MAX_RATING, MIN_RATING};
use crate::domain::{Review, ReviewChanges, ReviewDetails};
use crate::errors::AppResult;
use crate::types::{Created, MessageResponse};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    #[schema(example = 2)]
    pub reviewed_user_id: i32,
    #[validate(range(min = MIN_RATING, max = MAX_RATING, message = "Rating must be between 1 and 5"))]
    #[schema(example = 5, minimum = 1, maximum = 5)]
    pub rating: i32,
    #[schema(example = "Great drill, returned on time")]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReviewRequest {
    #[validate(range(min = MIN_RATING, max = MAX_RATING, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReviewFilter {
    /// Only reviews about this user
    pub reviewed_user_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCreatedResponse {
    pub message: String,
    pub review_id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewUpdatedResponse {
    pub message: String,
    pub review: Review,
}

/// Routes under `/api/reviews`; reads are public
pub fn review_routes(state: AppState) -> Router<AppState> {
    let protected = require_auth(
        Router::new()
            .route("/", post(create_review))
            .route("/:id", put(update_review).delete(delete_review)),
        state,
    );

    Router::new()
        .route("/", get(list_reviews))
        .route("/reviewed/:user_id", get(reviews_of_user))
        .merge(protected)
}

/// Review another user
#[utoipa::path(
    post,
    path = "/api/reviews",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ReviewCreatedResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Already reviewed this user")
    )
)]
pub async fn create_review(
    State(state): State<AppState>,
    current: CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreateReviewRequest>,
) -> AppResult<Created<ReviewCreatedResponse>> {
    let review = state
        .services
        .reviews()
        .create_review(
            current.id,
            payload.reviewed_user_id,
            payload.rating,
            payload.comment,
        )
        .await?;

    Ok(Created(ReviewCreatedResponse {
        message: "Review created successfully".to_string(),
        review_id: review.id,
    }))
}

#[utoipa::path(
    get,
    path = "/api/reviews",
    tag = "Reviews",
    params(ReviewFilter),
    responses((status = 200, description = "Reviews with both parties", body = [ReviewDetails]))
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ReviewFilter>,
) -> AppResult<Json<Vec<ReviewDetails>>> {
    let reviews = state
        .services
        .reviews()
        .list_reviews(filter.reviewed_user_id)
        .await?;
    Ok(Json(reviews))
}

/// Reviews a user has received
#[utoipa::path(
    get,
    path = "/api/reviews/reviewed/{user_id}",
    tag = "Reviews",
    params(("user_id" = i32, Path, description = "Reviewed user ID")),
    responses(
        (status = 200, description = "Reviews received", body = [ReviewDetails]),
        (status = 404, description = "User not found")
    )
)]
pub async fn reviews_of_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i32>,
) -> AppResult<Json<Vec<ReviewDetails>>> {
    Ok(Json(state.services.reviews().reviews_of(user_id).await?))
}

/// Update a review the caller wrote
#[utoipa::path(
    put,
    path = "/api/reviews/{id}",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Review ID")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ReviewUpdatedResponse),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn update_review(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateReviewRequest>,
) -> AppResult<Json<ReviewUpdatedResponse>> {
    let changes = ReviewChanges {
        rating: payload.rating,
        comment: payload.comment,
    };
    let review = state
        .services
        .reviews()
        .update_review(current.id, id, changes)
        .await?;

    Ok(Json(ReviewUpdatedResponse {
        message: "Review updated successfully".to_string(),
        review,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/reviews/{id}",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted", body = MessageResponse),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn delete_review(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.services.reviews().delete_review(current.id, id).await?;
    Ok(Json(MessageResponse::new("Review deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        let request = |rating| CreateReviewRequest {
            reviewed_user_id: 2,
            rating,
            comment: None,
        };
        assert!(request(1).validate().is_ok());
        assert!(request(5).validate().is_ok());
        assert!(request(0).validate().is_err());
        assert!(request(6).validate().is_err());
    }

    #[test]
    fn test_update_without_rating_is_valid() {
        let request = UpdateReviewRequest {
            rating: None,
            comment: Some("Changed my mind".to_string()),
        };
        assert!(request.validate().is_ok());
    }
}
