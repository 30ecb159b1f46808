use crate::errors::{FetchTarget, GatewayError};
use crate::models::{take_first, user_id_matches, PAGE_SIZE};
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use service_core::observability::extract_request_id;

#[derive(Debug, Serialize)]
pub struct UserPostsResponse {
    pub user: Value,
    pub posts: Vec<Value>,
}

/// `GET /users`: the first ten upstream users, in upstream order.
pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Value>>, GatewayError> {
    let request_id = extract_request_id(&headers);

    let users = state
        .upstream
        .list_users(request_id.as_deref())
        .await
        .map_err(|e| GatewayError::Upstream(FetchTarget::Users, e))?;

    Ok(Json(take_first(users, PAGE_SIZE)))
}

/// `GET /users/:id/posts`: the user plus every upstream post whose `userId`
/// loosely matches the path id. Any upstream failure, a 404 on the user
/// included, is reported the same way.
pub async fn get_user_posts(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<UserPostsResponse>, GatewayError> {
    let request_id = extract_request_id(&headers);
    let upstream_error =
        |e: reqwest::Error| GatewayError::Upstream(FetchTarget::UserWithPosts, e);

    let user = state
        .upstream
        .get_user(&id, request_id.as_deref())
        .await
        .map_err(upstream_error)?;

    let posts = state
        .upstream
        .list_posts(request_id.as_deref())
        .await
        .map_err(upstream_error)?
        .into_iter()
        .filter(|post| user_id_matches(post, &id))
        .collect::<Vec<_>>();

    tracing::debug!(user_id = %id, posts = posts.len(), "Resolved user posts");

    Ok(Json(UserPostsResponse { user, posts }))
}
