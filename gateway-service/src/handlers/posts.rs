use crate::errors::{FetchTarget, GatewayError};
use crate::models::{find_post, parse_post_id, take_first, PAGE_SIZE};
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use metrics::counter;
use serde::Serialize;
use serde_json::Value;
use service_core::observability::extract_request_id;

pub const POSTS_SAVED: &str = "Les posts ont été sauvegardés avec succès.";

#[derive(Debug, Serialize)]
pub struct CreatePostsResponse {
    pub message: &'static str,
    pub posts: Vec<Value>,
}

/// `POST /posts`: snapshot the first ten upstream posts to the posts file.
pub async fn create_posts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CreatePostsResponse>, GatewayError> {
    let request_id = extract_request_id(&headers);

    let posts = state
        .upstream
        .list_posts(request_id.as_deref())
        .await
        .map_err(|e| GatewayError::Upstream(FetchTarget::Posts, e))?;
    let posts = take_first(posts, PAGE_SIZE);

    if let Err(e) = state.posts.save(&posts).await {
        counter!("posts_snapshots_total", "outcome" => "error").increment(1);
        return Err(e);
    }
    counter!("posts_snapshots_total", "outcome" => "success").increment(1);

    Ok(Json(CreatePostsResponse {
        message: POSTS_SAVED,
        posts,
    }))
}

/// `GET /posts`: the persisted file content, verbatim.
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Value>, GatewayError> {
    let posts = state.posts.load().await?;
    Ok(Json(posts))
}

/// `GET /posts/:postId`: first persisted post with a strictly equal numeric id.
///
/// A non-numeric id can never match and therefore yields 404, not 400.
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<Value>, GatewayError> {
    let posts = state.posts.load_posts().await?;

    parse_post_id(&post_id)
        .and_then(|id| find_post(&posts, id))
        .cloned()
        .map(Json)
        .ok_or(GatewayError::PostNotFound(post_id))
}
