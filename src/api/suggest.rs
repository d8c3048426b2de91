/// Reply and caption generation endpoints
///
/// All generation is on demand and stateless: nothing returned here is
/// persisted. Publishing a comment reply goes straight to the provider.
use crate::{api::middleware, context::AppContext, error::DeskResult, sync::ReplyContext};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Build suggestion routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/suggest/reply", post(generate_reply))
        .route("/api/suggest/review", post(review_suggestions))
        .route("/api/suggest/caption", post(generate_caption))
        .route(
            "/api/social/comments/:comment_id/reply",
            post(publish_comment_reply),
        )
}

#[derive(Debug, Deserialize)]
struct ReplyRequest {
    text: String,
    #[serde(flatten)]
    context: ReplyContext,
}

#[derive(Debug, Serialize)]
struct ReplyResponse {
    reply: String,
}

/// Generate a single reply for a review or comment
async fn generate_reply(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Json(request): Json<ReplyRequest>,
) -> DeskResult<impl IntoResponse> {
    middleware::require_user(&headers)?;
    let reply = ctx.sync.generate_reply(&request.text, &request.context).await?;
    Ok(Json(ReplyResponse { reply }))
}

#[derive(Debug, Deserialize)]
struct ReviewSuggestionsRequest {
    review: String,
}

/// Generate three-tone suggestions for a review
async fn review_suggestions(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Json(request): Json<ReviewSuggestionsRequest>,
) -> DeskResult<impl IntoResponse> {
    middleware::require_user(&headers)?;
    let suggestions = ctx.sync.default_suggestions(&request.review).await?;
    Ok(Json(suggestions))
}

#[derive(Debug, Deserialize)]
struct CaptionRequest {
    #[serde(default)]
    keywords: String,
}

/// Generate a post caption from keywords
async fn generate_caption(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Json(request): Json<CaptionRequest>,
) -> DeskResult<impl IntoResponse> {
    middleware::require_user(&headers)?;
    let caption = ctx.sync.caption_from_keywords(&request.keywords).await?;
    Ok(Json(json!({ "caption": caption })))
}

#[derive(Debug, Deserialize)]
struct PublishReplyRequest {
    message: String,
}

/// Publish a reply under a provider comment
async fn publish_comment_reply(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Path(comment_id): Path<String>,
    Json(request): Json<PublishReplyRequest>,
) -> DeskResult<impl IntoResponse> {
    let user = middleware::require_user(&headers)?;
    ctx.sync
        .publish_comment_reply(&user, &comment_id, &request.message)
        .await?;
    Ok(Json(json!({ "published": true })))
}
