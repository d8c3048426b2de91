/// Provider sync and mirrored-data endpoints
use crate::{
    api::middleware,
    context::AppContext,
    credentials::{Provider, StoredCredential},
    error::{DeskError, DeskResult},
};
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

/// Posts shown on the social overview
const RECENT_POSTS_LIMIT: i64 = 3;
/// Comments shown under each post on the overview
const RECENT_COMMENTS_LIMIT: i64 = 3;

/// Build sync routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/sync/listing", post(sync_listing))
        .route("/api/sync/social", post(sync_social))
        .route("/api/dashboard", get(dashboard))
        .route("/api/social/posts", get(recent_posts))
        .route("/api/social/posts/:post_id/comments", get(post_comments))
        .route("/api/locations/:location_id/reviews", get(location_reviews))
        .route("/api/locations/:location_id/services", get(location_services))
        .route("/api/credentials", post(connect_provider))
}

#[derive(Debug, Deserialize)]
struct ConnectProviderRequest {
    provider: Provider,
    access_token: String,
    #[serde(default)]
    refresh_token: String,
    #[serde(default)]
    account_id: String,
}

/// Store the OAuth tokens the session layer obtained for a provider
async fn connect_provider(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Json(request): Json<ConnectProviderRequest>,
) -> DeskResult<impl IntoResponse> {
    let user = middleware::require_user(&headers)?;

    if request.access_token.is_empty() {
        return Err(DeskError::Validation(
            "access_token cannot be empty".to_string(),
        ));
    }

    ctx.credentials
        .put(&StoredCredential {
            user,
            provider: request.provider,
            access_token: request.access_token,
            refresh_token: request.refresh_token,
            account_id: request.account_id,
        })
        .await?;

    Ok(Json(serde_json::json!({ "connected": request.provider })))
}

/// Pull the listing and its reviews from the provider and reconcile
async fn sync_listing(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
) -> DeskResult<impl IntoResponse> {
    let user = middleware::require_user(&headers)?;
    let outcome = ctx.sync.sync_listing_and_reviews(&user).await?;
    Ok(Json(outcome))
}

/// Pull recent posts and comments from the social provider and reconcile
async fn sync_social(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
) -> DeskResult<impl IntoResponse> {
    let user = middleware::require_user(&headers)?;
    let synced = ctx.sync.sync_social_media(&user).await?;
    Ok(Json(synced))
}

/// Newest mirrored records for the landing view
async fn dashboard(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
) -> DeskResult<impl IntoResponse> {
    let user = middleware::require_user(&headers)?;
    let snapshot = ctx.sync.dashboard_snapshot(&user).await?;
    Ok(Json(snapshot))
}

/// Recent mirrored posts with their newest comments
async fn recent_posts(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
) -> DeskResult<impl IntoResponse> {
    let user = middleware::require_user(&headers)?;
    let posts = ctx
        .sync
        .recent_posts_with_comments(&user, RECENT_POSTS_LIMIT, RECENT_COMMENTS_LIMIT)
        .await?;
    Ok(Json(posts))
}

#[derive(Debug, Deserialize)]
struct CommentsQuery {
    #[serde(default = "default_comment_limit")]
    limit: i64,
    #[serde(default)]
    offset: i64,
}

fn default_comment_limit() -> i64 {
    RECENT_COMMENTS_LIMIT
}

/// Paged comments of one mirrored post, newest first
async fn post_comments(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
    Query(query): Query<CommentsQuery>,
) -> DeskResult<impl IntoResponse> {
    middleware::require_user(&headers)?;

    if query.limit < 1 {
        return Err(DeskError::Validation("limit must be positive".to_string()));
    }

    let comments = ctx
        .sync
        .comments_page(&post_id, query.limit, query.offset.max(0))
        .await?;
    Ok(Json(comments))
}

/// Service ids linked to a location
async fn location_services(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Path(location_id): Path<String>,
) -> DeskResult<impl IntoResponse> {
    middleware::require_user(&headers)?;

    if ctx.listings.get_location(&location_id).await?.is_none() {
        return Err(DeskError::NotFound(format!(
            "No such location: {}",
            location_id
        )));
    }

    let services = ctx.listings.linked_service_ids(&location_id).await?;
    Ok(Json(services))
}

/// Mirrored reviews of a location, newest first
async fn location_reviews(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Path(location_id): Path<String>,
) -> DeskResult<impl IntoResponse> {
    middleware::require_user(&headers)?;
    let reviews = ctx.reviews.list_for_location(&location_id).await?;
    Ok(Json(reviews))
}
