/// Media library endpoints
use crate::{
    api::middleware,
    context::AppContext,
    error::{DeskError, DeskResult},
};
use axum::{
    extract::{Multipart, Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

/// Build media library routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/library", get(list_library))
        .route("/api/library", post(upload_file))
        .route("/api/library/*path", delete(delete_file))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    path: String,
}

/// List files and folders under a library path
async fn list_library(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> DeskResult<impl IntoResponse> {
    middleware::require_user(&headers)?;
    let listing = ctx.library.list(&query.path).await?;
    Ok(Json(listing))
}

/// Upload a file into the library
///
/// Multipart form with an optional `path` folder prefix and a `file` part
/// whose filename becomes the object name.
async fn upload_file(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> DeskResult<impl IntoResponse> {
    middleware::require_user(&headers)?;

    let mut prefix = String::new();
    let mut file_name = None;
    let mut data = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DeskError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("path") => {
                prefix = field.text().await.map_err(|e| {
                    DeskError::Validation(format!("Invalid path field: {}", e))
                })?;
            }
            Some("file") => {
                file_name = field.file_name().map(String::from);
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| {
                            DeskError::Validation(format!("Invalid file field: {}", e))
                        })?
                        .to_vec(),
                );
            }
            _ => {}
        }
    }

    let file_name = file_name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| DeskError::Validation("file field is required".to_string()))?;
    let data =
        data.ok_or_else(|| DeskError::Validation("file field is required".to_string()))?;

    let path = if prefix.is_empty() {
        file_name
    } else {
        format!("{}/{}", prefix.trim_end_matches('/'), file_name)
    };
    let url = ctx.library.store(&path, data).await?;

    Ok(Json(json!({ "path": path, "url": url })))
}

/// Delete a library object; the path segment is URL-encoded
async fn delete_file(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Path(path): Path<String>,
) -> DeskResult<impl IntoResponse> {
    middleware::require_user(&headers)?;

    let decoded = urlencoding::decode(&path)
        .map_err(|e| DeskError::Validation(format!("Invalid path encoding: {}", e)))?;
    ctx.library.delete(&decoded).await?;

    Ok(Json(json!({ "deleted": decoded })))
}
