/// Photo upload and annotation endpoints
use crate::{
    api::middleware,
    context::AppContext,
    error::{DeskError, DeskResult},
};
use axum::{
    extract::{Multipart, Path, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

/// Build photo routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/photos", post(upload_photo))
        .route("/api/photos/annotate", post(annotate_image))
        .route("/api/photos/:photo_id/objects", get(detected_objects))
}

/// Upload a photo and annotate it
///
/// Multipart form with a `title` text field and a `file` part. The photo is
/// stored in the media library, run through object detection and handed a
/// draft caption.
async fn upload_photo(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> DeskResult<impl IntoResponse> {
    let user = middleware::require_user(&headers)?;

    let mut title = None;
    let mut file_name = None;
    let mut data = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DeskError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("title") => {
                title = Some(field.text().await.map_err(|e| {
                    DeskError::Validation(format!("Invalid title field: {}", e))
                })?);
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

    let title = title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| DeskError::Validation("title field is required".to_string()))?;
    let data =
        data.ok_or_else(|| DeskError::Validation("file field is required".to_string()))?;
    let file_name = file_name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("{}.jpg", title.replace(' ', "-")));

    let outcome = ctx.sync.upload_photo(&user, &title, &file_name, data).await?;
    Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
struct AnnotateRequest {
    image_url: String,
}

/// Run object detection against an arbitrary image URL
///
/// Nothing is persisted; useful to re-annotate an already stored photo.
async fn annotate_image(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Json(request): Json<AnnotateRequest>,
) -> DeskResult<impl IntoResponse> {
    middleware::require_user(&headers)?;
    let annotations = ctx.sync.annotate_image(&request.image_url).await?;
    Ok(Json(annotations))
}

/// Stored detection rows of a photo
async fn detected_objects(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Path(photo_id): Path<i64>,
) -> DeskResult<impl IntoResponse> {
    middleware::require_user(&headers)?;
    let objects = ctx.photos.list_detected_objects(photo_id).await?;
    Ok(Json(objects))
}
