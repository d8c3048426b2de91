/// API routes and handlers
pub mod library;
pub mod middleware;
pub mod photos;
pub mod suggest;
pub mod sync;

use crate::context::AppContext;
use axum::Router;

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(sync::routes())
        .merge(suggest::routes())
        .merge(photos::routes())
        .merge(library::routes())
}
