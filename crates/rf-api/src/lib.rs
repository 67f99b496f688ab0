//! # rf-api
//!
//! The web routing and orchestration layer for Rusty-Forum.

pub mod error;
pub mod handlers;
pub mod middleware;

use actix_web::web;
use tracing::debug;

pub use error::ApiError;
pub use handlers::AppState;

/// Configures the routes for the forum.
///
/// # Developer Note
/// We use a scoped configuration to allow the main binary to mount
/// the API under different paths if needed (e.g., /api/v1/).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/threads")
            .route("", web::post().to(handlers::post_thread))
            .route("/{thread_id}", web::get().to(handlers::get_thread))
            .route("/{thread_id}/comments", web::post().to(handlers::post_comment))
            .route(
                "/{thread_id}/comments/{comment_id}",
                web::delete().to(handlers::delete_comment),
            )
            .route(
                "/{thread_id}/comments/{comment_id}/replies",
                web::post().to(handlers::post_reply),
            )
            .route(
                "/{thread_id}/comments/{comment_id}/replies/{reply_id}",
                web::delete().to(handlers::delete_reply),
            )
            .route(
                "/{thread_id}/comments/{comment_id}/likes",
                web::put().to(handlers::put_like),
            ),
    );
}

/// Body parse failures render the `fail` envelope; parser detail only goes
/// to the log.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "unreadable request body");
        ApiError::MalformedBody.into()
    })
}
