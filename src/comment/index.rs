use super::controller::{create_comment, create_reply, like_comment, unlike_comment};
use actix_web::web;

/// Mounted inside the authenticated `/posts` scope.
pub fn comment_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{id}/comments", web::post().to(create_comment))
        .route(
            "/{id}/comments/{comment_id}/replies",
            web::post().to(create_reply),
        )
        .route(
            "/{id}/comments/{comment_id}/like",
            web::post().to(like_comment),
        )
        .route(
            "/{id}/comments/{comment_id}/like",
            web::delete().to(unlike_comment),
        );
}
