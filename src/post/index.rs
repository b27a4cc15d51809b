use super::controller::{
    create_post, get_post, like_post, list_my_posts, list_posts, list_posts_by_status,
    unlike_post, update_post_status,
};
use crate::comment::index::comment_routes;
use crate::middleware::auth::verify_token;
use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;

pub fn post_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/posts")
            .wrap(HttpAuthentication::bearer(verify_token))
            .route("", web::post().to(create_post))
            .route("", web::get().to(list_posts))
            .route("/mine", web::get().to(list_my_posts))
            .route("/status/{status}", web::get().to(list_posts_by_status))
            .route("/{id}", web::get().to(get_post))
            .route("/{id}/status", web::patch().to(update_post_status))
            .route("/{id}/like", web::post().to(like_post))
            .route("/{id}/like", web::delete().to(unlike_post))
            .configure(comment_routes),
    );
}
