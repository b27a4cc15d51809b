use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::comment::model::CreateCommentRequest;
use crate::middleware::auth::current_actor;
use crate::post::controller::parse_id;
use crate::post::service::PostService;
use crate::utils::error::CustomError;
use crate::utils::helpers::success_response;

/// Comment on an approved post
/// POST /posts/{id}/comments
pub async fn create_comment(
    req: HttpRequest,
    post_service: web::Data<PostService>,
    path: web::Path<String>,
    body: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, CustomError> {
    let actor = current_actor(&req)?;
    let post_id = parse_id(&path.into_inner(), "post")?;
    let comment = post_service.add_comment(&post_id, &actor, &body.text).await?;

    Ok(success_response(
        StatusCode::CREATED,
        "Comment created successfully",
        comment,
    ))
}

/// Reply to a comment; replies to replies join the top-level thread
/// POST /posts/{id}/comments/{comment_id}/replies
pub async fn create_reply(
    req: HttpRequest,
    post_service: web::Data<PostService>,
    path: web::Path<(String, String)>,
    body: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, CustomError> {
    let actor = current_actor(&req)?;
    let (post_id, comment_id) = path.into_inner();
    let post_id = parse_id(&post_id, "post")?;
    let comment_id = parse_id(&comment_id, "comment")?;

    let reply = post_service
        .add_reply(&post_id, &comment_id, &actor, &body.text)
        .await?;

    Ok(success_response(
        StatusCode::CREATED,
        "Reply created successfully",
        reply,
    ))
}

/// POST /posts/{id}/comments/{comment_id}/like
pub async fn like_comment(
    req: HttpRequest,
    post_service: web::Data<PostService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, CustomError> {
    let actor = current_actor(&req)?;
    let (post_id, comment_id) = path.into_inner();
    let post_id = parse_id(&post_id, "post")?;
    let comment_id = parse_id(&comment_id, "comment")?;

    let count = post_service
        .like_comment(&post_id, &comment_id, &actor)
        .await?;

    Ok(success_response(
        StatusCode::OK,
        "Comment liked",
        json!({ "like_count": count }),
    ))
}

/// DELETE /posts/{id}/comments/{comment_id}/like
pub async fn unlike_comment(
    req: HttpRequest,
    post_service: web::Data<PostService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, CustomError> {
    let actor = current_actor(&req)?;
    let (post_id, comment_id) = path.into_inner();
    let post_id = parse_id(&post_id, "post")?;
    let comment_id = parse_id(&comment_id, "comment")?;

    let count = post_service
        .unlike_comment(&post_id, &comment_id, &actor)
        .await?;

    Ok(success_response(
        StatusCode::OK,
        "Comment unliked",
        json!({ "like_count": count }),
    ))
}
