use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use mongodb::bson::oid::ObjectId;
use serde_json::json;

use crate::config::AppConfig;
use crate::middleware::auth::current_actor;
use crate::post::model::{CreatePostRequest, UpdateStatusRequest};
use crate::post::service::PostService;
use crate::utils::error::CustomError;
use crate::utils::helpers::success_response;
use crate::utils::pagination::{PageQuery, PageRequest};

pub(crate) fn parse_id(raw: &str, what: &str) -> Result<ObjectId, CustomError> {
    ObjectId::parse_str(raw).map_err(|_| CustomError::ValidationError(format!("Invalid {} ID", what)))
}

/// Create a post; it starts out pending review
/// POST /posts
pub async fn create_post(
    req: HttpRequest,
    post_service: web::Data<PostService>,
    body: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, CustomError> {
    let actor = current_actor(&req)?;
    let post = post_service.create_post(&actor, body.into_inner()).await?;

    Ok(success_response(
        StatusCode::CREATED,
        "Post submitted for review",
        post,
    ))
}

/// Approved feed
/// GET /posts
pub async fn list_posts(
    req: HttpRequest,
    post_service: web::Data<PostService>,
    config: web::Data<AppConfig>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, CustomError> {
    let actor = current_actor(&req)?;
    let page = PageRequest::from_query(&query, &config);
    let posts = post_service.list_approved(&actor, page).await?;

    Ok(success_response(StatusCode::OK, "Posts fetched successfully", posts))
}

/// GET /posts/mine
pub async fn list_my_posts(
    req: HttpRequest,
    post_service: web::Data<PostService>,
    config: web::Data<AppConfig>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, CustomError> {
    let actor = current_actor(&req)?;
    let page = PageRequest::from_query(&query, &config);
    let posts = post_service.list_mine(&actor, page).await?;

    Ok(success_response(StatusCode::OK, "Posts fetched successfully", posts))
}

/// Moderation queue
/// GET /posts/status/{status}
pub async fn list_posts_by_status(
    req: HttpRequest,
    post_service: web::Data<PostService>,
    config: web::Data<AppConfig>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, CustomError> {
    let actor = current_actor(&req)?;
    let page = PageRequest::from_query(&query, &config);
    let posts = post_service
        .list_by_status(&actor, &path.into_inner(), page)
        .await?;

    Ok(success_response(StatusCode::OK, "Posts fetched successfully", posts))
}

/// GET /posts/{id}
pub async fn get_post(
    req: HttpRequest,
    post_service: web::Data<PostService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let actor = current_actor(&req)?;
    let post_id = parse_id(&path.into_inner(), "post")?;
    let post = post_service.view_post(&post_id, &actor).await?;

    Ok(success_response(StatusCode::OK, "Post fetched successfully", post))
}

/// PATCH /posts/{id}/status
pub async fn update_post_status(
    req: HttpRequest,
    post_service: web::Data<PostService>,
    path: web::Path<String>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, CustomError> {
    let actor = current_actor(&req)?;
    let post_id = parse_id(&path.into_inner(), "post")?;
    let post = post_service
        .update_status(&post_id, &actor, &body.status)
        .await?;

    Ok(success_response(StatusCode::OK, "Post status updated", post))
}

/// POST /posts/{id}/like
pub async fn like_post(
    req: HttpRequest,
    post_service: web::Data<PostService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let actor = current_actor(&req)?;
    let post_id = parse_id(&path.into_inner(), "post")?;
    let count = post_service.like_post(&post_id, &actor).await?;

    Ok(success_response(
        StatusCode::OK,
        "Post liked",
        json!({ "like_count": count }),
    ))
}

/// DELETE /posts/{id}/like
pub async fn unlike_post(
    req: HttpRequest,
    post_service: web::Data<PostService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let actor = current_actor(&req)?;
    let post_id = parse_id(&path.into_inner(), "post")?;
    let count = post_service.unlike_post(&post_id, &actor).await?;

    Ok(success_response(
        StatusCode::OK,
        "Post unliked",
        json!({ "like_count": count }),
    ))
}
