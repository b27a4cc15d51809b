use crate::post::index::post_routes;
use crate::uploader::index::upload_routes;
use crate::utils::helpers::service_name;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, get, web};
use serde_json::json;

#[get("/")]
async fn default() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Confessions service is running",
        "httpStatusCode": StatusCode::OK.as_u16(),
        "service": service_name(),
    }))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(post_routes);
    cfg.configure(upload_routes);
    cfg.service(default);
}
