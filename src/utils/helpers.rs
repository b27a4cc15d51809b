use actix_web::{HttpResponse, http::StatusCode};
use serde::Serialize;
use serde_json::json;

pub const DEFAULT_SERVICE_NAME: &str = "confessions-backend";

/// Name reported in every response envelope.
pub fn service_name() -> String {
    std::env::var("SERVICE_NAME").unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string())
}

/// Builds the `{success, message, httpStatusCode, service, data}` envelope.
pub fn success_response<T: Serialize>(status: StatusCode, message: &str, data: T) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "success": true,
        "message": message,
        "httpStatusCode": status.as_u16(),
        "service": service_name(),
        "data": data,
    }))
}
