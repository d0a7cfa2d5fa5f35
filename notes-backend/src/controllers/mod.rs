pub mod auth;
pub mod health;
pub mod notes;

use actix_web::{HttpRequest, HttpResponse, error, web};

use crate::error::ApiError;
use crate::validation::ValidationError;

/// Registers every route plus the extractor error handlers that turn malformed
/// bodies and query strings into `400 { "message": ... }` responses.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .configure(health::config_routes)
        .configure(auth::config)
        .configure(notes::config);
}

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        error::JsonPayloadError::Deserialize(e) => format!("Invalid request body: {}", e),
        error::JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        _ => "Invalid request body".to_string(),
    };
    log::debug!("[API] Rejected JSON payload: {}", err);
    ApiError::Validation(ValidationError::new("body", message)).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(ValidationError::new("query", format!("Invalid query string: {}", err))).into()
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "message": "Route not found" }))
}


#[cfg(test)]
mod tests {
    use super::testing::TestContext;
    use actix_web::http::StatusCode;
    use actix_web::test;

    #[actix_web::test]
    async fn test_malformed_json_is_validation_error() {
        let ctx = TestContext::new();
        let app = test::init_service(ctx.app()).await;

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["message"].is_string());
    }

    #[actix_web::test]
    async fn test_unknown_route_is_json_404() {
        let ctx = TestContext::new();
        let app = test::init_service(ctx.app()).await;
        let resp = test::call_service(&app, test::TestRequest::get().uri("/nope").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Route not found");
    }
}
