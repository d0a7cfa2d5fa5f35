//! `/auth` routes: registration, login, current identity and logout.
//!
//! Password hashing is CPU-bound, so register and login run the credential
//! store on actix's blocking pool.

use actix_web::{HttpResponse, web};

use crate::AppState;
use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, User, UserResponse};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/me", web::get().to(me))
            .route("/logout", web::post().to(logout)),
    );
}

fn auth_response(state: &AppState, user: &User, message: &'static str) -> Result<AuthResponse, ApiError> {
    Ok(AuthResponse {
        message,
        token: state.tokens.issue(&user.id)?,
        user: UserResponse::from(user),
    })
}

async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let registration = body.validate()?;
    let credentials = state.credentials.clone();
    let user = web::block(move || credentials.register(registration)).await??;

    let response = auth_response(&state, &user, "User registered successfully")?;
    Ok(HttpResponse::Created().json(response))
}

async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let (email, password) = body.validate()?;
    let credentials = state.credentials.clone();
    let user = web::block(move || credentials.verify(&email, &password)).await??;

    log::info!("[AUTH] User {} logged in", user.id);
    let response = auth_response(&state, &user, "Login successful")?;
    Ok(HttpResponse::Ok().json(response))
}

async fn me(AuthenticatedUser(user): AuthenticatedUser) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "user": UserResponse::from(&user)
    })))
}

/// Tokens are stateless; the client discards its copy.
async fn logout(AuthenticatedUser(user): AuthenticatedUser) -> Result<HttpResponse, ApiError> {
    log::debug!("[AUTH] User {} logged out", user.id);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Logout successful"
    })))
}

#[cfg(test)]
mod tests {
    use crate::controllers::testing::{TestContext, bearer};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn test_register_login_me() {
        let ctx = TestContext::new();
        let app = test::init_service(ctx.app()).await;

        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({ "name": "Ada", "email": "Ada@Example.com", "password": "secret123" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "User registered successfully");
        assert_eq!(body["user"]["email"], "ada@example.com");
        assert!(body["user"].get("password").is_none());
        assert!(body["user"].get("password_hash").is_none());

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "ada@example.com", "password": "secret123" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Login successful");
        let token = body["token"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri("/auth/me")
            .insert_header(bearer(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["user"]["name"], "Ada");

        let req = test::TestRequest::post()
            .uri("/auth/logout")
            .insert_header(bearer(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_duplicate_registration() {
        let ctx = TestContext::new();
        let app = test::init_service(ctx.app()).await;
        ctx.register("ada@example.com");

        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({ "name": "Ada", "email": "ADA@example.com", "password": "secret123" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "User already exists with this email");
    }

    #[actix_web::test]
    async fn test_login_failures_match() {
        let ctx = TestContext::new();
        let app = test::init_service(ctx.app()).await;
        ctx.register("ada@example.com");

        let mut bodies = Vec::new();
        for (email, password) in [("ada@example.com", "wrongpass"), ("ghost@example.com", "secret123")] {
            let req = test::TestRequest::post()
                .uri("/auth/login")
                .set_json(json!({ "email": email, "password": password }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
            let body: Value = test::read_body_json(resp).await;
            bodies.push(body);
        }
        assert_eq!(bodies[0], bodies[1]);
        assert_eq!(bodies[0]["message"], "Invalid email or password");
    }

    #[actix_web::test]
    async fn test_register_validation() {
        let ctx = TestContext::new();
        let app = test::init_service(ctx.app()).await;

        let cases = [
            (json!({ "email": "a@b.co", "password": "secret123" }), "name"),
            (json!({ "name": "A", "email": "a@b.co", "password": "secret123" }), "name"),
            (json!({ "name": "Ada", "email": "not-an-email", "password": "secret123" }), "email"),
            (json!({ "name": "Ada", "email": "a@b.co", "password": "123" }), "password"),
        ];
        for (payload, field) in cases {
            let req = test::TestRequest::post()
                .uri("/auth/register")
                .set_json(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert!(body["message"].as_str().unwrap().contains(field), "{}", body);
        }
    }

    #[actix_web::test]
    async fn test_me_requires_token() {
        let ctx = TestContext::new();
        let app = test::init_service(ctx.app()).await;

        let req = test::TestRequest::get().uri("/auth/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Access token required");

        let req = test::TestRequest::get()
            .uri("/auth/me")
            .insert_header(bearer("forged.token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid or expired token");
    }
}
