//! Per-request authentication.
//!
//! [`AuthGate`] resolves an `Authorization` header value to a live [`User`].
//! Handlers receive the result through the [`AuthenticatedUser`] extractor,
//! which runs the gate before the handler body executes.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};
use std::future::{Ready, ready};

use crate::auth::credentials::CredentialStore;
use crate::auth::token::TokenService;
use crate::error::ApiError;
use crate::models::User;

const TOKEN_REQUIRED: &str = "Access token required";
const TOKEN_REJECTED: &str = "Invalid or expired token";

#[derive(Clone)]
pub struct AuthGate {
    tokens: TokenService,
    credentials: CredentialStore,
}

impl AuthGate {
    pub fn new(tokens: TokenService, credentials: CredentialStore) -> Self {
        Self { tokens, credentials }
    }

    pub fn authenticate(&self, authorization: Option<&str>) -> Result<User, ApiError> {
        let token = authorization
            .and_then(bearer_token)
            .ok_or(ApiError::Unauthenticated(TOKEN_REQUIRED))?;

        let claims = self.tokens.verify(token).map_err(|e| {
            log::debug!("[AUTH] Token rejected: {}", e);
            ApiError::from(e)
        })?;

        match self.credentials.lookup(&claims.sub)? {
            Some(user) => Ok(user),
            None => {
                log::debug!("[AUTH] Token subject {} no longer exists", claims.sub);
                Err(ApiError::Unauthenticated(TOKEN_REJECTED))
            }
        }
    }
}

/// Extracts the token from `Bearer <token>`; scheme match is case-insensitive.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// The caller's identity, resolved by [`AuthGate`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(gate) = req.app_data::<web::Data<AuthGate>>() else {
            return ready(Err(ApiError::Unexpected("AuthGate not registered".to_string())));
        };
        let header = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());
        ready(gate.authenticate(header).map(AuthenticatedUser))
    }
}
