use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationError};

/// Registered identity as stored. Deliberately not `Serialize`: the password
/// hash must only ever leave through [`UserResponse`], which omits it.
#[derive(Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("avatar", &self.avatar)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}

/// Row to insert for a new identity (hash already computed).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Client-safe projection of [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A registration that passed field validation.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<Registration, ValidationError> {
        Ok(Registration {
            name: validation::display_name(self.name.as_deref())?,
            email: validation::email(self.email.as_deref())?,
            password: validation::new_password(self.password.as_deref())?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns the canonical email and the password.
    pub fn validate(&self) -> Result<(String, String), ValidationError> {
        Ok((
            validation::email(self.email.as_deref())?,
            validation::password(self.password.as_deref())?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: "u-1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=8,t=1,p=1$c2FsdHNhbHQ$aGFzaA".to_string(),
            avatar: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_response_omits_hash() {
        let user = sample_user();
        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "u-1",
                "name": "Ada",
                "email": "ada@example.com",
                "avatar": null
            })
        );
        assert!(!format!("{:?}", user).contains("argon2"));
    }

    #[test]
    fn test_register_request_validation() {
        let req = RegisterRequest {
            name: Some(" Ada ".to_string()),
            email: Some("Ada@Example.com".to_string()),
            password: Some("secret1".to_string()),
        };
        let reg = req.validate().unwrap();
        assert_eq!(reg.name, "Ada");
        assert_eq!(reg.email, "ada@example.com");

        let req = RegisterRequest {
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            password: None,
        };
        assert_eq!(req.validate().unwrap_err().field, "password");
    }
}
