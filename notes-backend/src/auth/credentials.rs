//! Registration, credential verification and identity lookup.

use std::sync::Arc;

use crate::auth::password::{HashError, PasswordHasher};
use crate::db::{StoreError, UserStore};
use crate::error::ApiError;
use crate::models::{NewUser, Registration, User};

#[derive(Clone)]
pub struct CredentialStore {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    /// Verified against when the email is unknown so both login failures cost
    /// one hash computation.
    dummy_hash: String,
}

impl CredentialStore {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher) -> Result<Self, HashError> {
        let dummy_hash = hasher.hash("dummy-password-for-timing")?;
        Ok(Self {
            users,
            hasher,
            dummy_hash,
        })
    }

    pub fn register(&self, registration: Registration) -> Result<User, ApiError> {
        if self.users.find_user_by_email(&registration.email)?.is_some() {
            log::debug!("[AUTH] Registration rejected, email already in use");
            return Err(ApiError::DuplicateEmail);
        }

        let password_hash = self.hasher.hash(&registration.password)?;
        let user = self
            .users
            .insert_user(&NewUser {
                name: registration.name,
                email: registration.email,
                password_hash,
            })
            .map_err(|e| match e {
                // lost a race with a concurrent registration
                StoreError::DuplicateEmail => ApiError::DuplicateEmail,
                other => other.into(),
            })?;

        log::info!("[AUTH] Registered user {}", user.id);
        Ok(user)
    }

    pub fn verify(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let Some(user) = self.users.find_user_by_email(email)? else {
            let _ = self.hasher.verify(password, &self.dummy_hash);
            log::debug!("[AUTH] Login failed: unknown email");
            return Err(ApiError::InvalidCredentials);
        };

        match self.hasher.verify(password, &user.password_hash) {
            Ok(true) => Ok(user),
            Ok(false) => {
                log::debug!("[AUTH] Login failed: wrong password for user {}", user.id);
                Err(ApiError::InvalidCredentials)
            }
            Err(e) => {
                log::warn!("[AUTH] Unreadable password hash for user {}: {}", user.id, e);
                Err(ApiError::InvalidCredentials)
            }
        }
    }

    pub fn lookup(&self, user_id: &str) -> Result<Option<User>, ApiError> {
        Ok(self.users.find_user_by_id(user_id)?)
    }
}
