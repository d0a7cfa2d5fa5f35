//! Identity and access: password hashing, bearer tokens, credential checks and
//! the per-request gate.

pub mod credentials;
pub mod gate;
pub mod password;
pub mod token;

pub use credentials::CredentialStore;
pub use gate::{AuthGate, AuthenticatedUser};
pub use password::PasswordHasher;
pub use token::TokenService;
