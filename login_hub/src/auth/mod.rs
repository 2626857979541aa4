//! Authentication module providing accounts, registration, and password login.
//!
//! Accounts are the durable unit of identity. An account is created either by
//! password registration or by the first successful external-identity resolution
//! (see [`crate::oauth::IdentityResolver`]); both paths land in the same table.
//! Password hashing uses Argon2id.

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{AuthError, AuthResult};
pub use manager::AuthManager;
pub use models::{Account, AccountId, LoginMethod, LoginRequest, NewAccount, RegisterRequest};
