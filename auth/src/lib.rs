//! Authentication primitives shared by the services.
//!
//! - Password hashing (Argon2id, self-describing encoded format)
//! - RS256 access token issuance and verification
//! - Authentication coordination
//!
//! No I/O happens here; services own storage and transport.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hash.starts_with("$argon2id$v=19$"));
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Complete Authentication Flow
//! ```ignore
//! use auth::Authenticator;
//! use uuid::Uuid;
//!
//! let auth = Authenticator::from_rsa_pem(private_pem, public_pem)?;
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123")?;
//!
//! // Login: verify and issue token
//! let subject = Uuid::now_v7();
//! let result = auth.authenticate("password123", &hash, subject)?;
//!
//! // Gate: verify token
//! assert_eq!(auth.verify_token(&result.access_token)?, subject);
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::IssuedToken;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::HashParams;
pub use password::PasswordError;
pub use password::PasswordHasher;
