//! Authentication primitives library
//!
//! Provides the reusable, storage-free half of authentication:
//! - Password hashing (Argon2id)
//! - Signed time-limited token issuing and verification (session and reset kinds)
//!
//! The service crate defines its own repository ports and orchestrates these
//! primitives; nothing here touches a database or holds process-wide state.
//! The signing key is always an explicit constructor input, so tests can run
//! with distinct keys.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let digest = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &digest));
//! assert!(!hasher.verify("not_my_password", &digest));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{SessionClaims, TokenIssuer};
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!");
//! let claims = SessionClaims::new("user123", Some("company456".to_string()), 24);
//! let token = issuer.issue(&claims).unwrap();
//! let decoded: SessionClaims = issuer.verify(&token).unwrap();
//! assert_eq!(decoded.sub, "user123");
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::ResetClaims;
pub use token::SessionClaims;
pub use token::TokenError;
pub use token::TokenIssuer;
pub use token::TokenPurpose;
