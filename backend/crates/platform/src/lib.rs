//! Platform Crate - Technical Infrastructure
//!
//! Crypto primitives used by the auth core:
//! - Opaque random tokens and SHA-256 helpers (`crypto`)
//! - Secret hashing (Argon2id, NIST SP 800-63B shape rules) (`password`)
//! - Stateless signed tokens with expiry (HS256) (`token`)
//!
//! Nothing in here touches the network or a database.

pub mod crypto;
pub mod password;
pub mod token;
