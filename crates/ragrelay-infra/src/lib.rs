//! Infrastructure implementations for Ragrelay.
//!
//! Concrete backends for the traits defined in ragrelay-core:
//! SQLite repositories, argon2id password hashing, HMAC-SHA256 token
//! signing, and the reqwest-based RAG provider client.

pub mod auth;
pub mod ragflow;
pub mod sqlite;
