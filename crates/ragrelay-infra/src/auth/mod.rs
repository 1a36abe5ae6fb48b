//! Credential hashing and token signing implementations.

pub mod password;
pub mod token;
