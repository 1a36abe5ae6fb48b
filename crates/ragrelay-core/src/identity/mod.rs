//! User identity: registration, login, token-based authentication.

pub mod repository;
pub mod service;
