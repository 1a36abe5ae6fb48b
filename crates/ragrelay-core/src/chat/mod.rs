//! Chat orchestration: conversation lifecycle and the turn flow.

pub mod repository;
pub mod service;
