//! Business logic for Ragrelay.
//!
//! Services here are generic over repository and provider traits so
//! this crate never depends on ragrelay-infra. Concrete SQLite and
//! HTTP implementations are pinned in the application layer.

pub mod chat;
pub mod identity;
pub mod provider;
