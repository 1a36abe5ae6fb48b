//! Shared domain types for Ragrelay.
//!
//! This crate holds the data model (users, conversations, messages),
//! the error taxonomy, and configuration types. It has no I/O and no
//! dependency on the other workspace crates.

pub mod chat;
pub mod config;
pub mod error;
pub mod identity;
