//! Core domain types and utilities for the bank portal client.
//!
//! This crate provides the vocabulary shared by the session core, the HTTP
//! backend and the application shell: the error `Result` alias, server-issued
//! user identifiers, and the closed set of access roles.

pub mod error;
pub mod id;
pub mod role;

pub use error::Result;
pub use id::{ParseIdError, UserId};
pub use role::{ParseRoleError, Role};
