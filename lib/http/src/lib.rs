//! HTTP backend for the bank portal session core.
//!
//! [`HttpAuthBackend`] implements
//! [`AuthBackend`](bank_portal_session::AuthBackend) against the bank's JSON
//! API. Endpoint paths, timeout and credential mode come from
//! [`BackendConfig`].
//!
//! # Status mapping
//!
//! | response | error |
//! |---|---|
//! | 3xx | `NotAuthenticated` (redirected to the login view) |
//! | 401 on login | `InvalidCredentials` |
//! | 401 elsewhere | `NotAuthenticated` |
//! | 400/422 mentioning "already exists", 409 | `Duplicate` |
//! | other 400/422 | `Validation` |
//! | 403 | `Forbidden` |
//! | anything else | `Server` |
//!
//! Connection failures and timeouts become `Network`; unparseable bodies
//! become `MalformedPayload`.

pub mod client;
pub mod config;
pub mod error;

pub use client::HttpAuthBackend;
pub use config::{AmbientCredential, BackendConfig};
pub use error::HttpSetupError;
