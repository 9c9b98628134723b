//! The shared `Result` alias.
//!
//! Fallible operations that callers see (login, registration, client setup)
//! return a `rootcause::Report` whose current context is the caller-facing
//! error and whose cause chain keeps whatever the lower layer reported.

use rootcause::Report;

/// `Result` over a `rootcause::Report` with context `C`.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;
