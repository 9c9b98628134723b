//! Session and authorization state machine for the bank portal client.
//!
//! This crate provides:
//! - The authenticated `Identity` mirrored from the bank API
//! - The process-wide `SessionState` cell (`SessionStore`) and its observers
//! - Startup reconciliation with any existing server session (`SessionBootstrapper`)
//! - Login, logout, registration and admin user-creation flows (`AuthFlows`)
//! - The route guard that gates role-restricted views (`decide`, `RouteGuard`)
//!
//! # State Model
//!
//! The session starts `Unknown`, becomes `Anonymous` or `Authenticated` once the
//! bootstrap validate call settles, and afterwards moves only through a
//! successful login (`Authenticated`) or any logout (`Anonymous`). Nothing
//! outside this crate can write the state.
//!
//! # Example
//!
//! ```
//! use bank_portal_session::{Decision, RouteRequirement, SessionState, decide};
//! use bank_portal_core::Role;
//!
//! // Until bootstrap settles, every protected view is deferred.
//! assert_eq!(
//!     decide(&SessionState::Unknown, RouteRequirement::Role(Role::Admin)),
//!     Decision::Pending,
//! );
//! assert_eq!(
//!     decide(&SessionState::Anonymous, RouteRequirement::Any),
//!     Decision::RedirectLogin,
//! );
//! ```

pub mod backend;
pub mod bootstrap;
pub mod error;
pub mod flows;
pub mod guard;
pub mod identity;
pub mod navigation;
pub mod routes;
pub mod state;
pub mod store;

// Re-export main types at crate root
pub use backend::{AuthBackend, BackendError, RegistrationProfile};
pub use bootstrap::SessionBootstrapper;
pub use error::{ErrorKind, FlowError, FlowOperation};
pub use flows::{AuthFlows, LoginOutcome, RegistrationOutcome};
pub use guard::{Decision, RouteGuard, RouteRequirement, decide};
pub use identity::{Identity, Profile};
pub use navigation::{Navigation, NavigationConfig};
pub use routes::{Access, Route, RouteTable};
pub use state::SessionState;
pub use store::SessionStore;
