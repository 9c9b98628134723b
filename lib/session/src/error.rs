//! Error types for the session crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `BackendError` (in `backend`): what the remote service reported
//! - `FlowError`: what a login/register/create-user caller should show
//!
//! Bootstrap and logout absorb their failures; they only ever show up as
//! session state transitions.

use bank_portal_core::Role;
use std::fmt;

use crate::backend::BackendError;

/// Classification of failures as the user experiences them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad email/password or rejected profile; shown inline.
    Credential,
    /// Authenticated with the wrong role; handled by redirecting.
    Authorization,
    /// No valid session; silently treated as logged out.
    SessionExpired,
    /// Network or server failure; shown as a generic retry message.
    Transport,
}

/// Generic message for transport failures.
pub const TRANSPORT_MESSAGE: &str = "Unable to reach the bank. Please try again.";

/// Which caller-facing operation failed, for fallback messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOperation {
    /// Email/password login.
    Login,
    /// Self-service registration.
    Register,
    /// Administrator creating an account.
    CreateUser,
}

impl FlowOperation {
    /// Message shown when the backend gave no reason.
    #[must_use]
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::Login => "Login failed",
            Self::Register => "Registration failed",
            Self::CreateUser => "Error creating user",
        }
    }
}

impl fmt::Display for FlowOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => write!(f, "login"),
            Self::Register => write!(f, "registration"),
            Self::CreateUser => write!(f, "user creation"),
        }
    }
}

/// Errors surfaced to callers of the login, register and create-user flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// The backend rejected what the user submitted.
    Credential {
        /// The flow that failed.
        operation: FlowOperation,
        /// Backend message, or a generic one when none was given.
        message: String,
    },
    /// The request failed in transit or on the server.
    Transport {
        /// The flow that failed.
        operation: FlowOperation,
    },
    /// The current identity does not hold the required role.
    Authorization {
        /// The role the operation needs.
        required: Role,
        /// The role of the current identity.
        actual: Role,
    },
    /// The operation requires a logged-in identity.
    NotAuthenticated,
    /// The application was torn down while the call was in flight.
    Closed,
}

impl FlowError {
    /// Maps a backend failure for the given operation.
    #[must_use]
    pub fn from_backend(operation: FlowOperation, err: &BackendError) -> Self {
        match err.kind() {
            ErrorKind::Credential | ErrorKind::Authorization | ErrorKind::SessionExpired => {
                Self::Credential {
                    operation,
                    message: err
                        .server_message()
                        .unwrap_or(operation.fallback_message())
                        .to_string(),
                }
            }
            ErrorKind::Transport => Self::Transport { operation },
        }
    }

    /// Returns the classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Credential { .. } => ErrorKind::Credential,
            Self::Authorization { .. } => ErrorKind::Authorization,
            Self::NotAuthenticated => ErrorKind::SessionExpired,
            Self::Transport { .. } | Self::Closed => ErrorKind::Transport,
        }
    }

    /// Returns the message a form should display.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Credential { message, .. } => message,
            Self::Transport { .. } | Self::Closed => TRANSPORT_MESSAGE,
            Self::Authorization { .. } => "You are not authorized to view this page.",
            Self::NotAuthenticated => "Please log in to continue.",
        }
    }
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Credential { operation, message } => {
                write!(f, "{operation} rejected: {message}")
            }
            Self::Transport { operation } => {
                write!(f, "{operation} failed: backend unreachable")
            }
            Self::Authorization { required, actual } => {
                write!(f, "role {actual} lacks required role {required}")
            }
            Self::NotAuthenticated => write!(f, "user is not authenticated"),
            Self::Closed => write!(f, "session store was torn down"),
        }
    }
}

impl std::error::Error for FlowError {}
