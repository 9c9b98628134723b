//! Call surface of the remote authentication service.
//!
//! The session core talks to the bank API only through [`AuthBackend`]. The
//! backend owns the ambient credential (a session cookie, or a bearer token
//! substituted for it); callers never pass tokens explicitly.

use async_trait::async_trait;
use bank_portal_core::Role;
use serde::Serialize;
use std::fmt;

use crate::error::ErrorKind;
use crate::identity::Identity;

/// Profile submitted when registering or creating a user account.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationProfile {
    /// Unique username.
    pub username: String,
    /// Unique email address, used to log in.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Role of the new account.
    pub role: Role,
}

impl RegistrationProfile {
    /// Creates a registration profile.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            role,
        }
    }
}

impl fmt::Debug for RegistrationProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationProfile")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Errors reported by an [`AuthBackend`].
///
/// Variants carry the human-readable message from the response body when
/// the backend supplied one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Email/password pair was rejected.
    InvalidCredentials {
        /// Message from the response body.
        message: Option<String>,
    },
    /// No valid server-side session (missing or expired cookie).
    NotAuthenticated,
    /// Submitted profile failed server validation.
    Validation {
        /// Message from the response body.
        message: Option<String>,
    },
    /// Username or email already taken.
    Duplicate {
        /// Message from the response body.
        message: Option<String>,
    },
    /// Authenticated, but the backend refused the operation for this role.
    Forbidden {
        /// Message from the response body.
        message: Option<String>,
    },
    /// Unexpected server-side failure.
    Server {
        /// HTTP status code.
        status: u16,
        /// Message from the response body.
        message: Option<String>,
    },
    /// The request never completed (connection, timeout).
    Network {
        /// Error details.
        reason: String,
    },
    /// The response could not be interpreted.
    MalformedPayload {
        /// What was wrong with the payload.
        reason: String,
    },
}

impl BackendError {
    /// Returns the backend-provided message, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::InvalidCredentials { message }
            | Self::Validation { message }
            | Self::Duplicate { message }
            | Self::Forbidden { message }
            | Self::Server { message, .. } => message.as_deref(),
            Self::NotAuthenticated | Self::Network { .. } | Self::MalformedPayload { .. } => None,
        }
    }

    /// Classifies the error into the client's error taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCredentials { .. } | Self::Validation { .. } | Self::Duplicate { .. } => {
                ErrorKind::Credential
            }
            Self::Forbidden { .. } => ErrorKind::Authorization,
            Self::NotAuthenticated => ErrorKind::SessionExpired,
            Self::Server { .. } | Self::Network { .. } | Self::MalformedPayload { .. } => {
                ErrorKind::Transport
            }
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials { message } => match message {
                Some(message) => write!(f, "invalid credentials: {message}"),
                None => write!(f, "invalid credentials"),
            },
            Self::NotAuthenticated => write!(f, "not authenticated"),
            Self::Validation { message } => match message {
                Some(message) => write!(f, "validation failed: {message}"),
                None => write!(f, "validation failed"),
            },
            Self::Duplicate { message } => match message {
                Some(message) => write!(f, "duplicate account: {message}"),
                None => write!(f, "duplicate account"),
            },
            Self::Forbidden { message } => match message {
                Some(message) => write!(f, "forbidden: {message}"),
                None => write!(f, "forbidden"),
            },
            Self::Server { status, message } => match message {
                Some(message) => write!(f, "server error ({status}): {message}"),
                None => write!(f, "server error ({status})"),
            },
            Self::Network { reason } => write!(f, "network error: {reason}"),
            Self::MalformedPayload { reason } => write!(f, "malformed response: {reason}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// Trait for the remote authentication service.
///
/// Implementations are stateless from the core's point of view: the only
/// state they keep is the ambient credential attached to each request.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Authenticates with email and password, establishing a server session.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` for a rejected pair, `Network`/`Server` otherwise.
    async fn login(&self, email: &str, password: &str) -> Result<Identity, BackendError>;

    /// Invalidates the server-side session.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails; callers treat this as best-effort.
    async fn logout(&self) -> Result<(), BackendError>;

    /// Returns the identity bound to the ambient credential.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` when there is no valid session.
    async fn validate_session(&self) -> Result<Identity, BackendError>;

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// `Validation` or `Duplicate` for rejected profiles.
    async fn register(&self, profile: &RegistrationProfile) -> Result<Identity, BackendError>;

    /// Creates a user account on behalf of an administrator.
    ///
    /// Returns the backend's confirmation message.
    ///
    /// # Errors
    ///
    /// `Forbidden` if the current session is not an administrator's,
    /// `Validation`/`Duplicate` for rejected profiles.
    async fn create_user(&self, profile: &RegistrationProfile) -> Result<String, BackendError>;
}
