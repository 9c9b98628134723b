//! The client-side session state.

use bank_portal_core::Role;

use crate::identity::Identity;

/// Who is currently logged in, as far as the client knows.
///
/// Exactly one value of this type is authoritative at any time: the one held
/// by [`SessionStore`](crate::SessionStore). Views read it from there and never
/// keep a copy of their own.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// Bootstrap has not completed yet.
    #[default]
    Unknown,
    /// Bootstrap completed (or the user logged out) with no valid identity.
    Anonymous,
    /// The backend affirmed this identity.
    Authenticated(Identity),
}

impl SessionState {
    /// Returns true once the state is no longer `Unknown`.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Returns true if an identity is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Returns the identity, if authenticated.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Unknown | Self::Anonymous => None,
        }
    }

    /// Returns the identity's role, if authenticated.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.identity().map(Identity::role)
    }

    /// Short label used in logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Anonymous => "anonymous",
            Self::Authenticated(_) => "authenticated",
        }
    }
}
