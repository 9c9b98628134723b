//! Login, logout, registration and admin user-creation flows.
//!
//! Login and logout are, together with bootstrap, the only writers of the
//! session store. A failed login never touches the store, so an existing
//! session survives a mistyped password. Logout always ends `Anonymous`, even
//! when the backend call fails.

use std::sync::Arc;

use bank_portal_core::Role;
use rootcause::Report;
use tracing::{info, instrument, warn};

use crate::backend::{AuthBackend, BackendError, RegistrationProfile};
use crate::error::{FlowError, FlowOperation};
use crate::guard::{Decision, RouteRequirement, decide};
use crate::identity::Identity;
use crate::navigation::NavigationConfig;
use crate::state::SessionState;
use crate::store::SessionStore;

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    /// The identity now held by the store.
    pub identity: Identity,
    /// Role-appropriate view to navigate to next.
    pub landing: String,
}

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationOutcome {
    /// The account the backend created.
    pub identity: Identity,
    /// View to navigate to next (the login view).
    pub next: String,
}

/// The session-changing user flows.
#[derive(Clone)]
pub struct AuthFlows {
    backend: Arc<dyn AuthBackend>,
    store: SessionStore,
    navigation: NavigationConfig,
}

impl AuthFlows {
    /// Creates the flows over a backend and the session store.
    #[must_use]
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        store: SessionStore,
        navigation: NavigationConfig,
    ) -> Self {
        Self {
            backend,
            store,
            navigation,
        }
    }

    /// Returns the session store these flows write to.
    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Logs in and replaces the session with the returned identity.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Credential` with the backend's message for rejected
    /// credentials and `FlowError::Transport` for network or server failures.
    /// In both cases the store is left exactly as it was.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> bank_portal_core::Result<LoginOutcome, FlowError> {
        let identity = match self.backend.login(email, password).await {
            Ok(identity) => identity,
            Err(err) => {
                info!(error = %err, "login failed, session unchanged");
                return Err(flow_report(FlowOperation::Login, err));
            }
        };

        if !self.store.set(SessionState::Authenticated(identity.clone())) {
            return Err(FlowError::Closed.into());
        }

        let landing = self.navigation.landing_for(identity.role()).to_string();
        info!(
            username = %identity.username(),
            role = %identity.role(),
            landing = %landing,
            "logged in"
        );

        Ok(LoginOutcome { identity, landing })
    }

    /// Logs out and returns the login view to navigate to.
    ///
    /// The backend call is best-effort; the store becomes `Anonymous` either
    /// way.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> String {
        if let Err(err) = self.backend.logout().await {
            warn!(error = %err, "backend logout failed, clearing local session anyway");
        }

        self.store.set(SessionState::Anonymous);
        info!("logged out");

        self.navigation.login_path.clone()
    }

    /// Registers a new account without touching the current session.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Credential` for rejected or duplicate profiles and
    /// `FlowError::Transport` for network or server failures.
    #[instrument(skip(self, profile), fields(username = %profile.username, role = %profile.role))]
    pub async fn register(
        &self,
        profile: &RegistrationProfile,
    ) -> bank_portal_core::Result<RegistrationOutcome, FlowError> {
        let identity = self
            .backend
            .register(profile)
            .await
            .map_err(|err| flow_report(FlowOperation::Register, err))?;

        info!(user_id = ?identity.id(), "registered account");

        Ok(RegistrationOutcome {
            identity,
            next: self.navigation.login_path.clone(),
        })
    }

    /// Creates an account as the logged-in administrator.
    ///
    /// Returns the backend's confirmation message. The session is never
    /// modified.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::NotAuthenticated` or `FlowError::Authorization`
    /// without calling the backend when the current identity is not an
    /// administrator, and the mapped backend failure otherwise.
    #[instrument(skip(self, profile), fields(username = %profile.username, role = %profile.role))]
    pub async fn create_user(
        &self,
        profile: &RegistrationProfile,
    ) -> bank_portal_core::Result<String, FlowError> {
        let state = self.store.current();
        match (decide(&state, RouteRequirement::Role(Role::Admin)), &state) {
            (Decision::Allow, _) => {}
            (Decision::RedirectUnauthorized, SessionState::Authenticated(identity)) => {
                return Err(FlowError::Authorization {
                    required: Role::Admin,
                    actual: identity.role(),
                }
                .into());
            }
            _ => return Err(FlowError::NotAuthenticated.into()),
        }

        let message = self
            .backend
            .create_user(profile)
            .await
            .map_err(|err| flow_report(FlowOperation::CreateUser, err))?;

        info!(%message, "created user account");
        Ok(message)
    }
}

/// Wraps a backend failure in a caller-facing flow error, keeping the backend
/// report as its cause.
fn flow_report(operation: FlowOperation, err: BackendError) -> Report<FlowError> {
    let flow = FlowError::from_backend(operation, &err);
    Report::<BackendError>::from(err).context(flow)
}
