//! Navigation targets chosen by the session core.
//!
//! The core decides where a user should end up; the application shell's
//! navigator performs the actual render or redirect.

use bank_portal_core::Role;
use serde::{Deserialize, Serialize};

use crate::guard::Decision;

/// Paths of the views the core redirects to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Login view.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// View shown when the identity lacks the required role.
    #[serde(default = "default_unauthorized_path")]
    pub unauthorized_path: String,

    /// Landing view for customers and staff.
    #[serde(default = "default_dashboard_path")]
    pub dashboard_path: String,

    /// Landing view for administrators.
    #[serde(default = "default_admin_landing_path")]
    pub admin_landing_path: String,
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_unauthorized_path() -> String {
    "/unauthorized".to_string()
}

fn default_dashboard_path() -> String {
    "/".to_string()
}

fn default_admin_landing_path() -> String {
    "/admin/create-user".to_string()
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
            unauthorized_path: default_unauthorized_path(),
            dashboard_path: default_dashboard_path(),
            admin_landing_path: default_admin_landing_path(),
        }
    }
}

impl NavigationConfig {
    /// Where to send a user right after logging in.
    ///
    /// Administrators land in the admin area; everyone else on the dashboard.
    #[must_use]
    pub fn landing_for(&self, role: Role) -> &str {
        match role {
            Role::Admin => &self.admin_landing_path,
            Role::Customer | Role::Staff => &self.dashboard_path,
        }
    }

    /// The redirect target for a guard decision, if it is a redirect.
    #[must_use]
    pub fn redirect_for(&self, decision: Decision) -> Option<&str> {
        match decision {
            Decision::RedirectLogin => Some(&self.login_path),
            Decision::RedirectUnauthorized => Some(&self.unauthorized_path),
            Decision::Pending | Decision::Allow => None,
        }
    }
}

/// What the navigator should do for a requested path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Render the requested view.
    Render(String),
    /// Replace the requested view with another one.
    Redirect {
        /// The requested path.
        from: String,
        /// The path shown instead.
        to: String,
    },
    /// Session not settled yet; show a neutral loading state.
    Pending(String),
    /// No view is registered at this path.
    NotFound(String),
}

impl Navigation {
    /// The path the navigator ends up showing, if any.
    #[must_use]
    pub fn destination(&self) -> Option<&str> {
        match self {
            Self::Render(path) => Some(path.as_str()),
            Self::Redirect { to, .. } => Some(to.as_str()),
            Self::Pending(_) | Self::NotFound(_) => None,
        }
    }
}
