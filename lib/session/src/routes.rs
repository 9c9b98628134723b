//! Declarative mapping from view paths to access requirements.

use bank_portal_core::Role;

use crate::guard::RouteRequirement;
use crate::navigation::NavigationConfig;

/// Whether a view needs a session at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Reachable without logging in.
    Public,
    /// Gated by the route guard.
    Protected(RouteRequirement),
}

/// A registered view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    path: String,
    access: Access,
}

impl Route {
    /// Creates a route.
    #[must_use]
    pub fn new(path: impl Into<String>, access: Access) -> Self {
        Self {
            path: normalize(&path.into()).to_string(),
            access,
        }
    }

    /// Returns the route path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the access rule.
    #[must_use]
    pub fn access(&self) -> Access {
        self.access
    }
}

/// The application's route table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The bank portal's views.
    ///
    /// The login, unauthorized, dashboard and admin views sit at the paths
    /// `navigation` redirects to, so every redirect target is registered.
    /// Loans and transactions are customer-only; account creation is
    /// admin-only; the dashboard accepts any logged-in identity.
    #[must_use]
    pub fn bank(navigation: &NavigationConfig) -> Self {
        Self::new()
            .with_route(navigation.login_path.as_str(), Access::Public)
            .with_route("/register", Access::Public)
            .with_route(navigation.unauthorized_path.as_str(), Access::Public)
            .with_route(
                navigation.dashboard_path.as_str(),
                Access::Protected(RouteRequirement::Any),
            )
            .with_route(
                navigation.admin_landing_path.as_str(),
                Access::Protected(RouteRequirement::Role(Role::Admin)),
            )
            .with_route(
                "/loans",
                Access::Protected(RouteRequirement::Role(Role::Customer)),
            )
            .with_route(
                "/transactions",
                Access::Protected(RouteRequirement::Role(Role::Customer)),
            )
    }

    /// Adds a route, replacing any existing route with the same path.
    #[must_use]
    pub fn with_route(mut self, path: impl Into<String>, access: Access) -> Self {
        let route = Route::new(path, access);
        self.routes.retain(|existing| existing.path != route.path);
        self.routes.push(route);
        self
    }

    /// Finds the route registered for `path`.
    ///
    /// Query strings, fragments and trailing slashes are ignored.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&Route> {
        let path = normalize(path);
        self.routes.iter().find(|route| route.path == path)
    }

    /// Iterates over the registered routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }
}

fn normalize(path: &str) -> &str {
    let path = path.trim();
    let path = path.split(['?', '#']).next().unwrap_or(path);
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}
