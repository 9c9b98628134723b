//! Route guard: decides whether a protected view may render.
//!
//! [`decide`] is the pure decision function. [`RouteGuard`] binds it to the
//! live store and the route table, and maps decisions onto navigation
//! targets.

use std::sync::Arc;

use bank_portal_core::Role;
use tracing::debug;

use crate::navigation::{Navigation, NavigationConfig};
use crate::routes::{Access, RouteTable};
use crate::state::SessionState;
use crate::store::SessionStore;

/// Role constraint declared by a protected view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRequirement {
    /// Any authenticated identity.
    Any,
    /// The identity's role must equal this role exactly.
    Role(Role),
}

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Session not settled; render nothing protected yet.
    Pending,
    /// Render the view.
    Allow,
    /// No identity; go to the login view.
    RedirectLogin,
    /// Identity present with the wrong role.
    RedirectUnauthorized,
}

/// Decides access for a protected view.
///
/// Rules, in order: `Unknown` is pending, `Anonymous` goes to login, a role
/// requirement must match the identity's role exactly, otherwise allow.
#[must_use]
pub fn decide(state: &SessionState, requirement: RouteRequirement) -> Decision {
    match (state, requirement) {
        (SessionState::Unknown, _) => Decision::Pending,
        (SessionState::Anonymous, _) => Decision::RedirectLogin,
        (SessionState::Authenticated(identity), RouteRequirement::Role(required))
            if identity.role() != required =>
        {
            Decision::RedirectUnauthorized
        }
        (SessionState::Authenticated(_), _) => Decision::Allow,
    }
}

/// Guard consulted on every navigation.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    store: SessionStore,
    table: Arc<RouteTable>,
    navigation: NavigationConfig,
}

impl RouteGuard {
    /// Creates a guard over `store` and `table`.
    #[must_use]
    pub fn new(store: SessionStore, table: RouteTable, navigation: NavigationConfig) -> Self {
        Self {
            store,
            table: Arc::new(table),
            navigation,
        }
    }

    /// Returns the route table.
    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Returns the navigation targets.
    #[must_use]
    pub fn navigation(&self) -> &NavigationConfig {
        &self.navigation
    }

    /// Decides navigation for `path` against the current state.
    ///
    /// May return [`Navigation::Pending`] while bootstrap is running.
    #[must_use]
    pub fn check(&self, path: &str) -> Navigation {
        self.navigate(path, &self.store.current())
    }

    /// Decides navigation for `path`, waiting for bootstrap to settle first.
    ///
    /// Navigations started while the session is `Unknown` all wait here and
    /// are evaluated against the settled state. Returns `Pending` only if the
    /// application is torn down before bootstrap completes.
    pub async fn resolve(&self, path: &str) -> Navigation {
        let state = self.store.settled().await;
        self.navigate(path, &state)
    }

    /// Decides navigation for `path` against an explicit state.
    #[must_use]
    pub fn navigate(&self, path: &str, state: &SessionState) -> Navigation {
        let Some(route) = self.table.resolve(path) else {
            debug!(path, "no route registered");
            return Navigation::NotFound(path.to_string());
        };

        let requirement = match route.access() {
            Access::Public => return Navigation::Render(route.path().to_string()),
            Access::Protected(requirement) => requirement,
        };

        let decision = decide(state, requirement);
        debug!(path = route.path(), state = state.label(), ?decision, "route guard decision");

        match decision {
            Decision::Pending => Navigation::Pending(route.path().to_string()),
            Decision::Allow => Navigation::Render(route.path().to_string()),
            Decision::RedirectLogin | Decision::RedirectUnauthorized => Navigation::Redirect {
                from: route.path().to_string(),
                to: self
                    .navigation
                    .redirect_for(decision)
                    .unwrap_or(&self.navigation.login_path)
                    .to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{Identity, Profile};
    use bank_portal_core::UserId;
    use std::time::Duration;

    fn identity_with(role: Role) -> Identity {
        let profile = match role {
            Role::Customer => Profile::customer(),
            Role::Staff => Profile::staff(),
            Role::Admin => Profile::admin(),
        };
        Identity::new(UserId::new(5), "alice", "alice@example.com", profile)
    }

    fn requirements() -> Vec<RouteRequirement> {
        std::iter::once(RouteRequirement::Any)
            .chain(Role::ALL.into_iter().map(RouteRequirement::Role))
            .collect()
    }

    #[test]
    fn unknown_is_always_pending() {
        for requirement in requirements() {
            assert_eq!(
                decide(&SessionState::Unknown, requirement),
                Decision::Pending
            );
        }
    }

    #[test]
    fn anonymous_always_redirects_to_login() {
        for requirement in requirements() {
            assert_eq!(
                decide(&SessionState::Anonymous, requirement),
                Decision::RedirectLogin
            );
        }
    }

    #[test]
    fn any_requirement_allows_every_role() {
        for role in Role::ALL {
            let state = SessionState::Authenticated(identity_with(role));
            assert_eq!(decide(&state, RouteRequirement::Any), Decision::Allow);
        }
    }

    #[test]
    fn role_requirement_is_exact_match() {
        for held in Role::ALL {
            for required in Role::ALL {
                let state = SessionState::Authenticated(identity_with(held));
                let expected = if held == required {
                    Decision::Allow
                } else {
                    Decision::RedirectUnauthorized
                };
                assert_eq!(
                    decide(&state, RouteRequirement::Role(required)),
                    expected,
                    "held {held}, required {required}"
                );
            }
        }
    }

    #[test]
    fn admin_does_not_imply_staff() {
        let state = SessionState::Authenticated(identity_with(Role::Admin));
        assert_eq!(
            decide(&state, RouteRequirement::Role(Role::Staff)),
            Decision::RedirectUnauthorized
        );
    }

    #[test]
    fn customer_scenario() {
        let state = SessionState::Authenticated(identity_with(Role::Customer));
        assert_eq!(
            decide(&state, RouteRequirement::Role(Role::Admin)),
            Decision::RedirectUnauthorized
        );
        assert_eq!(
            decide(&state, RouteRequirement::Role(Role::Customer)),
            Decision::Allow
        );
    }

    fn guard(store: &SessionStore) -> RouteGuard {
        RouteGuard::new(
            store.clone(),
            RouteTable::bank(&NavigationConfig::default()),
            NavigationConfig::default(),
        )
    }

    #[test]
    fn check_maps_decisions_to_navigation() {
        let store = SessionStore::new();
        let guard = guard(&store);

        assert_eq!(guard.check("/"), Navigation::Pending("/".to_string()));
        assert_eq!(
            guard.check("/login"),
            Navigation::Render("/login".to_string())
        );
        assert_eq!(
            guard.check("/nowhere"),
            Navigation::NotFound("/nowhere".to_string())
        );

        store.set(SessionState::Anonymous);
        assert_eq!(
            guard.check("/loans"),
            Navigation::Redirect {
                from: "/loans".to_string(),
                to: "/login".to_string()
            }
        );

        store.set(SessionState::Authenticated(identity_with(Role::Staff)));
        assert_eq!(
            guard.check("/admin/create-user"),
            Navigation::Redirect {
                from: "/admin/create-user".to_string(),
                to: "/unauthorized".to_string()
            }
        );
        assert_eq!(guard.check("/"), Navigation::Render("/".to_string()));
    }

    #[test]
    fn redirects_land_on_registered_views_with_custom_paths() {
        let store = SessionStore::new();
        let navigation = NavigationConfig {
            login_path: "/signin".to_string(),
            unauthorized_path: "/forbidden".to_string(),
            ..NavigationConfig::default()
        };
        let guard = RouteGuard::new(store.clone(), RouteTable::bank(&navigation), navigation);

        store.set(SessionState::Anonymous);
        assert_eq!(
            guard.check("/loans"),
            Navigation::Redirect {
                from: "/loans".to_string(),
                to: "/signin".to_string()
            }
        );
        assert_eq!(
            guard.check("/signin"),
            Navigation::Render("/signin".to_string())
        );

        store.set(SessionState::Authenticated(identity_with(Role::Staff)));
        assert_eq!(
            guard.check("/loans"),
            Navigation::Redirect {
                from: "/loans".to_string(),
                to: "/forbidden".to_string()
            }
        );
        assert_eq!(
            guard.check("/forbidden"),
            Navigation::Render("/forbidden".to_string())
        );
    }

    #[tokio::test]
    async fn concurrent_navigations_wait_for_bootstrap() {
        let store = SessionStore::new();
        let guard = guard(&store);

        let waiting: Vec<_> = ["/", "/loans", "/admin/create-user"]
            .into_iter()
            .map(|path| {
                let guard = guard.clone();
                tokio::spawn(async move { guard.resolve(path).await })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(waiting.iter().all(|task| !task.is_finished()));

        store.set(SessionState::Authenticated(identity_with(Role::Customer)));

        let mut results = Vec::new();
        for task in waiting {
            results.push(task.await.expect("join"));
        }
        assert_eq!(
            results,
            vec![
                Navigation::Render("/".to_string()),
                Navigation::Render("/loans".to_string()),
                Navigation::Redirect {
                    from: "/admin/create-user".to_string(),
                    to: "/unauthorized".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn resolve_is_pending_when_torn_down_before_settling() {
        let store = SessionStore::new();
        let guard = guard(&store);
        store.teardown();
        assert_eq!(guard.resolve("/").await, Navigation::Pending("/".to_string()));
    }
}
