//! Startup reconciliation with any existing server-side session.
//!
//! The bootstrapper asks the backend whether the ambient credential still
//! identifies someone and records the answer in the store. Until it settles,
//! the store stays `Unknown` and the route guard defers every decision.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, instrument};

use crate::backend::AuthBackend;
use crate::error::ErrorKind;
use crate::state::SessionState;
use crate::store::SessionStore;

/// Runs the startup session check once per application lifetime.
pub struct SessionBootstrapper {
    backend: Arc<dyn AuthBackend>,
    store: SessionStore,
    started: AtomicBool,
}

impl SessionBootstrapper {
    /// Creates a bootstrapper writing into `store`.
    #[must_use]
    pub fn new(backend: Arc<dyn AuthBackend>, store: SessionStore) -> Self {
        Self {
            backend,
            store,
            started: AtomicBool::new(false),
        }
    }

    /// Validates the existing session and settles the store.
    ///
    /// Never fails: any validation error means "not logged in" and leaves the
    /// store `Anonymous`. Only the first call talks to the backend; later
    /// calls return the current state. If the store is torn down while the
    /// validate call is in flight, its result is dropped unwritten.
    #[instrument(skip(self))]
    pub async fn run(&self) -> SessionState {
        if self.started.swap(true, Ordering::SeqCst) {
            debug!("bootstrap already ran");
            return self.store.current();
        }

        let outcome = tokio::select! {
            outcome = self.backend.validate_session() => outcome,
            () = self.store.closed() => {
                debug!("application torn down during bootstrap, discarding validate result");
                return self.store.current();
            }
        };

        let next = match outcome {
            Ok(identity) => {
                info!(
                    username = %identity.username(),
                    role = %identity.role(),
                    "restored existing session"
                );
                SessionState::Authenticated(identity)
            }
            Err(err) if err.kind() == ErrorKind::SessionExpired => {
                debug!("no existing session");
                SessionState::Anonymous
            }
            Err(err) => {
                info!(error = %err, "session validation failed, continuing logged out");
                SessionState::Anonymous
            }
        };

        self.store.set(next);
        self.store.current()
    }

    /// Returns true once [`run`](Self::run) has been called.
    #[must_use]
    pub fn has_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, RegistrationProfile};
    use crate::guard::{Decision, RouteRequirement, decide};
    use crate::identity::{Identity, Profile};
    use async_trait::async_trait;
    use bank_portal_core::{Role, UserId};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Backend whose validate call returns a fixed answer, optionally after a delay.
    struct ValidateOnly {
        answer: Result<Identity, BackendError>,
        delay: Option<Duration>,
        calls: Mutex<u32>,
    }

    impl ValidateOnly {
        fn returning(answer: Result<Identity, BackendError>) -> Self {
            Self {
                answer,
                delay: None,
                calls: Mutex::new(0),
            }
        }

        fn delayed(answer: Result<Identity, BackendError>, delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::returning(answer)
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl AuthBackend for ValidateOnly {
        async fn login(&self, _email: &str, _password: &str) -> Result<Identity, BackendError> {
            unreachable!("bootstrap never logs in")
        }

        async fn logout(&self) -> Result<(), BackendError> {
            unreachable!("bootstrap never logs out")
        }

        async fn validate_session(&self) -> Result<Identity, BackendError> {
            *self.calls.lock().unwrap() += 1;
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.answer.clone()
        }

        async fn register(&self, _profile: &RegistrationProfile) -> Result<Identity, BackendError> {
            unreachable!("bootstrap never registers")
        }

        async fn create_user(&self, _profile: &RegistrationProfile) -> Result<String, BackendError> {
            unreachable!("bootstrap never creates users")
        }
    }

    fn alice() -> Identity {
        Identity::new(
            UserId::new(1),
            "alice",
            "alice@example.com",
            Profile::customer(),
        )
    }

    #[tokio::test]
    async fn valid_session_becomes_authenticated() {
        let store = SessionStore::new();
        let backend = Arc::new(ValidateOnly::returning(Ok(alice())));
        let bootstrapper = SessionBootstrapper::new(backend, store.clone());

        let state = bootstrapper.run().await;

        assert_eq!(state, SessionState::Authenticated(alice()));
        assert_eq!(store.current().role(), Some(Role::Customer));
    }

    #[tokio::test]
    async fn minimal_customer_session_is_restored() {
        let identity = Identity::from_json(serde_json::json!({
            "username": "alice",
            "role": "customer"
        }))
        .expect("minimal payload");
        let store = SessionStore::new();
        let backend = Arc::new(ValidateOnly::returning(Ok(identity.clone())));
        let bootstrapper = SessionBootstrapper::new(backend, store.clone());

        let state = bootstrapper.run().await;

        assert_eq!(state, SessionState::Authenticated(identity));
        assert_eq!(
            decide(&state, RouteRequirement::Role(Role::Admin)),
            Decision::RedirectUnauthorized
        );
        assert_eq!(
            decide(&state, RouteRequirement::Role(Role::Customer)),
            Decision::Allow
        );
    }

    #[tokio::test]
    async fn not_authenticated_becomes_anonymous() {
        let store = SessionStore::new();
        let backend = Arc::new(ValidateOnly::returning(Err(BackendError::NotAuthenticated)));
        let bootstrapper = SessionBootstrapper::new(backend, store.clone());

        assert_eq!(bootstrapper.run().await, SessionState::Anonymous);
        assert_eq!(store.current(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn network_and_malformed_failures_are_swallowed() {
        for failure in [
            BackendError::Network {
                reason: "connection refused".to_string(),
            },
            BackendError::MalformedPayload {
                reason: "missing role".to_string(),
            },
            BackendError::Server {
                status: 500,
                message: None,
            },
        ] {
            let store = SessionStore::new();
            let backend = Arc::new(ValidateOnly::returning(Err(failure)));
            let bootstrapper = SessionBootstrapper::new(backend, store.clone());

            assert_eq!(bootstrapper.run().await, SessionState::Anonymous);
        }
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let store = SessionStore::new();
        let backend = Arc::new(ValidateOnly::returning(Ok(alice())));
        let bootstrapper = SessionBootstrapper::new(backend.clone(), store.clone());

        let first = bootstrapper.run().await;
        let second = bootstrapper.run().await;

        assert_eq!(first, second);
        assert_eq!(backend.calls(), 1);
        assert!(bootstrapper.has_started());
    }

    #[tokio::test]
    async fn repeating_bootstrap_with_same_answer_is_idempotent() {
        let store = SessionStore::new();
        let backend = Arc::new(ValidateOnly::returning(Ok(alice())));

        SessionBootstrapper::new(backend.clone(), store.clone())
            .run()
            .await;
        let once = store.current();
        SessionBootstrapper::new(backend, store.clone()).run().await;

        assert_eq!(store.current(), once);
    }

    #[tokio::test]
    async fn store_is_unknown_until_validate_returns() {
        let store = SessionStore::new();
        let backend = Arc::new(ValidateOnly::delayed(Ok(alice()), Duration::from_millis(50)));
        let bootstrapper = Arc::new(SessionBootstrapper::new(backend, store.clone()));

        let task = {
            let bootstrapper = bootstrapper.clone();
            tokio::spawn(async move { bootstrapper.run().await })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(store.current(), SessionState::Unknown);

        task.await.expect("join");
        assert!(store.current().is_authenticated());
    }

    #[tokio::test]
    async fn teardown_mid_bootstrap_discards_result() {
        let store = SessionStore::new();
        let backend = Arc::new(ValidateOnly::delayed(Ok(alice()), Duration::from_millis(50)));
        let bootstrapper = Arc::new(SessionBootstrapper::new(backend, store.clone()));

        let task = {
            let bootstrapper = bootstrapper.clone();
            tokio::spawn(async move { bootstrapper.run().await })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;
        store.teardown();

        assert_eq!(task.await.expect("join"), SessionState::Unknown);
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(store.current(), SessionState::Unknown);
    }
}
