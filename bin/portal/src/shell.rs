//! The interactive application shell.
//!
//! The shell owns the current view. Commands drive the session flows and
//! navigate explicitly; a watcher task re-checks the current view whenever the
//! session changes, which is how a view opened during the startup check gets
//! its real decision once the check settles.

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, PoisonError};

use bank_portal_session::{
    Access, AuthFlows, Navigation, RouteGuard, RouteRequirement, SessionState,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::command::{Command, USAGE};
use crate::navigator::{self, Navigator, badge};

/// Command loop over the session core.
pub struct Shell<N> {
    flows: AuthFlows,
    guard: RouteGuard,
    navigator: N,
    shown: Mutex<Option<Navigation>>,
}

impl<N: Navigator + 'static> Shell<N> {
    /// Creates a shell. Nothing is shown until the first [`open`](Self::open).
    pub fn new(flows: AuthFlows, guard: RouteGuard, navigator: N) -> Self {
        Self {
            flows,
            guard,
            navigator,
            shown: Mutex::new(None),
        }
    }

    /// Returns the navigator.
    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Returns the path of the view currently shown.
    pub fn current_path(&self) -> Option<String> {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(shown_path)
            .map(str::to_string)
    }

    /// Navigates to `path` using the current session state.
    pub fn open(&self, path: &str) -> Navigation {
        let state = self.flows.store().current();
        let navigation = self.guard.navigate(path, &state);
        self.show(navigation.clone(), &state);
        navigation
    }

    fn show(&self, navigation: Navigation, state: &SessionState) {
        navigator::apply(&self.navigator, &navigation, state);
        if !matches!(navigation, Navigation::NotFound(_)) {
            *self.shown.lock().unwrap_or_else(PoisonError::into_inner) = Some(navigation);
        }
    }

    /// Re-evaluates the current view if it is protected and its decision
    /// changed.
    fn refresh(&self) {
        let Some(previous) = self
            .shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        else {
            return;
        };
        let Some(path) = shown_path(&previous) else {
            return;
        };

        let protected = self
            .guard
            .table()
            .resolve(path)
            .is_some_and(|route| matches!(route.access(), Access::Protected(_)));
        if !protected {
            return;
        }

        let state = self.flows.store().current();
        let next = self.guard.navigate(path, &state);
        if next != previous {
            debug!(path, state = state.label(), "session changed, updating view");
            self.show(next, &state);
        }
    }

    /// Spawns the task that re-checks the current view on every session
    /// change. It ends when the store is torn down.
    pub fn spawn_watcher(self: &Arc<Self>) -> JoinHandle<()> {
        let shell = Arc::clone(self);
        let store = shell.flows.store().clone();
        let mut observer = store.subscribe();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = observer.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    () = store.closed() => break,
                }
                shell.refresh();
            }
            debug!("view watcher stopped");
        })
    }

    /// Runs one command.
    pub async fn execute(&self, command: Command) -> ControlFlow<()> {
        match command {
            Command::Empty => {}
            Command::Open(path) => {
                self.open(&path);
            }
            Command::Login { email, password } => match self.flows.login(&email, &password).await {
                Ok(outcome) => {
                    self.navigator.notice(&outcome.identity.welcome_message());
                    self.open(&outcome.landing);
                }
                Err(report) => self.navigator.notice(report.current_context().user_message()),
            },
            Command::Logout => {
                let next = self.flows.logout().await;
                self.open(&next);
            }
            Command::Register(profile) => match self.flows.register(&profile).await {
                Ok(outcome) => {
                    self.navigator.notice(&format!(
                        "Account {} created. Please log in.",
                        outcome.identity.username()
                    ));
                    self.open(&outcome.next);
                }
                Err(report) => self.navigator.notice(report.current_context().user_message()),
            },
            Command::CreateUser(profile) => match self.flows.create_user(&profile).await {
                Ok(message) => self.navigator.notice(&message),
                Err(report) => self.navigator.notice(report.current_context().user_message()),
            },
            Command::WhoAmI => {
                let message = match self.flows.store().current() {
                    SessionState::Authenticated(identity) => badge(&identity),
                    SessionState::Anonymous => "not logged in".to_string(),
                    SessionState::Unknown => "checking session...".to_string(),
                };
                self.navigator.notice(&message);
            }
            Command::Routes => {
                let listing: Vec<String> = self
                    .guard
                    .table()
                    .routes()
                    .map(|route| format!("{:<20} {}", route.path(), access_label(route.access())))
                    .collect();
                self.navigator.notice(&listing.join("\n"));
            }
            Command::Help => self.navigator.notice(USAGE),
            Command::Quit => {
                self.flows.store().teardown();
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Parses and runs one line of input.
    pub async fn run_line(&self, line: &str) -> ControlFlow<()> {
        match Command::parse(line) {
            Ok(command) => self.execute(command).await,
            Err(err) => {
                self.navigator.notice(&err.to_string());
                ControlFlow::Continue(())
            }
        }
    }

    /// Reads commands until `quit` or end of input, then tears the session
    /// store down.
    pub async fn run<R>(&self, input: R)
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if self.run_line(&line).await.is_break() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    warn!(error = %err, "failed to read input");
                    break;
                }
            }
        }
        self.flows.store().teardown();
    }
}

fn shown_path(navigation: &Navigation) -> Option<&str> {
    match navigation {
        Navigation::Pending(path) => Some(path.as_str()),
        other => other.destination(),
    }
}

fn access_label(access: Access) -> String {
    match access {
        Access::Public => "public".to_string(),
        Access::Protected(RouteRequirement::Any) => "any identity".to_string(),
        Access::Protected(RouteRequirement::Role(role)) => format!("{role} only"),
    }
}
