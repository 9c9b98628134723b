//! Views and the terminal navigator.
//!
//! The session core decides where the user goes; a [`Navigator`] shows it.

use bank_portal_session::{Identity, Navigation, NavigationConfig, Profile, SessionState};

/// Performs navigation decided by the route guard.
pub trait Navigator: Send + Sync {
    /// Shows the view at `path`.
    fn render(&self, path: &str, state: &SessionState);

    /// Announces that `from` was replaced by `to`.
    fn redirect(&self, from: &str, to: &str);

    /// Shows a neutral loading state while the session is being checked.
    fn pending(&self, path: &str);

    /// Reports a path with no view.
    fn not_found(&self, path: &str);

    /// Shows an inline message (form errors, confirmations).
    fn notice(&self, message: &str);
}

/// Applies a guard decision to a navigator.
pub fn apply(navigator: &dyn Navigator, navigation: &Navigation, state: &SessionState) {
    match navigation {
        Navigation::Render(path) => navigator.render(path, state),
        Navigation::Redirect { from, to } => {
            navigator.redirect(from, to);
            navigator.render(to, state);
        }
        Navigation::Pending(path) => navigator.pending(path),
        Navigation::NotFound(path) => navigator.not_found(path),
    }
}

/// Navigator that prints views to standard output.
#[derive(Debug, Default)]
pub struct TerminalNavigator {
    navigation: NavigationConfig,
}

impl TerminalNavigator {
    /// Creates a terminal navigator showing the core's views at the paths in
    /// `navigation`.
    #[must_use]
    pub fn new(navigation: NavigationConfig) -> Self {
        Self { navigation }
    }
}

impl Navigator for TerminalNavigator {
    fn render(&self, path: &str, state: &SessionState) {
        println!(
            "{}\n{}",
            nav_bar(state),
            view(path, state, &self.navigation)
        );
    }

    fn redirect(&self, from: &str, to: &str) {
        println!("-> {from} redirected to {to}");
    }

    fn pending(&self, path: &str) {
        println!("Loading {path}...");
    }

    fn not_found(&self, path: &str) {
        println!("404 - {path} not found");
    }

    fn notice(&self, message: &str) {
        println!("! {message}");
    }
}

/// The navigation bar line: identity badge or login hint.
#[must_use]
pub fn nav_bar(state: &SessionState) -> String {
    match state.identity() {
        Some(identity) => format!("[{}] | logout", badge(identity)),
        None => "[login | register]".to_string(),
    }
}

/// `<BADGE> <username>`, as shown in the navigation bar.
#[must_use]
pub fn badge(identity: &Identity) -> String {
    format!("{} {}", identity.role().badge(), identity.username())
}

/// Text of the view at `path`.
///
/// The login, unauthorized, admin and dashboard views are looked up at the
/// paths in `navigation`.
#[must_use]
pub fn view(path: &str, state: &SessionState, navigation: &NavigationConfig) -> String {
    match path {
        p if p == navigation.login_path => "Login\n  login <email> <password>".to_string(),
        p if p == navigation.unauthorized_path => format!(
            "403 - Forbidden\nYou are not authorized to view this page.\n  open {} to return to the dashboard",
            navigation.dashboard_path
        ),
        p if p == navigation.admin_landing_path => {
            "Create user\n  create-user <username> <email> <password> <customer|staff|admin>"
                .to_string()
        }
        p if p == navigation.dashboard_path => match state.identity() {
            Some(identity) => dashboard(identity),
            None => "Dashboard".to_string(),
        },
        "/register" => {
            "Register\n  register <username> <email> <password> <customer|staff|admin>".to_string()
        }
        "/loans" => "Loans".to_string(),
        "/transactions" => "Transactions".to_string(),
        other => other.to_string(),
    }
}

fn dashboard(identity: &Identity) -> String {
    let mut lines = vec![identity.welcome_message()];
    let field = |label: &str, value: &Option<String>| {
        value.as_ref().map(|value| format!("  {label}: {value}"))
    };

    match identity.profile() {
        Profile::Customer {
            account_number,
            address,
            national_id,
            savings_balance,
        } => {
            lines.extend(field("Account number", account_number));
            lines.extend(field("Address", address));
            lines.extend(field("National ID", national_id));
            if let Some(balance) = savings_balance {
                lines.push(format!("  Savings balance: {balance:.2}"));
            }
        }
        Profile::Staff {
            employee_id,
            department,
        } => {
            lines.extend(field("Employee ID", employee_id));
            lines.extend(field("Department", department));
        }
        Profile::Admin {
            access_level,
            is_superuser,
        } => {
            lines.extend(field("Access level", access_level));
            lines.push(format!("  Superuser: {}", if *is_superuser { "yes" } else { "no" }));
        }
    }

    lines.join("\n")
}
