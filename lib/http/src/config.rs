//! Bank API connection configuration.

use serde::{Deserialize, Serialize};

/// How requests prove who the user is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AmbientCredential {
    /// Session cookie set by the login endpoint and replayed automatically.
    #[default]
    Cookie,
    /// Explicit bearer token attached to every request.
    Bearer {
        /// Token sent as `Authorization: Bearer <token>`.
        token: String,
    },
}

/// Connection settings for the bank API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the bank API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Credential attached to requests.
    #[serde(default)]
    pub credential: AmbientCredential,

    /// Email/password login endpoint.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Logout endpoint.
    #[serde(default = "default_logout_path")]
    pub logout_path: String,

    /// Endpoint returning the identity bound to the current session.
    #[serde(default = "default_session_path")]
    pub session_path: String,

    /// Self-service registration endpoint.
    #[serde(default = "default_register_path")]
    pub register_path: String,

    /// Admin-only account creation endpoint.
    #[serde(default = "default_create_user_path")]
    pub create_user_path: String,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_login_path() -> String {
    "/api/login".to_string()
}

fn default_logout_path() -> String {
    "/api/logout".to_string()
}

fn default_session_path() -> String {
    "/api/dashboard".to_string()
}

fn default_register_path() -> String {
    "/api/register".to_string()
}

fn default_create_user_path() -> String {
    "/api/admin/create-user".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            credential: AmbientCredential::default(),
            login_path: default_login_path(),
            logout_path: default_logout_path(),
            session_path: default_session_path(),
            register_path: default_register_path(),
            create_user_path: default_create_user_path(),
        }
    }
}

impl BackendConfig {
    /// Creates a configuration for `base_url` with default endpoints.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Joins an endpoint path onto the base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_config_has_correct_defaults() {
        let config = BackendConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.credential, AmbientCredential::Cookie);
        assert_eq!(config.session_path, "/api/dashboard");
        assert_eq!(config.create_user_path, "/api/admin/create-user");
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = BackendConfig::with_base_url("http://bank.test/");
        assert_eq!(config.endpoint("/api/login"), "http://bank.test/api/login");
        assert_eq!(config.endpoint("api/login"), "http://bank.test/api/login");
    }

    #[test]
    fn bearer_credential_deserializes() {
        let config: BackendConfig = serde_json::from_str(
            r#"{"base_url": "https://bank.test", "credential": {"kind": "bearer", "token": "abc"}}"#,
        )
        .expect("deserialize");
        assert_eq!(
            config.credential,
            AmbientCredential::Bearer {
                token: "abc".to_string()
            }
        );
        assert_eq!(config.login_path, "/api/login");
    }
}
