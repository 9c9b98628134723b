//! [`AuthBackend`] over the bank's JSON API.
//!
//! The client keeps the ambient credential itself: with the cookie credential
//! the session cookie set by the login endpoint lives in reqwest's cookie
//! store and is replayed on every later request. Redirects are not followed,
//! because the session endpoint answers unauthenticated callers with a
//! redirect to the login view.

use std::time::Duration;

use async_trait::async_trait;
use bank_portal_session::{AuthBackend, BackendError, Identity, RegistrationProfile};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::{AmbientCredential, BackendConfig};
use crate::error::HttpSetupError;

/// Which endpoint a response came from; decides what a 401 means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Login,
    Logout,
    Session,
    Register,
    CreateUser,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Body of an error or confirmation response.
#[derive(Debug, Default, Deserialize)]
struct MessageBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP implementation of [`AuthBackend`].
#[derive(Debug, Clone)]
pub struct HttpAuthBackend {
    client: reqwest::Client,
    config: BackendConfig,
}

impl HttpAuthBackend {
    /// Builds a client for the configured bank API.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or bearer token is invalid, or the
    /// HTTP client cannot be constructed.
    pub fn new(config: BackendConfig) -> bank_portal_core::Result<Self, HttpSetupError> {
        reqwest::Url::parse(&config.base_url).map_err(|e| HttpSetupError::InvalidBaseUrl {
            url: config.base_url.clone(),
            details: e.to_string(),
        })?;

        let builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(config.timeout_seconds));

        let builder = match &config.credential {
            AmbientCredential::Cookie => builder.cookie_store(true),
            AmbientCredential::Bearer { token } => {
                let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|_| HttpSetupError::InvalidToken)?;
                value.set_sensitive(true);
                let mut headers = HeaderMap::new();
                headers.insert(AUTHORIZATION, value);
                builder.default_headers(headers)
            }
        };

        let client = builder.build().map_err(|e| HttpSetupError::ClientBuild {
            details: e.to_string(),
        })?;

        Ok(Self { client, config })
    }

    /// Returns the configuration this client was built from.
    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    async fn fetch_session(&self) -> Result<Identity, BackendError> {
        let response = self
            .client
            .get(self.config.endpoint(&self.config.session_path))
            .send()
            .await
            .map_err(network)?;

        if !response.status().is_success() {
            return Err(failure(Endpoint::Session, response).await);
        }
        read_identity(response).await
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> Result<Identity, BackendError> {
        let response = self
            .client
            .post(self.config.endpoint(&self.config.login_path))
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(network)?;

        if !response.status().is_success() {
            return Err(failure(Endpoint::Login, response).await);
        }

        // The login endpoint may answer with the identity itself or only a
        // confirmation message; in the latter case the session endpoint has it.
        let body = read_json(response).await?;
        if let Ok(identity) = Identity::from_json(body) {
            return Ok(identity);
        }

        debug!("login response carried no identity, fetching session");
        match self.fetch_session().await {
            Err(BackendError::NotAuthenticated) => Err(BackendError::MalformedPayload {
                reason: "login succeeded but no session was established".to_string(),
            }),
            other => other,
        }
    }

    #[instrument(skip(self))]
    async fn logout(&self) -> Result<(), BackendError> {
        let response = self
            .client
            .get(self.config.endpoint(&self.config.logout_path))
            .send()
            .await
            .map_err(network)?;

        if !response.status().is_success() {
            return Err(failure(Endpoint::Logout, response).await);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn validate_session(&self) -> Result<Identity, BackendError> {
        self.fetch_session().await
    }

    #[instrument(skip(self, profile), fields(username = %profile.username, role = %profile.role))]
    async fn register(&self, profile: &RegistrationProfile) -> Result<Identity, BackendError> {
        let response = self
            .client
            .post(self.config.endpoint(&self.config.register_path))
            .json(profile)
            .send()
            .await
            .map_err(network)?;

        if !response.status().is_success() {
            return Err(failure(Endpoint::Register, response).await);
        }
        read_identity(response).await
    }

    #[instrument(skip(self, profile), fields(username = %profile.username, role = %profile.role))]
    async fn create_user(&self, profile: &RegistrationProfile) -> Result<String, BackendError> {
        let response = self
            .client
            .post(self.config.endpoint(&self.config.create_user_path))
            .json(profile)
            .send()
            .await
            .map_err(network)?;

        if !response.status().is_success() {
            return Err(failure(Endpoint::CreateUser, response).await);
        }

        let body: MessageBody =
            response
                .json()
                .await
                .map_err(|e| BackendError::MalformedPayload {
                    reason: e.to_string(),
                })?;
        body.message.ok_or_else(|| BackendError::MalformedPayload {
            reason: "confirmation message missing".to_string(),
        })
    }
}

fn network(err: reqwest::Error) -> BackendError {
    BackendError::Network {
        reason: err.to_string(),
    }
}

async fn read_json(response: Response) -> Result<serde_json::Value, BackendError> {
    response
        .json()
        .await
        .map_err(|e| BackendError::MalformedPayload {
            reason: e.to_string(),
        })
}

async fn read_identity(response: Response) -> Result<Identity, BackendError> {
    let body = read_json(response).await?;
    Identity::from_json(body).map_err(|e| BackendError::MalformedPayload {
        reason: e.to_string(),
    })
}

/// Maps a non-success response to a backend error.
async fn failure(endpoint: Endpoint, response: Response) -> BackendError {
    let status = response.status();
    let body: MessageBody = response.json().await.unwrap_or_default();
    let message = body.error.or(body.message);

    debug!(?endpoint, %status, message = message.as_deref(), "request rejected");
    classify(endpoint, status, message)
}

fn classify(endpoint: Endpoint, status: StatusCode, message: Option<String>) -> BackendError {
    if status.is_redirection() {
        return BackendError::NotAuthenticated;
    }

    match status {
        StatusCode::UNAUTHORIZED if endpoint == Endpoint::Login => {
            BackendError::InvalidCredentials { message }
        }
        StatusCode::UNAUTHORIZED => BackendError::NotAuthenticated,
        StatusCode::FORBIDDEN => BackendError::Forbidden { message },
        StatusCode::CONFLICT => BackendError::Duplicate { message },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            let duplicate = message
                .as_deref()
                .is_some_and(|m| m.to_ascii_lowercase().contains("already exists"));
            if duplicate {
                BackendError::Duplicate { message }
            } else {
                BackendError::Validation { message }
            }
        }
        status => BackendError::Server {
            status: status.as_u16(),
            message,
        },
    }
}
