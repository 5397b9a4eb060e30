//! Browser-based SSO login
//!
//! One run of [`LoginFlow::run`] goes through these steps:
//! 1. Bind the local callback listener
//! 2. Open the SSO page with the callback URL as `service`
//! 3. Wait for the redirect carrying a ticket
//! 4. Validate the ticket against CAS and pull out the token
//! 5. Optionally exchange it for a project-scoped token
//! 6. Write the token to the settings file as `auth_token`
//!
//! The listener is stopped before the exchange, whichever way the wait
//! ended. Nothing is written to disk unless every step succeeded.

pub mod browser;
pub mod callback;
pub mod cas;
mod error;
pub mod exchange;
pub mod session;
pub mod validate;

pub use browser::{NoBrowser, SystemBrowser, UrlOpener};
pub use error::LoginError;
pub use session::{Endpoints, LoginSession};

use crate::config::{ConfigFile, AUTH_TOKEN_KEY};
use crate::output::{print_info, print_warning};
use callback::{CallbackOutcome, CallbackServer};
use exchange::{TokenExchanger, EXCHANGE_TIMEOUT};
use reqwest::Client;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::oneshot;
use validate::ServiceValidator;

/// What a successful login persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub token: String,
    /// Token was exchanged for a project-scoped one
    pub project_scoped: bool,
    pub config_path: PathBuf,
}

/// Interactive SSO login
pub struct LoginFlow<O> {
    endpoints: Endpoints,
    project_id: Option<String>,
    config_path: PathBuf,
    opener: O,
    callback_timeout: Option<Duration>,
    exchange_timeout: Duration,
}

impl<O: UrlOpener> LoginFlow<O> {
    pub fn new(endpoints: Endpoints, config_path: PathBuf, opener: O) -> Self {
        Self {
            endpoints,
            project_id: None,
            config_path,
            opener,
            callback_timeout: None,
            exchange_timeout: EXCHANGE_TIMEOUT,
        }
    }

    /// Scope the resulting token to a project
    pub fn with_project_id(mut self, project_id: Option<String>) -> Self {
        self.project_id = project_id.filter(|p| !p.is_empty());
        self
    }

    /// Give up waiting for the browser after `timeout`
    pub fn with_callback_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.callback_timeout = timeout;
        self
    }

    /// Bound on the project-scope exchange round trip
    pub fn with_exchange_timeout(mut self, timeout: Duration) -> Self {
        self.exchange_timeout = timeout;
        self
    }

    pub async fn run(&self) -> Result<LoginOutcome, LoginError> {
        let listener = callback::bind_listener(self.endpoints.callback_port).await?;
        let port = listener
            .local_addr()
            .map_err(|e| LoginError::Server(e.to_string()))?
            .port();

        let session = LoginSession::new(&self.endpoints, port)?;
        let validator = ServiceValidator::new(
            Client::new(),
            self.endpoints.service_validate_url(),
            session.callback_url.clone(),
        );
        let (server, outcome_rx) = CallbackServer::spawn(listener, validator)?;

        tracing::info!(port, url = %session.login_url, "waiting for SSO callback");

        match self.opener.open_url(&session.login_url) {
            Ok(()) => print_info(&format!("Opening browser to login: {}", session.login_url)),
            Err(e) if e.kind() == io::ErrorKind::Unsupported => {
                browser::display_login_url(&session.login_url);
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to open browser");
                print_warning(&format!("Failed to open browser: {}", e));
                browser::display_login_url(&session.login_url);
            }
        }

        let outcome = self.wait_for_callback(outcome_rx).await;
        server.shutdown().await;
        let token = outcome?;

        let (token, project_scoped) = match &self.project_id {
            Some(project_id) => {
                let exchanger =
                    TokenExchanger::new(self.endpoints.token_url(), self.exchange_timeout)?;
                let scoped = exchanger.exchange(&token, project_id).await?;
                if scoped.unchanged {
                    print_warning(
                        "Token did not change after exchange. The API returned the same token.",
                    );
                }
                (scoped.token, true)
            }
            None => (token, false),
        };

        self.persist(&token)?;

        Ok(LoginOutcome {
            token,
            project_scoped,
            config_path: self.config_path.clone(),
        })
    }

    async fn wait_for_callback(
        &self,
        outcome_rx: oneshot::Receiver<CallbackOutcome>,
    ) -> CallbackOutcome {
        let deadline = async {
            match self.callback_timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            outcome = outcome_rx => outcome.unwrap_or_else(|_| {
                Err(LoginError::Server("callback server stopped unexpectedly".to_string()))
            }),
            _ = deadline => Err(LoginError::CallbackTimeout(
                self.callback_timeout.unwrap_or_default(),
            )),
            Ok(()) = tokio::signal::ctrl_c() => Err(LoginError::Cancelled),
        }
    }

    fn persist(&self, token: &str) -> Result<(), LoginError> {
        let mut config =
            ConfigFile::load(&self.config_path).map_err(|e| LoginError::Persist(e.to_string()))?;
        config.set_str(AUTH_TOKEN_KEY, token);
        config.save().map_err(|e| LoginError::Persist(e.to_string()))
    }
}
