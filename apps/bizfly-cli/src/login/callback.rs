//! Local HTTP listener receiving the SSO redirect
//!
//! Serves a single route, `GET /callback`. The first request that reaches
//! it decides the outcome of the login: the handler validates the ticket,
//! writes a plain-text status for the browser tab and hands the result to
//! the waiting flow over a one-shot channel. Later requests get `409`.

use super::session::CALLBACK_PATH;
use super::validate::ServiceValidator;
use super::LoginError;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

/// Token or error produced by the callback, delivered exactly once
pub type CallbackOutcome = Result<String, LoginError>;

const SUCCESS_MESSAGE: &str = "Login successful! You can close this window.";

#[derive(Debug, Deserialize)]
struct CallbackParams {
    ticket: Option<String>,
}

#[derive(Clone)]
struct CallbackState {
    validator: ServiceValidator,
    outcome: Arc<Mutex<Option<oneshot::Sender<CallbackOutcome>>>>,
}

/// Bind the callback listener on the loopback interface
pub async fn bind_listener(port: u16) -> Result<TcpListener, LoginError> {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    TcpListener::bind(addr)
        .await
        .map_err(|e| LoginError::Listen {
            addr: addr.to_string(),
            reason: e.to_string(),
        })
}

/// Running callback server
///
/// Call [`CallbackServer::shutdown`] to stop it gracefully. Dropping it
/// without doing so still releases the listener.
pub struct CallbackServer {
    local_addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl CallbackServer {
    /// Start serving `/callback` on `listener`
    ///
    /// Returns the server handle and the receiver the outcome arrives on.
    pub fn spawn(
        listener: TcpListener,
        validator: ServiceValidator,
    ) -> Result<(Self, oneshot::Receiver<CallbackOutcome>), LoginError> {
        let local_addr = listener
            .local_addr()
            .map_err(|e| LoginError::Server(e.to_string()))?;

        let (outcome_tx, outcome_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let state = CallbackState {
            validator,
            outcome: Arc::new(Mutex::new(Some(outcome_tx))),
        };
        let outcome = Arc::clone(&state.outcome);

        let app = Router::new()
            .route(CALLBACK_PATH, get(handle_callback))
            .with_state(state);

        let task = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;

            if let Err(e) = result {
                tracing::error!(error = %e, "callback server error");
                if let Some(tx) = outcome.lock().await.take() {
                    let _ = tx.send(Err(LoginError::Server(e.to_string())));
                }
            }
        });

        tracing::debug!(addr = %local_addr, "callback server listening");

        Ok((
            Self {
                local_addr,
                shutdown_tx: Some(shutdown_tx),
                task: Some(task),
            },
            outcome_rx,
        ))
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections, finish in-flight responses, release the port
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "callback server task failed");
            }
        }
        tracing::debug!(addr = %self.local_addr, "callback server stopped");
    }
}

impl Drop for CallbackServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn handle_callback(
    State(state): State<CallbackState>,
    params: Result<Query<CallbackParams>, QueryRejection>,
) -> (StatusCode, String) {
    let Some(outcome_tx) = state.outcome.lock().await.take() else {
        return (
            StatusCode::CONFLICT,
            "Login already handled. You can close this window.".to_string(),
        );
    };

    let ticket = params
        .ok()
        .and_then(|Query(p)| p.ticket)
        .filter(|t| !t.is_empty());

    let outcome = match ticket {
        Some(ticket) => state.validator.validate(&ticket).await,
        None => Err(LoginError::MissingTicket),
    };

    let response = match &outcome {
        Ok(_) => (StatusCode::OK, SUCCESS_MESSAGE.to_string()),
        Err(e) => failure_response(e),
    };

    if let Err(e) = &outcome {
        tracing::debug!(error = %e, "callback rejected");
    }

    // The receiver is gone only if the flow already gave up.
    let _ = outcome_tx.send(outcome);

    response
}

fn failure_response(error: &LoginError) -> (StatusCode, String) {
    match error {
        LoginError::MissingTicket => (
            StatusCode::BAD_REQUEST,
            "Login failed: No ticket found in callback request.".to_string(),
        ),
        LoginError::AuthenticationFailed { body, .. } => (
            StatusCode::UNAUTHORIZED,
            format!("Login failed: Authentication failed. Response: {}", body),
        ),
        other => (StatusCode::BAD_GATEWAY, format!("Login failed: {}", other)),
    }
}
