//! Login flow errors
//!
//! Every variant is terminal for the flow. Nothing here is retried.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("invalid endpoint URL {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("failed to start local server on {addr}: {reason}")]
    Listen { addr: String, reason: String },

    #[error("no ticket found in callback")]
    MissingTicket,

    #[error("failed to validate ticket: {0}")]
    ValidationRequest(String),

    #[error("failed to parse validation response: {0}")]
    MalformedResponse(String),

    #[error("authentication failed ({code}): {message}")]
    AuthenticationFailed {
        code: String,
        message: String,
        /// Raw validation response, kept for diagnostics
        body: String,
    },

    #[error("{0}")]
    MissingToken(String),

    #[error("token exchange failed with status {status}: {body}")]
    TokenExchange { status: u16, body: String },

    #[error("failed to exchange token: {0}")]
    TokenExchangeRequest(String),

    #[error("failed to decode token exchange response: {0}")]
    TokenExchangeDecode(String),

    #[error("received empty token from exchange")]
    EmptyExchangedToken,

    #[error("failed to save config: {0}")]
    Persist(String),

    #[error("callback server error: {0}")]
    Server(String),

    #[error("no callback received within {}s", .0.as_secs())]
    CallbackTimeout(Duration),

    #[error("login cancelled")]
    Cancelled,
}
