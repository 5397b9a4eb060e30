//! CLI error types and exit codes

use crate::login::LoginError;
use thiserror::Error;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: General error (configuration, I/O)
/// - 2: Authentication failed
/// - 3: Network error
/// - 130: Cancelled by the user
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Login failed: {0}")]
    Login(#[from] LoginError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Login(e) => match e {
                LoginError::MissingTicket
                | LoginError::AuthenticationFailed { .. }
                | LoginError::MissingToken(_)
                | LoginError::EmptyExchangedToken => 2,
                LoginError::ValidationRequest(_)
                | LoginError::MalformedResponse(_)
                | LoginError::TokenExchange { .. }
                | LoginError::TokenExchangeRequest(_)
                | LoginError::TokenExchangeDecode(_)
                | LoginError::CallbackTimeout(_) => 3,
                LoginError::Cancelled => 130,
                LoginError::InvalidEndpoint { .. }
                | LoginError::Listen { .. }
                | LoginError::Server(_)
                | LoginError::Persist(_) => 1,
            },
            CliError::Config(_) | CliError::Io(_) => 1,
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    /// Get a suggested action for this error
    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::Login(LoginError::Listen { .. }) => {
                Some("Another 'bizfly login' may still be running. Close it and try again.")
            }
            CliError::Login(LoginError::MissingTicket)
            | CliError::Login(LoginError::AuthenticationFailed { .. }) => {
                Some("Run 'bizfly login' again and complete the sign-in in the browser.")
            }
            CliError::Login(LoginError::TokenExchange { .. })
            | CliError::Login(LoginError::EmptyExchangedToken) => {
                Some("Check that the project id is correct and that your account can access it.")
            }
            CliError::Login(LoginError::CallbackTimeout(_)) => {
                Some("Run 'bizfly login' again, or raise --timeout.")
            }
            CliError::Config(_) => Some("Check --config, --region and your ~/.bizfly.yaml."),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(e: serde_yaml::Error) -> Self {
        CliError::Config(format!("YAML error: {}", e))
    }
}
