//! Root token to project-scoped token exchange

use super::LoginError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound for the exchange round trip
pub const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
pub struct TokenExchangeRequest<'a> {
    pub auth_method: &'static str,
    pub token: &'a str,
    pub project_id: &'a str,
}

/// Token object returned by `/api/token`
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangedToken {
    #[serde(default)]
    pub keystone_token: String,
}

/// Result of a successful exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedToken {
    pub token: String,
    /// The service handed back the token it was given
    pub unchanged: bool,
}

#[derive(Debug, Clone)]
pub struct TokenExchanger {
    client: Client,
    token_url: String,
}

impl TokenExchanger {
    /// Client for `token_url` whose requests give up after `timeout`
    pub fn new(token_url: String, timeout: Duration) -> Result<Self, LoginError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                LoginError::TokenExchangeRequest(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, token_url })
    }

    /// Trade `token` for one scoped to `project_id`
    pub async fn exchange(&self, token: &str, project_id: &str) -> Result<ScopedToken, LoginError> {
        let request = TokenExchangeRequest {
            auth_method: "token",
            token,
            project_id,
        };

        tracing::debug!(url = %self.token_url, project_id, "exchanging token");

        let response = self
            .client
            .post(&self.token_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LoginError::TokenExchangeRequest("request timed out".to_string())
                } else {
                    LoginError::TokenExchangeRequest(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LoginError::TokenExchange {
                status: status.as_u16(),
                body,
            });
        }

        let exchanged: ExchangedToken = response
            .json()
            .await
            .map_err(|e| LoginError::TokenExchangeDecode(e.to_string()))?;

        if exchanged.keystone_token.is_empty() {
            return Err(LoginError::EmptyExchangedToken);
        }

        let unchanged = exchanged.keystone_token == token;
        if unchanged {
            tracing::warn!(project_id, "token did not change after exchange");
        }

        Ok(ScopedToken {
            token: exchanged.keystone_token,
            unchanged,
        })
    }
}
