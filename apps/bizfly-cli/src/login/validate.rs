//! Ticket validation against the CAS endpoint

use super::cas::ValidationResponse;
use super::LoginError;
use reqwest::Client;

/// Validates SSO tickets for one callback URL
#[derive(Debug, Clone)]
pub struct ServiceValidator {
    client: Client,
    validate_url: String,
    service_url: String,
}

impl ServiceValidator {
    pub fn new(client: Client, validate_url: String, service_url: String) -> Self {
        Self {
            client,
            validate_url,
            service_url,
        }
    }

    /// Exchange a ticket for the raw token carried in the CAS attributes
    ///
    /// The body is parsed whatever the HTTP status: CAS reports rejected
    /// tickets inside the XML, and anything else fails to parse.
    pub async fn validate(&self, ticket: &str) -> Result<String, LoginError> {
        tracing::debug!(url = %self.validate_url, "validating ticket");

        let response = self
            .client
            .get(&self.validate_url)
            .query(&[("ticket", ticket), ("service", self.service_url.as_str())])
            .send()
            .await
            .map_err(|e| LoginError::ValidationRequest(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LoginError::ValidationRequest(format!("failed to read response: {}", e)))?;

        // Body holds the root token: never log it.
        tracing::debug!(
            status = status.as_u16(),
            body_len = body.len(),
            "ticket validation response"
        );

        ValidationResponse::parse(&body)?.into_token(&body)
    }
}
