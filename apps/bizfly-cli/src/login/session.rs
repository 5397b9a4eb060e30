//! Endpoints and per-run URLs for the browser login

use super::LoginError;
use reqwest::Url;

/// Fixed local port the SSO service redirects back to
pub const DEFAULT_CALLBACK_PORT: u16 = 15995;

/// Path served by the local callback listener
pub const CALLBACK_PATH: &str = "/callback";

pub const DEFAULT_IDENTITY_URL: &str = "https://id.bizflycloud.vn";
pub const DEFAULT_MANAGEMENT_URL: &str = "https://manage.bizflycloud.vn";

/// Remote hosts and local port used by the login flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// SSO host serving `/login`
    pub identity_url: String,
    /// Management host serving `/cas/serviceValidate` and `/api/token`
    pub management_url: String,
    /// Local callback port; 0 picks a free one
    pub callback_port: u16,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            identity_url: DEFAULT_IDENTITY_URL.to_string(),
            management_url: DEFAULT_MANAGEMENT_URL.to_string(),
            callback_port: DEFAULT_CALLBACK_PORT,
        }
    }
}

impl Endpoints {
    pub fn service_validate_url(&self) -> String {
        format!(
            "{}/cas/serviceValidate",
            self.management_url.trim_end_matches('/')
        )
    }

    pub fn token_url(&self) -> String {
        format!("{}/api/token", self.management_url.trim_end_matches('/'))
    }
}

/// URLs for a single login run, derived from the bound callback port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSession {
    pub callback_url: String,
    pub login_url: String,
}

impl LoginSession {
    pub fn new(endpoints: &Endpoints, port: u16) -> Result<Self, LoginError> {
        let callback_url = format!("http://localhost:{}{}", port, CALLBACK_PATH);

        let base = format!("{}/login", endpoints.identity_url.trim_end_matches('/'));
        let login_url = Url::parse_with_params(&base, &[("service", callback_url.as_str())])
            .map_err(|e| LoginError::InvalidEndpoint {
                url: base.clone(),
                reason: e.to_string(),
            })?
            .to_string();

        Ok(Self {
            callback_url,
            login_url,
        })
    }
}
