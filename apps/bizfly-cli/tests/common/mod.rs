//! Shared helpers for integration tests

#![allow(dead_code)]

use bizfly_cli::login::{Endpoints, LoginError, LoginFlow, LoginOutcome, UrlOpener};
use reqwest::Url;
use serde_json::Value;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock management host plus a scratch directory for the config file
pub struct TestContext {
    pub server: MockServer,
    pub temp_dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Endpoints pointing at the mock server, with an ephemeral callback port
    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            identity_url: "https://id.example.test".to_string(),
            management_url: self.server.uri(),
            callback_port: 0,
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join(".bizfly.yaml")
    }

    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.config_path(), contents).expect("Failed to write config");
    }

    pub fn read_config(&self) -> Option<String> {
        std::fs::read_to_string(self.config_path()).ok()
    }

    pub fn read_config_yaml(&self) -> serde_yaml::Mapping {
        let contents = self.read_config().expect("config file missing");
        serde_yaml::from_str(&contents).expect("config is not valid YAML")
    }

    /// CAS endpoint answering `ticket` with `xml`
    pub async fn mock_service_validate(&self, ticket: &str, xml: &str) {
        Mock::given(method("GET"))
            .and(path("/cas/serviceValidate"))
            .and(query_param("ticket", ticket))
            .respond_with(ResponseTemplate::new(200).set_body_string(xml))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// CAS endpoint that must never be called
    pub async fn mock_service_validate_unused(&self) {
        Mock::given(method("GET"))
            .and(path("/cas/serviceValidate"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.server)
            .await;
    }

    /// Token exchange endpoint answering with `status` and JSON `body`
    pub async fn mock_token_exchange(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Token exchange endpoint that must never be called
    pub async fn mock_token_exchange_unused(&self) {
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.server)
            .await;
    }
}

/// CAS success document carrying `token`
pub fn cas_success(token: &str) -> String {
    format!(
        r#"<cas:serviceResponse xmlns:cas="http://www.yale.edu/tp/cas">
    <cas:authenticationSuccess>
        <cas:user>dev@example.com</cas:user>
        <cas:attributes>
            <cas:token>{}</cas:token>
        </cas:attributes>
    </cas:authenticationSuccess>
</cas:serviceResponse>"#,
        token
    )
}

/// CAS failure document
pub fn cas_failure(code: &str, message: &str) -> String {
    format!(
        r#"<cas:serviceResponse xmlns:cas="http://www.yale.edu/tp/cas">
    <cas:authenticationFailure code="{}">{}</cas:authenticationFailure>
</cas:serviceResponse>"#,
        code, message
    )
}

/// Browser stand-in that hands the login URL to the test
pub struct RecordingBrowser {
    urls: mpsc::UnboundedSender<String>,
    fail: bool,
}

impl RecordingBrowser {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (urls, rx) = mpsc::unbounded_channel();
        (Self { urls, fail: false }, rx)
    }

    /// Records the URL, then reports that no browser could be launched
    pub fn failing() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (urls, rx) = mpsc::unbounded_channel();
        (Self { urls, fail: true }, rx)
    }
}

impl UrlOpener for RecordingBrowser {
    fn open_url(&self, url: &str) -> io::Result<()> {
        let _ = self.urls.send(url.to_string());
        if self.fail {
            Err(io::Error::new(io::ErrorKind::NotFound, "xdg-open not found"))
        } else {
            Ok(())
        }
    }
}

/// What the browser tab showed after the redirect
#[derive(Debug)]
pub struct BrowserPage {
    pub status: u16,
    pub body: String,
}

/// Callback URL embedded as `service` in the SSO login URL
pub fn callback_url(login_url: &str) -> String {
    let url = Url::parse(login_url).expect("login URL is not a URL");
    let service = url
        .query_pairs()
        .find(|(k, _)| k == "service")
        .map(|(_, v)| v.to_string())
        .expect("login URL has no service parameter");
    // The listener is IPv4 loopback only
    service.replace("localhost", "127.0.0.1")
}

/// Play the browser: wait for the login URL, then hit the callback with `query`
pub async fn redirect_to_callback(
    urls: &mut mpsc::UnboundedReceiver<String>,
    query: &str,
) -> BrowserPage {
    let login_url = tokio::time::timeout(Duration::from_secs(5), urls.recv())
        .await
        .expect("browser was never opened")
        .expect("browser channel closed");

    let response = reqwest::get(format!("{}{}", callback_url(&login_url), query))
        .await
        .expect("callback request failed");

    BrowserPage {
        status: response.status().as_u16(),
        body: response.text().await.expect("callback body unreadable"),
    }
}

/// Run `flow` to completion while a simulated browser follows the redirect
pub async fn run_login(
    flow: LoginFlow<RecordingBrowser>,
    mut urls: mpsc::UnboundedReceiver<String>,
    query: &str,
) -> (Result<LoginOutcome, LoginError>, BrowserPage) {
    let handle = tokio::spawn(async move { flow.run().await });
    let page = redirect_to_callback(&mut urls, query).await;
    let result = handle.await.expect("login task panicked");
    (result, page)
}
