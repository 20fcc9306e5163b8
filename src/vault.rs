use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::KeywayError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote secret vault. Commands interact only with this trait.
pub trait Vault {
    /// Environment names configured for `repo` (`owner/name`).
    fn environments(&self, repo: &str) -> Result<Vec<String>, KeywayError>;

    /// Raw dotenv-formatted secrets for one environment.
    fn pull_secrets(&self, repo: &str, environment: &str) -> Result<String, KeywayError>;
}

#[derive(Debug, Deserialize)]
struct PullSecretsResponse {
    content: String,
}

#[derive(Debug, Deserialize)]
struct EnvironmentsResponse {
    environments: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Blocking HTTP client for the Keyway API.
pub struct HttpVault {
    client: Client,
    base_url: String,
    token: SecretString,
}

impl HttpVault {
    pub fn new(base_url: &str, token: SecretString) -> Result<Self, KeywayError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("keyway-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn pull_url(&self) -> String {
        format!("{}/v1/secrets/pull", self.base_url)
    }

    fn environments_url(&self, repo: &str) -> String {
        format!("{}/v1/vaults/{}/environments", self.base_url, repo)
    }

    fn send<T: for<'de> Deserialize<'de>>(&self, request: RequestBuilder) -> Result<T, KeywayError> {
        let response = request
            .bearer_auth(self.token.expose_secret())
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(KeywayError::Api {
                status: status.as_u16(),
                message: error_message(&body, status.canonical_reason()),
            });
        }
        Ok(response.json()?)
    }
}

impl Vault for HttpVault {
    fn environments(&self, repo: &str) -> Result<Vec<String>, KeywayError> {
        let url = self.environments_url(repo);
        tracing::debug!(%url, "listing vault environments");
        let body: EnvironmentsResponse = self.send(self.client.get(url))?;
        Ok(body.environments)
    }

    fn pull_secrets(&self, repo: &str, environment: &str) -> Result<String, KeywayError> {
        tracing::debug!(repo, environment, "pulling secrets");
        let request = self
            .client
            .get(self.pull_url())
            .query(&[("repo", repo), ("environment", environment)]);
        let body: PullSecretsResponse = self.send(request)?;
        Ok(body.content)
    }
}

/// Pick the most useful message out of an error response body.
fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(msg) = parsed.message.or(parsed.error).filter(|m| !m.is_empty()) {
            return msg;
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    reason.unwrap_or("request failed").to_string()
}
