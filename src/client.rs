use crate::config::DashboardConfig;
use crate::error::DashboardError;
use serde_json::{Map, Value};
use tracing::debug;

pub const API_PREFIX: &str = "/update-manager/api";

/// The two halves of the update-manager API the dashboard talks to.
#[async_trait::async_trait]
pub trait UpdateManagerApi: Send + Sync {
    /// `GET {API_PREFIX}/healthcheck/{category}`, returning the raw JSON body.
    async fn healthcheck(&self, category: &str) -> Result<Value, DashboardError>;

    /// `POST {API_PREFIX}/{endpoint}` with a JSON object body. The response
    /// body only has to be JSON; its content is ignored.
    async fn post_settings(&self, endpoint: &str, body: &Map<String, Value>) -> Result<(), DashboardError>;
}

pub fn healthcheck_path(category: &str) -> String {
    format!("{API_PREFIX}/healthcheck/{category}")
}

pub fn settings_path(endpoint: &str) -> String {
    format!("{API_PREFIX}/{endpoint}")
}

#[derive(Clone)]
pub struct ReqwestUpdateManager {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestUpdateManager {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: trim_base(base_url.into()),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, DashboardError> {
        let mut builder = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.upstream_insecure_tls);
        if let Some(timeout) = config.upstream_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| DashboardError::Config(format!("failed to build http client: {err}")))?;
        Ok(Self {
            client,
            base_url: trim_base(config.upstream_url.clone()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn read_json(url: &str, response: reqwest::Response) -> Result<Value, DashboardError> {
        if !response.status().is_success() {
            return Err(DashboardError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let text = response.text().await.map_err(|source| DashboardError::Transport {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|err| DashboardError::MalformedResponse {
            url: url.to_string(),
            reason: err.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl UpdateManagerApi for ReqwestUpdateManager {
    async fn healthcheck(&self, category: &str) -> Result<Value, DashboardError> {
        let url = self.url(&healthcheck_path(category));
        debug!(%url, "fetching healthcheck");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| DashboardError::Transport {
                url: url.clone(),
                source,
            })?;
        Self::read_json(&url, response).await
    }

    async fn post_settings(&self, endpoint: &str, body: &Map<String, Value>) -> Result<(), DashboardError> {
        let url = self.url(&settings_path(endpoint));
        debug!(%url, keys = body.len(), "posting settings");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| DashboardError::Transport {
                url: url.clone(),
                source,
            })?;
        Self::read_json(&url, response).await.map(|_| ())
    }
}

fn trim_base(mut base_url: String) -> String {
    while base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}
