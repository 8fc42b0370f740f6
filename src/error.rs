use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed: status {status}")]
    Status { url: String, status: u16 },

    #[error("malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("unknown subsystem `{0}`")]
    UnknownSubsystem(String),

    #[error("no settings endpoint for `{0}`")]
    UnroutedLabel(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
