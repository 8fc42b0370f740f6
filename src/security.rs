use crate::routes::AppState;
use axum::{
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{distributions::Alphanumeric, Rng};
use rcgen::{CertificateParams, SanType};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Checks an `Authorization: Basic ...` header value.
    pub fn matches_header(&self, value: &str) -> bool {
        let Some(encoded) = value.strip_prefix("Basic ") else {
            return false;
        };
        let Ok(decoded) = STANDARD.decode(encoded.trim()) else {
            return false;
        };
        let Ok(decoded) = String::from_utf8(decoded) else {
            return false;
        };
        match decoded.split_once(':') {
            Some((username, password)) => username == self.username && password == self.password,
            None => false,
        }
    }
}

pub fn credentials_path(data_dir: &Path) -> PathBuf {
    data_dir.join("credentials.json")
}

pub fn cert_path(data_dir: &Path) -> PathBuf {
    data_dir.join("certs").join("update-dashboard.crt.pem")
}

pub fn key_path(data_dir: &Path) -> PathBuf {
    data_dir.join("certs").join("update-dashboard.key.pem")
}

/// Loads the dashboard login, generating and persisting one on first
/// start. The flag is true when the credentials were just created.
pub async fn load_or_create_credentials(data_dir: &Path) -> Result<(Credentials, bool), String> {
    let path = credentials_path(data_dir);
    match tokio::fs::read_to_string(&path).await {
        Ok(contents) => {
            let creds = serde_json::from_str(&contents)
                .map_err(|err| format!("failed to parse credentials: {err}"))?;
            Ok((creds, false))
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let creds = Credentials {
                username: "admin".to_string(),
                password: random_token(20),
            };
            save_credentials(&path, &creds).await?;
            Ok((creds, true))
        }
        Err(err) => Err(format!("failed to read credentials: {err}")),
    }
}

pub async fn save_credentials(path: &Path, creds: &Credentials) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|err| format!("failed to create credentials dir: {err}"))?;
    }
    let data = serde_json::to_string_pretty(creds)
        .map_err(|err| format!("failed to serialize credentials: {err}"))?;
    tokio::fs::write(path, data)
        .await
        .map_err(|err| format!("failed to write credentials: {err}"))
}

pub async fn ensure_tls_cert(cert_path: &Path, key_path: &Path) -> Result<(), String> {
    if tokio::fs::metadata(cert_path).await.is_ok() && tokio::fs::metadata(key_path).await.is_ok() {
        return Ok(());
    }

    if let Some(parent) = cert_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|err| format!("failed to create cert dir: {err}"))?;
    }

    let mut params = CertificateParams::new(vec!["localhost".to_string()]);
    params
        .subject_alt_names
        .push(SanType::IpAddress(IpAddr::V4(Ipv4Addr::LOCALHOST)));
    let cert = rcgen::Certificate::from_params(params)
        .map_err(|err| format!("failed to create cert: {err}"))?;

    let cert_pem = cert.serialize_pem().map_err(|err| format!("failed to serialize cert: {err}"))?;
    let key_pem = cert.serialize_private_key_pem();

    tokio::fs::write(cert_path, cert_pem)
        .await
        .map_err(|err| format!("failed to write cert: {err}"))?;
    tokio::fs::write(key_path, key_pem)
        .await
        .map_err(|err| format!("failed to write key: {err}"))?;
    Ok(())
}

/// Basic-auth gate for everything except `/health`. A state without
/// credentials lets every request through.
pub async fn require_basic_auth<B>(
    State(state): State<AppState>,
    request: Request<B>,
    next: Next<B>,
) -> Response {
    let Some(credentials) = state.credentials.as_deref() else {
        return next.run(request).await;
    };

    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| credentials.matches_header(value))
        .unwrap_or(false);

    if authorized {
        return next.run(request).await;
    }

    if request.headers().contains_key(header::AUTHORIZATION) {
        warn!(path = %request.uri().path(), "rejected dashboard login");
    }
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"update-dashboard\"")],
        "authentication required",
    )
        .into_response()
}

fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
