use crate::error::DashboardError;
use std::{net::SocketAddr, path::PathBuf, time::Duration};

const DEFAULT_UPSTREAM_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_BIND: &str = "0.0.0.0:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub upstream_url: String,
    pub upstream_timeout: Option<Duration>,
    pub upstream_insecure_tls: bool,
    pub bind: SocketAddr,
    pub tls: bool,
    pub auth: bool,
    pub web_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, DashboardError> {
        let upstream_url = env_string("UPDATE_MANAGER_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());
        if !upstream_url.starts_with("http://") && !upstream_url.starts_with("https://") {
            return Err(DashboardError::Config(format!(
                "UPDATE_MANAGER_URL must be an http(s) url, got `{upstream_url}`"
            )));
        }

        let timeout_secs = match env_string("UPDATE_MANAGER_TIMEOUT_SECS") {
            Some(value) => value.parse::<u64>().map_err(|_| {
                DashboardError::Config(format!("UPDATE_MANAGER_TIMEOUT_SECS must be a number, got `{value}`"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let bind_raw = env_string("DASHBOARD_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .parse::<SocketAddr>()
            .map_err(|err| DashboardError::Config(format!("DASHBOARD_BIND `{bind_raw}`: {err}")))?;

        Ok(Self {
            upstream_url,
            upstream_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            upstream_insecure_tls: env_flag("UPDATE_MANAGER_INSECURE_TLS", false)?,
            bind,
            tls: env_flag("DASHBOARD_TLS", true)?,
            auth: env_flag("DASHBOARD_AUTH", true)?,
            web_dir: env_string("DASHBOARD_WEB_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("web")),
            data_dir: env_string("DASHBOARD_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(data_dir),
        })
    }
}

/// Platform config directory for generated credentials and certificates.
pub fn data_dir() -> PathBuf {
    if let Ok(appdata) = std::env::var("APPDATA") {
        return PathBuf::from(appdata).join("update-dashboard");
    }
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("update-dashboard");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config").join("update-dashboard");
    }
    PathBuf::from("update-dashboard-data")
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_flag(name: &str, default: bool) -> Result<bool, DashboardError> {
    match env_string(name).map(|value| value.to_ascii_lowercase()) {
        None => Ok(default),
        Some(value) => match value.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(DashboardError::Config(format!("{name} must be true or false, got `{value}`"))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const VARS: [&str; 8] = [
        "UPDATE_MANAGER_URL",
        "UPDATE_MANAGER_TIMEOUT_SECS",
        "UPDATE_MANAGER_INSECURE_TLS",
        "DASHBOARD_BIND",
        "DASHBOARD_TLS",
        "DASHBOARD_AUTH",
        "DASHBOARD_WEB_DIR",
        "DASHBOARD_DATA_DIR",
    ];

    fn with_env<T>(values: &[(&str, &str)], check: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().expect("env lock");
        let original: Vec<(&str, Option<String>)> =
            VARS.iter().map(|name| (*name, std::env::var(name).ok())).collect();
        for name in VARS {
            std::env::remove_var(name);
        }
        for (name, value) in values {
            std::env::set_var(name, value);
        }

        let result = check();

        for (name, value) in original {
            match value {
                Some(value) => std::env::set_var(name, value),
                None => std::env::remove_var(name),
            }
        }
        result
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = with_env(&[], DashboardConfig::from_env).expect("config");
        assert_eq!(config.upstream_url, "http://127.0.0.1:8000");
        assert_eq!(config.upstream_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.bind, "0.0.0.0:3000".parse::<SocketAddr>().expect("addr"));
        assert!(config.tls);
        assert!(config.auth);
        assert!(!config.upstream_insecure_tls);
        assert!(config.web_dir.ends_with("web"));
    }

    #[test]
    fn reads_overrides() {
        let config = with_env(
            &[
                ("UPDATE_MANAGER_URL", "https://manager.internal"),
                ("UPDATE_MANAGER_TIMEOUT_SECS", "0"),
                ("DASHBOARD_TLS", "off"),
                ("DASHBOARD_AUTH", "No"),
                ("DASHBOARD_DATA_DIR", "/tmp/dash"),
            ],
            DashboardConfig::from_env,
        )
        .expect("config");
        assert_eq!(config.upstream_url, "https://manager.internal");
        assert_eq!(config.upstream_timeout, None);
        assert!(!config.tls);
        assert!(!config.auth);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/dash"));
    }

    #[test]
    fn rejects_invalid_values() {
        let err = with_env(&[("DASHBOARD_TLS", "maybe")], DashboardConfig::from_env)
            .expect_err("flag should fail");
        assert!(err.to_string().contains("DASHBOARD_TLS"));

        let err = with_env(&[("UPDATE_MANAGER_URL", "ftp://x")], DashboardConfig::from_env)
            .expect_err("url should fail");
        assert!(matches!(err, DashboardError::Config(_)));

        assert!(with_env(&[("DASHBOARD_BIND", "nowhere")], DashboardConfig::from_env).is_err());
    }
}
