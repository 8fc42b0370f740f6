mod forms;
mod routes;
mod security;
mod services;
mod views;

use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use update_dashboard::{client::ReqwestUpdateManager, config::DashboardConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(message) = run().await {
        error!("{message}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let config = DashboardConfig::from_env().map_err(|err| err.to_string())?;
    let api = ReqwestUpdateManager::from_config(&config).map_err(|err| err.to_string())?;
    info!(upstream = %api.base_url(), "using update manager");

    let credentials = if config.auth {
        let (credentials, created) = security::load_or_create_credentials(&config.data_dir).await?;
        if created {
            info!(
                username = %credentials.username,
                password = %credentials.password,
                path = %security::credentials_path(&config.data_dir).display(),
                "generated dashboard credentials"
            );
        }
        Some(credentials)
    } else {
        warn!("basic auth disabled");
        None
    };

    let state = routes::AppState::new(Arc::new(api), credentials);
    let app = routes::build_router(state, &config.web_dir);

    if config.tls {
        let cert_path = security::cert_path(&config.data_dir);
        let key_path = security::key_path(&config.data_dir);
        security::ensure_tls_cert(&cert_path, &key_path).await?;
        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(cert_path, key_path)
            .await
            .map_err(|err| format!("failed to load TLS certificates: {err}"))?;

        info!("dashboard listening on https://{}", config.bind);
        axum_server::bind_rustls(config.bind, tls_config)
            .serve(app.into_make_service())
            .await
            .map_err(|err| format!("server failed: {err}"))
    } else {
        info!("dashboard listening on http://{}", config.bind);
        axum::Server::bind(&config.bind)
            .serve(app.into_make_service())
            .await
            .map_err(|err| format!("server failed: {err}"))
    }
}
