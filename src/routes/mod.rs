pub mod cards;
pub mod dashboard;
pub mod health;
pub mod settings;

use crate::security::{require_basic_auth, Credentials};
use axum::{middleware, routing::get, Router};
use std::{path::Path, sync::Arc};
use tower_http::services::ServeDir;
use update_dashboard::{client::UpdateManagerApi, controller::CardController, settings::SettingsUpdater};

#[derive(Clone)]
pub struct AppState {
    pub controller: CardController,
    pub updater: SettingsUpdater,
    /// `None` disables basic auth.
    pub credentials: Option<Arc<Credentials>>,
}

impl AppState {
    pub fn new(api: Arc<dyn UpdateManagerApi>, credentials: Option<Credentials>) -> Self {
        Self {
            controller: CardController::new(api.clone()),
            updater: SettingsUpdater::new(api),
            credentials: credentials.map(Arc::new),
        }
    }
}

pub fn build_router(state: AppState, web_dir: &Path) -> Router {
    let protected = Router::new()
        .route("/", get(dashboard::dashboard_page))
        .route("/partials/cards/:subsystem", get(cards::card_partial))
        .route(
            "/partials/settings",
            get(settings::open_editor).post(settings::save_settings),
        )
        .route("/partials/settings/close", get(settings::close_editor))
        .route("/api/cards", get(cards::all_cards_api))
        .route("/api/cards/:subsystem", get(cards::card_api))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_basic_auth));

    Router::new()
        .merge(protected)
        .route("/health", get(health::health))
        .nest_service("/web", ServeDir::new(web_dir))
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use axum::{body::Body, http::Request, response::Response};
    use serde_json::{json, Map, Value};
    use std::sync::Mutex;
    use tower::ServiceExt;
    use update_dashboard::error::DashboardError;

    /// Canned update manager that records every call.
    #[derive(Default)]
    pub struct StubApi {
        pub healthchecks: Mutex<Vec<String>>,
        pub posts: Mutex<Vec<(String, Map<String, Value>)>>,
        pub fail_healthchecks: bool,
        pub fail_posts: bool,
    }

    #[async_trait::async_trait]
    impl UpdateManagerApi for StubApi {
        async fn healthcheck(&self, category: &str) -> Result<Value, DashboardError> {
            self.healthchecks.lock().expect("lock").push(category.to_string());
            if self.fail_healthchecks {
                return Err(DashboardError::Status {
                    url: format!("stub/{category}"),
                    status: 500,
                });
            }
            Ok(match category {
                "aws" => json!({ "aws": { "status": "FAILED", "message": "no creds", "access_key": "", "secret_key": "" } }),
                "containers" => json!({ "containers": { "status": "OK", "data": [{ "name": "web" }] } }),
                other => {
                    let mut body = Map::new();
                    body.insert(other.to_string(), json!({ "status": "OK" }));
                    Value::Object(body)
                }
            })
        }

        async fn post_settings(&self, endpoint: &str, body: &Map<String, Value>) -> Result<(), DashboardError> {
            self.posts.lock().expect("lock").push((endpoint.to_string(), body.clone()));
            if self.fail_posts {
                return Err(DashboardError::Status {
                    url: format!("stub/{endpoint}"),
                    status: 422,
                });
            }
            Ok(())
        }
    }

    pub fn router(api: Arc<StubApi>, credentials: Option<Credentials>) -> Router {
        let web_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("web");
        build_router(AppState::new(api, credentials), &web_dir)
    }

    pub async fn send(router: Router, request: Request<Body>) -> Response {
        router.oneshot(request).await.expect("router response")
    }

    pub async fn body_text(response: Response) -> String {
        let bytes = hyper::body::to_bytes(response.into_body()).await.expect("body");
        String::from_utf8(bytes.to_vec()).expect("utf8 body")
    }
}
