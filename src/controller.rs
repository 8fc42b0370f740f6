use crate::cards::{derive_card_state, CardState, Subsystem};
use crate::client::UpdateManagerApi;
use crate::error::DashboardError;
use crate::health::HealthResult;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::warn;

#[derive(Clone)]
pub struct CardController {
    api: Arc<dyn UpdateManagerApi>,
}

impl CardController {
    pub fn new(api: Arc<dyn UpdateManagerApi>) -> Self {
        Self { api }
    }

    /// One healthcheck read, normalized into a card. No retry.
    pub async fn fetch_card(&self, subsystem: Subsystem, host: &str) -> Result<CardState, DashboardError> {
        let body = self.api.healthcheck(subsystem.key()).await?;
        let result = HealthResult::from_response(&body, subsystem.key());
        Ok(derive_card_state(subsystem.spec(), &result, host))
    }

    /// Fetches every card concurrently. Results come back in
    /// `Subsystem::ALL` order whatever order the requests finish in.
    pub async fn fetch_all(&self, host: &str) -> Vec<(Subsystem, Result<CardState, DashboardError>)> {
        let mut tasks = JoinSet::new();
        for subsystem in Subsystem::ALL {
            let controller = self.clone();
            let host = host.to_string();
            tasks.spawn(async move { (subsystem, controller.fetch_card(subsystem, &host).await) });
        }

        let mut results = Vec::with_capacity(Subsystem::ALL.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(err) => warn!("healthcheck task aborted: {err}"),
            }
        }
        results.sort_by_key(|(subsystem, _)| *subsystem);
        results
    }
}
