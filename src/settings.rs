use crate::cards::{CardState, Subsystem};
use crate::client::UpdateManagerApi;
use crate::controller::CardController;
use crate::error::DashboardError;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Form input names that are forwarded to the update manager, and the
/// parameter each one becomes. Everything else is dropped.
const INPUT_PARAMETERS: [(&str, &str); 2] = [
    ("access_key", "aws_access_key"),
    ("secret_key", "aws_secret_key"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsTarget {
    Aws,
    ReverseSsh,
}

impl SettingsTarget {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "ECR Access" => Some(Self::Aws),
            "Reverse SSH" => Some(Self::ReverseSsh),
            _ => None,
        }
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::ReverseSsh => "reverse_ssh",
        }
    }

    /// The card to re-fetch after a successful save. Only the AWS card is
    /// refreshed.
    pub fn refreshes(self) -> Option<Subsystem> {
        match self {
            Self::Aws => Some(Subsystem::Aws),
            Self::ReverseSsh => None,
        }
    }
}

/// Maps raw form inputs onto the update-manager body. A repeated input
/// name keeps its last value.
pub fn map_settings_inputs<'a, I>(inputs: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut params = Map::new();
    for (name, value) in inputs {
        match INPUT_PARAMETERS.iter().find(|(input, _)| *input == name) {
            Some((_, parameter)) => {
                params.insert(parameter.to_string(), Value::String(value.to_string()));
            }
            None => debug!(input = name, "dropping unsupported settings input"),
        }
    }
    params
}

/// An open settings editor: one blank input per key, never pre-filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsEditor {
    pub label: String,
    pub inputs: Vec<String>,
}

impl SettingsEditor {
    pub fn open(label: &str, keys: &[String]) -> Self {
        Self {
            label: label.to_string(),
            inputs: keys.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    pub target: SettingsTarget,
    pub refresh: Option<Subsystem>,
}

#[derive(Debug)]
pub struct SavedSettings {
    pub outcome: SaveOutcome,
    /// The re-fetched card, if the target has one and the re-fetch worked.
    pub refreshed: Option<CardState>,
}

#[derive(Clone)]
pub struct SettingsUpdater {
    api: Arc<dyn UpdateManagerApi>,
}

impl SettingsUpdater {
    pub fn new(api: Arc<dyn UpdateManagerApi>) -> Self {
        Self { api }
    }

    pub async fn submit<'a, I>(&self, label: &str, inputs: I) -> Result<SaveOutcome, DashboardError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let target = SettingsTarget::from_label(label)
            .ok_or_else(|| DashboardError::UnroutedLabel(label.to_string()))?;
        let params = map_settings_inputs(inputs);
        self.api.post_settings(target.endpoint(), &params).await?;
        info!(endpoint = target.endpoint(), "settings saved");
        Ok(SaveOutcome {
            target,
            refresh: target.refreshes(),
        })
    }

    /// Submits and, on success, re-fetches the one card the target
    /// refreshes. A failed re-fetch leaves `refreshed` empty.
    pub async fn save_and_refresh<'a, I>(
        &self,
        controller: &CardController,
        label: &str,
        inputs: I,
        host: &str,
    ) -> Result<SavedSettings, DashboardError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let outcome = self.submit(label, inputs).await?;
        let refreshed = match outcome.refresh {
            Some(subsystem) => match controller.fetch_card(subsystem, host).await {
                Ok(state) => Some(state),
                Err(err) => {
                    warn!(%subsystem, "refresh after settings save failed: {err}");
                    None
                }
            },
            None => None,
        };
        Ok(SavedSettings { outcome, refreshed })
    }
}
