use crate::error::DashboardError;
use crate::health::{HealthResult, HealthStatus};
use serde::Serialize;
use std::{fmt, str::FromStr};

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Subsystem {
    Aws,
    Airflow,
    System,
    Ui,
    Containers,
    Cron,
}

impl Subsystem {
    pub const ALL: [Subsystem; 6] = [
        Subsystem::Aws,
        Subsystem::Airflow,
        Subsystem::System,
        Subsystem::Ui,
        Subsystem::Containers,
        Subsystem::Cron,
    ];

    /// Path segment of the healthcheck endpoint, which is also the key
    /// of the sub-object in its response.
    pub fn key(self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::Airflow => "airflow",
            Self::System => "system",
            Self::Ui => "ui",
            Self::Containers => "containers",
            Self::Cron => "cron",
        }
    }

    pub fn spec(self) -> &'static CardSpec {
        // CARD_SPECS is laid out in Subsystem::ALL order.
        &CARD_SPECS[self as usize]
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Subsystem {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|subsystem| subsystem.key() == value)
            .ok_or_else(|| DashboardError::UnknownSubsystem(value.to_string()))
    }
}

/// What a card shows below its badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Scalar fields as `key：value` lines plus a configure affordance that
    /// edits them through the settings endpoint named by `settings_label`.
    Settable { settings_label: &'static str },
    /// Scalar fields as `key：value` lines, read-only.
    Listed,
    /// A single link to the subsystem's own UI on the dashboard's host.
    Link {
        scheme: &'static str,
        port: Option<u16>,
        path: &'static str,
        label: &'static str,
    },
    /// Running container count with a per-container detail view.
    Containers,
    /// Badge only.
    Hidden,
}

#[derive(Debug, Clone, Copy)]
pub struct CardSpec {
    pub subsystem: Subsystem,
    pub title: &'static str,
    pub rule: FieldRule,
    /// Label of a `Failed` badge; the original cards disagree on wording.
    pub failed_label: &'static str,
}

pub static CARD_SPECS: [CardSpec; 6] = [
    CardSpec {
        subsystem: Subsystem::Aws,
        title: "ECR Access",
        rule: FieldRule::Settable {
            settings_label: "ECR Access",
        },
        failed_label: "Failed",
    },
    CardSpec {
        subsystem: Subsystem::Airflow,
        title: "Airflow Status",
        rule: FieldRule::Link {
            scheme: "http",
            port: Some(9080),
            path: "",
            label: "open airflow in new tab",
        },
        failed_label: "not setup",
    },
    CardSpec {
        subsystem: Subsystem::System,
        title: "Server status",
        rule: FieldRule::Listed,
        failed_label: "not setup",
    },
    CardSpec {
        subsystem: Subsystem::Ui,
        title: "UI Status",
        rule: FieldRule::Link {
            scheme: "https",
            port: None,
            path: "/CMDB",
            label: "open UI in new tab",
        },
        failed_label: "Failed",
    },
    CardSpec {
        subsystem: Subsystem::Containers,
        title: "Docker Status",
        rule: FieldRule::Containers,
        failed_label: "not setup",
    },
    CardSpec {
        subsystem: Subsystem::Cron,
        title: "Cron Status",
        rule: FieldRule::Hidden,
        failed_label: "not setup",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BadgeKind {
    Success,
    NotSetup,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub kind: BadgeKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardField {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardLink {
    pub href: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerEntry {
    pub name: String,
    /// Full descriptor as pretty-printed JSON.
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerSummary {
    pub count: usize,
    pub entries: Vec<ContainerEntry>,
}

impl ContainerSummary {
    pub fn summary_text(&self) -> String {
        let noun = if self.count > 1 { "dockers" } else { "docker" };
        format!("{} {noun} running", self.count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardState {
    pub subsystem: Subsystem,
    pub title: String,
    pub badge: Badge,
    pub fields: Vec<CardField>,
    pub settable_keys: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<CardLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub containers: Option<ContainerSummary>,
}

/// Normalizes one healthcheck payload into a card. `host` is the hostname
/// the dashboard was reached on and only matters for link cards.
pub fn derive_card_state(spec: &CardSpec, result: &HealthResult, host: &str) -> CardState {
    let scalars = result.scalar_fields();
    let badge = derive_badge(spec, result, &scalars);

    let mut state = CardState {
        subsystem: spec.subsystem,
        title: spec.title.to_string(),
        badge,
        fields: Vec::new(),
        settable_keys: Vec::new(),
        settings_label: None,
        link: None,
        containers: None,
    };

    match spec.rule {
        FieldRule::Settable { settings_label } => {
            state.fields = display_fields(&scalars);
            state.settable_keys = scalars.iter().map(|(key, _)| key.to_string()).collect();
            state.settings_label = Some(settings_label.to_string());
        }
        FieldRule::Listed => {
            state.fields = display_fields(&scalars);
        }
        FieldRule::Link {
            scheme,
            port,
            path,
            label,
        } => {
            let port = port.map(|port| format!(":{port}")).unwrap_or_default();
            state.link = Some(CardLink {
                href: format!("{scheme}://{host}{port}{path}"),
                label: label.to_string(),
            });
        }
        FieldRule::Containers => {
            state.containers = Some(container_summary(result));
        }
        FieldRule::Hidden => {}
    }

    state
}

fn derive_badge(spec: &CardSpec, result: &HealthResult, scalars: &[(&str, String)]) -> Badge {
    if result.status() == HealthStatus::Ok {
        return Badge {
            kind: BadgeKind::Success,
            label: "operational".to_string(),
            tooltip: None,
        };
    }

    let tooltip = result.message().map(str::to_string);
    let never_configured = !result.has_status()
        || (spec.rule != FieldRule::Containers && scalars.iter().any(|(_, value)| value.is_empty()));

    if never_configured {
        Badge {
            kind: BadgeKind::NotSetup,
            label: "not setup".to_string(),
            tooltip,
        }
    } else {
        Badge {
            kind: BadgeKind::Failed,
            label: spec.failed_label.to_string(),
            tooltip,
        }
    }
}

fn display_fields(scalars: &[(&str, String)]) -> Vec<CardField> {
    scalars
        .iter()
        .map(|(key, value)| CardField {
            key: key.to_string(),
            value: if value.is_empty() {
                NOT_AVAILABLE.to_string()
            } else {
                value.clone()
            },
        })
        .collect()
}

fn container_summary(result: &HealthResult) -> ContainerSummary {
    let entries: Vec<ContainerEntry> = result
        .entries()
        .iter()
        .map(|entry| ContainerEntry {
            name: entry
                .get("name")
                .and_then(|name| name.as_str())
                .unwrap_or("unnamed")
                .to_string(),
            detail: serde_json::to_string_pretty(entry).unwrap_or_else(|_| entry.to_string()),
        })
        .collect();

    ContainerSummary {
        count: entries.len(),
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn card(subsystem: Subsystem, payload: Value) -> CardState {
        let mut body = serde_json::Map::new();
        body.insert(subsystem.key().to_string(), payload);
        let result = HealthResult::from_response(&Value::Object(body), subsystem.key());
        derive_card_state(subsystem.spec(), &result, "dash.local")
    }

    #[test]
    fn specs_line_up_with_subsystems() {
        for subsystem in Subsystem::ALL {
            assert_eq!(subsystem.spec().subsystem, subsystem);
            assert_eq!(subsystem.key().parse::<Subsystem>().ok(), Some(subsystem));
        }
        assert!("docker".parse::<Subsystem>().is_err());
    }

    #[test]
    fn ok_status_is_success_regardless_of_fields() {
        let state = card(
            Subsystem::Aws,
            json!({ "status": "OK", "access_key": "", "message": "stale" }),
        );
        assert_eq!(state.badge.kind, BadgeKind::Success);
        assert_eq!(state.badge.label, "operational");
        assert_eq!(state.badge.tooltip, None);
    }

    #[test]
    fn failed_with_empty_field_is_not_setup() {
        let state = card(
            Subsystem::Aws,
            json!({ "status": "FAILED", "message": "m", "access_key": "", "secret_key": "x" }),
        );
        assert_eq!(state.badge.kind, BadgeKind::NotSetup);
        assert_eq!(state.badge.label, "not setup");
        assert_eq!(state.badge.tooltip.as_deref(), Some("m"));
        assert_eq!(state.settable_keys, vec!["access_key", "secret_key"]);
        assert_eq!(
            state.fields,
            vec![
                CardField { key: "access_key".into(), value: "N/A".into() },
                CardField { key: "secret_key".into(), value: "x".into() },
            ]
        );
        assert_eq!(state.settings_label.as_deref(), Some("ECR Access"));
    }

    #[test]
    fn failed_with_all_fields_set_is_failed_with_message() {
        let state = card(
            Subsystem::Aws,
            json!({ "status": "FAILED", "message": "invalid token", "access_key": "AKIA", "secret_key": "x" }),
        );
        assert_eq!(state.badge.kind, BadgeKind::Failed);
        assert_eq!(state.badge.label, "Failed");
        assert_eq!(state.badge.tooltip.as_deref(), Some("invalid token"));
    }

    #[test]
    fn numbers_are_settable_but_nested_values_are_not() {
        let state = card(
            Subsystem::Aws,
            json!({ "status": "OK", "region": "eu", "retries": 2, "extra": { "a": 1 } }),
        );
        assert_eq!(state.settable_keys, vec!["region", "retries"]);
        assert_eq!(state.fields[1].value, "2");
    }

    #[test]
    fn empty_payload_renders_not_setup_without_tooltip() {
        let state = card(Subsystem::Cron, json!(null));
        assert_eq!(state.badge.kind, BadgeKind::NotSetup);
        assert_eq!(state.badge.label, "not setup");
        assert_eq!(state.badge.tooltip, None);
        assert!(state.fields.is_empty());
    }

    #[test]
    fn missing_status_is_not_setup_even_where_failure_says_failed() {
        for payload in [json!({}), json!("oops"), json!({ "access_key": "AKIA" })] {
            let state = card(Subsystem::Aws, payload);
            assert_eq!(state.badge.kind, BadgeKind::NotSetup);
            assert_eq!(state.badge.label, "not setup");
        }

        let docker = card(Subsystem::Containers, json!({ "data": [] }));
        assert_eq!(docker.badge.kind, BadgeKind::NotSetup);
    }

    #[test]
    fn empty_field_marks_any_listing_card_not_setup() {
        let system = card(
            Subsystem::System,
            json!({ "status": "FAILED", "message": "no agent", "hostname": "" }),
        );
        assert_eq!(system.badge.kind, BadgeKind::NotSetup);
        assert_eq!(system.badge.label, "not setup");
        assert_eq!(system.badge.tooltip.as_deref(), Some("no agent"));

        let ui = card(Subsystem::Ui, json!({ "status": "FAILED", "version": "" }));
        assert_eq!(ui.badge.kind, BadgeKind::NotSetup);
        assert_eq!(ui.badge.label, "not setup");

        let docker = card(Subsystem::Containers, json!({ "status": "FAILED", "daemon": "" }));
        assert_eq!(docker.badge.kind, BadgeKind::Failed);
    }

    #[test]
    fn listed_fields_are_not_settable() {
        let state = card(
            Subsystem::System,
            json!({ "status": "OK", "hostname": "box", "release": "" }),
        );
        assert_eq!(state.fields.len(), 2);
        assert_eq!(state.fields[1].value, "N/A");
        assert!(state.settable_keys.is_empty());
        assert!(state.settings_label.is_none());
    }

    #[test]
    fn link_cards_point_at_the_dashboard_host() {
        let airflow = card(Subsystem::Airflow, json!({ "status": "OK" }));
        assert_eq!(airflow.link.map(|link| link.href).as_deref(), Some("http://dash.local:9080"));

        let ui = card(Subsystem::Ui, json!({ "status": "FAILED", "message": "down" }));
        assert_eq!(ui.link.map(|link| link.href).as_deref(), Some("https://dash.local/CMDB"));
        assert_eq!(ui.badge.label, "Failed");
        assert_eq!(ui.badge.tooltip.as_deref(), Some("down"));
    }

    #[test]
    fn docker_summary_pluralizes() {
        let three = card(
            Subsystem::Containers,
            json!({ "status": "OK", "data": [{ "name": "a" }, { "name": "b" }, { "name": "c" }] }),
        );
        assert_eq!(three.badge.kind, BadgeKind::Success);
        let summary = three.containers.expect("summary");
        assert_eq!(summary.summary_text(), "3 dockers running");

        let one = card(Subsystem::Containers, json!({ "status": "OK", "data": [{ "name": "a" }] }));
        assert_eq!(one.containers.expect("summary").summary_text(), "1 docker running");
    }

    #[test]
    fn docker_badge_ignores_fields_and_count() {
        let state = card(
            Subsystem::Containers,
            json!({ "status": "FAILED", "message": "daemon down", "host": "", "data": [{ "name": "a" }] }),
        );
        assert_eq!(state.badge.kind, BadgeKind::Failed);
        assert_eq!(state.badge.label, "not setup");
        assert_eq!(state.containers.map(|summary| summary.count), Some(1));
    }

    #[test]
    fn docker_entries_carry_pretty_json_detail() {
        let state = card(
            Subsystem::Containers,
            json!({ "status": "OK", "data": [{ "name": "web", "state": "running" }, { "id": 7 }] }),
        );
        let summary = state.containers.expect("summary");
        assert_eq!(summary.entries[0].name, "web");
        assert!(summary.entries[0].detail.contains("\n  \"state\": \"running\""));
        assert_eq!(summary.entries[1].name, "unnamed");
    }
}
