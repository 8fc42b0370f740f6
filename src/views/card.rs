use crate::views::dashboard::{card_container_id, SETTINGS_EDITOR_ID};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use update_dashboard::cards::{Badge, BadgeKind, CardState, ContainerSummary, Subsystem};

/// Card body in fixed order: title, badge, then the body the card's rule
/// asks for.
pub fn render_card(state: &CardState) -> String {
    let mut html = format!(
        r#"<h2 class="h5">{title}</h2>
        {badge}"#,
        title = text(&state.title),
        badge = render_badge(&state.badge),
    );

    if let Some(containers) = &state.containers {
        html.push_str(&render_containers(containers));
    } else if let Some(link) = &state.link {
        html.push_str(&format!(
            r#"<div class="card-content-list"><p><a href="{href}" target="_blank" rel="noopener">{label}</a></p></div>"#,
            href = attr(&link.href),
            label = text(&link.label),
        ));
    } else if !state.fields.is_empty() {
        let lines: String = state
            .fields
            .iter()
            .map(|field| format!("<p>{}：{}</p>", text(&field.key), text(&field.value)))
            .collect();
        html.push_str(&format!(r#"<div class="card-content-list">{lines}</div>"#));
    }

    if let Some(label) = &state.settings_label {
        html.push_str(&render_configure_button(label, &state.settable_keys));
    }

    html
}

/// Out-of-band replacement of one card slot. `None` clears the slot.
pub fn render_card_refresh(subsystem: Subsystem, state: Option<&CardState>) -> String {
    format!(
        r#"<div id="{id}" hx-swap-oob="innerHTML">{body}</div>"#,
        id = card_container_id(subsystem),
        body = state.map(render_card).unwrap_or_default(),
    )
}

fn render_badge(badge: &Badge) -> String {
    let (modifier, icon) = match badge.kind {
        BadgeKind::Success => ("success", "&#10003;"),
        BadgeKind::NotSetup => ("not-setup", "&#9888;"),
        BadgeKind::Failed => ("failed", "&#9888;"),
    };
    let title = match (&badge.kind, &badge.tooltip) {
        (BadgeKind::Success, _) | (_, None) => String::new(),
        (_, Some(tooltip)) => format!(r#" title="{}""#, attr(tooltip)),
    };
    format!(
        r#"<div class="card-status card-status--{modifier}"{title}><span aria-hidden="true">{icon}</span><span class="ms-2">{label}</span></div>"#,
        label = text(&badge.label),
    )
}

fn render_containers(summary: &ContainerSummary) -> String {
    let items: String = summary
        .entries
        .iter()
        .map(|entry| {
            format!(
                r#"<li><details><summary title="{detail}">{name}</summary><pre>{body}</pre></details></li>"#,
                detail = attr(&entry.detail),
                name = text(&entry.name),
                body = text(&entry.detail),
            )
        })
        .collect();

    format!(
        r#"<div class="card-content-list docker-detail">
          <details>
            <summary>{summary}</summary>
            <ul class="list-unstyled mt-2 mb-0">{items}</ul>
          </details>
        </div>"#,
        summary = text(&summary.summary_text()),
    )
}

fn render_configure_button(label: &str, keys: &[String]) -> String {
    let vals = serde_json::json!({ "label": label, "keys": keys });
    format!(
        r##"<div class="mt-auto pt-2">
          <button class="btn btn-sm btn-outline-light" type="button" hx-get="/partials/settings" hx-vals="{vals}" hx-target="#{editor}" hx-swap="innerHTML">Configure</button>
        </div>"##,
        vals = attr(&vals.to_string()),
        editor = SETTINGS_EDITOR_ID,
    )
}
