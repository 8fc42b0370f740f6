use crate::forms::{split_settings_form, SettingsEditorQuery};
use crate::routes::AppState;
use crate::services::request_hostname;
use crate::views::card::render_card_refresh;
use crate::views::settings::{render_closed_editor, render_settings_editor};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use tracing::warn;
use update_dashboard::settings::SettingsEditor;

pub async fn open_editor(Query(pairs): Query<Vec<(String, String)>>) -> Html<String> {
    let query = SettingsEditorQuery::from_pairs(pairs);
    Html(render_settings_editor(&SettingsEditor::open(&query.label, &query.keys)))
}

pub async fn close_editor() -> Html<String> {
    Html(render_closed_editor())
}

/// Saves the editor. Success closes it and, for targets that have a card,
/// swaps in a freshly fetched one. Failure answers 204 so htmx swaps
/// nothing and the open editor keeps what was typed.
pub async fn save_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<Vec<(String, String)>>,
) -> Response {
    let (label, inputs) = split_settings_form(form);
    let host = request_hostname(&headers);
    let pairs = inputs.iter().map(|(name, value)| (name.as_str(), value.as_str()));

    match state
        .updater
        .save_and_refresh(&state.controller, &label, pairs, &host)
        .await
    {
        Ok(saved) => {
            let mut html = render_closed_editor();
            if let Some(subsystem) = saved.outcome.refresh {
                html.push_str(&render_card_refresh(subsystem, saved.refreshed.as_ref()));
            }
            Html(html).into_response()
        }
        Err(err) => {
            warn!(label = %label, "settings save failed: {err}");
            StatusCode::NO_CONTENT.into_response()
        }
    }
}
