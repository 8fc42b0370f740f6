use crate::routes::AppState;
use crate::services::request_hostname;
use crate::views::card::render_card;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Html,
    Json,
};
use serde::Serialize;
use tracing::warn;
use update_dashboard::cards::{CardState, Subsystem};

/// One card partial. Upstream failures yield an empty fragment so the slot
/// stays blank.
pub async fn card_partial(
    State(state): State<AppState>,
    Path(subsystem): Path<String>,
    headers: HeaderMap,
) -> Result<Html<String>, (StatusCode, String)> {
    let subsystem = parse_subsystem(&subsystem)?;
    let host = request_hostname(&headers);
    match state.controller.fetch_card(subsystem, &host).await {
        Ok(card) => Ok(Html(render_card(&card))),
        Err(err) => {
            warn!(%subsystem, "healthcheck failed: {err}");
            Ok(Html(String::new()))
        }
    }
}

pub async fn card_api(
    State(state): State<AppState>,
    Path(subsystem): Path<String>,
    headers: HeaderMap,
) -> Result<Json<CardState>, (StatusCode, String)> {
    let subsystem = parse_subsystem(&subsystem)?;
    let host = request_hostname(&headers);
    state
        .controller
        .fetch_card(subsystem, &host)
        .await
        .map(Json)
        .map_err(|err| (StatusCode::BAD_GATEWAY, err.to_string()))
}

#[derive(Serialize)]
pub struct CardResponse {
    subsystem: Subsystem,
    #[serde(skip_serializing_if = "Option::is_none")]
    card: Option<CardState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn all_cards_api(State(state): State<AppState>, headers: HeaderMap) -> Json<Vec<CardResponse>> {
    let host = request_hostname(&headers);
    let cards = state
        .controller
        .fetch_all(&host)
        .await
        .into_iter()
        .map(|(subsystem, result)| match result {
            Ok(card) => CardResponse {
                subsystem,
                card: Some(card),
                error: None,
            },
            Err(err) => {
                warn!(%subsystem, "healthcheck failed: {err}");
                CardResponse {
                    subsystem,
                    card: None,
                    error: Some(err.to_string()),
                }
            }
        })
        .collect();
    Json(cards)
}

fn parse_subsystem(value: &str) -> Result<Subsystem, (StatusCode, String)> {
    value
        .parse::<Subsystem>()
        .map_err(|err| (StatusCode::NOT_FOUND, err.to_string()))
}
