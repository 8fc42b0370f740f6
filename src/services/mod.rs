use axum::http::{header, HeaderMap};

/// Hostname the browser used to reach the dashboard, without the port.
pub fn request_hostname(headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or("localhost");

    if host.starts_with('[') {
        // IPv6 literal, keep the brackets
        return match host.find(']') {
            Some(end) => host[..=end].to_string(),
            None => host.to_string(),
        };
    }

    host.split(':').next().unwrap_or(host).to_string()
}

pub fn current_datetime() -> String {
    let Ok(format) = time::format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second]") else {
        return "n/a".to_string();
    };
    let now = time::OffsetDateTime::now_local().unwrap_or_else(|_| time::OffsetDateTime::now_utc());
    now.format(&format).unwrap_or_else(|_| "n/a".to_string())
}
