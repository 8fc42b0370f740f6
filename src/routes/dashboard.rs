use crate::services::current_datetime;
use crate::views::dashboard::render_dashboard_page;
use axum::response::Html;

pub async fn dashboard_page() -> Html<String> {
    Html(render_dashboard_page(&current_datetime()))
}
