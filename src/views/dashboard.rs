use crate::views::layout::render_layout;
use update_dashboard::cards::Subsystem;

pub const SETTINGS_EDITOR_ID: &str = "settings-editor";

pub fn card_container_id(subsystem: Subsystem) -> String {
    format!("card-{}", subsystem.key())
}

/// Six empty card slots, each loading its own partial once the page is up.
/// The requests are independent; a slot whose request fails stays empty.
pub fn render_dashboard_page(loaded_at: &str) -> String {
    let mut slots = String::new();
    for subsystem in Subsystem::ALL {
        slots.push_str(&format!(
            r#"<div class="col-md-6 col-xl-4">
            <div id="{id}" class="card card-body status-card" hx-get="/partials/cards/{key}" hx-trigger="load" hx-swap="innerHTML"></div>
          </div>"#,
            id = card_container_id(subsystem),
            key = subsystem.key(),
        ));
    }

    let content = format!(
        r#"<div class="d-flex justify-content-between align-items-baseline mb-3">
          <h1 class="h3 mb-0">System Status</h1>
          <span class="small text-muted">Loaded {loaded_at}</span>
        </div>
        <div class="row g-3">
          {slots}
        </div>
        <div id="{editor_id}"></div>"#,
        loaded_at = html_escape::encode_text(loaded_at),
        slots = slots,
        editor_id = SETTINGS_EDITOR_ID,
    );

    render_layout("Update Manager Setup", &content)
}
