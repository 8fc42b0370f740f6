use crate::forms::LABEL_INPUT;
use crate::views::dashboard::SETTINGS_EDITOR_ID;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use update_dashboard::settings::SettingsEditor;

pub fn render_settings_editor(editor: &SettingsEditor) -> String {
    let inputs: String = editor
        .inputs
        .iter()
        .map(|key| {
            format!(
                r#"<input class="form-control settings-input" type="text" name="{key}" placeholder="{key}" autocomplete="off">"#,
                key = attr(key),
            )
        })
        .collect();

    format!(
        r##"<div class="card card-body settings-editor mt-4" role="dialog" aria-labelledby="settings-editor-title">
          <h2 class="h5" id="settings-editor-title">{label}</h2>
          <form hx-post="/partials/settings" hx-target="#{editor_id}" hx-swap="innerHTML">
            <input type="hidden" name="{label_input}" value="{label_value}">
            <div class="modal-main-content">{inputs}</div>
            <div class="d-flex gap-2 mt-2">
              <button class="btn btn-primary" type="submit">Save</button>
              <button class="btn btn-secondary" type="button" hx-get="/partials/settings/close" hx-target="#{editor_id}" hx-swap="innerHTML">Cancel</button>
            </div>
          </form>
        </div>"##,
        label = text(&editor.label),
        label_input = LABEL_INPUT,
        label_value = attr(&editor.label),
        inputs = inputs,
        editor_id = SETTINGS_EDITOR_ID,
    )
}

/// A closed editor is an empty slot.
pub fn render_closed_editor() -> String {
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_blank_input_per_key() {
        let editor = SettingsEditor::open("Reverse SSH", &["hostname".to_string(), "port".to_string()]);
        let html = render_settings_editor(&editor);
        assert!(html.contains(r#"name="hostname" placeholder="hostname""#));
        assert!(html.contains(r#"name="port" placeholder="port""#));
        assert!(!html.contains("value=\"\""));
        assert!(html.contains(r#"<input type="hidden" name="_label" value="Reverse SSH">"#));
        assert_eq!(html.matches("settings-input").count(), 2);
    }

    #[test]
    fn closed_editor_is_empty() {
        assert!(render_closed_editor().is_empty());
    }
}
