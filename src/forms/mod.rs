/// Hidden input carrying the editor's subsystem label. Prefixed so it
/// cannot collide with a settable key.
pub const LABEL_INPUT: &str = "_label";

/// Query of the editor-open request. `keys` repeats once per settable key,
/// so a key may itself contain a comma.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SettingsEditorQuery {
    pub label: String,
    pub keys: Vec<String>,
}

impl SettingsEditorQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (name, value) in pairs {
            match name.as_str() {
                "label" => query.label = value,
                "keys" | "keys[]" => {
                    let key = value.trim();
                    if !key.is_empty() {
                        query.keys.push(key.to_string());
                    }
                }
                _ => {}
            }
        }
        query
    }
}

/// Splits the submitted editor form into its label and the remaining
/// inputs, keeping their order.
pub fn split_settings_form(form: Vec<(String, String)>) -> (String, Vec<(String, String)>) {
    let mut label = String::new();
    let mut inputs = Vec::with_capacity(form.len());
    for (name, value) in form {
        if name == LABEL_INPUT {
            label = value;
        } else {
            inputs.push((name, value));
        }
    }
    (label, inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn editor_query_keeps_each_key_whole() {
        let query = SettingsEditorQuery::from_pairs(pairs(&[
            ("label", "ECR Access"),
            ("keys", "access_key"),
            ("keys", "a,b"),
            ("keys", " "),
            ("other", "x"),
        ]));
        assert_eq!(query.label, "ECR Access");
        assert_eq!(query.keys, vec!["access_key".to_string(), "a,b".to_string()]);

        let bare = SettingsEditorQuery::from_pairs(pairs(&[("label", "Reverse SSH")]));
        assert!(bare.keys.is_empty());
    }

    #[test]
    fn splits_label_from_inputs() {
        let (label, inputs) = split_settings_form(vec![
            ("access_key".to_string(), "AKIA".to_string()),
            (LABEL_INPUT.to_string(), "ECR Access".to_string()),
            ("foo".to_string(), "bar".to_string()),
        ]);
        assert_eq!(label, "ECR Access");
        assert_eq!(
            inputs,
            vec![
                ("access_key".to_string(), "AKIA".to_string()),
                ("foo".to_string(), "bar".to_string()),
            ]
        );
    }
}
