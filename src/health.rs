use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Ok,
    Failed,
}

impl HealthStatus {
    /// Anything other than the literal `"OK"` counts as a failure,
    /// including a missing `status` key.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("OK") => Self::Ok,
            _ => Self::Failed,
        }
    }
}

/// One subsystem's healthcheck payload, kept in the key order the
/// update manager sent it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthResult {
    fields: Map<String, Value>,
}

impl HealthResult {
    /// Pulls `body[key]` out of a healthcheck response. A missing key or a
    /// non-object value yields an empty result.
    pub fn from_response(body: &Value, key: &str) -> Self {
        let fields = body
            .get(key)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        Self { fields }
    }

    pub fn status(&self) -> HealthStatus {
        HealthStatus::from_value(self.fields.get("status"))
    }

    /// False for a missing or malformed sub-object, which the update
    /// manager sends for subsystems that were never configured.
    pub fn has_status(&self) -> bool {
        self.fields.contains_key("status")
    }

    pub fn message(&self) -> Option<&str> {
        self.fields.get("message").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// String and number fields other than `status` and `message`, in
    /// source order. Numbers are rendered with their JSON text.
    pub fn scalar_fields(&self) -> Vec<(&str, String)> {
        self.fields
            .iter()
            .filter(|(key, _)| key.as_str() != "status" && key.as_str() != "message")
            .filter_map(|(key, value)| match value {
                Value::String(text) => Some((key.as_str(), text.clone())),
                Value::Number(number) => Some((key.as_str(), number.to_string())),
                _ => None,
            })
            .collect()
    }

    /// The `data` array of the containers healthcheck; empty when absent.
    pub fn entries(&self) -> &[Value] {
        self.fields
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
