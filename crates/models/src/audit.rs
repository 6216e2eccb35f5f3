use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single append-only audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAuditEntry {
    /// Table or aggregate the action touched, e.g. "students"
    pub entity_name: String,
    pub entity_id: String,
    /// e.g. "create", "update", "delete"
    pub action: String,
    pub performed_by: String,
    pub details: Option<Value>,
}

impl NewAuditEntry {
    pub fn new(
        entity_name: impl Into<String>,
        entity_id: impl ToString,
        action: impl Into<String>,
        performed_by: impl Into<String>,
    ) -> Self {
        Self {
            entity_name: entity_name.into(),
            entity_id: entity_id.to_string(),
            action: action.into(),
            performed_by: performed_by.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}
