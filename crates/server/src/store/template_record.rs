use serde::{Deserialize, Serialize};

/// A saved rule-document template. `content` is raw YAML text; it has
/// already passed validation when it enters the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub content: String,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}
