use crate::diff::NodeEdit;

/// Format edits as JSON, one array entry per [`NodeEdit`].
pub fn format_json(edits: &[NodeEdit]) -> String {
    serde_json::to_string_pretty(edits).unwrap_or_else(|_| "[]".to_string())
}
