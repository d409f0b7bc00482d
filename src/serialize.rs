//! [`Document`] → YAML serialization.

use crate::error::SerializeError;
use crate::types::Document;

/// Serialize a document to a YAML string.
///
/// The `stateset` field is emitted first, then `collections` with states in
/// priority order (Default last), matching the parse order.
pub fn serialize(doc: &Document) -> Result<String, SerializeError> {
    // Via serde_json::Value for consistent field ordering.
    let value = serde_json::to_value(doc).map_err(|e| SerializeError {
        message: format!("failed to convert document to JSON value: {}", e),
    })?;

    serde_saphyr::to_string(&value).map_err(|e| SerializeError {
        message: format!("failed to serialize to YAML: {}", e),
    })
}
