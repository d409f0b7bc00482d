use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// A structured diagnostic message produced during validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub message: String,
}

/// Error kind for parse failures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseErrorKind {
    Syntax,
    TypeMismatch,
    UnknownField,
}

/// Produced by `parse` when YAML deserialization fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(line), Some(col)) = (self.line, self.column) {
            write!(f, "{}:{}: {}", line, col, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ParseError {}

/// Produced by `validate` when a document violates a conformance rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub rule: String,
    pub path: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.rule, self.path, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Result of validation: errors and warnings.
#[derive(Clone, Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<Diagnostic>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Error kind for collection and preset edit failures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditErrorKind {
    /// A sibling state of the same target type already carries the name.
    DuplicateName,
    /// Empty state name, or the reserved name `Default`.
    InvalidName,
    /// The Default state cannot be removed or renamed.
    CannotRemoveDefault,
    /// The Default state is not toggleable through the public API.
    CannotToggleDefault,
    /// The preset already tracks this exact property.
    DuplicateProperty,
    /// Index out of bounds for the collection.
    OutOfRange,
}

/// Produced by collection and preset edit operations.
///
/// Edit errors are recoverable: the caller can retry with different input,
/// and the collection or preset is left exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditError {
    pub kind: EditErrorKind,
    pub message: String,
}

impl EditError {
    pub(crate) fn new(kind: EditErrorKind, message: impl Into<String>) -> Self {
        EditError {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for EditError {}

/// Two distinct properties hashed to the same key.
///
/// Unlike [`EditError`], this is a data-integrity fault: the operation that
/// detected it aborts without mutating anything, and the caller should treat
/// the preset data as suspect rather than retry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityFault {
    pub hash: u64,
    /// `(type_name, property_name)` of the entry already stored.
    pub existing: (String, String),
    /// `(type_name, property_name)` of the colliding addition.
    pub incoming: (String, String),
}

impl fmt::Display for IntegrityFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "property hash collision at {:#018x}: {}.{} vs {}.{}",
            self.hash, self.existing.0, self.existing.1, self.incoming.0, self.incoming.1
        )
    }
}

impl std::error::Error for IntegrityFault {}

/// Serialization error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerializeError {
    pub message: String,
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SerializeError {}

/// Combined error type for the `load` entry point and [`crate::engine::StateEngine`].
#[derive(Clone, Debug, PartialEq)]
pub enum StateSetError {
    Parse(ParseError),
    Validation(ValidationError),
    Edit(EditError),
    Integrity(IntegrityFault),
    UnknownCollection(String),
    UnknownState(String),
}

impl fmt::Display for StateSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateSetError::Parse(e) => write!(f, "Parse error: {}", e),
            StateSetError::Validation(e) => write!(f, "Validation error: {}", e),
            StateSetError::Edit(e) => write!(f, "Edit error: {}", e),
            StateSetError::Integrity(e) => write!(f, "Integrity fault: {}", e),
            StateSetError::UnknownCollection(id) => write!(f, "Unknown collection: {}", id),
            StateSetError::UnknownState(name) => write!(f, "Unknown state: {}", name),
        }
    }
}

impl std::error::Error for StateSetError {}

impl From<EditError> for StateSetError {
    fn from(e: EditError) -> Self {
        StateSetError::Edit(e)
    }
}

impl From<IntegrityFault> for StateSetError {
    fn from(e: IntegrityFault) -> Self {
        StateSetError::Integrity(e)
    }
}
