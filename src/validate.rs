//! Document validation against conformance rules S-001 through S-008.
//!
//! Returns **all** errors and warnings, not just the first. Validation does
//! not modify the document.

use crate::collection::DEFAULT_STATE_NAME;
use crate::error::*;
use crate::preset::property_hash;
use crate::types::*;
use regex::Regex;
use std::sync::LazyLock;

static TYPE_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap()
});

/// Validate a parsed document against all conformance rules (S-001..S-008)
/// and advisory warnings (W-001..W-002). Returns every diagnostic found.
pub fn validate(doc: &Document) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    s001_version(doc, &mut errors);
    s002_collections_non_empty(doc, &mut errors);
    s003_default_last(doc, &mut errors);
    s004_names_non_empty(doc, &mut errors);
    s005_unique_names(doc, &mut errors);
    s006_object_type_paths(doc, &mut errors);
    s007_unique_property_hashes(doc, &mut errors);
    s008_default_not_blocked(doc, &mut errors);

    w001_dangling_block_refs(doc, &mut warnings);
    w002_self_blocking(doc, &mut warnings);

    ValidationResult { errors, warnings }
}

// ─── S-001 ──────────────────────────────────────────────────────────────────

fn s001_version(doc: &Document, errors: &mut Vec<ValidationError>) {
    if doc.stateset != "0.1" {
        errors.push(ValidationError {
            rule: "S-001".to_string(),
            path: "stateset".to_string(),
            message: format!("stateset field must be '0.1', got '{}'", doc.stateset),
        });
    }
}

// ─── S-002 ──────────────────────────────────────────────────────────────────

fn s002_collections_non_empty(doc: &Document, errors: &mut Vec<ValidationError>) {
    for (i, collection) in doc.collections.iter().enumerate() {
        if collection.states.is_empty() {
            errors.push(ValidationError {
                rule: "S-002".to_string(),
                path: format!("collections[{}].states", i),
                message: "a collection must contain at least the Default state".to_string(),
            });
        }
    }
}

// ─── S-003 ──────────────────────────────────────────────────────────────────

fn s003_default_last(doc: &Document, errors: &mut Vec<ValidationError>) {
    for (i, collection) in doc.collections.iter().enumerate() {
        let Some(last) = collection.states.last() else {
            continue; // S-002 already fired
        };
        if last.name != DEFAULT_STATE_NAME {
            errors.push(ValidationError {
                rule: "S-003".to_string(),
                path: format!("collections[{}].states[{}]", i, collection.states.len() - 1),
                message: format!(
                    "the last state must be named '{}', got '{}'",
                    DEFAULT_STATE_NAME, last.name
                ),
            });
        }
        for (j, state) in collection.states.iter().enumerate() {
            if j + 1 != collection.states.len() && state.name == DEFAULT_STATE_NAME {
                errors.push(ValidationError {
                    rule: "S-003".to_string(),
                    path: format!("collections[{}].states[{}]", i, j),
                    message: "only the last state may be named 'Default'".to_string(),
                });
            }
        }
    }
}

// ─── S-004 ──────────────────────────────────────────────────────────────────

fn s004_names_non_empty(doc: &Document, errors: &mut Vec<ValidationError>) {
    for (i, collection) in doc.collections.iter().enumerate() {
        if collection.id.is_empty() {
            errors.push(ValidationError {
                rule: "S-004".to_string(),
                path: format!("collections[{}].id", i),
                message: "collection ids must be non-empty".to_string(),
            });
        }
        for (j, state) in collection.states.iter().enumerate() {
            if state.name.is_empty() {
                errors.push(ValidationError {
                    rule: "S-004".to_string(),
                    path: format!("collections[{}].states[{}].name", i, j),
                    message: "state names must be non-empty".to_string(),
                });
            }
        }
    }
}

// ─── S-005 ──────────────────────────────────────────────────────────────────

fn s005_unique_names(doc: &Document, errors: &mut Vec<ValidationError>) {
    for (i, collection) in doc.collections.iter().enumerate() {
        for (j, state) in collection.states.iter().enumerate() {
            let scope = state.preset.as_ref().map_or("", |p| p.object.as_str());
            let duplicate = collection.states[..j].iter().any(|other| {
                other.name == state.name
                    && other.preset.as_ref().map_or("", |p| p.object.as_str()) == scope
            });
            // Doubled Default states are S-003's finding, not a name clash.
            if duplicate && state.name != DEFAULT_STATE_NAME {
                errors.push(ValidationError {
                    rule: "S-005".to_string(),
                    path: format!("collections[{}].states[{}].name", i, j),
                    message: format!(
                        "duplicate state name '{}' for target '{}'",
                        state.name, scope
                    ),
                });
            }
        }
    }
}

// ─── S-006 ──────────────────────────────────────────────────────────────────

fn s006_object_type_paths(doc: &Document, errors: &mut Vec<ValidationError>) {
    for (i, collection) in doc.collections.iter().enumerate() {
        for (j, state) in collection.states.iter().enumerate() {
            let Some(preset) = &state.preset else {
                continue;
            };
            if !TYPE_PATH_RE.is_match(&preset.object) {
                errors.push(ValidationError {
                    rule: "S-006".to_string(),
                    path: format!("collections[{}].states[{}].preset.object", i, j),
                    message: format!(
                        "'{}' is not a dotted type path (e.g. 'Controller.Movement')",
                        preset.object
                    ),
                });
            }
        }
    }
}

// ─── S-007 ──────────────────────────────────────────────────────────────────

fn s007_unique_property_hashes(doc: &Document, errors: &mut Vec<ValidationError>) {
    for (i, collection) in doc.collections.iter().enumerate() {
        for (j, state) in collection.states.iter().enumerate() {
            let Some(preset) = &state.preset else {
                continue;
            };
            let mut seen: Vec<(u64, usize)> = Vec::new();
            for (k, entry) in preset.values.iter().enumerate() {
                let hash = property_hash(&entry.type_name, &entry.property);
                if let Some((_, first)) = seen.iter().find(|(h, _)| *h == hash) {
                    let other = &preset.values[*first];
                    let same_identity =
                        other.type_name == entry.type_name && other.property == entry.property;
                    errors.push(ValidationError {
                        rule: "S-007".to_string(),
                        path: format!("collections[{}].states[{}].preset.values[{}]", i, j, k),
                        message: if same_identity {
                            format!("duplicate entry for {}.{}", entry.type_name, entry.property)
                        } else {
                            format!(
                                "hash collision between {}.{} and {}.{}",
                                other.type_name, other.property, entry.type_name, entry.property
                            )
                        },
                    });
                } else {
                    seen.push((hash, k));
                }
            }
        }
    }
}

// ─── S-008 ──────────────────────────────────────────────────────────────────

fn s008_default_not_blocked(doc: &Document, errors: &mut Vec<ValidationError>) {
    for (i, collection) in doc.collections.iter().enumerate() {
        for (j, state) in collection.states.iter().enumerate() {
            if state.blocks.iter().any(|n| n == DEFAULT_STATE_NAME) {
                errors.push(ValidationError {
                    rule: "S-008".to_string(),
                    path: format!("collections[{}].states[{}].blocks", i, j),
                    message: "the Default state cannot be block-listed".to_string(),
                });
            }
        }
    }
}

// ─── W-001 ──────────────────────────────────────────────────────────────────

fn w001_dangling_block_refs(doc: &Document, warnings: &mut Vec<Diagnostic>) {
    for (i, collection) in doc.collections.iter().enumerate() {
        for (j, state) in collection.states.iter().enumerate() {
            for blocked in &state.blocks {
                let exists = collection.states.iter().any(|s| &s.name == blocked);
                if !exists {
                    warnings.push(Diagnostic {
                        severity: DiagnosticSeverity::Warning,
                        code: "W-001".to_string(),
                        path: Some(format!("collections[{}].states[{}].blocks", i, j)),
                        message: format!(
                            "block list references '{}', which names no sibling state",
                            blocked
                        ),
                    });
                }
            }
        }
    }
}

// ─── W-002 ──────────────────────────────────────────────────────────────────

fn w002_self_blocking(doc: &Document, warnings: &mut Vec<Diagnostic>) {
    for (i, collection) in doc.collections.iter().enumerate() {
        for (j, state) in collection.states.iter().enumerate() {
            if state.blocks.iter().any(|n| n == &state.name) {
                warnings.push(Diagnostic {
                    severity: DiagnosticSeverity::Warning,
                    code: "W-002".to_string(),
                    path: Some(format!("collections[{}].states[{}].blocks", i, j)),
                    message: format!("state '{}' blocks itself; the entry has no effect", state.name),
                });
            }
        }
    }
}
