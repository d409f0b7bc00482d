use crate::error::{ParseError, ParseErrorKind};
use crate::types::Document;

/// Parse a YAML string into an unvalidated [`Document`].
///
/// Performs YAML deserialization and type mapping only. Does NOT validate
/// conformance rules; see [`crate::validate::validate`].
pub fn parse(input: &str) -> Result<Document, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError {
            kind: ParseErrorKind::Syntax,
            message: "empty input".to_string(),
            path: None,
            line: None,
            column: None,
        });
    }

    // Anchors, aliases, and merge keys can smuggle shared mutable structure
    // into presets, so the raw text is pre-scanned and they are rejected.
    check_yaml_anchors_aliases(input)?;
    check_multi_document(input)?;

    // Deserialize via a serde_json::Value intermediate so field order is
    // preserved and errors can be classified uniformly.
    let value: serde_json::Value = serde_saphyr::from_str(input).map_err(|e| {
        let msg = e.to_string();
        ParseError {
            kind: classify_error(&msg),
            message: msg,
            path: None,
            line: None,
            column: None,
        }
    })?;

    let Some(root) = value.as_object() else {
        return Err(ParseError {
            kind: ParseErrorKind::TypeMismatch,
            message: "document root must be a YAML mapping".to_string(),
            path: None,
            line: None,
            column: None,
        });
    };

    for key in root.keys() {
        match key.as_str() {
            "stateset" | "collections" => {}
            other => {
                return Err(ParseError {
                    kind: ParseErrorKind::UnknownField,
                    message: format!("unknown top-level field: {}", other),
                    path: Some(other.to_string()),
                    line: None,
                    column: None,
                });
            }
        }
    }

    serde_json::from_value(value).map_err(|e| {
        let msg = e.to_string();
        ParseError {
            kind: classify_error(&msg),
            message: msg,
            path: None,
            line: None,
            column: None,
        }
    })
}

/// Reject YAML anchors (`&name`), aliases (`*name`), and merge keys (`<<:`).
fn check_yaml_anchors_aliases(input: &str) -> Result<(), ParseError> {
    for (line_num, line) in input.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with('#') {
            continue;
        }

        let content = strip_yaml_string_literals(trimmed);

        if content.contains("<<:") || content.contains("<< :") {
            return Err(ParseError {
                kind: ParseErrorKind::Syntax,
                message: "YAML merge keys (<<) are not allowed".to_string(),
                path: None,
                line: Some(line_num + 1),
                column: None,
            });
        }

        for (marker, what) in [(b'&', "anchors (&)"), (b'*', "aliases (*)")] {
            if let Some(pos) = find_yaml_marker(&content, marker) {
                return Err(ParseError {
                    kind: ParseErrorKind::Syntax,
                    message: format!("YAML {} are not allowed", what),
                    path: None,
                    line: Some(line_num + 1),
                    column: Some(pos + 1),
                });
            }
        }
    }
    Ok(())
}

/// Find an anchor/alias marker in value position, i.e. preceded by a space,
/// colon, dash, or line start and followed by an identifier character. This
/// avoids false positives on URLs and free text containing `&` or `*`.
fn find_yaml_marker(line: &str, marker: u8) -> Option<usize> {
    let bytes = line.as_bytes();
    for i in 0..bytes.len() {
        if bytes[i] == marker
            && i + 1 < bytes.len()
            && is_yaml_anchor_char(bytes[i + 1])
            && (i == 0 || matches!(bytes[i - 1], b' ' | b':' | b'-'))
        {
            return Some(i);
        }
    }
    None
}

fn is_yaml_anchor_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

/// Blank out quoted string contents so marker detection only sees structure.
fn strip_yaml_string_literals(line: &str) -> String {
    let mut result = String::new();
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                result.push(' ');
                loop {
                    match chars.next() {
                        Some('\\') => {
                            chars.next();
                        }
                        Some('"') | None => break,
                        _ => {}
                    }
                }
            }
            '\'' => {
                result.push(' ');
                loop {
                    match chars.next() {
                        Some('\'') => {
                            if chars.peek() == Some(&'\'') {
                                chars.next();
                            } else {
                                break;
                            }
                        }
                        None => break,
                        _ => {}
                    }
                }
            }
            _ => result.push(c),
        }
    }
    result
}

/// Reject multi-document YAML streams. Markers must start at column 0, so
/// `---` inside block scalars does not trip this.
fn check_multi_document(input: &str) -> Result<(), ParseError> {
    let mut doc_count = 0;
    for line in input.lines() {
        if line.starts_with("---") && line[3..].trim().is_empty() {
            doc_count += 1;
            if doc_count > 1 {
                return Err(ParseError {
                    kind: ParseErrorKind::Syntax,
                    message: "multi-document YAML is not supported".to_string(),
                    path: None,
                    line: None,
                    column: None,
                });
            }
        }
    }
    Ok(())
}

fn classify_error(msg: &str) -> ParseErrorKind {
    let lower = msg.to_lowercase();
    if lower.contains("unknown field") || lower.contains("unknown variant") {
        ParseErrorKind::UnknownField
    } else if lower.contains("missing field")
        || lower.contains("type")
        || lower.contains("invalid")
        || lower.contains("expected")
    {
        ParseErrorKind::TypeMismatch
    } else {
        ParseErrorKind::Syntax
    }
}
