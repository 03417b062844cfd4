//! Bulk card import from pasted JSON.
//!
//! # Format
//! ```json
//! [
//!   { "q": "apple", "a": "りんご" },
//!   { "q": "book", "a": "本" }
//! ]
//! ```
//!
//! Payloads that are not a JSON array are rejected whole. Items missing
//! either field are skipped and counted so a partially usable paste still
//! imports the rest.

use crate::error::ImportError;
use serde_json::Value;

/// A card parsed from an import payload, not yet assigned an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedCard {
    pub question: String,
    pub answer: String,
}

/// Result of parsing an import payload.
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    pub cards: Vec<ImportedCard>,
    /// Items dropped for missing or empty `q`/`a` fields.
    pub skipped: usize,
}

/// Parse a pasted JSON array of `{q, a}` objects.
pub fn parse_import(text: &str) -> Result<ImportOutcome, ImportError> {
    if text.trim().is_empty() {
        return Err(ImportError::Empty);
    }

    let value: Value =
        serde_json::from_str(text).map_err(|e| ImportError::InvalidJson(e.to_string()))?;
    let items = value.as_array().ok_or(ImportError::NotAnArray)?;

    let mut outcome = ImportOutcome::default();
    for item in items {
        match (field_text(item, "q"), field_text(item, "a")) {
            (Some(question), Some(answer)) => {
                outcome.cards.push(ImportedCard { question, answer });
            }
            _ => outcome.skipped += 1,
        }
    }
    Ok(outcome)
}

/// Extract a field as trimmed text. Scalars are stringified; null, missing,
/// empty, and structured values are treated as absent.
fn field_text(item: &Value, key: &str) -> Option<String> {
    let text = match item.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_well_formed_items() {
        let outcome =
            parse_import(r#"[{"q": "apple", "a": "りんご"}, {"q": " book ", "a": "本"}]"#).unwrap();

        assert_eq!(outcome.skipped, 0);
        assert_eq!(
            outcome.cards,
            vec![
                ImportedCard {
                    question: "apple".to_string(),
                    answer: "りんご".to_string()
                },
                ImportedCard {
                    question: "book".to_string(),
                    answer: "本".to_string()
                },
            ]
        );
    }

    #[test]
    fn skips_items_missing_a_field() {
        let outcome =
            parse_import(r#"[{"q": "apple"}, {"a": "本"}, {"q": "cat", "a": "猫"}, {}]"#).unwrap();

        assert_eq!(outcome.cards.len(), 1);
        assert_eq!(outcome.skipped, 3);
    }

    #[test]
    fn stringifies_scalar_values() {
        let outcome = parse_import(r#"[{"q": 7, "a": true}]"#).unwrap();
        assert_eq!(
            outcome.cards,
            vec![ImportedCard {
                question: "7".to_string(),
                answer: "true".to_string()
            }]
        );
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(parse_import("   "), Err(ImportError::Empty)));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            parse_import("[{\"q\": "),
            Err(ImportError::InvalidJson(_))
        ));
    }

    #[test]
    fn rejects_non_array_payload() {
        assert!(matches!(
            parse_import(r#"{"q": "apple", "a": "りんご"}"#),
            Err(ImportError::NotAnArray)
        ));
    }
}
