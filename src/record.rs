use serde::Deserialize;
use serde_json::{Map, Value};

/// A raw row from the table store. Field names are whatever the upstream
/// table happens to use; they vary per tenant, so nothing beyond `id` is
/// typed here. Key iteration order matches the upstream payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Resolves a field against an ordered candidate list: exact key matches
    /// first, then a case-insensitive substring pass over the record's own
    /// keys. Candidate order encodes preference. Values whose stringified
    /// form is blank count as absent.
    pub fn resolve(&self, candidates: &[&str]) -> Option<&Value> {
        for candidate in candidates {
            if let Some(value) = self.fields.get(*candidate) {
                if !is_blank(value) {
                    return Some(value);
                }
            }
        }

        for (key, value) in &self.fields {
            if is_blank(value) {
                continue;
            }
            let key_lower = key.to_lowercase();
            for candidate in candidates {
                if key_lower.contains(&candidate.to_lowercase()) {
                    return Some(value);
                }
            }
        }

        None
    }

    /// `resolve` followed by stringification: strings are trimmed, numbers
    /// rendered via Display.
    pub fn resolve_str(&self, candidates: &[&str]) -> Option<String> {
        self.resolve(candidates).and_then(stringify)
    }
}

pub fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let joined = items
                .iter()
                .filter_map(stringify)
                .collect::<Vec<_>>()
                .join(", ");
            if joined.is_empty() {
                None
            } else {
                Some(joined)
            }
        }
        Value::Null | Value::Object(_) => None,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.iter().all(is_blank),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exact_match_wins_over_fuzzy() {
        let record = Record::new("rec1")
            .with_field("Opis jela", json!("fuzzy hit"))
            .with_field("Opis", json!("exact hit"));

        assert_eq!(
            record.resolve_str(&["Opis"]).as_deref(),
            Some("exact hit")
        );
    }

    #[test]
    fn candidate_order_encodes_preference() {
        let record = Record::new("rec1")
            .with_field("Naziv", json!("generic"))
            .with_field("Naziv jela", json!("specific"));

        assert_eq!(
            record.resolve_str(&["Naziv jela", "Naziv"]).as_deref(),
            Some("specific")
        );
    }

    #[test]
    fn blank_exact_value_falls_through_to_fuzzy() {
        let record = Record::new("rec1")
            .with_field("Naziv", json!("   "))
            .with_field("Naziv deserta", json!("Rožata"));

        assert_eq!(
            record.resolve_str(&["Naziv"]).as_deref(),
            Some("Rožata")
        );
    }

    #[test]
    fn fuzzy_match_is_case_insensitive() {
        let record = Record::new("rec1").with_field("TELEFON mobitel", json!("021 123 456"));

        assert_eq!(
            record.resolve_str(&["Telefon"]).as_deref(),
            Some("021 123 456")
        );
    }

    #[test]
    fn missing_and_blank_fields_resolve_to_none() {
        let record = Record::new("rec1").with_field("Opis", json!("  \t "));

        assert_eq!(record.resolve(&["Opis"]), None);
        assert_eq!(record.resolve(&["Cijena"]), None);
    }

    #[test]
    fn numbers_stringify_via_display() {
        let record = Record::new("rec1").with_field("Cijena", json!(12.5));

        assert_eq!(record.resolve_str(&["Cijena"]).as_deref(), Some("12.5"));
    }
}
