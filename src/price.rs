use serde_json::Value;

/// Currency used for every rendered price. Read-only after startup.
#[derive(Debug, Clone)]
pub struct Currency {
    pub symbol: String,
    pub code: String,
}

impl Default for Currency {
    fn default() -> Self {
        Self {
            symbol: "€".to_string(),
            code: "EUR".to_string(),
        }
    }
}

impl Currency {
    fn is_marked(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        lower.contains(&self.symbol.to_lowercase()) || lower.contains(&self.code.to_lowercase())
    }
}

/// Parses a heterogeneous upstream price into a plain number. Strings may
/// carry a currency symbol, stray characters, or a comma decimal separator
/// ("12,50"). Anything that does not parse to a finite number is `None`.
pub fn canonical_number(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => {
            let mut cleaned = String::with_capacity(s.len());
            for (i, ch) in s.trim().chars().enumerate() {
                if ch.is_ascii_digit() || ch == ',' || ch == '.' || (ch == '-' && i == 0) {
                    cleaned.push(ch);
                }
            }
            let cleaned = cleaned.replace(',', ".");
            cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}

/// Renders a price for display. Numbers get two decimals and the currency
/// symbol; strings that already carry a currency marker pass through
/// unchanged, others get the symbol appended. Blank input is `None`.
pub fn display(raw: &Value, currency: &Currency) -> Option<String> {
    match raw {
        Value::Number(n) => {
            let v = n.as_f64().filter(|v| v.is_finite())?;
            Some(format_number(v, currency))
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else if currency.is_marked(trimmed) {
                Some(trimmed.to_string())
            } else {
                Some(format!("{} {}", trimmed, currency.symbol))
            }
        }
        _ => None,
    }
}

pub fn format_number(value: f64, currency: &Currency) -> String {
    format!("{:.2} {}", value, currency.symbol)
}

/// Canonical display pipeline used during context assembly: parse first so
/// "12,50" renders as "12.50 €", and only fall back to the raw-string rule
/// when the value is not numeric at all.
pub fn format_price(raw: &Value, currency: &Currency) -> Option<String> {
    match canonical_number(raw) {
        Some(n) => Some(format_number(n, currency)),
        None => display(raw, currency),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eur() -> Currency {
        Currency::default()
    }

    #[test]
    fn comma_decimal_string_parses() {
        assert_eq!(canonical_number(&json!("12,50")), Some(12.5));
    }

    #[test]
    fn currency_noise_is_stripped() {
        assert_eq!(canonical_number(&json!("  18.00 € ")), Some(18.0));
        assert_eq!(canonical_number(&json!("EUR 7")), Some(7.0));
    }

    #[test]
    fn unparseable_strings_yield_none() {
        assert_eq!(canonical_number(&json!("ask our staff")), None);
        assert_eq!(canonical_number(&json!("")), None);
        assert_eq!(canonical_number(&Value::Null), None);
    }

    #[test]
    fn numbers_pass_through_unchanged() {
        assert_eq!(canonical_number(&json!(9)), Some(9.0));
        assert_eq!(canonical_number(&json!(4.2)), Some(4.2));
    }

    #[test]
    fn number_display_round_trips() {
        let shown = display(&json!(12.5), &eur()).unwrap();
        assert_eq!(shown, "12.50 €");
        assert!((canonical_number(&json!(shown)).unwrap() - 12.5).abs() < 1e-9);
    }

    #[test]
    fn marked_strings_pass_through() {
        assert_eq!(
            display(&json!("12.00 €"), &eur()).as_deref(),
            Some("12.00 €")
        );
        assert_eq!(
            display(&json!("12 EUR"), &eur()).as_deref(),
            Some("12 EUR")
        );
    }

    #[test]
    fn unmarked_strings_get_the_symbol() {
        assert_eq!(display(&json!("12"), &eur()).as_deref(), Some("12 €"));
    }

    #[test]
    fn blank_display_is_none() {
        assert_eq!(display(&json!("   "), &eur()), None);
        assert_eq!(display(&Value::Null, &eur()), None);
    }

    #[test]
    fn format_price_normalizes_comma_decimals() {
        assert_eq!(
            format_price(&json!("12,50"), &eur()).as_deref(),
            Some("12.50 €")
        );
        assert_eq!(format_price(&json!(8), &eur()).as_deref(), Some("8.00 €"));
    }

    #[test]
    fn format_price_keeps_non_numeric_strings() {
        assert_eq!(
            format_price(&json!("market price"), &eur()).as_deref(),
            Some("market price €")
        );
    }
}
