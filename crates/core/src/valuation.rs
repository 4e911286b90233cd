//! Valuation field bounds and currency handling.

/// Upper bound for a valuation value.
pub const MAX_VALUATION: i32 = 999_999;

/// Currency applied when a valuation omits one.
pub const DEFAULT_CURRENCY: &str = "PLN";

/// Validate a valuation value (1..=999,999).
pub fn validate_value(value: i32) -> Result<(), String> {
    if (1..=MAX_VALUATION).contains(&value) {
        Ok(())
    } else {
        Err(format!("value must be between 1 and {MAX_VALUATION}"))
    }
}

/// Validate a currency code: exactly three ASCII uppercase letters.
pub fn validate_currency(currency: &str) -> Result<(), String> {
    if currency.len() == 3 && currency.bytes().all(|b| b.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(format!(
            "Invalid currency '{currency}'. Expected a 3-letter uppercase code"
        ))
    }
}

/// Resolve the currency to store, falling back to [`DEFAULT_CURRENCY`].
pub fn resolve_currency(currency: Option<&str>) -> Result<String, String> {
    match currency.map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => {
            validate_currency(code)?;
            Ok(code.to_string())
        }
        None => Ok(DEFAULT_CURRENCY.to_string()),
    }
}
