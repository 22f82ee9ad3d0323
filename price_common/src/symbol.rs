//! Symbol normalisation shared by the server and the client.
//!
//! Symbols are case-insensitive and whitespace-trimmed: `" btcusd "` and
//! `"BTCUSD"` name the same instrument. The canonical form is uppercase.

/// Returns the canonical (trimmed, uppercase) form of `raw`, or `None` if
/// nothing is left after trimming.
pub fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// Returns `true` when a request carries no usable symbol: blank input or the
/// literal `null` in any case, which some HTTP clients send for a missing value.
pub fn is_missing(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_uppercases() {
        assert_eq!(normalize("  btcusd "), Some("BTCUSD".to_string()));
        assert_eq!(normalize("EthUsd"), Some("ETHUSD".to_string()));
    }

    #[test]
    fn normalize_rejects_blank_input() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("   \t"), None);
    }

    #[test]
    fn missing_symbol_covers_blank_and_null_literal() {
        assert!(is_missing(""));
        assert!(is_missing("  "));
        assert!(is_missing("null"));
        assert!(is_missing("NULL"));
        assert!(!is_missing("nullcoin"));
        assert!(!is_missing("BTCUSD"));
    }
}
