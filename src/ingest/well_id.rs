//! Well identity by convention.
//!
//! Throughout the supported formats a well's numeric identity is embedded
//! in a name token: `WELL_7` is well 7, `A12B034` is well 34. The rule is
//! always the same — the longest trailing run of ASCII digits, parsed as an
//! unsigned integer. A token with no trailing digits cannot be attributed
//! to a well; how that is handled (fatal vs. skip) is the calling parser's
//! policy.

/// Derive a well id from a name token, or `None` if the token carries no
/// trailing digits (or the digit run overflows `u64`).
pub fn derive_well_id(token: &str) -> Option<u64> {
    let start = token.len() - token.bytes().rev().take_while(u8::is_ascii_digit).count();
    token[start..].parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_digit_run() {
        assert_eq!(derive_well_id("WELL_7"), Some(7));
        assert_eq!(derive_well_id("A12B034"), Some(34));
        assert_eq!(derive_well_id("NAME42"), Some(42));
        assert_eq!(derive_well_id("034"), Some(34));
    }

    #[test]
    fn test_no_trailing_digits_is_unresolvable() {
        assert_eq!(derive_well_id("WELL"), None);
        assert_eq!(derive_well_id("WELL_7A"), None);
        assert_eq!(derive_well_id(""), None);
    }

    #[test]
    fn test_overflow_is_unresolvable() {
        assert_eq!(derive_well_id("W99999999999999999999999"), None);
    }
}
