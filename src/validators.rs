//! Input validation for the free-text steps: full name, age, phone.

use regex::Regex;
use std::sync::LazyLock;

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+998\d{9}$").unwrap());

/// 2–5 whitespace-separated parts, each with at least 2 letters.
/// Punctuation inside a part is allowed but does not count as a letter.
pub fn valid_full_name(s: &str) -> bool {
    let parts: Vec<&str> = s.split_whitespace().collect();
    if !(2..=5).contains(&parts.len()) {
        return false;
    }
    parts
        .iter()
        .all(|p| p.chars().filter(|c| c.is_alphabetic()).count() >= 2)
}

/// Accepts only pure digit strings in the range 3–100.
pub fn parse_age(s: &str) -> Option<u8> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let n = s.parse::<u8>().ok()?;
    (3..=100).contains(&n).then_some(n)
}

/// Normalizes to the canonical `+998XXXXXXXXX` form, or `None`.
///
/// Non-digits are stripped (keeping a leading `+`), a bare 12-digit
/// `998...` string gets the `+` prepended, and the result must match
/// the canonical pattern exactly.
pub fn normalize_phone(input: &str) -> Option<String> {
    let t = input.trim();
    let mut normalized = match t.strip_prefix('+') {
        Some(rest) => {
            let digits: String = rest.chars().filter(char::is_ascii_digit).collect();
            format!("+{digits}")
        }
        None => t.chars().filter(char::is_ascii_digit).collect(),
    };
    if normalized.starts_with("998") && normalized.len() == 12 {
        normalized.insert(0, '+');
    }
    PHONE_REGEX.is_match(&normalized).then_some(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_accepts_two_to_five_real_parts() {
        assert!(valid_full_name("Ziyodulla Egamberdiyev"));
        assert!(valid_full_name("  Ali  Valiyev  "));
        assert!(valid_full_name("Anna Maria Lopez Garcia Perez"));
        // punctuation ignored when counting letters, part still needs two
        assert!(valid_full_name("O'ktam G'ulomov"));
    }

    #[test]
    fn full_name_rejects_short_parts_and_wrong_counts() {
        assert!(!valid_full_name("Ziyodulla"));
        assert!(!valid_full_name("A B"));
        assert!(!valid_full_name("Xa Y Z W Q R"));
        assert!(!valid_full_name("Ali V."));
        assert!(!valid_full_name(""));
        assert!(!valid_full_name("12 34"));
    }

    #[test]
    fn age_range_is_3_to_100_inclusive() {
        assert_eq!(parse_age("3"), Some(3));
        assert_eq!(parse_age("21"), Some(21));
        assert_eq!(parse_age("100"), Some(100));
        assert_eq!(parse_age("007"), Some(7));
        assert_eq!(parse_age("2"), None);
        assert_eq!(parse_age("101"), None);
        assert_eq!(parse_age("12a"), None);
        assert_eq!(parse_age("-5"), None);
        assert_eq!(parse_age(""), None);
        assert_eq!(parse_age("99999999999999999999"), None);
    }

    #[test]
    fn phone_normalizes_to_canonical_form() {
        assert_eq!(
            normalize_phone("+998901234567").as_deref(),
            Some("+998901234567")
        );
        assert_eq!(
            normalize_phone("998901234567").as_deref(),
            Some("+998901234567")
        );
        assert_eq!(
            normalize_phone("+998 90 123-45-67").as_deref(),
            Some("+998901234567")
        );
        assert_eq!(
            normalize_phone("  998 (90) 123 45 67 ").as_deref(),
            Some("+998901234567")
        );
    }

    #[test]
    fn phone_rejects_wrong_prefix_or_length() {
        assert_eq!(normalize_phone("90 123 45 67"), None);
        assert_eq!(normalize_phone("+1 234 567 8900"), None);
        assert_eq!(normalize_phone("+99890123456"), None);
        assert_eq!(normalize_phone("+9989012345678"), None);
        assert_eq!(normalize_phone(""), None);
        assert_eq!(normalize_phone("+"), None);
    }
}
