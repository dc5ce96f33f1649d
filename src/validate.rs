//! Form-field normalization and validation helpers.
//!
//! These mirror the client-side input handlers exactly, so the server
//! re-checks submissions against the same contract the browser enforced.
//! ASCII character classes only; nothing here depends on Unicode-aware
//! regex behavior.

use lazy_static::lazy_static;
use regex::Regex;

const MAX_NAME_LEN: usize = 50;
const PHONE_DIGITS: usize = 10;

lazy_static! {
    // Letter first, then letters/apostrophe/hyphen/space, 2..=50 total.
    static ref NAME_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z' -]{1,49}$").unwrap();
    // local@domain.tld, TLD at least 2 letters, no whitespace, one '@'.
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[A-Za-z]{2,}$").unwrap();
}

pub fn normalize_text(input: &str) -> String {
    input.trim().to_string()
}

/// Strips everything outside the name charset and caps the length. Applied
/// keystroke-by-keystroke on the client, once on the server.
pub fn sanitize_name_input(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || matches!(c, '\'' | '-' | ' '))
        .take(MAX_NAME_LEN)
        .collect()
}

pub fn normalize_name(input: &str) -> String {
    let sanitized = sanitize_name_input(input);
    sanitized.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits on the first space: "Jane Q Doe" -> ("Jane", "Q Doe").
pub fn split_full_name(full: &str) -> (String, String) {
    let trimmed = full.trim();
    match trimmed.split_once(' ') {
        Some((first, last)) => (first.to_string(), last.trim().to_string()),
        None => (trimmed.to_string(), String::new()),
    }
}

pub fn build_full_name(first: &str, last: &str) -> String {
    let first = first.trim();
    let last = last.trim();
    if first.is_empty() {
        return last.to_string();
    }
    if last.is_empty() {
        return first.to_string();
    }
    format!("{first} {last}")
}

pub fn is_valid_name(input: &str) -> bool {
    NAME_RE.is_match(&normalize_name(input))
}

pub fn normalize_phone_digits(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(PHONE_DIGITS)
        .collect()
}

/// Progressive US phone formatting, matching what the form shows while the
/// user types: up to 3 digits raw, then "(xxx) xxx", then "(xxx) xxx-xxxx".
pub fn format_phone_input(input: &str) -> String {
    let digits = normalize_phone_digits(input);
    match digits.len() {
        0..=3 => digits,
        4..=6 => format!("({}) {}", &digits[..3], &digits[3..]),
        _ => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
    }
}

pub fn is_valid_phone(input: &str) -> bool {
    input.chars().filter(|c| c.is_ascii_digit()).count() == PHONE_DIGITS
}

pub fn normalize_email(input: &str) -> String {
    input.trim().to_lowercase()
}

pub fn is_valid_email(input: &str) -> bool {
    input.chars().filter(|&c| c == '@').count() == 1 && EMAIL_RE.is_match(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_text_trims() {
        assert_eq!(normalize_text("  hello \n"), "hello");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn sanitize_name_strips_and_caps() {
        assert_eq!(sanitize_name_input("Jane123 Doe!"), "Jane Doe");
        assert_eq!(sanitize_name_input("O'Brien-Smith"), "O'Brien-Smith");
        let long = "a".repeat(80);
        assert_eq!(sanitize_name_input(&long).len(), 50);
    }

    #[test]
    fn normalize_name_collapses_whitespace() {
        assert_eq!(normalize_name("  Jane   Q.  Doe "), "Jane Q Doe");
    }

    #[test]
    fn split_and_build_full_name() {
        assert_eq!(
            split_full_name("Jane Doe"),
            ("Jane".to_string(), "Doe".to_string())
        );
        assert_eq!(
            split_full_name("Jane Q Doe"),
            ("Jane".to_string(), "Q Doe".to_string())
        );
        assert_eq!(split_full_name("Jane"), ("Jane".to_string(), String::new()));
        assert_eq!(split_full_name(""), (String::new(), String::new()));
        assert_eq!(build_full_name("Jane", "Doe"), "Jane Doe");
        assert_eq!(build_full_name("Jane", ""), "Jane");
        assert_eq!(build_full_name("", ""), "");
    }

    #[test]
    fn name_validation() {
        assert!(is_valid_name("Jane Doe"));
        assert!(is_valid_name("O'Brien-Smith"));
        assert!(!is_valid_name("J"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("'starts with apostrophe"));
        // Digits are sanitized away, leaving a valid remainder.
        assert!(is_valid_name("Jane2 Doe"));
    }

    #[test]
    fn phone_digit_normalization() {
        assert_eq!(normalize_phone_digits("(281) 555-0123"), "2815550123");
        assert_eq!(normalize_phone_digits("281555012345"), "2815550123");
        assert_eq!(normalize_phone_digits("abc"), "");
    }

    #[test]
    fn progressive_phone_formatting() {
        assert_eq!(format_phone_input(""), "");
        assert_eq!(format_phone_input("281"), "281");
        assert_eq!(format_phone_input("2815"), "(281) 5");
        assert_eq!(format_phone_input("281555"), "(281) 555");
        assert_eq!(format_phone_input("2815550"), "(281) 555-0");
        assert_eq!(format_phone_input("2815550123"), "(281) 555-0123");
    }

    #[test]
    fn phone_formatting_is_idempotent() {
        for raw in ["2815550123", "281555", "28"] {
            let once = format_phone_input(raw);
            assert_eq!(format_phone_input(&once), once);
        }
    }

    #[test]
    fn phone_validation_requires_exactly_ten_digits() {
        assert!(is_valid_phone("(281) 555-0123"));
        assert!(is_valid_phone("2815550123"));
        assert!(!is_valid_phone("281555012"));
        assert!(!is_valid_phone("+1 281 555 0123"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn email_normalization_round_trip() {
        assert!(is_valid_email(&normalize_email(" Foo@BAR.com ")));
        assert_eq!(normalize_email(" Foo@BAR.com "), "foo@bar.com");
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("foo@bar.com"));
        assert!(is_valid_email("f.oo+tag@sub.bar.io"));
        assert!(!is_valid_email("foo@bar")); // no TLD
        assert!(!is_valid_email("foo@@bar.com"));
        assert!(!is_valid_email("foo bar@baz.com"));
        assert!(!is_valid_email("foo@bar.c"));
        assert!(!is_valid_email("@bar.com"));
    }
}
