//! ISBN normalization and structural validation
//!
//! Turns raw user input into a canonical identifier (decimal digits plus an
//! uppercase `X`) and checks whether that identifier is a structurally valid
//! ISBN-10 or ISBN-13. Validity here means the check digit matches; it says
//! nothing about whether any catalogue knows the book.
//!
//! Both functions are pure and total.

use std::fmt;

use crate::{Error, Result};

/// The two structural ISBN forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsbnForm {
    /// 9 digits followed by a digit or `X` check character
    Isbn10,
    /// 13 digits, EAN-13 check digit
    Isbn13,
}

/// Strip everything except decimal digits and `X`/`x`, uppercasing the letter.
///
/// Hyphens, spaces and other punctuation are silently discarded.
///
/// # Examples
///
/// ```
/// use bookshelf_common::isbn::normalize;
///
/// assert_eq!(normalize("0-306-40615-2"), "0306406152");
/// assert_eq!(normalize("080442957x"), "080442957X");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| match c {
            '0'..='9' => Some(c),
            'x' | 'X' => Some('X'),
            _ => None,
        })
        .collect()
}

/// Whether a canonical identifier has the length of a complete ISBN.
///
/// Used to decide whether an in-progress edit is worth resolving; the check
/// digit is not inspected.
pub fn complete_length(normalized: &str) -> bool {
    matches!(normalized.len(), 10 | 13)
}

/// Structural validity check on an already-normalized identifier.
///
/// Accepts a 10-character form whose last character may be `X` (value 10) and
/// a 13-character all-digit form. Any other length or character is invalid.
pub fn is_valid(normalized: &str) -> bool {
    classify(normalized).is_some()
}

/// Return the ISBN form of `normalized` when its check digit is correct.
pub fn classify(normalized: &str) -> Option<IsbnForm> {
    let bytes = normalized.as_bytes();
    match bytes.len() {
        10 if isbn10_checks(bytes) => Some(IsbnForm::Isbn10),
        13 if isbn13_checks(bytes) => Some(IsbnForm::Isbn13),
        _ => None,
    }
}

fn digit(b: u8) -> Option<u32> {
    b.is_ascii_digit().then(|| u32::from(b - b'0'))
}

fn isbn10_checks(bytes: &[u8]) -> bool {
    let mut sum = 0;
    for (i, &b) in bytes[..9].iter().enumerate() {
        match digit(b) {
            // Position i+1 carries weight 11 - (i+1)
            Some(d) => sum += d * (10 - i as u32),
            None => return false,
        }
    }

    let actual = match bytes[9] {
        b'X' => 10,
        b => match digit(b) {
            Some(d) => d,
            None => return false,
        },
    };

    (11 - sum % 11) % 11 == actual
}

fn isbn13_checks(bytes: &[u8]) -> bool {
    let mut sum = 0;
    for (i, &b) in bytes[..12].iter().enumerate() {
        match digit(b) {
            Some(d) => sum += d * if i % 2 == 0 { 1 } else { 3 },
            None => return false,
        }
    }

    match digit(bytes[12]) {
        Some(check) => (10 - sum % 10) % 10 == check,
        None => false,
    }
}

/// A structurally valid, canonical ISBN
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Isbn {
    canonical: String,
    form: IsbnForm,
}

impl Isbn {
    /// Normalize raw user input and validate it.
    pub fn parse(raw: &str) -> Result<Self> {
        let canonical = normalize(raw);
        let form = classify(&canonical).ok_or_else(|| {
            Error::InvalidInput(format!("ISBN appears invalid (check digit): {}", raw.trim()))
        })?;
        Ok(Self { canonical, form })
    }

    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    pub fn form(&self) -> IsbnForm {
        self.form
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl AsRef<str> for Isbn {
    fn as_ref(&self) -> &str {
        &self.canonical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(normalize("978-0-306-40615-7"), "9780306406157");
        assert_eq!(normalize(" 0 306 40615 2 "), "0306406152");
        assert_eq!(normalize("ISBN: 0306406152"), "0306406152");
    }

    #[test]
    fn test_normalize_uppercases_x() {
        assert_eq!(normalize("030640615x"), "030640615X");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for s in ["", "abc", "0-306-40615-2", "xX9 9-x", "ünïcødé 12"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "input {:?}", s);
        }
    }

    #[test]
    fn test_canonical_forms_validate() {
        assert!(is_valid("0306406152"));
        assert!(is_valid("9780306406157"));
        assert_eq!(classify("0306406152"), Some(IsbnForm::Isbn10));
        assert_eq!(classify("9780306406157"), Some(IsbnForm::Isbn13));
    }

    #[test]
    fn test_bad_check_digit_rejected() {
        assert!(!is_valid("0306406153"));
        assert!(!is_valid("9780306406158"));
    }

    #[test]
    fn test_wrong_lengths_rejected() {
        assert!(!is_valid(""));
        assert!(!is_valid("030640615"));
        assert!(!is_valid("03064061521"));
        assert!(!is_valid("978030640615"));
    }

    #[test]
    fn test_x_check_character() {
        // 080442957X: weighted sum 199, check value 10
        assert!(is_valid(&normalize("080442957x")));
        // X is only meaningful in the final position of the 10-form
        assert!(!is_valid("08044295X7"));
        assert!(!is_valid("978030640615X"));
    }

    #[test]
    fn test_complete_length() {
        assert!(complete_length("0306406153"));
        assert!(complete_length("9780306406157"));
        assert!(!complete_length("978030640615"));
    }

    #[test]
    fn test_isbn_parse() {
        let isbn = Isbn::parse("978-0-14-312774-1").unwrap();
        assert_eq!(isbn.as_str(), "9780143127741");
        assert_eq!(isbn.form(), IsbnForm::Isbn13);
        assert_eq!(isbn.to_string(), "9780143127741");

        assert!(matches!(
            Isbn::parse("0306406153"),
            Err(Error::InvalidInput(_))
        ));
    }
}
