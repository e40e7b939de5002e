//! Per-document ID number shapes and the OCR clean-ups applied before matching them.
use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

static NATIONAL_ID: OnceLock<Regex> = OnceLock::new();
static NATIONAL_ID_LOOSE: OnceLock<Regex> = OnceLock::new();
static PHILHEALTH: OnceLock<Regex> = OnceLock::new();
static UMID_CRN: OnceLock<Regex> = OnceLock::new();
static DRIVERS_LICENSE: OnceLock<Regex> = OnceLock::new();
static DRIVERS_LICENSE_LEGACY: OnceLock<Regex> = OnceLock::new();
static QC_CITIZEN: OnceLock<Regex> = OnceLock::new();
static SSS: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str, case_insensitive: bool) -> &'static Regex {
    cell.get_or_init(|| {
        RegexBuilder::new(pattern)
            .case_insensitive(case_insensitive)
            .build()
            .expect("id number pattern")
    })
}

/// Removes every whitespace character.
pub fn normalize_id_number(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn is_valid_national_id_number(id: &str) -> bool {
    compiled(&NATIONAL_ID, r"^[0-9]{4}-[0-9]{4}-[0-9]{4}-[0-9]{4}$", false).is_match(id.trim())
}

pub fn is_valid_philhealth_number(id: &str) -> bool {
    compiled(&PHILHEALTH, r"^[0-9]{2}-[0-9]{9}-[0-9]$", false).is_match(id.trim())
}

pub fn is_valid_umid_crn(id: &str) -> bool {
    compiled(&UMID_CRN, r"^CRN-[0-9]{4}-[0-9]{7}-[0-9]$", true).is_match(id.trim())
}

pub fn is_valid_drivers_license_number(id: &str) -> bool {
    let trimmed = id.trim();
    !trimmed.is_empty() && compiled(&DRIVERS_LICENSE, r"\b[A-Z][0-9]{2}-[0-9]{2}-[0-9]{6}\b", true).is_match(trimmed)
}

/// Pre-letter license numbers still printed on older cards.
pub fn is_legacy_drivers_license_number(id: &str) -> bool {
    compiled(&DRIVERS_LICENSE_LEGACY, r"^[0-9]{2,3}-[0-9]{2}-[0-9]{6}$", false).is_match(id.trim())
}

pub fn is_valid_qc_citizen_number(id: &str) -> bool {
    let trimmed = id.trim();
    !trimmed.is_empty() && compiled(&QC_CITIZEN, r"^[0-9]{3}-[0-9]{8}$", false).is_match(trimmed)
}

pub fn is_valid_sss_number(id: &str) -> bool {
    compiled(&SSS, r"^[0-9]{2}-[0-9]{7}-[0-9]$", false).is_match(id.trim())
}

/// Reads a National ID number out of a noisy single-field crop.
///
/// Common glyph confusions (`O` for `0`, `I`/`l` for `1`) are repaired and
/// spaces around dashes tolerated; the result is the canonical
/// `XXXX-XXXX-XXXX-XXXX` form or `""`.
pub fn extract_national_id_number(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let repaired: String = text
        .chars()
        .map(|c| match c {
            'O' => '0',
            'I' | 'l' => '1',
            other => other,
        })
        .collect();
    let cleaned = repaired.split_whitespace().collect::<Vec<_>>().join(" ");

    let loose = compiled(
        &NATIONAL_ID_LOOSE,
        r"\b[0-9]{4}\s*-\s*[0-9]{4}\s*-\s*[0-9]{4}\s*-\s*[0-9]{4}\b",
        false,
    );
    let Some(found) = loose.find(&cleaned) else {
        return String::new();
    };

    let digits: String = found.as_str().chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 16 {
        return String::new();
    }

    format!("{}-{}-{}-{}", &digits[0..4], &digits[4..8], &digits[8..12], &digits[12..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validators_accept_canonical_shapes() {
        assert!(is_valid_national_id_number("1234-5678-9012-3456"));
        assert!(is_valid_national_id_number(" 1234-5678-9012-3456 "));
        assert!(!is_valid_national_id_number("99-999999999-9"));
        assert!(is_valid_philhealth_number("12-345678901-2"));
        assert!(is_valid_umid_crn("crn-0111-2345678-9"));
        assert!(is_valid_drivers_license_number("N01-23-456789"));
        assert!(!is_valid_drivers_license_number(""));
        assert!(is_legacy_drivers_license_number("101-23-456789"));
        assert!(is_valid_qc_citizen_number("123-45678901"));
        assert!(is_valid_sss_number("34-1234567-8"));
    }

    #[test]
    fn normalize_strips_all_whitespace() {
        assert_eq!(normalize_id_number(" 12 34-56\t78 "), "1234-5678");
    }

    #[test]
    fn extracts_national_id_from_noisy_text() {
        assert_eq!(extract_national_id_number("PCN 1234 - 5678-9O12 -3456"), "1234-5678-9012-3456");
        assert_eq!(extract_national_id_number("l234-5678-9012-3456"), "1234-5678-9012-3456");
        assert_eq!(extract_national_id_number("1234-5678-9012"), "");
        assert_eq!(extract_national_id_number(""), "");
    }
}
