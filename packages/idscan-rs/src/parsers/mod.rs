//! Raw OCR text to [`ExtractedInfo`], one parser per document type.
//!
//! Every parser is a pure function. Each one locates an ID number with a
//! type-specific pattern, finds the name by printed labels or by scoring lines,
//! picks a date of birth, attaches fixed confidence weights and finally runs
//! [`post_process`] so that no invalid value leaves this module.
use chrono::{Local, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::date::{is_iso_calendar_date, normalize_date};
use crate::detect::detect_id_type;
use crate::heuristics::{
    clean_name_candidate, collapse_whitespace, is_garbage_name_candidate, is_reasonable_dob_at,
    is_reasonable_full_name,
};
use crate::id_numbers::{is_legacy_drivers_license_number, normalize_id_number};
use crate::id_type::IdType;
use crate::registry::get_descriptor;
use crate::types::ExtractedInfo;

pub mod drivers_license;
pub mod generic;
pub mod national_id;
pub mod philhealth;
pub mod pwd;
pub mod qc_citizen;
pub mod sss;
pub mod umid;

/// Detected types below this confidence fall back to the generic parser.
pub const DETECTION_THRESHOLD: f32 = 0.8;

/// Fixed "today" for parser tests, so age checks do not drift.
#[cfg(test)]
pub(crate) fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

/// Compiles `pattern` into `cell` on first use.
pub(crate) fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("parser pattern"))
}

/// Parses `text` with the parser registered for `id_type`, judging birth
/// dates against the local date.
pub fn parse_text_by_id_type(text: &str, id_type: IdType) -> ExtractedInfo {
    parse_text_by_id_type_at(text, id_type, Local::now().date_naive())
}

/// Parses `text` with the parser registered for `id_type`.
///
/// `Unknown` triggers keyword detection first; a confident match runs that
/// type's parser, so the result may carry a more specific `id_type`. A birth
/// date is kept only if it implies a plausible age on `today`.
pub fn parse_text_by_id_type_at(text: &str, id_type: IdType, today: NaiveDate) -> ExtractedInfo {
    if id_type == IdType::Unknown {
        let detected = detect_id_type(text);
        if detected.id_type != IdType::Unknown && detected.confidence >= DETECTION_THRESHOLD {
            debug!(
                detected = %detected.id_type,
                confidence = detected.confidence,
                "using detected document type"
            );
            return get_descriptor(detected.id_type).parse(text, today);
        }
    }
    get_descriptor(id_type).parse(text, today)
}

/// Re-checks every field of a parser's output and blanks the ones that fail,
/// capping their confidence.
pub fn post_process(info: ExtractedInfo, today: NaiveDate) -> ExtractedInfo {
    let mut out = ExtractedInfo {
        full_name: collapse_whitespace(&info.full_name),
        dob: info.dob.trim().to_string(),
        id_number: normalize_id_number(&info.id_number),
        ..info
    };

    if !out.full_name.is_empty() {
        let cleaned = clean_name_candidate(&out.full_name);
        if !cleaned.is_empty() {
            out.full_name = cleaned;
        }
        if !is_reasonable_full_name(&out.full_name) {
            out.full_name.clear();
            if let Some(c) = out.confidence.as_mut() {
                c.full_name = c.full_name.min(0.2);
            }
        }
    }

    if !out.dob.is_empty() {
        if !is_iso_calendar_date(&out.dob) {
            let normalized = normalize_date(&out.dob);
            if !normalized.is_empty() {
                out.dob = normalized;
            }
        }
        if !is_iso_calendar_date(&out.dob) || !is_reasonable_dob_at(&out.dob, today) {
            out.dob.clear();
            if let Some(c) = out.confidence.as_mut() {
                c.dob = c.dob.min(0.2);
            }
        }
    }

    if !out.id_number.is_empty() {
        let rejected = get_descriptor(out.id_type)
            .validate_id_number
            .is_some_and(|validate| !validate(&out.id_number));
        if rejected {
            let legacy_license = out.id_type == IdType::DriversLicense
                && is_legacy_drivers_license_number(&out.id_number);
            let cap = if legacy_license { 0.6 } else { 0.25 };
            if !legacy_license {
                out.id_number.clear();
            }
            if let Some(c) = out.confidence.as_mut() {
                c.id_number = c.id_number.min(cap);
            }
        }
    }

    out
}

/// Trimmed, non-empty lines.
pub(crate) fn lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}

static LABEL_WORDS: OnceLock<Regex> = OnceLock::new();
static ISO_DOB: OnceLock<Regex> = OnceLock::new();
static NUMERIC_DOB: OnceLock<Regex> = OnceLock::new();
static MONTH_DOB: OnceLock<Regex> = OnceLock::new();
static SURNAME_TOKEN: OnceLock<Regex> = OnceLock::new();
static ADDRESS_LABEL: OnceLock<Regex> = OnceLock::new();
static ADDRESS_SKIP: OnceLock<Regex> = OnceLock::new();
static ADDRESS_HINT: OnceLock<Regex> = OnceLock::new();
static ADDRESS_HEADER: OnceLock<Regex> = OnceLock::new();

pub(crate) fn is_likely_name_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.chars().count() < 5 || is_garbage_name_candidate(trimmed) {
        return false;
    }
    if trimmed.split_whitespace().count() < 2 {
        return false;
    }
    let label = cached(
        &LABEL_WORDS,
        r"(?i)(name|surname|given|middle|birth|date|sex|gender)\b",
    );
    if label.is_match(trimmed) {
        return false;
    }
    is_reasonable_full_name(trimmed)
}

/// Longest name-like line; the earliest wins a tie.
pub(crate) fn pick_best_name_line(lines: &[&str]) -> String {
    lines
        .iter()
        .copied()
        .filter(|l| is_likely_name_line(l))
        .min_by_key(|l| std::cmp::Reverse(l.len()))
        .map(|l| l.trim().to_string())
        .unwrap_or_default()
}

/// First date found in `joined`, trying ISO-ordered, local numeric and
/// month-name shapes in that order.
pub(crate) fn pick_best_dob(joined: &str) -> String {
    let shapes = [
        cached(&ISO_DOB, r"\b[0-9]{4}[/\-][0-9]{1,2}[/\-][0-9]{1,2}\b"),
        cached(&NUMERIC_DOB, r"\b[0-9]{1,2}[/\-][0-9]{1,2}[/\-][0-9]{2,4}\b"),
        cached(
            &MONTH_DOB,
            r"(?i)\b(January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept?|Oct|Nov|Dec)\.?\s+[0-9]{1,3},?\s+[0-9]{4}\b",
        ),
    ];

    shapes
        .iter()
        .filter_map(|re| re.find(joined))
        .map(|m| normalize_date(m.as_str()))
        .find(|iso| !iso.is_empty())
        .unwrap_or_default()
}

/// Longest token that carries a digit and is mostly `[A-Za-z0-9-]`.
pub(crate) fn pick_best_id_token(joined: &str) -> String {
    joined
        .split_whitespace()
        .filter(|t| {
            let len = t.chars().count();
            if len < 6 || !t.chars().any(|c| c.is_ascii_digit()) {
                return false;
            }
            let kept = t.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '-').count();
            kept as f32 / len as f32 >= 0.7
        })
        .min_by_key(|t| std::cmp::Reverse(t.len()))
        .map(|t| t.trim_end_matches(['.', ',']).to_string())
        .unwrap_or_default()
}

/// The trailing all-caps word of a one- or two-word line.
pub(crate) fn extract_surname_token(line: &str) -> Option<&str> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.is_empty() || parts.len() > 2 {
        return None;
    }
    let last = parts[parts.len() - 1];
    cached(&SURNAME_TOKEN, r"^[A-Z]{3,20}$")
        .is_match(last)
        .then_some(last)
}

/// Up to three lines after an "Address" label, else the first line that
/// mentions a street or city keyword.
pub(crate) fn extract_address(text: &str) -> String {
    let lines = lines(text);

    let label = cached(&ADDRESS_LABEL, r"(?i)(^address|\baddress\s*:)");
    if let Some(idx) = lines.iter().position(|l| label.is_match(l)) {
        let skip = cached(
            &ADDRESS_SKIP,
            r"(?i)(name|birth|sex|date|\bid\b|number|license|expiry)",
        );
        let picked: Vec<&str> = lines
            .iter()
            .skip(idx + 1)
            .take(3)
            .copied()
            .filter(|l| !skip.is_match(l))
            .collect();
        if !picked.is_empty() {
            return collapse_whitespace(&picked.join(", "));
        }
    }

    let hint = cached(
        &ADDRESS_HINT,
        r"(?i)(brgy|barangay|street|\bst\.|\bave\b|avenue|city|metro|manila|quezon)",
    );
    let header = cached(
        &ADDRESS_HEADER,
        r"(?i)(citizen|republic|government|\bid\b|card)",
    );
    lines
        .iter()
        .find(|l| hint.is_match(l) && !header.is_match(l))
        .map(|l| l.to_string())
        .unwrap_or_default()
}
