//! Philippine National ID (PhilSys) card text.
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use super::{cached, extract_surname_token, lines, pick_best_name_line, post_process};
use crate::date::normalize_date;
use crate::heuristics::{clean_name_candidate, collapse_whitespace, national_id_header};
use crate::id_type::IdType;
use crate::types::{ExtractedInfo, FieldConfidence};

static ID_NUMBER: OnceLock<Regex> = OnceLock::new();
static LAST_NAME_LABEL: OnceLock<Regex> = OnceLock::new();
static GIVEN_NAMES_LABEL: OnceLock<Regex> = OnceLock::new();
static MIDDLE_NAME_LABEL: OnceLock<Regex> = OnceLock::new();
static NOT_A_VALUE: OnceLock<Regex> = OnceLock::new();
static UPPERCASE_LINE: OnceLock<Regex> = OnceLock::new();
static HEADER_LIKE: OnceLock<Regex> = OnceLock::new();
static ADDRESS_LIKE: OnceLock<Regex> = OnceLock::new();
static DOB: OnceLock<Regex> = OnceLock::new();

/// The line printed under the first line matching `label`, unless that line is
/// itself another label.
fn value_below(lines: &[&str], label: &Regex) -> String {
    let not_a_value = cached(
        &NOT_A_VALUE,
        r"(?i)(Apelyido|Given|Petsa|Date|Kapanganakan|Birth|\bID\b|Numero)",
    );
    lines
        .iter()
        .position(|l| label.is_match(l))
        .and_then(|idx| lines.get(idx + 1))
        .filter(|next| !not_a_value.is_match(next))
        .map(|next| next.to_string())
        .unwrap_or_default()
}

/// An uppercase surname on one of the three lines above `anchor`.
fn surname_above(lines: &[&str], anchor: &str) -> Option<String> {
    let idx = lines.iter().position(|l| *l == anchor)?;
    lines[idx.saturating_sub(3)..idx]
        .iter()
        .rev()
        .find_map(|l| extract_surname_token(l))
        .map(str::to_string)
}

pub fn parse(text: &str, today: NaiveDate) -> ExtractedInfo {
    let lines = lines(text);
    let joined = collapse_whitespace(text);

    let id_number = cached(&ID_NUMBER, r"\b[0-9]{4}-[0-9]{4}-[0-9]{4}-[0-9]{4}\b")
        .find(&joined)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let labeled_last = value_below(&lines, cached(&LAST_NAME_LABEL, r"(?i)Apelyido|Last\s*Name"));
    let last_name = if labeled_last.is_empty() {
        let uppercase = cached(&UPPERCASE_LINE, r"^[A-Z\s]{3,}$");
        let header_like = cached(
            &HEADER_LIKE,
            r"(?i)(PILIP|PHILIPPINES?|REPUBLIKA|REPUBLIC|PAMBANSANG|PAGKAKAKILANLAN|IDENTIFICATION|CARD)",
        );
        let candidates: Vec<&str> = lines
            .iter()
            .copied()
            .filter(|l| !national_id_header().is_match(l))
            .filter(|l| uppercase.is_match(l) && !header_like.is_match(l))
            .collect();
        pick_best_name_line(&candidates)
    } else {
        labeled_last.clone()
    };
    let given_names = value_below(
        &lines,
        cached(&GIVEN_NAMES_LABEL, r"(?i)Mga\s*Pangalan|Given\s*Names"),
    );
    let middle_name = value_below(
        &lines,
        cached(&MIDDLE_NAME_LABEL, r"(?i)Gitnang\s*Apelyido|Middle\s*Name"),
    );

    // The given-names value sometimes picks up the address block instead.
    let address_like = cached(&ADDRESS_LIKE, r"(?i)^/|CITY|CTY");
    let anchor = if given_names.is_empty() || address_like.is_match(&given_names) {
        last_name.clone()
    } else {
        given_names
    };

    let surname = if !labeled_last.is_empty() && labeled_last != anchor {
        labeled_last
    } else {
        surname_above(&lines, &anchor)
            .or_else(|| (!last_name.is_empty() && last_name != anchor).then(|| last_name.clone()))
            .unwrap_or_default()
    };

    let raw_full_name = [anchor.as_str(), middle_name.as_str(), surname.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let cleaned = clean_name_candidate(&raw_full_name);
    let full_name = if cleaned.is_empty() { raw_full_name } else { cleaned };

    let dob = cached(
        &DOB,
        r"(?i)\b(January|February|March|April|May|June|July|August|September|October|November|December)\s+[0-9]{1,3},?\s*[0-9]{4}\b",
    )
    .find(&joined)
    .map(|m| normalize_date(m.as_str()))
    .unwrap_or_default();

    let confidence = FieldConfidence::new(
        if full_name.is_empty() { 0.4 } else { 0.95 },
        if dob.is_empty() { 0.4 } else { 0.9 },
        if id_number.is_empty() { 0.3 } else { 1.0 },
    );

    let info = ExtractedInfo {
        full_name,
        dob,
        id_number,
        id_type: IdType::NationalId,
        confidence: Some(confidence),
        address: None,
    };
    post_process(info, today)
}
