//! PhilHealth member ID card text.
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use super::{cached, lines, post_process};
use crate::date::normalize_date;
use crate::heuristics::collapse_whitespace;
use crate::id_type::IdType;
use crate::types::{ExtractedInfo, FieldConfidence};

static ID_NUMBER: OnceLock<Regex> = OnceLock::new();
static COMMA_NAME: OnceLock<Regex> = OnceLock::new();
static DOB: OnceLock<Regex> = OnceLock::new();

/// `DELA CRUZ, Juan P.` is printed surname first; reorder to given-first.
fn reorder_comma_name(line: &str) -> String {
    match line.split_once(',') {
        Some((last, given)) if !last.trim().is_empty() && !given.trim().is_empty() => {
            collapse_whitespace(&format!("{} {}", given.trim(), last.trim()))
        }
        _ => line.to_string(),
    }
}

pub fn parse(text: &str, today: NaiveDate) -> ExtractedInfo {
    let lines = lines(text);
    let joined = collapse_whitespace(text);

    let id_number = cached(&ID_NUMBER, r"\b[0-9]{2}-[0-9]{9}-[0-9]\b")
        .find(&joined)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let comma_name = cached(&COMMA_NAME, r"^[A-Z][A-Za-z'\-]+(?:\s+[A-Z][A-Za-z'\-]+)*,\s*[A-Za-z]");
    let full_name = lines
        .iter()
        .find(|l| comma_name.is_match(l))
        .map(|l| reorder_comma_name(l))
        .unwrap_or_default();

    let dob = cached(
        &DOB,
        r"(?i)\b(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\.?\s+[0-9]{1,2},?\s*[0-9]{4}\b",
    )
    .find(&joined)
    .map(|m| normalize_date(m.as_str()))
    .unwrap_or_default();

    let confidence = FieldConfidence::new(
        if full_name.is_empty() { 0.3 } else { 0.85 },
        if dob.is_empty() { 0.3 } else { 0.85 },
        if id_number.is_empty() { 0.4 } else { 0.98 },
    );

    let info = ExtractedInfo {
        full_name,
        dob,
        id_number,
        id_type: IdType::PhilHealthId,
        confidence: Some(confidence),
        address: None,
    };
    post_process(info, today)
}
