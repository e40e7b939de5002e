//! LTO driver's license text.
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use super::{cached, extract_address, lines, pick_best_dob, post_process};
use crate::heuristics::collapse_whitespace;
use crate::id_type::IdType;
use crate::types::{ExtractedInfo, FieldConfidence};

static LICENSE_NUMBER: OnceLock<Regex> = OnceLock::new();
static LEGACY_NUMBER: OnceLock<Regex> = OnceLock::new();
static COMMA_NAME: OnceLock<Regex> = OnceLock::new();
static CAPS_RUN: OnceLock<Regex> = OnceLock::new();
static AFTER_NAME_LABEL: OnceLock<Regex> = OnceLock::new();
static ISSUER_WORDS: OnceLock<Regex> = OnceLock::new();
static LEADING_INITIAL: OnceLock<Regex> = OnceLock::new();
static DOB_FULL: OnceLock<Regex> = OnceLock::new();
static DOB_MMDD: OnceLock<Regex> = OnceLock::new();

fn issuer_words() -> &'static Regex {
    cached(
        &ISSUER_WORDS,
        r"(?i)REPUBLIC|PHILIPPINES|TRANSPORTATION|LICENSE|DRIVER|PROFESSIONAL|DEPARTMENT|OFFICE",
    )
}

/// `A12-34-567890` with the agency letter defaulting to `N`; older
/// three-digit numbers are kept in their printed `###-##-######` form.
fn find_license_number(joined: &str) -> String {
    let modern = cached(
        &LICENSE_NUMBER,
        r"\b([A-Z])?([0-9]{2})[-\s]?([0-9]{2})[-\s]?([0-9]{6})\b",
    );
    if let Some(caps) = modern.captures(joined) {
        let letter = caps.get(1).map_or("N", |m| m.as_str());
        return format!("{letter}{}-{}-{}", &caps[2], &caps[3], &caps[4]);
    }
    cached(&LEGACY_NUMBER, r"\b[0-9]{3}-[0-9]{2}-[0-9]{6}\b")
        .find(joined)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn find_name(lines: &[&str], joined: &str) -> String {
    let comma = cached(
        &COMMA_NAME,
        r"([A-Z]{2,}(?:\s+[A-Z]{2,})*),\s*([A-Z]{2,}(?:\s+[A-Z]{2,})*)",
    );
    let from_comma = lines.iter().find_map(|line| {
        let caps = comma.captures(line)?;
        let last = caps[1].trim();
        if issuer_words().is_match(last) {
            return None;
        }
        Some(format!("{} {}", caps[2].trim(), last))
    });
    if let Some(name) = from_comma {
        return name;
    }

    let caps_run = cached(&CAPS_RUN, r"\b[A-Z]{3,}(?:\s+[A-Z]{3,}){2,4}\b");
    if let Some(run) = lines
        .iter()
        .copied()
        .flat_map(|line| caps_run.find_iter(line))
        .map(|m| m.as_str())
        .find(|run| !issuer_words().is_match(run))
    {
        return run.to_string();
    }

    cached(
        &AFTER_NAME_LABEL,
        r"(?i)(?:Last|First|Middle)\s*Name[^A-Z]*([A-Z]{3,}(?:\s+[A-Z]{3,}){2,4})",
    )
    .captures(joined)
    .map(|caps| caps[1].to_string())
    .unwrap_or_default()
}

fn find_dob(joined: &str) -> String {
    if let Some(caps) = cached(&DOB_FULL, r"\b([0-9]{4})[/\-]([0-9]{2})[/\-]([0-9]{2})\b").captures(joined) {
        return format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]);
    }
    // Some cards drop the separator between month and day.
    if let Some(caps) = cached(&DOB_MMDD, r"\b([0-9]{4})[/\-]([0-9]{2})([0-9]{2})\b").captures(joined) {
        return format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]);
    }
    pick_best_dob(joined)
}

pub fn parse(text: &str, today: NaiveDate) -> ExtractedInfo {
    let lines = lines(text);
    let joined = collapse_whitespace(text);

    let id_number = find_license_number(&joined);
    let name = find_name(&lines, &joined);
    let full_name = cached(&LEADING_INITIAL, r"^[A-Za-z]\s+")
        .replace(&name, "")
        .trim()
        .to_string();
    let dob = find_dob(&joined);
    let address = extract_address(text);

    let confidence = FieldConfidence::new(
        if full_name.is_empty() { 0.3 } else { 0.85 },
        if dob.is_empty() { 0.3 } else { 0.8 },
        if id_number.is_empty() { 0.3 } else { 0.95 },
    )
    .with_address(if address.is_empty() { 0.2 } else { 0.7 });

    let info = ExtractedInfo {
        full_name,
        dob,
        id_number,
        id_type: IdType::DriversLicense,
        confidence: Some(confidence),
        address: (!address.is_empty()).then_some(address),
    };
    post_process(info, today)
}
