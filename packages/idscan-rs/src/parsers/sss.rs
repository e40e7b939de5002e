//! Social Security System ID text.
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use super::{cached, lines, pick_best_dob, post_process};
use crate::heuristics::collapse_whitespace;
use crate::id_type::IdType;
use crate::types::{ExtractedInfo, FieldConfidence};

static SS_NUMBER: OnceLock<Regex> = OnceLock::new();
static DIGIT_RUN: OnceLock<Regex> = OnceLock::new();
static COMMA_NAME: OnceLock<Regex> = OnceLock::new();
static CAPS_NAME: OnceLock<Regex> = OnceLock::new();
static NAME_BEFORE_NUMBER: OnceLock<Regex> = OnceLock::new();
static BOILERPLATE: OnceLock<Regex> = OnceLock::new();

fn boilerplate() -> &'static Regex {
    cached(
        &BOILERPLATE,
        r"(?i)REPUBLIC|PHILIPPINES|SOCIAL|SECURITY|SYSTEM|PRESIDENT|PROUD|FILIPINO|\bSSS\b",
    )
}

/// Finds the printed `##-#######-#` number or rebuilds it from a bare run of
/// nine or ten digits.
fn find_ss_number(joined: &str) -> (String, Option<String>) {
    if let Some(m) = cached(&SS_NUMBER, r"[0-9]{2}-[0-9]{7}-[0-9]").find(joined) {
        return (m.as_str().to_string(), Some(m.as_str().to_string()));
    }
    let rebuilt = cached(&DIGIT_RUN, r"\b([0-9]{9,10})\b")
        .captures(joined)
        .map(|caps| {
            let d = &caps[1];
            if d.len() == 10 {
                format!("{}-{}-{}", &d[..2], &d[2..9], &d[9..])
            } else {
                format!("0{}-{}-{}", &d[..1], &d[1..8], &d[8..])
            }
        })
        .unwrap_or_default();
    (rebuilt, None)
}

fn find_name(lines: &[&str], joined: &str, printed_number: Option<&str>) -> String {
    let comma = cached(&COMMA_NAME, r"([A-Z][A-Z']+),\s*([A-Z][A-Z'\s.]+)");
    if let Some(name) = lines.iter().find_map(|line| {
        let caps = comma.captures(line)?;
        Some(format!("{} {}", caps[2].trim(), caps[1].trim()))
    }) {
        return name;
    }

    let caps_name = cached(&CAPS_NAME, r"\b[A-Z]{3,}\s+[A-Z]{3,}(?:\s+[A-Z]{3,})?\b");
    if let Some(m) = lines
        .iter()
        .copied()
        .flat_map(|line| caps_name.find_iter(line))
        .find(|m| !boilerplate().is_match(m.as_str()))
    {
        return m.as_str().to_string();
    }

    // Mixed-case lines where two to four words survive stripping punctuation.
    for line in lines {
        let words: Vec<String> = line
            .split_whitespace()
            .map(|w| w.chars().filter(|c| c.is_ascii_alphabetic()).collect::<String>())
            .filter(|w| w.len() >= 3)
            .collect();
        if !(2..=4).contains(&words.len()) {
            continue;
        }
        let candidate = words.join(" ");
        if candidate == candidate.to_uppercase() && !boilerplate().is_match(&candidate) {
            return candidate;
        }
    }

    printed_number
        .and_then(|number| joined.find(number))
        .and_then(|idx| {
            cached(
                &NAME_BEFORE_NUMBER,
                r"([A-Z]{2,}\s+[A-Z]{2,}(?:\s+[A-Z]{2,})?)\s*$",
            )
            .captures(&joined[..idx])
            .map(|caps| caps[1].to_string())
        })
        .unwrap_or_default()
}

/// Drops one- and two-letter fragments from either end while at least two
/// words remain.
fn trim_edge_fragments(name: &str) -> String {
    let mut words: Vec<&str> = name.split_whitespace().collect();
    while words.len() > 2 && words[0].len() <= 2 {
        words.remove(0);
    }
    while words.len() > 2 && words[words.len() - 1].len() <= 2 {
        words.pop();
    }
    words.join(" ")
}

pub fn parse(text: &str, today: NaiveDate) -> ExtractedInfo {
    let lines = lines(text);
    let joined = collapse_whitespace(text);

    let (id_number, printed) = find_ss_number(&joined);
    let full_name = trim_edge_fragments(&find_name(&lines, &joined, printed.as_deref()));
    let dob = pick_best_dob(&joined);

    let confidence = FieldConfidence::new(
        if full_name.is_empty() { 0.3 } else { 0.85 },
        if dob.is_empty() { 0.3 } else { 0.8 },
        if id_number.is_empty() { 0.3 } else { 0.95 },
    );

    let info = ExtractedInfo {
        full_name,
        dob,
        id_number,
        id_type: IdType::SssId,
        confidence: Some(confidence),
        address: None,
    };
    post_process(info, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::test_today;

    #[test]
    fn reads_card_with_printed_number() {
        let text = "Republic of the Philippines\nSOCIAL SECURITY SYSTEM\nSS No. 34-1234567-8\nREYES, ANA MARIE\n03/15/1992";
        let info = parse(text, test_today());
        assert_eq!(info.id_number, "34-1234567-8");
        assert_eq!(info.full_name, "ANA MARIE REYES");
        assert_eq!(info.dob, "1992-03-15");
        assert_eq!(info.id_type, IdType::SssId);
    }

    #[test]
    fn rebuilds_number_from_digit_run() {
        assert_eq!(find_ss_number("SS 3412345678").0, "34-1234567-8");
        assert_eq!(find_ss_number("SS 341234567").0, "03-4123456-7");
        assert_eq!(find_ss_number("none").0, "");
    }

    #[test]
    fn caps_name_skips_boilerplate() {
        let text = "SOCIAL SECURITY SYSTEM\nPROUD TO BE FILIPINO\nPEDRO GARCIA LOPEZ\n34-1234567-8";
        assert_eq!(parse(text, test_today()).full_name, "PEDRO GARCIA LOPEZ");
    }

    #[test]
    fn edge_fragments_are_trimmed() {
        assert_eq!(trim_edge_fragments("MR PEDRO LOPEZ JR"), "PEDRO LOPEZ");
        assert_eq!(trim_edge_fragments("AB CD"), "AB CD");
    }
}
