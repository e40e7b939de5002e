//! Unified Multi-Purpose ID (UMID) card text.
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use super::{cached, lines, pick_best_dob, post_process};
use crate::heuristics::{clean_name_candidate, collapse_whitespace};
use crate::id_type::IdType;
use crate::types::{ExtractedInfo, FieldConfidence};

static CRN: OnceLock<Regex> = OnceLock::new();
static SURNAME_LABEL: OnceLock<Regex> = OnceLock::new();
static GIVEN_LABEL: OnceLock<Regex> = OnceLock::new();
static MIDDLE_LABEL: OnceLock<Regex> = OnceLock::new();
static ANY_LABEL: OnceLock<Regex> = OnceLock::new();
static DOB_LABEL: OnceLock<Regex> = OnceLock::new();
static DOB_VALUE: OnceLock<Regex> = OnceLock::new();

/// CRN with loose separators, rewritten as `CRN-####-#######-#`.
fn find_crn(joined: &str) -> String {
    cached(&CRN, r"(?i)CRN-?\s*([0-9]{4})-?\s*([0-9]{7})-?\s*([0-9])")
        .captures(joined)
        .map(|caps| format!("CRN-{}-{}-{}", &caps[1], &caps[2], &caps[3]))
        .unwrap_or_default()
}

pub fn parse(text: &str, today: NaiveDate) -> ExtractedInfo {
    let lines = lines(text);
    let joined = collapse_whitespace(text);

    let id_number = find_crn(&joined);

    let surname_label = cached(&SURNAME_LABEL, r"(?i)surname");
    let given_label = cached(&GIVEN_LABEL, r"(?i)given\s+name");
    let middle_label = cached(&MIDDLE_LABEL, r"(?i)middle\s+name");
    let any_label = cached(
        &ANY_LABEL,
        r"(?i)(surname|middle\s+name|date\s+of\s+birth|\bsex\b|address|\bcrn\b)",
    );

    let after = |label: &Regex| -> String {
        lines
            .iter()
            .position(|l| label.is_match(l))
            .and_then(|idx| lines.get(idx + 1))
            .filter(|next| !any_label.is_match(next) && !given_label.is_match(next))
            .map(|next| next.to_string())
            .unwrap_or_default()
    };

    let last_name = after(surname_label);
    let middle_name = after(middle_label);

    // Long given names wrap onto a second line; read until the next label.
    let given_names = lines
        .iter()
        .position(|l| given_label.is_match(l))
        .map(|idx| {
            lines[idx + 1..]
                .iter()
                .take_while(|l| !any_label.is_match(l))
                .copied()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    let raw_full_name = collapse_whitespace(&format!("{given_names} {middle_name} {last_name}"));
    let cleaned = clean_name_candidate(&raw_full_name);
    let full_name = if cleaned.is_empty() { raw_full_name } else { cleaned };

    let dob_value = cached(&DOB_VALUE, r"([0-9]{4})[/\-]([0-9]{2})[/\-]([0-9]{2})");
    let labeled_dob = lines
        .iter()
        .position(|l| cached(&DOB_LABEL, r"(?i)date\s+of\s+birth").is_match(l))
        .and_then(|idx| lines.get(idx + 1))
        .and_then(|next| dob_value.captures(next))
        .map(|caps| format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]));
    let dob = labeled_dob.unwrap_or_else(|| pick_best_dob(&joined));

    let confidence = FieldConfidence::new(
        if full_name.is_empty() { 0.3 } else { 0.8 },
        if dob.is_empty() { 0.3 } else { 0.85 },
        if id_number.is_empty() { 0.4 } else { 0.95 },
    );

    let info = ExtractedInfo {
        full_name,
        dob,
        id_number,
        id_type: IdType::Umid,
        confidence: Some(confidence),
        address: None,
    };
    post_process(info, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::test_today;

    const CARD: &str = "REPUBLIC OF THE PHILIPPINES
Unified Multi-Purpose ID
CRN 0111 2345678 9
SURNAME
SANTOS
GIVEN NAME
MARIA
CLARA
MIDDLE NAME
REYES
SEX M DATE OF BIRTH
1988/07/21";

    #[test]
    fn reads_stacked_labels() {
        let info = parse(CARD, test_today());
        assert_eq!(info.id_number, "CRN-0111-2345678-9");
        assert_eq!(info.full_name, "MARIA CLARA REYES SANTOS");
        assert_eq!(info.dob, "1988-07-21");
        assert_eq!(info.id_type, IdType::Umid);
    }

    #[test]
    fn crn_separators_are_tolerated() {
        assert_eq!(find_crn("CRN-0111-2345678-9"), "CRN-0111-2345678-9");
        assert_eq!(find_crn("crn 0111-2345678 9"), "CRN-0111-2345678-9");
        assert_eq!(find_crn("0111-2345678-9"), "");
    }

    #[test]
    fn dob_without_label_uses_any_date() {
        let info = parse("UMID\nJUAN DELA CRUZ\n1975-12-01", test_today());
        assert_eq!(info.dob, "1975-12-01");
        assert_eq!(info.full_name, "");
    }
}
