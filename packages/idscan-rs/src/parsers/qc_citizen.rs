//! Quezon City citizen (QCitizen) card text.
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use super::{cached, extract_address, generic, lines, post_process};
use crate::heuristics::collapse_whitespace;
use crate::id_type::IdType;
use crate::types::{ExtractedInfo, FieldConfidence};

static CARD_NUMBER: OnceLock<Regex> = OnceLock::new();
static COMMA_NAME: OnceLock<Regex> = OnceLock::new();

pub fn parse(text: &str, today: NaiveDate) -> ExtractedInfo {
    let base = generic::extract(text, IdType::QcCitizenId);
    let joined = collapse_whitespace(text);

    let id_number = cached(&CARD_NUMBER, r"\b[0-9]{3}-[0-9]{8}\b")
        .find(&joined)
        .map(|m| m.as_str().to_string())
        .unwrap_or(base.id_number);

    let comma = cached(&COMMA_NAME, r"([A-Z][A-Z']+),\s*([A-Z][A-Z'\s.]+)");
    let full_name = lines(text)
        .iter()
        .find_map(|line| {
            let caps = comma.captures(line)?;
            Some(collapse_whitespace(&format!("{} {}", &caps[2], &caps[1])))
        })
        .unwrap_or(base.full_name);

    let address = extract_address(text);

    let confidence = FieldConfidence::new(
        if full_name.is_empty() { 0.3 } else { 0.75 },
        if base.dob.is_empty() { 0.3 } else { 0.7 },
        if id_number.is_empty() { 0.3 } else { 0.8 },
    )
    .with_address(if address.is_empty() { 0.2 } else { 0.7 });

    let info = ExtractedInfo {
        full_name,
        dob: base.dob,
        id_number,
        id_type: IdType::QcCitizenId,
        confidence: Some(confidence),
        address: (!address.is_empty()).then_some(address),
    };
    post_process(info, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::test_today;

    #[test]
    fn reads_citizen_card() {
        let text = "QUEZON CITY CITIZEN ID\nQCitizen Card No. 005-12345678\nSANTOS, MARIA LUISA\nDate of Birth 1985/11/30\n45 Kalayaan Ave, Quezon City";
        let info = parse(text, test_today());
        assert_eq!(info.id_number, "005-12345678");
        assert_eq!(info.full_name, "MARIA LUISA SANTOS");
        assert_eq!(info.dob, "1985-11-30");
        assert_eq!(info.address.as_deref(), Some("45 Kalayaan Ave, Quezon City"));
        assert_eq!(info.confidence.unwrap().id_number, 0.8);
    }

    #[test]
    fn non_card_numbers_are_rejected() {
        let info = parse("QUEZON CITY\nJOSE RIZAL MERCADO\nREF 99887766554", test_today());
        assert_eq!(info.full_name, "JOSE RIZAL MERCADO");
        assert_eq!(info.id_number, "");
        assert_eq!(info.confidence.unwrap().id_number, 0.25);
    }
}
