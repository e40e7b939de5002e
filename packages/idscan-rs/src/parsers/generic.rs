//! Fallback parser for cards without type-specific anchors.
use chrono::NaiveDate;

use super::{lines, pick_best_dob, pick_best_id_token, pick_best_name_line, post_process};
use crate::heuristics::{clean_name_candidate, collapse_whitespace};
use crate::id_type::IdType;
use crate::types::{ExtractedInfo, FieldConfidence};

/// Name, date and ID token from line scoring alone, before post-processing.
///
/// The Quezon City and PWD parsers start from this.
pub(crate) fn extract(text: &str, id_type: IdType) -> ExtractedInfo {
    let raw_name = pick_best_name_line(&lines(text));
    let cleaned = clean_name_candidate(&raw_name);
    let full_name = if cleaned.is_empty() { raw_name } else { cleaned };

    let joined = collapse_whitespace(text);
    let dob = pick_best_dob(&joined);
    let id_number = pick_best_id_token(&joined);

    let confidence = FieldConfidence::new(
        if full_name.is_empty() { 0.3 } else { 0.7 },
        if dob.is_empty() { 0.2 } else { 0.6 },
        if id_number.is_empty() { 0.2 } else { 0.6 },
    );

    ExtractedInfo {
        full_name,
        dob,
        id_number,
        id_type,
        confidence: Some(confidence),
        address: None,
    }
}

pub fn parse(text: &str, today: NaiveDate) -> ExtractedInfo {
    post_process(extract(text, IdType::Unknown), today)
}

/// Same heuristics, tagged as raw OCR with no document type.
pub fn parse_blank(text: &str, today: NaiveDate) -> ExtractedInfo {
    post_process(extract(text, IdType::Blank), today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::test_today;

    #[test]
    fn picks_fields_without_anchors() {
        let text = "ACME INC\nEmployee\nMARIA CLARA REYES\n05/17/1990\nEMP-00451234";
        let info = parse(text, test_today());
        assert_eq!(info.full_name, "MARIA CLARA REYES");
        assert_eq!(info.dob, "1990-05-17");
        assert_eq!(info.id_number, "EMP-00451234");
        assert_eq!(info.id_type, IdType::Unknown);
        let c = info.confidence.unwrap();
        assert_eq!(c.full_name, 0.7);
        assert_eq!(c.dob, 0.6);
    }

    #[test]
    fn empty_text_yields_low_confidence() {
        let info = parse("", test_today());
        assert!(info.is_empty());
        let c = info.confidence.unwrap();
        assert_eq!((c.full_name, c.dob, c.id_number), (0.3, 0.2, 0.2));
    }

    #[test]
    fn blank_keeps_its_type() {
        assert_eq!(parse_blank("anything", test_today()).id_type, IdType::Blank);
    }
}
