//! Clean-up for text recognized from a single-field crop.
use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

use crate::date::normalize_date;
use crate::heuristics::collapse_whitespace;

static FIELD_LABELS: OnceLock<Regex> = OnceLock::new();
static LEAKED_DATE: OnceLock<Regex> = OnceLock::new();

fn field_labels() -> &'static Regex {
    FIELD_LABELS.get_or_init(|| {
        RegexBuilder::new(
            r"(Apelyido|Last\s*Name|Mga\s*Pangalan|Given\s*Names|Gitnang\s*Apelyido|Middle\s*Name|Petsa\s*ng\s*Kapanganakan|Date\s*of\s*Birth)",
        )
        .case_insensitive(true)
        .build()
        .expect("field label pattern")
    })
}

fn leaked_date() -> &'static Regex {
    LEAKED_DATE.get_or_init(|| {
        RegexBuilder::new(
            r"(January|February|March|April|May|June|July|August|September|October|November|December)\s+[0-9]{1,2},?\s+[0-9]{4}",
        )
        .case_insensitive(true)
        .build()
        .expect("leaked date pattern")
    })
}

/// Strips printed field labels and dates that bled into a name crop.
pub fn clean_roi_name(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let collapsed = collapse_whitespace(text);
    let without_labels = field_labels().replace_all(&collapsed, " ");
    let without_dates = leaked_date().replace_all(&without_labels, " ");
    collapse_whitespace(&without_dates)
}

/// Name parts on split-name cards are printed in capitals, so lowercase
/// noise tokens are dropped when at least two capitalized tokens remain.
pub fn clean_split_name(text: &str) -> String {
    let cleaned = clean_roi_name(text);

    let kept: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|token| {
            let letters: Vec<char> = token.chars().filter(|c| c.is_ascii_alphabetic()).collect();
            if letters.len() < 2 {
                return false;
            }
            let upper = letters.iter().filter(|c| c.is_ascii_uppercase()).count();
            upper as f32 / letters.len() as f32 >= 0.8
        })
        .collect();

    if kept.len() >= 2 {
        kept.join(" ")
    } else {
        cleaned
    }
}

pub fn extract_dob_from_text(text: &str) -> String {
    normalize_date(text)
}
