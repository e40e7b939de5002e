//! Persons-with-disability ID text. The card has no fixed layout, so this is
//! the generic parser with its own weights.
use chrono::NaiveDate;

use super::{generic, post_process};
use crate::id_type::IdType;
use crate::types::{ExtractedInfo, FieldConfidence};

pub fn parse(text: &str, today: NaiveDate) -> ExtractedInfo {
    let base = generic::extract(text, IdType::PwdId);
    let confidence = FieldConfidence::new(
        if base.full_name.is_empty() { 0.3 } else { 0.75 },
        if base.dob.is_empty() { 0.3 } else { 0.7 },
        if base.id_number.is_empty() { 0.3 } else { 0.7 },
    );
    let info = ExtractedInfo {
        confidence: Some(confidence),
        ..base
    };
    post_process(info, today)
}
