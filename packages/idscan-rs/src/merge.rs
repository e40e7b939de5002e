//! Fusion of the per-field (ROI) read and the whole-card read into one value
//! per field.
use serde::Serialize;
use tracing::debug;

use crate::heuristics::is_reasonable_full_name;
use crate::id_numbers::normalize_id_number;
use crate::id_type::IdType;
use crate::registry::get_descriptor;
use crate::types::ExtractedInfo;

/// Field values read from the cropped regions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiFields {
    pub full_name: String,
    pub dob: String,
    pub id_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeResult {
    pub merged_full_name: String,
    pub merged_dob: String,
    pub merged_id_number: String,
}

fn merge_full_name(split_name_type: bool, roi: &str, full: &str) -> String {
    let roi_good = is_reasonable_full_name(roi);
    let full_good = is_reasonable_full_name(full);
    debug!(roi, full, roi_good, full_good, "comparing name candidates");

    if roi_good {
        return roi.to_string();
    }
    if full_good {
        return full.to_string();
    }
    if !split_name_type {
        return full.to_string();
    }
    // Neither passes; the whole-card text still beats ROI noise.
    first_non_empty(full, roi).to_string()
}

fn merge_id_number(id_type: IdType, roi: &str, full: &str) -> String {
    let chosen = match get_descriptor(id_type).validate_id_number {
        Some(valid) => match (valid(roi), valid(full)) {
            (true, false) => roi,
            (false, true) => full,
            (true, true) if roi.len() >= full.len() => roi,
            (true, true) => full,
            (false, false) => first_non_empty(roi, full),
        },
        None => first_non_empty(roi, full),
    };
    normalize_id_number(chosen)
}

fn first_non_empty<'a>(preferred: &'a str, other: &'a str) -> &'a str {
    if preferred.is_empty() {
        other
    } else {
        preferred
    }
}

/// Picks the final name, date of birth and ID number for `id_type`.
///
/// The ROI date of birth always wins when present. For document types whose
/// name is cropped as separate last/given/middle boxes the ROI name is
/// trusted even when both candidates look poor.
pub fn merge(id_type: IdType, roi: &RoiFields, full: &ExtractedInfo) -> MergeResult {
    let split_name_type = get_descriptor(id_type).roi_profile.uses_split_name_rois;

    let merged_full_name = merge_full_name(split_name_type, roi.full_name.trim(), full.full_name.trim());
    let merged_dob = first_non_empty(&roi.dob, &full.dob).to_string();
    let merged_id_number = merge_id_number(id_type, roi.id_number.trim(), full.id_number.trim());

    debug!(
        %id_type,
        name = merged_full_name.as_str(),
        dob = merged_dob.as_str(),
        id_number = merged_id_number.as_str(),
        "merged ROI and whole-card fields"
    );

    MergeResult {
        merged_full_name,
        merged_dob,
        merged_id_number,
    }
}
