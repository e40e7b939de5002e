//! Accept/reject check on the merged fields before a check-in may proceed.
use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::heuristics::{is_reasonable_dob_at, is_reasonable_full_name};
use crate::id_type::IdType;
use crate::registry::get_descriptor;

pub const FULL_NAME_LABEL: &str = "full name";
pub const DOB_LABEL: &str = "date of birth";
pub const ID_NUMBER_LABEL: &str = "ID number";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub ok: bool,
    /// Human-readable labels of the rejected fields, in name/dob/id order.
    pub failed_fields: Vec<String>,
}

/// Without a type-specific rule an ID needs six characters, a digit and no
/// whitespace.
fn is_plausible_id_number(id: &str) -> bool {
    id.chars().count() >= 6
        && id.chars().any(|c| c.is_ascii_digit())
        && !id.chars().any(char::is_whitespace)
}

pub fn validate(id_type: IdType, full_name: &str, dob: &str, id_number: &str) -> ValidationOutcome {
    validate_at(id_type, full_name, dob, id_number, Local::now().date_naive())
}

/// [`validate`] with an explicit "today" for the age check.
pub fn validate_at(
    id_type: IdType,
    full_name: &str,
    dob: &str,
    id_number: &str,
    today: NaiveDate,
) -> ValidationOutcome {
    let descriptor = get_descriptor(id_type);
    let mut failed_fields = Vec::new();

    let name_check = descriptor.validate_full_name.unwrap_or(is_reasonable_full_name);
    if !name_check(full_name) {
        failed_fields.push(FULL_NAME_LABEL.to_string());
    }

    let dob_check = descriptor.validate_dob.unwrap_or(is_reasonable_dob_at);
    if !dob_check(dob, today) {
        failed_fields.push(DOB_LABEL.to_string());
    }

    let id = id_number.trim();
    let id_ok = match descriptor.validate_id_number {
        Some(valid) => valid(id),
        None => is_plausible_id_number(id),
    };
    if !id_ok {
        failed_fields.push(descriptor.id_number_label.unwrap_or(ID_NUMBER_LABEL).to_string());
    }

    ValidationOutcome {
        ok: failed_fields.is_empty(),
        failed_fields,
    }
}
