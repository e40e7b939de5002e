//! Per-document configuration: parser, validators, ROI profile and labels.
//!
//! The table is built once and shared read-only. Adding a document type means
//! adding an [`IdType`] variant and one entry in [`build_table`].
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

use crate::heuristics::{is_reasonable_dob_at, is_reasonable_full_name};
use crate::id_numbers::{
    is_valid_drivers_license_number, is_valid_national_id_number, is_valid_philhealth_number,
    is_valid_qc_citizen_number, is_valid_sss_number, is_valid_umid_crn,
};
use crate::id_type::IdType;
use crate::parsers;
use crate::types::{ExtractedInfo, FieldKey};

pub type ParserFn = fn(&str, NaiveDate) -> ExtractedInfo;
pub type TextCheck = fn(&str) -> bool;
pub type DobCheck = fn(&str, NaiveDate) -> bool;

/// Which fields a document type crops, and whether its name is printed as
/// separate last/given/middle boxes.
#[derive(Debug, Clone, Copy)]
pub struct RoiProfile {
    pub uses_split_name_rois: bool,
    pub roi_keys: &'static [FieldKey],
}

#[derive(Clone, Copy)]
pub struct Descriptor {
    pub id_type: IdType,
    pub label: &'static str,
    pub parser: ParserFn,
    pub validate_id_number: Option<TextCheck>,
    pub validate_full_name: Option<TextCheck>,
    pub validate_dob: Option<DobCheck>,
    pub roi_profile: RoiProfile,
    pub id_number_label: Option<&'static str>,
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("id_type", &self.id_type)
            .field("label", &self.label)
            .field("roi_profile", &self.roi_profile)
            .field("id_number_label", &self.id_number_label)
            .finish_non_exhaustive()
    }
}

impl Descriptor {
    pub fn parse(&self, text: &str, today: NaiveDate) -> ExtractedInfo {
        (self.parser)(text, today)
    }
}

/// An entry for a type picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeOption {
    pub value: IdType,
    pub label: &'static str,
}

const SPLIT_NAME_KEYS: &[FieldKey] = &[
    FieldKey::LastName,
    FieldKey::GivenNames,
    FieldKey::MiddleName,
    FieldKey::Dob,
    FieldKey::IdNumber,
];

const FULL_NAME_KEYS: &[FieldKey] = &[FieldKey::FullName, FieldKey::Dob, FieldKey::IdNumber];

const fn full_name_profile() -> RoiProfile {
    RoiProfile {
        uses_split_name_rois: false,
        roi_keys: FULL_NAME_KEYS,
    }
}

fn standard(
    id_type: IdType,
    label: &'static str,
    parser: ParserFn,
    validate_id_number: Option<TextCheck>,
    id_number_label: &'static str,
) -> Descriptor {
    Descriptor {
        id_type,
        label,
        parser,
        validate_id_number,
        validate_full_name: Some(is_reasonable_full_name),
        validate_dob: Some(is_reasonable_dob_at),
        roi_profile: full_name_profile(),
        id_number_label: Some(id_number_label),
    }
}

/// Entries are listed in `IdType::ALL` order so a variant's discriminant is
/// its index.
fn build_table() -> [Descriptor; 9] {
    [
        Descriptor {
            roi_profile: RoiProfile {
                uses_split_name_rois: true,
                roi_keys: SPLIT_NAME_KEYS,
            },
            ..standard(
                IdType::NationalId,
                "Philippine National ID",
                parsers::national_id::parse,
                Some(is_valid_national_id_number),
                "National ID number",
            )
        },
        standard(
            IdType::PhilHealthId,
            "PhilHealth ID",
            parsers::philhealth::parse,
            Some(is_valid_philhealth_number),
            "PhilHealth ID number",
        ),
        standard(
            IdType::Umid,
            "UMID",
            parsers::umid::parse,
            Some(is_valid_umid_crn),
            "UMID CRN",
        ),
        standard(
            IdType::DriversLicense,
            "Driver's License",
            parsers::drivers_license::parse,
            Some(is_valid_drivers_license_number),
            "License Number",
        ),
        standard(
            IdType::QcCitizenId,
            "Quezon City Citizen ID",
            parsers::qc_citizen::parse,
            Some(is_valid_qc_citizen_number),
            "QCitizen Card Number",
        ),
        standard(IdType::PwdId, "PWD ID", parsers::pwd::parse, None, "PWD ID Number"),
        standard(
            IdType::SssId,
            "SSS ID",
            parsers::sss::parse,
            Some(is_valid_sss_number),
            "SS number",
        ),
        standard(IdType::Unknown, "Unknown ID", parsers::generic::parse, None, "ID number"),
        Descriptor {
            id_type: IdType::Blank,
            label: "Blank / Raw OCR",
            parser: parsers::generic::parse_blank,
            validate_id_number: None,
            validate_full_name: None,
            validate_dob: None,
            roi_profile: RoiProfile {
                uses_split_name_rois: false,
                roi_keys: &[],
            },
            id_number_label: Some("ID number"),
        },
    ]
}

static TABLE: OnceLock<[Descriptor; 9]> = OnceLock::new();

pub fn get_descriptor(id_type: IdType) -> &'static Descriptor {
    &TABLE.get_or_init(build_table)[id_type as usize]
}

/// Keys that name no registered type get the generic `Unknown` descriptor.
pub fn get_descriptor_by_key(key: &str) -> &'static Descriptor {
    get_descriptor(IdType::from_key(key))
}

/// Registered types in declaration order. `Unknown` and `Blank` are left out
/// unless `include_internal` is set.
pub fn list_selectable_types(include_internal: bool) -> Vec<TypeOption> {
    IdType::ALL
        .into_iter()
        .filter(|t| include_internal || !t.is_internal())
        .map(|t| {
            let descriptor = get_descriptor(t);
            TypeOption {
                value: t,
                label: descriptor.label,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_an_entry() {
        for t in IdType::ALL {
            assert_eq!(get_descriptor(t).id_type, t);
        }
    }

    #[test]
    fn unknown_keys_resolve_to_generic() {
        let d = get_descriptor_by_key("Library Card");
        assert_eq!(d.id_type, IdType::Unknown);
        assert!(d.validate_id_number.is_none());
        assert_eq!(d.id_number_label, Some("ID number"));
    }

    #[test]
    fn national_id_uses_split_names() {
        let d = get_descriptor(IdType::NationalId);
        assert!(d.roi_profile.uses_split_name_rois);
        assert!(d.roi_profile.roi_keys.contains(&FieldKey::GivenNames));
        assert!(!d.roi_profile.roi_keys.contains(&FieldKey::FullName));
        assert!(!get_descriptor(IdType::Umid).roi_profile.uses_split_name_rois);
    }

    #[test]
    fn selectable_types_hide_sentinels() {
        let visible = list_selectable_types(false);
        assert_eq!(visible.len(), 7);
        assert_eq!(visible[0].value, IdType::NationalId);
        assert_eq!(visible[0].label, "Philippine National ID");
        assert!(visible.iter().all(|o| !o.value.is_internal()));

        let all = list_selectable_types(true);
        assert_eq!(all.len(), 9);
        assert_eq!(all[8].value, IdType::Blank);
    }

    #[test]
    fn blank_has_no_validators_or_rois() {
        let d = get_descriptor(IdType::Blank);
        assert!(d.validate_full_name.is_none());
        assert!(d.validate_dob.is_none());
        assert!(d.roi_profile.roi_keys.is_empty());
    }
}
