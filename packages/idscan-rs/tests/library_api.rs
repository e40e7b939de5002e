//! Integration tests for the idscan-rs library API

const NATIONAL_ID_TEXT: &str = "REPUBLIKA NG PILIPINAS
Republic of the Philippines
PAMBANSANG PAGKAKAKILANLAN
Philippine Identification Card
1234-5678-9012-3456
Apelyido/Last Name
DELA CRUZ
Mga Pangalan/Given Names
JUAN
Gitnang Apelyido/Middle Name
SANTOS
Petsa ng Kapanganakan/Date of Birth
JANUARY 03, 1990";

#[test]
fn test_prelude_imports() {
    use idscan_rs::prelude::*;

    assert_eq!(normalize_date("January 3, 1999"), "1999-01-03");
    assert_eq!(normalize_date("1987/10/04"), "1987-10-04");
    assert_eq!(normalize_date("not a date"), "");

    let detected = detect_id_type(NATIONAL_ID_TEXT);
    assert_eq!(detected.id_type, IdType::NationalId);

    let outcome = validate(IdType::NationalId, "A", "2099-01-01", "123");
    assert!(!outcome.ok);
    assert_eq!(
        outcome.failed_fields,
        vec!["full name", "date of birth", "National ID number"]
    );
}

#[test]
fn test_unknown_type_is_detected_before_parsing() {
    use idscan_rs::{parse_text_by_id_type, IdType};

    let info = parse_text_by_id_type(NATIONAL_ID_TEXT, IdType::Unknown);
    assert_eq!(info.id_type, IdType::NationalId);
    assert_eq!(info.full_name, "JUAN SANTOS DELA CRUZ");
    assert_eq!(info.dob, "1990-01-03");
    assert_eq!(info.id_number, "1234-5678-9012-3456");
}

#[test]
fn test_every_parser_yields_iso_or_empty_dob() {
    use idscan_rs::{is_iso_calendar_date, parse_text_by_id_type, IdType};

    let samples = [
        NATIONAL_ID_TEXT,
        "PhilHealth\nDELA CRUZ, Juan P.\nFeb. 30, 1990\n12-345678901-2",
        "SSS\n34-1234567-8\n13/45/1999",
        "QUEZON CITY\n123-45678901\n2001-02-29",
        "",
        "   \n\n",
    ];
    for text in samples {
        for id_type in IdType::ALL {
            let info = parse_text_by_id_type(text, id_type);
            assert!(
                info.dob.is_empty() || is_iso_calendar_date(&info.dob),
                "{id_type}: {:?}",
                info.dob
            );
        }
    }
}

#[test]
fn test_registry_module() {
    use idscan_rs::registry::{get_descriptor, get_descriptor_by_key, list_selectable_types};
    use idscan_rs::IdType;

    let visible = list_selectable_types(false);
    assert_eq!(visible.len(), 7);
    assert!(visible.iter().all(|o| !o.value.is_internal()));
    assert_eq!(list_selectable_types(true).len(), 9);

    assert_eq!(get_descriptor_by_key("Passport").id_type, IdType::Unknown);
    assert!(get_descriptor(IdType::NationalId).roi_profile.uses_split_name_rois);
    assert!(get_descriptor(IdType::PwdId).validate_id_number.is_none());
}

#[test]
fn test_merge_module() {
    use idscan_rs::merge::{merge, RoiFields};
    use idscan_rs::{ExtractedInfo, IdType};

    let roi = RoiFields {
        full_name: "JUAN DELA CRUZ".into(),
        dob: String::new(),
        id_number: "1234-5678-9012-3456".into(),
    };
    let full = ExtractedInfo {
        full_name: "xk2 99".into(),
        dob: "1990-01-03".into(),
        id_number: "99-999999999-9".into(),
        ..ExtractedInfo::empty(IdType::NationalId)
    };

    let merged = merge(IdType::NationalId, &roi, &full);
    assert_eq!(merged.merged_full_name, "JUAN DELA CRUZ");
    assert_eq!(merged.merged_dob, "1990-01-03");
    assert_eq!(merged.merged_id_number, "1234-5678-9012-3456");
}

#[test]
fn test_templates_module() {
    use idscan_rs::templates::{default_rois, CustomRois, RoiSet};
    use idscan_rs::IdType;

    for id_type in IdType::ALL {
        let doc = CustomRois::from_defaults(id_type);
        let set = RoiSet::resolve(id_type, Some(&doc)).unwrap();
        assert_eq!(set.iter().count(), default_rois(id_type).len());
    }
}

#[test]
fn test_field_text_module() {
    use idscan_rs::field_text::{clean_roi_name, clean_split_name};
    use idscan_rs::id_numbers::extract_national_id_number;

    assert_eq!(clean_roi_name("Given Names JUAN PEDRO"), "JUAN PEDRO");
    assert_eq!(clean_split_name("Last Name DELA CRUZ xx"), "DELA CRUZ");
    assert_eq!(extract_national_id_number("l234 - 5678 - 9O12 - 3456"), "1234-5678-9012-3456");
    assert_eq!(extract_national_id_number("1234-5678"), "");
}
