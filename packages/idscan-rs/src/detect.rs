//! Keyword and number-shape classification of whole-card OCR text.
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::sync::OnceLock;

use crate::id_type::IdType;

/// Result of [`detect_id_type`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedIdType {
    pub id_type: IdType,
    pub confidence: f32,
    pub matched_patterns: Vec<String>,
}

impl DetectedIdType {
    fn new(id_type: IdType, confidence: f32, matched_patterns: Vec<String>) -> Self {
        Self {
            id_type,
            confidence,
            matched_patterns,
        }
    }
}

/// Probe patterns, compiled together on first use.
struct Probes {
    national_number: Regex,
    philsys: Regex,
    republic: Regex,
    crn: Regex,
    umid: Regex,
    multi_purpose: Regex,
    unified: Regex,
    lto_text: Regex,
    license_number: Regex,
    philhealth: Regex,
    philhealth_number: Regex,
    sss_text: Regex,
    sss_abbrev: Regex,
    sss_conflict: Regex,
    sss_number: Regex,
    quezon_city: Regex,
    passport: Regex,
    other_city: Regex,
    school: Regex,
}

static PROBES: OnceLock<Probes> = OnceLock::new();

fn re(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .expect("detection pattern")
}

fn probes() -> &'static Probes {
    PROBES.get_or_init(|| Probes {
        national_number: re(r"[0-9]{4}-[0-9]{4}-[0-9]{4}-[0-9]{4}"),
        philsys: re(r"PHILSYS|PHILIPPINE\s*NATIONAL\s*ID|REPUBLIKA\s*NG\s*PILIPINAS"),
        republic: re(r"REPUBLIC\s*OF\s*THE\s*PHILIPPINES|REPUBLIC.*PHILIPPINES|PHILIPPINES.*REPUBLIC"),
        crn: re(r"CRN[:\s\-]*[0-9]{4}[\-\s]?[0-9]{7}[\-\s]?[0-9]"),
        umid: re(r"\bUMID\b"),
        multi_purpose: re(r"MULTI[-\s]?PURPOSE"),
        unified: re(r"UNIFIED"),
        lto_text: re(r"LAND\s*TRANSPORTATION\s*OFFICE|\bLTO\b|DRIVER'?S?\s*LICENSE|LICENSE\s*NO"),
        license_number: Regex::new(r"[A-Z]?[0-9]{2,3}-[0-9]{2}-[0-9]{6}").expect("detection pattern"),
        philhealth: re(r"PHILHEALTH|PHILIPPINE\s*HEALTH\s*INSURANCE"),
        philhealth_number: re(r"[0-9]{2}-[0-9]{9}-[0-9]"),
        sss_text: re(r"SOCIAL\s*SECURITY\s*SYSTEM"),
        sss_abbrev: re(r"\bSSS\b"),
        sss_conflict: re(r"PHILSYS|UMID|MULTI.?PURPOSE"),
        sss_number: re(r"[0-9]{2}-[0-9]{7}-[0-9]"),
        quezon_city: re(r"QUEZON\s*CITY|\bQCITIZEN\b"),
        passport: re(r"PASSPORT|DEPARTMENT\s*OF\s*FOREIGN\s*AFFAIRS|\bDFA\b"),
        other_city: re(r"CITY\s*OF\s*MANILA|CITY\s*ID|BARANGAY\s*ID"),
        school: re(r"UNIVERSITY|COLLEGE|STUDENT\s*ID|SCHOOL\s*ID"),
    })
}

fn note(matched: &mut Vec<String>, hit: bool, label: &str) {
    if hit {
        matched.push(label.to_string());
    }
}

/// Classifies `text` by ordered probes; the first type whose probe fires wins.
///
/// Passport, school and non-Quezon-City hints have no registered type; they
/// are reported in `matched_patterns` of an `Unknown` result.
pub fn detect_id_type(text: &str) -> DetectedIdType {
    if text.trim().is_empty() {
        return DetectedIdType::new(IdType::Unknown, 0.0, Vec::new());
    }

    let p = probes();
    let mut matched: Vec<String> = Vec::new();

    if p.national_number.is_match(text) {
        note(&mut matched, true, "ID: XXXX-XXXX-XXXX-XXXX");
        note(&mut matched, p.philsys.is_match(text) || p.republic.is_match(text), "PhilSys / National ID");
        return DetectedIdType::new(IdType::NationalId, 0.95, matched);
    }

    let crn = p.crn.is_match(text);
    let umid = p.umid.is_match(text);
    let republic = p.republic.is_match(text);
    let multi = p.multi_purpose.is_match(text) || p.unified.is_match(text);
    if crn || umid || (republic && multi) {
        note(&mut matched, crn, "CRN-XXXX-XXXXXXX-X");
        note(&mut matched, umid, "UMID text found");
        note(&mut matched, republic, "Republic of the Philippines");
        note(&mut matched, multi, "Multi-Purpose ID text");
        return DetectedIdType::new(IdType::Umid, 0.95, matched);
    }

    let lto = p.lto_text.is_match(text);
    let license = p.license_number.is_match(text);
    if lto || license {
        note(&mut matched, lto, "LTO / Driver's License");
        note(&mut matched, license, "ID: N##-##-######");
        return DetectedIdType::new(IdType::DriversLicense, 0.9, matched);
    }

    let philhealth = p.philhealth.is_match(text);
    let philhealth_number = p.philhealth_number.is_match(text);
    if philhealth || philhealth_number {
        note(&mut matched, philhealth, "PhilHealth");
        note(&mut matched, philhealth_number, "ID: ##-#########-#");
        return DetectedIdType::new(IdType::PhilHealthId, 0.9, matched);
    }

    let sss_text = p.sss_text.is_match(text);
    let sss_abbrev = p.sss_abbrev.is_match(text) && !p.sss_conflict.is_match(text);
    let sss_number = p.sss_number.is_match(text);
    if sss_text || (sss_abbrev && sss_number) {
        note(&mut matched, sss_text, "Social Security System");
        note(&mut matched, sss_number, "ID: ##-#######-#");
        return DetectedIdType::new(IdType::SssId, 0.85, matched);
    }

    if p.quezon_city.is_match(text) {
        note(&mut matched, true, "Quezon City");
        return DetectedIdType::new(IdType::QcCitizenId, 0.8, matched);
    }

    note(&mut matched, p.passport.is_match(text), "Philippine Passport");
    note(&mut matched, p.other_city.is_match(text), "City/Barangay ID");
    note(&mut matched, p.school.is_match(text), "School/University");
    if matched.is_empty() {
        matched.push("No patterns matched".to_string());
    }
    DetectedIdType::new(IdType::Unknown, 0.3, matched)
}
