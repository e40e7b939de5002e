//! Field layouts per document type and the JSON override document that
//! replaces them.
use chrono::Utc;
use idscan_ocr::NormalizedRect;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs;
use std::path::Path;

use crate::error::ScanError;
use crate::id_type::IdType;
use crate::types::FieldKey;

/// One field's rectangle, relative to the card bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiSpec {
    pub key: FieldKey,
    pub label: Cow<'static, str>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RoiSpec {
    pub fn new(key: FieldKey, label: impl Into<Cow<'static, str>>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            key,
            label: label.into(),
            x,
            y,
            width,
            height,
        }
    }

    pub fn rect(&self) -> NormalizedRect {
        NormalizedRect::new(self.x, self.y, self.width, self.height)
    }

    /// Coordinates must be finite, in `[0, 1]`, have positive extent and stay
    /// inside the card.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.rect().is_within_unit_square() {
            return Ok(());
        }
        Err(ScanError::InvalidRoi {
            key: self.key,
            reason: format!(
                "rectangle ({}, {}, {}x{}) is not inside the card",
                self.x, self.y, self.width, self.height
            ),
        })
    }
}

const fn roi(key: FieldKey, label: &'static str, x: f32, y: f32, width: f32, height: f32) -> RoiSpec {
    RoiSpec {
        key,
        label: Cow::Borrowed(label),
        x,
        y,
        width,
        height,
    }
}

static NATIONAL_ID: [RoiSpec; 5] = [
    roi(FieldKey::LastName, "Last Name line", 0.42, 0.36, 0.50, 0.10),
    roi(FieldKey::GivenNames, "Given Names line", 0.42, 0.48, 0.50, 0.15),
    roi(FieldKey::MiddleName, "Middle Name line", 0.42, 0.635, 0.50, 0.10),
    roi(FieldKey::Dob, "Date of Birth", 0.42, 0.74, 0.425, 0.125),
    roi(FieldKey::IdNumber, "ID Number", 0.0, 0.26, 0.40, 0.13),
];

static PHILHEALTH_ID: [RoiSpec; 3] = [
    roi(FieldKey::FullName, "Full Name", 0.35, 0.40, 0.60, 0.10),
    roi(FieldKey::Dob, "Date of Birth", 0.35, 0.48, 0.25, 0.07),
    roi(FieldKey::IdNumber, "PhilHealth No.", 0.35, 0.33, 0.40, 0.10),
];

// The stacked surname/given/middle block is read as one name region.
static UMID: [RoiSpec; 3] = [
    roi(FieldKey::FullName, "Name block", 0.38, 0.36, 0.62, 0.36),
    roi(FieldKey::Dob, "Date of Birth", 0.62, 0.675, 0.235, 0.10),
    roi(FieldKey::IdNumber, "CRN / ID No.", 0.55, 0.23, 0.45, 0.12),
];

static DRIVERS_LICENSE: [RoiSpec; 3] = [
    roi(FieldKey::FullName, "Full Name", 0.32, 0.30, 0.65, 0.10),
    roi(FieldKey::Dob, "Date of Birth", 0.55, 0.40, 0.18, 0.10),
    roi(FieldKey::IdNumber, "License Number", 0.32, 0.62, 0.26, 0.10),
];

static QC_CITIZEN_ID: [RoiSpec; 3] = [
    roi(FieldKey::FullName, "Full Name", 0.20, 0.28, 0.60, 0.14),
    roi(FieldKey::Dob, "Date of Birth", 0.32, 0.40, 0.20, 0.10),
    roi(FieldKey::IdNumber, "Card Number", 0.68, 0.40, 0.30, 0.12),
];

static PWD_ID: [RoiSpec; 3] = [
    roi(FieldKey::FullName, "Full Name", 0.15, 0.30, 0.70, 0.15),
    roi(FieldKey::Dob, "Date of Birth", 0.15, 0.48, 0.50, 0.12),
    roi(FieldKey::IdNumber, "PWD ID Number", 0.15, 0.66, 0.55, 0.12),
];

/// Built-in layout for `id_type`; empty for types read from the whole card only.
pub fn default_rois(id_type: IdType) -> &'static [RoiSpec] {
    match id_type {
        IdType::NationalId => &NATIONAL_ID,
        IdType::PhilHealthId => &PHILHEALTH_ID,
        IdType::Umid => &UMID,
        IdType::DriversLicense => &DRIVERS_LICENSE,
        IdType::QcCitizenId => &QC_CITIZEN_ID,
        IdType::PwdId => &PWD_ID,
        IdType::SssId | IdType::Unknown | IdType::Blank => &[],
    }
}

/// A user-adjusted layout, as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRois {
    pub id_type: IdType,
    pub rois: Vec<RoiSpec>,
    pub version: u32,
    pub updated_at: String,
}

impl CustomRois {
    pub fn new(id_type: IdType, rois: Vec<RoiSpec>) -> Self {
        Self {
            id_type,
            rois,
            version: 1,
            updated_at: Utc::now().to_rfc3339(),
        }
    }

    /// A starting document holding the built-in layout.
    pub fn from_defaults(id_type: IdType) -> Self {
        Self::new(id_type, default_rois(id_type).to_vec())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScanError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ScanError::RoiFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ScanError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ScanError::RoiFile {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// The layout a scan actually uses: an override when one with at least one
/// region is supplied, the built-in template otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct RoiSet {
    id_type: IdType,
    rois: Vec<RoiSpec>,
    custom: bool,
}

impl RoiSet {
    pub fn defaults(id_type: IdType) -> Self {
        Self {
            id_type,
            rois: default_rois(id_type).to_vec(),
            custom: false,
        }
    }

    pub fn resolve(id_type: IdType, custom: Option<&CustomRois>) -> Result<Self, ScanError> {
        let Some(custom) = custom.filter(|c| !c.rois.is_empty()) else {
            return Ok(Self::defaults(id_type));
        };
        if custom.id_type != id_type {
            return Err(ScanError::RoiMismatch {
                expected: id_type,
                found: custom.id_type,
            });
        }
        for spec in &custom.rois {
            spec.validate()?;
        }
        Ok(Self {
            id_type,
            rois: custom.rois.clone(),
            custom: true,
        })
    }

    pub fn id_type(&self) -> IdType {
        self.id_type
    }

    pub fn is_custom(&self) -> bool {
        self.custom
    }

    pub fn get(&self, key: FieldKey) -> Option<&RoiSpec> {
        self.rois.iter().find(|r| r.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoiSpec> {
        self.rois.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.rois.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_layouts_are_valid() {
        for t in IdType::ALL {
            for spec in default_rois(t) {
                assert!(spec.validate().is_ok(), "{t} {}", spec.key);
            }
        }
        assert!(default_rois(IdType::SssId).is_empty());
        assert_eq!(default_rois(IdType::NationalId).len(), 5);
    }

    #[test]
    fn override_replaces_defaults() {
        let custom = CustomRois::new(
            IdType::PwdId,
            vec![RoiSpec::new(FieldKey::FullName, "Name", 0.1, 0.1, 0.5, 0.2)],
        );
        let set = RoiSet::resolve(IdType::PwdId, Some(&custom)).unwrap();
        assert!(set.is_custom());
        assert!(set.get(FieldKey::Dob).is_none());
        assert_eq!(set.get(FieldKey::FullName).unwrap().width, 0.5);
    }

    #[test]
    fn empty_override_falls_back() {
        let custom = CustomRois::new(IdType::PwdId, Vec::new());
        let set = RoiSet::resolve(IdType::PwdId, Some(&custom)).unwrap();
        assert!(!set.is_custom());
        assert_eq!(set.iter().count(), 3);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let custom = CustomRois::new(
            IdType::PwdId,
            vec![RoiSpec::new(FieldKey::Dob, "DOB", 0.8, 0.1, 0.5, 0.2)],
        );
        let err = RoiSet::resolve(IdType::PwdId, Some(&custom)).unwrap_err();
        assert!(matches!(err, ScanError::InvalidRoi { key: FieldKey::Dob, .. }));

        let other = CustomRois::from_defaults(IdType::Umid);
        let err = RoiSet::resolve(IdType::PwdId, Some(&other)).unwrap_err();
        assert!(matches!(err, ScanError::RoiMismatch { .. }));
    }

    #[test]
    fn document_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rois.json");
        let doc = CustomRois::from_defaults(IdType::DriversLicense);
        doc.save(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"idType\": \"Driver's License\""));
        assert!(raw.contains("\"key\": \"fullName\""));

        assert_eq!(CustomRois::load(&path).unwrap(), doc);
        assert!(matches!(
            CustomRois::load(dir.path().join("missing.json")),
            Err(ScanError::RoiFile { .. })
        ));
    }
}
