//! Shared value types produced by parsers and consumed by merge/validation.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::id_type::IdType;

/// Static per-field confidence weights attached by a parser, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfidence {
    pub full_name: f32,
    pub dob: f32,
    pub id_number: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<f32>,
}

impl FieldConfidence {
    pub fn new(full_name: f32, dob: f32, id_number: f32) -> Self {
        Self {
            full_name,
            dob,
            id_number,
            address: None,
        }
    }

    pub fn with_address(mut self, address: f32) -> Self {
        self.address = Some(address);
        self
    }
}

/// Identity fields pulled out of one OCR source.
///
/// `dob` is either empty or an ISO `YYYY-MM-DD` string naming a real date.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedInfo {
    pub full_name: String,
    pub dob: String,
    pub id_number: String,
    pub id_type: IdType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<FieldConfidence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ExtractedInfo {
    /// The stand-in used when a source produced nothing at all.
    pub fn empty(id_type: IdType) -> Self {
        Self {
            id_type,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.full_name.is_empty() && self.dob.is_empty() && self.id_number.is_empty()
    }
}

/// A card field that can be cropped and recognized on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    FullName,
    Dob,
    IdNumber,
    LastName,
    GivenNames,
    MiddleName,
}

impl FieldKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::FullName => "fullName",
            FieldKey::Dob => "dob",
            FieldKey::IdNumber => "idNumber",
            FieldKey::LastName => "lastName",
            FieldKey::GivenNames => "givenNames",
            FieldKey::MiddleName => "middleName",
        }
    }

    pub fn is_name_part(&self) -> bool {
        matches!(
            self,
            FieldKey::FullName | FieldKey::LastName | FieldKey::GivenNames | FieldKey::MiddleName
        )
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
