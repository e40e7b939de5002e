//! The closed set of document types the scanner knows how to read.
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IdType {
    NationalId,
    PhilHealthId,
    Umid,
    DriversLicense,
    QcCitizenId,
    PwdId,
    SssId,
    #[default]
    Unknown,
    Blank,
}

impl IdType {
    /// Every variant, in registry order.
    pub const ALL: [IdType; 9] = [
        IdType::NationalId,
        IdType::PhilHealthId,
        IdType::Umid,
        IdType::DriversLicense,
        IdType::QcCitizenId,
        IdType::PwdId,
        IdType::SssId,
        IdType::Unknown,
        IdType::Blank,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            IdType::NationalId => "National ID",
            IdType::PhilHealthId => "PhilHealth ID",
            IdType::Umid => "UMID",
            IdType::DriversLicense => "Driver's License",
            IdType::QcCitizenId => "Quezon City Citizen ID",
            IdType::PwdId => "PWD ID",
            IdType::SssId => "SSS ID",
            IdType::Unknown => "Unknown",
            IdType::Blank => "Blank",
        }
    }

    /// Exact key lookup; anything unrecognized resolves to `Unknown`.
    pub fn from_key(key: &str) -> IdType {
        IdType::ALL
            .into_iter()
            .find(|t| t.key() == key)
            .unwrap_or(IdType::Unknown)
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, IdType::Unknown | IdType::Blank)
    }
}

impl fmt::Display for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for IdType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for IdType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Ok(IdType::from_key(&key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for t in IdType::ALL {
            assert_eq!(IdType::from_key(t.key()), t);
        }
    }

    #[test]
    fn unknown_keys_fall_back() {
        assert_eq!(IdType::from_key("Passport"), IdType::Unknown);
        assert_eq!(IdType::from_key("national id"), IdType::Unknown);
        assert_eq!(IdType::from_key(""), IdType::Unknown);
    }

    #[test]
    fn serializes_as_key() {
        let json = serde_json::to_string(&IdType::DriversLicense).unwrap();
        assert_eq!(json, "\"Driver's License\"");
        let back: IdType = serde_json::from_str("\"UMID\"").unwrap();
        assert_eq!(back, IdType::Umid);
    }
}
