//! Facility identity and the closed facility-type enumeration.

use crate::error::KerbError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque unique identifier of a facility, assigned on first creation
/// and stable across updates.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacilityId(String);

impl FacilityId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FacilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed enumeration of physical accessibility feature categories.
///
/// The lowercase string forms are stable: they appear in serialized records
/// and in the on-chain location hash, and must never change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityType {
    /// Wheelchair ramp or accessible slope.
    Ramp,
    /// Accessible restroom.
    Toilet,
    /// Accessible elevator.
    Elevator,
    /// Wheelchair rental/lending station.
    Wheelchair,
}

impl FacilityType {
    /// All facility types, in canonical order.
    pub const ALL: [FacilityType; 4] = [
        FacilityType::Ramp,
        FacilityType::Toilet,
        FacilityType::Elevator,
        FacilityType::Wheelchair,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FacilityType::Ramp => "ramp",
            FacilityType::Toilet => "toilet",
            FacilityType::Elevator => "elevator",
            FacilityType::Wheelchair => "wheelchair",
        }
    }
}

impl fmt::Display for FacilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FacilityType {
    type Err = KerbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ramp" => Ok(FacilityType::Ramp),
            "toilet" => Ok(FacilityType::Toilet),
            "elevator" => Ok(FacilityType::Elevator),
            "wheelchair" => Ok(FacilityType::Wheelchair),
            other => Err(KerbError::UnknownFacilityType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_forms_round_trip() {
        for ty in FacilityType::ALL {
            assert_eq!(ty.as_str().parse::<FacilityType>().unwrap(), ty);
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!("escalator".parse::<FacilityType>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_form() {
        let json = serde_json::to_string(&FacilityType::Toilet).unwrap();
        assert_eq!(json, "\"toilet\"");
    }
}
