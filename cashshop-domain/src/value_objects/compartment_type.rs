// Compartment type value object

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Class-line of a cash compartment. An account owns exactly one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CompartmentType {
    Explorer,
    Cygnus,
    Legend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown compartment type {0}")]
pub struct UnknownCompartmentType(pub u8);

impl CompartmentType {
    pub const ALL: [CompartmentType; 3] = [
        CompartmentType::Explorer,
        CompartmentType::Cygnus,
        CompartmentType::Legend,
    ];

    /// Job ids are grouped by thousands: 0xxx explorers, 1xxx knights of cygnus,
    /// everything above belongs to the legend lines.
    pub fn for_job(job_id: u16) -> Self {
        match job_id / 1000 {
            0 => CompartmentType::Explorer,
            1 => CompartmentType::Cygnus,
            _ => CompartmentType::Legend,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            CompartmentType::Explorer => 1,
            CompartmentType::Cygnus => 2,
            CompartmentType::Legend => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompartmentType::Explorer => "EXPLORER",
            CompartmentType::Cygnus => "CYGNUS",
            CompartmentType::Legend => "LEGEND",
        }
    }
}

impl TryFrom<u8> for CompartmentType {
    type Error = UnknownCompartmentType;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(CompartmentType::Explorer),
            2 => Ok(CompartmentType::Cygnus),
            3 => Ok(CompartmentType::Legend),
            other => Err(UnknownCompartmentType(other)),
        }
    }
}

impl From<CompartmentType> for u8 {
    fn from(value: CompartmentType) -> Self {
        value.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_ids_map_to_class_lines() {
        assert_eq!(CompartmentType::for_job(0), CompartmentType::Explorer);
        assert_eq!(CompartmentType::for_job(412), CompartmentType::Explorer);
        assert_eq!(CompartmentType::for_job(1100), CompartmentType::Cygnus);
        assert_eq!(CompartmentType::for_job(2112), CompartmentType::Legend);
        assert_eq!(CompartmentType::for_job(3510), CompartmentType::Legend);
    }
}
