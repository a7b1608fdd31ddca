use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle stage of a production lot.
///
/// The status is set by whoever records the lot. Nothing in the workspace
/// derives it from the planting or harvest dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductionStatus {
    #[default]
    Planted,
    Harvested,
    Sold,
}

impl ProductionStatus {
    pub const ALL: [ProductionStatus; 3] = [
        ProductionStatus::Planted,
        ProductionStatus::Harvested,
        ProductionStatus::Sold,
    ];

    /// The stored, upper-case representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductionStatus::Planted => "PLANTED",
            ProductionStatus::Harvested => "HARVESTED",
            ProductionStatus::Sold => "SOLD",
        }
    }
}

impl fmt::Display for ProductionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PLANTED" => Ok(ProductionStatus::Planted),
            "HARVESTED" => Ok(ProductionStatus::Harvested),
            "SOLD" => Ok(ProductionStatus::Sold),
            _ => Err(CoreError::UnknownStatus(s.to_string())),
        }
    }
}
