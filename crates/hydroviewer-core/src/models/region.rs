//! Region naming and dataset roles.
//!
//! Every region in the geometry store contributes three zipped shapefiles whose
//! names differ only by a role token, e.g. `north_america-geoglows-boundary`,
//! `north_america-geoglows-drainageline`, `north_america-geoglows-catchment`.
//! Sibling names are derived by substituting that token, never looked up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HydroviewerError;

/// Attribute joining a drainage line to its catchment
pub const COMID_FIELD: &str = "COMID";

/// Role a dataset plays within a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetRole {
    Boundary,
    Drainageline,
    Catchment,
}

impl DatasetRole {
    /// Substring identifying the role inside a dataset name
    pub fn token(&self) -> &'static str {
        match self {
            DatasetRole::Boundary => "boundary",
            DatasetRole::Drainageline => "drainageline",
            DatasetRole::Catchment => "catchment",
        }
    }
}

impl fmt::Display for DatasetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A dataset that can be clipped into the project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipTarget {
    Drainageline,
    Catchment,
}

impl ClipTarget {
    pub fn role(&self) -> DatasetRole {
        match self {
            ClipTarget::Drainageline => DatasetRole::Drainageline,
            ClipTarget::Catchment => DatasetRole::Catchment,
        }
    }
}

impl FromStr for ClipTarget {
    type Err = HydroviewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drainageline" => Ok(ClipTarget::Drainageline),
            "catchment" => Ok(ClipTarget::Catchment),
            other => Err(HydroviewerError::UnknownDatasetRole {
                role: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ClipTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.role().fmt(f)
    }
}

/// Name of a region as it appears on its boundary dataset
///
/// The name carries the `boundary` token; use [`RegionName::dataset_name`]
/// to reach the other datasets of the same region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionName(String);

impl RegionName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Parse a region supplied by a user, with or without the role token
    pub fn from_input(raw: &str) -> Result<Self, HydroviewerError> {
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with('.') || raw.contains(['/', '\\']) {
            return Err(HydroviewerError::InvalidRegionName {
                name: raw.to_string(),
            });
        }
        let raw = raw.strip_suffix(".zip").unwrap_or(raw);
        if raw.contains(DatasetRole::Boundary.token()) {
            Ok(Self(raw.to_string()))
        } else {
            Ok(Self(format!("{}-{}", raw, DatasetRole::Boundary.token())))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of this region's dataset for `role`
    pub fn dataset_name(&self, role: DatasetRole) -> String {
        self.0.replace(DatasetRole::Boundary.token(), role.token())
    }

    /// Region name without the role token, e.g. `north_america-geoglows`
    pub fn display_name(&self) -> String {
        let suffix = format!("-{}", DatasetRole::Boundary.token());
        self.0.strip_suffix(&suffix).unwrap_or(&self.0).to_string()
    }
}

impl fmt::Display for RegionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
