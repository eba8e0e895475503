//! # Nerve Catalog
//!
//! The immutable reference dataset. Records are parsed once at startup from
//! the embedded `data/nerves.toml`, validated, and shared behind an `Arc`
//! with the search engine and the content resolver.
//!
//! ```text
//! NerveCatalog
//! ├── nerves: Vec<NerveRecord>   // region-major: upper limb, lower limb, cranial
//! └── by_id: HashMap<id, index>  // built at load, rejects duplicates
//! ```

use std::collections::HashMap;
use std::fmt;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::error::{CoreError, Result};

const EMBEDDED_CATALOG: &str = include_str!("../../data/nerves.toml");

/// Anatomical partition of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    UpperLimb,
    LowerLimb,
    Cranial,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::UpperLimb, Region::LowerLimb, Region::Cranial];

    pub fn as_str(self) -> &'static str {
        match self {
            Region::UpperLimb => "upper-limb",
            Region::LowerLimb => "lower-limb",
            Region::Cranial => "cranial",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reference value: a descriptive range plus optional numeric bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceValue {
    pub unit: String,
    pub range: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorConduction {
    pub distal_latency: ReferenceValue,
    pub amplitude: ReferenceValue,
    /// Absent for some cranial studies (facial, trigeminal).
    pub conduction_velocity: Option<ReferenceValue>,
    pub f_wave: Option<ReferenceValue>,
    pub h_reflex: Option<ReferenceValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensoryConduction {
    pub peak_latency: ReferenceValue,
    pub amplitude: ReferenceValue,
    pub conduction_velocity: ReferenceValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyTechnique {
    pub patient_positioning: String,
    pub electrode_location: String,
    pub stimulation_points: String,
    pub special_considerations: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentRange {
    pub min: u32,
    pub max: u32,
    pub adjustment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentVariables {
    #[serde(default)]
    pub age: Vec<AdjustmentRange>,
    #[serde(default)]
    pub height: Vec<AdjustmentRange>,
    pub gender: Option<String>,
    pub temperature: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Multimedia {
    pub technique_photo_url: Option<String>,
    pub anatomical_diagram_url: Option<String>,
}

/// One nerve's diagnostic reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NerveRecord {
    pub id: String,
    pub common_name: String,
    pub region: Region,
    pub specific_region: Option<String>,
    pub motor: Option<MotorConduction>,
    pub sensory: Option<SensoryConduction>,
    pub technique: StudyTechnique,
    pub adjustments: Option<AdjustmentVariables>,
    pub multimedia: Option<Multimedia>,
}

impl NerveRecord {
    /// Purely descriptive records carry neither motor nor sensory values.
    pub fn has_conduction_values(&self) -> bool {
        self.motor.is_some() || self.sensory.is_some()
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    nerves: Vec<NerveRecord>,
}

/// The validated, read-only nerve dataset.
#[derive(Debug)]
pub struct NerveCatalog {
    nerves: Vec<NerveRecord>,
    by_id: HashMap<String, usize>,
}

impl NerveCatalog {
    /// Parse the dataset compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_toml(EMBEDDED_CATALOG)
    }

    /// Parse and validate a catalog document.
    pub fn from_toml(source: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(source)
            .map_err(|e| CoreError::DatasetIntegrity(format!("catalog parse error: {e}")))?;
        Self::from_records(file.nerves)
    }

    /// Validate records and build the id index.
    ///
    /// Records are reordered region-major (upper limb, lower limb, cranial);
    /// the order inside a region is preserved.
    pub fn from_records(mut nerves: Vec<NerveRecord>) -> Result<Self> {
        nerves.sort_by_key(|n| Region::ALL.iter().position(|r| *r == n.region));

        let mut by_id = HashMap::with_capacity(nerves.len());
        for (index, nerve) in nerves.iter().enumerate() {
            if nerve.id.trim().is_empty() {
                return Err(CoreError::DatasetIntegrity(format!(
                    "nerve '{}' has an empty id",
                    nerve.common_name
                )));
            }
            if by_id.insert(nerve.id.clone(), index).is_some() {
                return Err(CoreError::DatasetIntegrity(format!(
                    "duplicate nerve id '{}'",
                    nerve.id
                )));
            }
            if !nerve.has_conduction_values() {
                debug!("Nerve '{}' has no conduction values", nerve.id);
            }
        }

        info!("Loaded nerve catalog: {} records", nerves.len());
        Ok(Self { nerves, by_id })
    }

    pub fn all(&self) -> &[NerveRecord] {
        &self.nerves
    }

    pub fn len(&self) -> usize {
        self.nerves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nerves.is_empty()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&NerveRecord> {
        self.by_id.get(id).map(|&i| &self.nerves[i])
    }

    /// All records of one region, in catalog order.
    pub fn get_by_region(&self, region: Region) -> Vec<&NerveRecord> {
        self.nerves.iter().filter(|n| n.region == region).collect()
    }
}
