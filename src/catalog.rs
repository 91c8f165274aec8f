//! Sheet and screw catalogs addressed by integer profile id.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::arrangement::ArrangementGrammar;
use crate::errors::{CatalogIndexError, ConfigError};

/// Geometry and material of one self-drilling screw profile, in millimetres.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrewSpec {
    /// Nominal diameter, e.g. 4.8 for an ST4.8 screw.
    pub nominal_diameter: f64,
    /// Thread pitch.
    pub thread_pitch: f64,
    /// Outer (major) thread diameter.
    pub thread_outer_diameter: f64,
    /// Inner (minor) thread diameter.
    pub thread_inner_diameter: f64,
    /// Width of the flat at the thread tip.
    pub thread_tip_width: f64,
    /// Distance between the head and the closest thread.
    pub head_to_thread_offset: f64,
    /// Outer diameter of the washer face.
    pub washer_outer_diameter: f64,
    /// Washer thickness.
    pub washer_thickness: f64,
    /// Head diameter.
    pub head_diameter: f64,
    /// Combined head and washer height.
    pub head_height: f64,
    /// Minimum thread length.
    pub min_thread_length: f64,
    /// Name of the material assigned by the host.
    pub material_name: String,
}

/// Thickness, footprint and material of one steel sheet profile, in millimetres.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SheetSpec {
    /// Sheet thickness.
    pub thickness: f64,
    /// Nominal sheet length.
    pub length: f64,
    /// Nominal sheet width.
    pub width: f64,
    /// Name of the material assigned by the host.
    pub material_name: String,
}

/// Immutable lookup tables for sheets, screws and arrangements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Sheet profiles indexed by id.
    pub sheets: Vec<SheetSpec>,
    /// Screw profiles indexed by id.
    pub screws: Vec<ScrewSpec>,
    /// Arrangement families indexed by id.
    #[serde(default)]
    pub arrangements: ArrangementGrammar,
}

impl Catalog {
    /// Catalog of the sheets and ISO 15480 screws used in the shear-test campaign.
    #[must_use]
    pub fn builtin() -> Self {
        let sheet = |thickness: f64, material: &str| SheetSpec {
            thickness,
            length: 250.0,
            width: 50.0,
            material_name: material.to_owned(),
        };

        let screw = |dn: f64,
                     pitch: f64,
                     td1: f64,
                     td2: f64,
                     tip: f64,
                     washer: (f64, f64),
                     head: (f64, f64),
                     lg: f64,
                     material: &str| ScrewSpec {
            nominal_diameter: dn,
            thread_pitch: pitch,
            thread_outer_diameter: td1,
            thread_inner_diameter: td2,
            thread_tip_width: tip,
            head_to_thread_offset: pitch,
            washer_outer_diameter: washer.0,
            washer_thickness: washer.1,
            head_diameter: head.0,
            head_height: head.1,
            min_thread_length: lg,
            material_name: material.to_owned(),
        };

        Self {
            sheets: vec![
                sheet(0.4, "T04_Q350"),
                sheet(0.5, "T05_Q350"),
                sheet(0.6, "T06_Q350"),
                sheet(0.8, "T08_Q550"),
                sheet(1.0, "T10_Q550"),
                sheet(2.5, "T25_Q350"),
            ],
            screws: vec![
                screw(4.2, 1.40, 4.13, 3.03, 0.10, (8.45, 0.80), (6.89, 3.85), 10.30, "D42_CarbonSteel"),
                screw(4.8, 1.60, 4.71, 3.51, 0.15, (10.15, 0.90), (7.89, 4.05), 8.70, "D48_CarbonSteel"),
                screw(5.5, 1.80, 5.37, 4.08, 0.15, (10.50, 1.00), (7.89, 5.10), 8.00, "D55_CarbonSteel"),
                screw(6.3, 1.80, 6.14, 4.79, 0.15, (12.85, 1.00), (9.89, 5.60), 7.00, "D63_CarbonSteel"),
            ],
            arrangements: ArrangementGrammar::builtin(),
        }
    }

    /// Load a catalog from a JSON file and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, is not valid JSON or
    /// describes physically meaningless profiles.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        let catalog: Catalog =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: display.clone(),
                source,
            })?;
        catalog
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                path: display,
                reason,
            })?;
        Ok(catalog)
    }

    /// Check the invariants the layout generator relies on.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated invariant.
    pub fn validate(&self) -> Result<(), String> {
        for (index, sheet) in self.sheets.iter().enumerate() {
            if !(sheet.thickness > 0.0 && sheet.length > 0.0 && sheet.width > 0.0) {
                return Err(format!("sheet {index} must have positive dimensions"));
            }
        }
        for (index, screw) in self.screws.iter().enumerate() {
            let positive = [
                screw.nominal_diameter,
                screw.thread_pitch,
                screw.thread_outer_diameter,
                screw.thread_inner_diameter,
                screw.washer_outer_diameter,
                screw.washer_thickness,
                screw.head_diameter,
                screw.head_height,
            ];
            if positive.iter().any(|value| !(*value > 0.0)) {
                return Err(format!("screw {index} must have positive dimensions"));
            }
            if screw.thread_inner_diameter >= screw.thread_outer_diameter {
                return Err(format!(
                    "screw {index} thread inner diameter must be below the outer diameter"
                ));
            }
            if screw.head_height <= screw.washer_thickness {
                return Err(format!("screw {index} head must be taller than its washer"));
            }
        }
        if self.arrangements.is_empty() {
            return Err("arrangement grammar holds no families".to_owned());
        }
        for family in self.arrangements.families() {
            if family.variants.is_empty() {
                return Err(format!("pattern family {} has no variants", family.label));
            }
            if family.label.is_empty() || family.label.contains('/') {
                return Err(format!("pattern family label {:?} is not usable in model names", family.label));
            }
        }
        Ok(())
    }

    /// Look up a sheet profile.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogIndexError::UnknownSheet`] when `index` is out of range.
    pub fn sheet(&self, index: usize) -> Result<&SheetSpec, CatalogIndexError> {
        self.sheets.get(index).ok_or(CatalogIndexError::UnknownSheet {
            index,
            len: self.sheets.len(),
        })
    }

    /// Look up a screw profile.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogIndexError::UnknownScrew`] when `index` is out of range.
    pub fn screw(&self, index: usize) -> Result<&ScrewSpec, CatalogIndexError> {
        self.screws.get(index).ok_or(CatalogIndexError::UnknownScrew {
            index,
            len: self.screws.len(),
        })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
