//! Seed sizes handed to the host mesher.

use serde::Serialize;

use crate::errors::LayoutError;
use crate::geometry::{point, Rectangle};
use crate::layout::{LayoutParameters, ScrewInstance};

/// Deviation factor applied to every edge seed.
pub const DEVIATION_FACTOR: f64 = 0.1;
/// Minimum size factor applied to global part seeds.
pub const MIN_SIZE_FACTOR: f64 = 0.1;

const SHEET_END_SEED: f64 = 2.0;
const HOLE_AROUND_SEED: f64 = 1.0;
const HOLE_CIRCUMFERENCE_SEED: f64 = 0.5;
const SHEET_GLOBAL_SEED: f64 = 4.0;
const THREAD_SEED: f64 = 0.5;
const SCREW_GLOBAL_SEED: f64 = 1.0;

/// Through-thickness seed sizes keyed by the upper bound of each thickness band.
const THICKNESS_BANDS: [(f64, f64); 4] = [(0.6, 0.2), (1.2, 0.4), (1.8, 0.6), (3.0, 1.0)];
const MIN_SEEDED_THICKNESS: f64 = 0.4;

/// Explicit element codes assigned to every part cell, in the host's priority order.
pub const ELEMENT_CODES: [ElementCode; 3] = [ElementCode::C3D8R, ElementCode::C3D6, ElementCode::C3D4];

/// Explicit continuum element assigned by the host.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ElementCode {
    /// 8-node brick, reduced integration with average-strain kinematic split.
    C3D8R,
    /// 6-node wedge.
    C3D6,
    /// 4-node tetrahedron.
    C3D4,
}

/// Meshing technique requested from the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshTechnique {
    /// Structured hexahedra over the partitioned sheet cells.
    StructuredHex,
    /// Swept hexahedra along the medial axis of revolved screw cells.
    SweepHex,
}

/// Refined seeding around one sheet hole.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HoleSeedRegion {
    /// `row_column` tag of the screw that passes through the hole.
    pub screw: String,
    /// Box of edges seeded with the hole-surrounding size.
    pub around: Rectangle,
    /// Radius of the hole circumference seeded with the finest size.
    pub radius: f64,
}

/// Seed plan for one sheet part.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SheetSeedPlan {
    /// Size on every edge of the sheet, applied first.
    pub sheet_end: f64,
    /// Size inside each hole region.
    pub hole_around: f64,
    /// Size on each hole circumference.
    pub hole_circumference: f64,
    /// Size along the sheet thickness.
    pub through_thickness: f64,
    /// Global part seed.
    pub global: f64,
    /// Per-hole refinement regions.
    pub holes: Vec<HoleSeedRegion>,
    /// Technique for the whole part.
    pub technique: MeshTechnique,
    /// Deviation factor of every edge seed.
    pub deviation_factor: f64,
    /// Minimum size factor of the global seed.
    pub min_size_factor: f64,
    /// Element codes assigned to the part cells.
    pub elements: [ElementCode; 3],
}

/// Seed plan for the screw and thread parts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScrewSeedPlan {
    /// Size on edges within the threaded length.
    pub thread: f64,
    /// Global part seed.
    pub global: f64,
    /// Technique for the whole part.
    pub technique: MeshTechnique,
    /// Deviation factor of every edge seed.
    pub deviation_factor: f64,
    /// Minimum size factor of the global seed.
    pub min_size_factor: f64,
    /// Element codes assigned to the part cells.
    pub elements: [ElementCode; 3],
}

impl Default for ScrewSeedPlan {
    fn default() -> Self {
        Self {
            thread: THREAD_SEED,
            global: SCREW_GLOBAL_SEED,
            technique: MeshTechnique::SweepHex,
            deviation_factor: DEVIATION_FACTOR,
            min_size_factor: MIN_SIZE_FACTOR,
            elements: ELEMENT_CODES,
        }
    }
}

/// Seed size along the thickness of a sheet.
///
/// # Errors
///
/// Returns [`LayoutError::UnsupportedThickness`] outside the 0.4 mm to 3.0 mm range.
///
/// # Examples
/// ```
/// use screwlayout::mesh::through_thickness_seed;
///
/// assert_eq!(through_thickness_seed(0.5), Ok(0.2));
/// assert_eq!(through_thickness_seed(2.5), Ok(1.0));
/// assert!(through_thickness_seed(3.5).is_err());
/// ```
pub fn through_thickness_seed(thickness: f64) -> Result<f64, LayoutError> {
    if thickness >= MIN_SEEDED_THICKNESS {
        for (upper, size) in THICKNESS_BANDS {
            if thickness <= upper {
                return Ok(size);
            }
        }
    }
    Err(LayoutError::UnsupportedThickness { thickness })
}

/// Build the seed plan of a sheet carrying `screws`.
///
/// # Errors
///
/// Returns [`LayoutError::UnsupportedThickness`] when `thickness` has no seed band.
pub fn sheet_seed_plan(
    thickness: f64,
    screws: &[ScrewInstance],
    params: &LayoutParameters,
    hole_diameter: f64,
) -> Result<SheetSeedPlan, LayoutError> {
    let through_thickness = through_thickness_seed(thickness)?;
    let half_t = params.transversal_spacing / 2.0;
    let half_l = params.longitudinal_spacing / 2.0;
    let holes = screws
        .iter()
        .map(|screw| HoleSeedRegion {
            screw: screw.tag(),
            around: Rectangle {
                min: point(screw.x - half_t, screw.y - half_l, 0.0),
                max: point(screw.x + half_t, screw.y + half_l, thickness),
            },
            radius: hole_diameter / 2.0,
        })
        .collect();
    Ok(SheetSeedPlan {
        sheet_end: SHEET_END_SEED,
        hole_around: HOLE_AROUND_SEED,
        hole_circumference: HOLE_CIRCUMFERENCE_SEED,
        through_thickness,
        global: SHEET_GLOBAL_SEED,
        holes,
        technique: MeshTechnique::StructuredHex,
        deviation_factor: DEVIATION_FACTOR,
        min_size_factor: MIN_SIZE_FACTOR,
        elements: ELEMENT_CODES,
    })
}
