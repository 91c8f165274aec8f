//! Sketch profiles of the screw body and its thread tooth.
//!
//! Profiles are given as `(axial, radial)` points. The axial coordinate is zero at
//! the underside of the washer and negative towards the screw tip.

use serde::Serialize;

use crate::catalog::ScrewSpec;
use crate::geometry::SketchPoint;

/// Number of extra pitches the shank extends past the sheet stack.
const EXTRA_PITCHES: f64 = 4.0;

/// Derived screw geometry for one connection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FastenerProfile {
    /// Length of the shank below the washer.
    pub shank_length: f64,
    /// Closed polyline revolved about the axial axis to form shank and washer.
    pub shank: Vec<SketchPoint>,
    /// Depth of the cylindrical head extruded from the washer top face.
    pub head_extrusion: f64,
    /// Closed polyline of one thread tooth, revolved to form the thread ring.
    pub thread_tooth: Vec<SketchPoint>,
}

/// Shank length needed to pass both sheets with four spare pitches.
///
/// The shank length is a whole number of pitches.
///
/// # Examples
/// ```
/// use screwlayout::fastener::shank_length;
///
/// // 0.8 mm + 1.0 mm sheets with a 1.6 mm pitch: (1 + 4) pitches.
/// assert!((shank_length(1.8, 1.6) - 8.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn shank_length(stack_thickness: f64, pitch: f64) -> f64 {
    ((stack_thickness / pitch).floor() + EXTRA_PITCHES) * pitch
}

impl FastenerProfile {
    /// Derive the profiles of `screw` passing through a stack of `stack_thickness`.
    #[must_use]
    pub fn new(screw: &ScrewSpec, stack_thickness: f64) -> Self {
        let length = shank_length(stack_thickness, screw.thread_pitch);
        let c = screw.washer_thickness;
        let root = screw.thread_inner_diameter / 2.0;
        let flank = (screw.thread_outer_diameter - screw.thread_inner_diameter) / 2.0;

        let shank = vec![
            SketchPoint::new(c, 0.0),
            SketchPoint::new(c, screw.washer_outer_diameter / 2.0),
            SketchPoint::new(0.0, screw.washer_outer_diameter / 2.0),
            SketchPoint::new(0.0, screw.head_diameter / 2.0),
            SketchPoint::new(c / 2.0, screw.head_diameter / 2.0 - c),
            SketchPoint::new(c / 2.0, root + flank / 3.0 * 2.0),
            SketchPoint::new(0.0, root + flank / 3.0),
            SketchPoint::new(0.0, root),
            SketchPoint::new(-length, root),
            SketchPoint::new(-length, 0.0),
        ];

        let rise = flank / 3.0_f64.sqrt();
        let tip = screw.thread_tip_width;
        let thread_tooth = vec![
            SketchPoint::new(0.0, root),
            SketchPoint::new(-rise, screw.thread_outer_diameter / 2.0),
            SketchPoint::new(-rise - tip, screw.thread_outer_diameter / 2.0),
            SketchPoint::new(-2.0 * rise - tip, root),
        ];

        Self {
            shank_length: length,
            shank,
            head_extrusion: screw.head_height - c,
            thread_tooth,
        }
    }

    /// Axial length of one thread tooth at its root.
    #[must_use]
    pub fn tooth_root_width(&self) -> f64 {
        match (self.thread_tooth.first(), self.thread_tooth.last()) {
            (Some(first), Some(last)) => first.x - last.x,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn shank_rounds_down_to_whole_pitches() {
        assert_relative_eq!(shank_length(1.0 + 1.0, 1.6), 8.0, epsilon = 1.0e-12);
        assert_relative_eq!(shank_length(2.5 + 2.5, 1.8), 6.0 * 1.8, epsilon = 1.0e-12);
    }

    #[test]
    fn profile_matches_screw_dimensions() {
        let catalog = Catalog::builtin();
        let screw = catalog.screw(1).expect("ST4.8");
        let profile = FastenerProfile::new(screw, 0.8 + 1.0);

        assert_eq!(profile.shank.len(), 10);
        assert_relative_eq!(profile.shank_length, 8.0, epsilon = 1.0e-12);
        assert_relative_eq!(profile.shank[1].y, 10.15 / 2.0);
        assert_relative_eq!(profile.shank[8].x, -8.0, epsilon = 1.0e-12);
        assert_relative_eq!(profile.head_extrusion, 4.05 - 0.9, epsilon = 1.0e-12);

        let flank = (4.71 - 3.51) / 2.0;
        let expected = 2.0 * flank / 3.0_f64.sqrt() + 0.15;
        assert_relative_eq!(profile.tooth_root_width(), expected, epsilon = 1.0e-12);
        assert!(profile.tooth_root_width() < screw.thread_pitch);
    }
}
