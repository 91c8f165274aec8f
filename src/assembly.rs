//! Placement of part instances and reference points in the host assembly.

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion};
use serde::Serialize;

use crate::arrangement::LayoutRule;
use crate::geometry::{point, Axis, Point};
use crate::layout::ScrewInstance;

/// Offset applied to reference points so they sit just outside the sheet ends.
pub const BOUNDARY_TOLERANCE: f64 = 1.0e-3;

/// Node set of the load point. Result extraction reads reactions from this set.
pub const LOAD_POINT_SET: &str = "sheetAdj_RP";
/// Node set of the fixed point.
pub const FIXED_POINT_SET: &str = "sheetNonadj_RP";

/// Part that an instance is created from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    /// Sheet adjacent to the screw head.
    NearSheet,
    /// Sheet away from the screw head.
    FarSheet,
    /// Screw body with washer and head.
    Screw,
    /// Thread ring tied to the screw shank.
    Thread,
}

impl PartKind {
    /// Name of the part in the host model.
    #[must_use]
    pub fn part_name(self) -> &'static str {
        match self {
            PartKind::NearSheet => "nearSheetPart",
            PartKind::FarSheet => "farSheetPart",
            PartKind::Screw => "screwPart",
            PartKind::Thread => "threadPart",
        }
    }
}

/// Rotation about an axis through the origin, applied before translation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rotation {
    /// Rotation axis.
    pub axis: Axis,
    /// Angle in degrees, counter-clockwise about `axis`.
    pub degrees: f64,
}

impl Rotation {
    /// The rotation as a unit quaternion.
    #[must_use]
    pub fn to_quaternion(self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&self.axis.unit(), self.degrees.to_radians())
    }
}

/// One positioned part instance.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InstancePlacement {
    /// Unique instance name.
    pub name: String,
    /// Source part.
    pub part: PartKind,
    /// Rotations applied in order.
    pub rotations: Vec<Rotation>,
    /// Final translation.
    pub translation: Point,
}

impl InstancePlacement {
    /// Rigid transform from part coordinates to the global frame.
    #[must_use]
    pub fn transform(&self) -> Isometry3<f64> {
        let rotation = self
            .rotations
            .iter()
            .fold(UnitQuaternion::identity(), |applied, r| r.to_quaternion() * applied);
        Isometry3::from_parts(Translation3::from(self.translation.to_vector()), rotation)
    }

    /// Global position of a point given in part coordinates.
    #[must_use]
    pub fn to_global(&self, local: Point) -> Point {
        Point::from(self.transform() * Point3::from(local))
    }
}

/// Reference point coupled to a sheet end.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReferencePoint {
    /// Name of the node set holding the point, [`LOAD_POINT_SET`] or [`FIXED_POINT_SET`].
    pub set_name: String,
    /// Instance the point is attached to.
    pub instance: String,
    /// Global position.
    pub position: Point,
}

/// Every instance and reference point of a connection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Assembly {
    /// Sheets first, then one screw and one thread per screw instance.
    pub instances: Vec<InstancePlacement>,
    /// Driven point at the far end of the near sheet.
    pub load_point: ReferencePoint,
    /// Encastred point at the near end of the far sheet.
    pub fixed_point: ReferencePoint,
}

impl Assembly {
    /// Global tip position of every screw whose shank ends `shank_length` below the washer.
    #[must_use]
    pub fn screw_tips(&self, shank_length: f64) -> Vec<Point> {
        let tip = point(-shank_length, 0.0, 0.0);
        self.instances
            .iter()
            .filter(|instance| instance.part == PartKind::Screw)
            .map(|instance| instance.to_global(tip))
            .collect()
    }
}

/// Name of the instance of `part` belonging to `screw`.
#[must_use]
pub fn screw_instance_name(part: PartKind, screw: &ScrewInstance) -> String {
    format!("{}-{}", part.part_name(), screw.tag())
}

/// Stacking and screw geometry needed to place the assembly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackGeometry {
    /// Thickness of the near sheet.
    pub near_thickness: f64,
    /// Thickness of the far sheet.
    pub far_thickness: f64,
    /// Y coordinate of the last row.
    pub last_row: f64,
    /// End distance beyond the outer rows.
    pub end_distance: f64,
}

/// Place the sheets, screws, threads and reference points.
///
/// Sheet parts are extruded upwards from `z = 0`, so the near sheet is moved down
/// by its own thickness and the far sheet by the whole stack.
#[must_use]
pub fn build_assembly(stack: &StackGeometry, screws: &[ScrewInstance], rule: LayoutRule) -> Assembly {
    let mut instances = Vec::with_capacity(2 + 2 * screws.len());
    instances.push(InstancePlacement {
        name: PartKind::NearSheet.part_name().to_owned(),
        part: PartKind::NearSheet,
        rotations: Vec::new(),
        translation: point(0.0, 0.0, -stack.near_thickness),
    });
    instances.push(InstancePlacement {
        name: PartKind::FarSheet.part_name().to_owned(),
        part: PartKind::FarSheet,
        rotations: Vec::new(),
        translation: point(0.0, 0.0, -(stack.near_thickness + stack.far_thickness)),
    });

    // Screw parts are modelled along +X; turn them to point down the stack.
    let upright = Rotation {
        axis: Axis::Y,
        degrees: 270.0,
    };
    let thread_turn = Rotation {
        axis: Axis::Z,
        degrees: match rule {
            LayoutRule::Centered => 270.0,
            LayoutRule::Staggered => 90.0,
        },
    };
    for screw in screws {
        instances.push(InstancePlacement {
            name: screw_instance_name(PartKind::Screw, screw),
            part: PartKind::Screw,
            rotations: vec![upright],
            translation: screw.position(),
        });
        instances.push(InstancePlacement {
            name: screw_instance_name(PartKind::Thread, screw),
            part: PartKind::Thread,
            rotations: vec![upright, thread_turn],
            translation: screw.position(),
        });
    }

    let load_point = ReferencePoint {
        set_name: LOAD_POINT_SET.to_owned(),
        instance: PartKind::NearSheet.part_name().to_owned(),
        position: point(
            0.0,
            stack.last_row + stack.end_distance + BOUNDARY_TOLERANCE,
            -stack.near_thickness / 2.0,
        ),
    };
    let fixed_point = ReferencePoint {
        set_name: FIXED_POINT_SET.to_owned(),
        instance: PartKind::FarSheet.part_name().to_owned(),
        position: point(
            0.0,
            -stack.end_distance - BOUNDARY_TOLERANCE,
            -stack.near_thickness - stack.far_thickness / 2.0,
        ),
    };

    Assembly {
        instances,
        load_point,
        fixed_point,
    }
}
