//! Load case of the shear test: explicit step, end couplings, boundary
//! conditions and output requests.
//!
//! The near sheet is pulled along +Y through its reference point while the far
//! sheet is held by an encastre on its own reference point. Both points drive
//! their sheet end faces through kinematic couplings.

use serde::Serialize;

use crate::assembly::{Assembly, ReferencePoint};
use crate::config::{AmplitudeKind, JobSettings};

/// Step created before any analysis step.
pub const INITIAL_STEP: &str = "Initial";
/// Explicit dynamics step that carries the load.
pub const LOAD_STEP: &str = "Step-1";

const VELOCITY_AMPLITUDE: &str = "velocityAmp";
/// Prescribed `v2` of the load point, scaled by the amplitude.
const LOAD_VELOCITY: f64 = 1.0;

const FIELD_VARIABLES: [&str; 4] = ["S", "U", "RF", "STATUS"];
const HISTORY_VARIABLES: [&str; 2] = ["ALLIE", "ALLKE"];

/// Explicit dynamics step.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepDefinition {
    /// Step name.
    pub name: String,
    /// Step it follows.
    pub previous: String,
    /// Duration in seconds.
    pub time_period: f64,
}

/// Kinematic coupling of a sheet end face to its reference point.
///
/// All six degrees of freedom are coupled over the whole surface.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Coupling {
    /// Constraint name.
    pub name: String,
    /// Node set of the control point.
    pub control_set: String,
    /// Coupled end surface.
    pub surface: String,
}

/// Named amplitude curve.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Amplitude {
    /// Amplitude name.
    pub name: String,
    /// Interpolation between points.
    pub kind: AmplitudeKind,
    /// `(time, value)` pairs over the step time.
    pub points: Vec<(f64, f64)>,
}

/// Prescribed values for `u1, u2, u3, ur1, ur2, ur3` or their velocities.
///
/// `None` leaves a degree of freedom free.
pub type DofValues = [Option<f64>; 6];

/// Boundary condition applied to a reference point set.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoundaryCondition {
    /// All degrees of freedom fixed.
    Encastre {
        /// Condition name.
        name: String,
        /// Step the condition is created in.
        step: String,
        /// Node set it applies to.
        region: String,
    },
    /// Prescribed displacements.
    Displacement {
        /// Condition name.
        name: String,
        /// Step the condition is created in.
        step: String,
        /// Node set it applies to.
        region: String,
        /// Prescribed components.
        values: DofValues,
    },
    /// Prescribed velocities scaled by an amplitude.
    Velocity {
        /// Condition name.
        name: String,
        /// Step the condition is created in.
        step: String,
        /// Node set it applies to.
        region: String,
        /// Prescribed components.
        values: DofValues,
        /// Name of the scaling amplitude.
        amplitude: String,
    },
}

impl BoundaryCondition {
    /// Name of the condition.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            BoundaryCondition::Encastre { name, .. }
            | BoundaryCondition::Displacement { name, .. }
            | BoundaryCondition::Velocity { name, .. } => name,
        }
    }

    /// Node set the condition applies to.
    #[must_use]
    pub fn region(&self) -> &str {
        match self {
            BoundaryCondition::Encastre { region, .. }
            | BoundaryCondition::Displacement { region, .. }
            | BoundaryCondition::Velocity { region, .. } => region,
        }
    }
}

/// Whether an output request writes field or history data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Whole-model field output.
    Field,
    /// Scalar history output.
    History,
}

/// Output request replacing the host defaults.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutputRequest {
    /// Request name.
    pub name: String,
    /// Field or history.
    pub kind: OutputKind,
    /// Step the request is created in.
    pub step: String,
    /// Requested variables.
    pub variables: Vec<String>,
    /// Number of equally spaced intervals.
    pub intervals: u32,
}

/// Everything the host needs to load and record one connection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoadingPlan {
    /// The loading step.
    pub step: StepDefinition,
    /// Amplitude of the load point velocity.
    pub amplitude: Amplitude,
    /// End-face couplings, load point first.
    pub couplings: Vec<Coupling>,
    /// Boundary conditions in creation order.
    pub boundary_conditions: Vec<BoundaryCondition>,
    /// Field request, then history request.
    pub outputs: Vec<OutputRequest>,
}

fn end_coupling(name: &str, point: &ReferencePoint) -> Coupling {
    Coupling {
        name: name.to_owned(),
        control_set: point.set_name.clone(),
        surface: format!("{}-E", point.instance),
    }
}

fn output(name: &str, kind: OutputKind, variables: &[&str], intervals: u32) -> OutputRequest {
    OutputRequest {
        name: name.to_owned(),
        kind,
        step: LOAD_STEP.to_owned(),
        variables: variables.iter().map(|v| (*v).to_owned()).collect(),
        intervals,
    }
}

impl LoadingPlan {
    /// Build the load case for `assembly` with the step and outputs of `job`.
    ///
    /// # Examples
    /// ```
    /// use screwlayout::{build_assembly, JobSettings, LayoutRule, LoadingPlan, StackGeometry};
    ///
    /// let stack = StackGeometry {
    ///     near_thickness: 1.0,
    ///     far_thickness: 1.0,
    ///     last_row: 0.0,
    ///     end_distance: 30.0,
    /// };
    /// let assembly = build_assembly(&stack, &[], LayoutRule::Centered);
    /// let plan = LoadingPlan::new(&assembly, &JobSettings::default());
    /// assert_eq!(plan.couplings[0].surface, "nearSheetPart-E");
    /// assert_eq!(plan.boundary_conditions.len(), 3);
    /// ```
    #[must_use]
    pub fn new(assembly: &Assembly, job: &JobSettings) -> Self {
        let load = &assembly.load_point;
        let fixed = &assembly.fixed_point;

        let boundary_conditions = vec![
            BoundaryCondition::Encastre {
                name: "sheetNonadj_encastre".to_owned(),
                step: INITIAL_STEP.to_owned(),
                region: fixed.set_name.clone(),
            },
            // Only the pulling direction stays free.
            BoundaryCondition::Displacement {
                name: "sheetAdj_displacement".to_owned(),
                step: INITIAL_STEP.to_owned(),
                region: load.set_name.clone(),
                values: [Some(0.0), None, Some(0.0), Some(0.0), Some(0.0), Some(0.0)],
            },
            BoundaryCondition::Velocity {
                name: "sheetAdj_velocity".to_owned(),
                step: LOAD_STEP.to_owned(),
                region: load.set_name.clone(),
                values: [None, Some(LOAD_VELOCITY), None, None, None, None],
                amplitude: VELOCITY_AMPLITUDE.to_owned(),
            },
        ];

        Self {
            step: StepDefinition {
                name: LOAD_STEP.to_owned(),
                previous: INITIAL_STEP.to_owned(),
                time_period: job.step_time,
            },
            amplitude: Amplitude {
                name: VELOCITY_AMPLITUDE.to_owned(),
                kind: job.amplitude_kind,
                points: job.velocity_amplitude.clone(),
            },
            couplings: vec![end_coupling("loadPoint", load), end_coupling("fixPoint", fixed)],
            boundary_conditions,
            outputs: vec![
                output(
                    "F-Output-loadStep",
                    OutputKind::Field,
                    &FIELD_VARIABLES,
                    job.output_intervals,
                ),
                output(
                    "H-Output-loadStep",
                    OutputKind::History,
                    &HISTORY_VARIABLES,
                    job.output_intervals,
                ),
            ],
        }
    }
}
