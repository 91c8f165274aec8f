//! Generation of a complete connection layout from catalog indices.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arrangement::ArrangementPattern;
use crate::assembly::{build_assembly, Assembly, StackGeometry};
use crate::catalog::{Catalog, ScrewSpec, SheetSpec};
use crate::config::JobSettings;
use crate::errors::ConnectionError;
use crate::fastener::FastenerProfile;
use crate::geometry::{Point, Rectangle};
use crate::interactions::InteractionGraph;
use crate::layout::{resolve_layout, LayoutParameters, PartitionPlan, ScrewInstance};
use crate::loading::LoadingPlan;
use crate::mesh::{sheet_seed_plan, ScrewSeedPlan, SheetSeedPlan};
use crate::naming::{ConnectionName, NamingKey};

/// Parameters of one connection, addressing catalog entries by index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRequest {
    /// One-based run index used in the model name.
    pub run_index: u32,
    /// Profile of the sheet under the screw head.
    pub near_sheet: usize,
    /// Profile of the sheet away from the screw head.
    pub far_sheet: usize,
    /// Sheet length in millimetres.
    pub sheet_length: f64,
    /// Sheet width in millimetres.
    pub sheet_width: f64,
    /// Screw profile.
    pub screw: usize,
    /// Arrangement family index.
    pub pattern_family: usize,
    /// Variant index within the family.
    pub pattern_variant: usize,
    /// Longitudinal spacing as a multiple of the nominal diameter.
    pub multiplier_l: f64,
    /// Transversal spacing as a multiple of the nominal diameter.
    pub multiplier_t: f64,
    /// Distance from the outer rows to the sheet ends in millimetres.
    pub end_distance: f64,
}

/// Fully resolved layout of one connection.
#[derive(Clone, Debug, Serialize)]
pub struct ConnectionModel {
    /// Model and job names.
    pub name: ConnectionName,
    /// Request the model was generated from.
    pub request: ConnectionRequest,
    /// Sheet under the screw head.
    pub near_sheet: SheetSpec,
    /// Sheet away from the screw head.
    pub far_sheet: SheetSpec,
    /// Screw profile.
    pub screw: ScrewSpec,
    /// Label of the arrangement family.
    pub family: String,
    /// Resolved arrangement.
    pub pattern: ArrangementPattern,
    /// Derived spacings.
    pub parameters: LayoutParameters,
    /// Every placed screw.
    pub screws: Vec<ScrewInstance>,
    /// Partition planes for both sheets.
    pub partitions: PartitionPlan,
    /// Sheet footprint.
    pub outline: Rectangle,
    /// Instance placement and reference points.
    pub assembly: Assembly,
    /// Seeds for the near sheet.
    pub near_seeds: SheetSeedPlan,
    /// Seeds for the far sheet.
    pub far_seeds: SheetSeedPlan,
    /// Seeds for screw and thread parts.
    pub screw_seeds: ScrewSeedPlan,
    /// Screw sketch profiles.
    pub fastener: FastenerProfile,
    /// Contact and tie topology.
    pub interactions: InteractionGraph,
    /// Solver settings of the job.
    pub job: JobSettings,
    /// Step, couplings, boundary conditions and outputs of the load case.
    pub loading: LoadingPlan,
    /// Global position of each screw tip, in screw order.
    pub screw_tips: Vec<Point>,
}

impl ConnectionModel {
    /// Total thickness of the sheet stack.
    #[must_use]
    pub fn stack_thickness(&self) -> f64 {
        self.near_sheet.thickness + self.far_sheet.thickness
    }

    /// Replace the default solver settings.
    #[must_use]
    pub fn with_job_settings(mut self, job: JobSettings) -> Self {
        self.loading = LoadingPlan::new(&self.assembly, &job);
        self.job = job;
        self
    }
}

/// Resolve `request` against `catalog` into a complete connection layout.
///
/// All validation happens before any coordinate is emitted, so an invalid
/// request never yields a partial model.
///
/// # Errors
///
/// Returns [`ConnectionError::Catalog`] when an index is out of range and
/// [`ConnectionError::Layout`] when the geometry is invalid.
///
/// # Examples
/// ```
/// use screwlayout::{generate_connection_layout, Catalog, ConnectionRequest};
///
/// let catalog = Catalog::builtin();
/// let request = ConnectionRequest {
///     run_index: 17,
///     near_sheet: 4,
///     far_sheet: 4,
///     sheet_length: 250.0,
///     sheet_width: 50.0,
///     screw: 1,
///     pattern_family: 2,
///     pattern_variant: 0,
///     multiplier_l: 4.0,
///     multiplier_t: 4.0,
///     end_distance: 30.0,
/// };
/// let model = generate_connection_layout(&request, &catalog).expect("valid request");
/// assert_eq!(model.name.model, "M17-10-10-48-II0_4_4");
/// assert_eq!(model.screws.len(), 2);
/// ```
pub fn generate_connection_layout(
    request: &ConnectionRequest,
    catalog: &Catalog,
) -> Result<ConnectionModel, ConnectionError> {
    let near_sheet = catalog.sheet(request.near_sheet)?;
    let far_sheet = catalog.sheet(request.far_sheet)?;
    let screw = catalog.screw(request.screw)?;
    let family = catalog.arrangements.family(request.pattern_family)?;
    let pattern = catalog
        .arrangements
        .pattern(request.pattern_family, request.pattern_variant)?;

    let parameters = LayoutParameters::from_multipliers(
        screw,
        request.multiplier_l,
        request.multiplier_t,
        request.end_distance,
    );
    let layout = resolve_layout(
        &pattern,
        &parameters,
        screw,
        request.sheet_width,
        request.sheet_length,
    )?;

    let hole = screw.thread_outer_diameter;
    let near_seeds = sheet_seed_plan(near_sheet.thickness, &layout.screws, &parameters, hole)?;
    let far_seeds = sheet_seed_plan(far_sheet.thickness, &layout.screws, &parameters, hole)?;

    let name = ConnectionName::resolve(&NamingKey {
        run_index: request.run_index,
        near_thickness: near_sheet.thickness,
        far_thickness: far_sheet.thickness,
        nominal_diameter: screw.nominal_diameter,
        family: &family.label,
        variant: request.pattern_variant,
        multiplier_l: request.multiplier_l,
        multiplier_t: request.multiplier_t,
    });

    let stack = StackGeometry {
        near_thickness: near_sheet.thickness,
        far_thickness: far_sheet.thickness,
        last_row: pattern.row_count().saturating_sub(1) as f64 * parameters.longitudinal_spacing,
        end_distance: parameters.end_distance,
    };
    let assembly = build_assembly(&stack, &layout.screws, pattern.rule());
    let fastener = FastenerProfile::new(screw, near_sheet.thickness + far_sheet.thickness);
    let interactions =
        InteractionGraph::build(&layout.screws, near_sheet.thickness, far_sheet.thickness);
    let screw_tips = assembly.screw_tips(fastener.shank_length);
    let job = JobSettings::default();
    let loading = LoadingPlan::new(&assembly, &job);

    debug!(
        model = %name.model,
        screws = layout.screws.len(),
        instances = assembly.instances.len(),
        interactions = interactions.interaction_count(),
        "generated connection"
    );

    Ok(ConnectionModel {
        name,
        request: request.clone(),
        near_sheet: near_sheet.clone(),
        far_sheet: far_sheet.clone(),
        screw: screw.clone(),
        family: family.label.clone(),
        pattern,
        parameters,
        screws: layout.screws,
        partitions: layout.partitions,
        outline: layout.outline,
        assembly,
        near_seeds,
        far_seeds,
        screw_seeds: ScrewSeedPlan::default(),
        fastener,
        interactions,
        job,
        loading,
        screw_tips,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::config::AmplitudeKind;
    use crate::errors::{CatalogIndexError, LayoutError};

    fn request() -> ConnectionRequest {
        ConnectionRequest {
            run_index: 1,
            near_sheet: 3,
            far_sheet: 4,
            sheet_length: 250.0,
            sheet_width: 50.0,
            screw: 1,
            pattern_family: 4,
            pattern_variant: 0,
            multiplier_l: 4.0,
            multiplier_t: 3.0,
            end_distance: 30.0,
        }
    }

    #[test]
    fn alternating_rows_resolve_fully() {
        let catalog = Catalog::builtin();
        let model = generate_connection_layout(&request(), &catalog).expect("valid request");
        assert_eq!(model.name.model, "M01-08-10-48-IV0_4_3");
        assert_eq!(model.screws.len(), 9);
        assert_eq!(model.assembly.instances.len(), 2 + 2 * 9);
        assert_eq!(model.interactions.tie_count(), 9);
        assert_eq!(model.partitions.longitudinal.len(), 13);
        assert_relative_eq!(model.stack_thickness(), 1.8, epsilon = 1.0e-12);
        assert_relative_eq!(model.fastener.shank_length, 8.0, epsilon = 1.0e-12);
    }

    #[test]
    fn catalog_errors_abort_before_layout() {
        let catalog = Catalog::builtin();
        let mut bad = request();
        bad.far_sheet = 9;
        let error = generate_connection_layout(&bad, &catalog).expect_err("unknown sheet");
        assert_eq!(
            error,
            ConnectionError::Catalog(CatalogIndexError::UnknownSheet { index: 9, len: 6 })
        );
    }

    #[test]
    fn layout_errors_are_wrapped() {
        let catalog = Catalog::builtin();
        let mut bad = request();
        bad.pattern_family = 3;
        bad.pattern_variant = 0;
        bad.multiplier_t = 6.0;
        let error = generate_connection_layout(&bad, &catalog).expect_err("three columns overflow");
        assert!(matches!(
            error,
            ConnectionError::Layout(LayoutError::ColumnOverflow { .. })
        ));
    }

    #[test]
    fn screw_tips_sit_one_shank_below_the_near_face() {
        let catalog = Catalog::builtin();
        let model = generate_connection_layout(&request(), &catalog).expect("valid request");
        assert_eq!(model.screw_tips.len(), model.screws.len());
        for (tip, screw) in model.screw_tips.iter().zip(&model.screws) {
            assert_relative_eq!(tip.z, -model.fastener.shank_length, epsilon = 1.0e-9);
            assert_relative_eq!(tip.x, screw.x, epsilon = 1.0e-9);
        }
    }

    #[test]
    fn job_settings_rebuild_the_load_case() {
        let catalog = Catalog::builtin();
        let model = generate_connection_layout(&request(), &catalog).expect("valid request");
        assert_relative_eq!(model.loading.step.time_period, model.job.step_time);

        let job = JobSettings {
            step_time: 0.12,
            amplitude_kind: AmplitudeKind::Tabular,
            ..JobSettings::default()
        };
        let model = model.with_job_settings(job);
        assert_relative_eq!(model.loading.step.time_period, 0.12);
        assert_eq!(model.loading.amplitude.kind, AmplitudeKind::Tabular);
    }
}
