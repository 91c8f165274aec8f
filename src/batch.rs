//! Batch orchestration: the shear-test table, the parametric sweep and
//! concurrent generation with a run-ordered name check.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::config::{GeneratorConfig, JobSettings};
use crate::connection::{generate_connection_layout, ConnectionModel, ConnectionRequest};
use crate::errors::ConnectionError;
use crate::naming::NameRegistry;

/// One row of the laboratory shear-test table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShearTestCase {
    /// Run index, also the test number.
    pub run: u32,
    /// Near sheet profile.
    pub near_sheet: usize,
    /// Far sheet profile.
    pub far_sheet: usize,
    /// Screw profile.
    pub screw: usize,
    /// Arrangement family.
    pub family: usize,
    /// Variant within the family.
    pub variant: usize,
    /// Longitudinal multiplier.
    pub multiplier_l: f64,
    /// Transversal multiplier.
    pub multiplier_t: f64,
}

const fn case(
    run: u32,
    near_sheet: usize,
    far_sheet: usize,
    screw: usize,
    family: usize,
    multiplier_l: f64,
    multiplier_t: f64,
) -> ShearTestCase {
    ShearTestCase {
        run,
        near_sheet,
        far_sheet,
        screw,
        family,
        variant: 0,
        multiplier_l,
        multiplier_t,
    }
}

/// The 19 configurations tested in the laboratory.
pub const SHEAR_TESTS: [ShearTestCase; 19] = [
    case(1, 2, 4, 1, 0, 4.0, 4.0),
    case(2, 1, 4, 1, 0, 4.0, 4.0),
    case(3, 0, 4, 1, 0, 4.0, 4.0),
    case(4, 0, 5, 1, 0, 4.0, 4.0),
    case(5, 5, 5, 2, 0, 4.0, 4.0),
    case(6, 4, 5, 2, 0, 4.0, 4.0),
    case(7, 4, 4, 2, 0, 4.0, 4.0),
    case(8, 5, 5, 1, 0, 4.0, 4.0),
    case(9, 4, 5, 1, 0, 4.0, 4.0),
    case(10, 3, 5, 1, 0, 4.0, 4.0),
    case(11, 4, 4, 1, 0, 4.0, 4.0),
    case(12, 3, 4, 1, 0, 4.0, 4.0),
    case(13, 3, 3, 1, 0, 4.0, 4.0),
    case(14, 4, 4, 1, 1, 4.0, 4.0),
    case(15, 4, 4, 1, 1, 5.0, 4.0),
    case(16, 4, 4, 1, 1, 6.0, 4.0),
    case(17, 4, 4, 1, 2, 4.0, 4.0),
    case(18, 4, 4, 1, 2, 4.0, 5.0),
    case(19, 4, 4, 1, 2, 4.0, 6.0),
];

/// Run indices of each shear-test group.
pub const SHEAR_TEST_GROUPS: [&[u32]; 3] = [
    &[1, 2, 3, 4],
    &[5, 6, 7, 8, 9, 10, 11, 12, 13],
    &[14, 15, 16, 17, 18, 19],
];

impl ShearTestCase {
    /// Request for this case with the sheet geometry of `config`.
    #[must_use]
    pub fn request(&self, config: &GeneratorConfig) -> ConnectionRequest {
        ConnectionRequest {
            run_index: self.run,
            near_sheet: self.near_sheet,
            far_sheet: self.far_sheet,
            sheet_length: config.sheet_length,
            sheet_width: config.sheet_width,
            screw: self.screw,
            pattern_family: self.family,
            pattern_variant: self.variant,
            multiplier_l: self.multiplier_l,
            multiplier_t: self.multiplier_t,
            end_distance: config.end_distance,
        }
    }
}

/// Requests for the shear-test table, optionally restricted to one group.
///
/// Groups are numbered from one; an unknown group yields no requests.
///
/// # Examples
/// ```
/// use screwlayout::{shear_test_requests, GeneratorConfig};
///
/// let config = GeneratorConfig::default();
/// assert_eq!(shear_test_requests(None, &config).len(), 19);
/// assert_eq!(shear_test_requests(Some(2), &config).len(), 9);
/// assert!(shear_test_requests(Some(4), &config).is_empty());
/// ```
#[must_use]
pub fn shear_test_requests(group: Option<usize>, config: &GeneratorConfig) -> Vec<ConnectionRequest> {
    let runs: Option<&[u32]> = match group {
        None => None,
        Some(group) => match group.checked_sub(1).and_then(|i| SHEAR_TEST_GROUPS.get(i)) {
            Some(runs) => Some(*runs),
            None => return Vec::new(),
        },
    };
    SHEAR_TESTS
        .iter()
        .filter(|case| runs.map_or(true, |runs| runs.contains(&case.run)))
        .map(|case| case.request(config))
        .collect()
}

/// Full factorial sweep over the catalog and the multipliers of `config`.
///
/// The far sheet is never thinner in catalog order than the near sheet, and run
/// indices increase from one in loop order.
#[must_use]
pub fn parametric_sweep(catalog: &Catalog, config: &GeneratorConfig) -> Vec<ConnectionRequest> {
    let mut requests = Vec::new();
    let mut run_index = 0;
    for near_sheet in 0..catalog.sheets.len() {
        for far_sheet in near_sheet..catalog.sheets.len() {
            for screw in 0..catalog.screws.len() {
                for (pattern_family, family) in catalog.arrangements.families().iter().enumerate() {
                    for pattern_variant in 0..family.variants.len() {
                        for &multiplier_l in &config.longitudinal_multipliers {
                            for &multiplier_t in &config.transversal_multipliers {
                                run_index += 1;
                                requests.push(ConnectionRequest {
                                    run_index,
                                    near_sheet,
                                    far_sheet,
                                    sheet_length: config.sheet_length,
                                    sheet_width: config.sheet_width,
                                    screw,
                                    pattern_family,
                                    pattern_variant,
                                    multiplier_l,
                                    multiplier_t,
                                    end_distance: config.end_distance,
                                });
                            }
                        }
                    }
                }
            }
        }
    }
    requests
}

/// A configuration that could not be generated.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchFailure {
    /// Run index of the rejected configuration.
    pub run_index: u32,
    /// Why it was rejected.
    #[serde(serialize_with = "serialize_display")]
    pub error: ConnectionError,
}

fn serialize_display<S: serde::Serializer>(
    error: &ConnectionError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Outcome of a batch.
#[derive(Clone, Debug, Default, Serialize)]
pub struct BatchReport {
    /// Generated connections in run order.
    pub models: Vec<ConnectionModel>,
    /// Rejected configurations in run order.
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    /// Job names of the generated connections, in submission order.
    #[must_use]
    pub fn job_names(&self) -> Vec<&str> {
        self.models.iter().map(|model| model.name.job.as_str()).collect()
    }

    /// Whether every configuration was generated.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Generate every request, continuing past rejected configurations.
///
/// Connections are resolved in parallel. Names are then registered in run
/// order, so the same input always produces the same report.
#[must_use]
pub fn generate_batch(
    requests: &[ConnectionRequest],
    catalog: &Catalog,
    job: &JobSettings,
) -> BatchReport {
    let outcomes: Vec<(u32, Result<ConnectionModel, ConnectionError>)> = requests
        .par_iter()
        .map(|request| {
            let outcome = generate_connection_layout(request, catalog)
                .map(|model| model.with_job_settings(job.clone()));
            (request.run_index, outcome)
        })
        .collect();

    let mut registry = NameRegistry::new();
    let mut report = BatchReport::default();
    for (run_index, outcome) in outcomes {
        let checked = outcome.and_then(|model| {
            registry.register(&model.name, run_index)?;
            Ok(model)
        });
        match checked {
            Ok(model) => report.models.push(model),
            Err(error) => {
                warn!(run = run_index, %error, "rejected configuration");
                report.failures.push(BatchFailure { run_index, error });
            }
        }
    }

    info!(
        requested = requests.len(),
        generated = report.models.len(),
        rejected = report.failures.len(),
        "batch finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LayoutError;

    #[test]
    fn groups_cover_the_table_once() {
        let mut runs: Vec<u32> = SHEAR_TEST_GROUPS.iter().flat_map(|g| g.iter().copied()).collect();
        runs.sort_unstable();
        let expected: Vec<u32> = SHEAR_TESTS.iter().map(|case| case.run).collect();
        assert_eq!(runs, expected);
    }

    #[test]
    fn sweep_enumerates_the_full_factorial() {
        let catalog = Catalog::builtin();
        let config = GeneratorConfig::default();
        let requests = parametric_sweep(&catalog, &config);
        // 21 sheet pairs, 4 screws, 24 arrangement variants, 6 x 3 multipliers.
        assert_eq!(requests.len(), 21 * 4 * 24 * 18);
        assert_eq!(requests[0].run_index, 1);
        assert!(requests.windows(2).all(|w| w[1].run_index == w[0].run_index + 1));
        assert!(requests.iter().all(|r| r.far_sheet >= r.near_sheet));
    }

    #[test]
    fn failures_do_not_stop_the_batch() {
        let catalog = Catalog::builtin();
        let config = GeneratorConfig::default();
        let mut requests = shear_test_requests(Some(1), &config);
        requests[1].pattern_family = 2;
        requests[1].multiplier_t = 20.0;
        let report = generate_batch(&requests, &catalog, &config.job);
        assert_eq!(report.models.len(), 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].run_index, 2);
        assert!(matches!(
            report.failures[0].error,
            ConnectionError::Layout(LayoutError::ColumnOverflow { .. })
        ));
        assert!(!report.is_complete());
    }

    #[test]
    fn duplicate_names_are_rejected_after_the_first() {
        let catalog = Catalog::builtin();
        let config = GeneratorConfig::default();
        let mut requests = shear_test_requests(Some(1), &config);
        requests.push(requests[0].clone());
        let report = generate_batch(&requests, &catalog, &config.job);
        assert_eq!(report.models.len(), 4);
        assert!(matches!(
            report.failures[0].error,
            ConnectionError::Naming(ref collision) if collision.first_run == 1 && collision.second_run == 1
        ));
    }

    #[test]
    fn job_settings_are_attached() {
        let catalog = Catalog::builtin();
        let config = GeneratorConfig::default();
        let job = JobSettings {
            cpus: 8,
            ..JobSettings::default()
        };
        let report = generate_batch(&shear_test_requests(Some(3), &config), &catalog, &job);
        assert!(report.is_complete());
        assert!(report.models.iter().all(|model| model.job.cpus == 8));
        assert_eq!(report.job_names()[0], "JM14-10-10-48-I0_4_4");
    }

    #[test]
    fn full_sweep_names_are_unique() {
        let catalog = Catalog::builtin();
        let config = GeneratorConfig::default();
        let requests = parametric_sweep(&catalog, &config);
        let report = generate_batch(&requests, &catalog, &config.job);
        assert_eq!(requests.len(), 36_288);
        assert_eq!(report.models.len(), 30_345);
        assert_eq!(report.failures.len(), 5_943);
        assert!(!report
            .failures
            .iter()
            .any(|failure| matches!(failure.error, ConnectionError::Naming(_))));
    }
}
