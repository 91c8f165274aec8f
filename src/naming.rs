//! Deterministic model, job and result-file names.
//!
//! The model name is the only key the host uses to find a connection again, so
//! every configuration of a batch must map to a distinct name.

use std::collections::HashMap;

use serde::Serialize;

use crate::errors::NamingCollisionError;

/// Guard against representation error when truncating to tenths, e.g. `0.6 * 10`.
const TENTHS_GUARD: f64 = 1.0e-6;

/// Fields that identify one configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NamingKey<'a> {
    /// One-based run index within the batch.
    pub run_index: u32,
    /// Thickness of the sheet under the screw head, in millimetres.
    pub near_thickness: f64,
    /// Thickness of the sheet away from the screw head, in millimetres.
    pub far_thickness: f64,
    /// Screw nominal diameter in millimetres.
    pub nominal_diameter: f64,
    /// Label of the arrangement family.
    pub family: &'a str,
    /// Variant index within the family.
    pub variant: usize,
    /// Longitudinal spacing multiplier.
    pub multiplier_l: f64,
    /// Transversal spacing multiplier.
    pub multiplier_t: f64,
}

/// Names under which the host stores one connection.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ConnectionName {
    /// Model name.
    pub model: String,
    /// Job name, also the prefix of every result file.
    pub job: String,
}

impl ConnectionName {
    /// Resolve the names for `key`.
    ///
    /// # Examples
    /// ```
    /// use screwlayout::{ConnectionName, NamingKey};
    ///
    /// let name = ConnectionName::resolve(&NamingKey {
    ///     run_index: 1,
    ///     near_thickness: 0.6,
    ///     far_thickness: 1.0,
    ///     nominal_diameter: 4.8,
    ///     family: "O",
    ///     variant: 0,
    ///     multiplier_l: 4.0,
    ///     multiplier_t: 4.0,
    /// });
    /// assert_eq!(name.model, "M01-06-10-48-O0_4_4");
    /// assert_eq!(name.job, "JM01-06-10-48-O0_4_4");
    /// ```
    #[must_use]
    pub fn resolve(key: &NamingKey<'_>) -> Self {
        let model = format!(
            "M{:02}-{:02}-{:02}-{}-{}{}_{}_{}",
            key.run_index,
            tenths(key.near_thickness),
            tenths(key.far_thickness),
            tenths(key.nominal_diameter),
            key.family,
            key.variant,
            key.multiplier_l,
            key.multiplier_t,
        )
        .replace('/', "-");
        let job = format!("J{model}");
        Self { model, job }
    }

    /// Report written for the kinetic-to-internal energy ratio curve.
    #[must_use]
    pub fn energy_ratio_report(&self) -> String {
        format!("{}_ALLKE-ALLIE.rpt", self.job)
    }

    /// Report written for the displacement-reaction curve of the load point.
    #[must_use]
    pub fn load_displacement_report(&self) -> String {
        format!("{}_U2-RF2.rpt", self.job)
    }

    /// Image of the deformed shape coloured by von Mises stress.
    #[must_use]
    pub fn stress_image(&self) -> String {
        format!("{}_Mises.png", self.job)
    }
}

/// Truncate a length in millimetres to whole tenths of a millimetre.
// Lengths in this domain are far below u64::MAX tenths.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn tenths(value: f64) -> u64 {
    let scaled = (value * 10.0 + TENTHS_GUARD).floor();
    if scaled <= 0.0 {
        0
    } else {
        scaled as u64
    }
}

/// Names issued so far in a batch, used to reject collisions.
#[derive(Clone, Debug, Default)]
pub struct NameRegistry {
    issued: HashMap<String, u32>,
}

impl NameRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `run` produced `name`.
    ///
    /// # Errors
    ///
    /// Returns [`NamingCollisionError`] when an earlier run already produced `name`.
    pub fn register(&mut self, name: &ConnectionName, run: u32) -> Result<(), NamingCollisionError> {
        if let Some(&first_run) = self.issued.get(&name.model) {
            return Err(NamingCollisionError {
                name: name.model.clone(),
                first_run,
                second_run: run,
            });
        }
        self.issued.insert(name.model.clone(), run);
        Ok(())
    }

    /// Number of distinct names issued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    /// Whether no name has been issued yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(run_index: u32) -> NamingKey<'static> {
        NamingKey {
            run_index,
            near_thickness: 0.4,
            far_thickness: 2.5,
            nominal_diameter: 5.5,
            family: "II",
            variant: 3,
            multiplier_l: 5.0,
            multiplier_t: 3.0,
        }
    }

    #[test]
    fn tenths_survive_representation_error() {
        assert_eq!(tenths(0.6), 6);
        assert_eq!(tenths(0.7), 7);
        assert_eq!(tenths(4.8), 48);
        assert_eq!(tenths(6.3), 63);
        assert_eq!(tenths(2.55), 25);
        assert_eq!(tenths(-1.0), 0);
    }

    #[test]
    fn names_are_padded_and_delimited() {
        let name = ConnectionName::resolve(&key(12));
        assert_eq!(name.model, "M12-04-25-55-II3_5_3");
        assert_eq!(name.job, "JM12-04-25-55-II3_5_3");
        assert_eq!(name.energy_ratio_report(), "JM12-04-25-55-II3_5_3_ALLKE-ALLIE.rpt");
        assert_eq!(name.load_displacement_report(), "JM12-04-25-55-II3_5_3_U2-RF2.rpt");
        assert_eq!(name.stress_image(), "JM12-04-25-55-II3_5_3_Mises.png");
    }

    #[test]
    fn fractional_multipliers_keep_their_decimals() {
        let mut fractional = key(1);
        fractional.multiplier_l = 4.5;
        let name = ConnectionName::resolve(&fractional);
        assert!(name.model.ends_with("II3_4.5_3"));
    }

    #[test]
    fn registry_rejects_duplicates() {
        let mut registry = NameRegistry::new();
        let first = ConnectionName::resolve(&key(1));
        registry.register(&first, 1).expect("first use");
        registry
            .register(&ConnectionName::resolve(&key(2)), 2)
            .expect("different run index");
        let error = registry.register(&first, 3).expect_err("duplicate");
        assert_eq!(
            error,
            NamingCollisionError {
                name: first.model.clone(),
                first_run: 1,
                second_run: 3,
            }
        );
        assert_eq!(registry.len(), 2);
    }
}
