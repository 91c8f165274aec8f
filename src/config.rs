//! Generator configuration: sheet geometry, sweep multipliers and job settings.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Floating-point precision of the explicit solver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplicitPrecision {
    /// Single precision.
    #[default]
    Single,
    /// Double precision.
    Double,
}

/// Interpolation between the points of an amplitude table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmplitudeKind {
    /// Fifth-order smooth step between consecutive points.
    #[default]
    SmoothStep,
    /// Linear interpolation.
    Tabular,
}

/// Solver resources and step definition attached to every generated job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSettings {
    /// Number of CPUs.
    pub cpus: u32,
    /// Number of parallel domains.
    pub domains: u32,
    /// Number of GPUs.
    pub gpus: u32,
    /// Share of physical memory the solver may use, in percent.
    pub memory_percent: u32,
    /// Explicit solver precision.
    pub explicit_precision: ExplicitPrecision,
    /// Duration of the explicit step in seconds.
    pub step_time: f64,
    /// Number of equally spaced field and history output intervals.
    pub output_intervals: u32,
    /// Velocity amplitude applied to the load point as `(time, velocity)` pairs.
    pub velocity_amplitude: Vec<(f64, f64)>,
    /// Interpolation of `velocity_amplitude`.
    pub amplitude_kind: AmplitudeKind,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            cpus: 4,
            domains: 4,
            gpus: 0,
            memory_percent: 90,
            explicit_precision: ExplicitPrecision::Single,
            step_time: 0.06,
            output_intervals: 250,
            velocity_amplitude: vec![(0.0, 0.0), (0.02, 200.0), (1.0, 200.0)],
            amplitude_kind: AmplitudeKind::SmoothStep,
        }
    }
}

/// Settings that drive batch generation.
///
/// Every field is optional in JSON; missing fields fall back to the built-in
/// campaign values.
///
/// # Examples
/// ```
/// use screwlayout::GeneratorConfig;
///
/// let config: GeneratorConfig =
///     serde_json::from_str(r#"{ "end_distance": 40.0 }"#).expect("valid config");
/// assert_eq!(config.end_distance, 40.0);
/// assert_eq!(config.sheet_width, 50.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Sheet length in millimetres.
    pub sheet_length: f64,
    /// Sheet width in millimetres.
    pub sheet_width: f64,
    /// Distance from the outer rows to the sheet ends in millimetres.
    pub end_distance: f64,
    /// Longitudinal multipliers swept by the parametric study.
    pub longitudinal_multipliers: Vec<f64>,
    /// Transversal multipliers swept by the parametric study.
    pub transversal_multipliers: Vec<f64>,
    /// Solver settings for every job.
    pub job: JobSettings,
    /// Catalog file replacing the built-in catalog.
    pub catalog: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            sheet_length: 250.0,
            sheet_width: 50.0,
            end_distance: 30.0,
            longitudinal_multipliers: vec![3.0, 4.0, 5.0, 6.0, 8.0, 10.0],
            transversal_multipliers: vec![3.0, 4.0, 5.0],
            job: JobSettings::default(),
            catalog: None,
        }
    }
}

impl GeneratorConfig {
    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or when a
    /// dimension is not a positive finite number.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        let config: GeneratorConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: display.clone(),
                source,
            })?;
        config.validate().map_err(|reason| ConfigError::Invalid {
            path: display,
            reason,
        })?;
        Ok(config)
    }

    /// Check that every dimension and multiplier is positive and finite.
    ///
    /// # Errors
    ///
    /// Returns a description of the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("sheet_length", self.sheet_length),
            ("sheet_width", self.sheet_width),
            ("end_distance", self.end_distance),
            ("job.step_time", self.job.step_time),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{field} must be positive, got {value}"));
            }
        }
        for (field, values) in [
            ("longitudinal_multipliers", &self.longitudinal_multipliers),
            ("transversal_multipliers", &self.transversal_multipliers),
        ] {
            if values.is_empty() {
                return Err(format!("{field} must not be empty"));
            }
            if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v <= 0.0) {
                return Err(format!("{field} must be positive, got {bad}"));
            }
        }
        if self.job.velocity_amplitude.is_empty() {
            return Err("job.velocity_amplitude must hold at least one point".to_owned());
        }
        if self.job.output_intervals == 0 {
            return Err("job.output_intervals must be at least one".to_owned());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn defaults_reproduce_the_campaign() {
        let config = GeneratorConfig::default();
        assert_eq!(config.longitudinal_multipliers.len(), 6);
        assert_eq!(config.transversal_multipliers, vec![3.0, 4.0, 5.0]);
        assert_eq!(config.job.cpus, 4);
        assert_eq!(config.job.explicit_precision, ExplicitPrecision::Single);
        assert_relative_eq!(config.job.step_time, 0.06);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_job_settings_keep_defaults() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{ "job": { "cpus": 16, "explicit_precision": "double" } }"#)
                .expect("valid config");
        assert_eq!(config.job.cpus, 16);
        assert_eq!(config.job.explicit_precision, ExplicitPrecision::Double);
        assert_eq!(config.job.output_intervals, 250);
        assert_eq!(config.job.velocity_amplitude.len(), 3);
        assert_eq!(config.job.amplitude_kind, AmplitudeKind::SmoothStep);
    }

    #[test]
    fn amplitude_kind_reads_snake_case() {
        let job: JobSettings =
            serde_json::from_str(r#"{ "amplitude_kind": "tabular" }"#).expect("valid job");
        assert_eq!(job.amplitude_kind, AmplitudeKind::Tabular);
    }

    #[test]
    fn invalid_values_are_reported() {
        let config = GeneratorConfig {
            transversal_multipliers: vec![3.0, -1.0],
            ..GeneratorConfig::default()
        };
        let reason = config.validate().expect_err("negative multiplier");
        assert!(reason.contains("transversal_multipliers"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let error = GeneratorConfig::from_path("/nonexistent/screwlayout.json")
            .expect_err("file does not exist");
        assert!(matches!(error, ConfigError::Io { .. }));
    }
}
