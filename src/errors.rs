//! Error types produced while resolving connection layouts.

use thiserror::Error;

/// Error returned when a requested layout would produce invalid geometry.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LayoutError {
    /// Returned when the screws of a single row do not fit across the sheet width.
    #[error(
        "column overflow in row {row}: {count} screws need {required} mm but the sheet is {width} mm wide"
    )]
    ColumnOverflow {
        /// Index of the offending row.
        row: usize,
        /// Number of screws requested in the row.
        count: usize,
        /// Span occupied by the outermost columns in millimetres.
        required: f64,
        /// Sheet width in millimetres.
        width: f64,
    },
    /// Returned when a spacing is not large enough to separate neighbouring holes.
    #[error("{direction} spacing {spacing} mm must exceed the thread outer diameter {diameter} mm")]
    DegenerateSpacing {
        /// Either `"longitudinal"` or `"transversal"`.
        direction: &'static str,
        /// Rejected spacing in millimetres.
        spacing: f64,
        /// Thread outer diameter of the screw in millimetres.
        diameter: f64,
    },
    /// Returned when a sheet dimension is not a positive finite length.
    #[error("sheet {name} must be a positive length, got {value} mm")]
    InvalidSheetDimension {
        /// Either `"width"` or `"length"`.
        name: &'static str,
        /// Rejected value in millimetres.
        value: f64,
    },
    /// Returned when the screw group and end distances do not fit along the sheet.
    #[error("sheet length {length} mm is shorter than the required {required} mm")]
    InsufficientLength {
        /// Supplied sheet length in millimetres.
        length: f64,
        /// Length needed by the rows plus both end distances.
        required: f64,
    },
    /// Returned when the end distance does not clear the partition band of the end rows.
    #[error("end distance {end_distance} mm must exceed half the row spacing ({required} mm)")]
    InsufficientEndDistance {
        /// Supplied end distance in millimetres.
        end_distance: f64,
        /// Half the longitudinal spacing in millimetres.
        required: f64,
    },
    /// Returned when no through-thickness seed size is defined for a sheet.
    #[error("no seed size is defined for a {thickness} mm thick sheet")]
    UnsupportedThickness {
        /// Rejected sheet thickness in millimetres.
        thickness: f64,
    },
    /// Returned when an arrangement has no rows.
    #[error("arrangement has no rows")]
    EmptyArrangement,
    /// Returned when a row of an arrangement holds no screws.
    #[error("row {0} of the arrangement holds no screws")]
    EmptyRow(usize),
}

/// Error returned when a profile index does not exist in a catalog.
///
/// # Examples
///
/// ```
/// use screwlayout::{Catalog, CatalogIndexError};
///
/// let catalog = Catalog::builtin();
/// let error = catalog.screw(42).expect_err("unknown screw is rejected");
/// assert_eq!(error, CatalogIndexError::UnknownScrew { index: 42, len: 4 });
/// ```
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogIndexError {
    /// Returned when a sheet profile index is out of range.
    #[error("sheet profile {index} does not exist (catalog holds {len})")]
    UnknownSheet {
        /// Requested index.
        index: usize,
        /// Number of entries in the catalog.
        len: usize,
    },
    /// Returned when a screw profile index is out of range.
    #[error("screw profile {index} does not exist (catalog holds {len})")]
    UnknownScrew {
        /// Requested index.
        index: usize,
        /// Number of entries in the catalog.
        len: usize,
    },
    /// Returned when a pattern family index is out of range.
    #[error("pattern family {index} does not exist (grammar holds {len})")]
    UnknownFamily {
        /// Requested index.
        index: usize,
        /// Number of families in the grammar.
        len: usize,
    },
    /// Returned when a family has no variant with the requested index.
    #[error("pattern family {family} has no variant {variant} (it holds {len})")]
    UnknownVariant {
        /// Label of the family.
        family: String,
        /// Requested variant index.
        variant: usize,
        /// Number of variants in the family.
        len: usize,
    },
}

/// Error returned when two configurations of a batch resolve to the same model name.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("model name {name} is produced by both run {first_run} and run {second_run}")]
pub struct NamingCollisionError {
    /// The duplicated model name.
    pub name: String,
    /// Run index that claimed the name first.
    pub first_run: u32,
    /// Run index that produced the duplicate.
    pub second_run: u32,
}

/// Error returned when a single connection cannot be generated.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConnectionError {
    /// The request references a profile that is not in the catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogIndexError),
    /// The request describes invalid geometry.
    #[error(transparent)]
    Layout(#[from] LayoutError),
    /// The generated name clashes with an earlier configuration of the batch.
    #[error(transparent)]
    Naming(#[from] NamingCollisionError),
}

/// Error returned when a configuration or catalog file cannot be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON for the expected structure.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Path that was being parsed.
        path: String,
        /// Underlying parser failure.
        #[source]
        source: serde_json::Error,
    },
    /// A catalog or grammar was parsed but violates an invariant.
    #[error("invalid definition in {path}: {reason}")]
    Invalid {
        /// Path that was being validated.
        path: String,
        /// Description of the violated invariant.
        reason: String,
    },
}
