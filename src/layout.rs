//! Row/column resolution: screw coordinates and partition planes.
//!
//! Screws sit on the top face of the near sheet (`z = 0`). Row `i` lies at
//! `y = i * longitudinal_spacing`, and columns are centred about `x = 0`.

use serde::Serialize;
use tracing::debug;

use crate::arrangement::ArrangementPattern;
use crate::catalog::ScrewSpec;
use crate::errors::LayoutError;
use crate::geometry::{point, Plane, Point, Rectangle};

/// Tolerance used when merging coincident partition planes.
const PLANE_TOLERANCE: f64 = 1.0e-9;

/// Spacings derived once per connection, in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LayoutParameters {
    /// Distance between consecutive rows.
    pub longitudinal_spacing: f64,
    /// Distance between neighbouring columns.
    pub transversal_spacing: f64,
    /// Distance from the outermost rows to the sheet ends.
    pub end_distance: f64,
}

impl LayoutParameters {
    /// Derive spacings from multipliers of the screw nominal diameter.
    ///
    /// # Examples
    /// ```
    /// use screwlayout::{Catalog, LayoutParameters};
    ///
    /// let catalog = Catalog::builtin();
    /// let screw = catalog.screw(1).expect("ST4.8");
    /// let params = LayoutParameters::from_multipliers(screw, 4.0, 3.0, 30.0);
    /// assert!((params.longitudinal_spacing - 19.2).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn from_multipliers(
        screw: &ScrewSpec,
        multiplier_l: f64,
        multiplier_t: f64,
        end_distance: f64,
    ) -> Self {
        Self {
            longitudinal_spacing: multiplier_l * screw.nominal_diameter,
            transversal_spacing: multiplier_t * screw.nominal_diameter,
            end_distance,
        }
    }

    /// Reject spacings that would merge neighbouring holes or push partition planes
    /// past the sheet ends.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::DegenerateSpacing`] when either spacing does not exceed
    /// the thread outer diameter, and [`LayoutError::InsufficientEndDistance`] when the
    /// end distance does not clear the half-spacing bands around the end rows.
    pub fn validate(&self, screw: &ScrewSpec) -> Result<(), LayoutError> {
        let diameter = screw.thread_outer_diameter;
        for (direction, spacing) in [
            ("longitudinal", self.longitudinal_spacing),
            ("transversal", self.transversal_spacing),
        ] {
            if !spacing.is_finite() || spacing <= diameter {
                return Err(LayoutError::DegenerateSpacing {
                    direction,
                    spacing,
                    diameter,
                });
            }
        }
        let required = self.longitudinal_spacing / 2.0;
        if !self.end_distance.is_finite() || self.end_distance <= required {
            return Err(LayoutError::InsufficientEndDistance {
                end_distance: self.end_distance,
                required,
            });
        }
        Ok(())
    }

    /// Sheet length occupied by `rows` rows plus both end distances.
    #[must_use]
    pub fn required_length(&self, rows: usize) -> f64 {
        rows.saturating_sub(1) as f64 * self.longitudinal_spacing + 2.0 * self.end_distance
    }
}

/// One placed screw.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScrewInstance {
    /// Row index along the sheet length.
    pub row: usize,
    /// Column index within the row.
    pub column: usize,
    /// Transverse offset from the sheet centreline.
    pub x: f64,
    /// Longitudinal position, `row * longitudinal_spacing`.
    pub y: f64,
}

impl ScrewInstance {
    /// Position of the screw axis on the top face of the near sheet.
    #[must_use]
    pub fn position(&self) -> Point {
        point(self.x, self.y, 0.0)
    }

    /// `row_column` suffix shared by every host object that belongs to this screw.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("{}_{}", self.row, self.column)
    }
}

/// Partition planes that subdivide each sheet into structured-meshable cells.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PartitionPlan {
    /// Planes of constant Y, strictly increasing.
    pub longitudinal: Vec<Plane>,
    /// Planes of constant X, strictly increasing.
    pub transversal: Vec<Plane>,
}

impl PartitionPlan {
    /// Total number of cutting planes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.longitudinal.len() + self.transversal.len()
    }

    /// Whether the plan holds no planes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Screw coordinates, partition planes and sheet outline for one connection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedLayout {
    /// Every placed screw, row by row.
    pub screws: Vec<ScrewInstance>,
    /// Partition planes shared by both sheets.
    pub partitions: PartitionPlan,
    /// Footprint of both sheets in the XY plane.
    pub outline: Rectangle,
}

/// Transverse offset of column `column` in a row of `count` centred screws.
#[must_use]
pub fn column_offset(count: usize, column: usize, spacing: f64, width: f64) -> f64 {
    let span = count.saturating_sub(1) as f64 * spacing;
    -width / 2.0 + (width - span) / 2.0 + column as f64 * spacing
}

/// Transverse offset of the single screw in row `row` of a staggered arrangement.
#[must_use]
pub fn staggered_offset(row: usize, spacing: f64, width: f64) -> f64 {
    -width / 2.0 + (width - spacing) / 2.0 + (row % 2) as f64 * spacing
}

/// Check that every row fits across the sheet width.
///
/// # Errors
///
/// Returns [`LayoutError::ColumnOverflow`] for the first row whose outermost
/// columns span the full width or more.
pub fn check_columns(
    pattern: &ArrangementPattern,
    spacing: f64,
    width: f64,
) -> Result<(), LayoutError> {
    let widths: Vec<usize> = match pattern {
        ArrangementPattern::Centered(rows) => rows.as_slice().to_vec(),
        ArrangementPattern::Staggered(rows) => vec![2; rows.len()],
    };
    for (row, count) in widths.into_iter().enumerate() {
        let required = count.saturating_sub(1) as f64 * spacing;
        if required >= width {
            return Err(LayoutError::ColumnOverflow {
                row,
                count,
                required,
                width,
            });
        }
    }
    Ok(())
}

/// Place every screw of `pattern`.
///
/// # Errors
///
/// Returns [`LayoutError::ColumnOverflow`] when a row does not fit across `width`.
///
/// # Examples
/// ```
/// use screwlayout::{place_screws, ArrangementPattern, LayoutParameters, RowCounts};
///
/// let pattern = ArrangementPattern::Centered(RowCounts::new(vec![2]).expect("valid"));
/// let params = LayoutParameters {
///     longitudinal_spacing: 19.2,
///     transversal_spacing: 19.2,
///     end_distance: 30.0,
/// };
/// let screws = place_screws(&pattern, &params, 50.0).expect("two screws fit");
/// assert!((screws[0].x + 9.6).abs() < 1e-12);
/// assert!((screws[1].x - 9.6).abs() < 1e-12);
/// ```
pub fn place_screws(
    pattern: &ArrangementPattern,
    params: &LayoutParameters,
    width: f64,
) -> Result<Vec<ScrewInstance>, LayoutError> {
    let spacing = params.transversal_spacing;
    check_columns(pattern, spacing, width)?;

    let mut screws = Vec::with_capacity(pattern.screw_count());
    for row in 0..pattern.row_count() {
        let y = row as f64 * params.longitudinal_spacing;
        match pattern {
            ArrangementPattern::Centered(rows) => {
                let count = rows.as_slice()[row];
                screws.extend((0..count).map(|column| ScrewInstance {
                    row,
                    column,
                    x: column_offset(count, column, spacing, width),
                    y,
                }));
            }
            ArrangementPattern::Staggered(_) => screws.push(ScrewInstance {
                row,
                column: 0,
                x: staggered_offset(row, spacing, width),
                y,
            }),
        }
    }
    Ok(screws)
}

/// Planes of constant Y: one half a spacing before the first row, then one at
/// each row and one midway to the next.
#[must_use]
pub fn longitudinal_planes(rows: usize, spacing: f64) -> Vec<Plane> {
    let mut planes = Vec::with_capacity(2 * rows + 1);
    planes.push(Plane::at_y(-spacing / 2.0));
    for row in 0..rows {
        planes.push(Plane::at_y(row as f64 * spacing));
        planes.push(Plane::at_y((row as f64 + 0.5) * spacing));
    }
    planes
}

/// Planes of constant X through the columns of the widest row and their midpoints,
/// plus two flanking planes when the side margin leaves room for them.
#[must_use]
pub fn transversal_planes(pattern: &ArrangementPattern, spacing: f64, width: f64) -> Vec<Plane> {
    let columns = pattern.max_columns();
    let span = columns.saturating_sub(1) as f64 * spacing;
    let margin = (width - span) / 2.0;

    let mut offsets = Vec::with_capacity(2 * columns + 1);
    if margin > spacing / 2.0 {
        let flank = -width / 2.0 + (margin - spacing / 2.0);
        offsets.push(flank);
        offsets.push(-flank);
    }
    offsets.extend((0..columns).map(|column| column_offset(columns, column, spacing, width)));
    offsets.extend(
        (0..columns.saturating_sub(1)).map(|column| margin - width / 2.0 + (column as f64 + 0.5) * spacing),
    );

    offsets.sort_by(f64::total_cmp);
    offsets.dedup_by(|a, b| (*a - *b).abs() < PLANE_TOLERANCE);
    offsets.into_iter().map(Plane::at_x).collect()
}

/// Outline of a sheet that carries `rows` rows with the given parameters.
#[must_use]
pub fn sheet_outline(rows: usize, params: &LayoutParameters, width: f64) -> Rectangle {
    let last_row = rows.saturating_sub(1) as f64 * params.longitudinal_spacing;
    Rectangle {
        min: point(-width / 2.0, -params.end_distance, 0.0),
        max: point(width / 2.0, last_row + params.end_distance, 0.0),
    }
}

/// Resolve screw coordinates, partition planes and the sheet outline.
///
/// # Errors
///
/// Returns [`LayoutError`] when a sheet dimension is not a positive length, the
/// spacings are degenerate, a row overflows the sheet width or the rows do not fit
/// in `length`.
pub fn resolve_layout(
    pattern: &ArrangementPattern,
    params: &LayoutParameters,
    screw: &ScrewSpec,
    width: f64,
    length: f64,
) -> Result<ResolvedLayout, LayoutError> {
    for (name, value) in [("width", width), ("length", length)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(LayoutError::InvalidSheetDimension { name, value });
        }
    }
    params.validate(screw)?;
    let required = params.required_length(pattern.row_count());
    if required > length {
        return Err(LayoutError::InsufficientLength { length, required });
    }
    let screws = place_screws(pattern, params, width)?;
    let partitions = PartitionPlan {
        longitudinal: longitudinal_planes(pattern.row_count(), params.longitudinal_spacing),
        transversal: transversal_planes(pattern, params.transversal_spacing, width),
    };
    let outline = sheet_outline(pattern.row_count(), params, width);
    debug!(
        screws = screws.len(),
        planes = partitions.len(),
        required_length = required,
        "resolved connection layout"
    );
    Ok(ResolvedLayout {
        screws,
        partitions,
        outline,
    })
}
