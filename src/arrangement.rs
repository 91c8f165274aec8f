//! Arrangement grammar: named pattern families of per-row screw counts.

use serde::{Deserialize, Serialize};

use crate::errors::{CatalogIndexError, LayoutError};

/// Ordered screw counts, one entry per row along the sheet length.
///
/// A valid sequence is non-empty and every entry is at least one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct RowCounts(Vec<usize>);

impl RowCounts {
    /// Validate and wrap a sequence of row counts.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::EmptyArrangement`] when `counts` is empty and
    /// [`LayoutError::EmptyRow`] when any row holds zero screws.
    ///
    /// # Examples
    /// ```
    /// use screwlayout::{LayoutError, RowCounts};
    ///
    /// assert!(RowCounts::new(vec![3, 2, 3, 2]).is_ok());
    /// assert_eq!(RowCounts::new(vec![2, 0]), Err(LayoutError::EmptyRow(1)));
    /// ```
    pub fn new(counts: Vec<usize>) -> Result<Self, LayoutError> {
        if counts.is_empty() {
            return Err(LayoutError::EmptyArrangement);
        }
        if let Some(row) = counts.iter().position(|&count| count == 0) {
            return Err(LayoutError::EmptyRow(row));
        }
        Ok(Self(counts))
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no rows, which validation rules out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Screw count of every row.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Largest screw count over all rows.
    #[must_use]
    pub fn max(&self) -> usize {
        self.0.iter().copied().max().unwrap_or(0)
    }
}

impl TryFrom<Vec<usize>> for RowCounts {
    type Error = LayoutError;

    fn try_from(value: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RowCounts> for Vec<usize> {
    fn from(value: RowCounts) -> Self {
        value.0
    }
}

/// How screws are distributed across the width of each row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutRule {
    /// Each row places its screws centred about the sheet centreline.
    Centered,
    /// Each row places a single screw, alternating between two transverse positions.
    Staggered,
}

/// A fully resolved arrangement: the row counts tagged with the rule that places them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", content = "rows", rename_all = "lowercase")]
pub enum ArrangementPattern {
    /// `n_i` screws centred in row `i`.
    Centered(RowCounts),
    /// One screw per row at alternating offsets.
    Staggered(RowCounts),
}

impl ArrangementPattern {
    /// Tag `rows` with `rule`.
    #[must_use]
    pub fn new(rule: LayoutRule, rows: RowCounts) -> Self {
        match rule {
            LayoutRule::Centered => ArrangementPattern::Centered(rows),
            LayoutRule::Staggered => ArrangementPattern::Staggered(rows),
        }
    }

    /// Rule used to place screws.
    #[must_use]
    pub fn rule(&self) -> LayoutRule {
        match self {
            ArrangementPattern::Centered(_) => LayoutRule::Centered,
            ArrangementPattern::Staggered(_) => LayoutRule::Staggered,
        }
    }

    /// Underlying row counts.
    #[must_use]
    pub fn rows(&self) -> &RowCounts {
        match self {
            ArrangementPattern::Centered(rows) | ArrangementPattern::Staggered(rows) => rows,
        }
    }

    /// Number of rows along the sheet length.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows().len()
    }

    /// Number of screws actually placed in `row`.
    #[must_use]
    pub fn screws_in_row(&self, row: usize) -> usize {
        match self {
            ArrangementPattern::Centered(rows) => rows.as_slice().get(row).copied().unwrap_or(0),
            ArrangementPattern::Staggered(rows) => usize::from(row < rows.len()),
        }
    }

    /// Total number of screws in the connection.
    #[must_use]
    pub fn screw_count(&self) -> usize {
        (0..self.row_count()).map(|row| self.screws_in_row(row)).sum()
    }

    /// Number of transverse column positions the widest row occupies.
    ///
    /// The staggered rule alternates between two candidate positions, so it
    /// always spans two columns.
    #[must_use]
    pub fn max_columns(&self) -> usize {
        match self {
            ArrangementPattern::Centered(rows) => rows.max(),
            ArrangementPattern::Staggered(_) => 2,
        }
    }
}

/// Named family of arrangement variants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternFamily {
    /// Short label used in model names, such as `II` or `VI`.
    pub label: String,
    /// Placement rule shared by all variants of the family.
    pub rule: LayoutRule,
    /// Row-count variants, addressed by index.
    pub variants: Vec<RowCounts>,
}

/// Ordered collection of pattern families.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArrangementGrammar {
    families: Vec<PatternFamily>,
}

impl ArrangementGrammar {
    /// Wrap a list of families.
    #[must_use]
    pub fn new(families: Vec<PatternFamily>) -> Self {
        Self { families }
    }

    /// The seven families used for the shear-test campaign.
    #[must_use]
    pub fn builtin() -> Self {
        fn family(label: &str, rule: LayoutRule, variants: &[&[usize]]) -> PatternFamily {
            PatternFamily {
                label: label.to_owned(),
                rule,
                variants: variants
                    .iter()
                    .map(|rows| RowCounts(rows.to_vec()))
                    .collect(),
            }
        }

        Self::new(vec![
            family("O", LayoutRule::Centered, &[&[1]]),
            family(
                "I",
                LayoutRule::Centered,
                &[&[1, 1], &[1, 1, 1], &[1, 1, 1, 1], &[1, 1, 1, 1, 1]],
            ),
            family(
                "II",
                LayoutRule::Centered,
                &[&[2], &[2, 2], &[2, 2, 2], &[2, 2, 2, 2], &[2, 2, 2, 2, 2]],
            ),
            family("III", LayoutRule::Centered, &[&[3], &[3, 3], &[3, 3, 3]]),
            family(
                "IV",
                LayoutRule::Centered,
                &[
                    &[2, 1, 2, 1, 2, 1],
                    &[2, 1, 1, 2, 1, 1],
                    &[2, 2, 1, 2, 2, 1],
                ],
            ),
            family(
                "V",
                LayoutRule::Centered,
                &[&[3, 2, 3, 2], &[2, 3, 2, 3], &[3, 2, 2, 3], &[2, 3, 3, 2]],
            ),
            family(
                "VI",
                LayoutRule::Staggered,
                &[
                    &[1, 1, 1],
                    &[1, 1, 1, 1],
                    &[1, 1, 1, 1, 1],
                    &[1, 1, 1, 1, 1, 1],
                ],
            ),
        ])
    }

    /// Number of families.
    #[must_use]
    pub fn len(&self) -> usize {
        self.families.len()
    }

    /// Whether the grammar holds no families.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// All families in index order.
    #[must_use]
    pub fn families(&self) -> &[PatternFamily] {
        &self.families
    }

    /// Look up a family by index.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogIndexError::UnknownFamily`] when `index` is out of range.
    pub fn family(&self, index: usize) -> Result<&PatternFamily, CatalogIndexError> {
        self.families
            .get(index)
            .ok_or(CatalogIndexError::UnknownFamily {
                index,
                len: self.families.len(),
            })
    }

    /// Index of the family carrying `label`, if any.
    #[must_use]
    pub fn position(&self, label: &str) -> Option<usize> {
        self.families.iter().position(|family| family.label == label)
    }

    /// Resolve a family and variant index into a tagged arrangement.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogIndexError`] when either index is out of range.
    ///
    /// # Examples
    /// ```
    /// use screwlayout::{ArrangementGrammar, LayoutRule};
    ///
    /// let grammar = ArrangementGrammar::builtin();
    /// let pattern = grammar.pattern(6, 1).expect("family VI has a second variant");
    /// assert_eq!(pattern.rule(), LayoutRule::Staggered);
    /// assert_eq!(pattern.screw_count(), 4);
    /// ```
    pub fn pattern(
        &self,
        family: usize,
        variant: usize,
    ) -> Result<ArrangementPattern, CatalogIndexError> {
        let entry = self.family(family)?;
        let rows = entry
            .variants
            .get(variant)
            .ok_or_else(|| CatalogIndexError::UnknownVariant {
                family: entry.label.clone(),
                variant,
                len: entry.variants.len(),
            })?;
        Ok(ArrangementPattern::new(entry.rule, rows.clone()))
    }
}

impl Default for ArrangementGrammar {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_counts_reject_empty_input() {
        assert_eq!(RowCounts::new(vec![]), Err(LayoutError::EmptyArrangement));
        assert_eq!(RowCounts::new(vec![1, 0, 1]), Err(LayoutError::EmptyRow(1)));
    }

    #[test]
    fn builtin_grammar_has_seven_families() {
        let grammar = ArrangementGrammar::builtin();
        let labels: Vec<_> = grammar.families().iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, ["O", "I", "II", "III", "IV", "V", "VI"]);
        assert_eq!(grammar.position("VI"), Some(6));
        assert_eq!(grammar.family(6).map(|f| f.rule), Ok(LayoutRule::Staggered));
    }

    #[test]
    fn unknown_indices_are_reported() {
        let grammar = ArrangementGrammar::builtin();
        assert_eq!(
            grammar.pattern(7, 0),
            Err(CatalogIndexError::UnknownFamily { index: 7, len: 7 })
        );
        assert_eq!(
            grammar.pattern(3, 3),
            Err(CatalogIndexError::UnknownVariant {
                family: "III".to_owned(),
                variant: 3,
                len: 3,
            })
        );
    }

    #[test]
    fn staggered_rows_hold_one_screw_each() {
        let rows = RowCounts::new(vec![1, 1, 1, 1, 1]).expect("valid rows");
        let pattern = ArrangementPattern::Staggered(rows);
        assert_eq!(pattern.screw_count(), 5);
        assert_eq!(pattern.max_columns(), 2);
        assert_eq!(pattern.screws_in_row(5), 0);
    }

    #[test]
    fn centered_counts_follow_rows() {
        let grammar = ArrangementGrammar::builtin();
        let pattern = grammar.pattern(5, 0).expect("family V variant 0");
        assert_eq!(pattern.rows().as_slice(), &[3, 2, 3, 2]);
        assert_eq!(pattern.screw_count(), 10);
        assert_eq!(pattern.max_columns(), 3);
    }

    #[test]
    fn grammar_deserialises_from_json() {
        let json = r#"[{"label": "X", "rule": "staggered", "variants": [[1, 1]]}]"#;
        let grammar: ArrangementGrammar = serde_json::from_str(json).expect("valid grammar");
        let pattern = grammar.pattern(0, 0).expect("single variant");
        assert_eq!(pattern.rule(), LayoutRule::Staggered);

        let invalid = r#"[{"label": "X", "rule": "centered", "variants": [[]]}]"#;
        assert!(serde_json::from_str::<ArrangementGrammar>(invalid).is_err());
    }
}
