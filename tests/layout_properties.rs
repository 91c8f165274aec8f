//! Property-based tests for screw placement and partition planes.
//!
//! Run with: cargo test --test layout_properties

use proptest::prelude::*;
use screwlayout::{
    longitudinal_planes, place_screws, transversal_planes, ArrangementPattern, LayoutParameters,
    RowCounts,
};

const WIDTH: f64 = 50.0;

/// Row counts of up to six rows holding one to four screws each.
fn arb_rows() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..=4, 1..=6)
}

/// Spacings between a tight 5 mm and a wide 30 mm.
fn arb_spacing() -> impl Strategy<Value = f64> {
    5.0..30.0f64
}

fn params(longitudinal: f64, transversal: f64) -> LayoutParameters {
    LayoutParameters {
        longitudinal_spacing: longitudinal,
        transversal_spacing: transversal,
        end_distance: 30.0,
    }
}

proptest! {
    #[test]
    fn centred_rows_are_symmetric(rows in arb_rows(), l in arb_spacing(), t in arb_spacing()) {
        let pattern = ArrangementPattern::Centered(RowCounts::new(rows.clone()).unwrap());
        let fits = rows.iter().all(|&n| (n - 1) as f64 * t < WIDTH);
        let result = place_screws(&pattern, &params(l, t), WIDTH);
        prop_assert_eq!(result.is_ok(), fits);

        if let Ok(screws) = result {
            for (row, &count) in rows.iter().enumerate() {
                let xs: Vec<f64> = screws.iter().filter(|s| s.row == row).map(|s| s.x).collect();
                prop_assert_eq!(xs.len(), count);
                let sum: f64 = xs.iter().sum();
                prop_assert!(sum.abs() < 1e-9, "row {} sums to {}", row, sum);
                for pair in xs.windows(2) {
                    prop_assert!((pair[1] - pair[0] - t).abs() < 1e-9);
                }
                prop_assert!(xs.iter().all(|x| x.abs() < WIDTH / 2.0));
            }
        }
    }

    #[test]
    fn staggered_rows_have_period_two(rows in 1usize..=8, l in arb_spacing(), t in arb_spacing()) {
        let pattern = ArrangementPattern::Staggered(RowCounts::new(vec![1; rows]).unwrap());
        let screws = place_screws(&pattern, &params(l, t), WIDTH).unwrap();
        prop_assert_eq!(screws.len(), rows);
        for window in screws.windows(3) {
            prop_assert!((window[0].x - window[2].x).abs() < 1e-9);
        }
        for window in screws.windows(2) {
            prop_assert!((window[1].x - window[0].x - t).abs() < 1e-9
                || (window[0].x - window[1].x - t).abs() < 1e-9);
        }
    }

    #[test]
    fn longitudinal_planes_increase_and_hit_every_row(rows in 1usize..=8, l in arb_spacing()) {
        let offsets: Vec<f64> = longitudinal_planes(rows, l).iter().map(|p| p.offset).collect();
        prop_assert_eq!(offsets.len(), 2 * rows + 1);
        prop_assert!(offsets.windows(2).all(|w| w[1] > w[0]));
        for row in 0..rows {
            let y = row as f64 * l;
            prop_assert!(offsets.iter().any(|o| (o - y).abs() < 1e-9));
        }
    }

    #[test]
    fn transversal_planes_increase_and_hit_every_column(rows in arb_rows(), t in arb_spacing()) {
        let pattern = ArrangementPattern::Centered(RowCounts::new(rows).unwrap());
        let widest = pattern.max_columns();
        prop_assume!((widest - 1) as f64 * t < WIDTH);

        let offsets: Vec<f64> = transversal_planes(&pattern, t, WIDTH).iter().map(|p| p.offset).collect();
        prop_assert!(offsets.windows(2).all(|w| w[1] > w[0]));
        prop_assert!(offsets.iter().all(|o| o.abs() < WIDTH / 2.0));
        let screws = place_screws(&pattern, &params(20.0, t), WIDTH).unwrap();
        for screw in screws.iter().filter(|s| pattern.screws_in_row(s.row) == widest) {
            prop_assert!(offsets.iter().any(|o| (o - screw.x).abs() < 1e-9));
        }
    }
}
