#![warn(clippy::pedantic)]

use std::collections::HashSet;

use approx::assert_relative_eq;
use screwlayout::{
    generate_batch, generate_connection_layout, shear_test_requests, Catalog, ConnectionError,
    ConnectionRequest, GeneratorConfig, Interaction, LayoutError, PartKind, SHEAR_TESTS,
};

fn request(family: usize, variant: usize, multiplier_l: f64, multiplier_t: f64) -> ConnectionRequest {
    ConnectionRequest {
        run_index: 1,
        near_sheet: 4,
        far_sheet: 4,
        sheet_length: 250.0,
        sheet_width: 50.0,
        screw: 1,
        pattern_family: family,
        pattern_variant: variant,
        multiplier_l,
        multiplier_t,
        end_distance: 30.0,
    }
}

#[test]
fn every_shear_test_generates_a_distinct_model() {
    let config = GeneratorConfig::default();
    let report = generate_batch(
        &shear_test_requests(None, &config),
        &Catalog::builtin(),
        &config.job,
    );
    assert!(report.is_complete(), "failures: {:?}", report.failures);
    assert_eq!(report.models.len(), SHEAR_TESTS.len());

    let names: HashSet<&str> = report.models.iter().map(|m| m.name.model.as_str()).collect();
    assert_eq!(names.len(), 19);

    let runs: Vec<u32> = report.models.iter().map(|m| m.request.run_index).collect();
    assert_eq!(runs, (1..=19).collect::<Vec<_>>());
    assert_eq!(report.models[0].name.model, "M01-06-10-48-O0_4_4");
    assert_eq!(report.models[4].name.model, "M05-25-25-55-O0_4_4");
    assert_eq!(report.models[18].name.model, "M19-10-10-48-II0_4_6");
}

#[test]
fn two_screws_straddle_the_centreline() {
    let model = generate_connection_layout(&request(2, 0, 4.0, 4.0), &Catalog::builtin())
        .expect("two screws fit");
    assert_eq!(model.screws.len(), 2);
    assert_relative_eq!(model.screws[0].x, -9.6, epsilon = 1.0e-12);
    assert_relative_eq!(model.screws[1].x, 9.6, epsilon = 1.0e-12);
}

#[test]
fn four_rows_need_117_6_mm() {
    let model = generate_connection_layout(&request(1, 2, 4.0, 4.0), &Catalog::builtin())
        .expect("four rows fit");
    let ys: Vec<f64> = model.screws.iter().map(|s| s.y).collect();
    for (actual, expected) in ys.iter().zip([0.0, 19.2, 38.4, 57.6]) {
        assert_relative_eq!(*actual, expected, epsilon = 1.0e-12);
    }
    assert_relative_eq!(model.outline.length(), 117.6, epsilon = 1.0e-12);

    let mut short = request(1, 2, 4.0, 4.0);
    short.sheet_length = 100.0;
    let error = generate_connection_layout(&short, &Catalog::builtin()).expect_err("too short");
    assert!(matches!(
        error,
        ConnectionError::Layout(LayoutError::InsufficientLength { .. })
    ));
}

#[test]
fn three_columns_at_wide_spacing_overflow() {
    let error = generate_connection_layout(&request(3, 0, 4.0, 6.0), &Catalog::builtin())
        .expect_err("57.6 mm does not fit in 50 mm");
    assert!(matches!(
        error,
        ConnectionError::Layout(LayoutError::ColumnOverflow { count: 3, .. })
    ));
}

#[test]
fn interaction_counts_follow_the_screw_count() {
    let catalog = Catalog::builtin();
    for (family, variant, screws) in [(0, 0, 1), (2, 1, 4), (5, 0, 10), (6, 1, 4)] {
        let model = generate_connection_layout(&request(family, variant, 4.0, 3.0), &catalog)
            .expect("fits");
        assert_eq!(model.screws.len(), screws);
        assert_eq!(model.interactions.instance_count(), 2 + 2 * screws);
        // One sheet-to-sheet contact, then eleven contacts and one tie per screw.
        assert_eq!(model.interactions.interaction_count(), 1 + 12 * screws);
        assert_eq!(model.interactions.tie_count(), screws);
    }
}

#[test]
fn thin_sheets_erode() {
    let mut thin = request(0, 0, 4.0, 4.0);
    thin.near_sheet = 0;
    thin.far_sheet = 2;
    let model = generate_connection_layout(&thin, &Catalog::builtin()).expect("fits");
    let self_contacts = model
        .interactions
        .interactions()
        .into_iter()
        .filter(|(first, second, interaction)| {
            first == second && matches!(interaction, Interaction::SelfContact { .. })
        })
        .count();
    assert_eq!(self_contacts, 2);
    assert_eq!(model.interactions.interaction_count(), 2 + 1 + 12);
}

#[test]
fn reference_points_sit_beyond_the_sheet_ends() {
    let model = generate_connection_layout(&request(1, 0, 4.0, 4.0), &Catalog::builtin())
        .expect("fits");
    let load = model.assembly.load_point.position;
    let fixed = model.assembly.fixed_point.position;
    assert!(load.y > model.outline.max.y);
    assert!(fixed.y < model.outline.min.y);
    assert_relative_eq!(load.z, -0.5, epsilon = 1.0e-12);
    assert_relative_eq!(fixed.z, -1.5, epsilon = 1.0e-12);
    assert_eq!(model.assembly.load_point.instance, PartKind::NearSheet.part_name());
}
