use screwlayout::{BatchReport, ConnectionModel, Plane};
use std::fmt::Write;

/// Render a textual summary of one generated connection.
///
/// The report lists what the host needs to build the model: where the screws go,
/// how the sheets are cut and which names the job will write results under.
#[must_use]
pub fn render_summary(model: &ConnectionModel) -> String {
    let mut output = String::new();

    // Identify the connection first so the remaining lines can be matched to a job.
    writeln!(
        &mut output,
        "{} ({} x ST{:.1}, {} mm + {} mm sheets, pattern {}{})",
        model.name.model,
        model.screws.len(),
        model.screw.nominal_diameter,
        model.near_sheet.thickness,
        model.far_sheet.thickness,
        model.family,
        model.request.pattern_variant,
    )
    .expect("writing to string cannot fail");

    writeln!(
        &mut output,
        "  spacing: l = {:.2} mm, t = {:.2} mm, end distance = {:.2} mm",
        model.parameters.longitudinal_spacing,
        model.parameters.transversal_spacing,
        model.parameters.end_distance
    )
    .expect("writing to string cannot fail");

    writeln!(
        &mut output,
        "  sheet outline: {:.2} mm x {:.2} mm",
        model.outline.width(),
        model.outline.length()
    )
    .expect("writing to string cannot fail");

    for screw in &model.screws {
        writeln!(
            &mut output,
            "  screw {}: x = {:+.3} mm, y = {:+.3} mm",
            screw.tag(),
            screw.x,
            screw.y
        )
        .expect("writing to string cannot fail");
    }

    // Partition planes are listed by offset only; their normals follow from the group.
    writeln!(
        &mut output,
        "  longitudinal planes (y): {}",
        offsets(&model.partitions.longitudinal)
    )
    .expect("writing to string cannot fail");
    writeln!(
        &mut output,
        "  transversal planes (x): {}",
        offsets(&model.partitions.transversal)
    )
    .expect("writing to string cannot fail");

    writeln!(
        &mut output,
        "  instances: {}, interactions: {} ({} ties), shank length = {:.2} mm",
        model.assembly.instances.len(),
        model.interactions.interaction_count(),
        model.interactions.tie_count(),
        model.fastener.shank_length
    )
    .expect("writing to string cannot fail");

    let (pulled, held) = (&model.assembly.load_point, &model.assembly.fixed_point);
    writeln!(
        &mut output,
        "  load: {} pulled through {}, {} held by {}, screw tips at z = {:.2} mm",
        pulled.instance,
        pulled.set_name,
        held.instance,
        held.set_name,
        model.screw_tips.first().map_or(0.0, |tip| tip.z)
    )
    .expect("writing to string cannot fail");

    writeln!(
        &mut output,
        "  job {}: {} cpus, {} domains, step {} s, results {} / {}",
        model.name.job,
        model.job.cpus,
        model.job.domains,
        model.job.step_time,
        model.name.load_displacement_report(),
        model.name.energy_ratio_report()
    )
    .expect("writing to string cannot fail");

    output
}

fn offsets(planes: &[Plane]) -> String {
    planes
        .iter()
        .map(|plane| format!("{:.3}", plane.offset))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render every connection of a batch followed by its rejected configurations.
#[must_use]
pub fn render_batch(report: &BatchReport) -> String {
    let mut output = String::new();
    for model in &report.models {
        output.push_str(&render_summary(model));
    }
    if !report.failures.is_empty() {
        writeln!(&mut output, "Rejected configurations:").expect("writing to string cannot fail");
        for failure in &report.failures {
            writeln!(&mut output, "  run {}: {}", failure.run_index, failure.error)
                .expect("writing to string cannot fail");
        }
    }
    writeln!(
        &mut output,
        "{} generated, {} rejected",
        report.models.len(),
        report.failures.len()
    )
    .expect("writing to string cannot fail");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use screwlayout::{generate_batch, shear_test_requests, Catalog, GeneratorConfig};

    #[test]
    fn formats_human_readable_report() {
        let config = GeneratorConfig::default();
        let report = generate_batch(
            &shear_test_requests(Some(3), &config),
            &Catalog::builtin(),
            &config.job,
        );
        let text = render_summary(&report.models[3]);
        assert!(text.starts_with("M17-10-10-48-II0_4_4 (2 x ST4.8"));
        assert!(text.contains("screw 0_0: x = -9.600 mm"));
        assert!(text.contains("JM17-10-10-48-II0_4_4_U2-RF2.rpt"));
        assert!(text.contains("nearSheetPart pulled through sheetAdj_RP"));
        assert!(text.contains("screw tips at z = -8.00 mm"));

        let summary = render_batch(&report);
        assert!(summary.ends_with("6 generated, 0 rejected\n"));
    }
}
