mod report;

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use report::{render_batch, render_summary};
use screwlayout::{
    generate_batch, generate_connection_layout, parametric_sweep, shear_test_requests, BatchReport,
    Catalog, ConnectionRequest, GeneratorConfig,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(version, about = "Generate layouts for self-drilling screw connection models")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Generator configuration (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Sheet, screw and arrangement catalog (JSON), overriding the configuration
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,
    /// Write the layouts to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the laboratory shear-test configurations
    ShearTests {
        /// Only generate one test group (1 to 3)
        #[arg(long)]
        group: Option<usize>,
    },
    /// Generate the full factorial parametric sweep
    Sweep,
    /// Generate a single connection
    Single {
        /// Run index used in the model name
        #[arg(long, default_value_t = 1)]
        run: u32,
        /// Profile of the sheet under the screw head
        #[arg(long)]
        near_sheet: usize,
        /// Profile of the sheet away from the screw head
        #[arg(long)]
        far_sheet: usize,
        /// Screw profile
        #[arg(long)]
        screw: usize,
        /// Arrangement family
        #[arg(long)]
        family: usize,
        /// Variant within the family
        #[arg(long, default_value_t = 0)]
        variant: usize,
        /// Longitudinal spacing multiplier
        #[arg(short = 'l', long)]
        multiplier_l: f64,
        /// Transversal spacing multiplier
        #[arg(short = 't', long)]
        multiplier_t: f64,
    },
}

fn run_batch(
    requests: &[ConnectionRequest],
    catalog: &Catalog,
    config: &GeneratorConfig,
) -> BatchReport {
    info!(configurations = requests.len(), "generating batch");
    generate_batch(requests, catalog, &config.job)
}

fn render_report(report: &BatchReport, format: Format) -> Result<String, serde_json::Error> {
    match format {
        Format::Text => Ok(render_batch(report)),
        Format::Json => serde_json::to_string_pretty(report),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr so the layouts on stdout stay machine readable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "screwlayout=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // The configuration supplies sheet geometry and multipliers; a catalog passed
    // on the command line takes precedence over the one it names.
    let config = match &cli.config {
        Some(path) => GeneratorConfig::from_path(path)?,
        None => GeneratorConfig::default(),
    };
    let catalog = match cli.catalog.as_ref().or(config.catalog.as_ref()) {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::builtin(),
    };

    let rendered = match cli.command {
        Commands::Single {
            run,
            near_sheet,
            far_sheet,
            screw,
            family,
            variant,
            multiplier_l,
            multiplier_t,
        } => {
            let request = ConnectionRequest {
                run_index: run,
                near_sheet,
                far_sheet,
                sheet_length: config.sheet_length,
                sheet_width: config.sheet_width,
                screw,
                pattern_family: family,
                pattern_variant: variant,
                multiplier_l,
                multiplier_t,
                end_distance: config.end_distance,
            };
            let model = generate_connection_layout(&request, &catalog)?
                .with_job_settings(config.job.clone());
            match cli.format {
                Format::Text => render_summary(&model),
                Format::Json => serde_json::to_string_pretty(&model)?,
            }
        }
        Commands::ShearTests { group } => {
            let report = run_batch(&shear_test_requests(group, &config), &catalog, &config);
            render_report(&report, cli.format)?
        }
        Commands::Sweep => {
            let report = run_batch(&parametric_sweep(&catalog, &config), &catalog, &config);
            render_report(&report, cli.format)?
        }
    };

    match &cli.output {
        Some(path) => fs::write(path, rendered)?,
        None => println!("{rendered}"),
    }

    Ok(())
}
