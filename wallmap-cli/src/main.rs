//! wallmap - CLI for adobe wall-section geometry extraction and mapping.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wallmap_core::{
    extract_sections, load_classification, parse_dxf_file, read_feature_table,
    read_geometry_csv, render_feature_maps, run_stats, validate_for_render,
    write_geometry_csv, write_synthetic_csv, DuplicatePolicy, ExtractOptions, RenderConfig,
    StatsOptions, SynthOptions,
};

/// Map degradation features onto wall-section geometry from DXF drawings.
#[derive(Parser, Debug)]
#[command(name = "wallmap")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract wall-section geometry from a DXF file into a CSV
    Extract {
        /// Input DXF file path
        #[arg(short, long)]
        input: PathBuf,

        /// Output geometry CSV path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Policy for repeated block names: last-wins, first-wins, merge, fail
        #[arg(long, default_value = "last-wins")]
        on_duplicate: String,

        /// Output the parsed drawing as JSON instead of extracting
        #[arg(long)]
        debug: bool,
    },

    /// Render feature-of-interest maps from geometry and feature CSVs
    Render {
        /// Geometry CSV path
        #[arg(short, long)]
        geometry: PathBuf,

        /// Feature table CSV path
        #[arg(short, long)]
        features: PathBuf,

        /// Discrete classification CSV (value, color, legend triples)
        #[arg(long)]
        discrete: Option<PathBuf>,

        /// Continuous classification CSV (feature, colorscale)
        #[arg(long)]
        continuous: Option<PathBuf>,

        /// Binary classification CSV (feature, color, color)
        #[arg(long)]
        binary: Option<PathBuf>,

        /// Features to render (default: every classified feature)
        #[arg(long = "feature")]
        feature_names: Vec<String>,

        /// Output directory for the PNG maps
        #[arg(short, long, default_value = "maps")]
        out_dir: PathBuf,

        /// Canvas padding in drawing units
        #[arg(long, default_value = "100")]
        padding: u32,

        /// Fail on sections missing from the feature table
        #[arg(long)]
        strict: bool,
    },

    /// Correlation statistics over a feature table
    Stats {
        /// Feature table CSV path
        #[arg(short, long)]
        input: PathBuf,

        /// Column names to exclude from the analysis
        #[arg(long = "drop")]
        drop: Vec<String>,

        /// Significance threshold
        #[arg(long, default_value = "0.05")]
        alpha: f64,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Prefix for the output file names
        #[arg(long, default_value = "")]
        prefix: String,
    },

    /// Generate a synthetic degradation dataset
    Synth {
        /// Number of wall sections to simulate
        #[arg(short, long, default_value = "67")]
        n_samples: usize,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Output CSV path
        #[arg(short, long, default_value = "synthetic_adobe_data.csv")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match args.command {
        Command::Extract {
            input,
            output,
            on_duplicate,
            debug,
        } => extract(input, output, &on_duplicate, debug),
        Command::Render {
            geometry,
            features,
            discrete,
            continuous,
            binary,
            feature_names,
            out_dir,
            padding,
            strict,
        } => render(
            geometry,
            features,
            discrete,
            continuous,
            binary,
            feature_names,
            out_dir,
            padding,
            strict,
        ),
        Command::Stats {
            input,
            drop,
            alpha,
            out_dir,
            prefix,
        } => stats(input, drop, alpha, out_dir, &prefix),
        Command::Synth {
            n_samples,
            seed,
            output,
        } => synth(n_samples, seed, output),
    }
}

fn extract(
    input: PathBuf,
    output: Option<PathBuf>,
    on_duplicate: &str,
    debug: bool,
) -> Result<()> {
    let policy = DuplicatePolicy::from_str_opt(on_duplicate)
        .with_context(|| format!("Unknown duplicate policy '{}'", on_duplicate))?;

    info!("Processing: {}", input.display());

    let drawing = parse_dxf_file(&input)
        .with_context(|| format!("Failed to parse {}", input.display()))?;

    info!(
        "Parsed {} block definition(s), {} reference(s)",
        drawing.blocks.len(),
        drawing.inserts.len()
    );

    if debug {
        let json = serde_json::to_string_pretty(&drawing)?;
        println!("{}", json);
        return Ok(());
    }

    let options = ExtractOptions {
        on_duplicate: policy,
    };
    let (sections, summary) = extract_sections(&drawing, &options)?;

    let output_path = output.unwrap_or_else(|| {
        let mut path = input.clone();
        path.set_extension("csv");
        path
    });

    write_geometry_csv(&sections, &output_path)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    summary.report();
    info!("Generated: {}", output_path.display());

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn render(
    geometry: PathBuf,
    features: PathBuf,
    discrete: Option<PathBuf>,
    continuous: Option<PathBuf>,
    binary: Option<PathBuf>,
    feature_names: Vec<String>,
    out_dir: PathBuf,
    padding: u32,
    strict: bool,
) -> Result<()> {
    let classification = load_classification(
        discrete.as_deref(),
        continuous.as_deref(),
        binary.as_deref(),
    )
    .context("Failed to load feature classification")?;

    if classification.is_empty() {
        anyhow::bail!("No feature classification given (use --discrete/--continuous/--binary)");
    }

    let sections = read_geometry_csv(&geometry)
        .with_context(|| format!("Failed to read {}", geometry.display()))?;
    let table = read_feature_table(&features)
        .with_context(|| format!("Failed to read {}", features.display()))?;

    info!(
        "Loaded {} wall section(s), {} feature row(s)",
        sections.len(),
        table.len()
    );

    let validation = validate_for_render(&sections, &table, strict)?;
    if !validation.passed {
        anyhow::bail!("Validation failed");
    }

    let names: Vec<String> = if feature_names.is_empty() {
        classification.feature_names().map(String::from).collect()
    } else {
        feature_names
    };

    let config = RenderConfig::with_padding(padding);
    let summary = render_feature_maps(&sections, &table, &classification, &names, &out_dir, &config)?;
    summary.report();

    if summary.rendered.is_empty() {
        anyhow::bail!("No feature maps rendered");
    }

    Ok(())
}

fn stats(
    input: PathBuf,
    drop: Vec<String>,
    alpha: f64,
    out_dir: PathBuf,
    prefix: &str,
) -> Result<()> {
    let table = read_feature_table(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let options = StatsOptions { drop, alpha };
    let written = run_stats(&table, &options, &out_dir, prefix)?;

    for path in &written {
        info!("Generated: {}", path.display());
    }

    Ok(())
}

fn synth(n_samples: usize, seed: u64, output: PathBuf) -> Result<()> {
    let options = SynthOptions { n_samples, seed };
    write_synthetic_csv(&options, &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}
