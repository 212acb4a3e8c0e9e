//! TensorLab CLI — build and inspect labeled tensor datasets.
//!
//! Commands:
//! - `build` — load instrument CSVs, align, build the tensor, write `.npy`
//! - `inspect` — print the metadata of a saved dataset directory

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tensorlab_core::data::{align_universe, compute_returns, load_universe_from_dir};
use tensorlab_core::engine::{build_dataset, DatasetConfig, TensorDataset};
use tensorlab_core::export::{save_dataset, DatasetMetadata};

#[derive(Parser)]
#[command(
    name = "tensorlab",
    about = "TensorLab CLI — labeled training tensors from daily market histories"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a labeled tensor dataset from per-instrument CSV files.
    Build {
        /// Path to a TOML config file ([io] + [dataset] sections).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory of per-instrument CSVs (file stem = instrument id).
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Reference instrument identifier.
        #[arg(long)]
        reference: Option<String>,

        /// Lookback width in trading days.
        #[arg(long, default_value_t = 10)]
        lookback: usize,

        /// First sample day (index into the aligned calendar).
        #[arg(long)]
        start: Option<usize>,

        /// One past the last sample day.
        #[arg(long)]
        end: Option<usize>,

        /// Output directory for tensor.npy, labels.npy, metadata.json.
        #[arg(long, default_value = "dataset")]
        output_dir: PathBuf,
    },
    /// Print the metadata of a saved dataset directory.
    Inspect {
        /// Dataset directory written by `build`.
        #[arg(long, default_value = "dataset")]
        dir: PathBuf,
    },
}

/// TOML build configuration.
#[derive(Debug, Deserialize)]
struct BuildConfig {
    io: IoConfig,
    dataset: DatasetConfig,
}

#[derive(Debug, Deserialize)]
struct IoConfig {
    data_dir: PathBuf,
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            config,
            data_dir,
            reference,
            lookback,
            start,
            end,
            output_dir,
        } => run_build(config, data_dir, reference, lookback, start, end, output_dir),
        Commands::Inspect { dir } => run_inspect(&dir),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_build(
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    reference: Option<String>,
    lookback: usize,
    start: Option<usize>,
    end: Option<usize>,
    output_dir: PathBuf,
) -> Result<()> {
    let (io, dataset_config) = if let Some(path) = config_path {
        if data_dir.is_some() || reference.is_some() || start.is_some() || end.is_some() {
            bail!("--config is mutually exclusive with the individual build flags");
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: BuildConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        (config.io, config.dataset)
    } else {
        let (Some(data_dir), Some(reference), Some(start), Some(end)) =
            (data_dir, reference, start, end)
        else {
            bail!("without --config, all of --data-dir, --reference, --start, --end are required");
        };
        (
            IoConfig {
                data_dir,
                output_dir,
            },
            DatasetConfig {
                reference,
                lookback,
                sample_start: start,
                sample_end: end,
            },
        )
    };

    let universe = load_universe_from_dir(&io.data_dir, &dataset_config.reference)
        .with_context(|| format!("failed to load universe from {}", io.data_dir.display()))?;
    println!(
        "Loaded {} instruments (reference: {})",
        universe.instrument_count(),
        universe.reference()
    );

    let aligned = align_universe(&universe).context("date alignment failed")?;
    println!(
        "Common calendar: {} days ({} to {})",
        aligned.day_count(),
        aligned.dates().first().unwrap(),
        aligned.dates().last().unwrap(),
    );

    let gap_rows = aligned.gap_record_count();
    if gap_rows > 0 {
        println!("Warning: {gap_rows} aligned rows carry NaN values; their flags encode as 0");
    }

    let returns = compute_returns(&aligned);
    let dataset = build_dataset(&aligned, &returns, &dataset_config)
        .context("tensor build failed")?;

    let metadata = DatasetMetadata::new(
        &dataset_config,
        aligned.instruments().map(String::from).collect(),
        &dataset,
    );
    save_dataset(&dataset, &metadata, &io.output_dir)
        .with_context(|| format!("failed to save dataset to {}", io.output_dir.display()))?;

    print_summary(&metadata, &dataset);
    println!("Dataset saved to: {}", io.output_dir.display());
    Ok(())
}

fn run_inspect(dir: &Path) -> Result<()> {
    let meta_path = dir.join("metadata.json");
    let json = std::fs::read_to_string(&meta_path)
        .with_context(|| format!("failed to read {}", meta_path.display()))?;
    let metadata: DatasetMetadata =
        serde_json::from_str(&json).with_context(|| format!("failed to parse {}", meta_path.display()))?;

    println!("Dataset: {}", dir.display());
    println!("Schema version: {}", metadata.schema_version);
    println!("Config id:      {}", metadata.config_id);
    println!("Reference:      {}", metadata.config.reference);
    println!("Lookback:       {}", metadata.config.lookback);
    println!(
        "Sample range:   [{}, {})",
        metadata.config.sample_start, metadata.config.sample_end
    );
    println!(
        "Tensor shape:   [{}, {}, {}, {}]",
        metadata.tensor_shape[0],
        metadata.tensor_shape[1],
        metadata.tensor_shape[2],
        metadata.tensor_shape[3]
    );
    println!("Instruments:    {}", metadata.instruments.join(", "));
    Ok(())
}

fn print_summary(metadata: &DatasetMetadata, dataset: &TensorDataset) {
    let labels = &dataset.labels;
    let buys = labels.iter().filter(|&&l| l == 1.0).count();
    println!();
    println!("=== Dataset Built ===");
    println!("Config id:    {}", metadata.config_id);
    println!(
        "Tensor shape: [{}, {}, {}, {}]",
        metadata.tensor_shape[0],
        metadata.tensor_shape[1],
        metadata.tensor_shape[2],
        metadata.tensor_shape[3]
    );
    println!(
        "Labels:       {} samples ({} buy / {} sell)",
        labels.len(),
        buys,
        labels.len() - buys
    );
}
