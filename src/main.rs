//! topomap CLI
//!
//! Command-line interface for training maps and clustering streams from CSV files.

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use log::error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use topomap::dataset::gaussian_blobs;
use topomap::export::{load_csv, save_csv, write_codebook_csv};
use topomap::som::quality::{mean_quantization_error, topographic_error};
use topomap::{
    BatchLearning, BatchLearningConfig, ClassicLearning, ClassicLearningConfig, Dataset, Dsom, DsomConfig,
    LatticeType, MetricType, OfflineLearning, Plsom, PlsomConfig, Result, SelfOrganizingMap, SomConfig,
    StreamArt2aConfig, StreamArt2aDrift, StreamingSom, UbiSom, UbiSomConfig, VecDataset,
};

#[derive(Parser)]
#[command(name = "topomap")]
#[command(version)]
#[command(about = "Self-organizing maps and streaming ART clustering", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OfflineAlgorithm {
    Classic,
    Batch,
}

#[derive(Clone, Copy, ValueEnum)]
enum StreamingAlgorithm {
    Ubisom,
    Dsom,
    Plsom,
}

#[derive(Clone, Copy, ValueEnum)]
enum LatticeArg {
    Rect,
    RectTorus,
    Hex,
    HexTorus,
}

impl From<LatticeArg> for LatticeType {
    fn from(arg: LatticeArg) -> Self {
        match arg {
            LatticeArg::Rect => LatticeType::Rectangular,
            LatticeArg::RectTorus => LatticeType::RectangularToroidal,
            LatticeArg::Hex => LatticeType::Hexagonal,
            LatticeArg::HexTorus => LatticeType::HexagonalToroidal,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum MetricArg {
    Euclidean,
    Manhattan,
}

impl From<MetricArg> for MetricType {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Euclidean => MetricType::Euclidean,
            MetricArg::Manhattan => MetricType::Manhattan,
        }
    }
}

#[derive(clap::Args)]
struct MapArgs {
    /// Input CSV file (numeric rows); synthetic gaussian blobs when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output CSV file for the trained prototypes
    #[arg(short, long)]
    output: PathBuf,

    /// Grid columns
    #[arg(long, default_value = "10")]
    width: usize,

    /// Grid rows
    #[arg(long, default_value = "10")]
    height: usize,

    /// Grid topology
    #[arg(long, value_enum, default_value = "rect")]
    lattice: LatticeArg,

    /// Distance between prototypes and inputs
    #[arg(long, value_enum, default_value = "euclidean")]
    metric: MetricArg,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a map offline on a dataset
    Train {
        #[command(flatten)]
        map: MapArgs,

        /// Training algorithm
        #[arg(short, long, value_enum, default_value = "classic")]
        algorithm: OfflineAlgorithm,

        /// Epochs (ordering epochs for classic learning)
        #[arg(short, long, default_value = "10")]
        epochs: usize,

        /// Fine-tuning epochs (classic learning only)
        #[arg(long, default_value = "10")]
        fine_tune: usize,
    },

    /// Present a dataset to a streaming map, one row at a time
    Stream {
        #[command(flatten)]
        map: MapArgs,

        /// Streaming algorithm
        #[arg(short, long, value_enum, default_value = "ubisom")]
        algorithm: StreamingAlgorithm,

        /// UbiSOM ordering length and drift window
        #[arg(long, default_value = "2000")]
        ordering: usize,
    },

    /// Cluster a stream into StreamART2A micro-categories
    Art {
        /// Input CSV file (numeric rows); synthetic gaussian blobs when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output CSV file for the codebook
        #[arg(short, long)]
        output: PathBuf,

        /// Maximum number of micro-categories
        #[arg(short = 'k', long, default_value = "100")]
        capacity: usize,

        /// Maximum number of categories created per landmark window
        #[arg(short = 'q', long, default_value = "10")]
        per_window: usize,

        /// Landmark window length in inputs
        #[arg(short, long, default_value = "100")]
        window: usize,

        /// Vigilance as a fraction of the input manifold size
        #[arg(long, default_value = "0.1")]
        vigilance: f64,

        /// Lower bound of the input manifold
        #[arg(long, default_value = "0.0")]
        dmin: f64,

        /// Upper bound of the input manifold
        #[arg(long, default_value = "1.0")]
        dmax: f64,

        /// Random seed for the synthetic stream
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let result = match cli.command {
        Commands::Train {
            map,
            algorithm,
            epochs,
            fine_tune,
        } => train_map(map, algorithm, epochs, fine_tune),

        Commands::Stream {
            map,
            algorithm,
            ordering,
        } => stream_map(map, algorithm, ordering),

        Commands::Art {
            input,
            output,
            capacity,
            per_window,
            window,
            vigilance,
            dmin,
            dmax,
            seed,
        } => {
            let config = StreamArt2aConfig {
                capacity,
                max_new_per_window: per_window,
                landmark_window_size: window,
                vigilance,
                dmin,
                dmax,
                ..Default::default()
            };
            cluster_stream(input, output, config, seed)
        }
    };

    if let Err(e) = result {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) ETA: {eta}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░  ")
}

fn load_dataset(input: Option<&PathBuf>, seed: Option<u64>) -> Result<VecDataset> {
    match input {
        Some(path) => {
            let dataset = load_csv(path)?;
            println!(
                "✓ Loaded {} rows of dimension {} from {}",
                format_number(dataset.size()),
                dataset.input_dimensionality(),
                path.display()
            );
            Ok(dataset)
        }
        None => {
            let dataset = gaussian_blobs(
                &[vec![0.2, 0.2], vec![0.8, 0.3], vec![0.5, 0.8]],
                500,
                0.05,
                seed,
            )?;
            println!("✓ Generated {} synthetic samples", format_number(dataset.size()));
            Ok(dataset)
        }
    }
}

fn build_map(map: &MapArgs, dimensionality: usize) -> Result<SelfOrganizingMap> {
    let config = SomConfig {
        width: map.width,
        height: map.height,
        dimensionality,
        lattice: map.lattice.into(),
        metric: map.metric.into(),
        seed: map.seed,
    };
    let som = SelfOrganizingMap::new(&config)?;
    println!(
        "✓ Initialized {}x{} map ({} neurons, {}-dim prototypes)",
        som.width(),
        som.height(),
        som.len(),
        som.dimensionality()
    );
    Ok(som)
}

/// Attaches a progress bar that advances on every prototype update.
fn attach_progress(som: &mut SelfOrganizingMap, total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(bar_style());
    pb.set_message(message.to_string());

    let observer_pb = pb.clone();
    som.add_observer(Arc::new(move |_: &SelfOrganizingMap| observer_pb.inc(1)));
    pb
}

fn report_quality(som: &SelfOrganizingMap, dataset: &VecDataset) -> Result<()> {
    println!("   Quantization error: {:.5}", mean_quantization_error(som, dataset)?);
    println!("   Topographic error:  {:.5}", topographic_error(som, dataset)?);
    Ok(())
}

fn train_map(map: MapArgs, algorithm: OfflineAlgorithm, epochs: usize, fine_tune: usize) -> Result<()> {
    let start_time = Instant::now();
    println!("topomap offline training");

    let dataset = load_dataset(map.input.as_ref(), map.seed)?;
    let mut som = build_map(&map, dataset.input_dimensionality())?;
    let radius = map.width.max(map.height) as f64 / 2.0;

    let report = match algorithm {
        OfflineAlgorithm::Classic => {
            let config = ClassicLearningConfig {
                order_epochs: epochs,
                fine_tune_epochs: fine_tune,
                initial_radius: radius.max(1.0),
                seed: map.seed,
                ..Default::default()
            };
            let total = (config.total_epochs() * dataset.size()) as u64;
            let pb = attach_progress(&mut som, total, "Classic training...");
            let report = ClassicLearning::new(config)?.train(&mut som, &dataset)?;
            pb.finish_and_clear();
            report
        }
        OfflineAlgorithm::Batch => {
            let config = BatchLearningConfig {
                epochs,
                initial_radius: radius.max(1.0),
                ..Default::default()
            };
            let pb = attach_progress(&mut som, epochs as u64, "Batch training...");
            let report = BatchLearning::new(config)?.train(&mut som, &dataset)?;
            pb.finish_and_clear();
            report
        }
    };

    println!(
        "✓ Trained for {} epochs ({} iterations)",
        report.epochs_completed,
        format_number(report.iterations)
    );

    save_csv(&som, &map.output)?;
    println!("✓ Saved prototypes to {}", map.output.display());

    println!();
    println!("Training complete in {}", HumanDuration(start_time.elapsed()));
    report_quality(&som, &dataset)
}

fn stream_map(map: MapArgs, algorithm: StreamingAlgorithm, ordering: usize) -> Result<()> {
    let start_time = Instant::now();
    println!("topomap streaming");

    let dataset = load_dataset(map.input.as_ref(), map.seed)?;
    let mut som = build_map(&map, dataset.input_dimensionality())?;
    let pb = attach_progress(&mut som, dataset.size() as u64, "Streaming...");

    let mut model: Box<dyn StreamingSom> = match algorithm {
        StreamingAlgorithm::Ubisom => Box::new(UbiSom::new(
            som,
            UbiSomConfig {
                t: ordering,
                ..Default::default()
            },
        )?),
        StreamingAlgorithm::Dsom => Box::new(Dsom::new(som, DsomConfig::default())?),
        StreamingAlgorithm::Plsom => Box::new(Plsom::new(som, PlsomConfig::default())?),
    };

    for input in dataset.inputs() {
        model.learn(input)?;
    }
    pb.finish_and_clear();
    println!("✓ Learned {} inputs", format_number(model.iterations() as usize));

    save_csv(model.som(), &map.output)?;
    println!("✓ Saved prototypes to {}", map.output.display());

    println!();
    println!("Streaming complete in {}", HumanDuration(start_time.elapsed()));
    report_quality(model.som(), &dataset)
}

fn cluster_stream(
    input: Option<PathBuf>,
    output: PathBuf,
    mut config: StreamArt2aConfig,
    seed: Option<u64>,
) -> Result<()> {
    let start_time = Instant::now();
    println!("topomap StreamART2A");

    let dataset = load_dataset(input.as_ref(), seed)?;
    config.dimensionality = dataset.input_dimensionality();
    let mut monitored = StreamArt2aDrift::new(config)?;

    let pb = ProgressBar::new(dataset.size() as u64);
    pb.set_style(bar_style());
    pb.set_message("Clustering...");
    for input in dataset.inputs() {
        monitored.learn(input)?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    let engine = monitored.engine();
    println!(
        "✓ {} micro-categories after {} inputs ({} evicted)",
        engine.len(),
        format_number(engine.iteration() as usize),
        engine.evictions()
    );
    if let Some(fit) = monitored.current_fit() {
        println!("   Current fit: {:.5}", fit);
    }

    let file = std::fs::File::create(&output)?;
    write_codebook_csv(engine.codebook(), engine.config().dimensionality, file)?;
    println!("✓ Saved codebook to {}", output.display());

    println!();
    println!("Clustering complete in {}", HumanDuration(start_time.elapsed()));
    Ok(())
}

/// Format large numbers with commas for readability
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
