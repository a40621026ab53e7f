//! foldboost command-line tool.
//!
//! - `foldboost cv --train data/ --model-dir out/ -k 5 --num-round 100`
//!   cross-validates a boosted-tree regressor on `data/train.csv`, prints the
//!   fold-averaged RMSE, and writes the retained model to
//!   `out/foldboost-model.json`.
//! - `foldboost predict --model out/foldboost-model.json --input features.csv`
//!   prints one prediction per input row.
//!
//! Hyperparameters come from `--hyperparameters` (a JSON map accepting the
//! usual XGBoost names) and are overridden by explicit flags. Without a file,
//! `max_depth` defaults to 5 and `eta` to 0.2.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use foldboost::cv::{CrossValidator, FoldStrategy, ModelRetention};
use foldboost::data::io::{load_csv, load_features_csv};
use foldboost::data::CsvOptions;
use foldboost::model::gbdt::TreeParams;
use foldboost::model::{GBDTConfig, GBDTModel};
use foldboost::training::{Objective, Verbosity};

/// File name of the retained model inside `--model-dir`.
const MODEL_FILE: &str = "foldboost-model.json";

/// Default training file inside a `--train` directory.
const TRAIN_FILE: &str = "train.csv";

#[derive(Parser, Debug)]
#[command(name = "foldboost", version, about = "K-fold cross-validation of boosted-tree regressors")]
struct Cli {
    /// Verbose logging (debug level, per-round training metrics)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cross-validate a model and store the retained fold model
    Cv(CvArgs),

    /// Predict with a stored model
    Predict(PredictArgs),
}

#[derive(clap::Args, Debug)]
struct CvArgs {
    /// Training data: a CSV file, or a directory containing train.csv
    #[arg(long)]
    train: PathBuf,

    /// Output directory for the model file
    #[arg(long, default_value = "model")]
    model_dir: PathBuf,

    /// Number of folds
    #[arg(short = 'k', long = "k", default_value_t = 5)]
    k: usize,

    /// Number of boosting rounds
    #[arg(long)]
    num_round: Option<u32>,

    /// Maximum tree depth
    #[arg(long)]
    max_depth: Option<u32>,

    /// Learning rate
    #[arg(long)]
    eta: Option<f32>,

    /// Objective name, e.g. reg:squarederror
    #[arg(long)]
    objective: Option<Objective>,

    /// JSON file of hyperparameters
    #[arg(long)]
    hyperparameters: Option<PathBuf>,

    /// Shuffle rows with this seed before assigning folds
    #[arg(long)]
    shuffle_seed: Option<u64>,

    /// Which fold models to keep
    #[arg(long, value_enum, default_value_t = Retain::Last)]
    retain: Retain,

    /// Worker threads: 0 = auto, 1 = sequential
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// The first CSV record is a header
    #[arg(long)]
    header: bool,
}

#[derive(clap::Args, Debug)]
struct PredictArgs {
    /// Model file written by `foldboost cv`
    #[arg(long)]
    model: PathBuf,

    /// CSV of feature rows (no target column)
    #[arg(long)]
    input: PathBuf,

    /// The first CSV record is a header
    #[arg(long)]
    header: bool,

    /// Worker threads: 0 = auto, 1 = sequential
    #[arg(long, default_value_t = 1)]
    threads: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Retain {
    Last,
    All,
    None,
}

impl From<Retain> for ModelRetention {
    fn from(r: Retain) -> Self {
        match r {
            Retain::Last => ModelRetention::Last,
            Retain::All => ModelRetention::All,
            Retain::None => ModelRetention::None,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Cv(args) => run_cv(args, cli.verbose),
        Command::Predict(args) => run_predict(args),
    }
}

fn csv_options(header: bool) -> CsvOptions {
    if header {
        CsvOptions::headerless().with_header()
    } else {
        CsvOptions::headerless()
    }
}

fn resolve_config(args: &CvArgs, verbose: bool) -> Result<GBDTConfig> {
    let mut config = match &args.hyperparameters {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open hyperparameters {}", path.display()))?;
            serde_json::from_reader::<_, GBDTConfig>(BufReader::new(file))
                .with_context(|| format!("failed to parse hyperparameters {}", path.display()))?
        }
        None => GBDTConfig {
            tree: TreeParams::depth_wise(5),
            learning_rate: 0.2,
            ..GBDTConfig::default()
        },
    };

    if let Some(n) = args.num_round {
        config.n_trees = n;
    }
    if let Some(depth) = args.max_depth {
        config.tree.max_depth = depth;
    }
    if let Some(eta) = args.eta {
        config.learning_rate = eta;
    }
    if let Some(objective) = args.objective {
        config.objective = objective;
    }
    if verbose {
        config.verbosity = config.verbosity.max(Verbosity::Info);
    }

    config.validate().context("invalid hyperparameters")?;
    Ok(config)
}

fn training_file(train: &Path) -> PathBuf {
    if train.is_dir() {
        train.join(TRAIN_FILE)
    } else {
        train.to_path_buf()
    }
}

fn run_cv(args: CvArgs, verbose: bool) -> Result<()> {
    let config = resolve_config(&args, verbose)?;
    let train_path = training_file(&args.train);
    let data = load_csv(&train_path, &csv_options(args.header))
        .with_context(|| format!("failed to load training data from {}", train_path.display()))?;

    tracing::info!(
        n_rows = data.n_rows(),
        n_features = data.n_features(),
        k = args.k,
        n_trees = config.n_trees,
        "starting cross-validation"
    );

    let strategy = args
        .shuffle_seed
        .map_or(FoldStrategy::Contiguous, |seed| FoldStrategy::Shuffled { seed });
    let retention = ModelRetention::from(args.retain);
    let cv = CrossValidator::builder()
        .k(args.k)
        .strategy(strategy)
        .retention(retention)
        .n_threads(args.threads)
        .build()
        .validate_gbdt(&data, &config)
        .context("cross-validation failed")?;

    println!("RMSE average across folds: {}", cv.mean());

    let feature_names = data.feature_names().map(<[String]>::to_vec);
    let with_names = |model: GBDTModel| match &feature_names {
        Some(names) => model.with_feature_names(names.clone()),
        None => model,
    };

    match retention {
        ModelRetention::None => {
            tracing::info!("no model retained");
        }
        ModelRetention::Last => {
            let Some(model) = cv.into_final_model() else {
                bail!("cross-validation returned no model");
            };
            save(&with_names(model), &args.model_dir.join(MODEL_FILE))?;
        }
        ModelRetention::All => {
            let models = cv.into_models();
            let last = models.len().saturating_sub(1);
            for (fold, model) in models.into_iter().enumerate() {
                let model = with_names(model);
                save(&model, &args.model_dir.join(format!("foldboost-model-fold{fold}.json")))?;
                if fold == last {
                    save(&model, &args.model_dir.join(MODEL_FILE))?;
                }
            }
        }
    }

    Ok(())
}

fn save(model: &GBDTModel, path: &Path) -> Result<()> {
    model
        .save_json(path)
        .with_context(|| format!("failed to save model to {}", path.display()))?;
    tracing::info!(path = %path.display(), "stored trained model");
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    let model = GBDTModel::load_json(&args.model)
        .with_context(|| format!("failed to load model from {}", args.model.display()))?;
    let features = load_features_csv(&args.input, &csv_options(args.header))
        .with_context(|| format!("failed to load features from {}", args.input.display()))?;

    if features.ncols() != model.n_features() {
        bail!(
            "input has {} feature columns, model expects {}",
            features.ncols(),
            model.n_features()
        );
    }

    let predictions = model.predict(features.view(), args.threads);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for p in predictions.iter() {
        writeln!(out, "{p}")?;
    }
    out.flush()?;
    Ok(())
}
