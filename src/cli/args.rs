//! Command line argument parsing for the Lectio CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::experiment::{ExperimentConfig, VocabularyScope};
use crate::ml::FoldStrategy;

/// Lectio - interesting/boring article classifier
#[derive(Parser, Debug, Clone)]
#[command(name = "lectio")]
#[command(about = "Train and tune a TF-IDF + SGD article classifier")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct LectioArgs {
    /// Verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl LectioArgs {
    /// Get the effective verbosity level (0=quiet, 1=normal, 2=verbose, 3+=debug)
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the full experiment: baseline, grid search, final test score
    Run(RunArgs),

    /// Print the normalized text of one document
    Normalize(NormalizeArgs),

    /// List the combinations of the configured grid
    Grid(GridArgs),
}

/// Options shared by every command that needs a configuration.
#[derive(Parser, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Experiment configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "LECTIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Part-of-speech lexicon (word<TAB>TAG per line)
    #[arg(long, value_name = "LEXICON_FILE")]
    pub lexicon: Option<PathBuf>,
}

/// Arguments for running an experiment
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// List of interesting documents, one path per line
    #[arg(short, long, value_name = "LIST_FILE")]
    pub interesting: Option<PathBuf>,

    /// List of boring documents, one path per line
    #[arg(short, long, value_name = "LIST_FILE")]
    pub boring: Option<PathBuf>,

    /// Number of documents in the training split
    #[arg(long)]
    pub border: Option<usize>,

    /// Seed for shuffling the corpus
    #[arg(long)]
    pub seed: Option<u64>,

    /// Keep the list order instead of shuffling
    #[arg(long)]
    pub no_shuffle: bool,

    /// Number of cross-validation folds
    #[arg(short = 'k', long)]
    pub folds: Option<usize>,

    /// Fold assignment strategy
    #[arg(long)]
    pub strategy: Option<StrategyArg>,

    /// Fit the baseline vocabulary on the whole corpus
    #[arg(long)]
    pub full_corpus_vocabulary: bool,

    /// Evaluate grid tasks in parallel
    #[arg(long)]
    pub parallel: bool,
}

/// Arguments for normalizing one document
#[derive(Parser, Debug, Clone)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Document to normalize
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Arguments for listing grid combinations
#[derive(Parser, Debug, Clone)]
pub struct GridArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Show at most this many combinations
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Fold strategies available on the command line
#[derive(ValueEnum, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyArg {
    /// Contiguous folds in corpus order
    Kfold,
    /// Class-balanced folds
    Stratified,
}

impl From<StrategyArg> for FoldStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Kfold => FoldStrategy::KFold,
            StrategyArg::Stratified => FoldStrategy::Stratified,
        }
    }
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

impl ConfigArgs {
    /// Load the configuration file (or defaults) and apply `--lexicon`.
    pub fn load(&self) -> crate::error::Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::load(path)?,
            None => ExperimentConfig::default(),
        };
        if let Some(lexicon) = &self.lexicon {
            config.lexicon = Some(lexicon.clone());
        }
        Ok(config)
    }
}

impl RunArgs {
    /// Apply command line overrides on top of `config`.
    pub fn apply(&self, config: &mut ExperimentConfig) {
        if let Some(path) = &self.interesting {
            config.interesting_list = Some(path.clone());
        }
        if let Some(path) = &self.boring {
            config.boring_list = Some(path.clone());
        }
        if let Some(border) = self.border {
            config.border = border;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.no_shuffle {
            config.shuffle = false;
        }
        if let Some(folds) = self.folds {
            config.cv.n_splits = folds;
        }
        if let Some(strategy) = self.strategy {
            config.cv.strategy = strategy.into();
        }
        if self.full_corpus_vocabulary {
            config.vocabulary_scope = VocabularyScope::FullCorpus;
        }
        if self.parallel {
            config.parallel = true;
        }
    }
}
