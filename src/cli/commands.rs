//! Command implementations for the Lectio CLI.

use std::fs;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::Result;
use crate::experiment::Experiment;

/// Execute a CLI command.
pub fn execute_command(args: LectioArgs) -> Result<()> {
    match &args.command {
        Command::Run(run_args) => run_experiment(run_args, &args),
        Command::Normalize(normalize_args) => normalize_document(normalize_args, &args),
        Command::Grid(grid_args) => list_grid(grid_args, &args),
    }
}

/// Run the full experiment.
fn run_experiment(args: &RunArgs, cli_args: &LectioArgs) -> Result<()> {
    let mut config = args.config.load()?;
    args.apply(&mut config);

    let morph = config.morph_analyzer()?;
    let experiment = Experiment::new(config, morph)?;
    log::info!(
        "Searching {} combinations with {}-fold cross-validation",
        experiment.config().grid.len()?,
        experiment.config().cv.n_splits
    );

    let report = experiment.run()?;
    output_result("Experiment finished", &report, cli_args)
}

/// Normalize a single document.
fn normalize_document(args: &NormalizeArgs, cli_args: &LectioArgs) -> Result<()> {
    let config = args.config.load()?;
    let morph = config.morph_analyzer()?;
    let experiment = Experiment::new(config, morph)?;

    let bytes = fs::read(&args.file)?;
    let text = experiment
        .normalizer()
        .normalize(&String::from_utf8_lossy(&bytes))?;

    let result = NormalizedDocument {
        path: args.file.to_string_lossy().to_string(),
        tokens: text.split_whitespace().count(),
        text,
    };
    output_result("Normalized document", &result, cli_args)
}

/// List the combinations of the configured grid.
fn list_grid(args: &GridArgs, cli_args: &LectioArgs) -> Result<()> {
    let config = args.config.load()?;
    let total = config.grid.len()?;
    let shown = args.limit.unwrap_or(total).min(total);

    let result = GridListing {
        total_combinations: total,
        combinations: (0..shown).filter_map(|i| config.grid.get(i)).collect(),
    };
    output_result("Parameter grid", &result, cli_args)
}
