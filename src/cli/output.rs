//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{LectioArgs, OutputFormat};
use crate::error::Result;
use crate::experiment::ExperimentReport;
use crate::ml::ParamSet;
use crate::ml::grid_search::format_params;

/// Result structure for document normalization.
#[derive(Debug, Serialize, Deserialize)]
pub struct NormalizedDocument {
    pub path: String,
    pub tokens: usize,
    pub text: String,
}

/// Result structure for grid listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct GridListing {
    pub total_combinations: usize,
    pub combinations: Vec<ParamSet>,
}

/// Plain-text rendering of a command result.
pub trait HumanOutput {
    fn render_human(&self) -> String;
}

impl HumanOutput for ExperimentReport {
    fn render_human(&self) -> String {
        let mut out = String::new();
        out.push_str("Experiment Report:\n");
        out.push_str("══════════════════\n");
        out.push_str(&format!(
            "Documents: {} ({} train / {} test)\n",
            self.n_documents, self.n_train, self.n_test
        ));
        out.push_str(&format!("Vocabulary size: {}\n", self.vocabulary_size));
        out.push_str(&format!("Baseline test AUC: {:.4}\n", self.baseline_score));
        out.push('\n');
        out.push_str(&format!(
            "Combinations: {} evaluated, {} failed\n",
            self.combinations_evaluated, self.combinations_failed
        ));
        out.push_str(&format!("Best CV AUC: {:.4}\n", self.best_cv_score));
        out.push_str(&format!("Best params: {}\n", format_params(&self.best_params)));
        out.push_str(&format!("Test AUC: {:.4}\n", self.test_score));
        out
    }
}

impl HumanOutput for NormalizedDocument {
    fn render_human(&self) -> String {
        format!("{}\n", self.text)
    }
}

impl HumanOutput for GridListing {
    fn render_human(&self) -> String {
        let mut out = format!("Grid combinations: {}\n", self.total_combinations);
        out.push_str("─────────────────\n");
        for (i, params) in self.combinations.iter().enumerate() {
            out.push_str(&format!("{:>5}  {}\n", i, format_params(params)));
        }
        if self.combinations.len() < self.total_combinations {
            out.push_str(&format!(
                "  ... {} more\n",
                self.total_combinations - self.combinations.len()
            ));
        }
        out
    }
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &LectioArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: HumanOutput>(message: &str, result: &T, args: &LectioArgs) -> Result<()> {
    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }
    print!("{}", result.render_human());
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &LectioArgs) -> Result<()> {
    println!("{}", render_json(result, args.pretty)?);
    Ok(())
}

fn render_json<T: Serialize>(result: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::ParamValue;

    fn report() -> ExperimentReport {
        ExperimentReport {
            n_documents: 80,
            n_train: 60,
            n_test: 20,
            vocabulary_size: 1234,
            baseline_score: 0.71,
            best_cv_score: 0.8,
            best_params: ParamSet::from([
                ("classifier__alpha".to_string(), ParamValue::Float(0.0001)),
                ("tfidf__min_df".to_string(), ParamValue::Float(0.05)),
            ]),
            test_score: 0.75,
            combinations_evaluated: 640,
            combinations_failed: 12,
        }
    }

    #[test]
    fn test_report_human() {
        let text = report().render_human();
        assert!(text.contains("Documents: 80 (60 train / 20 test)"));
        assert!(text.contains("Baseline test AUC: 0.7100"));
        assert!(text.contains("Combinations: 640 evaluated, 12 failed"));
        assert!(text.contains("Best params: {classifier__alpha=0.0001, tfidf__min_df=0.05}"));
        assert!(text.contains("Test AUC: 0.7500"));
    }

    #[test]
    fn test_report_json() {
        let json = render_json(&report(), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["n_train"], 60);
        assert_eq!(value["best_params"]["classifier__alpha"], 0.0001);

        let pretty = render_json(&report(), true).unwrap();
        assert!(pretty.contains('\n'));
    }

    #[test]
    fn test_grid_listing_truncated() {
        let listing = GridListing {
            total_combinations: 3,
            combinations: vec![ParamSet::from([(
                "classifier__alpha".to_string(),
                ParamValue::Float(0.001),
            )])],
        };
        let text = listing.render_human();
        assert!(text.contains("Grid combinations: 3"));
        assert!(text.contains("    0  {classifier__alpha=0.001}"));
        assert!(text.contains("... 2 more"));
    }
}
