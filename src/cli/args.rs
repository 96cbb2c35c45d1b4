// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use crate::model::DEFAULT_MODEL;
use clap::{Args, Parser, Subcommand};

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = r#"Estimate Options:
    --model, -m <MODEL>      Path to MoveNet ONNX model [default: movenet-singlepose-lightning.onnx]
    --source, -s <SOURCE>    Input image file
    --trials <TRIALS>        Number of repeated inference trials [default: 50]
    --exclude <NAMES>        Comma-separated keypoint names to drop from aggregation
    --input-size <SIZE>      Model input resolution (192 lightning, 256 thunder)
    --verbose                Show verbose output

Examples:
    pose-ensemble estimate --source person.jpg
    pose-ensemble estimate --model movenet-singlepose-thunder.onnx --input-size 256 --source person.jpg
    pose-ensemble estimate -s person.jpg --trials 100
    pose-ensemble estimate -s person.jpg --exclude left_knee,right_knee,left_ankle,right_ankle"#)]
pub struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    pub command: Commands,
}

/// Commands for the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run stabilized pose estimation on a single image
    Estimate(EstimateArgs),
}

/// Arguments for the estimate command.
#[derive(Args, Debug)]
pub struct EstimateArgs {
    /// Path to MoveNet ONNX model file
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Input image file
    #[arg(short, long)]
    pub source: String,

    /// Number of repeated inference trials
    #[arg(long, default_value_t = 50)]
    pub trials: usize,

    /// Keypoint names to drop from aggregation (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Model input resolution (square)
    #[arg(long)]
    pub input_size: Option<usize>,

    /// Show verbose output
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_estimate_args_defaults() {
        let args = Cli::parse_from(["app", "estimate", "--source", "person.jpg"]);
        match args.command {
            Commands::Estimate(estimate_args) => {
                assert_eq!(estimate_args.model, DEFAULT_MODEL);
                assert_eq!(estimate_args.source, "person.jpg");
                assert_eq!(estimate_args.trials, 50);
                assert!(estimate_args.exclude.is_empty());
                assert!(estimate_args.input_size.is_none());
                assert!(estimate_args.verbose);
            }
        }
    }

    #[test]
    fn test_estimate_args_custom() {
        let args = Cli::parse_from([
            "app",
            "estimate",
            "--model",
            "thunder.onnx",
            "--source",
            "test.jpg",
            "--trials",
            "20",
            "--exclude",
            "left_knee,right_knee",
            "--input-size",
            "256",
            "--verbose",
            "false",
        ]);
        match args.command {
            Commands::Estimate(estimate_args) => {
                assert_eq!(estimate_args.model, "thunder.onnx");
                assert_eq!(estimate_args.trials, 20);
                assert_eq!(
                    estimate_args.exclude,
                    vec!["left_knee".to_string(), "right_knee".to_string()]
                );
                assert_eq!(estimate_args.input_size, Some(256));
                assert!(!estimate_args.verbose);
            }
        }
    }
}
