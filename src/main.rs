// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use clap::Parser;
use pose_ensemble::cli::args::{Cli, Commands};
use pose_ensemble::cli::run::run_estimate;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Estimate(args) => run_estimate(&args),
    }
}
