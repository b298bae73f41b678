// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and hands the work to Layer 2 (application).
//
//   1. `train`   - windows the data, trains, writes a checkpoint
//   2. `restore` - loads a checkpoint and optionally scores it
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, RestoreArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "activity-lstm",
    version,
    about = "Train a bidirectional LSTM to recognise activities from accelerometer data."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case; this layer only routes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Restore(args) => run_restore(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on: {}", args.data_path);

    let outcome = TrainUseCase::new(args.into()).execute()?;
    tracing::info!(
        "{} optimizer steps, {} evaluations, final test loss {:.4}",
        outcome.steps,
        outcome.history.len(),
        outcome.final_loss
    );

    println!("Final accuracy: {}", outcome.final_accuracy);
    Ok(())
}

fn run_restore(args: RestoreArgs) -> Result<()> {
    use crate::application::restore_use_case::RestoreUseCase;

    let use_case = RestoreUseCase::new(args.checkpoint_dir)?;
    println!("{}", use_case.summary());

    if let Some(path) = args.data_path {
        let eval = use_case.evaluate(&path)?;
        println!(
            "Accuracy on {}: {} ({}/{} windows)",
            path, eval.accuracy, eval.correct, eval.windows
        );
    }
    Ok(())
}
