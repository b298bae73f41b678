// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `restore`, and all
// their configurable flags. Defaults match TrainConfig::default().
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::{EvalPolicy, LabelOrder, TrainConfig};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the activity classifier on a raw accelerometer file
    Train(TrainArgs),

    /// Load a trained checkpoint, optionally scoring it on a data file
    Restore(RestoreArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Raw accelerometer file (user,activity,timestamp,x,y,z;)
    #[arg(long, default_value = "data/WISDM_ar_v1.1_raw.txt")]
    pub data_path: String,

    /// Directory for the weights, config, labels and history
    #[arg(long, default_value = "model")]
    pub checkpoint_dir: String,

    /// Samples per window (time steps fed to the LSTM)
    #[arg(long, default_value_t = 180)]
    pub window_size: usize,

    /// Samples between consecutive window starts
    #[arg(long, default_value_t = 100)]
    pub stride: usize,

    /// Hidden units per LSTM direction
    #[arg(long, default_value_t = 30)]
    pub hidden_units: usize,

    /// Number of stacked bidirectional layers
    #[arg(long = "layers", default_value_t = 2)]
    pub num_layers: usize,

    #[arg(long, default_value_t = 10)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 30)]
    pub epochs: usize,

    /// Adam step size
    #[arg(long, default_value_t = 0.0025)]
    pub learning_rate: f64,

    /// Weight of the L2 penalty added to the loss
    #[arg(long, default_value_t = 0.0015)]
    pub l2_weight: f64,

    /// Seed for the train/test shuffle and weight initialisation
    #[arg(long, default_value_t = 13)]
    pub seed: u64,

    /// Share of windows held out for testing
    #[arg(long, default_value_t = 0.3)]
    pub test_fraction: f64,

    /// Print test metrics on every n-th epoch
    #[arg(long, default_value_t = 5)]
    pub log_every: usize,

    /// Windows per forward pass during evaluation
    #[arg(long, default_value_t = 256)]
    pub eval_batch_size: usize,

    /// Evaluate both full splits after every mini-batch instead of every epoch (slow)
    #[arg(long)]
    pub dense_eval: bool,

    /// Order one-hot columns by the labels present in the data
    #[arg(long)]
    pub observed_labels: bool,
}

/// Boundary between Layer 1 and Layer 2:
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_path:       a.data_path,
            checkpoint_dir:  a.checkpoint_dir,
            window_size:     a.window_size,
            stride:          a.stride,
            hidden_units:    a.hidden_units,
            num_layers:      a.num_layers,
            batch_size:      a.batch_size,
            epochs:          a.epochs,
            learning_rate:   a.learning_rate,
            l2_weight:       a.l2_weight,
            seed:            a.seed,
            test_fraction:   a.test_fraction,
            log_every:       a.log_every,
            eval_batch_size: a.eval_batch_size,
            eval_policy:     if a.dense_eval { EvalPolicy::EveryBatch } else { EvalPolicy::EveryEpoch },
            label_order:     if a.observed_labels { LabelOrder::Observed } else { LabelOrder::Declared },
        }
    }
}

/// All arguments for the `restore` command
#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Directory written by `train`
    #[arg(long, default_value = "model")]
    pub checkpoint_dir: String,

    /// Raw accelerometer file to classify with the restored model
    #[arg(long)]
    pub data_path: Option<String>,
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn train_config(args: &[&str]) -> TrainConfig {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Train(a) => a.into(),
            other => panic!("expected train, got {other:?}"),
        }
    }

    #[test]
    fn test_train_defaults_match_config_defaults() {
        assert_eq!(train_config(&["activity-lstm", "train"]), TrainConfig::default());
    }

    #[test]
    fn test_train_flags() {
        let cfg = train_config(&[
            "activity-lstm", "train",
            "--layers", "3",
            "--window-size", "64",
            "--learning-rate", "0.01",
            "--dense-eval",
            "--observed-labels",
        ]);
        assert_eq!(cfg.num_layers, 3);
        assert_eq!(cfg.window_size, 64);
        assert_eq!(cfg.learning_rate, 0.01);
        assert_eq!(cfg.eval_policy, EvalPolicy::EveryBatch);
        assert_eq!(cfg.label_order, LabelOrder::Observed);
    }

    #[test]
    fn test_restore_args() {
        let cli = Cli::try_parse_from(["activity-lstm", "restore", "--data-path", "x.txt"]).unwrap();
        match cli.command {
            Commands::Restore(a) => {
                assert_eq!(a.checkpoint_dir, "model");
                assert_eq!(a.data_path.as_deref(), Some("x.txt"));
            }
            other => panic!("expected restore, got {other:?}"),
        }
    }
}
