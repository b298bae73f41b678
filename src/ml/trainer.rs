// ============================================================
// Layer 5 - Training Loop
// ============================================================
// Adam on full mini-batches, full-set evaluation, checkpoint at
// the end. Nothing in the checkpoint directory changes unless the
// whole run succeeds.
//
// Key points:
//   - Training runs on TrainBackend (Autodiff) for gradients
//   - model.valid() gives the same weights on InnerBackend, which
//     is what both evaluation loaders batch for
//   - Batches are taken in dataset order, no reshuffling; a
//     trailing batch shorter than batch_size is not stepped
//   - The L2 penalty is part of the loss, not optimizer weight decay
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};
use std::sync::Arc;

use crate::application::train_use_case::{EvalPolicy, TrainConfig};
use crate::data::{
    batcher::{WindowBatch, WindowBatcher},
    dataset::WindowDataset,
    encoder::LabelEncoder,
};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{HistoryPoint, MetricsLogger, TrainingHistory},
};
use crate::ml::{
    model::{count_correct, softmax_cross_entropy, ActivityLstm},
    Device, InnerBackend, TrainBackend,
};

/// Result of one training run
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    /// Test-split accuracy of the saved model
    pub final_accuracy: f64,
    /// Test-split loss (cross-entropy + L2) of the saved model
    pub final_loss: f64,
    /// Optimizer steps taken
    pub steps: usize,
    pub history: TrainingHistory,
}

/// Loss and accuracy over one whole split
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub loss:     f64,
    pub accuracy: f64,
}

type EvalLoader = Arc<dyn DataLoader<WindowBatch<InnerBackend>>>;

pub fn run_training(
    cfg:           &TrainConfig,
    encoder:       &LabelEncoder,
    train_dataset: WindowDataset,
    test_dataset:  WindowDataset,
    ckpt_manager:  &CheckpointManager,
) -> Result<TrainOutcome> {
    let device = Device::default();
    tracing::info!("Using device: {:?}", device);
    train_loop(cfg, encoder, train_dataset, test_dataset, ckpt_manager, device)
}

fn train_loop(
    cfg:           &TrainConfig,
    encoder:       &LabelEncoder,
    train_dataset: WindowDataset,
    test_dataset:  WindowDataset,
    ckpt_manager:  &CheckpointManager,
    device:        Device,
) -> Result<TrainOutcome> {

    // ── Build model ───────────────────────────────────────────────────────────
    <TrainBackend as Backend>::seed(cfg.seed);
    let model_cfg = cfg.model_config(encoder.num_classes());
    let mut model: ActivityLstm<TrainBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {} bidirectional layers, {} hidden units, {} parameters",
        model_cfg.n_layers,
        model_cfg.n_hidden,
        model.num_params()
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    let mut optim = AdamConfig::new().with_epsilon(1e-8).init();

    // ── Data loaders ──────────────────────────────────────────────────────────
    tracing::info!(
        "{} training windows, {} test windows",
        train_dataset.window_count(),
        test_dataset.window_count()
    );

    let train_loader = DataLoaderBuilder::new(WindowBatcher::<TrainBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .build(train_dataset.clone());

    let evaluator = Evaluator::new(cfg, train_dataset, test_dataset, &device);
    let metrics   = MetricsLogger::new(ckpt_manager.dir())?;
    let mut history = TrainingHistory::default();
    let mut steps   = 0usize;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        for batch in train_loader.iter() {
            if batch.len() < cfg.batch_size {
                continue;
            }

            let (loss, _) = model.forward_loss(batch.features, batch.targets, cfg.l2_weight);

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.learning_rate, model, grads);
            steps += 1;

            if cfg.eval_policy == EvalPolicy::EveryBatch {
                let point = evaluator.point(&model, epoch, steps);
                record(cfg, &metrics, &mut history, point)?;
            }
        }

        if cfg.eval_policy == EvalPolicy::EveryEpoch {
            let point = evaluator.point(&model, epoch, steps);
            record(cfg, &metrics, &mut history, point)?;
        }
    }

    // ── Persist and report ────────────────────────────────────────────────────
    metrics.finish()?;
    ckpt_manager.save_checkpoint(&model, cfg, encoder)?;

    let last = evaluator.test(&model.valid());
    tracing::info!(
        "Training complete after {} steps: test accuracy {:.4}, loss {:.4}",
        steps,
        last.accuracy,
        last.loss
    );
    if let Some(best) = history.best_test_acc() {
        tracing::info!(
            "Best test accuracy {:.4} at epoch {} (step {}) of {} evaluations",
            best.test_acc,
            best.epoch,
            best.step,
            history.len()
        );
    }

    Ok(TrainOutcome {
        final_accuracy: last.accuracy,
        final_loss:     last.loss,
        steps,
        history,
    })
}

/// Append a point to the history and the CSV; print it on logging epochs.
fn record(
    cfg:     &TrainConfig,
    metrics: &MetricsLogger,
    history: &mut TrainingHistory,
    point:   HistoryPoint,
) -> Result<()> {
    metrics.log(&point)?;
    if let Some(line) = progress_line(&point, cfg.log_every) {
        println!("{line}");
        tracing::debug!(
            "step {}: train accuracy {:.4}, train loss {:.4}",
            point.step,
            point.train_acc,
            point.train_loss
        );
    }
    history.push(point);
    Ok(())
}

/// The stdout line for `point`, or None when its epoch is not a
/// multiple of `log_every`.
fn progress_line(point: &HistoryPoint, log_every: usize) -> Option<String> {
    if log_every == 0 || point.epoch % log_every != 0 {
        return None;
    }
    Some(format!(
        "epoch: {} test accuracy: {} loss: {}",
        point.epoch, point.test_acc, point.test_loss
    ))
}

// ─── Full-set evaluation ──────────────────────────────────────────────────────
// Both splits are streamed in chunks of eval_batch_size on the
// inner backend, without autodiff overhead.
struct Evaluator {
    train:     EvalLoader,
    test:      EvalLoader,
    l2_weight: f64,
}

impl Evaluator {
    fn new(
        cfg:    &TrainConfig,
        train:  WindowDataset,
        test:   WindowDataset,
        device: &Device,
    ) -> Self {
        let batcher = WindowBatcher::<InnerBackend>::new(device.clone());
        let train = DataLoaderBuilder::new(batcher.clone())
            .batch_size(cfg.eval_batch_size)
            .build(train);
        let test = DataLoaderBuilder::new(batcher)
            .batch_size(cfg.eval_batch_size)
            .build(test);
        Self { train, test, l2_weight: cfg.l2_weight }
    }

    fn point(&self, model: &ActivityLstm<TrainBackend>, epoch: usize, step: usize) -> HistoryPoint {
        let model = model.valid();
        let train = evaluate(&model, self.train.as_ref(), self.l2_weight);
        let test  = evaluate(&model, self.test.as_ref(), self.l2_weight);
        HistoryPoint {
            epoch,
            step,
            train_loss: train.loss,
            train_acc:  train.accuracy,
            test_loss:  test.loss,
            test_acc:   test.accuracy,
        }
    }

    fn test(&self, model: &ActivityLstm<InnerBackend>) -> Evaluation {
        evaluate(model, self.test.as_ref(), self.l2_weight)
    }
}

/// Mean cross-entropy + L2 penalty, and accuracy, over every window
/// the loader yields. An empty split has accuracy 0 and a loss equal
/// to the penalty alone.
pub fn evaluate<B: Backend>(
    model:     &ActivityLstm<B>,
    loader:    &dyn DataLoader<WindowBatch<B>>,
    l2_weight: f64,
) -> Evaluation {
    let mut ce_sum  = 0.0f64;
    let mut correct = 0usize;
    let mut total   = 0usize;

    for batch in loader.iter() {
        let logits = model.forward(batch.features);
        total += batch.targets.dims()[0];

        ce_sum += softmax_cross_entropy(logits.clone(), batch.targets.clone())
            .sum()
            .into_scalar()
            .elem::<f64>();
        correct += count_correct(logits, batch.targets);
    }

    let penalty = model.l2_penalty(l2_weight).into_scalar().elem::<f64>();
    if total == 0 {
        return Evaluation { loss: penalty, accuracy: 0.0 };
    }

    Evaluation {
        loss:     ce_sum / total as f64 + penalty,
        accuracy: correct as f64 / total as f64,
    }
}
