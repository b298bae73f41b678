// ============================================================
// Layer 5 - ML / Model Layer (Burn)
// ============================================================
// All burn-specific modelling code lives here.
//
//   model.rs     - Stacked bidirectional LSTM classifier
//                  with a linear head and an L2 penalty
//
//   trainer.rs   - Training loop: Adam updates on full
//                  mini-batches, full-set evaluation, history,
//                  checkpoint at the end
//
//   restorer.rs  - Rebuilds the model from a checkpoint and
//                  classifies windows
//
// Backends:
//   InnerBackend is NdArray (CPU) by default and Wgpu with the
//   `wgpu` feature. TrainBackend wraps it in Autodiff.
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

use burn::backend::Autodiff;

/// Stacked bidirectional LSTM classifier
pub mod model;

/// Training loop with full-set evaluation and checkpointing
pub mod trainer;

/// Loads a checkpoint and classifies windows
pub mod restorer;

#[cfg(feature = "wgpu")]
pub type InnerBackend = burn::backend::Wgpu;
#[cfg(not(feature = "wgpu"))]
pub type InnerBackend = burn::backend::NdArray;

pub type TrainBackend = Autodiff<InnerBackend>;

pub type Device = <InnerBackend as burn::tensor::backend::Backend>::Device;
