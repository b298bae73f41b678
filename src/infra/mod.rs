// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Cross-cutting concerns that touch the filesystem:
//
//   checkpoint.rs - Model weights (burn CompactRecorder) plus
//                   the JSON config and label layout needed to
//                   rebuild the model for inference.
//
//   metrics.rs    - Training history (loss/accuracy curves)
//                   mirrored to a CSV file.
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training history and CSV logger
pub mod metrics;
