// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything from the raw CSV file to tensor batches.
//
//   WISDM raw .txt
//       │
//       ▼
//   CsvSampleLoader   → parses rows, drops malformed ones
//       │
//       ▼
//   Windower          → sliding windows + majority-vote labels
//       │
//       ▼
//   LabelEncoder      → one-hot targets
//       │
//       ▼
//   split_train_test  → seeded 70/30 partition
//       │
//       ▼
//   WindowDataset     → implements Burn's Dataset trait
//       │
//       ▼
//   WindowBatcher     → stacks windows into tensors
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads the headerless accelerometer CSV
pub mod loader;

/// Cuts the sample stream into labelled windows
pub mod windower;

/// One-hot label encoding
pub mod encoder;

/// Seeded train/test split
pub mod splitter;

/// Implements Burn's Dataset trait for encoded windows
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
