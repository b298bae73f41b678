// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Pure Rust structs, enums and traits describing the core
// concepts: activities, raw samples and windows.
//
// Rules for this layer:
//   - NO burn framework types
//   - NO file I/O
//   - Only plain data and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// The six activity labels
pub mod activity;

// One parsed accelerometer reading
pub mod sample;

// A labelled slice of the accelerometer stream
pub mod window;

// Core abstractions (traits) that other layers implement
pub mod traits;
