//! Engine module - Keeps the anchor index consistent with the workspace
//!
//! Provides:
//! - rebuild: One full enumerate/scan/index pass
//! - debounce: Coalescing timer for rebuild triggers
//! - duplicates: Duplicate detection and recurring warnings
//! - store: Atomically published index snapshots
//! - coordinator: The async task tying them together

pub mod coordinator;
pub mod debounce;
pub mod duplicates;
pub mod rebuild;
pub mod store;
