//! # hexrecon-storage
//!
//! Per-observer label tables. Each table converges a stream of noisy votes
//! into one label per image with O(1) state per image, keeps a reverse
//! count index for sampling and progress queries, and persists as CSV with
//! timestamped backups.

pub mod session;
pub mod store;

pub use session::{LabelingSession, NextImage};
pub use store::{LabelStore, StoreOptions};
