//! # hexrecon-assembly
//!
//! Turns many observers' converged label tables into memory contents.
//! The aggregator recovers addresses from anchor images and gathers every
//! confirmed label per address into an assembled label file; the resolver
//! collapses each address to one byte pair by plurality.

pub mod aggregator;
pub mod assembled;
pub mod compare;
pub mod resolver;

pub use aggregator::{AddressAggregator, Aggregation, CoverageReport};
pub use assembled::{AddressEntry, AssembledLabelFile, LabelLocators};
pub use compare::{diff_stores, find_disagreements, DiffOptions, LabelDifference};
pub use resolver::{ConsensusResolver, Resolution, ResolutionReport};
