//! Trait seams between the store and its consumers.

pub mod label_source;

pub use label_source::LabelSource;
