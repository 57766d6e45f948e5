//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;

use super::Locator;

/// SmallVec optimized for the locators backing one label at one address
/// (usually one per observer store).
pub type LocatorList = SmallVec<[Locator; 4]>;
