//! Domain types shared by every hexrecon crate.
//! Identities, labels, locators, addresses, and image coordinates.

pub mod address;
pub mod collections;
pub mod coordinate;
pub mod identity;
pub mod label;
pub mod locator;

pub use address::Address;
pub use collections::{FxHashMap, FxHashSet, LocatorList};
pub use coordinate::{FrameKey, ImageCoordinate};
pub use identity::ImageId;
pub use label::{Label, LabelRecord};
pub use locator::Locator;
