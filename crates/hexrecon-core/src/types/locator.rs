//! Locators: which observer asserted a label for which image.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// `(source index, image index)`. Source 0 is the ground-truth store;
/// image indices refer to the global, path-sorted image list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Locator {
    pub source: usize,
    pub image: usize,
}

impl Locator {
    pub fn new(source: usize, image: usize) -> Self {
        Self { source, image }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.source, self.image)
    }
}

impl FromStr for Locator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (source, image) = s
            .split_once(',')
            .ok_or_else(|| format!("locator {s:?} is not a <source>,<image> pair"))?;
        let source = source
            .trim()
            .parse()
            .map_err(|e| format!("locator {s:?}: bad source index: {e}"))?;
        let image = image
            .trim()
            .parse()
            .map_err(|e| format!("locator {s:?}: bad image index: {e}"))?;
        Ok(Self { source, image })
    }
}
