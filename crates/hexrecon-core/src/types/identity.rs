//! Image identities.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque key of a trackable image: its path, compared byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether the path contains at least one of `substrings`.
    pub fn matches_any<S: AsRef<str>>(&self, substrings: &[S]) -> bool {
        substrings.iter().any(|s| self.0.contains(s.as_ref()))
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ImageId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ImageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for ImageId {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl From<&str> for ImageId {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}
