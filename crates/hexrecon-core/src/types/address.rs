//! 16-bit memory addresses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A memory address, displayed as four uppercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub u16);

impl Address {
    pub fn value(self) -> u16 {
        self.0
    }

    /// `self + delta`, or `None` past 0xFFFF.
    pub fn offset(self, delta: u16) -> Option<Address> {
        self.0.checked_add(delta).map(Address)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

impl FromStr for Address {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u16::from_str_radix(s.trim(), 16).map(Address)
    }
}

impl From<u16> for Address {
    fn from(value: u16) -> Self {
        Self(value)
    }
}
