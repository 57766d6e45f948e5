//! Labels and the converging (label, count) record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::LABEL_LEN;
use crate::errors::LabelError;

/// A four-character image label: a hex word such as `12AB`, or one of the
/// sentinels [`Label::AMBIGUOUS`] and [`Label::RESET`].
///
/// Stored inline as ASCII so records stay `Copy`. Ordering matches the
/// lexicographic ordering of the label text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label([u8; LABEL_LEN]);

impl Label {
    /// The label an identity falls back to when its count reaches zero.
    pub const RESET: Label = Label(*b"0000");

    /// Marks an unreadable image.
    pub const AMBIGUOUS: Label = Label(*b"XXXX");

    /// Parse a label, accepting exactly four ASCII alphanumeric characters.
    pub fn parse(text: &str) -> Result<Self, LabelError> {
        let len = text.chars().count();
        if len != LABEL_LEN {
            return Err(LabelError::WrongLength {
                label: text.to_string(),
                len,
            });
        }
        if let Some(ch) = text.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(LabelError::InvalidCharacter {
                label: text.to_string(),
                ch,
            });
        }
        let mut bytes = [0u8; LABEL_LEN];
        bytes.copy_from_slice(text.as_bytes());
        Ok(Self(bytes))
    }

    /// The label for a 16-bit word, as four uppercase hex digits.
    pub fn from_word(word: u16) -> Self {
        let mut bytes = [0u8; LABEL_LEN];
        bytes.copy_from_slice(format!("{word:04X}").as_bytes());
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; LABEL_LEN] {
        &self.0
    }

    pub fn is_ambiguous(&self) -> bool {
        *self == Self::AMBIGUOUS
    }

    /// The label read as a base-16 word, if every character is a hex digit.
    pub fn word(&self) -> Option<u16> {
        if !self.0.iter().all(u8::is_ascii_hexdigit) {
            return None;
        }
        self.0.iter().try_fold(0u16, |acc, &b| {
            let digit = (b as char).to_digit(16)?;
            Some((acc << 4) | digit as u16)
        })
    }

    /// The two bytes this label encodes, high byte first.
    pub fn to_be_bytes(&self) -> Option<[u8; 2]> {
        self.word().map(u16::to_be_bytes)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            fmt::Write::write_char(f, b as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label({self})")
    }
}

impl FromStr for Label {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// The stored state of one identity: its current label and how many
/// votes are currently credited to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelRecord {
    pub label: Label,
    pub count: u32,
}

impl LabelRecord {
    pub fn new(label: Label, count: u32) -> Self {
        Self { label, count }
    }

    /// A fresh, never-voted record.
    pub fn unlabeled() -> Self {
        Self::new(Label::RESET, 0)
    }

    /// Whether the label has been confirmed at least `min_confirmations` times.
    pub fn is_confirmed(&self, min_confirmations: u32) -> bool {
        self.count >= min_confirmations
    }

    /// The record after one vote for `proposed`.
    ///
    /// Agreement (or an empty record) credits the vote to `proposed`;
    /// disagreement takes one vote away and falls back to [`Label::RESET`]
    /// once no votes remain.
    pub fn voted(self, proposed: Label) -> Self {
        if self.count == 0 || proposed == self.label {
            Self::new(proposed, self.count.saturating_add(1))
        } else if self.count == 1 {
            Self::new(Label::RESET, 0)
        } else {
            Self::new(self.label, self.count - 1)
        }
    }
}

impl Default for LabelRecord {
    fn default() -> Self {
        Self::unlabeled()
    }
}
