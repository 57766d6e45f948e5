//! Position of a word image inside its captured frame.
//!
//! Word images are cropped from photographs of the on-screen memory dump.
//! Their paths end in `<row>_<col>` just before the extension, e.g.
//! `./words/0412_1_3.png` is row 1, column 3 of frame `./words/0412_`.
//! Column 0 holds the row's base address; columns 1..=8 hold data words.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{DATA_COLUMNS, FRAME_ROWS};

/// The row/column-independent part of an image path: everything before
/// `<row>_<col>`, plus the extension after it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameKey {
    pub stem: String,
    /// Extension including its leading dot, or empty.
    pub extension: String,
}

impl FrameKey {
    /// Path of the image at (`row`, `col`) in this frame.
    pub fn path_of(&self, row: u8, col: u8) -> String {
        format!("{}{}_{}{}", self.stem, row, col, self.extension)
    }

    /// Path of the anchor (column 0) image of `row`.
    pub fn anchor_path(&self, row: u8) -> String {
        self.path_of(row, 0)
    }
}

impl fmt::Display for FrameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*{}", self.stem, self.extension)
    }
}

/// A parsed image path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageCoordinate {
    pub frame: FrameKey,
    pub row: u8,
    pub col: u8,
}

impl ImageCoordinate {
    /// Parse `path`, returning `None` unless it ends in a valid
    /// `<row>_<col>` pair (row in 0..2, column in 0..=8) before its extension.
    pub fn parse(path: &str) -> Option<Self> {
        let file_start = path.rfind('/').map_or(0, |i| i + 1);
        let (body, extension) = match path[file_start..].rfind('.') {
            Some(dot) => path.split_at(file_start + dot),
            None => (path, ""),
        };

        let bytes = body.as_bytes();
        if bytes.len() < 3 || bytes[bytes.len() - 2] != b'_' {
            return None;
        }
        let row = digit(bytes[bytes.len() - 3])?;
        let col = digit(bytes[bytes.len() - 1])?;
        if row >= FRAME_ROWS || col > DATA_COLUMNS {
            return None;
        }

        Some(Self {
            frame: FrameKey {
                stem: body[..body.len() - 3].to_string(),
                extension: extension.to_string(),
            },
            row,
            col,
        })
    }

    pub fn is_anchor(&self) -> bool {
        self.col == 0
    }

    pub fn is_data(&self) -> bool {
        self.col != 0
    }
}

fn digit(b: u8) -> Option<u8> {
    b.is_ascii_digit().then(|| b - b'0')
}
