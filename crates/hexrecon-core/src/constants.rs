//! Shared constants for the hexrecon tools.

/// hexrecon version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Required header of a persisted label table.
pub const TABLE_HEADER: [&str; 3] = ["Filename", "Label", "Count"];

/// Number of characters in every label.
pub const LABEL_LEN: usize = 4;

/// Default count at which a label is considered confirmed.
pub const DEFAULT_MIN_CONFIRMATIONS: u32 = 2;

/// Default required difference between the row-1 and row-0 anchor addresses.
pub const DEFAULT_ANCHOR_GAP: u16 = 0x10;

/// Default address step between neighbouring data columns.
pub const DEFAULT_WORD_STRIDE: u16 = 2;

/// Default stride assumed by the coverage-gap diagnostic.
pub const DEFAULT_COVERAGE_STRIDE: u16 = 0x10;

/// Default number of labeling actions between session autosaves.
pub const DEFAULT_AUTOSAVE_EVERY: u32 = 100;

/// Default log filter when `HEXRECON_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "hexrecon=info";

/// Number of rows in one captured frame.
pub const FRAME_ROWS: u8 = 2;

/// Number of data columns per row (column 0 is the anchor).
pub const DATA_COLUMNS: u8 = 8;

// ---- Assembled label file banners ----

/// Banner opening the source list.
pub const BANNER_SOURCES: &str = "======== Label databases:";

/// Banner opening the image list.
pub const BANNER_IMAGES: &str = "======== Images:";

/// Banner opening the per-address labels.
pub const BANNER_LABELS: &str = "======== Labels:";
