//! The assembled label file: sources, globally numbered images, and every
//! label asserted for every recovered address.
//!
//! ```text
//! ======== Label databases:
//! 0: truth.csv
//! 1: run1.csv
//! ======== Images:
//! 0: ./images/set1/0000_0_1.png
//! 1: ./images/set1/0000_0_2.png
//! ======== Labels:
//! 1000: 12A8@1,0 12AB@0,0/0,16
//! 1002:
//! ```

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use hexrecon_core::constants::{BANNER_IMAGES, BANNER_LABELS, BANNER_SOURCES};
use hexrecon_core::types::LocatorList;
use hexrecon_core::{Address, AssemblyError, ImageId, Label, Locator};

/// One label at one address, with every locator asserting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelLocators {
    pub label: Label,
    pub locators: LocatorList,
}

/// Every label asserted for one address, in presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressEntry {
    pub address: Address,
    pub labels: Vec<LabelLocators>,
}

impl AddressEntry {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            labels: Vec::new(),
        }
    }

    /// Whether more than one distinct label was asserted.
    pub fn is_contested(&self) -> bool {
        self.labels.len() > 1
    }

    /// Total number of locators across all labels.
    pub fn assertions(&self) -> usize {
        self.labels.iter().map(|l| l.locators.len()).sum()
    }

    /// Fold `other`'s labels into this entry. Locators of a label already
    /// present are appended; new labels go after the existing ones.
    pub fn merge(&mut self, other: AddressEntry) {
        for incoming in other.labels {
            match self.labels.iter_mut().find(|l| l.label == incoming.label) {
                Some(existing) => existing.locators.extend(incoming.locators),
                None => self.labels.push(incoming),
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledLabelFile {
    /// Label table paths; index 0 is the ground truth.
    pub sources: Vec<String>,
    /// Image paths in global index order.
    pub images: Vec<ImageId>,
    /// Address entries in presentation order.
    pub entries: Vec<AddressEntry>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Sources,
    Images,
    Labels,
}

impl AssembledLabelFile {
    /// Write the three-section text form.
    pub fn write_to<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        writeln!(out, "{BANNER_SOURCES}")?;
        for (i, source) in self.sources.iter().enumerate() {
            writeln!(out, "{i}: {source}")?;
        }
        writeln!(out, "{BANNER_IMAGES}")?;
        for (i, image) in self.images.iter().enumerate() {
            writeln!(out, "{i}: {image}")?;
        }
        writeln!(out, "{BANNER_LABELS}")?;
        for entry in &self.entries {
            writeln!(out, "{}", format_entry(entry))?;
        }
        out.flush()
    }

    pub fn to_text(&self) -> String {
        let mut buf = Vec::new();
        // Writing to a Vec cannot fail.
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    pub fn read(path: &Path) -> Result<Self, AssemblyError> {
        let text = std::fs::read_to_string(path).map_err(|e| AssemblyError::io(path, e))?;
        Self::parse(&text)
    }

    /// Parse the text form. Blank lines are ignored; a label line without
    /// labels (`1002:`) is an entry with no labels.
    pub fn parse(text: &str) -> Result<Self, AssemblyError> {
        let mut file = Self::default();
        let mut section = Section::Preamble;
        let mut seen_labels = false;

        for (n, raw) in text.lines().enumerate() {
            let line_no = n + 1;
            let line = raw.trim_end();
            if line.trim().is_empty() {
                continue;
            }

            let next = match line {
                BANNER_SOURCES => Some((Section::Preamble, Section::Sources)),
                BANNER_IMAGES => Some((Section::Sources, Section::Images)),
                BANNER_LABELS => Some((Section::Images, Section::Labels)),
                _ => None,
            };
            if let Some((expected, entered)) = next {
                if section != expected {
                    return Err(malformed(line_no, format!("unexpected section header {line:?}")));
                }
                section = entered;
                seen_labels |= entered == Section::Labels;
                continue;
            }

            match section {
                Section::Preamble => {
                    return Err(malformed(line_no, "text before the first section header"));
                }
                Section::Sources => {
                    let path = indexed_line(line, file.sources.len(), line_no)?;
                    file.sources.push(path.to_string());
                }
                Section::Images => {
                    let path = indexed_line(line, file.images.len(), line_no)?;
                    file.images.push(ImageId::new(path));
                }
                Section::Labels => {
                    let entry = parse_entry(line, line_no)?;
                    for locator in entry.labels.iter().flat_map(|l| &l.locators) {
                        if locator.source >= file.sources.len() || locator.image >= file.images.len() {
                            return Err(malformed(
                                line_no,
                                format!("locator {locator} refers to an unlisted source or image"),
                            ));
                        }
                    }
                    file.entries.push(entry);
                }
            }
        }

        if !seen_labels {
            let section = match section {
                Section::Preamble => "Label databases",
                Section::Sources => "Images",
                Section::Images | Section::Labels => "Labels",
            };
            return Err(AssemblyError::MissingSection { section });
        }
        Ok(file)
    }
}

fn format_entry(entry: &AddressEntry) -> String {
    let mut line = format!("{}:", entry.address);
    for label in &entry.labels {
        let _ = write!(line, " {}@", label.label);
        for (i, locator) in label.locators.iter().enumerate() {
            if i > 0 {
                line.push('/');
            }
            let _ = write!(line, "{locator}");
        }
    }
    line
}

/// `<index>: <text>`, where `index` must be the next position.
fn indexed_line(line: &str, expected: usize, line_no: usize) -> Result<&str, AssemblyError> {
    let (index, rest) = line
        .split_once(':')
        .ok_or_else(|| malformed(line_no, "expected \"<index>: <path>\""))?;
    let index: usize = index
        .trim()
        .parse()
        .map_err(|e| malformed(line_no, format!("bad index {index:?}: {e}")))?;
    if index != expected {
        return Err(malformed(
            line_no,
            format!("index {index} out of sequence, expected {expected}"),
        ));
    }
    Ok(rest.strip_prefix(' ').unwrap_or(rest))
}

fn parse_entry(line: &str, line_no: usize) -> Result<AddressEntry, AssemblyError> {
    let (address, rest) = line
        .split_once(':')
        .ok_or_else(|| malformed(line_no, "expected \"<address>: <labels>\""))?;
    let address: Address = address
        .parse()
        .map_err(|e| malformed(line_no, format!("bad address {address:?}: {e}")))?;

    let mut entry = AddressEntry::new(address);
    for token in rest.split_whitespace() {
        let (label, locators) = token
            .split_once('@')
            .ok_or_else(|| malformed(line_no, format!("expected <label>@<locators>, got {token:?}")))?;
        let label = Label::parse(label).map_err(|e| malformed(line_no, e.to_string()))?;
        let locators = locators
            .split('/')
            .map(|l| l.parse::<Locator>())
            .collect::<Result<LocatorList, String>>()
            .map_err(|e| malformed(line_no, e))?;
        entry.labels.push(LabelLocators { label, locators });
    }
    Ok(entry)
}

fn malformed(line: usize, message: impl Into<String>) -> AssemblyError {
    AssemblyError::MalformedLine {
        line,
        message: message.into(),
    }
}
