// This file is part of minex-validation, a validation driver for MINEX III
// fingerprint template generators and matchers.
//
// You can redistribute minex-validation source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

mod pairs;

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use lazy_static::lazy_static;

use crate::api::{is_supported_image_size, FingerPosition, ImpressionType, Quality};
use crate::common::read_file;
use crate::error::{MinexError, Result};

pub use self::pairs::{make_pairs, GeneratedPairs, PairOptions, TemplateName};

const DEFAULT_SAMPLE_DATA: &str = include_str!("../../data/sample_data.tsv");
const DEFAULT_SAMPLE_PAIRS: &str = include_str!("../../data/sample_pairs.tsv");

lazy_static! {
    static ref SAMPLE_DATA: Result<SampleTable> =
        SampleTable::parse("sample_data.tsv", DEFAULT_SAMPLE_DATA);
    static ref SAMPLE_PAIRS: Result<PairTable> =
        PairTable::parse("sample_pairs.tsv", DEFAULT_SAMPLE_PAIRS);
}

/// Capture metadata of one validation image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleMetadata {
    pub filename: String,
    pub width: u16,
    pub height: u16,
    pub quality: u8,
    pub position: u8,
    pub impression: u8,
}

impl SampleMetadata {
    pub fn is_supported_size(&self) -> bool {
        is_supported_image_size(self.width, self.height)
    }

    pub fn quality(&self) -> Option<Quality> {
        Quality::from(self.quality)
    }

    pub fn finger_position(&self) -> Option<FingerPosition> {
        FingerPosition::from(self.position)
    }

    pub fn impression_type(&self) -> Option<ImpressionType> {
        ImpressionType::from(self.impression)
    }
}

impl fmt::Display for SampleMetadata {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.filename, self.width, self.height, self.quality, self.position, self.impression
        )
    }
}

/// Validation images keyed by file name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleTable {
    samples: BTreeMap<String, SampleMetadata>,
}

impl SampleTable {
    /// The table compiled into the driver.
    pub fn builtin() -> Result<&'static SampleTable> {
        SAMPLE_DATA.as_ref().map_err(clone_table_error)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = read_text(path)?;
        Self::parse(&path.display().to_string(), &text)
    }

    /// Parse rows of `filename width height quality position impression`.
    pub fn parse(source_name: &str, text: &str) -> Result<Self> {
        let mut table = SampleTable::default();

        for (line, fields) in rows(text) {
            let err = |reason: String| MinexError::Table {
                source_name: source_name.to_string(),
                line,
                reason,
            };

            if fields.len() != 6 {
                return Err(err(format!("expected 6 fields, found {}", fields.len())));
            }

            let metadata = SampleMetadata {
                filename: fields[0].to_string(),
                width: parse_field(fields[1], "width").map_err(err)?,
                height: parse_field(fields[2], "height").map_err(err)?,
                quality: parse_field(fields[3], "quality").map_err(err)?,
                position: parse_field(fields[4], "position").map_err(err)?,
                impression: parse_field(fields[5], "impression").map_err(err)?,
            };

            match table.samples.entry(metadata.filename.clone()) {
                btree_map::Entry::Occupied(_) => {
                    return Err(err(format!("duplicate sample {}", metadata.filename)));
                }
                btree_map::Entry::Vacant(entry) => {
                    entry.insert(metadata);
                }
            }
        }

        Ok(table)
    }

    pub fn get(&self, filename: &str) -> Option<&SampleMetadata> {
        self.samples.get(filename)
    }

    /// Look up `filename`, failing the run if it is unknown.
    pub fn require(&self, filename: &str) -> Result<&SampleMetadata> {
        self.get(filename)
            .ok_or_else(|| MinexError::MissingMetadata(filename.to_string()))
    }

    /// File names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.samples.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SampleMetadata> {
        self.samples.values()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl FromIterator<SampleMetadata> for SampleTable {
    fn from_iter<I: IntoIterator<Item = SampleMetadata>>(iter: I) -> Self {
        SampleTable {
            samples: iter
                .into_iter()
                .map(|metadata| (metadata.filename.clone(), metadata))
                .collect(),
        }
    }
}

/// A verification template compared against an enrollment template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SamplePair {
    pub verification: String,
    pub enrollment: String,
}

impl SamplePair {
    pub fn new<V: Into<String>, E: Into<String>>(verification: V, enrollment: E) -> Self {
        SamplePair {
            verification: verification.into(),
            enrollment: enrollment.into(),
        }
    }
}

impl fmt::Display for SamplePair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t{}", self.verification, self.enrollment)
    }
}

/// Template pairs in table order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairTable {
    pairs: Vec<SamplePair>,
}

impl PairTable {
    pub fn new(pairs: Vec<SamplePair>) -> Self {
        PairTable { pairs }
    }

    /// The table compiled into the driver.
    pub fn builtin() -> Result<&'static PairTable> {
        SAMPLE_PAIRS.as_ref().map_err(clone_table_error)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = read_text(path)?;
        Self::parse(&path.display().to_string(), &text)
    }

    /// Parse rows of `verification enrollment`.
    pub fn parse(source_name: &str, text: &str) -> Result<Self> {
        let mut pairs = vec![];
        for (line, fields) in rows(text) {
            if fields.len() != 2 {
                return Err(MinexError::Table {
                    source_name: source_name.to_string(),
                    line,
                    reason: format!("expected 2 fields, found {}", fields.len()),
                });
            }
            pairs.push(SamplePair::new(fields[0], fields[1]));
        }
        Ok(PairTable { pairs })
    }

    pub fn pairs(&self) -> &[SamplePair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

// Yields (1-based line number, fields) for every row that is not blank or a comment.
fn rows(text: &str) -> impl Iterator<Item = (usize, Vec<&str>)> {
    text.lines().enumerate().filter_map(|(index, line)| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            None
        } else {
            Some((index + 1, line.split_whitespace().collect()))
        }
    })
}

fn parse_field<T: FromStr>(value: &str, name: &str) -> std::result::Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("invalid {} \"{}\"", name, value))
}

fn read_text(path: &Path) -> Result<String> {
    let bytes = read_file(path)?;
    String::from_utf8(bytes).map_err(|e| MinexError::Table {
        source_name: path.display().to_string(),
        line: 0,
        reason: format!("not UTF-8 ({})", e),
    })
}

// Built-in tables are parsed once; a parse failure is replayed on every access.
fn clone_table_error(err: &MinexError) -> MinexError {
    match err {
        MinexError::Table {
            source_name,
            line,
            reason,
        } => MinexError::Table {
            source_name: source_name.clone(),
            line: *line,
            reason: reason.clone(),
        },
        other => MinexError::Table {
            source_name: "built-in table".to_string(),
            line: 0,
            reason: other.to_string(),
        },
    }
}
