// This file is part of minex-validation, a validation driver for MINEX III
// fingerprint template generators and matchers.
//
// You can redistribute minex-validation source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a validation run.
///
/// Return codes reported by the library under test are never represented here;
/// they are recorded in the result log instead.
#[derive(Error, Debug)]
pub enum MinexError {
    /// No entry in the sample table for an image that was asked for.
    #[error("Could not find metadata for {0}")]
    MissingMetadata(String),

    /// A file could not be opened.
    #[error("Could not open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file was opened but could not be read in full.
    #[error("Could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file could not be written.
    #[error("Could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output directory could not be created and did not already exist.
    #[error("Could not create directory {path} ({source})")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing a result line to the output stream failed.
    #[error("Could not write results: {0}")]
    Output(#[from] io::Error),

    /// A PGM or PNG sample could not be decoded.
    #[error("Could not decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A sample's pixel data does not agree with its metadata.
    #[error("Image {path} is {actual}, expected {expected}")]
    ImageSize {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// A sample or pair table row could not be parsed.
    #[error("{source_name}:{line}: {reason}")]
    Table {
        source_name: String,
        line: usize,
        reason: String,
    },

    /// A created template violates the record layout.
    #[error("Invalid template created for {name}: {reason}")]
    InvalidTemplate { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, MinexError>;
