// This file is part of minex-validation, a validation driver for MINEX III
// fingerprint template generators and matchers.
//
// You can redistribute minex-validation source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, ValueEnum};

use crate::config::{HarnessConfig, IMAGES_DIR, OUTPUT_DIR};
use crate::error::Result;
use crate::sample::{PairTable, SampleTable};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Create a template for every validation image
    Create,
    /// Compare the template pairs
    Match,
    /// Print the library's product identifiers
    Pid,
    /// Print a pair table derived from the sample names
    Pairs,
}

#[derive(Parser, Debug)]
#[command(
    name = "minex-validation",
    version,
    about = "Validation driver for MINEX III template generators and matchers",
    override_usage = "minex-validation {create|match|pid|pairs} [random seed] [OPTIONS]",
    allow_negative_numbers = true
)]
pub struct Options {
    #[arg(value_enum)]
    pub mode: Mode,

    /// Seed for the order in which images and pairs are processed
    #[arg(value_parser = parse_seed)]
    pub seed: Option<u64>,

    /// Directory of validation images
    #[arg(long, value_name = "DIR", default_value = IMAGES_DIR)]
    pub images: PathBuf,

    /// Directory that receives created templates
    #[arg(long, value_name = "DIR", default_value = OUTPUT_DIR)]
    pub output: PathBuf,

    /// Sample metadata table to use instead of the built-in one
    #[arg(long, value_name = "TSV")]
    pub samples: Option<PathBuf>,

    /// Pair table to use instead of the built-in one
    #[arg(long, value_name = "TSV")]
    pub pairs: Option<PathBuf>,

    /// Abort when a created template violates the record layout
    #[arg(long)]
    pub strict: bool,

    /// Impostor draws made when generating pairs
    #[arg(long, value_name = "N", default_value_t = 1000)]
    pub max_impostors: usize,
}

impl Options {
    pub fn config(&self) -> HarnessConfig {
        let mut config = HarnessConfig::new();
        config.set_images_dir(&self.images);
        config.set_output_dir(&self.output);
        config.set_strict(self.strict);
        config.set_max_impostor(self.max_impostors);
        config
    }

    pub fn sample_table(&self) -> Result<SampleTable> {
        match self.samples {
            Some(ref path) => SampleTable::load(path),
            None => SampleTable::builtin().cloned(),
        }
    }

    pub fn pair_table(&self) -> Result<PairTable> {
        match self.pairs {
            Some(ref path) => PairTable::load(path),
            None => PairTable::builtin().cloned(),
        }
    }
}

/// Parse a seed the way `std::stoll` does: leading whitespace, an optional
/// sign, then the longest run of decimal digits, ignoring whatever follows.
/// Values outside `i64` are rejected; negative values wrap into `u64`.
fn parse_seed(value: &str) -> std::result::Result<u64, String> {
    let err = || format!("an error occurred when converting \"{}\" to an integer", value);

    let trimmed = value.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b');
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => ("-", &trimmed[1..]),
        Some(b'+') => ("", &trimmed[1..]),
        _ => ("", trimmed),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Err(err());
    }

    format!("{}{}", sign, &rest[..digits])
        .parse::<i64>()
        .map(|seed| seed as u64)
        .map_err(|_| err())
}

/// A seed for runs that did not ask for one.
pub fn random_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    RandomState::new().hash_one((nanos, std::process::id()))
}
