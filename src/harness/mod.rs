// This file is part of minex-validation, a validation driver for MINEX III
// fingerprint template generators and matchers.
//
// You can redistribute minex-validation source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

//! The validation modes.
//!
//! Every mode writes a tab-separated header followed by one line per item to
//! the supplied writer. Return codes from the library under test are part of
//! the log, never a reason to stop; any I/O failure ends the run.

use std::fmt;
use std::io::Write;

use tracing::{debug, info, warn};

use crate::api::{LibraryIds, ReturnCode};
use crate::common::{create_output_dir, read_file, write_file, ImageData};
use crate::config::HarnessConfig;
use crate::error::{MinexError, Result};
use crate::random::{shuffle_with_seed, Mt64};
use crate::sample::{make_pairs, PairOptions, PairTable, SamplePair, SampleTable};
use crate::template::{declared_length, FingerMinutiaeRecord, CREATE_BUFFER_SIZE};
use crate::TemplateEngine;

pub const CREATION_HEADER: &str = "Input\tRV\tTemplateSize";
pub const MATCHING_HEADER: &str = "VerificationName\tEnrollmentName\tRV\tSimilarity";
pub const LIBRARY_ID_HEADER: &str = "GProduct\tGVersion\tMProduct\tMVersion";
pub const PAIRS_HEADER: &str = "# verification\tenrollment";

/// Outcome of creating one template.
#[derive(Debug, Clone, PartialEq)]
pub struct CreationResult {
    pub name: String,
    pub rv: ReturnCode,
    pub template_size: u16,
}

impl fmt::Display for CreationResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.name, self.rv, self.template_size)
    }
}

/// Outcome of comparing one pair of templates.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub verification: String,
    pub enrollment: String,
    pub rv: ReturnCode,
    pub similarity: f32,
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t{}\t{}\t", self.verification, self.enrollment, self.rv)?;
        // printf("%f") spelling; infinities already agree
        if self.similarity.is_nan() {
            let sign = if self.similarity.is_sign_negative() { "-" } else { "" };
            write!(f, "{}nan", sign)
        } else {
            write!(f, "{:.6}", self.similarity)
        }
    }
}

/// Counts of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub items: usize,
    /// Items for which the library returned something other than success.
    pub failures: usize,
}

impl RunSummary {
    fn record(&mut self, rv: ReturnCode) {
        self.items += 1;
        if !rv.is_success() {
            self.failures += 1;
        }
    }
}

pub struct Harness<E: TemplateEngine> {
    engine: E,
    config: HarnessConfig,
    samples: SampleTable,
    pairs: PairTable,
}

impl<E: TemplateEngine> Harness<E> {
    pub fn new(engine: E, config: HarnessConfig, samples: SampleTable, pairs: PairTable) -> Self {
        Harness {
            engine,
            config,
            samples,
            pairs,
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Create a template for the sample image `filename` and persist it as
    /// `<filename>.tmpl` in the output directory.
    pub fn create_template(&mut self, filename: &str) -> Result<CreationResult> {
        let metadata = self.samples.require(filename)?;
        if !metadata.is_supported_size() {
            warn!(
                "{} is {}x{}, outside the supported image size",
                filename, metadata.width, metadata.height
            );
        }

        let image = ImageData::load(
            &self.config.image_path(filename),
            metadata.width,
            metadata.height,
        )?;

        let mut buf = vec![0u8; CREATE_BUFFER_SIZE];
        let rv = self.engine.create_template(&image, metadata, &mut buf);

        let template_size = declared_length(&buf).unwrap_or(0);
        let template = buf
            .get(..template_size as usize)
            .ok_or_else(|| MinexError::InvalidTemplate {
                name: filename.to_string(),
                reason: format!(
                    "record length {} exceeds the {} byte output buffer",
                    template_size, CREATE_BUFFER_SIZE
                ),
            })?;

        match FingerMinutiaeRecord::parse(template) {
            Ok(record) => debug!(
                "{}: rv={} length={} minutiae={}",
                filename,
                rv,
                record.length,
                record.minutiae.len()
            ),
            Err(e) if self.config.strict() => {
                return Err(MinexError::InvalidTemplate {
                    name: filename.to_string(),
                    reason: e.to_string(),
                });
            }
            Err(e) => warn!("{}: invalid template (rv={}): {}", filename, rv, e),
        }

        let path = self.config.template_path(&format!("{}.tmpl", filename));
        write_file(&path, template)?;

        Ok(CreationResult {
            name: filename.to_string(),
            rv,
            template_size,
        })
    }

    /// Create templates for every sample, in an order shuffled with `seed`.
    pub fn test_creation<W: Write>(&mut self, out: &mut W, seed: u64) -> Result<RunSummary> {
        create_output_dir(self.config.output_dir())?;

        let mut images: Vec<String> = self.samples.names().map(String::from).collect();
        shuffle_with_seed(&mut images, seed);

        writeln!(out, "{}", CREATION_HEADER)?;
        let mut summary = RunSummary::default();
        for image in &images {
            let result = self.create_template(image)?;
            writeln!(out, "{}", result)?;
            out.flush()?;
            summary.record(result.rv);
        }

        info!(
            "created {} templates, {} with a non-zero return code",
            summary.items, summary.failures
        );
        Ok(summary)
    }

    /// Compare two templates previously written to the output directory.
    pub fn match_templates(&mut self, pair: &SamplePair) -> Result<MatchResult> {
        let verification = read_file(&self.config.template_path(&pair.verification))?;
        let enrollment = read_file(&self.config.template_path(&pair.enrollment))?;

        for (name, template) in [(&pair.verification, &verification), (&pair.enrollment, &enrollment)] {
            if let Err(e) = FingerMinutiaeRecord::parse(template) {
                debug!("{}: {}", name, e);
            }
        }

        let (rv, similarity) = self.engine.match_templates(&verification, &enrollment);
        debug!(
            "{} vs {}: rv={} similarity={}",
            pair.verification, pair.enrollment, rv, similarity
        );

        Ok(MatchResult {
            verification: pair.verification.clone(),
            enrollment: pair.enrollment.clone(),
            rv,
            similarity,
        })
    }

    /// Compare every pair in the pair table, in an order shuffled with `seed`.
    pub fn test_matching<W: Write>(&mut self, out: &mut W, seed: u64) -> Result<RunSummary> {
        writeln!(out, "{}", MATCHING_HEADER)?;

        let mut pairs = self.pairs.pairs().to_vec();
        shuffle_with_seed(&mut pairs, seed);

        let mut summary = RunSummary::default();
        for pair in &pairs {
            let result = self.match_templates(pair)?;
            writeln!(out, "{}", result)?;
            out.flush()?;
            summary.record(result.rv);
        }

        info!(
            "matched {} pairs, {} with a non-zero return code",
            summary.items, summary.failures
        );
        Ok(summary)
    }

    /// Print the generator and matcher PIDs reported by the library.
    pub fn test_library_id<W: Write>(&mut self, out: &mut W) -> Result<LibraryIds> {
        writeln!(out, "{}", LIBRARY_ID_HEADER)?;
        let ids = self.engine.pids();
        writeln!(out, "{}", ids)?;
        out.flush()?;
        Ok(ids)
    }

    /// Print a pair table derived from the sample names.
    pub fn generate_pairs<W: Write>(&self, out: &mut W, seed: u64) -> Result<PairTable> {
        let options = PairOptions {
            max_impostor: self.config.max_impostor(),
        };
        let generated = make_pairs(&self.samples, &options, &mut Mt64::new(seed));

        writeln!(out, "{}", PAIRS_HEADER)?;
        for pair in generated.table.pairs() {
            writeln!(out, "{}", pair)?;
        }
        writeln!(out, "# Num Impostor = {}", generated.impostors)?;
        out.flush()?;

        info!(
            "generated {} genuine and {} impostor pairs",
            generated.genuine, generated.impostors
        );
        Ok(generated.table)
    }
}
