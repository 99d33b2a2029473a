// This file is part of minex-validation, a validation driver for MINEX III
// fingerprint template generators and matchers.
//
// You can redistribute minex-validation source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

use std::path::{Path, PathBuf};

/// Directory containing validation imagery.
pub const IMAGES_DIR: &str = "validation_imagery_raw";
/// Directory where created templates are written.
pub const OUTPUT_DIR: &str = "validation_output";

/// Settings shared by all validation modes.
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    images_dir: PathBuf,
    output_dir: PathBuf,
    strict: bool,
    max_impostor: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            images_dir: PathBuf::from(IMAGES_DIR),
            output_dir: PathBuf::from(OUTPUT_DIR),
            strict: false,
            max_impostor: 1000,
        }
    }
}

impl HarnessConfig {
    pub fn new() -> Self {
        HarnessConfig::default()
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn set_images_dir<P: Into<PathBuf>>(&mut self, images_dir: P) {
        self.images_dir = images_dir.into();
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn set_output_dir<P: Into<PathBuf>>(&mut self, output_dir: P) {
        self.output_dir = output_dir.into();
    }

    /// Whether a created template that violates the record layout aborts the run.
    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    pub fn max_impostor(&self) -> usize {
        self.max_impostor
    }

    pub fn set_max_impostor(&mut self, max_impostor: usize) {
        self.max_impostor = max_impostor;
    }

    pub fn image_path(&self, filename: &str) -> PathBuf {
        self.images_dir.join(filename)
    }

    pub fn template_path(&self, template_name: &str) -> PathBuf {
        self.output_dir.join(template_name)
    }
}
