// This file is part of minex-validation, a validation driver for MINEX III
// fingerprint template generators and matchers.
//
// MINEX III evaluates fingerprint minutiae template generators and matchers
// that conform to INCITS 378. Participants ship a library exposing three C
// functions; this crate exercises them with the validation imagery and
// records every return code and similarity score for offline grading.
//
// You can redistribute minex-validation source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

pub mod api;
pub mod cli;
mod common;
pub mod config;
pub mod error;
pub mod harness;
pub mod random;
pub mod sample;
pub mod template;

pub use api::{LibraryIds, ProductId, ReturnCode};
pub use common::{create_output_dir, read_file, write_file, ImageData};
pub use config::HarnessConfig;
pub use error::MinexError;
pub use harness::{CreationResult, Harness, MatchResult, RunSummary};
pub use sample::{PairTable, SampleMetadata, SamplePair, SampleTable};

#[cfg(feature = "ffi")]
pub use api::MinexLibrary;

/// A template generator and matcher under test.
///
/// # Examples
///
/// ```rust,ignore
/// use minex_validation::{Harness, HarnessConfig, MinexLibrary, PairTable, SampleTable};
///
/// let samples = SampleTable::builtin()?.clone();
/// let pairs = PairTable::builtin()?.clone();
/// let mut harness = Harness::new(MinexLibrary::new(), HarnessConfig::new(), samples, pairs);
///
/// let stdout = std::io::stdout();
/// harness.test_creation(&mut stdout.lock(), 42)?;
/// ```
pub trait TemplateEngine {
    /// Create a template from `image`, captured as described by `metadata`.
    ///
    /// (1) `output` is zero-filled and at least `MINEX_MAX_TEMPLATE_SIZE` bytes long.
    /// (2) Even when the returned code is not `Success`, the implementation is
    ///     expected to leave a valid template with a single finger view and
    ///     zero minutiae in `output`.
    ///
    /// # Panics
    ///
    /// Implementations may panic if `output` is shorter than
    /// `MINEX_MAX_TEMPLATE_SIZE` or `image` holds fewer than
    /// `width * height` pixels.
    fn create_template(
        &mut self,
        image: &ImageData,
        metadata: &SampleMetadata,
        output: &mut [u8],
    ) -> ReturnCode;

    /// Compare a verification template against an enrollment template.
    ///
    /// Returns the status and a similarity score; larger scores mean the
    /// templates are more likely to come from the same finger. Either template
    /// may have been produced by a different implementation.
    fn match_templates(&mut self, verification: &[u8], enrollment: &[u8]) -> (ReturnCode, f32);

    /// Product identifiers of the template generator and matcher.
    fn pids(&mut self) -> LibraryIds;
}

impl<'a, E: TemplateEngine + ?Sized> TemplateEngine for &'a mut E {
    fn create_template(
        &mut self,
        image: &ImageData,
        metadata: &SampleMetadata,
        output: &mut [u8],
    ) -> ReturnCode {
        (**self).create_template(image, metadata, output)
    }

    fn match_templates(&mut self, verification: &[u8], enrollment: &[u8]) -> (ReturnCode, f32) {
        (**self).match_templates(verification, enrollment)
    }

    fn pids(&mut self) -> LibraryIds {
        (**self).pids()
    }
}

impl<E: TemplateEngine + ?Sized> TemplateEngine for Box<E> {
    fn create_template(
        &mut self,
        image: &ImageData,
        metadata: &SampleMetadata,
        output: &mut [u8],
    ) -> ReturnCode {
        (**self).create_template(image, metadata, output)
    }

    fn match_templates(&mut self, verification: &[u8], enrollment: &[u8]) -> (ReturnCode, f32) {
        (**self).match_templates(verification, enrollment)
    }

    fn pids(&mut self) -> LibraryIds {
        (**self).pids()
    }
}

/// Create an engine backed by the linked participant library.
#[cfg(feature = "ffi")]
pub fn create_engine() -> Box<dyn TemplateEngine> {
    Box::new(MinexLibrary::new())
}
