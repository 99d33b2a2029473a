// This file is part of minex-validation, a validation driver for MINEX III
// fingerprint template generators and matchers.
//
// You can redistribute minex-validation source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

use std::borrow::Cow;

use tracing::debug;

use crate::api::{LibraryIds, ProductId, ReturnCode, MINEX_MAX_TEMPLATE_SIZE};
use crate::common::ImageData;
use crate::sample::SampleMetadata;
use crate::TemplateEngine;

extern "C" {
    fn get_pids(template_generator: *mut u32, template_matcher: *mut u32) -> i32;

    fn create_template(
        raw_image: *const u8,
        finger_quality: u8,
        finger_position: u8,
        impression_type: u8,
        height: u16,
        width: u16,
        output_template: *mut u8,
    ) -> i32;

    fn match_templates(
        verification_template: *const u8,
        enrollment_template: *const u8,
        similarity: *mut f32,
    ) -> i32;
}

/// The participant library linked in at build time.
pub struct MinexLibrary {
    _private: (),
}

impl MinexLibrary {
    pub fn new() -> Self {
        MinexLibrary { _private: () }
    }
}

impl Default for MinexLibrary {
    fn default() -> Self {
        MinexLibrary::new()
    }
}

// The C API receives template pointers without lengths, so short templates
// are padded out to the largest legal size before crossing the boundary.
fn padded(template: &[u8]) -> Cow<[u8]> {
    let min_len = MINEX_MAX_TEMPLATE_SIZE as usize;
    if template.len() >= min_len {
        Cow::Borrowed(template)
    } else {
        let mut buf = vec![0u8; min_len];
        buf[..template.len()].copy_from_slice(template);
        Cow::Owned(buf)
    }
}

impl TemplateEngine for MinexLibrary {
    fn create_template(
        &mut self,
        image: &ImageData,
        metadata: &SampleMetadata,
        output: &mut [u8],
    ) -> ReturnCode {
        if output.len() < MINEX_MAX_TEMPLATE_SIZE as usize {
            panic!("Template buffer too small: {} bytes", output.len());
        }
        if image.data().len() < image.width() as usize * image.height() as usize {
            panic!("Illegal image: {:?}", image);
        }

        let rv = unsafe {
            create_template(
                image.data().as_ptr(),
                metadata.quality,
                metadata.position,
                metadata.impression,
                image.height(),
                image.width(),
                output.as_mut_ptr(),
            )
        };
        debug!("create_template({}) returned {}", metadata.filename, rv);
        ReturnCode::from(rv)
    }

    fn match_templates(&mut self, verification: &[u8], enrollment: &[u8]) -> (ReturnCode, f32) {
        let verification = padded(verification);
        let enrollment = padded(enrollment);
        let mut similarity: f32 = 0.0;

        let rv = unsafe {
            match_templates(verification.as_ptr(), enrollment.as_ptr(), &mut similarity)
        };
        (ReturnCode::from(rv), similarity)
    }

    fn pids(&mut self) -> LibraryIds {
        let mut generator: u32 = 0;
        let mut matcher: u32 = 0;

        let rv = unsafe { get_pids(&mut generator, &mut matcher) };
        if rv != 0 {
            debug!("get_pids returned {}", rv);
        }

        LibraryIds {
            generator: ProductId(generator),
            matcher: ProductId(matcher),
        }
    }
}
