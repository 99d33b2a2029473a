// This file is part of minex-validation, a validation driver for MINEX III
// fingerprint template generators and matchers.
//
// You can redistribute minex-validation source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

use std::fmt;
use std::path::Path;

use tracing::warn;

use crate::common::read_file;
use crate::error::{MinexError, Result};

/// An uncompressed, 8-bit gray-scale fingerprint image.
pub struct ImageData {
    data: Vec<u8>,
    width: u16,
    height: u16,
}

impl ImageData {
    pub fn new(data: Vec<u8>, width: u16, height: u16) -> Self {
        ImageData {
            data,
            width,
            height,
        }
    }

    /// Load a sample image that is expected to be `width` x `height` pixels.
    ///
    /// PGM and PNG files are decoded to 8-bit luma; any other file is taken
    /// to hold raw row-major pixels.
    pub fn load(path: &Path, width: u16, height: u16) -> Result<Self> {
        let expected = width as usize * height as usize;

        if is_encoded(path) {
            let decoded = image::open(path)
                .map_err(|source| MinexError::Decode {
                    path: path.to_path_buf(),
                    source,
                })?
                .into_luma8();
            let (w, h) = decoded.dimensions();
            if w != u32::from(width) || h != u32::from(height) {
                return Err(MinexError::ImageSize {
                    path: path.to_path_buf(),
                    expected: format!("{}x{}", width, height),
                    actual: format!("{}x{}", w, h),
                });
            }
            return Ok(ImageData::new(decoded.into_raw(), width, height));
        }

        let data = read_file(path)?;
        if data.len() < expected {
            return Err(MinexError::ImageSize {
                path: path.to_path_buf(),
                expected: format!("{} bytes", expected),
                actual: format!("{} bytes", data.len()),
            });
        }
        if data.len() > expected {
            warn!(
                "{} holds {} bytes, {} more than {}x{}",
                path.display(),
                data.len(),
                data.len() - expected,
                width,
                height
            );
        }
        Ok(ImageData::new(data, width, height))
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.data.len())
            .finish()
    }
}

fn is_encoded(path: &Path) -> bool {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => ext.eq_ignore_ascii_case("pgm") || ext.eq_ignore_ascii_case("png"),
        None => false,
    }
}
