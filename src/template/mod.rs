// This file is part of minex-validation, a validation driver for MINEX III
// fingerprint template generators and matchers.
//
// You can redistribute minex-validation source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

//! MINEX templates are INCITS 378 finger minutiae records restricted to a
//! single finger view. The driver only needs the record length to persist a
//! template; the rest of the layout is read to sanity-check what a generator
//! produced.

use std::io::{self, Cursor, Read};

use byteorder::{BigEndian, ByteOrder, ReadBytesExt};
use thiserror::Error;

use crate::api::{
    ProductId, MINEX_MAX_MINUTIAE, MINEX_MAX_TEMPLATE_SIZE, MINEX_MIN_TEMPLATE_SIZE,
};

/// Byte offset of the 16-bit record length.
pub const LENGTH_OFFSET: usize = 8;

pub const FORMAT_ID: [u8; 4] = *b"FMR\0";
pub const FORMAT_VERSION: [u8; 4] = *b" 20\0";

const RECORD_HEADER_LEN: usize = 26;
const FINGER_VIEW_HEADER_LEN: usize = 4;
const MINUTIA_LEN: usize = 6;
const EXTENDED_LENGTH_LEN: usize = 2;

/// Size of the buffer handed to the generator. Generators may pad their output
/// past the record length, so it is larger than any legal template.
pub const CREATE_BUFFER_SIZE: usize = MINEX_MAX_TEMPLATE_SIZE as usize * 3;

/// Read the record length stored in network byte order at `LENGTH_OFFSET`.
///
/// Returns `None` if `template` is too short to hold the field.
pub fn declared_length(template: &[u8]) -> Option<u16> {
    template
        .get(LENGTH_OFFSET..LENGTH_OFFSET + 2)
        .map(BigEndian::read_u16)
}

/// The ways a template can depart from the MINEX record layout.
#[derive(Error, Debug, PartialEq)]
pub enum TemplateError {
    #[error("template is truncated at {0} bytes")]
    Truncated(usize),

    #[error("bad format identifier {0:02x?}")]
    BadFormatId([u8; 4]),

    #[error("bad format version {0:02x?}")]
    BadVersion([u8; 4]),

    #[error("record length {0} outside [{min}, {max}]", min = MINEX_MIN_TEMPLATE_SIZE, max = MINEX_MAX_TEMPLATE_SIZE)]
    LengthOutOfBounds(u16),

    #[error("record length {declared} but {actual} bytes present")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("{0} finger views, expected 1")]
    FingerViewCount(u8),

    #[error("{0} minutiae, at most {max} allowed", max = MINEX_MAX_MINUTIAE)]
    TooManyMinutiae(u8),

    #[error("record length {declared} does not match content length {computed}")]
    ContentLengthMismatch { declared: usize, computed: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Minutia {
    pub kind: u8,
    pub x: u16,
    pub y: u16,
    pub angle: u8,
    pub quality: u8,
}

/// Header fields and minutiae of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub struct FingerMinutiaeRecord {
    pub length: u16,
    pub product_id: ProductId,
    pub capture_equipment: u16,
    pub image_width: u16,
    pub image_height: u16,
    pub x_resolution: u16,
    pub y_resolution: u16,
    pub finger_position: u8,
    pub view_number: u8,
    pub impression_type: u8,
    pub finger_quality: u8,
    pub minutiae: Vec<Minutia>,
    pub extended_data_length: u16,
}

impl FingerMinutiaeRecord {
    /// Parse and validate a complete template (exactly the persisted bytes).
    pub fn parse(template: &[u8]) -> Result<Self, TemplateError> {
        RecordReader::new(template).read()
    }
}

struct RecordReader<'a> {
    reader: Cursor<&'a [u8]>,
    len: usize,
}

impl<'a> RecordReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        RecordReader {
            reader: Cursor::new(buf),
            len: buf.len(),
        }
    }

    fn read(mut self) -> Result<FingerMinutiaeRecord, TemplateError> {
        let format_id = self.read_tag()?;
        if format_id != FORMAT_ID {
            return Err(TemplateError::BadFormatId(format_id));
        }
        let version = self.read_tag()?;
        if version != FORMAT_VERSION {
            return Err(TemplateError::BadVersion(version));
        }

        let length = self.read_u16()?;
        if length < MINEX_MIN_TEMPLATE_SIZE || length > MINEX_MAX_TEMPLATE_SIZE {
            return Err(TemplateError::LengthOutOfBounds(length));
        }
        if length as usize != self.len {
            return Err(TemplateError::LengthMismatch {
                declared: length as usize,
                actual: self.len,
            });
        }

        let product_id = ProductId(self.read_u32()?);
        let capture_equipment = self.read_u16()?;
        let image_width = self.read_u16()?;
        let image_height = self.read_u16()?;
        let x_resolution = self.read_u16()?;
        let y_resolution = self.read_u16()?;

        let finger_views = self.read_u8()?;
        if finger_views != 1 {
            return Err(TemplateError::FingerViewCount(finger_views));
        }
        let _reserved = self.read_u8()?;

        let finger_position = self.read_u8()?;
        let view_impression = self.read_u8()?;
        let finger_quality = self.read_u8()?;
        let num_minutiae = self.read_u8()?;
        if num_minutiae > MINEX_MAX_MINUTIAE {
            return Err(TemplateError::TooManyMinutiae(num_minutiae));
        }

        let mut minutiae = Vec::with_capacity(num_minutiae as usize);
        for _ in 0..num_minutiae {
            minutiae.push(self.read_minutia()?);
        }

        let extended_data_length = self.read_u16()?;
        let computed = RECORD_HEADER_LEN
            + FINGER_VIEW_HEADER_LEN
            + MINUTIA_LEN * num_minutiae as usize
            + EXTENDED_LENGTH_LEN
            + extended_data_length as usize;
        if computed != length as usize {
            return Err(TemplateError::ContentLengthMismatch {
                declared: length as usize,
                computed,
            });
        }

        Ok(FingerMinutiaeRecord {
            length,
            product_id,
            capture_equipment,
            image_width,
            image_height,
            x_resolution,
            y_resolution,
            finger_position,
            view_number: view_impression >> 4,
            impression_type: view_impression & 0x0F,
            finger_quality,
            minutiae,
            extended_data_length,
        })
    }

    fn read_minutia(&mut self) -> Result<Minutia, TemplateError> {
        let type_x = self.read_u16()?;
        let y = self.read_u16()?;
        let angle = self.read_u8()?;
        let quality = self.read_u8()?;
        Ok(Minutia {
            kind: (type_x >> 14) as u8,
            x: type_x & 0x3FFF,
            y: y & 0x3FFF,
            angle,
            quality,
        })
    }

    fn read_tag(&mut self) -> Result<[u8; 4], TemplateError> {
        let mut tag = [0u8; 4];
        self.reader.read_exact(&mut tag).map_err(|e| self.truncated(e))?;
        Ok(tag)
    }

    fn read_u8(&mut self) -> Result<u8, TemplateError> {
        self.reader.read_u8().map_err(|e| self.truncated(e))
    }

    fn read_u16(&mut self) -> Result<u16, TemplateError> {
        self.reader.read_u16::<BigEndian>().map_err(|e| self.truncated(e))
    }

    fn read_u32(&mut self) -> Result<u32, TemplateError> {
        self.reader.read_u32::<BigEndian>().map_err(|e| self.truncated(e))
    }

    fn truncated(&self, _: io::Error) -> TemplateError {
        TemplateError::Truncated(self.len)
    }
}
