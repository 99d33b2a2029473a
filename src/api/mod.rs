// This file is part of minex-validation, a validation driver for MINEX III
// fingerprint template generators and matchers.
//
// You can redistribute minex-validation source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

//! Types and constants of the MINEX III API.

#[cfg(feature = "ffi")]
mod ffi;

#[cfg(feature = "ffi")]
pub use self::ffi::MinexLibrary;

use std::fmt;

/// Vertical and horizontal resolution of images passed to template creation.
pub const MINEX_IMAGE_PPI: u16 = 500;
pub const MINEX_MIN_IMAGE_WIDTH: u16 = 150;
pub const MINEX_MAX_IMAGE_WIDTH: u16 = 812;
pub const MINEX_MIN_IMAGE_HEIGHT: u16 = 166;
pub const MINEX_MAX_IMAGE_HEIGHT: u16 = 1000;

/// Minimum size of a MINEX-compliant template.
pub const MINEX_MIN_TEMPLATE_SIZE: u16 = 32;
/// Maximum size of a MINEX-compliant template.
pub const MINEX_MAX_TEMPLATE_SIZE: u16 = 800;
/// Maximum number of minutiae in a template.
pub const MINEX_MAX_MINUTIAE: u8 = 128;

/// Status returned by every MINEX API function.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum ReturnCode {
    Success,
    BadImageSize,
    FailureUnspecified,
    FailureBadImpression,
    FailureNullTemplate,
    FailureBadVerificationTemplate,
    FailureBadEnrollmentTemplate,
    /// A value outside the published taxonomy, kept verbatim.
    Other(i32),
}

impl ReturnCode {
    pub fn is_success(self) -> bool {
        self == ReturnCode::Success
    }

    pub fn code(self) -> i32 {
        match self {
            ReturnCode::Success => 0,
            ReturnCode::BadImageSize => 1,
            ReturnCode::FailureUnspecified => 2,
            ReturnCode::FailureBadImpression => 3,
            ReturnCode::FailureNullTemplate => 4,
            ReturnCode::FailureBadVerificationTemplate => 5,
            ReturnCode::FailureBadEnrollmentTemplate => 6,
            ReturnCode::Other(code) => code,
        }
    }
}

impl From<i32> for ReturnCode {
    fn from(code: i32) -> Self {
        match code {
            0 => ReturnCode::Success,
            1 => ReturnCode::BadImageSize,
            2 => ReturnCode::FailureUnspecified,
            3 => ReturnCode::FailureBadImpression,
            4 => ReturnCode::FailureNullTemplate,
            5 => ReturnCode::FailureBadVerificationTemplate,
            6 => ReturnCode::FailureBadEnrollmentTemplate,
            other => ReturnCode::Other(other),
        }
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum ImpressionType {
    LiveScanPlain,
    NonLiveScanPlain,
}

impl ImpressionType {
    #[inline]
    pub fn from(code: u8) -> Option<Self> {
        match code {
            0 => Some(ImpressionType::LiveScanPlain),
            2 => Some(ImpressionType::NonLiveScanPlain),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            ImpressionType::LiveScanPlain => 0,
            ImpressionType::NonLiveScanPlain => 2,
        }
    }
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum FingerPosition {
    Unknown,
    RightThumb,
    RightIndex,
    RightMiddle,
    RightRing,
    RightLittle,
    LeftThumb,
    LeftIndex,
    LeftMiddle,
    LeftRing,
    LeftLittle,
}

impl FingerPosition {
    #[inline]
    pub fn from(code: u8) -> Option<Self> {
        use self::FingerPosition::*;

        let position = match code {
            0 => Unknown,
            1 => RightThumb,
            2 => RightIndex,
            3 => RightMiddle,
            4 => RightRing,
            5 => RightLittle,
            6 => LeftThumb,
            7 => LeftIndex,
            8 => LeftMiddle,
            9 => LeftRing,
            10 => LeftLittle,
            _ => return None,
        };
        Some(position)
    }
}

/// Capture quality, expressed on the NFIQ-equivalent MINEX scale.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum Quality {
    Poor,
    Fair,
    Good,
    VeryGood,
    Excellent,
}

impl Quality {
    #[inline]
    pub fn from(code: u8) -> Option<Self> {
        match code {
            20 => Some(Quality::Poor),
            40 => Some(Quality::Fair),
            60 => Some(Quality::Good),
            80 => Some(Quality::VeryGood),
            100 => Some(Quality::Excellent),
            _ => None,
        }
    }
}

/// A CBEFF product identifier: product code in the high half, version in the low half.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ProductId(pub u32);

impl ProductId {
    const PRODUCT_MASK: u32 = 0xFFFF_0000;
    const VERSION_MASK: u32 = 0x0000_FFFF;

    pub fn product(self) -> u16 {
        ((self.0 & Self::PRODUCT_MASK) >> 16) as u16
    }

    pub fn version(self) -> u16 {
        (self.0 & Self::VERSION_MASK) as u16
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04x}\t{:04x}", self.product(), self.version())
    }
}

/// PIDs of a participant's template generator and template matcher.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct LibraryIds {
    pub generator: ProductId,
    pub matcher: ProductId,
}

impl fmt::Display for LibraryIds {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t{}", self.generator, self.matcher)
    }
}

/// Whether an image of `width` x `height` lies within the published bounds.
pub fn is_supported_image_size(width: u16, height: u16) -> bool {
    (MINEX_MIN_IMAGE_WIDTH..=MINEX_MAX_IMAGE_WIDTH).contains(&width)
        && (MINEX_MIN_IMAGE_HEIGHT..=MINEX_MAX_IMAGE_HEIGHT).contains(&height)
}
