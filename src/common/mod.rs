// This file is part of minex-validation, a validation driver for MINEX III
// fingerprint template generators and matchers.
//
// You can redistribute minex-validation source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

mod image_data;

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

pub use self::image_data::ImageData;

use crate::error::{MinexError, Result};

/// Read the entire contents of `path`.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|source| MinexError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut buf = vec![];
    file.read_to_end(&mut buf).map_err(|source| MinexError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(buf)
}

/// Create (or truncate) `path` and write `data` to it.
pub fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|source| MinexError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    file.write_all(data)
        .and_then(|_| file.flush())
        .map_err(|source| MinexError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Create the template output directory. An existing directory is reused.
pub fn create_output_dir(path: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o770);
    }

    match builder.create(path) {
        Ok(()) => Ok(()),
        Err(ref e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(source) => Err(MinexError::CreateDir {
            path: path.to_path_buf(),
            source,
        }),
    }
}
