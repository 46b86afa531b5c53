//! Output directory replacement.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{BuildError, BuildResult};
use crate::asset::VendorFile;

/// Recursively remove `dir`. Absent directories are not an error.
pub fn clear_dir(dir: &Path) -> BuildResult<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(BuildError::io(dir, e)),
    }
}

/// Replace the contents of `dir` with one artifact plus vendor files.
///
/// Only called once a transform has fully succeeded, so a failed target
/// never touches its previous output. Returns the artifact path.
pub fn replace_output(
    dir: &Path,
    file_name: &str,
    bytes: &[u8],
    vendor: &[VendorFile],
) -> BuildResult<PathBuf> {
    clear_dir(dir)?;
    fs::create_dir_all(dir).map_err(|e| BuildError::io(dir, e))?;

    let path = dir.join(file_name);
    fs::write(&path, bytes).map_err(|e| BuildError::io(&path, e))?;

    for file in vendor {
        let vendor_path = dir.join(&file.name);
        if let Some(parent) = vendor_path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
        }
        fs::write(&vendor_path, &file.bytes).map_err(|e| BuildError::io(&vendor_path, e))?;
    }

    Ok(path)
}
