use super::DELIMITER;
use crate::error::{MatterError, Result};
use std::{fs::File, io::Read, path::Path};

/// Check whether a file starts with the front matter delimiter.
///
/// Reads at most `DELIMITER.len()` bytes. The handle is dropped before
/// returning. Files shorter than the delimiter never match.
pub fn has_front_matter(path: &Path) -> Result<bool> {
    let file = File::open(path).map_err(|err| MatterError::io(path, err))?;

    let mut prefix = Vec::with_capacity(DELIMITER.len());
    file.take(DELIMITER.len() as u64)
        .read_to_end(&mut prefix)
        .map_err(|err| MatterError::io(path, err))?;

    Ok(prefix == DELIMITER.as_bytes())
}
