//! Record store loading.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::LoadError;

use super::Record;

/// Load the canonical record sequence from a JSON array file.
///
/// Array position is the canonical position used for context windows. The
/// whole file is parsed before anything is returned.
pub fn load_records(path: &Path) -> Result<Vec<Record>, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let records = load_records_from_reader(BufReader::new(file), path)?;

    tracing::info!(
        records = records.len(),
        path = %path.display(),
        "Loaded dataset"
    );

    Ok(records)
}

/// Load records from an arbitrary reader.
///
/// `origin` names the source in errors. I/O failures surface as
/// [`LoadError::Read`], malformed content as [`LoadError::Parse`].
pub fn load_records_from_reader<R: Read>(
    reader: R,
    origin: &Path,
) -> Result<Vec<Record>, LoadError> {
    serde_json::from_reader(reader).map_err(|source| {
        if source.is_io() {
            LoadError::Read {
                path: origin.to_path_buf(),
                source: source.into(),
            }
        } else {
            LoadError::Parse {
                path: origin.to_path_buf(),
                source,
            }
        }
    })
}
