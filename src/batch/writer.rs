//! JSONL batch file writer.
//!
//! One compact JSON object per line, each line terminated by `\n`. Text is
//! written as UTF-8 without `\u` escaping so Arabic script stays readable.
//! A failed write can leave a partial file behind.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::WriteError;

use super::BatchEnvelope;

/// Write `envelopes` to `writer` in order. Returns the number of lines written.
pub fn write_envelopes<W: Write>(
    mut writer: W,
    envelopes: &[BatchEnvelope],
) -> Result<usize, WriteError> {
    for envelope in envelopes {
        serde_json::to_writer(&mut writer, envelope).map_err(|source| {
            if source.is_io() {
                WriteError::Io(source.into())
            } else {
                WriteError::Serialize {
                    custom_id: envelope.custom_id.clone(),
                    source,
                }
            }
        })?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(envelopes.len())
}

/// Create (or truncate) `path` and write the batch to it.
///
/// Missing parent directories are created.
pub fn write_batch_file(path: &Path, envelopes: &[BatchEnvelope]) -> Result<usize, WriteError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| WriteError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    }

    let file = File::create(path).map_err(|source| WriteError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let written = write_envelopes(BufWriter::new(file), envelopes)?;

    tracing::info!(
        requests = written,
        path = %path.display(),
        "Created batch file"
    );

    Ok(written)
}

/// Read back the first request of a batch file, if any.
pub fn read_first_envelope(path: &Path) -> anyhow::Result<Option<BatchEnvelope>> {
    let file = File::open(path)?;
    let mut line = String::new();
    if BufReader::new(file).read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line.trim_end())?))
}
