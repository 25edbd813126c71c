// Blocking single-shot sysfs I/O: one read per statistics file, one write per command.

use crate::error::{Result, ZramError};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

/// Sysfs attributes are smaller than a page; one read of this size is assumed to cover the file.
pub const READ_LIMIT: usize = 4095;

/// Result of a control write that got past `open`.
#[derive(Debug)]
pub enum WriteOutcome {
    Written,
    /// Fewer bytes than the payload were accepted (or the write call failed).
    ShortWrite {
        written: usize,
        expected: usize,
        error: Option<std::io::Error>,
    },
}

impl WriteOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, WriteOutcome::Written)
    }
}

/// Reads at most [`READ_LIMIT`] bytes in a single `read` call. The file is closed on return.
pub fn read_once(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|source| ZramError::OpenRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut buf = vec![0u8; READ_LIMIT];
    let n = file.read(&mut buf).map_err(|source| ZramError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if n == 0 {
        return Err(ZramError::EmptyRead {
            path: path.to_path_buf(),
        });
    }
    buf.truncate(n);
    Ok(buf)
}

/// Opens `path` write-only (the attribute must already exist) and sends `payload`.
pub fn write_once(path: &Path, payload: &str) -> Result<WriteOutcome> {
    let mut file = OpenOptions::new()
        .write(true)
        .open(path)
        .map_err(|source| ZramError::OpenWrite {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(write_payload(&mut file, payload))
}

/// Issues exactly one `write` call; anything short of the full payload is reported, not retried.
pub fn write_payload<W: Write>(writer: &mut W, payload: &str) -> WriteOutcome {
    let expected = payload.len();
    match writer.write(payload.as_bytes()) {
        Ok(n) if n >= expected => WriteOutcome::Written,
        Ok(written) => WriteOutcome::ShortWrite {
            written,
            expected,
            error: None,
        },
        Err(e) => WriteOutcome::ShortWrite {
            written: 0,
            expected,
            error: Some(e),
        },
    }
}
