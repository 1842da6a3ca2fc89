// CropCure - platform/fs.rs
//
// Filesystem helpers for user-selected image files.

use std::io::{self, Read};
use std::path::Path;

/// Outcome of a size-limited read.
#[derive(Debug)]
pub enum LimitedRead {
    /// The whole file, within the limit.
    Bytes(Vec<u8>),

    /// The file is larger than the limit; nothing beyond the limit was read.
    TooLarge { size: u64 },
}

/// Read a whole file, refusing to buffer more than `limit` bytes.
///
/// The metadata size is checked first so an obviously oversized file is
/// rejected without reading it. The read itself is also capped, which covers
/// files that grow between the check and the read.
pub fn read_with_limit(path: &Path, limit: Option<u64>) -> io::Result<LimitedRead> {
    let file = std::fs::File::open(path)?;
    let size = file.metadata()?.len();

    let Some(limit) = limit else {
        let mut bytes = Vec::with_capacity(size as usize);
        io::BufReader::new(file).read_to_end(&mut bytes)?;
        return Ok(LimitedRead::Bytes(bytes));
    };

    if size > limit {
        tracing::debug!(path = %path.display(), size, limit, "File exceeds read limit");
        return Ok(LimitedRead::TooLarge { size });
    }

    let mut bytes = Vec::with_capacity(size as usize);
    // One byte past the limit tells us the file grew.
    io::BufReader::new(file)
        .take(limit + 1)
        .read_to_end(&mut bytes)?;

    if bytes.len() as u64 > limit {
        return Ok(LimitedRead::TooLarge {
            size: bytes.len() as u64,
        });
    }
    Ok(LimitedRead::Bytes(bytes))
}

/// Display name for a path: the file name, or the full path if it has none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
