//! Tile corpus enumeration and fingerprinting

use crate::io::configuration::SUPPORTED_EXTENSIONS;
use crate::io::error::{MosaicError, Result};
use std::hash::Hasher;
use std::path::{Path, PathBuf};
use twox_hash::XxHash64;

/// One candidate tile file in the corpus directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    /// File name within the corpus directory
    pub filename: String,
    /// Full path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

/// Whether a filename carries a supported tile extension
pub fn is_supported_image(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// List supported tile files of a flat corpus directory, sorted by filename
///
/// Subdirectories and files with unsupported extensions are ignored.
///
/// # Errors
///
/// Returns `CorpusRead` if the directory or one of its entries cannot be read
pub fn scan_corpus(directory: &Path) -> Result<Vec<CorpusEntry>> {
    let corpus_error = |source| MosaicError::CorpusRead {
        path: directory.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(directory).map_err(corpus_error)? {
        let entry = entry.map_err(corpus_error)?;
        let metadata = entry.metadata().map_err(corpus_error)?;
        if metadata.is_dir() {
            continue;
        }

        let Some(filename) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if is_supported_image(&filename) {
            entries.push(CorpusEntry {
                path: entry.path(),
                size: metadata.len(),
                filename,
            });
        }
    }

    entries.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(entries)
}

/// Stable fingerprint of a corpus listing
///
/// Hashes every (filename, size) pair in filename order, so adding, removing,
/// renaming or resizing any tile changes the result.
pub fn fingerprint(entries: &[CorpusEntry]) -> u64 {
    let mut sorted: Vec<&CorpusEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.filename.cmp(&b.filename));

    let mut hasher = XxHash64::with_seed(0);
    for entry in sorted {
        hasher.write(entry.filename.as_bytes());
        // Separator byte that cannot occur in a filename
        hasher.write_u8(0);
        hasher.write_u64(entry.size);
    }
    hasher.finish()
}
