//! Log file reading.
//!
//! Files are memory-mapped and decoded once; line boundaries are found with
//! `memchr` over the decoded text.

use std::fs::File;
use std::path::{Path, PathBuf};

use encoding_rs::UTF_8;
use memchr::memchr_iter;
use memmap2::Mmap;

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A whole log file, decoded to text.
#[derive(Debug, Clone)]
pub struct LogFile {
    path: PathBuf,
    text: String,
    had_errors: bool,
}

impl LogFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReadError> {
        let path = path.as_ref().to_path_buf();
        let io_err = |source| ReadError::Io {
            path: path.clone(),
            source,
        };

        let file = File::open(&path).map_err(io_err)?;
        let len = file.metadata().map_err(io_err)?.len();

        // Mapping a zero-length file fails on some platforms
        let (text, had_errors) = if len == 0 {
            (String::new(), false)
        } else {
            let mmap = unsafe { Mmap::map(&file).map_err(io_err)? };
            decode_bytes(&mmap)
        };

        if had_errors {
            tracing::warn!(path = %path.display(), "Log file contains invalid UTF-8, replaced lossily");
        }
        tracing::debug!(path = %path.display(), bytes = len, "Opened log file");

        Ok(Self {
            path,
            text,
            had_errors,
        })
    }

    /// Wrap text that is already in memory
    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            had_errors: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when invalid UTF-8 was replaced during decoding
    pub fn had_errors(&self) -> bool {
        self.had_errors
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        split_lines(&self.text)
    }
}

/// Decode raw bytes as UTF-8, dropping a leading BOM and replacing invalid sequences.
pub fn decode_bytes(bytes: &[u8]) -> (String, bool) {
    let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    (text.into_owned(), had_errors)
}

/// Split text on `\n`, trimming a trailing `\r` and skipping empty lines.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut ends = memchr_iter(b'\n', bytes).chain(std::iter::once(bytes.len()));

    std::iter::from_fn(move || {
        loop {
            let end = ends.next()?;
            let line = &text[start..end];
            start = end + 1;
            let line = line.strip_suffix('\r').unwrap_or(line);
            if !line.is_empty() {
                return Some(line);
            }
        }
    })
}
