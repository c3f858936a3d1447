// src/site/error.rs
// =============================================================================
// Reasons a single document can't be read.
//
// None of these stop an analysis. The scanner logs them and the document
// simply contributes no outgoing links.
// =============================================================================

use std::io;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    /// Opening or reading the file failed (permissions, vanished file, ...)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// File is bigger than the configured limit
    #[error("file too large ({size} bytes, max {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    /// Reading took longer than the configured limit
    #[error("read timed out after {after:?}")]
    Timeout { after: Duration },

    /// Content is not valid UTF-8
    #[error("not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}
