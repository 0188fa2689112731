//! Error types for the edgequake-cardgen library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`CardGenError`] — **Fatal**: the batch cannot proceed at all
//!   (input directory unreadable, output directory not writable, custom
//!   template missing). Returned as `Err(CardGenError)` from
//!   [`crate::generate::generate`].
//!
//! * [`RecordError`] — **Non-fatal**: a single input record failed (bad JSON,
//!   missing name, vCard too large for a QR symbol) but every other record is
//!   still processed. Stored inside [`crate::output::CardResult`] so callers
//!   can inspect partial success after the run.
//!
//! Every failure is deterministic for a given input, so nothing is retried.

use crate::config::ErrorCorrection;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-cardgen library.
///
/// Record-level failures use [`RecordError`] and are stored in
/// [`crate::output::CardResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum CardGenError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The input directory is missing or cannot be listed.
    #[error("Cannot read input directory '{path}': {source}\nCheck the path exists and is readable.")]
    InputDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input directory exists but holds no `*.json` records.
    #[error("No JSON files found in '{path}'")]
    NoInputFiles { path: PathBuf },

    /// A custom template was configured but could not be read.
    #[error("Failed to read template '{path}': {source}")]
    TemplateUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The output directory could not be created or listed.
    #[error("Output directory '{path}' is not writable: {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A non-fatal error for a single input record.
///
/// Stored alongside [`crate::output::CardResult`] when a record fails.
/// The batch continues with the next input.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum RecordError {
    /// The record file could not be read.
    #[error("failed to read record: {detail}")]
    ReadFailed { detail: String },

    /// The record is not a JSON object of string fields.
    #[error("malformed input: {detail}")]
    MalformedInput { detail: String },

    /// A required field is absent, null, or blank.
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    /// The vCard text does not fit in the largest QR symbol.
    #[error("vCard is {bytes} bytes, too large for a QR code at {ecc} error correction")]
    PayloadTooLarge { bytes: usize, ecc: ErrorCorrection },

    /// PNG encoding of the rasterised symbol failed.
    #[error("image encoding failed: {detail}")]
    ImageEncoding { detail: String },

    /// The rendered document could not be written.
    #[error("failed to write '{path}': {detail}")]
    WriteFailed { path: PathBuf, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let e = RecordError::MissingField {
            field: "name".into(),
        };
        assert_eq!(e.to_string(), "missing required field 'name'");
    }

    #[test]
    fn test_payload_too_large_display() {
        let e = RecordError::PayloadTooLarge {
            bytes: 4000,
            ecc: ErrorCorrection::Medium,
        };
        let msg = e.to_string();
        assert!(msg.contains("4000 bytes"), "got: {msg}");
        assert!(msg.contains("medium"), "got: {msg}");
    }

    #[test]
    fn test_no_input_files_display() {
        let e = CardGenError::NoInputFiles {
            path: PathBuf::from("input"),
        };
        assert!(e.to_string().contains("input"));
    }

    #[test]
    fn test_output_write_failed_keeps_source() {
        use std::error::Error as _;
        let e = CardGenError::OutputWriteFailed {
            path: PathBuf::from("/nope"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("/nope"));
    }
}
