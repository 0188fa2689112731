//! Progress-callback trait for per-record batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::GeneratorConfigBuilder::progress_callback`] to receive
//! events as the batch driver processes each input file. The library knows
//! nothing about how the host reports progress; the CLI drives an indicatif
//! bar from these events.
//!
//! # Example
//!
//! ```rust
//! use edgequake_cardgen::{BatchProgressCallback, GeneratorConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     written: AtomicUsize,
//! }
//!
//! impl BatchProgressCallback for CountingCallback {
//!     fn on_card_complete(&self, index: usize, total: usize, output: &str) {
//!         self.written.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} -> {}", index, total, output);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { written: AtomicUsize::new(0) });
//!
//! let config = GeneratorConfig::builder()
//!     .progress_callback(counter as Arc<dyn BatchProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the batch driver as it processes each input record.
///
/// `index` is 1-based and follows the lexicographic input order. All methods
/// have default no-op implementations so callers only override what they
/// care about. The trait is `Send + Sync` so a callback can be shared with
/// a progress-bar thread.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after the inputs are enumerated, before any is processed.
    fn on_batch_start(&self, total: usize) {
        let _ = total;
    }

    /// Called before an input file is loaded.
    ///
    /// # Arguments
    /// * `index` — 1-based position in the batch
    /// * `total` — number of inputs in the batch
    /// * `input` — file stem of the input record
    fn on_card_start(&self, index: usize, total: usize, input: &str) {
        let _ = (index, total, input);
    }

    /// Called when a document has been written.
    ///
    /// # Arguments
    /// * `output` — file name of the written document
    fn on_card_complete(&self, index: usize, total: usize, output: &str) {
        let _ = (index, total, output);
    }

    /// Called when an input fails; the batch continues afterwards.
    fn on_card_error(&self, index: usize, total: usize, input: &str, error: &str) {
        let _ = (index, total, input, error);
    }

    /// Called once after every input has been attempted.
    fn on_batch_complete(&self, total: usize, success_count: usize) {
        let _ = (total, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::GeneratorConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;
