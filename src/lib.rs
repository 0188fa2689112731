//! # edgequake-cardgen
//!
//! Generate self-contained HTML contact cards, each with a QR code that
//! hands the contact to a phone as a vCard.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input/*.json
//!  │
//!  ├─ 1. Record    parse JSON, require `name`, drop empty fields
//!  ├─ 2. vCard     fixed-order vCard 3.0 text
//!  ├─ 3. QR        encode (medium ECC) → rasterise → PNG → base64 data-URI
//!  ├─ 4. Name      slug of the contact name, `-2`, `-3`… on collision
//!  ├─ 5. Page      fill the HTML template (inline CSS, no external fetches)
//!  └─ 6. Output    output/<name>.html, one per valid record
//! ```
//!
//! A record that fails (bad JSON, no name, vCard too large for a QR code) is
//! reported and skipped; the rest of the batch still runs.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_cardgen::{generate, GeneratorConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GeneratorConfig::builder()
//!         .input_dir("input")
//!         .output_dir("output")
//!         .build()?;
//!     let report = generate(&config)?;
//!     for failed in report.failures() {
//!         eprintln!("{}: {}", failed.input_id(), failed.error.as_ref().unwrap());
//!     }
//!     println!("{} cards written", report.stats.generated);
//!     Ok(())
//! }
//! ```
//!
//! The stages are public too, for callers that build cards from records
//! they already hold:
//!
//! ```rust
//! use edgequake_cardgen::{build_payload, render_page, to_vcard, CardTemplate, ContactRecord, PayloadOptions};
//!
//! let record = ContactRecord::from_json(r#"{"name": "Jane Doe", "email": "jane@example.com"}"#).unwrap();
//! let payload = build_payload(&to_vcard(&record), &PayloadOptions::default()).unwrap();
//! let html = render_page(&record, &payload, &CardTemplate::builtin());
//! assert!(html.contains("Jane Doe"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `cardgen` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ErrorCorrection, GeneratorConfig, GeneratorConfigBuilder, PayloadOptions};
pub use error::{CardGenError, RecordError};
pub use generate::{generate, generate_card};
pub use output::{BatchReport, BatchStats, CardResult};
pub use pipeline::encode::{build_payload, build_payload_with, CodePayload};
pub use pipeline::filename::{resolve_output_name, slugify};
pub use pipeline::page::{render_page, CardTemplate};
pub use pipeline::record::{load_record, ContactRecord};
pub use pipeline::symbol::{rasterize, ModuleMatrix, QrCodegenEncoder, SymbolEncoder};
pub use pipeline::vcard::{to_vcard, VCardText};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
