//! Pipeline stages for contact-card generation.
//!
//! Each submodule implements exactly one transformation step and is
//! testable on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ record ──▶ vcard ──▶ encode ──▶ filename ──▶ page
//! (*.json)  (validate) (vCard)   (QR PNG)   (unique)     (HTML)
//!                                   │
//!                                symbol
//! ```
//!
//! 1. [`input`]    — list `*.json` records in stable order
//! 2. [`record`]   — parse and validate one [`record::ContactRecord`]
//! 3. [`vcard`]    — serialise the record as vCard 3.0 text
//! 4. [`symbol`]   — QR module matrix and its rasterisation
//! 5. [`encode`]   — PNG + base64 data-URI for embedding
//! 6. [`filename`] — slug and collision-free output basename
//! 7. [`page`]     — substitute everything into the HTML template

pub mod encode;
pub mod filename;
pub mod input;
pub mod page;
pub mod record;
pub mod symbol;
pub mod vcard;
