//! QR symbol encoding and rasterisation.
//!
//! Two narrow operations sit behind this module:
//!
//! * [`SymbolEncoder::encode`] — text + error-correction level → [`ModuleMatrix`]
//! * [`rasterize`] — [`ModuleMatrix`] + target size → greyscale image
//!
//! The payload builder only sees these two, so the QR library can be
//! replaced by implementing [`SymbolEncoder`] for another backend.

use crate::config::ErrorCorrection;
use crate::error::RecordError;
use image::{GrayImage, Luma};
use qrcodegen::{QrCode, QrCodeEcc, QrSegment, Version};
use tracing::debug;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// A square grid of QR modules. `true` is a dark module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    size: u32,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    /// Build a matrix from row-major module values.
    ///
    /// Returns `None` unless `modules.len() == size * size`.
    pub fn from_modules(size: u32, modules: Vec<bool>) -> Option<Self> {
        (modules.len() == (size as usize) * (size as usize)).then_some(Self { size, modules })
    }

    /// Modules per side.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Whether the module at column `x`, row `y` is dark. Out of range is light.
    pub fn is_dark(&self, x: u32, y: u32) -> bool {
        if x >= self.size || y >= self.size {
            return false;
        }
        self.modules[(y * self.size + x) as usize]
    }
}

/// Turns text into a module grid.
pub trait SymbolEncoder {
    /// Encode `text` at the given error-correction level.
    ///
    /// # Errors
    /// [`RecordError::PayloadTooLarge`] when `text` exceeds the symbol's
    /// capacity at `ecc`.
    fn encode(&self, text: &str, ecc: ErrorCorrection) -> Result<ModuleMatrix, RecordError>;
}

/// [`SymbolEncoder`] backed by the `qrcodegen` crate (QR Model 2, versions 1–40).
///
/// The smallest version that fits is chosen and the mask is picked by the
/// standard penalty rules, so output is deterministic for a given input.
/// The requested level is used as is, never raised to fill spare capacity.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrCodegenEncoder;

impl SymbolEncoder for QrCodegenEncoder {
    fn encode(&self, text: &str, ecc: ErrorCorrection) -> Result<ModuleMatrix, RecordError> {
        let segments = QrSegment::make_segments(text);
        let qr = QrCode::encode_segments_advanced(
            &segments,
            to_qrcodegen(ecc),
            Version::MIN,
            Version::MAX,
            None,
            false,
        )
        .map_err(|e| {
            debug!("QR encoding rejected {} bytes: {}", text.len(), e);
            RecordError::PayloadTooLarge {
                bytes: text.len(),
                ecc,
            }
        })?;

        let size = qr.size();
        let modules = (0..size)
            .flat_map(|y| (0..size).map(move |x| (x, y)))
            .map(|(x, y)| qr.get_module(x, y))
            .collect();

        // qrcodegen sizes are 21..=177, always positive.
        Ok(ModuleMatrix {
            size: size as u32,
            modules,
        })
    }
}

fn to_qrcodegen(ecc: ErrorCorrection) -> QrCodeEcc {
    match ecc {
        ErrorCorrection::Low => QrCodeEcc::Low,
        ErrorCorrection::Medium => QrCodeEcc::Medium,
        ErrorCorrection::Quartile => QrCodeEcc::Quartile,
        ErrorCorrection::High => QrCodeEcc::High,
    }
}

/// Pixels per module so that `modules` modules reach at least `target_px`.
pub fn module_scale(modules: u32, target_px: u32) -> u32 {
    if modules == 0 {
        return 1;
    }
    target_px.div_ceil(modules).max(1)
}

/// Render `matrix` as a black-on-white square image.
///
/// A light border of `quiet_zone` modules surrounds the symbol. Every module
/// is drawn as a whole number of pixels, so the edge is the smallest multiple
/// of `size + 2 * quiet_zone` that is at least `target_px`.
pub fn rasterize(matrix: &ModuleMatrix, target_px: u32, quiet_zone: u32) -> GrayImage {
    let total = matrix.size() + 2 * quiet_zone;
    let scale = module_scale(total, target_px);
    let edge = total * scale;

    let mut img = GrayImage::from_pixel(edge, edge, LIGHT);
    for y in 0..matrix.size() {
        for x in 0..matrix.size() {
            if !matrix.is_dark(x, y) {
                continue;
            }
            let px = (x + quiet_zone) * scale;
            let py = (y + quiet_zone) * scale;
            for dy in 0..scale {
                for dx in 0..scale {
                    img.put_pixel(px + dx, py + dy, DARK);
                }
            }
        }
    }

    debug!(
        "Rasterised {}x{} modules at {} px/module → {}x{} px",
        matrix.size(),
        matrix.size(),
        scale,
        edge,
        edge
    );
    img
}
