//! Payload building: vCard text → QR → PNG → base64 data-URI.
//!
//! The result is embedded straight into an `<img src>` attribute, so the
//! generated card needs no companion image file. PNG is lossless; JPEG
//! artefacts around module edges make QR scanning unreliable.

use crate::config::PayloadOptions;
use crate::error::RecordError;
use crate::pipeline::symbol::{rasterize, QrCodegenEncoder, SymbolEncoder};
use crate::pipeline::vcard::VCardText;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, GrayImage};
use std::io::Cursor;
use tracing::debug;

/// MIME prefix of every payload.
pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// A QR image ready for embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodePayload {
    /// `data:image/png;base64,...`
    pub data_uri: String,
    /// Modules per side of the QR symbol, excluding the quiet zone.
    pub modules: u32,
    /// Pixel edge of the rendered PNG.
    pub edge_px: u32,
}

impl CodePayload {
    pub fn as_str(&self) -> &str {
        &self.data_uri
    }
}

/// Build the payload for `vcard` with the default QR backend.
pub fn build_payload(vcard: &VCardText, options: &PayloadOptions) -> Result<CodePayload, RecordError> {
    build_payload_with(&QrCodegenEncoder, vcard, options)
}

/// Build the payload for `vcard` with a caller-supplied encoder.
///
/// `options` is clamped first, so the image edge stays bounded whatever the
/// caller passes.
///
/// # Errors
/// - [`RecordError::PayloadTooLarge`] if the text does not fit a QR symbol
///   at `options.ecc`
/// - [`RecordError::ImageEncoding`] if PNG encoding fails
pub fn build_payload_with(
    encoder: &dyn SymbolEncoder,
    vcard: &VCardText,
    options: &PayloadOptions,
) -> Result<CodePayload, RecordError> {
    let options = options.clamped();
    let matrix = encoder.encode(vcard.as_str(), options.ecc)?;
    let img = rasterize(&matrix, options.target_px, options.quiet_zone);
    let edge_px = img.width();

    let png = encode_png(img).map_err(|e| RecordError::ImageEncoding {
        detail: e.to_string(),
    })?;
    let b64 = STANDARD.encode(&png);
    debug!("Encoded QR image → {} bytes PNG, {} bytes base64", png.len(), b64.len());

    Ok(CodePayload {
        data_uri: format!("{DATA_URI_PREFIX}{b64}"),
        modules: matrix.size(),
        edge_px,
    })
}

/// PNG-encode a greyscale raster.
pub fn encode_png(img: GrayImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    DynamicImage::ImageLuma8(img).write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ErrorCorrection;
    use crate::pipeline::record::ContactRecord;
    use crate::pipeline::symbol::ModuleMatrix;
    use crate::pipeline::vcard::to_vcard;

    fn decode_png(payload: &CodePayload) -> image::GrayImage {
        let b64 = payload
            .data_uri
            .strip_prefix(DATA_URI_PREFIX)
            .expect("data-URI prefix");
        let bytes = STANDARD.decode(b64).expect("valid base64");
        image::load_from_memory(&bytes)
            .expect("valid PNG")
            .to_luma8()
    }

    fn scan(img: &image::GrayImage) -> String {
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            img.width() as usize,
            img.height() as usize,
            |x, y| img.get_pixel(x as u32, y as u32)[0],
        );
        let grids = prepared.detect_grids();
        assert_eq!(grids.len(), 1, "expected exactly one QR code");
        let (_meta, content) = grids[0].decode().expect("decodable QR");
        content
    }

    fn jane() -> ContactRecord {
        let mut r = ContactRecord::new("Jane Doe");
        r.email = Some("jane@example.com".into());
        r.company = Some("Acme, Inc.".into());
        r.phone = Some("+1 555 0100".into());
        r
    }

    #[test]
    fn test_payload_has_png_data_uri_prefix() {
        let vcard = to_vcard(&jane());
        let p = build_payload(&vcard, &PayloadOptions::default()).unwrap();
        assert!(p.data_uri.starts_with(DATA_URI_PREFIX));
        assert!(p.edge_px >= 200);
        let img = decode_png(&p);
        assert_eq!(img.dimensions(), (p.edge_px, p.edge_px));
    }

    #[test]
    fn test_payload_is_deterministic() {
        let vcard = to_vcard(&jane());
        let opts = PayloadOptions::default();
        assert_eq!(
            build_payload(&vcard, &opts).unwrap(),
            build_payload(&vcard, &opts).unwrap()
        );
    }

    #[test]
    fn test_decoded_qr_reproduces_vcard() {
        let vcard = to_vcard(&jane());
        let p = build_payload(&vcard, &PayloadOptions::default()).unwrap();
        assert_eq!(scan(&decode_png(&p)), vcard.as_str());
    }

    #[test]
    fn test_decoded_qr_reproduces_vcard_at_high_ecc() {
        let vcard = to_vcard(&jane());
        let opts = PayloadOptions {
            ecc: ErrorCorrection::High,
            target_px: 300,
            quiet_zone: 4,
        };
        let p = build_payload(&vcard, &opts).unwrap();
        assert_eq!(scan(&decode_png(&p)), vcard.as_str());
    }

    #[test]
    fn test_oversized_vcard_is_payload_too_large() {
        let mut r = ContactRecord::new("Jane Doe");
        r.title = Some("x".repeat(2400));
        let vcard = to_vcard(&r);
        let err = build_payload(&vcard, &PayloadOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            RecordError::PayloadTooLarge {
                ecc: ErrorCorrection::Medium,
                ..
            }
        ));
    }

    #[test]
    fn test_out_of_range_options_are_clamped() {
        let vcard = to_vcard(&jane());
        let opts = PayloadOptions {
            ecc: ErrorCorrection::Medium,
            target_px: 100_000,
            quiet_zone: 1_000,
        };
        let p = build_payload(&vcard, &opts).unwrap();
        // At most one extra module's worth of pixels above the cap.
        let total = p.modules + 2 * crate::config::MAX_QUIET_ZONE;
        assert!(p.edge_px >= crate::config::MAX_QR_TARGET_PX);
        assert!(p.edge_px < crate::config::MAX_QR_TARGET_PX + total);
    }

    struct Checkerboard;

    impl SymbolEncoder for Checkerboard {
        fn encode(&self, _text: &str, _ecc: ErrorCorrection) -> Result<ModuleMatrix, RecordError> {
            let modules = (0..4).flat_map(|y| (0..4).map(move |x| (x + y) % 2 == 0)).collect();
            Ok(ModuleMatrix::from_modules(4, modules).unwrap())
        }
    }

    #[test]
    fn test_custom_encoder_is_used() {
        let vcard = to_vcard(&jane());
        let opts = PayloadOptions {
            ecc: ErrorCorrection::Low,
            target_px: 64,
            quiet_zone: 0,
        };
        let p = build_payload_with(&Checkerboard, &vcard, &opts).unwrap();
        assert_eq!(p.modules, 4);
        assert_eq!(p.edge_px, 64);
        let img = decode_png(&p);
        assert_eq!(img.get_pixel(0, 0)[0], 0);
        assert_eq!(img.get_pixel(16, 0)[0], 255);
    }
}
