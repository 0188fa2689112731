//! Configuration types for contact-card generation.
//!
//! All batch behaviour is controlled through [`GeneratorConfig`], built via
//! its [`GeneratorConfigBuilder`]. Every knob lives in one struct so two runs
//! can be compared by diffing their configs.

use crate::error::CardGenError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Smallest accepted QR target edge, in pixels.
pub const MIN_QR_TARGET_PX: u32 = 64;
/// Largest accepted QR target edge, in pixels.
pub const MAX_QR_TARGET_PX: u32 = 2048;
/// Largest accepted quiet zone, in modules.
pub const MAX_QUIET_ZONE: u32 = 16;

/// Configuration for a contact-card batch.
///
/// Built via [`GeneratorConfig::builder()`] or using
/// [`GeneratorConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_cardgen::{ErrorCorrection, GeneratorConfig};
///
/// let config = GeneratorConfig::builder()
///     .input_dir("cards")
///     .output_dir("site")
///     .ecc(ErrorCorrection::Quartile)
///     .qr_target_px(256)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct GeneratorConfig {
    /// Directory scanned for `*.json` records. Default: `input`.
    pub input_dir: PathBuf,

    /// Directory receiving the generated `*.html` documents. Default: `output`.
    pub output_dir: PathBuf,

    /// Custom HTML template. If None, the built-in card template is used.
    ///
    /// The template must use the same `{{slot}}` names as the built-in one;
    /// see [`crate::pipeline::page`].
    pub template_path: Option<PathBuf>,

    /// QR error-correction level. Default: [`ErrorCorrection::Medium`].
    ///
    /// Medium survives roughly 15 % symbol damage, which covers glare and
    /// creases on a printed card while leaving room for a full vCard.
    pub ecc: ErrorCorrection,

    /// Minimum edge of the rendered QR image in pixels. Range: 64–2048. Default: 200.
    ///
    /// Modules are scaled by a whole number of pixels, so the final edge is
    /// the smallest multiple of the module count that reaches this target.
    pub qr_target_px: u32,

    /// Light border around the symbol, in modules. Default: 4.
    ///
    /// Four modules is the quiet zone the QR standard asks for; scanners may
    /// fail to lock on with less.
    pub quiet_zone: u32,

    /// Overwrite documents already present in `output_dir`. Default: false.
    ///
    /// When false, the stems of existing `*.html` files count as taken names
    /// and new documents get a numeric suffix instead.
    pub overwrite: bool,

    /// Optional per-record progress observer.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            template_path: None,
            ecc: ErrorCorrection::default(),
            qr_target_px: 200,
            quiet_zone: 4,
            overwrite: false,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field("template_path", &self.template_path)
            .field("ecc", &self.ecc)
            .field("qr_target_px", &self.qr_target_px)
            .field("quiet_zone", &self.quiet_zone)
            .field("overwrite", &self.overwrite)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl GeneratorConfig {
    /// Create a new builder for `GeneratorConfig`.
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder {
            config: Self::default(),
        }
    }

    /// The subset of settings the payload builder needs.
    pub fn payload_options(&self) -> PayloadOptions {
        PayloadOptions {
            ecc: self.ecc,
            target_px: self.qr_target_px,
            quiet_zone: self.quiet_zone,
        }
    }
}

/// Builder for [`GeneratorConfig`].
#[derive(Debug)]
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.template_path = Some(path.into());
        self
    }

    pub fn ecc(mut self, ecc: ErrorCorrection) -> Self {
        self.config.ecc = ecc;
        self
    }

    pub fn qr_target_px(mut self, px: u32) -> Self {
        self.config.qr_target_px = px.clamp(MIN_QR_TARGET_PX, MAX_QR_TARGET_PX);
        self
    }

    pub fn quiet_zone(mut self, modules: u32) -> Self {
        self.config.quiet_zone = modules;
        self
    }

    pub fn overwrite(mut self, v: bool) -> Self {
        self.config.overwrite = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GeneratorConfig, CardGenError> {
        let c = &self.config;
        if c.quiet_zone > MAX_QUIET_ZONE {
            return Err(CardGenError::InvalidConfig(format!(
                "Quiet zone must be 0–{MAX_QUIET_ZONE} modules, got {}",
                c.quiet_zone
            )));
        }
        if c.input_dir.as_os_str().is_empty() || c.output_dir.as_os_str().is_empty() {
            return Err(CardGenError::InvalidConfig(
                "Input and output directories must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Settings consumed by [`crate::pipeline::encode::build_payload`].
///
/// Out-of-range values are clamped by the payload builder, see
/// [`PayloadOptions::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadOptions {
    pub ecc: ErrorCorrection,
    pub target_px: u32,
    pub quiet_zone: u32,
}

impl PayloadOptions {
    /// Bring `target_px` into 64–2048 and cap `quiet_zone` at 16 modules.
    pub fn clamped(self) -> Self {
        Self {
            ecc: self.ecc,
            target_px: self.target_px.clamp(MIN_QR_TARGET_PX, MAX_QR_TARGET_PX),
            quiet_zone: self.quiet_zone.min(MAX_QUIET_ZONE),
        }
    }
}

impl Default for PayloadOptions {
    fn default() -> Self {
        GeneratorConfig::default().payload_options()
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// QR error-correction level.
///
/// Higher levels survive more damage but hold less data:
///
/// | Level | Recoverable | Max bytes (v40) |
/// |-------|-------------|-----------------|
/// | Low      | ~7 %  | 2953 |
/// | Medium   | ~15 % | 2331 |
/// | Quartile | ~25 % | 1663 |
/// | High     | ~30 % | 1273 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCorrection {
    Low,
    #[default]
    Medium,
    Quartile,
    High,
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCorrection::Low => "low",
            ErrorCorrection::Medium => "medium",
            ErrorCorrection::Quartile => "quartile",
            ErrorCorrection::High => "high",
        };
        f.write_str(s)
    }
}
