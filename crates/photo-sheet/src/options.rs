use crate::caption::FontId;
use crate::collab::ProcessingMode;
use crate::constants::*;
use crate::layout::Product;
use crate::types::*;
use crate::viewport::FrameSpec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tunable studio settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StudioOptions {
    // Zoom limits per frame
    pub passport_zoom_min: f64,
    pub passport_zoom_max: f64,
    pub polaroid_zoom_min: f64,
    pub polaroid_zoom_max: f64,
    pub zoom_step: f64,

    // Upload
    pub max_upload_bytes: u64,

    // Enhancement defaults
    pub default_mode: ProcessingMode,
    pub default_enhance_level: f32,

    // Captions
    pub default_font: FontId,

    // Printing
    pub default_copies: u32,

    /// Show the processed photo when the sheet preview fails
    pub allow_preview_fallback: bool,
}

impl Default for StudioOptions {
    fn default() -> Self {
        Self {
            passport_zoom_min: PASSPORT_ZOOM_MIN,
            passport_zoom_max: PASSPORT_ZOOM_MAX,
            polaroid_zoom_min: POLAROID_ZOOM_MIN,
            polaroid_zoom_max: POLAROID_ZOOM_MAX,
            zoom_step: ZOOM_STEP,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            default_mode: ProcessingMode::Passport,
            default_enhance_level: DEFAULT_ENHANCE_LEVEL,
            default_font: FontId::Default,
            default_copies: 1,
            allow_preview_fallback: false,
        }
    }
}

impl StudioOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| SheetError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SheetError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        check_zoom_range("passport", self.passport_zoom_min, self.passport_zoom_max)?;
        check_zoom_range("polaroid", self.polaroid_zoom_min, self.polaroid_zoom_max)?;

        if !(self.zoom_step.is_finite() && self.zoom_step > 0.0) {
            return Err(SheetError::Config(format!(
                "Zoom step must be positive, got {}",
                self.zoom_step
            )));
        }

        if self.max_upload_bytes == 0 {
            return Err(SheetError::Config(
                "Upload size limit must be greater than zero".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.default_enhance_level) {
            return Err(SheetError::Config(format!(
                "Default enhancement level {} is outside 0.0..=1.0",
                self.default_enhance_level
            )));
        }

        if self.default_copies == 0 {
            return Err(SheetError::Config(
                "Default copy count must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Crop frame for a product with the configured zoom limits applied
    pub fn frame_for(&self, product: Product) -> FrameSpec {
        let mut frame = FrameSpec::for_product(product);
        match product {
            Product::Passport => {
                frame.zoom_min = self.passport_zoom_min;
                frame.zoom_max = self.passport_zoom_max;
            }
            Product::Polaroid => {
                frame.zoom_min = self.polaroid_zoom_min;
                frame.zoom_max = self.polaroid_zoom_max;
            }
        }
        frame
    }
}

fn check_zoom_range(name: &str, min: f64, max: f64) -> Result<()> {
    if !(min.is_finite() && max.is_finite()) || min <= 0.0 || min > max {
        return Err(SheetError::Config(format!(
            "Invalid {name} zoom range {min}..={max}"
        )));
    }
    if !(min..=max).contains(&1.0) {
        return Err(SheetError::Config(format!(
            "The {name} zoom range {min}..={max} must include 1.0"
        )));
    }
    Ok(())
}
