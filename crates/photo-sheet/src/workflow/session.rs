use std::fmt;

use crate::caption::CaptionSet;
use crate::collab::*;
use crate::constants::DEFAULT_ENHANCE_LEVEL;
use crate::layout::{PaperType, Product};
use crate::types::ValidationError;
use crate::viewport::CropRegion;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The uploaded source photo as stored by the collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImageAsset {
    pub id: String,
    pub display_url: String,
    pub natural_width: u32,
    pub natural_height: u32,
    pub face_detected: Option<bool>,
}

impl From<UploadReceipt> for ImageAsset {
    fn from(receipt: UploadReceipt) -> Self {
        Self {
            id: receipt.image_id,
            display_url: receipt.display_url,
            natural_width: receipt.natural_dimensions.0,
            natural_height: receipt.natural_dimensions.1,
            face_detected: receipt.face_detected,
        }
    }
}

/// Passport finishing options
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnhancementSettings {
    pub mode: ProcessingMode,
    /// Strength of studio corrections, 0.0..=1.0
    pub level: f32,
}

impl Default for EnhancementSettings {
    fn default() -> Self {
        Self {
            mode: ProcessingMode::Passport,
            level: DEFAULT_ENHANCE_LEVEL,
        }
    }
}

impl EnhancementSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.level) {
            return Err(ValidationError::EnhanceLevel(self.level));
        }
        Ok(())
    }

    /// Level sent to the collaborator; passport mode uses fixed corrections.
    pub fn effective_level(&self) -> Option<f32> {
        match self.mode {
            ProcessingMode::Passport => None,
            ProcessingMode::Studio => Some(self.level),
        }
    }
}

/// Something the user should know about even though the step succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Warning {
    /// The composited preview failed; the processed photo is shown instead
    PreviewFallback { reason: String },
    /// The uploaded photo did not contain a detectable face
    NoFaceDetected,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::PreviewFallback { reason } => write!(
                f,
                "Sheet preview unavailable ({reason}); showing the processed photo instead"
            ),
            Warning::NoFaceDetected => write!(f, "No face detected in the uploaded photo"),
        }
    }
}

/// Data collected during one run of the workflow
///
/// Replaced wholesale on reset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowSession {
    pub product: Option<Product>,
    pub paper_type: Option<PaperType>,
    pub image: Option<ImageAsset>,
    pub crop: Option<CropRegion>,
    /// Polaroid only
    pub captions: Option<CaptionSet>,
    /// Passport only
    pub enhancement: Option<EnhancementSettings>,
    pub processed: Option<ProcessedImage>,
    pub preview: Option<SheetPreview>,
    pub download: Option<SheetDownload>,
    pub print: Option<PrintReceipt>,
    pub printers: Option<Vec<PrinterInfo>>,
    pub warnings: Vec<Warning>,
    /// Message of the most recent failed call
    pub last_error: Option<String>,
}

impl WorkflowSession {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Forget everything derived from the crop onwards.
    pub(crate) fn clear_processing(&mut self) {
        self.processed = None;
        self.clear_output();
    }

    /// Forget everything derived from the preview onwards.
    pub(crate) fn clear_output(&mut self) {
        self.preview = None;
        self.download = None;
        self.print = None;
    }
}
