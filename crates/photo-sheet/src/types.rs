use thiserror::Error;

use crate::caption::CaptionError;
use crate::layout::PaperType;
use crate::workflow::{Step, WorkflowAction};

#[derive(Error, Debug)]
pub enum SheetError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
    #[error(transparent)]
    Environment(#[from] EnvironmentError),
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SheetError>;

/// Problems caught locally, before anything is sent to the collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Unsupported file type: {0} (JPG or PNG required)")]
    UnsupportedFileType(String),
    #[error("File is {size_bytes} bytes, the limit is {limit_bytes} bytes")]
    FileTooLarge { size_bytes: u64, limit_bytes: u64 },
    #[error("File is empty")]
    EmptyFile,
    #[error("Image has not finished loading")]
    ImageNotLoaded,
    #[error("Invalid crop: {0}")]
    InvalidCrop(String),
    #[error("Invalid captions: {0}")]
    Captions(CaptionFieldErrors),
    #[error("Unknown font: {0}")]
    UnknownFont(String),
    #[error("Enhancement level {0} is outside 0.0..=1.0")]
    EnhanceLevel(f32),
    #[error("Copies must be at least 1")]
    NoCopies,
    #[error("Paper type {0} is not available for this product")]
    PaperType(PaperType),
}

/// Per-field caption failures; either field may be valid on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptionFieldErrors {
    pub text1: Option<CaptionError>,
    pub text2: Option<CaptionError>,
}

impl CaptionFieldErrors {
    pub fn is_empty(&self) -> bool {
        self.text1.is_none() && self.text2.is_none()
    }
}

impl std::fmt::Display for CaptionFieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if let Some(e) = self.text1 {
            parts.push(format!("first caption: {e}"));
        }
        if let Some(e) = self.text2 {
            parts.push(format!("second caption: {e}"));
        }
        write!(f, "{}", parts.join("; "))
    }
}

/// A failed remote call. Always retryable; the session is left as it was.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{operation} failed: {message}")]
pub struct CollaboratorError {
    pub operation: String,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    #[error("No printer available; download the sheet and print it manually")]
    NoPrinterAvailable,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Another request is still in progress")]
    Busy,
    #[error("Cannot {action} while at step {step:?}")]
    InvalidTransition { step: Step, action: WorkflowAction },
    #[error("Response belongs to a previous session and was discarded")]
    StaleResponse,
    #[error("Response does not match the pending request")]
    UnexpectedResponse,
}

/// Sheet orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Orientation {
    /// Portrait: height > width
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

impl Orientation {
    /// Orient a (short, long) pair of edge lengths.
    pub fn apply<T>(self, short: T, long: T) -> (T, T) {
        match self {
            Orientation::Portrait => (short, long),
            Orientation::Landscape => (long, short),
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Portrait => write!(f, "portrait"),
            Orientation::Landscape => write!(f, "landscape"),
        }
    }
}
