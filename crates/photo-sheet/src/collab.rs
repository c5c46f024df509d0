//! Messages exchanged with the external processing service
//!
//! The workflow never performs a call itself. It emits an [`OutboundCall`]
//! describing the request, and later accepts the matching
//! [`CollaboratorResponse`] together with the call's [`CallTicket`].

use std::fmt;

use crate::caption::FontId;
use crate::types::Orientation;
use crate::upload::UploadFile;
use crate::viewport::CropRegion;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the passport image should be finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ProcessingMode {
    /// Fixed corrections suitable for official documents
    #[default]
    Passport,
    /// Corrections scaled by the chosen enhancement level
    Studio,
}

/// Identifies one outbound call within one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallTicket {
    /// Session generation the call was issued in
    pub generation: u64,
    /// Sequence number within the workflow
    pub sequence: u64,
    pub kind: CallKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    Upload,
    ApplyCrop,
    PreviewSheet,
    PreviewCaptionSheet,
    DownloadSheet,
    DownloadCaptionSheet,
    PrintSheet,
    ListPrinters,
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallKind::Upload => "upload",
            CallKind::ApplyCrop => "apply crop",
            CallKind::PreviewSheet => "sheet preview",
            CallKind::PreviewCaptionSheet => "caption sheet preview",
            CallKind::DownloadSheet => "sheet download",
            CallKind::DownloadCaptionSheet => "caption sheet download",
            CallKind::PrintSheet => "print",
            CallKind::ListPrinters => "printer listing",
        };
        f.write_str(name)
    }
}

/// A request the workflow wants sent to the collaborator
#[derive(Debug, Clone, PartialEq)]
pub enum CollaboratorRequest {
    Upload {
        file: UploadFile,
    },
    ApplyCrop {
        image_id: String,
        crop: CropRegion,
        mode: Option<ProcessingMode>,
        enhance_level: Option<f32>,
    },
    PreviewSheet {
        image_id: String,
        layout_key: String,
    },
    PreviewCaptionSheet {
        image_id: String,
        text1: String,
        text2: String,
        font: FontId,
    },
    DownloadSheet {
        image_id: String,
        layout_key: String,
    },
    DownloadCaptionSheet {
        image_id: String,
        text1: String,
        text2: String,
        font: FontId,
    },
    PrintSheet {
        image_id: String,
        layout_key: String,
        printer_id: Option<String>,
        copies: u32,
    },
    ListPrinters,
}

impl CollaboratorRequest {
    pub fn kind(&self) -> CallKind {
        match self {
            CollaboratorRequest::Upload { .. } => CallKind::Upload,
            CollaboratorRequest::ApplyCrop { .. } => CallKind::ApplyCrop,
            CollaboratorRequest::PreviewSheet { .. } => CallKind::PreviewSheet,
            CollaboratorRequest::PreviewCaptionSheet { .. } => CallKind::PreviewCaptionSheet,
            CollaboratorRequest::DownloadSheet { .. } => CallKind::DownloadSheet,
            CollaboratorRequest::DownloadCaptionSheet { .. } => CallKind::DownloadCaptionSheet,
            CollaboratorRequest::PrintSheet { .. } => CallKind::PrintSheet,
            CollaboratorRequest::ListPrinters => CallKind::ListPrinters,
        }
    }
}

/// A request paired with the ticket its response must present
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundCall {
    pub ticket: CallTicket,
    pub request: CollaboratorRequest,
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UploadReceipt {
    pub image_id: String,
    /// URL the display layer can load the original from
    pub display_url: String,
    pub face_detected: Option<bool>,
    /// Natural (width, height) of the stored image
    pub natural_dimensions: (u32, u32),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProcessedImage {
    pub processed_image_id: String,
    /// URL of the processed photo
    pub processed_image: String,
    pub before_image: Option<String>,
    pub after_image: Option<String>,
    pub face_confidence: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutInfo {
    pub photo_count: u32,
    pub orientation: Orientation,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SheetPreview {
    pub preview_image: String,
    /// Reported by sheet previews; caption previews leave it empty
    pub layout_info: Option<LayoutInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SheetDownload {
    pub file_url: String,
    pub filename: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrintReceipt {
    pub status: String,
    pub printer_used: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrinterInfo {
    pub name: String,
    pub is_default: bool,
    pub supports_color: bool,
    pub status: String,
}

/// Successful collaborator results, one variant per call kind
#[derive(Debug, Clone, PartialEq)]
pub enum CollaboratorResponse {
    Uploaded(UploadReceipt),
    CropApplied(ProcessedImage),
    SheetPreviewed(SheetPreview),
    CaptionSheetPreviewed(SheetPreview),
    Downloaded(SheetDownload),
    Printed(PrintReceipt),
    Printers(Vec<PrinterInfo>),
}

impl CollaboratorResponse {
    pub fn kind(&self) -> CallKind {
        match self {
            CollaboratorResponse::Uploaded(_) => CallKind::Upload,
            CollaboratorResponse::CropApplied(_) => CallKind::ApplyCrop,
            CollaboratorResponse::SheetPreviewed(_) => CallKind::PreviewSheet,
            CollaboratorResponse::CaptionSheetPreviewed(_) => CallKind::PreviewCaptionSheet,
            CollaboratorResponse::Downloaded(_) => CallKind::DownloadSheet,
            CollaboratorResponse::Printed(_) => CallKind::PrintSheet,
            CollaboratorResponse::Printers(_) => CallKind::ListPrinters,
        }
    }

    /// Whether this response can answer a call of `kind`
    pub fn answers(&self, kind: CallKind) -> bool {
        match (self, kind) {
            (CollaboratorResponse::Downloaded(_), CallKind::DownloadCaptionSheet) => true,
            _ => self.kind() == kind,
        }
    }
}

/// Why a call failed
#[derive(Debug, Clone, PartialEq)]
pub enum CallFailure {
    /// The service could not complete the request
    Collaborator(crate::types::CollaboratorError),
    /// No printer is reachable; downloading still works
    NoPrinter,
    /// The service does not offer this operation
    Unsupported,
}
