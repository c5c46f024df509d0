mod collaborator;
mod logger;
mod worker;

pub use collaborator::{Collaborator, dispatch, run_call};
pub use logger::{AppLogger, LogEntry};
pub use worker::{RuntimeError, SessionHandle, worker_task};

// Re-export types from the library crate
pub use photo_sheet::{
    CallFailure, CallKind, CaptionFieldErrors, CollaboratorError, CollaboratorRequest,
    CollaboratorResponse, EnhancementSettings, FontId, PaperType, Point, PrinterInfo, Product,
    Size, Step, StudioOptions, UploadFile, ViewportState, WorkflowSession,
};

/// Commands sent from UI to worker
#[derive(Debug)]
pub enum SessionCommand {
    Upload {
        file: UploadFile,
    },
    SelectProduct {
        product: Product,
        container: Size,
    },
    /// The display finished loading the image at this natural size
    ImageLoaded {
        width: u32,
        height: u32,
    },
    Zoom {
        zoom: f64,
    },
    ZoomIn,
    ZoomOut,
    DragStart {
        pointer: Point,
    },
    DragMove {
        pointer: Point,
    },
    DragEnd,
    ResetView,
    ConfirmCrop,
    SetEnhancement {
        settings: EnhancementSettings,
    },
    ConfirmEnhancement,
    SetCaptions {
        text1: String,
        text2: String,
    },
    SetFont {
        font: FontId,
    },
    CopyFirstCaption,
    ClearCaptions,
    ConfirmCaptions,
    SelectLayout {
        paper_type: PaperType,
    },
    ConfirmLayout,
    Download,
    Print {
        printer_id: Option<String>,
        copies: Option<u32>,
    },
    ListPrinters,
    Back,
    Reset,
}

/// Updates sent from worker to UI
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    StepChanged {
        step: Step,
    },
    CallStarted {
        kind: CallKind,
    },
    /// Fresh copy of the session after a call succeeded
    SessionChanged {
        session: Box<WorkflowSession>,
    },
    Viewport {
        state: ViewportState,
    },
    CaptionErrors {
        errors: CaptionFieldErrors,
    },
    Printers {
        printers: Vec<PrinterInfo>,
    },
    Warning {
        message: String,
    },
    /// Printing is impossible; the UI should offer the download instead
    NoPrinter {
        message: String,
    },
    Error {
        message: String,
    },
}
