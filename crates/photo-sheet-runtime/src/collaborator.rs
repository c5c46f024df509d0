use std::future::Future;

use photo_sheet::{
    Advance, CallFailure, CollaboratorRequest, CollaboratorResponse, CropRegion, FontId,
    PrintReceipt, PrinterInfo, ProcessedImage, ProcessingMode, SheetDownload, SheetPreview, Step,
    UploadFile, UploadReceipt, Workflow,
};

/// The remote image-processing service
///
/// Implementations own transport and storage. Every method either returns
/// the service's result or a [`CallFailure`]; nothing is retried here.
pub trait Collaborator: Send + Sync + 'static {
    fn upload_image(
        &self,
        file: UploadFile,
    ) -> impl Future<Output = Result<UploadReceipt, CallFailure>> + Send;

    fn apply_crop(
        &self,
        image_id: String,
        crop: CropRegion,
        mode: Option<ProcessingMode>,
        enhance_level: Option<f32>,
    ) -> impl Future<Output = Result<ProcessedImage, CallFailure>> + Send;

    fn preview_sheet(
        &self,
        image_id: String,
        layout_key: String,
    ) -> impl Future<Output = Result<SheetPreview, CallFailure>> + Send;

    fn download_sheet(
        &self,
        image_id: String,
        layout_key: String,
    ) -> impl Future<Output = Result<SheetDownload, CallFailure>> + Send;

    /// Fails with [`CallFailure::NoPrinter`] when nothing can print.
    fn print_sheet(
        &self,
        image_id: String,
        layout_key: String,
        printer_id: Option<String>,
        copies: u32,
    ) -> impl Future<Output = Result<PrintReceipt, CallFailure>> + Send;

    fn preview_caption_sheet(
        &self,
        image_id: String,
        text1: String,
        text2: String,
        font: FontId,
    ) -> impl Future<Output = Result<SheetPreview, CallFailure>> + Send;

    fn download_caption_sheet(
        &self,
        image_id: String,
        text1: String,
        text2: String,
        font: FontId,
    ) -> impl Future<Output = Result<SheetDownload, CallFailure>> + Send;

    /// Printers known to the service. Optional; services without printer
    /// discovery report [`CallFailure::Unsupported`].
    fn list_printers(&self) -> impl Future<Output = Result<Vec<PrinterInfo>, CallFailure>> + Send {
        async { Err(CallFailure::Unsupported) }
    }
}

/// Send one request to the collaborator and wrap the result.
pub async fn dispatch<C: Collaborator>(
    collaborator: &C,
    request: CollaboratorRequest,
) -> Result<CollaboratorResponse, CallFailure> {
    log::debug!("Dispatching {} request", request.kind());
    match request {
        CollaboratorRequest::Upload { file } => collaborator
            .upload_image(file)
            .await
            .map(CollaboratorResponse::Uploaded),
        CollaboratorRequest::ApplyCrop {
            image_id,
            crop,
            mode,
            enhance_level,
        } => collaborator
            .apply_crop(image_id, crop, mode, enhance_level)
            .await
            .map(CollaboratorResponse::CropApplied),
        CollaboratorRequest::PreviewSheet {
            image_id,
            layout_key,
        } => collaborator
            .preview_sheet(image_id, layout_key)
            .await
            .map(CollaboratorResponse::SheetPreviewed),
        CollaboratorRequest::PreviewCaptionSheet {
            image_id,
            text1,
            text2,
            font,
        } => collaborator
            .preview_caption_sheet(image_id, text1, text2, font)
            .await
            .map(CollaboratorResponse::CaptionSheetPreviewed),
        CollaboratorRequest::DownloadSheet {
            image_id,
            layout_key,
        } => collaborator
            .download_sheet(image_id, layout_key)
            .await
            .map(CollaboratorResponse::Downloaded),
        CollaboratorRequest::DownloadCaptionSheet {
            image_id,
            text1,
            text2,
            font,
        } => collaborator
            .download_caption_sheet(image_id, text1, text2, font)
            .await
            .map(CollaboratorResponse::Downloaded),
        CollaboratorRequest::PrintSheet {
            image_id,
            layout_key,
            printer_id,
            copies,
        } => collaborator
            .print_sheet(image_id, layout_key, printer_id, copies)
            .await
            .map(CollaboratorResponse::Printed),
        CollaboratorRequest::ListPrinters => collaborator
            .list_printers()
            .await
            .map(CollaboratorResponse::Printers),
    }
}

/// Perform the call an action produced, if any, and feed the outcome back.
///
/// For callers that do not need the worker task, such as scripts and tests.
pub async fn run_call<C: Collaborator>(
    workflow: &mut Workflow,
    collaborator: &C,
    advance: Advance,
) -> photo_sheet::Result<Step> {
    match advance {
        Advance::Moved(step) => Ok(step),
        Advance::Call(call) => {
            let outcome = dispatch(collaborator, call.request).await;
            workflow.complete(call.ticket, outcome)
        }
    }
}
