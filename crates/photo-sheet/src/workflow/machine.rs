use log::{debug, info, warn};

use crate::caption::{CaptionSet, FontId};
use crate::collab::*;
use crate::layout::{PaperLayoutSpec, PaperType, Product, layout_for};
use crate::options::StudioOptions;
use crate::types::*;
use crate::upload::UploadFile;
use crate::viewport::{CropRegion, Size, ViewportEngine};

use super::session::*;
use super::step::*;

/// What a forward action led to
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Moved to a new step without contacting the collaborator
    Moved(Step),
    /// The call must be sent; the step changes once it completes
    Call(OutboundCall),
}

impl Advance {
    pub fn call(self) -> Option<OutboundCall> {
        match self {
            Advance::Call(call) => Some(call),
            Advance::Moved(_) => None,
        }
    }
}

/// Relative drift allowed between the crop and frame aspect ratios
const CROP_ASPECT_TOLERANCE: f64 = 1e-3;

#[derive(Debug, Clone)]
struct PendingCall {
    ticket: CallTicket,
    route: &'static Route,
    /// Step to return to if the call fails
    origin: Step,
}

/// Values a guard needs that are not part of the session
#[derive(Default)]
struct GuardInput<'a> {
    upload: Option<&'a UploadFile>,
    copies: Option<u32>,
}

/// The step-by-step sheet workflow
///
/// The machine is synchronous and never talks to the collaborator itself.
/// Forward actions that need remote work return [`Advance::Call`]; the
/// caller performs the call and hands the outcome back through
/// [`complete`](Self::complete) together with the call's ticket.
///
/// At most one call is outstanding at a time. Every call is stamped with
/// the session generation, which [`reset`](Self::reset) bumps, so late
/// responses from an abandoned session are rejected instead of applied.
#[derive(Debug, Clone)]
pub struct Workflow {
    options: StudioOptions,
    step: Step,
    session: WorkflowSession,
    viewport: Option<ViewportEngine>,
    generation: u64,
    sequence: u64,
    pending: Option<PendingCall>,
}

impl Default for Workflow {
    fn default() -> Self {
        Self::with_checked_options(StudioOptions::default())
    }
}

impl Workflow {
    /// Start a workflow. Fails with [`SheetError::Config`] when the options
    /// do not validate.
    pub fn new(options: StudioOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::with_checked_options(options))
    }

    fn with_checked_options(options: StudioOptions) -> Self {
        Self {
            options,
            step: Step::Upload,
            session: WorkflowSession::default(),
            viewport: None,
            generation: 0,
            sequence: 0,
            pending: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn session(&self) -> &WorkflowSession {
        &self.session
    }

    pub fn options(&self) -> &StudioOptions {
        &self.options
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a collaborator call is outstanding
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_ticket(&self) -> Option<CallTicket> {
        self.pending.as_ref().map(|p| p.ticket)
    }

    /// Layout of the currently selected paper type
    pub fn layout(&self) -> Option<PaperLayoutSpec> {
        self.session.paper_type.map(layout_for)
    }

    /// Actions accepted in the current state
    pub fn available_actions(&self) -> Vec<WorkflowAction> {
        if self.is_busy() {
            return Vec::new();
        }
        let product = self.session.product;
        let mut actions: Vec<_> = routes_from(self.step, product).map(|r| r.action).collect();
        let edit = match self.step {
            Step::Crop => Some(WorkflowAction::AdjustViewport),
            Step::Enhance => Some(WorkflowAction::EditEnhancement),
            Step::CaptionText => Some(WorkflowAction::EditCaptions),
            Step::LayoutSelect => Some(WorkflowAction::SelectLayout),
            _ => None,
        };
        actions.extend(edit);
        if self.step.back_target(product).is_some() {
            actions.push(WorkflowAction::Back);
        }
        actions
    }

    // =========================================================================
    // Upload and product
    // =========================================================================

    pub fn submit_upload(&mut self, file: UploadFile) -> Result<Advance> {
        let route = self.route_for(WorkflowAction::SubmitUpload)?;
        self.check_guard(
            route,
            &GuardInput {
                upload: Some(&file),
                ..Default::default()
            },
        )?;
        info!("Uploading {} ({} bytes)", file.name, file.size_bytes());
        Ok(self.begin(route, Some(CollaboratorRequest::Upload { file })))
    }

    /// Choose the product and open the crop step.
    ///
    /// `container` is the size of the crop area in display pixels.
    pub fn select_product(&mut self, product: Product, container: Size) -> Result<Advance> {
        let route = self.route_for(WorkflowAction::SelectProduct)?;
        self.check_guard(route, &GuardInput::default())?;

        if self.session.product != Some(product) {
            self.session.paper_type = Some(product.default_paper_type());
            self.session.crop = None;
            self.session.clear_processing();
            match product {
                Product::Passport => {
                    self.session.captions = None;
                    self.session.enhancement = Some(EnhancementSettings {
                        mode: self.options.default_mode,
                        level: self.options.default_enhance_level,
                    });
                }
                Product::Polaroid => {
                    self.session.enhancement = None;
                    self.session.captions =
                        Some(CaptionSet::new("", "", self.options.default_font));
                }
            }
        }
        self.session.product = Some(product);

        let mut engine = ViewportEngine::new(self.options.frame_for(product), container)
            .with_zoom_step(self.options.zoom_step);
        if let Some(image) = &self.session.image {
            engine.set_natural_size(image.natural_width, image.natural_height);
        }
        self.viewport = Some(engine);

        Ok(self.begin(route, None))
    }

    // =========================================================================
    // Crop
    // =========================================================================

    pub fn viewport(&self) -> Option<&ViewportEngine> {
        self.viewport.as_ref()
    }

    /// Pan/zoom access; only while cropping.
    pub fn viewport_mut(&mut self) -> Result<&mut ViewportEngine> {
        self.require(Step::Crop, WorkflowAction::AdjustViewport)?;
        self.viewport
            .as_mut()
            .ok_or_else(|| ValidationError::ImageNotLoaded.into())
    }

    /// Crop region for the current view, validated
    ///
    /// The crop must keep the frame's aspect ratio. A fixed frame that
    /// reaches past the image edge (for example when zoomed out) is refused.
    pub fn current_crop(&self) -> Result<CropRegion> {
        let viewport = self.viewport.as_ref().ok_or(ValidationError::ImageNotLoaded)?;
        let crop = viewport.compute_crop_region()?;
        crop.validate()?;
        let expected = viewport.frame().aspect_ratio;
        let actual = crop.pixel_aspect_ratio();
        if (actual / expected - 1.0).abs() > CROP_ASPECT_TOLERANCE {
            return Err(ValidationError::InvalidCrop(format!(
                "frame extends past the image (aspect {actual:.3}, expected {expected:.3})"
            ))
            .into());
        }
        Ok(crop)
    }

    pub fn confirm_crop(&mut self) -> Result<Advance> {
        let route = self.route_for(WorkflowAction::ConfirmCrop)?;
        self.check_guard(route, &GuardInput::default())?;
        let crop = self.current_crop()?;
        debug!(
            "Crop confirmed: x={:.4} y={:.4} w={:.4} h={:.4} zoom={:.2}",
            crop.x, crop.y, crop.width, crop.height, crop.zoom
        );
        self.session.crop = Some(crop);

        let request = match route.call {
            Some(CallKind::ApplyCrop) => Some(CollaboratorRequest::ApplyCrop {
                image_id: self.image_id()?,
                crop,
                mode: None,
                enhance_level: None,
            }),
            _ => None,
        };
        Ok(self.begin(route, request))
    }

    // =========================================================================
    // Enhancement (passport)
    // =========================================================================

    pub fn set_enhancement(&mut self, settings: EnhancementSettings) -> Result<()> {
        self.require(Step::Enhance, WorkflowAction::EditEnhancement)?;
        settings.validate()?;
        self.session.enhancement = Some(settings);
        Ok(())
    }

    pub fn confirm_enhancement(&mut self) -> Result<Advance> {
        let route = self.route_for(WorkflowAction::ConfirmEnhancement)?;
        self.check_guard(route, &GuardInput::default())?;
        let settings = self.session.enhancement.unwrap_or_default();
        let crop = self
            .session
            .crop
            .ok_or_else(|| ValidationError::InvalidCrop("no crop confirmed".into()))?;
        let request = CollaboratorRequest::ApplyCrop {
            image_id: self.image_id()?,
            crop,
            mode: Some(settings.mode),
            enhance_level: settings.effective_level(),
        };
        Ok(self.begin(route, Some(request)))
    }

    // =========================================================================
    // Captions (polaroid)
    // =========================================================================

    pub fn captions_mut(&mut self) -> Result<&mut CaptionSet> {
        self.require(Step::CaptionText, WorkflowAction::EditCaptions)?;
        let font = self.options.default_font;
        Ok(self
            .session
            .captions
            .get_or_insert_with(|| CaptionSet::new("", "", font)))
    }

    /// Replace both captions and report per-field problems.
    pub fn set_captions(
        &mut self,
        text1: impl Into<String>,
        text2: impl Into<String>,
    ) -> Result<CaptionFieldErrors> {
        let captions = self.captions_mut()?;
        captions.text1 = text1.into();
        captions.text2 = text2.into();
        Ok(captions.field_errors())
    }

    pub fn set_font(&mut self, font: FontId) -> Result<()> {
        self.captions_mut()?.font = font;
        Ok(())
    }

    pub fn copy_first_caption(&mut self) -> Result<()> {
        self.captions_mut()?.copy_first_to_second().map_err(|e| {
            ValidationError::Captions(CaptionFieldErrors {
                text1: None,
                text2: Some(e),
            })
            .into()
        })
    }

    pub fn clear_captions(&mut self) -> Result<()> {
        self.captions_mut()?.clear();
        Ok(())
    }

    pub fn confirm_captions(&mut self) -> Result<Advance> {
        let route = self.route_for(WorkflowAction::ConfirmCaptions)?;
        self.check_guard(route, &GuardInput::default())?;
        let image_id = self.processed_id(WorkflowAction::ConfirmCaptions)?;
        let captions = self.session.captions.clone().unwrap_or_default();
        let request = CollaboratorRequest::PreviewCaptionSheet {
            image_id,
            text1: captions.text1,
            text2: captions.text2,
            font: captions.font,
        };
        Ok(self.begin(route, Some(request)))
    }

    // =========================================================================
    // Layout (passport)
    // =========================================================================

    pub fn select_layout(&mut self, paper_type: PaperType) -> Result<()> {
        self.require(Step::LayoutSelect, WorkflowAction::SelectLayout)?;
        if Some(paper_type.product()) != self.session.product {
            return Err(ValidationError::PaperType(paper_type).into());
        }
        if self.session.paper_type != Some(paper_type) {
            self.session.paper_type = Some(paper_type);
            self.session.clear_output();
        }
        Ok(())
    }

    pub fn confirm_layout(&mut self) -> Result<Advance> {
        let route = self.route_for(WorkflowAction::ConfirmLayout)?;
        self.check_guard(route, &GuardInput::default())?;
        let request = CollaboratorRequest::PreviewSheet {
            image_id: self.processed_id(WorkflowAction::ConfirmLayout)?,
            layout_key: self.layout_key().to_string(),
        };
        Ok(self.begin(route, Some(request)))
    }

    // =========================================================================
    // Output
    // =========================================================================

    pub fn request_download(&mut self) -> Result<Advance> {
        let route = self.route_for(WorkflowAction::Download)?;
        self.check_guard(route, &GuardInput::default())?;
        let image_id = self.processed_id(WorkflowAction::Download)?;
        let request = match route.call {
            Some(CallKind::DownloadCaptionSheet) => {
                let captions = self.session.captions.clone().unwrap_or_default();
                CollaboratorRequest::DownloadCaptionSheet {
                    image_id,
                    text1: captions.text1,
                    text2: captions.text2,
                    font: captions.font,
                }
            }
            _ => CollaboratorRequest::DownloadSheet {
                image_id,
                layout_key: self.layout_key().to_string(),
            },
        };
        Ok(self.begin(route, Some(request)))
    }

    /// Print the sheet. `copies` defaults to the configured count.
    pub fn request_print(&mut self, printer_id: Option<String>, copies: Option<u32>) -> Result<Advance> {
        let route = self.route_for(WorkflowAction::Print)?;
        let copies = copies.unwrap_or(self.options.default_copies);
        self.check_guard(
            route,
            &GuardInput {
                copies: Some(copies),
                ..Default::default()
            },
        )?;
        let request = CollaboratorRequest::PrintSheet {
            image_id: self.processed_id(WorkflowAction::Print)?,
            layout_key: self.layout_key().to_string(),
            printer_id,
            copies,
        };
        Ok(self.begin(route, Some(request)))
    }

    pub fn list_printers(&mut self) -> Result<Advance> {
        let route = self.route_for(WorkflowAction::ListPrinters)?;
        Ok(self.begin(route, Some(CollaboratorRequest::ListPrinters)))
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Return to the previous step, keeping the data entered there.
    pub fn back(&mut self) -> Result<Step> {
        self.ensure_idle()?;
        let target = self
            .step
            .back_target(self.session.product)
            .ok_or(WorkflowError::InvalidTransition {
                step: self.step,
                action: WorkflowAction::Back,
            })?;
        self.enter(target);
        Ok(target)
    }

    /// Start over with an empty session.
    ///
    /// Any outstanding call is abandoned; its response will be rejected.
    pub fn reset(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!("Abandoning pending {} call", pending.ticket.kind);
        }
        self.generation += 1;
        self.session = WorkflowSession::default();
        self.viewport = None;
        info!("Workflow reset (generation {})", self.generation);
        self.enter(Step::Upload);
    }

    // =========================================================================
    // Completions
    // =========================================================================

    /// Apply the outcome of an outbound call.
    ///
    /// On success the workflow moves to the route's target step. On failure
    /// it returns to the step the call was issued from and the error is
    /// returned. Responses from an earlier generation, or for a call that is
    /// no longer pending, fail with [`WorkflowError::StaleResponse`] and
    /// change nothing.
    pub fn complete(
        &mut self,
        ticket: CallTicket,
        outcome: std::result::Result<CollaboratorResponse, CallFailure>,
    ) -> Result<Step> {
        if ticket.generation != self.generation {
            warn!(
                "Discarding {} response from generation {} (current {})",
                ticket.kind, ticket.generation, self.generation
            );
            return Err(WorkflowError::StaleResponse.into());
        }

        let pending = match self.pending.take() {
            Some(pending) if pending.ticket == ticket => pending,
            Some(pending) => {
                warn!("Discarding {} response for a superseded call", ticket.kind);
                self.pending = Some(pending);
                return Err(WorkflowError::StaleResponse.into());
            }
            None => return Err(WorkflowError::UnexpectedResponse.into()),
        };

        match outcome {
            Ok(response) if response.answers(ticket.kind) => self.apply(pending, response),
            Ok(response) => {
                warn!(
                    "Expected a {} response, got {}",
                    ticket.kind,
                    response.kind()
                );
                let error: SheetError = WorkflowError::UnexpectedResponse.into();
                self.session.last_error = Some(error.to_string());
                self.step = pending.origin;
                Err(error)
            }
            Err(failure) => self.fail(pending, failure),
        }
    }

    fn apply(&mut self, pending: PendingCall, response: CollaboratorResponse) -> Result<Step> {
        match response {
            CollaboratorResponse::Uploaded(receipt) => {
                if receipt.image_id.is_empty() {
                    let error = CollaboratorError::new("upload", "no image id returned");
                    return self.fail(pending, CallFailure::Collaborator(error));
                }
                if receipt.face_detected == Some(false) {
                    warn!("{}", Warning::NoFaceDetected);
                    self.session.warnings.push(Warning::NoFaceDetected);
                }
                self.session.image = Some(receipt.into());
            }
            CollaboratorResponse::CropApplied(processed) => {
                self.session.processed = Some(processed);
                self.session.clear_output();
            }
            CollaboratorResponse::SheetPreviewed(preview)
            | CollaboratorResponse::CaptionSheetPreviewed(preview) => {
                self.session.preview = Some(preview);
            }
            CollaboratorResponse::Downloaded(download) => {
                info!("Sheet ready: {} ({} bytes)", download.filename, download.size_bytes);
                self.session.download = Some(download);
            }
            CollaboratorResponse::Printed(receipt) => {
                info!("Printed on {}: {}", receipt.printer_used, receipt.status);
                self.session.print = Some(receipt);
            }
            CollaboratorResponse::Printers(printers) => {
                self.session.printers = Some(printers);
            }
        }
        self.session.last_error = None;
        self.enter(pending.route.to);
        Ok(pending.route.to)
    }

    fn fail(&mut self, pending: PendingCall, failure: CallFailure) -> Result<Step> {
        let error: SheetError = match failure {
            CallFailure::Collaborator(e) => e.into(),
            CallFailure::NoPrinter => EnvironmentError::NoPrinterAvailable.into(),
            CallFailure::Unsupported => {
                CollaboratorError::new(pending.ticket.kind.to_string(), "not supported").into()
            }
        };

        if pending.ticket.kind == CallKind::PreviewSheet && self.options.allow_preview_fallback {
            if let Some(processed) = &self.session.processed {
                let warning = Warning::PreviewFallback {
                    reason: error.to_string(),
                };
                warn!("{}", warning);
                self.session.preview = Some(SheetPreview {
                    preview_image: processed.processed_image.clone(),
                    layout_info: None,
                });
                self.session.warnings.push(warning);
                self.enter(Step::Preview);
                return Ok(Step::Preview);
            }
        }

        warn!(
            "{} failed, returning to {:?}: {}",
            pending.ticket.kind, pending.origin, error
        );
        self.session.last_error = Some(error.to_string());
        self.step = pending.origin;
        Err(error)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn ensure_idle(&self) -> Result<()> {
        if self.pending.is_some() {
            return Err(WorkflowError::Busy.into());
        }
        Ok(())
    }

    fn require(&self, step: Step, action: WorkflowAction) -> Result<()> {
        self.ensure_idle()?;
        if self.step != step {
            return Err(WorkflowError::InvalidTransition {
                step: self.step,
                action,
            }
            .into());
        }
        Ok(())
    }

    fn route_for(&self, action: WorkflowAction) -> Result<&'static Route> {
        self.ensure_idle()?;
        find_route(self.step, self.session.product, action).ok_or_else(|| {
            WorkflowError::InvalidTransition {
                step: self.step,
                action,
            }
            .into()
        })
    }

    fn check_guard(&self, route: &Route, input: &GuardInput<'_>) -> Result<()> {
        match route.guard {
            Guard::Always => {}
            Guard::UploadAccepted => {
                let file = input.upload.ok_or(ValidationError::EmptyFile)?;
                file.validate(self.options.max_upload_bytes)?;
            }
            Guard::CropValid => {
                self.current_crop()?;
            }
            Guard::EnhancementValid => {
                self.session.enhancement.unwrap_or_default().validate()?;
            }
            Guard::ProcessedImage => {
                self.processed_id(route.action)?;
            }
            Guard::CaptionsValid => {
                if let Some(captions) = &self.session.captions {
                    captions.validate()?;
                }
            }
            Guard::CopiesRequested => {
                if input.copies.unwrap_or(0) == 0 {
                    return Err(ValidationError::NoCopies.into());
                }
            }
        }
        Ok(())
    }

    fn begin(&mut self, route: &'static Route, request: Option<CollaboratorRequest>) -> Advance {
        let Some(request) = request else {
            self.enter(route.to);
            return Advance::Moved(route.to);
        };
        debug_assert_eq!(Some(request.kind()), route.call);

        self.sequence += 1;
        let ticket = CallTicket {
            generation: self.generation,
            sequence: self.sequence,
            kind: request.kind(),
        };
        self.pending = Some(PendingCall {
            ticket,
            route,
            origin: self.step,
        });
        if route.remote {
            self.enter(Step::RemoteProcessing);
        }
        debug!("Issued {} call #{}", ticket.kind, ticket.sequence);
        Advance::Call(OutboundCall { ticket, request })
    }

    fn enter(&mut self, step: Step) {
        if self.step != step {
            info!("Workflow step: {:?} -> {:?}", self.step, step);
        }
        self.step = step;
    }

    fn image_id(&self) -> Result<String> {
        self.session
            .image
            .as_ref()
            .map(|image| image.id.clone())
            .ok_or_else(|| ValidationError::ImageNotLoaded.into())
    }

    fn processed_id(&self, action: WorkflowAction) -> Result<String> {
        self.session
            .processed
            .as_ref()
            .map(|p| p.processed_image_id.clone())
            .ok_or_else(|| {
                WorkflowError::InvalidTransition {
                    step: self.step,
                    action,
                }
                .into()
            })
    }

    fn layout_key(&self) -> &'static str {
        self.session
            .paper_type
            .unwrap_or(PaperType::PassportStandard)
            .layout_key()
    }
}
