use std::sync::Arc;

use photo_sheet::{
    Advance, CallFailure, CallKind, CallTicket, CollaboratorResponse, EnvironmentError, SheetError, Step,
    StudioOptions, ViewportEngine, Workflow, WorkflowError,
};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::collaborator::{Collaborator, dispatch};
use crate::{SessionCommand, SessionUpdate};

type Completion = (CallTicket, Result<CollaboratorResponse, CallFailure>);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Session worker has stopped")]
    WorkerStopped,
    #[error("{0}")]
    InvalidOptions(String),
}

/// Channels to a running session worker
pub struct SessionHandle {
    command_tx: mpsc::UnboundedSender<SessionCommand>,
    update_rx: mpsc::UnboundedReceiver<SessionUpdate>,
}

impl SessionHandle {
    /// Spawn a worker on the current tokio runtime.
    ///
    /// The options are validated before anything is spawned.
    pub fn spawn<C: Collaborator>(
        collaborator: Arc<C>,
        options: StudioOptions,
    ) -> Result<Self, RuntimeError> {
        let workflow =
            Workflow::new(options).map_err(|e| RuntimeError::InvalidOptions(e.to_string()))?;
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        tokio::spawn(worker_task(collaborator, workflow, command_rx, update_tx));
        Ok(Self {
            command_tx,
            update_rx,
        })
    }

    pub fn send(&self, command: SessionCommand) -> Result<(), RuntimeError> {
        self.command_tx
            .send(command)
            .map_err(|_| RuntimeError::WorkerStopped)
    }

    pub async fn next_update(&mut self) -> Option<SessionUpdate> {
        self.update_rx.recv().await
    }

    /// Updates that have already arrived, without waiting
    pub fn pending_updates(&mut self) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        while let Ok(update) = self.update_rx.try_recv() {
            updates.push(update);
        }
        updates
    }
}

/// Async worker task that owns the workflow and runs collaborator calls
///
/// Calls run on their own tasks so commands such as reset are still handled
/// while a call is outstanding. Their completions come back through an
/// internal channel and are applied in arrival order.
pub async fn worker_task<C: Collaborator>(
    collaborator: Arc<C>,
    workflow: Workflow,
    mut command_rx: mpsc::UnboundedReceiver<SessionCommand>,
    update_tx: mpsc::UnboundedSender<SessionUpdate>,
) {
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();
    let mut worker = SessionWorker {
        last_step: workflow.step(),
        workflow,
        collaborator,
        done_tx,
        update_tx,
        warnings_seen: 0,
    };

    loop {
        tokio::select! {
            cmd = command_rx.recv() => match cmd {
                Some(cmd) => worker.process_command(cmd),
                None => break,
            },
            Some((ticket, outcome)) = done_rx.recv() => {
                worker.process_completion(ticket, outcome);
            }
        }
    }
    log::debug!("Session worker stopped");
}

struct SessionWorker<C> {
    workflow: Workflow,
    collaborator: Arc<C>,
    done_tx: mpsc::UnboundedSender<Completion>,
    update_tx: mpsc::UnboundedSender<SessionUpdate>,
    last_step: Step,
    /// Session warnings already forwarded to the UI
    warnings_seen: usize,
}

impl<C: Collaborator> SessionWorker<C> {
    fn process_command(&mut self, cmd: SessionCommand) {
        let result = match cmd {
            SessionCommand::Upload { file } => self.workflow.submit_upload(file).map(Some),
            SessionCommand::SelectProduct { product, container } => {
                self.workflow.select_product(product, container).map(Some)
            }
            SessionCommand::ImageLoaded { width, height } => {
                self.with_viewport(|v| v.set_natural_size(width, height))
            }
            SessionCommand::Zoom { zoom } => self.with_viewport(|v| v.on_zoom_change(zoom)),
            SessionCommand::ZoomIn => self.with_viewport(ViewportEngine::zoom_in),
            SessionCommand::ZoomOut => self.with_viewport(ViewportEngine::zoom_out),
            SessionCommand::DragStart { pointer } => {
                self.with_viewport(|v| v.on_drag_start(pointer))
            }
            SessionCommand::DragMove { pointer } => self.with_viewport(|v| v.on_drag_move(pointer)),
            SessionCommand::DragEnd => self.with_viewport(ViewportEngine::on_drag_end),
            SessionCommand::ResetView => self.with_viewport(ViewportEngine::reset),
            SessionCommand::ConfirmCrop => self.workflow.confirm_crop().map(Some),
            SessionCommand::SetEnhancement { settings } => {
                self.workflow.set_enhancement(settings).map(|_| None)
            }
            SessionCommand::ConfirmEnhancement => self.workflow.confirm_enhancement().map(Some),
            SessionCommand::SetCaptions { text1, text2 } => {
                self.workflow.set_captions(text1, text2).map(|errors| {
                    self.send(SessionUpdate::CaptionErrors { errors });
                    None
                })
            }
            SessionCommand::SetFont { font } => self.workflow.set_font(font).map(|_| None),
            SessionCommand::CopyFirstCaption => self.workflow.copy_first_caption().map(|_| None),
            SessionCommand::ClearCaptions => self.workflow.clear_captions().map(|_| None),
            SessionCommand::ConfirmCaptions => self.workflow.confirm_captions().map(Some),
            SessionCommand::SelectLayout { paper_type } => {
                self.workflow.select_layout(paper_type).map(|_| None)
            }
            SessionCommand::ConfirmLayout => self.workflow.confirm_layout().map(Some),
            SessionCommand::Download => self.workflow.request_download().map(Some),
            SessionCommand::Print { printer_id, copies } => {
                self.workflow.request_print(printer_id, copies).map(Some)
            }
            SessionCommand::ListPrinters => self.workflow.list_printers().map(Some),
            SessionCommand::Back => self.workflow.back().map(|_| None),
            SessionCommand::Reset => {
                self.workflow.reset();
                self.warnings_seen = 0;
                Ok(None)
            }
        };

        match result {
            Ok(Some(Advance::Call(call))) => {
                let kind = call.ticket.kind;
                let collaborator = Arc::clone(&self.collaborator);
                let done_tx = self.done_tx.clone();
                tokio::spawn(async move {
                    let outcome = dispatch(&*collaborator, call.request).await;
                    let _ = done_tx.send((call.ticket, outcome));
                });
                self.send(SessionUpdate::CallStarted { kind });
            }
            Ok(_) => {}
            Err(e) => self.report_error(e),
        }
        self.report_step();
    }

    fn process_completion(
        &mut self,
        ticket: CallTicket,
        outcome: Result<CollaboratorResponse, CallFailure>,
    ) {
        match self.workflow.complete(ticket, outcome) {
            Ok(_) => {
                let session = self.workflow.session().clone();
                if ticket.kind == CallKind::ListPrinters {
                    if let Some(printers) = &session.printers {
                        self.send(SessionUpdate::Printers {
                            printers: printers.clone(),
                        });
                    }
                }
                for warning in session.warnings.iter().skip(self.warnings_seen) {
                    self.send(SessionUpdate::Warning {
                        message: warning.to_string(),
                    });
                }
                self.warnings_seen = session.warnings.len();
                self.send(SessionUpdate::SessionChanged {
                    session: Box::new(session),
                });
            }
            Err(SheetError::Workflow(WorkflowError::StaleResponse)) => {
                log::debug!("Ignored late {} response", ticket.kind);
            }
            Err(e) => self.report_error(e),
        }
        self.report_step();
    }

    /// Apply a viewport change and report the new state.
    fn with_viewport(
        &mut self,
        f: impl FnOnce(&mut ViewportEngine),
    ) -> photo_sheet::Result<Option<Advance>> {
        let viewport = self.workflow.viewport_mut()?;
        f(viewport);
        let state = *viewport.state();
        self.send(SessionUpdate::Viewport { state });
        Ok(None)
    }

    fn report_step(&mut self) {
        let step = self.workflow.step();
        if step != self.last_step {
            self.last_step = step;
            self.send(SessionUpdate::StepChanged { step });
        }
    }

    fn report_error(&self, error: SheetError) {
        log::warn!("{}", error);
        let message = error.to_string();
        let update = match error {
            SheetError::Environment(EnvironmentError::NoPrinterAvailable) => {
                SessionUpdate::NoPrinter { message }
            }
            _ => SessionUpdate::Error { message },
        };
        self.send(update);
    }

    fn send(&self, update: SessionUpdate) {
        let _ = self.update_tx.send(update);
    }
}
