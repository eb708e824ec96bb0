//! UploadFlow - single-file ingestion with progress feedback
//!
//! `Idle -> Uploading -> Done -> Idle` on success, `Uploading -> Failed ->
//! Idle` on failure. Dropping a pending `submit` future is treated as
//! abandonment and also returns the flow to `Idle`.

use std::sync::{Arc, Mutex, PoisonError};

use docchat_core::{DocumentId, FileCandidate};
use docchat_state::{StateMachine, StateTransition, UploadEvent, UploadSession, UploadStatus};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::context::{AppContext, Notification};
use crate::error::{FlowError, ValidationError};
use crate::guard::{InFlight, InFlightGuard};
use crate::progress::ProgressTicker;
use crate::route::Route;

const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload file. Please try again.";

#[derive(Debug)]
pub enum UploadOutcome {
    /// The document was ingested and navigation was asked to open it.
    Completed(DocumentId),
    /// The selection was refused locally; nothing was sent.
    Rejected(ValidationError),
    /// Another upload is still in flight; the submission was dropped.
    Busy,
    /// The transfer failed and the user was notified.
    Failed(FlowError),
}

pub struct UploadFlow {
    ctx: AppContext,
    session: Arc<watch::Sender<UploadSession>>,
    machine: Mutex<StateMachine<UploadStatus>>,
    in_flight: InFlight,
}

impl UploadFlow {
    pub fn new(ctx: AppContext) -> Self {
        let (session, _) = watch::channel(UploadSession::default());
        Self {
            ctx,
            session: Arc::new(session),
            machine: Mutex::new(StateMachine::new()),
            in_flight: InFlight::new(),
        }
    }

    /// Observe the active session: status, progress and file name.
    pub fn subscribe(&self) -> watch::Receiver<UploadSession> {
        self.session.subscribe()
    }

    pub fn session(&self) -> UploadSession {
        self.session.borrow().clone()
    }

    pub fn status(&self) -> UploadStatus {
        self.machine().state().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_set()
    }

    pub fn history(&self) -> Vec<StateTransition<UploadStatus>> {
        self.machine().history().to_vec()
    }

    /// Upload the user's selection. Exactly one PDF is accepted.
    pub async fn submit(&self, files: Vec<FileCandidate>) -> UploadOutcome {
        if self.in_flight.is_set() {
            debug!("Upload already in flight, ignoring submission");
            return UploadOutcome::Busy;
        }

        let file = match self.validate(files) {
            Ok(file) => file,
            Err(e) => {
                info!("Rejected upload: {}", e);
                self.ctx.notifier.notify(Notification::warning(e.to_string()));
                return UploadOutcome::Rejected(e);
            }
        };

        let Some(latch) = self.in_flight.try_acquire() else {
            debug!("Upload already in flight, ignoring submission");
            return UploadOutcome::Busy;
        };

        self.apply(UploadEvent::FileAccepted);
        self.session
            .send_modify(|s| s.file_name = Some(file.name.clone()));
        let mut pending = PendingUpload {
            flow: self,
            _latch: latch,
            settled: false,
        };

        let ticker = ProgressTicker::start(Arc::clone(&self.session), &self.ctx.upload);
        let result = self.ctx.api.upload(&file).await;
        drop(ticker);
        pending.settled = true;

        match result {
            Ok(receipt) => {
                let document_id = receipt.document_id;
                self.apply(UploadEvent::TransferSucceeded);
                info!("Uploaded {} as document {}", file.name, document_id);

                self.ctx.navigator.navigate(Route::chat(document_id.clone()));
                self.apply(UploadEvent::HandedOff);
                UploadOutcome::Completed(document_id)
            }
            Err(e) => {
                let err = FlowError::from(e);
                warn!("Upload of {} failed: {}", file.name, err);
                self.apply(UploadEvent::TransferFailed);

                self.ctx
                    .notifier
                    .notify(Notification::error(UPLOAD_FAILED_MESSAGE));
                self.apply(UploadEvent::FailureNotified);
                UploadOutcome::Failed(err)
            }
        }
    }

    fn validate(&self, mut files: Vec<FileCandidate>) -> Result<FileCandidate, ValidationError> {
        if files.len() != 1 {
            return Err(ValidationError::FileCount(files.len()));
        }
        let file = files.remove(0);

        if !file.is_pdf() {
            return Err(ValidationError::NotPdf {
                media_type: file.media_type,
            });
        }
        if let Some(max) = self.ctx.upload.max_file_bytes {
            if file.size() > max {
                return Err(ValidationError::TooLarge {
                    size: file.size(),
                    max,
                });
            }
        }
        Ok(file)
    }

    /// Drive the machine and mirror the new status into the session.
    fn apply(&self, event: UploadEvent) {
        let Ok(transition) = self.machine().handle_event(event) else {
            return;
        };

        self.session.send_modify(|s| {
            s.status = transition.to.clone();
            match transition.to {
                UploadStatus::Uploading | UploadStatus::Failed => s.progress.reset(),
                UploadStatus::Done => s.progress.complete(),
                UploadStatus::Idle => {
                    s.progress.reset();
                    s.file_name = None;
                }
            }
        });
    }

    fn machine(&self) -> std::sync::MutexGuard<'_, StateMachine<UploadStatus>> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns the flow to `Idle` if the submit future is dropped mid-transfer.
struct PendingUpload<'a> {
    flow: &'a UploadFlow,
    _latch: InFlightGuard<'a>,
    settled: bool,
}

impl Drop for PendingUpload<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Upload abandoned before it settled");
            self.flow.apply(UploadEvent::Abandoned);
        }
    }
}
