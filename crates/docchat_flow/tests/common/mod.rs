//! Test utilities: recording boundaries and a context wired to a mock server

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use docchat_client::{Config, DocChatClient};
use docchat_core::{FileCandidate, Turn, UploadConfig};
use docchat_flow::{AppContext, Navigator, Notification, Notifier, Route, TranscriptView};
use docchat_state::UploadSession;
use tokio::sync::watch;
use wiremock::MockServer;

/// Records every route and the upload session as it was at hand-off time.
#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
    observed: Mutex<Option<watch::Receiver<UploadSession>>>,
    sessions_at_handoff: Mutex<Vec<UploadSession>>,
}

impl RecordingNavigator {
    pub fn observe(&self, session: watch::Receiver<UploadSession>) {
        *self.observed.lock().unwrap() = Some(session);
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }

    pub fn sessions_at_handoff(&self) -> Vec<UploadSession> {
        self.sessions_at_handoff.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        if let Some(session) = self.observed.lock().unwrap().as_ref() {
            self.sessions_at_handoff
                .lock()
                .unwrap()
                .push(session.borrow().clone());
        }
        self.routes.lock().unwrap().push(route);
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

/// Counts transcript mutations the way a view would scroll on them.
#[derive(Default)]
pub struct RecordingView {
    appended: Mutex<Vec<(Turn, usize)>>,
}

impl RecordingView {
    pub fn appended(&self) -> Vec<(Turn, usize)> {
        self.appended.lock().unwrap().clone()
    }
}

impl TranscriptView for RecordingView {
    fn turn_appended(&self, turn: &Turn, transcript_len: usize) {
        self.appended
            .lock()
            .unwrap()
            .push((turn.clone(), transcript_len));
    }
}

pub struct Harness {
    pub ctx: AppContext,
    pub navigator: Arc<RecordingNavigator>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn harness(server: &MockServer) -> Harness {
    harness_with(server, fast_upload_config())
}

pub fn harness_with(server: &MockServer, upload: UploadConfig) -> Harness {
    let mut config = Config::default();
    config.api_base = server.uri();
    config.upload = upload.clone();
    let api = Arc::new(DocChatClient::new(config).expect("client"));

    let navigator = Arc::new(RecordingNavigator::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let ctx = AppContext::new(api, navigator.clone(), notifier.clone()).with_upload_config(upload);

    Harness {
        ctx,
        navigator,
        notifier,
    }
}

pub fn fast_upload_config() -> UploadConfig {
    UploadConfig {
        progress_interval_ms: 10,
        progress_step: 5,
        progress_ceiling: 95,
        ..UploadConfig::default()
    }
}

pub fn pdf(name: &str, size: usize) -> FileCandidate {
    FileCandidate::new(name, "application/pdf", vec![b'x'; size])
}
