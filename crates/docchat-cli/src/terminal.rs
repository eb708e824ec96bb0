//! Terminal implementations of the flow boundaries

use std::sync::Mutex;

use colored::Colorize;
use docchat_core::{Role, Turn};
use docchat_flow::{Navigator, Notification, NotificationLevel, Notifier, Route, TranscriptView};
use docchat_state::{UploadSession, UploadStatus};
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        let line = match notification.level {
            NotificationLevel::Warning => format!("⚠️  {}", notification.message).yellow(),
            NotificationLevel::Error => format!("❌ {}", notification.message).red(),
        };
        eprintln!("{}", line);
    }
}

/// Remembers where the flows asked to go; the caller decides what to open.
#[derive(Default)]
pub struct TerminalNavigator {
    route: Mutex<Option<Route>>,
}

impl TerminalNavigator {
    pub fn take(&self) -> Option<Route> {
        self.route
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take()
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!("Navigating to {}", route);
        *self
            .route
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(route);
    }
}

/// Prints assistant turns as they arrive. User turns are already on screen.
pub struct TerminalTranscript;

impl TranscriptView for TerminalTranscript {
    fn turn_appended(&self, turn: &Turn, _transcript_len: usize) {
        if turn.role() == Role::User {
            return;
        }
        println!(
            "{} {}",
            "Assistant:".green().bold(),
            turn.created_at().format("%H:%M:%S").to_string().dimmed()
        );
        println!("{}", turn.content());
        if !turn.sources().is_empty() {
            println!("{}", "Sources:".dimmed());
            for source in turn.sources() {
                println!("{}", format!("  Page {}: {}", source.page, source.text).dimmed());
            }
        }
        println!();
    }
}

/// Turns session snapshots into progress lines, one per new percentage.
///
/// Only in-flight snapshots are rendered. The confirmed 100% is printed
/// from the upload outcome, since the session leaves `Done` for `Idle`
/// before an observer is guaranteed to see it.
#[derive(Default)]
pub struct ProgressLines {
    last: Option<u8>,
}

impl ProgressLines {
    pub fn line(&mut self, session: &UploadSession) -> Option<String> {
        if session.status != UploadStatus::Uploading {
            self.last = None;
            return None;
        }
        let value = session.progress.value();
        if self.last == Some(value) {
            return None;
        }
        self.last = Some(value);
        Some(progress_line(
            session.file_name.as_deref().unwrap_or("file"),
            value,
        ))
    }
}

pub fn progress_line(file_name: &str, percent: u8) -> String {
    format!("📤 Uploading {}: {}%", file_name, percent)
}

/// Render upload progress while the transfer is outstanding.
pub fn spawn_progress_printer(mut session: watch::Receiver<UploadSession>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = ProgressLines::default();
        while session.changed().await.is_ok() {
            let snapshot = session.borrow_and_update().clone();
            if let Some(line) = lines.line(&snapshot) {
                eprintln!("{}", line.dimmed());
            }
        }
    })
}
