//! Ambient context and the boundaries the flows talk to.

use std::sync::Arc;

use docchat_client::DocChatApi;
use docchat_core::{Turn, UploadConfig};

use crate::route::Route;

/// Moves the user to another view.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Shows a dismissible, non-fatal message to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Receives every transcript mutation, once per appended turn.
pub trait TranscriptView: Send + Sync {
    fn turn_appended(&self, turn: &Turn, transcript_len: usize);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Process-wide collaborators, handed to each flow at construction.
#[derive(Clone)]
pub struct AppContext {
    pub api: Arc<dyn DocChatApi>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
    pub upload: UploadConfig,
}

impl AppContext {
    pub fn new(
        api: Arc<dyn DocChatApi>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            navigator,
            notifier,
            upload: UploadConfig::default(),
        }
    }

    pub fn with_upload_config(mut self, upload: UploadConfig) -> Self {
        self.upload = upload;
        self
    }
}
