//! Upload states, events and progress
//!
//! `Idle` is both the initial state and the end of every cycle, so the
//! flow is reusable after success and after failure.

use serde::{Deserialize, Serialize};

use crate::machine::FlowState;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading,
    Done,
    Failed,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UploadEvent {
    /// A single valid file was accepted and the transfer started.
    FileAccepted,
    /// The endpoint confirmed the transfer and returned a document id.
    TransferSucceeded,
    /// Non-success status, network error or malformed body.
    TransferFailed,
    /// The document id was handed to navigation.
    HandedOff,
    /// The failure was surfaced to the user.
    FailureNotified,
    /// The pending upload was dropped before it settled.
    Abandoned,
}

impl FlowState for UploadStatus {
    type Event = UploadEvent;

    fn next(&self, event: &UploadEvent) -> Option<Self> {
        use UploadEvent::*;
        use UploadStatus::*;

        match (self, event) {
            (Idle, FileAccepted) => Some(Uploading),
            (Uploading, TransferSucceeded) => Some(Done),
            (Uploading, TransferFailed) => Some(Failed),
            (Uploading, Abandoned) => Some(Idle),
            (Done, HandedOff) => Some(Idle),
            (Failed, FailureNotified) => Some(Idle),
            _ => None,
        }
    }
}

/// Upload progress in percent.
///
/// While a transfer is outstanding the value only grows and never passes
/// the ceiling; only [`UploadProgress::complete`] reaches 100.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct UploadProgress(u8);

impl UploadProgress {
    pub const COMPLETE: u8 = 100;

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Advance by `step`, stopping at `ceiling` (clamped below 100).
    /// Returns whether the value changed.
    pub fn advance(&mut self, step: u8, ceiling: u8) -> bool {
        let ceiling = ceiling.min(Self::COMPLETE - 1);
        if self.0 >= ceiling {
            return false;
        }
        let next = self.0.saturating_add(step).min(ceiling);
        let changed = next != self.0;
        self.0 = next;
        changed
    }

    pub fn complete(&mut self) {
        self.0 = Self::COMPLETE;
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }

    pub fn is_complete(&self) -> bool {
        self.0 == Self::COMPLETE
    }
}

/// Snapshot of the single active upload, published to observers.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadSession {
    pub file_name: Option<String>,
    pub progress: UploadProgress,
    pub status: UploadStatus,
}
