//! Chat states and events
//!
//! One send cycle is `Ready -> AwaitingResponse -> Ready`. Whether the
//! cycle grew the transcript by one or two turns is the flow's concern;
//! the phase only tracks whether a request is outstanding.

use serde::{Deserialize, Serialize};

use crate::machine::FlowState;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatPhase {
    /// No request outstanding; input is accepted.
    #[default]
    Ready,
    /// A user turn was appended and its request has not settled yet.
    AwaitingResponse,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatEvent {
    /// A non-empty message was accepted and its user turn appended.
    MessageAccepted,
    /// The answer was parsed and appended as an assistant turn.
    ResponseReceived,
    /// Transport or protocol failure; nothing was appended.
    RequestFailed,
    /// The pending send was dropped before it settled.
    Abandoned,
}

impl ChatEvent {
    /// Check if this event settles an outstanding request.
    pub fn is_settlement(&self) -> bool {
        matches!(
            self,
            Self::ResponseReceived | Self::RequestFailed | Self::Abandoned
        )
    }
}

impl FlowState for ChatPhase {
    type Event = ChatEvent;

    fn next(&self, event: &ChatEvent) -> Option<Self> {
        use ChatEvent::*;
        use ChatPhase::*;

        match (self, event) {
            (Ready, MessageAccepted) => Some(AwaitingResponse),
            (AwaitingResponse, e) if e.is_settlement() => Some(Ready),
            _ => None,
        }
    }
}
