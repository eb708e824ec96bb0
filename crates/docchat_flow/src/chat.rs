//! ChatFlow - transcript and request cycle for one document
//!
//! A user turn is appended as soon as a message is accepted and is never
//! retracted: a failed request leaves it in place so the user can see what
//! was asked and send again.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use docchat_client::ChatRequest;
use docchat_core::{Conversation, DocumentId, Turn};
use docchat_state::{ChatEvent, ChatPhase, StateMachine, StateTransition};
use tracing::{debug, error, info, warn};

use crate::context::{AppContext, Notification, TranscriptView};
use crate::error::{FlowError, ValidationError};
use crate::guard::{InFlight, InFlightGuard};
use crate::route::{Route, RouteError};

const SEND_FAILED_MESSAGE: &str = "Failed to send message. Please try again.";

#[derive(Debug)]
pub enum SendOutcome {
    /// The message was blank; nothing changed.
    Ignored(ValidationError),
    /// A previous message is still awaiting its answer; this one was dropped.
    Busy,
    /// The answer was appended after the user's turn.
    Answered(Turn),
    /// Only the user's turn was appended; the user was notified.
    Failed(FlowError),
}

struct ChatState {
    conversation: Conversation,
    machine: StateMachine<ChatPhase>,
    input: String,
}

impl ChatState {
    fn new(document_id: Option<DocumentId>) -> Self {
        Self {
            conversation: Conversation::new(document_id),
            machine: StateMachine::new(),
            input: String::new(),
        }
    }

    /// Drive the phase machine. A rejected event leaves the phase as it was.
    fn apply(&mut self, event: ChatEvent) {
        if let Err(e) = self.machine.handle_event(event) {
            error!("Chat phase out of step with the in-flight latch: {}", e);
        }
    }
}

pub struct ChatFlow {
    ctx: AppContext,
    view: Arc<dyn TranscriptView>,
    state: Mutex<ChatState>,
    in_flight: InFlight,
}

impl ChatFlow {
    /// Start an empty session scoped to `document_id`.
    pub fn new(
        ctx: AppContext,
        view: Arc<dyn TranscriptView>,
        document_id: Option<DocumentId>,
    ) -> Self {
        info!("Starting chat session for document {:?}", document_id);
        Self {
            ctx,
            view,
            state: Mutex::new(ChatState::new(document_id)),
            in_flight: InFlight::new(),
        }
    }

    /// Start a session from the route navigation opened.
    pub fn from_route(
        ctx: AppContext,
        view: Arc<dyn TranscriptView>,
        route: &Route,
    ) -> Result<Self, RouteError> {
        let document_id = route.chat_document()?;
        Ok(Self::new(ctx, view, document_id))
    }

    pub fn document_id(&self) -> Option<DocumentId> {
        self.state().conversation.document_id().cloned()
    }

    pub fn transcript(&self) -> Vec<Turn> {
        self.state().conversation.turns().to_vec()
    }

    pub fn len(&self) -> usize {
        self.state().conversation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().conversation.is_empty()
    }

    pub fn phase(&self) -> ChatPhase {
        self.state().machine.state().clone()
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.in_flight.is_set()
    }

    pub fn history(&self) -> Vec<StateTransition<ChatPhase>> {
        self.state().machine.history().to_vec()
    }

    pub fn input(&self) -> String {
        self.state().input.clone()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.state().input = text.into();
    }

    /// Send whatever is in the input buffer.
    pub async fn submit_input(&self) -> SendOutcome {
        let text = self.input();
        self.send(text).await
    }

    /// Send a message about this session's document.
    pub async fn send(&self, text: impl Into<String>) -> SendOutcome {
        let text = text.into();
        if text.trim().is_empty() {
            return SendOutcome::Ignored(ValidationError::EmptyMessage);
        }

        let Some(latch) = self.in_flight.try_acquire() else {
            debug!("Message dropped: previous request still in flight");
            return SendOutcome::Busy;
        };

        let (request, user_turn, len) = {
            let mut state = self.state();
            state.apply(ChatEvent::MessageAccepted);
            state.input.clear();
            let turn = state.conversation.push(Turn::user(text.clone())).clone();
            let request = ChatRequest::new(text, state.conversation.document_id().cloned());
            (request, turn, state.conversation.len())
        };
        self.view.turn_appended(&user_turn, len);

        let mut pending = PendingSend {
            flow: self,
            _latch: latch,
            settled: false,
        };
        let result = self.ctx.api.chat(&request).await;
        pending.settled = true;

        match result {
            Ok(reply) => {
                let (turn, len) = {
                    let mut state = self.state();
                    state.apply(ChatEvent::ResponseReceived);
                    let turn = state
                        .conversation
                        .push(Turn::assistant(reply.message, reply.sources))
                        .clone();
                    (turn, state.conversation.len())
                };
                info!(
                    "Answer received with {} source(s); transcript has {} turns",
                    turn.sources().len(),
                    len
                );
                self.view.turn_appended(&turn, len);
                SendOutcome::Answered(turn)
            }
            Err(e) => {
                let err = FlowError::from(e);
                warn!("Chat request failed: {}", err);
                self.state().apply(ChatEvent::RequestFailed);
                self.ctx
                    .notifier
                    .notify(Notification::error(SEND_FAILED_MESSAGE));
                SendOutcome::Failed(err)
            }
        }
    }

    fn state(&self) -> MutexGuard<'_, ChatState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns the flow to `Ready` if the send future is dropped before the
/// answer arrives. The user turn stays in the transcript.
struct PendingSend<'a> {
    flow: &'a ChatFlow,
    _latch: InFlightGuard<'a>,
    settled: bool,
}

impl Drop for PendingSend<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Chat request abandoned before it settled");
            self.flow.state().apply(ChatEvent::Abandoned);
        }
    }
}
