//! State transitions - FSM transition logic
//!
//! Implements the event-driven state machine used by both flows.

use std::fmt::Debug;

use thiserror::Error;

/// A state of one flow's lifecycle.
///
/// `next` returns `None` when the event is not valid in this state. The
/// machine then keeps its current state and reports the rejected event.
pub trait FlowState: Clone + Debug + Default + PartialEq {
    type Event: Clone + Debug + PartialEq;

    fn next(&self, event: &Self::Event) -> Option<Self>;
}

/// Error type for invalid state transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid transition from {from} with event {event}")]
    InvalidTransition { from: String, event: String },
}

/// Represents a state transition result.
#[derive(Debug, Clone, PartialEq)]
pub struct StateTransition<S: FlowState> {
    /// The state before the transition.
    pub from: S,
    /// The state after the transition.
    pub to: S,
    /// The event that triggered the transition.
    pub event: S::Event,
}

impl<S: FlowState> StateTransition<S> {
    /// Whether the state actually changed.
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// State machine for managing a flow's state transitions.
#[derive(Debug, Clone)]
pub struct StateMachine<S: FlowState> {
    /// Current state.
    current_state: S,
    /// Transition history (limited).
    history: Vec<StateTransition<S>>,
    /// Max history entries to keep.
    max_history: usize,
}

impl<S: FlowState> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: FlowState> StateMachine<S> {
    /// Create a new state machine in the state's default.
    pub fn new() -> Self {
        Self {
            current_state: S::default(),
            history: Vec::new(),
            max_history: 50,
        }
    }

    /// Get the current state.
    pub fn state(&self) -> &S {
        &self.current_state
    }

    /// Get the transition history.
    pub fn history(&self) -> &[StateTransition<S>] {
        &self.history
    }

    /// Handle an event and transition to a new state.
    pub fn handle_event(&mut self, event: S::Event) -> Result<StateTransition<S>, TransitionError> {
        let Some(new_state) = self.current_state.next(&event) else {
            tracing::warn!(
                "Rejected event {:?} in state {:?}",
                event,
                self.current_state
            );
            return Err(TransitionError::InvalidTransition {
                from: format!("{:?}", self.current_state),
                event: format!("{:?}", event),
            });
        };

        let old_state = std::mem::replace(&mut self.current_state, new_state.clone());
        tracing::debug!("Transition {:?} -> {:?} on {:?}", old_state, new_state, event);

        let transition = StateTransition {
            from: old_state,
            to: new_state,
            event,
        };

        self.history.push(transition.clone());
        if self.history.len() > self.max_history {
            self.history.remove(0);
        }

        Ok(transition)
    }
}
