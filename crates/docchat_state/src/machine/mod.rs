//! State machine module
//!
//! Contains the generic FSM shared by the upload and chat flows.

mod transitions;

pub use transitions::{FlowState, StateMachine, StateTransition, TransitionError};
