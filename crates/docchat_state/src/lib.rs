//! docchat_state - State machines for the upload and chat flows
//!
//! This crate holds the pure transition logic. It performs no I/O; the
//! flows in `docchat_flow` feed it events and act on the resulting states.

pub mod chat;
pub mod machine;
pub mod upload;

// Re-export commonly used types
pub use chat::{ChatEvent, ChatPhase};
pub use machine::{FlowState, StateMachine, StateTransition, TransitionError};
pub use upload::{UploadEvent, UploadProgress, UploadSession, UploadStatus};
