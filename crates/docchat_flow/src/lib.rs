//! docchat_flow - Interaction orchestration for the document chat client
//!
//! Two independent flows share nothing but the document identifier the
//! first one produces:
//! - [`UploadFlow`] validates one PDF, reports progress while it is
//!   transferred and hands the resulting document id to navigation.
//! - [`ChatFlow`] keeps the transcript for one document, appending the
//!   user's turn before the answer arrives.
//!
//! Both flows allow a single outstanding request and always settle back to
//! a stable state; failures reach the user only as notifications.

pub mod chat;
pub mod context;
pub mod error;
pub mod guard;
pub mod progress;
pub mod route;
pub mod upload;

pub use chat::{ChatFlow, SendOutcome};
pub use context::{AppContext, Navigator, Notification, NotificationLevel, Notifier, TranscriptView};
pub use error::{FlowError, ValidationError};
pub use route::{Route, RouteError};
pub use upload::{UploadFlow, UploadOutcome};
