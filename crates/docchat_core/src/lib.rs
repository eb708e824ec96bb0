//! docchat_core - Core types shared by the document chat crates
//!
//! This crate provides the data model used across the workspace:
//! - `turn` - Turn, Role, Source for a single transcript entry
//! - `conversation` - the append-only transcript scoped to a document
//! - `document` - DocumentId and DocumentSummary
//! - `file` - FileCandidate submitted for upload
//! - `config` - client configuration

pub mod config;
pub mod conversation;
pub mod document;
pub mod file;
pub mod turn;

// Re-export commonly used types
pub use config::{Config, ConfigError, UploadConfig};
pub use conversation::Conversation;
pub use document::{DocumentId, DocumentSummary};
pub use file::FileCandidate;
pub use turn::{Role, Source, Turn, TurnId};
