pub mod api;
pub mod client_trait;
pub mod error;
pub mod utils;

pub use api::client::DocChatClient;
pub use api::models::{ChatReply, ChatRequest, UploadReceipt};
pub use client_trait::DocChatApi;
pub use docchat_core::Config;
pub use error::ApiError;
pub use reqwest::StatusCode;
