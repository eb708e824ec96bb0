use async_trait::async_trait;
use docchat_core::{DocumentId, DocumentSummary, FileCandidate};

use crate::api::models::{ChatReply, ChatRequest, UploadReceipt};
use crate::error::ApiError;

/// The remote answering service as seen by the flows.
#[async_trait]
pub trait DocChatApi: Send + Sync {
    /// Transfer one file and return the identifier it was ingested under.
    async fn upload(&self, file: &FileCandidate) -> Result<UploadReceipt, ApiError>;

    /// Ask a question about a document.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError>;

    async fn list_documents(&self) -> Result<Vec<DocumentSummary>, ApiError>;

    async fn delete_document(&self, document_id: &DocumentId) -> Result<(), ApiError>;
}
