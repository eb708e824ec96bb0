//! Wire types for the upload and chat endpoints.

use docchat_core::{DocumentId, Source};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Body of `POST /api/chat`. `documentId` is sent as `null` when unset.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    #[serde(rename = "documentId")]
    pub document_id: Option<DocumentId>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, document_id: Option<DocumentId>) -> Self {
        Self {
            message: message.into(),
            document_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponseBody {
    message: String,
    #[serde(default)]
    sources: Option<Vec<Source>>,
}

/// A parsed answer. `sources` is empty when the service sent none.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub message: String,
    pub sources: Vec<Source>,
}

impl From<ChatResponseBody> for ChatReply {
    fn from(body: ChatResponseBody) -> Self {
        Self {
            message: body.message,
            sources: body.sources.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponseBody {
    #[serde(rename = "documentId", default)]
    document_id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadReceipt {
    pub document_id: DocumentId,
    pub message: Option<String>,
}

impl TryFrom<UploadResponseBody> for UploadReceipt {
    type Error = ApiError;

    // Never fabricate an id from a partial response.
    fn try_from(body: UploadResponseBody) -> Result<Self, Self::Error> {
        let document_id = body
            .document_id
            .and_then(DocumentId::parse)
            .ok_or(ApiError::MissingField("documentId"))?;
        Ok(Self {
            document_id,
            message: body.message,
        })
    }
}
