//! Navigation contract between the upload and chat views.
//!
//! The chat view is addressed as `/chat?documentId=<id>`; the chat flow
//! reads its document from that query parameter when a session starts.

use std::fmt;

use docchat_core::DocumentId;
use thiserror::Error;
use url::form_urlencoded;
use url::Url;

const ROUTE_BASE: &str = "app://docchat/";
const CHAT_PATH: &str = "/chat";
const DOCUMENT_ID_PARAM: &str = "documentId";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("Malformed route {0:?}")]
    Malformed(String),

    #[error("Unknown route {0:?}")]
    UnknownPath(String),

    #[error("Route {0} does not open a chat session")]
    NotChat(Route),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Upload,
    Chat { document_id: Option<DocumentId> },
}

impl Route {
    pub fn chat(document_id: DocumentId) -> Self {
        Self::Chat {
            document_id: Some(document_id),
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Self::Upload => "/".to_string(),
            Self::Chat { document_id: None } => CHAT_PATH.to_string(),
            Self::Chat {
                document_id: Some(id),
            } => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair(DOCUMENT_ID_PARAM, id.as_str())
                    .finish();
                format!("{CHAT_PATH}?{query}")
            }
        }
    }

    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let url = Url::parse(ROUTE_BASE)
            .and_then(|base| base.join(path))
            .map_err(|_| RouteError::Malformed(path.to_string()))?;

        match url.path().trim_end_matches('/') {
            "" => Ok(Self::Upload),
            CHAT_PATH => {
                let document_id = url
                    .query_pairs()
                    .find(|(key, _)| key == DOCUMENT_ID_PARAM)
                    .and_then(|(_, value)| DocumentId::parse(value.into_owned()));
                Ok(Self::Chat { document_id })
            }
            other => Err(RouteError::UnknownPath(other.to_string())),
        }
    }

    /// The document a chat session should be scoped to.
    pub fn chat_document(&self) -> Result<Option<DocumentId>, RouteError> {
        match self {
            Self::Chat { document_id } => Ok(document_id.clone()),
            other => Err(RouteError::NotChat(other.clone())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}
