use std::time::{Duration, Instant};

use async_trait::async_trait;
use docchat_core::{Config, DocumentId, DocumentSummary, FileCandidate};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Proxy};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use tracing::info;
use url::Url;

use crate::api::models::{ChatReply, ChatRequest, ChatResponseBody, UploadReceipt, UploadResponseBody};
use crate::client_trait::DocChatApi;
use crate::error::ApiError;
use crate::utils::http_utils::{decode_json, ensure_success, log_send_error};

const UPLOAD_PATH: &str = "api/upload";
const CHAT_PATH: &str = "api/chat";
const DOCUMENTS_PATH: &str = "api/documents";
/// Multipart field the upload endpoint reads the file from.
const UPLOAD_FIELD: &str = "file";

/// Client for the document service.
///
/// JSON endpoints go through the retry middleware. The multipart upload
/// uses the plain client: its body is streamed and cannot be replayed.
#[derive(Debug, Clone)]
pub struct DocChatClient {
    http: Client,
    json_client: ClientWithMiddleware,
    config: Config,
}

impl DocChatClient {
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let http = Self::build_http_client(&config)?;
        let json_client = Self::build_retry_client(http.clone(), config.max_retries);
        Ok(Self {
            http,
            json_client,
            config,
        })
    }

    fn build_http_client(config: &Config) -> Result<Client, ApiError> {
        let mut builder = Client::builder().default_headers(Self::get_default_headers());
        if !config.http_proxy.is_empty() {
            builder = builder.proxy(Proxy::http(&config.http_proxy)?);
        }
        if !config.https_proxy.is_empty() {
            builder = builder.proxy(Proxy::https(&config.https_proxy)?);
        }
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }

    fn build_retry_client(client: Client, max_retries: u32) -> ClientWithMiddleware {
        if max_retries == 0 {
            return ClientBuilder::new(client).build();
        }

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(250), Duration::from_secs(10))
            .build_with_max_retries(max_retries);

        ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build()
    }

    pub fn get_default_headers() -> HeaderMap {
        let mut header = HeaderMap::new();
        header.insert(ACCEPT, HeaderValue::from_static("application/json"));
        header.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("docchat/", env!("CARGO_PKG_VERSION"))),
        );
        header
    }

    fn document_url(&self, document_id: &DocumentId) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.config.endpoint(DOCUMENTS_PATH))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(document_id.as_str());
        Ok(url)
    }
}

#[async_trait]
impl DocChatApi for DocChatClient {
    async fn upload(&self, file: &FileCandidate) -> Result<UploadReceipt, ApiError> {
        let url = self.config.endpoint(UPLOAD_PATH);
        info!(
            "Uploading {} ({} bytes, {}) to {}",
            file.name,
            file.size(),
            file.media_type,
            url
        );

        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.media_type)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let started = Instant::now();
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::from)
            .inspect_err(|e| log_send_error(&url, e))?;
        let response = ensure_success(&url, started, response).await?;

        let body: UploadResponseBody = decode_json(response).await?;
        let receipt = UploadReceipt::try_from(body)?;
        info!("Upload accepted as document {}", receipt.document_id);
        Ok(receipt)
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        let url = self.config.endpoint(CHAT_PATH);
        info!(
            "Sending chat message ({} chars) for document {:?}",
            request.message.chars().count(),
            request.document_id.as_ref().map(DocumentId::as_str)
        );

        let started = Instant::now();
        let response = self
            .json_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(ApiError::from)
            .inspect_err(|e| log_send_error(&url, e))?;
        let response = ensure_success(&url, started, response).await?;

        let body: ChatResponseBody = decode_json(response).await?;
        Ok(body.into())
    }

    async fn list_documents(&self) -> Result<Vec<DocumentSummary>, ApiError> {
        let url = self.config.endpoint(DOCUMENTS_PATH);

        let started = Instant::now();
        let response = self
            .json_client
            .get(&url)
            .send()
            .await
            .map_err(ApiError::from)
            .inspect_err(|e| log_send_error(&url, e))?;
        let response = ensure_success(&url, started, response).await?;

        decode_json(response).await
    }

    async fn delete_document(&self, document_id: &DocumentId) -> Result<(), ApiError> {
        let url = self.document_url(document_id)?;
        let url_str = url.to_string();
        info!("Deleting document {}", document_id);

        let started = Instant::now();
        let response = self
            .json_client
            .delete(url)
            .send()
            .await
            .map_err(ApiError::from)
            .inspect_err(|e| log_send_error(&url_str, e))?;
        ensure_success(&url_str, started, response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_url_encodes_id() {
        let mut config = Config::default();
        config.api_base = "http://localhost:8000/".to_string();
        let client = DocChatClient::new(config).unwrap();

        let id = DocumentId::parse("a b/c").unwrap();
        assert_eq!(
            client.document_url(&id).unwrap().as_str(),
            "http://localhost:8000/api/documents/a%20b%2Fc"
        );
    }
}
