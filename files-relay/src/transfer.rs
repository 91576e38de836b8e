#![doc = "Files API transfer client: submits file content and fetches summaries and records."]
//
//! [`FilesApiClient`] implements the core [`TransferClient`] contract over HTTP:
//!
//! | operation       | request                              |
//! |-----------------|--------------------------------------|
//! | `submit`        | `POST {root}/files` (body = content) |
//! | `fetch_summary` | `GET {root}/files/{id}`              |
//! | `fetch_records` | `GET {root}/files/{id}/records`      |
//!
//! Every request carries the credential as its `Authorization` header. A 2xx
//! JSON body is returned parsed; any other 2xx body comes back as a JSON
//! string. Non-2xx responses become errors carrying status and body.

use std::time::Duration;

use async_trait::async_trait;
use files_relay_core::{BoxError, Credential, FileFormat, TransferClient};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use url::Url;

pub struct FilesApiClient {
    http: Client,
    file_format: FileFormat,
}

impl FilesApiClient {
    pub fn new(file_format: FileFormat, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, file_format))
    }

    pub fn with_client(http: Client, file_format: FileFormat) -> Self {
        FilesApiClient { http, file_format }
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> Result<Value, BoxError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, operation, "Files API unreachable");
            e
        })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::error!(%status, operation, "Files API rejected the request");
            return Err(format!("files API returned {status}: {}", body.trim()).into());
        }

        tracing::info!(%status, operation, bytes = body.len(), "Files API request succeeded");
        Ok(parse_body(body))
    }
}

fn content_type(format: FileFormat) -> &'static str {
    match format {
        FileFormat::Txt => "text/plain; charset=utf-8",
        FileFormat::Json => "application/json",
    }
}

/// Append percent-encoded path segments to the API root.
fn endpoint(api_root: &str, segments: &[&str]) -> Result<Url, BoxError> {
    let mut url = Url::parse(api_root)?;
    url.path_segments_mut()
        .map_err(|_| format!("API root cannot take path segments: {api_root}"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn parse_body(body: String) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&body).unwrap_or(Value::String(body))
}

#[async_trait]
impl TransferClient for FilesApiClient {
    async fn submit(
        &self,
        api_root: &str,
        credential: &Credential,
        content: String,
    ) -> Result<Value, BoxError> {
        let url = endpoint(api_root, &["files"])?;
        tracing::info!(%url, file_format = ?self.file_format, bytes = content.len(), "Uploading file content");
        let request = self
            .http
            .post(url)
            .header(AUTHORIZATION, credential.expose())
            .header(CONTENT_TYPE, content_type(self.file_format))
            .body(content);
        self.send("upload", request).await
    }

    async fn fetch_summary(
        &self,
        api_root: &str,
        credential: &Credential,
        file_id: &str,
    ) -> Result<Value, BoxError> {
        let url = endpoint(api_root, &["files", file_id])?;
        tracing::info!(%url, file_id, "Fetching file summary");
        let request = self.http.get(url).header(AUTHORIZATION, credential.expose());
        self.send("summary", request).await
    }

    async fn fetch_records(
        &self,
        api_root: &str,
        credential: &Credential,
        file_id: &str,
    ) -> Result<Value, BoxError> {
        let url = endpoint(api_root, &["files", file_id, "records"])?;
        tracing::info!(%url, file_id, "Fetching file records");
        let request = self.http.get(url).header(AUTHORIZATION, credential.expose());
        self.send("records", request).await
    }
}
