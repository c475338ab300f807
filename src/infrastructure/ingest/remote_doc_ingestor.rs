use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::Deserialize;

use crate::application::ports::{DocumentIngest, IngestError};
use crate::domain::MimeKind;

pub const POLL_TIMEOUT: Duration = Duration::from_secs(300);
pub const INITIAL_BACKOFF: Duration = Duration::from_secs(2);
pub const MAX_BACKOFF: Duration = Duration::from_secs(60);
pub const API_VERSION: &str = "2024-11-30";

/// Client for the layout analysis service that turns PDFs, Office
/// documents and images into plain text. The service is asynchronous:
/// submit returns an operation URL which is polled until the analysis
/// settles.
pub struct RemoteDocIngestor {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl RemoteDocIngestor {
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn submit(&self, data: &[u8], mime: MimeKind) -> Result<String, IngestError> {
        let b64 = general_purpose::STANDARD.encode(data);
        let body = serde_json::json!({
            "base64Source": b64,
            "mimeType": mime.as_mime(),
        });

        let url = format!(
            "{}/v1/documents:analyze?api-version={}&outputFormat=text",
            self.endpoint, API_VERSION
        );

        let response = self
            .client
            .post(&url)
            .header("X-Api-Key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| IngestError::ExtractionFailed(format!("layout submit failed: {e}")))?;

        if response.status().as_u16() == 422 {
            let text = response.text().await.unwrap_or_default();
            return Err(IngestError::CorruptFile(format!(
                "layout service rejected document: {text}"
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(IngestError::ExtractionFailed(format!(
                "layout submit returned {status}: {text}"
            )));
        }

        let operation_url = response
            .headers()
            .get("Operation-Location")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                IngestError::ExtractionFailed(
                    "layout response missing Operation-Location header".to_string(),
                )
            })?
            .to_string();

        Ok(operation_url)
    }

    async fn poll_until_complete(&self, operation_url: &str) -> Result<String, IngestError> {
        let poll_future = async {
            let mut backoff = INITIAL_BACKOFF;

            loop {
                let response = self
                    .client
                    .get(operation_url)
                    .header("X-Api-Key", &self.api_key)
                    .send()
                    .await
                    .map_err(|e| {
                        IngestError::ExtractionFailed(format!("layout poll request failed: {e}"))
                    })?;

                if response.status().as_u16() == 429 {
                    let retry_after = response
                        .headers()
                        .get("Retry-After")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(backoff.as_secs());
                    tokio::time::sleep(Duration::from_secs(retry_after)).await;
                    continue;
                }

                if !response.status().is_success() {
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    return Err(IngestError::ExtractionFailed(format!(
                        "layout poll returned {status}: {text}"
                    )));
                }

                let result: AnalyzeResponse = response.json().await.map_err(|e| {
                    IngestError::ExtractionFailed(format!("layout response parse failed: {e}"))
                })?;

                match result.status.as_str() {
                    "succeeded" => {
                        let content = result.analyze_result.map(|r| r.content).unwrap_or_default();
                        return Ok(content);
                    }
                    "failed" => {
                        return Err(IngestError::CorruptFile(
                            "layout analysis failed for this document".to_string(),
                        ));
                    }
                    _ => {
                        tokio::time::sleep(backoff).await;
                        backoff = (backoff * 2).min(MAX_BACKOFF);
                    }
                }
            }
        };

        tokio::time::timeout(POLL_TIMEOUT, poll_future)
            .await
            .map_err(|_| IngestError::ExtractionTimeout(POLL_TIMEOUT.as_secs()))?
    }
}

#[async_trait]
impl DocumentIngest for RemoteDocIngestor {
    #[tracing::instrument(skip(self, data), fields(mime = %mime, size_bytes = data.len()))]
    async fn read_text(&self, data: &[u8], mime: MimeKind) -> Result<String, IngestError> {
        if mime == MimeKind::Text {
            return Err(IngestError::UnsupportedFormat(mime.as_mime().to_string()));
        }

        if data.is_empty() {
            return Err(IngestError::EmptyDocument);
        }

        let operation_url = self.submit(data, mime).await?;
        let content = self.poll_until_complete(&operation_url).await?;

        if content.trim().is_empty() {
            return Err(IngestError::EmptyDocument);
        }

        Ok(content)
    }
}

#[derive(Deserialize)]
pub struct AnalyzeResponse {
    pub status: String,
    #[serde(rename = "analyzeResult")]
    pub analyze_result: Option<AnalyzeResult>,
}

#[derive(Deserialize)]
pub struct AnalyzeResult {
    pub content: String,
}
