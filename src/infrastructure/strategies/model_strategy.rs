use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::application::ports::{ContactExtractor, ExtractorError};
use crate::domain::{DocumentProfile, ExtractionOptions, RawContact, StrategyKind};
use crate::infrastructure::observability::redact_contact_details;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
pub const MAX_COMPLETION_TOKENS: u32 = 4096;

/// Confidence used when the model omits one for a contact.
const DEFAULT_MODEL_CONFIDENCE: f32 = 0.7;

const EXTRACTION_PROMPT: &str = "You extract contact records from production call sheets and \
crew lists. Find every person with their role, company, email address and phone number. \
Reply with only a JSON array, no prose and no code fences, where each element is \
{\"name\": string, \"role\": string|null, \"company\": string|null, \"email\": string|null, \
\"phone\": string|null, \"confidence\": number between 0 and 1}. \
Skip entries without a person name.";

/// Extraction through an OpenAI-compatible chat completions endpoint.
pub struct ModelStrategy {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl ModelStrategy {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String, ExtractorError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "max_tokens": MAX_COMPLETION_TOKENS,
            "temperature": 0.0,
            "stream": false
        });

        let url = format!("{}/v1/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractorError::Timeout(REQUEST_TIMEOUT.as_secs())
                } else {
                    ExtractorError::Unavailable(format!("model request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return if status.is_server_error() || status.as_u16() == 429 {
                Err(ExtractorError::Unavailable(format!(
                    "model returned {status}: {text}"
                )))
            } else {
                Err(ExtractorError::Failed(format!(
                    "model returned {status}: {text}"
                )))
            };
        }

        let raw_bytes = response
            .bytes()
            .await
            .map_err(|e| ExtractorError::Failed(format!("model read error: {e}")))?;

        let completion: ChatCompletion = serde_json::from_slice(&raw_bytes).map_err(|e| {
            let raw_text = String::from_utf8_lossy(&raw_bytes);
            tracing::error!(
                raw_response = %redact_contact_details(&raw_text),
                "Failed to parse chat completion JSON"
            );
            ExtractorError::Failed(format!("model JSON parse error: {e}"))
        })?;

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

#[async_trait]
impl ContactExtractor for ModelStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Model
    }

    #[tracing::instrument(skip_all, fields(text_len = text.len()))]
    async fn extract(
        &self,
        text: &str,
        profile: &DocumentProfile,
        _options: &ExtractionOptions,
    ) -> Result<Vec<RawContact>, ExtractorError> {
        let prompt = format!(
            "{}\n\nDocument type: {}. Production category: {}.\n\n{}",
            EXTRACTION_PROMPT, profile.document_type, profile.production_category, text
        );

        let content = self.complete(&prompt).await?;
        let contacts = parse_model_contacts(&content)?;
        tracing::debug!(contacts = contacts.len(), "Model extraction parsed");
        Ok(contacts)
    }
}

/// Parses the model's reply into contacts. Accepts a bare JSON array or
/// a `{"contacts": [...]}` wrapper, with or without code fences.
pub fn parse_model_contacts(content: &str) -> Result<Vec<RawContact>, ExtractorError> {
    let stripped = strip_code_fences(content);

    let entries: Vec<ModelContact> = match serde_json::from_str(stripped) {
        Ok(entries) => entries,
        Err(_) => {
            let wrapper: ContactsWrapper = serde_json::from_str(stripped).map_err(|e| {
                ExtractorError::Failed(format!("model returned unparseable contacts: {e}"))
            })?;
            wrapper.contacts
        }
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| {
            let name = entry.name?.trim().to_string();
            if name.is_empty() {
                return None;
            }
            let confidence = entry
                .confidence
                .unwrap_or(DEFAULT_MODEL_CONFIDENCE)
                .clamp(0.0, 1.0);
            let mut contact = RawContact::new(name, StrategyKind::Model, confidence);
            if let Some(role) = non_empty(entry.role) {
                contact = contact.with_role(role);
            }
            if let Some(company) = non_empty(entry.company) {
                contact = contact.with_company(company);
            }
            if let Some(email) = non_empty(entry.email) {
                contact = contact.with_email(email);
            }
            if let Some(phone) = non_empty(entry.phone) {
                contact = contact.with_phone(phone);
            }
            Some(contact)
        })
        .collect())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ModelContact {
    name: Option<String>,
    role: Option<String>,
    company: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    confidence: Option<f32>,
}

#[derive(Deserialize)]
struct ContactsWrapper {
    contacts: Vec<ModelContact>,
}
