use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::dto::ai_dto::{
    GenerateJobDescriptionPayload, GenerateJobDescriptionResponse, GeneratedJobText,
    GenerationMetadata,
};
use crate::error::{Error, Result, UpstreamError};
use crate::utils::job_sections::split_sections;

const SYSTEM_PROMPT: &str = "You are an experienced HR professional and job description writer. \
Create compelling, professional job postings that attract strong candidates. \
Write in a professional yet engaging tone and use bullet points for clarity.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone)]
pub struct AIService {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Completion {
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Maps a provider failure to the error the API reports. Known codes win over the
/// HTTP status; a bare 429 is treated as rate limiting.
fn classify_failure(status: StatusCode, body: &str) -> UpstreamError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error);
    let code = parsed.as_ref().and_then(|e| e.code.as_deref());

    match code {
        Some("insufficient_quota") => UpstreamError::QuotaExceeded,
        Some("invalid_api_key") => UpstreamError::InvalidApiKey,
        Some("rate_limit_exceeded") => UpstreamError::RateLimited,
        _ if status == StatusCode::TOO_MANY_REQUESTS => UpstreamError::RateLimited,
        _ => {
            let detail = parsed
                .and_then(|e| e.message)
                .unwrap_or_else(|| body.chars().take(200).collect());
            UpstreamError::Other(format!("provider returned {}: {}", status, detail))
        }
    }
}

fn user_prompt(payload: &GenerateJobDescriptionPayload) -> String {
    let title = payload.job_title.trim();
    let mut context = format!("Job Title: {}\n", title);
    let optional = [
        ("Category", &payload.category),
        ("Job Type", &payload.job_type),
        ("Location", &payload.location),
    ];
    for (label, value) in optional {
        if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            context.push_str(&format!("{}: {}\n", label, v));
        }
    }

    format!(
        "Create a comprehensive job posting for the following position:\n\n{context}\n\
Please provide TWO distinct sections:\n\n\
**SECTION 1: JOB DESCRIPTION**\n\
A short introduction to the role, 6-8 key responsibilities, and what makes the position exciting.\n\n\
**SECTION 2: REQUIREMENTS**\n\
Essential qualifications (education, years of experience, core skills) followed by preferred qualifications.\n\n\
Use clear bullet points and make it specific to the {title} role."
    )
}

impl AIService {
    pub fn new(client: Client, api_key: String, model: String, max_tokens: u32, base_url: String) -> Self {
        Self {
            client,
            api_key,
            model,
            max_tokens,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn generate_job_description(
        &self,
        payload: &GenerateJobDescriptionPayload,
    ) -> Result<GenerateJobDescriptionResponse> {
        let job_title = payload.job_title.trim();
        if job_title.is_empty() {
            return Err(Error::BadRequest("Job title is required".to_string()));
        }

        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": user_prompt(payload)}
            ],
            "max_tokens": self.max_tokens,
            "temperature": 0.7,
            "presence_penalty": 0.1,
            "frequency_penalty": 0.1
        });

        let completion = self.chat_openai(body).await.map_err(|e| {
            error!(job_title = %job_title, error = %e, "job description generation failed");
            e
        })?;

        let full_text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                Error::Upstream(UpstreamError::Other(
                    "completion carried no message content".to_string(),
                ))
            })?;
        let tokens_used = completion.usage.map(|u| u.total_tokens).unwrap_or(0);
        let sections = split_sections(&full_text);

        info!(job_title = %job_title, tokens_used, "job description generated");

        Ok(GenerateJobDescriptionResponse {
            success: true,
            data: GeneratedJobText {
                description: sections.description,
                requirements: sections.requirements,
                full_text,
            },
            metadata: GenerationMetadata {
                model: completion.model.unwrap_or_else(|| self.model.clone()),
                tokens_used,
                job_title: job_title.to_string(),
            },
        })
    }

    async fn chat_openai(&self, payload: serde_json::Value) -> Result<Completion> {
        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| Error::Upstream(UpstreamError::Other(e.to_string())))?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(Error::Upstream(classify_failure(status, &text)));
        }

        res.json::<Completion>()
            .await
            .map_err(|e| Error::Upstream(UpstreamError::Other(format!("invalid completion body: {}", e))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_their_variants() {
        let quota = r#"{"error":{"code":"insufficient_quota","message":"quota"}}"#;
        assert_eq!(
            classify_failure(StatusCode::TOO_MANY_REQUESTS, quota),
            UpstreamError::QuotaExceeded
        );

        let key = r#"{"error":{"code":"invalid_api_key","message":"bad key"}}"#;
        assert_eq!(
            classify_failure(StatusCode::UNAUTHORIZED, key),
            UpstreamError::InvalidApiKey
        );

        let rate = r#"{"error":{"code":"rate_limit_exceeded"}}"#;
        assert_eq!(
            classify_failure(StatusCode::TOO_MANY_REQUESTS, rate),
            UpstreamError::RateLimited
        );
    }

    #[test]
    fn bare_429_is_rate_limited() {
        assert_eq!(
            classify_failure(StatusCode::TOO_MANY_REQUESTS, "slow down"),
            UpstreamError::RateLimited
        );
    }

    #[test]
    fn unknown_failures_keep_detail() {
        let body = r#"{"error":{"code":"server_error","message":"boom"}}"#;
        match classify_failure(StatusCode::INTERNAL_SERVER_ERROR, body) {
            UpstreamError::Other(detail) => assert!(detail.contains("boom")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn prompt_skips_blank_optional_fields() {
        let payload = GenerateJobDescriptionPayload {
            job_title: "  Data Engineer ".into(),
            category: Some("Engineering".into()),
            job_type: Some("   ".into()),
            location: None,
        };
        let prompt = user_prompt(&payload);
        assert!(prompt.contains("Job Title: Data Engineer\n"));
        assert!(prompt.contains("Category: Engineering"));
        assert!(!prompt.contains("Job Type:"));
        assert!(!prompt.contains("Location:"));
    }
}
