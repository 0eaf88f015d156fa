use crate::config::ClassifierConfig;
use crate::domain::{Intent, IntentResult, Lead, Offer};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Reasoning text reported when the remote call itself fails.
pub const CLASSIFIER_UNAVAILABLE: &str = "Gemini API unavailable";

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("classifier request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("classifier returned status {0}")]
    Status(StatusCode),
    #[error("classifier returned an empty response")]
    EmptyResponse,
    #[error("classifier returned malformed JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

/// Adapter contract around the external intent classifier. `classify` is
/// total for the production adapter; the `Result` exists so stub
/// implementations can fail and exercise the orchestrator's own guard.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, lead: &Lead, offer: &Offer) -> Result<IntentResult, ClassifierError>;
}

/// Gemini-backed classifier speaking the `generateContent` REST API.
pub struct GeminiClassifier {
    client: Client,
    config: ClassifierConfig,
}

impl GeminiClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    async fn request_intent(&self, prompt: &str) -> Result<IntentResult, ClassifierError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                thinking_config: ThinkingConfig { thinking_budget: 0 },
            },
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.config.api_key.as_deref().unwrap_or_default())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClassifierError::Status(response.status()));
        }

        let payload: GenerateContentResponse = response.json().await?;
        let text = payload.candidate_text();
        if text.trim().is_empty() {
            return Err(ClassifierError::EmptyResponse);
        }

        interpret_response(&text)
    }
}

#[async_trait]
impl IntentClassifier for GeminiClassifier {
    async fn classify(&self, lead: &Lead, offer: &Offer) -> Result<IntentResult, ClassifierError> {
        let prompt = build_prompt(lead, offer);
        match self.request_intent(&prompt).await {
            Ok(result) => Ok(result),
            Err(err) => {
                warn!(lead = %lead.name, error = %err, "Gemini API error, defaulting intent to Low");
                Ok(IntentResult {
                    intent: Intent::Low,
                    reasoning: CLASSIFIER_UNAVAILABLE.to_string(),
                })
            }
        }
    }
}

/// Interprets the free-text model reply: the first balanced brace-delimited
/// object is parsed as the result; text with no object at all falls back to
/// a Low intent carrying the raw reply. A found-but-unparseable object is an
/// error, handled upstream like any other remote failure.
pub fn interpret_response(text: &str) -> Result<IntentResult, ClassifierError> {
    match extract_json_object(text) {
        Some(object) => {
            let raw: RawIntent = serde_json::from_str(&object)?;
            Ok(IntentResult {
                intent: Intent::from_label(&raw.intent),
                reasoning: raw.reasoning,
            })
        }
        None => Ok(IntentResult {
            intent: Intent::Low,
            reasoning: text.trim().to_string(),
        }),
    }
}

fn extract_json_object(raw: &str) -> Option<String> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    for (index, ch) in raw[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(raw[start..start + index + ch.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

fn build_prompt(lead: &Lead, offer: &Offer) -> String {
    format!(
        "Offer:\n\
         name: {}\n\
         value_props: {}\n\
         ideal_use_cases: {}\n\
         \n\
         Lead:\n\
         name: {}\n\
         role: {}\n\
         company: {}\n\
         industry: {}\n\
         location: {}\n\
         linkedin_bio: {}\n\
         \n\
         Classify intent as High / Medium / Low and explain in 1-2 sentences. \
         Return JSON: {{\"intent\":\"\", \"reasoning\":\"\"}}",
        offer.name,
        offer.value_props.join("; "),
        offer.ideal_use_cases.join("; "),
        lead.name,
        lead.role,
        lead.company,
        lead.industry,
        lead.location,
        lead.linkedin_bio,
    )
}

#[derive(Debug, Deserialize)]
struct RawIntent {
    #[serde(default)]
    intent: String,
    #[serde(default)]
    reasoning: String,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "thinkingConfig")]
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
struct ThinkingConfig {
    #[serde(rename = "thinkingBudget")]
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn candidate_text(&self) -> String {
        self.candidates
            .iter()
            .flat_map(|candidate| candidate.content.parts.iter())
            .map(|part| part.text.as_str())
            .collect::<Vec<_>>()
            .join("")
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}
