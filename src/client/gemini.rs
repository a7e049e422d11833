//! Wire format of the Gemini `generateContent` call, the explanation prompt
//! and extraction of the generated text.

use crate::error::AdapterError;
use serde::{Deserialize, Serialize};

pub const SERVICE: &str = "gemini";

/// Returned when the service answers without any generated text
pub const FALLBACK_EXPLANATION: &str = "Sorry, I couldn't generate an explanation.";

#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Single-turn request carrying one text part
    #[must_use]
    pub fn from_prompt(prompt: String) -> Self {
        Self {
            contents: vec![Content {
                parts: Some(vec![Part { text: Some(prompt) }]),
            }],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<Part>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

/// Build the explanation prompt. Title and summary are embedded verbatim.
#[must_use]
pub fn build_prompt(title: &str, summary: &str) -> String {
    format!(
        "Your role is a NASA science communicator.\n\
         Your task is to explain a complex dataset to a curious high school student.\n\
         Be clear, concise, and engaging. Do not exceed three sentences.\n\
         \n\
         Dataset Title: \"{title}\"\n\
         Dataset Description: \"{summary}\"\n\
         \n\
         Explanation:\n"
    )
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, trimmed.
    ///
    /// Absent fields along `candidates[0].content.parts[0].text` yield
    /// [`FALLBACK_EXPLANATION`]; a `candidates` or `parts` list that is present
    /// but empty is a malformed response.
    pub fn into_explanation(self) -> Result<String, AdapterError> {
        let Some(candidates) = self.candidates else {
            return Ok(FALLBACK_EXPLANATION.to_string());
        };
        let Some(candidate) = candidates.into_iter().next() else {
            return Err(AdapterError::Malformed {
                service: SERVICE,
                message: "response contains no candidates".to_string(),
            });
        };
        let Some(parts) = candidate.content.and_then(|content| content.parts) else {
            return Ok(FALLBACK_EXPLANATION.to_string());
        };
        let Some(part) = parts.into_iter().next() else {
            return Err(AdapterError::Malformed {
                service: SERVICE,
                message: "first candidate contains no parts".to_string(),
            });
        };

        Ok(part
            .text
            .map_or_else(|| FALLBACK_EXPLANATION.to_string(), |text| text.trim().to_string()))
    }
}
