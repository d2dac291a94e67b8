use derive_new::new;
use serde::{Deserialize, Serialize};

pub const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Deserialize, Serialize, new)]
pub struct Content {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single content part. Only text is modelled; other part kinds returned by
/// the API (inline data, function calls, ...) deserialize with `text: None`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            thought: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

pub mod request {
    use derive_new::new;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Deserialize, Serialize, new)]
    #[serde(rename_all = "camelCase")]
    pub struct Request {
        #[new(into)]
        contents: Vec<super::Content>,
    }

    impl Request {
        /// Single-turn user prompt.
        pub fn prompt(text: impl Into<String>) -> Self {
            Self::new(vec![super::Content::new(
                Some(super::Role::User),
                vec![super::Part::text(text)],
            )])
        }
    }
}

pub mod response {
    use serde::Deserialize;

    #[derive(Debug, Clone, Deserialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct Response {
        #[serde(default)]
        pub candidates: Vec<Candidate>,
        #[serde(default)]
        pub prompt_feedback: Option<PromptFeedback>,
        #[serde(default)]
        pub usage_metadata: Option<UsageMetadata>,
    }

    impl Response {
        /// Concatenated text of the first candidate, skipping thought parts.
        ///
        /// Returns `None` when the response carries no text at all, e.g. when
        /// the prompt was blocked.
        pub fn text(&self) -> Option<String> {
            let content = self.candidates.first()?.content.as_ref()?;
            let text: String = content
                .parts
                .iter()
                .filter(|part| part.thought != Some(true))
                .filter_map(|part| part.text.as_deref())
                .collect();
            (!text.is_empty()).then_some(text)
        }

        pub fn finish_reason(&self) -> Option<&FinishReason> {
            self.candidates.first()?.finish_reason.as_ref()
        }
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct Candidate {
        #[serde(default)]
        pub content: Option<super::Content>,
        #[serde(default)]
        pub finish_reason: Option<FinishReason>,
        #[serde(default)]
        pub index: Option<i32>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct UsageMetadata {
        pub prompt_token_count: Option<u32>,
        pub candidates_token_count: Option<u32>,
        pub total_token_count: Option<u32>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct PromptFeedback {
        #[serde(default)]
        pub block_reason: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize, PartialEq)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum FinishReason {
        FinishReasonUnspecified,
        Stop,
        MaxTokens,
        Safety,
        Recitation,
        #[serde(other)]
        Other,
    }
}

pub mod models {
    use derive_new::new;
    use derive_setters::Setters;
    use serde::Deserialize;

    #[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "camelCase")]
    pub struct Model {
        /// Resource name, e.g. `models/gemini-1.5-flash`.
        pub name: String,
        #[serde(default)]
        pub display_name: Option<String>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub input_token_limit: Option<u32>,
        #[serde(default)]
        pub output_token_limit: Option<u32>,
        #[serde(default)]
        pub supported_generation_methods: Vec<String>,
    }

    impl Model {
        /// Name without the `models/` prefix.
        pub fn id(&self) -> &str {
            self.name.strip_prefix("models/").unwrap_or(&self.name)
        }
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct ListModelsResponse {
        #[serde(default)]
        pub models: Vec<Model>,
        #[serde(default)]
        pub next_page_token: Option<String>,
    }

    #[derive(Debug, Clone, Default, new, Setters)]
    #[setters(prefix = "with_", into, strip_option)]
    pub struct ListModelsConfig {
        #[new(default)]
        pub page_size: Option<u32>,
        #[new(default)]
        pub page_token: Option<String>,
    }
}

pub mod rest;
