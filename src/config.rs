use std::fmt;

use crate::v1beta::API_BASE;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const API_BASE_VAR: &str = "GEMINI_API_BASE";
pub const CANDIDATES_VAR: &str = "GEMINI_MODEL_CANDIDATES";

/// Models tried in order until one resolves.
pub const DEFAULT_CANDIDATES: [&str; 3] = ["gemini-1.5-flash", "gemini-1.5-pro", "gemini-pro"];

/// A non-empty API key. Formatting never shows more than the first and last
/// four characters.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for empty or whitespace-only values.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// `abcd...wxyz` for keys of at least eight characters, `...` otherwise.
    pub fn redacted(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() < 8 {
            return "...".to_string();
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.redacted()).finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<Credential>,
    pub api_base: String,
    pub candidates: Vec<String>,
}

impl Config {
    /// Reads the process environment. Call `dotenv()` first to pick up `.env`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR).and_then(Credential::new);

        let api_base = lookup(API_BASE_VAR)
            .map(|base| base.trim().trim_end_matches('/').to_string())
            .filter(|base| !base.is_empty())
            .unwrap_or_else(|| API_BASE.to_string());

        let candidates: Vec<String> = lookup(CANDIDATES_VAR)
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|candidate| !candidate.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        let candidates = if candidates.is_empty() {
            DEFAULT_CANDIDATES.iter().map(|c| c.to_string()).collect()
        } else {
            candidates
        };

        Self {
            api_key,
            api_base,
            candidates,
        }
    }
}
