use super::{
    API_BASE,
    models::{ListModelsConfig, ListModelsResponse, Model},
    request, response,
};
use derive_setters::Setters;
use reqwest::header::HeaderValue;
use serde::{Deserialize, de::DeserializeOwned};
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum Error {
    #[error("API key is empty or contains characters that cannot be sent in a header")]
    InvalidCredential,
    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },
    #[error("response contained no text ({reason})")]
    EmptyResponse { reason: String },
    #[error("model listing returned page token {0:?} twice")]
    RepeatedPageToken(String),
    #[error(transparent)]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Configured connection to the REST API. The API key travels in the
/// `x-goog-api-key` header, never in the URL.
#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_", into)]
pub struct Client {
    #[setters(skip)]
    api_key: HeaderValue,
    api_base: String,
    client: reqwest::Client,
}

impl Client {
    /// Validates the key and builds a client against [`API_BASE`].
    pub fn configure(api_key: impl AsRef<str>) -> Result<Self, Error> {
        let api_key = api_key.as_ref();
        if api_key.is_empty() {
            return Err(Error::InvalidCredential);
        }
        let mut api_key = HeaderValue::from_str(api_key).map_err(|_| Error::InvalidCredential)?;
        api_key.set_sensitive(true);

        Ok(Self {
            api_key,
            api_base: API_BASE.to_string(),
            client: reqwest::Client::new(),
        })
    }

    /// Fetches a single page of the model listing.
    pub async fn list_models(&self, config: &ListModelsConfig) -> Result<ListModelsResponse, Error> {
        let mut url = url::Url::parse(&format!("{}/models", self.api_base))?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(page_size) = config.page_size {
                pairs.append_pair("pageSize", &page_size.to_string());
            }
            if let Some(page_token) = &config.page_token {
                pairs.append_pair("pageToken", page_token);
            }
        }
        debug!(%url, "listing models");
        self.send(self.client.get(url)).await
    }

    /// Follows `nextPageToken` until the listing is exhausted. A token seen
    /// twice means the server is cycling and fails the listing.
    pub async fn list_all_models(&self) -> Result<Vec<Model>, Error> {
        let mut config = ListModelsConfig::new();
        let mut seen = HashSet::new();
        let mut models = Vec::new();
        loop {
            let page = self.list_models(&config).await?;
            models.extend(page.models);
            match page.next_page_token {
                Some(token) if !token.is_empty() => {
                    if !seen.insert(token.clone()) {
                        return Err(Error::RepeatedPageToken(token));
                    }
                    config.page_token = Some(token);
                }
                _ => break,
            }
        }
        Ok(models)
    }

    /// Looks up `id` (with or without the `models/` prefix) and returns a
    /// handle bound to it. Fails if the service does not know the model.
    pub async fn model(&self, id: &str) -> Result<GenerativeModel, Error> {
        let url = format!("{}/{}", self.api_base, model_path(id));
        debug!(%url, "resolving model");
        let model: Model = self.send(self.client.get(&url)).await?;
        Ok(GenerativeModel {
            client: self.clone(),
            model,
        })
    }

    async fn send<T: DeserializeOwned>(&self, builder: reqwest::RequestBuilder) -> Result<T, Error> {
        let response = builder
            .header(reqwest::header::USER_AGENT, env!("CARGO_CRATE_NAME"))
            .header(API_KEY_HEADER, self.api_key.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error body: {}", e));
            let message = serde_json::from_str::<ErrorBody>(&error_body)
                .map(|body| body.error.message)
                .unwrap_or(error_body);
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// A resolved model, ready to serve generation requests.
#[derive(Debug, Clone)]
pub struct GenerativeModel {
    client: Client,
    model: Model,
}

impl GenerativeModel {
    pub fn descriptor(&self) -> &Model {
        &self.model
    }

    pub async fn generate_content(
        &self,
        request: request::Request,
    ) -> Result<response::Response, Error> {
        let url = format!(
            "{}/{}:generateContent",
            self.client.api_base,
            model_path(&self.model.name)
        );
        debug!(%url, "generating content");
        self.client
            .send(
                self.client
                    .client
                    .post(&url)
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .json(&request),
            )
            .await
    }

    /// Sends `prompt` as a single user turn and returns the response text.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, Error> {
        let response = self
            .generate_content(request::Request::prompt(prompt))
            .await?;
        response.text().ok_or_else(|| Error::EmptyResponse {
            reason: empty_reason(&response),
        })
    }
}

fn empty_reason(response: &response::Response) -> String {
    if let Some(reason) = response.finish_reason() {
        return format!("finish reason: {reason:?}");
    }
    match response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_deref())
    {
        Some(block_reason) => format!("prompt blocked: {block_reason}"),
        None => "no candidates".to_string(),
    }
}

fn model_path(id: &str) -> String {
    if id.starts_with("models/") {
        id.to_string()
    } else {
        format!("models/{id}")
    }
}
