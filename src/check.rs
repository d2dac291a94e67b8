//! The connectivity check: configure, list, resolve, generate.

use std::io::{self, Write};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{API_KEY_VAR, Credential};
use crate::v1beta::{
    models::Model,
    rest::{self, Client, GenerativeModel},
};

pub const PROMPT: &str = "Say hello and introduce yourself as a journal assistant";
/// Listed models are shown only if their name contains this.
pub const VENDOR_FILTER: &str = "gemini";
pub const REMEDIATION_HINT: &str = "Check API key validity and package installation.";
pub const SUCCESS_MESSAGE: &str = "Gemini API connectivity check passed.";

#[derive(Debug, Error)]
pub enum Error {
    #[error("client configuration failed: {0}")]
    ClientConfiguration(#[source] rest::Error),
    #[error("{step} failed: {source}")]
    RemoteCall {
        step: &'static str,
        #[source]
        source: rest::Error,
    },
    #[error("model {candidate} unavailable: {source}")]
    ModelResolution {
        candidate: String,
        #[source]
        source: rest::Error,
    },
    #[error("no model candidates configured")]
    NoCandidates,
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug)]
pub enum Outcome {
    /// No key was configured; guidance was printed and nothing was called.
    MissingCredential,
    Passed { model: String, text: String },
    /// A step failed and was reported by the top-level handler.
    Failed(Error),
}

/// Builds an [`Api`] from a credential.
pub trait Connector: Send + Sync {
    type Api: Api;

    fn connect(&self, credential: &Credential) -> Result<Self::Api, rest::Error>;
}

/// The three remote operations the check performs.
#[async_trait]
pub trait Api: Send + Sync {
    type Handle: Send + Sync;

    async fn list_models(&self) -> Result<Vec<Model>, rest::Error>;
    async fn model(&self, id: &str) -> Result<Self::Handle, rest::Error>;
    async fn generate(&self, handle: &Self::Handle, prompt: &str) -> Result<String, rest::Error>;
}

#[derive(Debug, Clone)]
pub struct RestConnector {
    api_base: String,
}

impl RestConnector {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
        }
    }
}

impl Connector for RestConnector {
    type Api = Client;

    fn connect(&self, credential: &Credential) -> Result<Client, rest::Error> {
        Ok(Client::configure(credential.expose())?.with_api_base(self.api_base.clone()))
    }
}

#[async_trait]
impl Api for Client {
    type Handle = GenerativeModel;

    async fn list_models(&self) -> Result<Vec<Model>, rest::Error> {
        self.list_all_models().await
    }

    async fn model(&self, id: &str) -> Result<GenerativeModel, rest::Error> {
        Client::model(self, id).await
    }

    async fn generate(&self, handle: &GenerativeModel, prompt: &str) -> Result<String, rest::Error> {
        handle.generate_text(prompt).await
    }
}

pub struct Checker<C> {
    connector: C,
    candidates: Vec<String>,
}

impl<C: Connector> Checker<C> {
    pub fn new(connector: C, candidates: Vec<String>) -> Self {
        Self {
            connector,
            candidates,
        }
    }

    /// Runs the check, writing the report to `out`.
    ///
    /// Remote failures are reported and returned as [`Outcome::Failed`];
    /// only failures to write the report itself surface as `Err`.
    pub async fn run<W: Write>(
        &self,
        credential: Option<&Credential>,
        out: &mut W,
    ) -> io::Result<Outcome> {
        let Some(credential) = credential else {
            info!("no API key configured");
            writeln!(out, "{API_KEY_VAR} not found in environment.")?;
            writeln!(
                out,
                "Add {API_KEY_VAR}=<your key> to a .env file or export it in your shell."
            )?;
            return Ok(Outcome::MissingCredential);
        };
        writeln!(out, "API key loaded: {}", credential.redacted())?;

        match self.check(credential, out).await {
            Ok((model, text)) => Ok(Outcome::Passed { model, text }),
            Err(Error::Io(err)) => Err(err),
            Err(err) => {
                warn!(error = %err, "connectivity check failed");
                writeln!(out, "Error: {err}")?;
                writeln!(out, "{REMEDIATION_HINT}")?;
                Ok(Outcome::Failed(err))
            }
        }
    }

    async fn check<W: Write>(
        &self,
        credential: &Credential,
        out: &mut W,
    ) -> Result<(String, String), Error> {
        let api = self
            .connector
            .connect(credential)
            .map_err(Error::ClientConfiguration)?;
        debug!("client configured");

        let models = api.list_models().await.map_err(|source| Error::RemoteCall {
            step: "listing models",
            source,
        })?;
        debug!(count = models.len(), "models listed");
        writeln!(out, "Available models:")?;
        for model in models.iter().filter(|m| m.name.contains(VENDOR_FILTER)) {
            writeln!(out, "  - {}", model.name)?;
        }

        let (candidate, handle) = self.resolve(&api, out).await?;
        writeln!(out, "Using model: {candidate}")?;

        let text = api
            .generate(&handle, PROMPT)
            .await
            .map_err(|source| Error::RemoteCall {
                step: "generating content",
                source,
            })?;
        writeln!(out, "Response:")?;
        writeln!(out, "{text}")?;
        writeln!(out, "{SUCCESS_MESSAGE}")?;

        Ok((candidate, text))
    }

    /// Tries each candidate in order. Failures of all but the last are
    /// reported and skipped; the last failure is returned to the caller.
    async fn resolve<W: Write>(
        &self,
        api: &C::Api,
        out: &mut W,
    ) -> Result<(String, <C::Api as Api>::Handle), Error> {
        let Some((last, fallbacks)) = self.candidates.split_last() else {
            return Err(Error::NoCandidates);
        };

        for candidate in fallbacks {
            debug!(%candidate, "resolving model");
            match api.model(candidate).await {
                Ok(handle) => return Ok((candidate.clone(), handle)),
                Err(err) => {
                    warn!(%candidate, error = %err, "model candidate unavailable");
                    writeln!(out, "Model {candidate} unavailable: {err}")?;
                }
            }
        }

        debug!(candidate = %last, "resolving model");
        let handle = api
            .model(last)
            .await
            .map_err(|source| Error::ModelResolution {
                candidate: last.clone(),
                source,
            })?;
        Ok((last.clone(), handle))
    }
}
