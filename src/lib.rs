//! Connectivity check for Google's Gemini API.
//!
//! The crate wraps the handful of **v1beta** REST endpoints needed to prove an
//! API key works end to end: list the available models, resolve one of a few
//! candidate models, and run a single text generation.
//! [`check::Checker`] drives those calls and writes a plain-text report.
//!
//! ## Example
//!
//! ```no_run
//! use gemini_check::{check::{Checker, RestConnector}, config::Config};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env();
//! let checker = Checker::new(RestConnector::new(config.api_base), config.candidates);
//! let outcome = checker.run(config.api_key.as_ref(), &mut std::io::stdout()).await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

pub mod check;
pub mod config;
pub mod v1beta;
