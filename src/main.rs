use dotenv::dotenv;
use gemini_check::{
    check::{Checker, Outcome, RestConnector},
    config::Config,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let env_file = dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match env_file {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(err) if err.not_found() => debug!("no .env file found"),
        Err(err) => warn!(error = %err, "failed to load .env"),
    }

    let config = Config::from_env();
    debug!(api_base = %config.api_base, candidates = ?config.candidates, "configuration loaded");

    let checker = Checker::new(RestConnector::new(config.api_base), config.candidates);
    let mut stdout = std::io::stdout().lock();
    match checker.run(config.api_key.as_ref(), &mut stdout).await {
        Ok(Outcome::Passed { model, .. }) => info!(%model, "check passed"),
        Ok(Outcome::MissingCredential) => info!("check skipped"),
        Ok(Outcome::Failed(_)) => info!("check failed"),
        Err(err) => warn!(error = %err, "failed to write report to stdout"),
    }
}
