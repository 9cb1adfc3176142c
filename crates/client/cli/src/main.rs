//! Console host for bureau photocopiers.
mod config;
mod input;
mod session;

use anyhow::Result;
use config::CliConfig;
use session::Session;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CliConfig::from_env()?;

    Session::new(config)?.run().await
}
