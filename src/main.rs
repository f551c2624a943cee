use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod auth;
mod ecr;
mod error;
mod render;
mod session;
mod settings;

use ecr::EcrTokenFetcher;
use session::ImdsRegion;
use settings::Settings;

async fn run() -> Result<()> {
    let settings = Settings::from_env();

    let region = session::resolve_region(&settings, &ImdsRegion).await?;
    let aws_config = session::load_session(region).await;
    let fetcher = EcrTokenFetcher::new(&aws_config);

    app::login(&fetcher, &settings, &mut std::io::stdout()).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    // Logs go to stderr, stdout is reserved for rendered output
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
