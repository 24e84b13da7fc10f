use std::path::PathBuf;

use clap::Parser;
use trivia_api::{server::app::run_server, settings::Settings, telemetry::init_tracing};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Config file, defaults to an optional `trivia.toml` in the working directory
    #[clap(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    init_tracing(&settings.log)?;
    run_server(settings).await
}
