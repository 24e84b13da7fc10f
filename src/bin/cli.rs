use std::path::PathBuf;

use clap::{Parser, Subcommand};
use trivia_api::db::{self, transfer};
use trivia_api::settings::Settings;
use trivia_api::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Config file, defaults to an optional `trivia.toml` in the working directory
    #[clap(long)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations
    Migrate,
    /// Import categories.csv and questions.csv from a directory
    Import { path: PathBuf },
    /// Export categories and questions as csv into a directory
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    init_tracing(&settings.log)?;
    let pool = db::establish_connection(&settings.database).await?;
    db::run_migrations(&pool).await?;

    match cli.command {
        Commands::Migrate => tracing::info!("Migrations applied"),
        Commands::Import { path } => {
            let summary = transfer::import_data(&pool, &path).await?;
            tracing::info!(
                categories = summary.categories,
                questions = summary.questions,
                "Imported data from {}",
                path.display()
            );
        }
        Commands::Export { path } => {
            transfer::export_data(&pool, &path).await?;
            tracing::info!("Exported data to {}", path.display());
        }
    }
    Ok(())
}
