use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use tastematch_core::config::{resolve_with_base, Config};
use tastematch_core::rows::load_rows;
use tastematch_core::traits::RecommendationStore;
use tastematch_core::types::EntityKind;
use tastematch_pipeline::RecommendationPipeline;
use tastematch_store::LanceRecommendationStore;

#[derive(Parser)]
#[command(name = "tastematch", about = "Tag-overlap restaurant recommendations")]
struct Cli {
    /// Directory holding config.toml and its environment overlays.
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score every user and replace their stored recommendations.
    Run {
        /// Score and print the summary without writing to the store.
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the stored recommendations of one user.
    Show { user_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::load_from(&cli.config_dir).context("loading configuration")?;
    let settings = config.settings()?;
    let base = config.base_dir();
    let store_uri = resolve_with_base(base, &settings.store.uri);

    match cli.command {
        Command::Run { dry_run } => {
            let users = load_rows(&resolve_with_base(base, &settings.input.user_rows), EntityKind::User)?;
            let restaurants = load_rows(&resolve_with_base(base, &settings.input.restaurant_rows), EntityKind::Restaurant)?;
            tracing::info!(user_rows = users.len(), restaurant_rows = restaurants.len(), "tag rows loaded");
            let pipeline = RecommendationPipeline::new(settings.pipeline.clone())?;
            let summary = if dry_run {
                pipeline.score(&users, &restaurants)?.summary
            } else {
                let store = LanceRecommendationStore::new(&store_uri.to_string_lossy(), &settings.store.table).await?;
                pipeline.run(&users, &restaurants, &store).await?
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Show { user_id } => {
            let store = LanceRecommendationStore::new(&store_uri.to_string_lossy(), &settings.store.table).await?;
            let recs = store.fetch(&user_id).await?;
            if recs.is_empty() {
                eprintln!("No recommendations stored for user {}", user_id);
            }
            for r in recs {
                println!("{:>3}  {:<12} {:.4}", r.rank, r.restaurant_id, r.score);
            }
        }
    }
    Ok(())
}
