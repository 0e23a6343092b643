use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use smart_encyclopedia::app::AppContext;
use smart_encyclopedia::cli::{commands, Cli, Commands};
use smart_encyclopedia::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env();
    cli.apply_to(&mut config);

    let ctx = AppContext::new(config)?;

    match &cli.command {
        Commands::Search { query, limit } => {
            commands::search(&ctx, query, *limit).await?;
        }
        Commands::Show { title } => {
            commands::show(&ctx, title).await?;
        }
        Commands::Open { title } => {
            commands::open_article(&ctx, title).await?;
        }
        Commands::Categories => {
            commands::list_categories(&ctx)?;
        }
        Commands::Browse { category } => {
            commands::browse(&ctx, category)?;
        }
        Commands::Serve { .. } => {
            commands::serve(&ctx).await?;
        }
    }

    Ok(())
}
