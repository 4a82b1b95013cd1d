//! Magicbook CLI binary.
//!
//! - Generate a book from a prompt
//! - List stored books
//! - Render a stored book's images and narration to files
//! - Evict cached media

use clap::Parser;
use magicbook::MagicBookConfig;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, evict_entry, generate_book, list_books, render_book};

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };

    #[cfg(feature = "observability")]
    let _guard = magicbook::observability::init_observability(
        magicbook::observability::ObservabilityConfig::default()
            .with_log_level(log_level)
            .with_json_logs(cli.json_logs),
    )?;

    #[cfg(not(feature = "observability"))]
    init_tracing(log_level, cli.verbose, cli.json_logs)?;

    let config = match &cli.config {
        Some(path) => MagicBookConfig::from_file(path)?,
        None => MagicBookConfig::load()?,
    };

    match cli.command {
        Commands::Generate { prompt, voice } => {
            generate_book(&config, &prompt, voice).await?;
        }

        Commands::List { format } => {
            list_books(&config, format).await?;
        }

        Commands::Render { key, output, voice } => {
            render_book(&config, &key, &output, voice).await?;
        }

        Commands::Evict { text } => {
            evict_entry(&config, &text).await?;
        }
    }

    Ok(())
}

#[cfg(not(feature = "observability"))]
fn init_tracing(
    level: &str,
    verbose: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::EnvFilter;

    // --verbose wins over RUST_LOG
    let filter = if verbose {
        EnvFilter::try_new(level)?
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    if json {
        builder.json().try_init().map_err(|e| e as Box<dyn std::error::Error>)?;
    } else {
        builder.try_init().map_err(|e| e as Box<dyn std::error::Error>)?;
    }
    Ok(())
}
