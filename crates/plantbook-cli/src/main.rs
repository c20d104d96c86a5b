use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use plantbook_infrastructure::PlantbookPaths;

mod app;
mod commands;
mod logging;
mod render;
mod repl;

use app::{AppContext, AppOptions};
use commands::settings::SettingsAction;

#[derive(Parser, Debug)]
#[command(name = "plantbook")]
#[command(about = "Plantbook - browse a plant database and keep display preferences", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Keep preferences in memory only; nothing is written to disk
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// List plants, optionally filtered
    List {
        /// Raw filter token, e.g. "filter[flower_color]=red"
        #[arg(long, conflicts_with = "use_preferences")]
        filter: Option<String>,
        /// Build the filter from the stored preferences
        #[arg(long)]
        use_preferences: bool,
    },
    /// Search plants by name
    Search { term: String },
    /// Show details of one listing row (1-based)
    Show {
        index: usize,
        /// Pick from search results instead of the full listing
        #[arg(long)]
        search: Option<String>,
    },
    /// Show or change preferences
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Interactive session (default)
    Repl,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = PlantbookPaths::new(None);
    let log_dir = if cli.ephemeral {
        None
    } else {
        paths.log_dir().ok()
    };
    let _log_guard = logging::init(cli.verbose, log_dir.as_deref())?;

    let options = AppOptions {
        config: cli.config,
        ephemeral: cli.ephemeral,
    };
    let app = AppContext::bootstrap(&paths, &options).await?;

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::List {
            filter,
            use_preferences,
        } => commands::listing::list(&app, filter, use_preferences).await?,
        Commands::Search { term } => commands::listing::search(&app, &term).await?,
        Commands::Show { index, search } => commands::listing::show(&app, index, search).await?,
        Commands::Settings { action } => commands::settings::run(&app, action).await?,
        Commands::Repl => repl::run(app).await?,
    }

    Ok(())
}
