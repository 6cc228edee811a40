use clap::{Parser, Subcommand};
use salespage_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "salespage", version, about = "Salespage admin CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Page content: show, edit, import and export
    Content {
        #[command(subcommand)]
        action: commands::content::ContentAction,
    },
    /// Doctors, testimonials, articles and FAQ entries
    Collection {
        #[command(subcommand)]
        action: commands::collection::CollectionAction,
    },
    /// Content locker countdown
    Locker {
        #[command(subcommand)]
        action: commands::locker::LockerAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = AppConfig::load_or_default();

    // Logs go to stderr; stdout carries JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Content { action } => commands::content::run(action, &config),
        Commands::Collection { action } => commands::collection::run(action, &config),
        Commands::Locker { action } => commands::locker::run(action, &config),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
