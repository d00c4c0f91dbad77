//! Menulane CLI - Database migrations and subscription management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! ml-cli migrate
//!
//! # Seed a demo restaurant with a small menu
//! ml-cli seed -e demo@menulane.app -u demo -p "a-demo-password"
//!
//! # Run the nightly subscription sweep (cron)
//! ml-cli sweep
//!
//! # See what the sweep would do without writing anything
//! ml-cli sweep --dry-run
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the database with a demo restaurant
//! - `sweep` - Downgrade expired subscriptions, send expiry warnings, and
//!   purge old orders

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ml-cli")]
#[command(author, version, about = "Menulane CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with a demo restaurant
    Seed {
        /// Owner email address
        #[arg(short, long, default_value = "demo@menulane.app")]
        email: String,

        /// Menu username (the public URL slug)
        #[arg(short, long, default_value = "demo")]
        username: String,

        /// Owner password
        #[arg(short, long)]
        password: String,
    },
    /// Downgrade expired subscriptions and purge old orders
    Sweep {
        /// Report what would change without writing anything
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed {
            email,
            username,
            password,
        } => commands::seed::run(&email, &username, &password).await?,
        Commands::Sweep { dry_run } => {
            let report = commands::sweep::run(dry_run).await?;
            tracing::info!(
                warned = report.warned,
                downgraded = report.downgraded,
                failed = report.failed,
                purged_orders = report.purged_orders,
                dry_run,
                "Sweep complete"
            );
        }
    }
    Ok(())
}
