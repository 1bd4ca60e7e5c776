//! Velour CLI - Database migrations and merchant tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! velour-cli migrate
//!
//! # Seed the content platform with demo products
//! velour-cli seed
//!
//! # Move an order through fulfillment
//! velour-cli order set-status 42 shipped --tracking 1Z999AA10123456784
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the content platform with demo products
//! - `order set-status` - Update an order's status in the ledger and mirror

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "velour-cli")]
#[command(author, version, about = "Velour CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the content platform with demo products
    Seed,
    /// Manage orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// Set an order's status, updating ledger and mirror
    SetStatus {
        /// Ledger order id
        id: i32,

        /// New status (pending, processing, shipped, delivered, cancelled)
        status: String,

        /// Carrier tracking number
        #[arg(long)]
        tracking: Option<String>,

        /// Shipped timestamp (RFC 3339), defaults to now for `shipped`
        #[arg(long)]
        shipped_at: Option<String>,

        /// Delivered timestamp (RFC 3339), defaults to now for `delivered`
        #[arg(long)]
        delivered_at: Option<String>,

        /// Free-form fulfillment notes
        #[arg(long)]
        notes: Option<String>,
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
        Commands::Seed => commands::seed::run().await?,
        Commands::Order { action } => match action {
            OrderAction::SetStatus {
                id,
                status,
                tracking,
                shipped_at,
                delivered_at,
                notes,
            } => {
                commands::order::set_status(commands::order::SetStatusArgs {
                    id,
                    status,
                    tracking,
                    shipped_at,
                    delivered_at,
                    notes,
                })
                .await?;
            }
        },
    }

    Ok(())
}
