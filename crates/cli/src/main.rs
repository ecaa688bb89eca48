//! Harvest Roster CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! roster-cli migrate
//!
//! # Create an admin member
//! roster-cli admin create -e admin@example.com -n "Admin Name" -p "strong password"
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin create` - Create admin members
//!
//! Admin members cannot self-register through the API (registration always
//! produces workers, and role-assigning creation is itself admin-gated), so
//! the first admin is bootstrapped here.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "roster-cli")]
#[command(author, version, about = "Harvest Roster CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin members
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin member
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Admin password (minimum 6 characters)
        #[arg(short, long)]
        password: String,

        /// Phone number
        #[arg(long, default_value = "")]
        phone: String,

        /// Position held
        #[arg(long, default_value = "")]
        designation: String,
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
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                password,
                phone,
                designation,
            } => {
                commands::admin::create_admin(&email, &name, &password, &phone, &designation)
                    .await?;
            }
        },
    }
    Ok(())
}
