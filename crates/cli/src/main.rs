//! Trikart CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! tk-cli migrate
//!
//! # Seed the demo catalog (idempotent)
//! tk-cli seed
//!
//! # Wipe and re-seed the catalog
//! tk-cli seed --clear
//!
//! # Create an admin user
//! tk-cli admin create -e admin@example.com -n "Admin Name" -p "a strong password"
//!
//! # Promote an existing user to admin
//! tk-cli admin promote -e user@example.com
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the database with the demo catalog
//! - `admin create` - Create admin users
//! - `admin promote` - Promote existing users to admin

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tk-cli")]
#[command(author, version, about = "Trikart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with the demo catalog
    Seed {
        /// Delete the existing catalog before seeding
        #[arg(long)]
        clear: bool,
    },
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Admin phone number
        #[arg(long, default_value = "9800000000")]
        phone: String,

        /// Admin city (`Chandigarh`, `Mohali`, or `Panchkula`)
        #[arg(long, default_value = "Chandigarh")]
        city: String,

        /// Admin password (min 8 characters)
        #[arg(short, long)]
        password: String,
    },
    /// Promote an existing user to admin
    Promote {
        /// Email address of the user to promote
        #[arg(short, long)]
        email: String,
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
        Commands::Seed { clear } => commands::seed::run(clear).await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                phone,
                city,
                password,
            } => {
                commands::admin::create_user(&email, &name, &phone, &city, &password).await?;
            }
            AdminAction::Promote { email } => {
                commands::admin::promote_user(&email).await?;
            }
        },
    }
    Ok(())
}
