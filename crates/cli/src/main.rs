//! Oakline CLI - store seeding and user management tools.
//!
//! # Usage
//!
//! ```bash
//! # Seed the inventory with a starter catalog
//! oakline-cli seed
//!
//! # Create a client user
//! oakline-cli user create -u dana -e dana@example.com -p "long password" -a "12 Elm St"
//! ```
//!
//! # Commands
//!
//! - `seed` - Populate the inventory store with starter items
//! - `user create` - Create user accounts
//!
//! The data directory comes from `--data-dir`, falling back to the
//! `OAKLINE_DATA_DIR` environment variable and then `data`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "oakline-cli")]
#[command(author, version, about = "Oakline CLI tools")]
struct Cli {
    /// Directory holding the store snapshot files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the inventory store with a starter catalog
    Seed,
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Username (unique)
        #[arg(short, long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (min 8 characters)
        #[arg(short, long)]
        password: String,

        /// Postal address
        #[arg(short, long)]
        address: String,

        /// Role (`client` or `management`)
        #[arg(short, long, default_value = "client")]
        role: String,

        /// Title for management accounts
        #[arg(long)]
        title: Option<String>,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let data_dir = cli.data_dir.unwrap_or_else(|| {
        PathBuf::from(std::env::var("OAKLINE_DATA_DIR").unwrap_or_else(|_| "data".to_string()))
    });

    match cli.command {
        Commands::Seed => {
            commands::seed::inventory(&data_dir)?;
        }
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                email,
                password,
                address,
                role,
                title,
            } => {
                commands::user::create(
                    &data_dir,
                    &username,
                    &email,
                    &password,
                    &address,
                    &role,
                    title.as_deref(),
                )?;
            }
        },
    }
    Ok(())
}
