//! Babyshop CLI - admin shell over the Babyshop REST backend.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (the session is stored in ~/.config/babyshop/auth-storage.json)
//! babyshop login -e admin@babyshop.com
//!
//! # Catalog administration
//! babyshop products list --search crib --desc
//! babyshop brands create --name Lullaby
//! babyshop categories create --name Toys --type "Hot Categories"
//!
//! # Users and dashboard counters
//! babyshop users list
//! babyshop stats
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_API_URL` - Backend origin; `/api` is appended
//! - `BABYSHOP_SESSION_FILE` - Session file location
//! - `RUST_LOG` - Log filter (default `babyshop_cli=info,babyshop_client=warn`)
//!
//! Results are printed to stdout as JSON. A missing or rejected session exits
//! with status 2.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use babyshop_client::{ApiConfig, ExecutionContext, Frontend};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod error;
mod output;

use commands::catalog::{BannerAction, BrandAction, CategoryAction, ProductAction};
use commands::shopper::{CartAction, WishlistAction};
use commands::users::UserAction;
use error::CliError;

#[derive(Parser)]
#[command(name = "babyshop")]
#[command(author, version, about = "Babyshop admin shell")]
struct Cli {
    /// Session file (defaults to ~/.config/babyshop/auth-storage.json)
    #[arg(long, global = true, env = "BABYSHOP_SESSION_FILE")]
    session: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with an admin account
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "BABYSHOP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami {
        /// Print the stored snapshot without asking the backend
        #[arg(long)]
        offline: bool,
    },
    /// Manage products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage brands
    Brands {
        #[command(subcommand)]
        action: BrandAction,
    },
    /// Manage home page banners
    Banners {
        #[command(subcommand)]
        action: BannerAction,
    },
    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Dashboard counters
    Stats,
    /// Wishlist of the signed-in account
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Cart of the signed-in account
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[tokio::main]
async fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "babyshop_cli=info,babyshop_client=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = ApiConfig::resolve(Frontend::Admin, ExecutionContext::Browser)?;
    let session_file = context::session_path(cli.session, std::env::var_os("HOME").map(PathBuf::from));
    tracing::debug!(path = %session_file.display(), api = %config.base_url, "Using session file");
    let api = context::admin_api(&config, session_file)?;

    match cli.command {
        Commands::Login { email, password } => {
            output::emit(&commands::session::login(&api, email, password).await?)
        }
        Commands::Logout => output::emit(&commands::session::logout(&api).await?),
        Commands::Whoami { offline } => {
            output::emit(&commands::session::whoami(&api, offline).await?)
        }
        Commands::Products { action } => {
            output::emit(&commands::catalog::products(&api, action).await?)
        }
        Commands::Categories { action } => {
            output::emit(&commands::catalog::categories(&api, action).await?)
        }
        Commands::Brands { action } => output::emit(&commands::catalog::brands(&api, action).await?),
        Commands::Banners { action } => {
            output::emit(&commands::catalog::banners(&api, action).await?)
        }
        Commands::Users { action } => output::emit(&commands::users::users(&api, action).await?),
        Commands::Stats => output::emit(&commands::users::stats(&api).await?),
        Commands::Wishlist { action } => {
            output::emit(&commands::shopper::wishlist(&api, action).await?)
        }
        Commands::Cart { action } => output::emit(&commands::shopper::cart(&api, action).await?),
    }
}
