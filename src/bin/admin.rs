//! CLI administration tool for url-shortener-core.
//!
//! Provides commands for managing links, revoking access tokens and
//! performing database operations without going through a running service.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL
//! cargo run --bin admin -- link create https://example.com --code promo24
//!
//! # Look up where a code points
//! cargo run --bin admin -- link resolve promo24
//!
//! # Generate candidate codes without touching the database
//! cargo run --bin admin -- code generate --count 5
//!
//! # Sign a user out of every session
//! cargo run --bin admin -- token revoke-user 42
//!
//! # Apply migrations
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required for `link` and `db`): PostgreSQL connection string
//! - `REDIS_URL` (required for `token`): Redis connection string
//! - `RUST_LOG`, `LOG_FORMAT`: diagnostics written through `tracing`
//!
//! # Features
//!
//! - **Link Management**: Create, resolve, disable and delete short links
//! - **Token Revocation**: Revoke single tokens or every session of a user
//! - **Database Tools**: Connection checks and migrations
//! - **Interactive Prompts**: Confirmation dialogs before destructive actions
//! - **Colored Output**: Terminal-friendly formatting using `colored` crate

use url_shortener_core::config::{Config, load_from_env};
use url_shortener_core::telemetry;
use url_shortener_core::domain::entities::{LinkPatch, ShortCodeConfig};
use url_shortener_core::domain::repositories::LinkRepository;
use url_shortener_core::infrastructure::persistence::PgLinkRepository;
use url_shortener_core::infrastructure::revocation::RedisRevocationBackend;
use url_shortener_core::prelude::{LinkService, TokenRevocationStore};
use url_shortener_core::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

/// CLI tool for managing url-shortener-core.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage short links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Generate short codes
    Code {
        #[command(subcommand)]
        action: CodeAction,
    },

    /// Revoke access tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Create a new short link
    Create {
        /// URL to redirect to
        url: String,

        /// Custom short code (auto-generated if not provided)
        #[arg(short, long)]
        code: Option<String>,

        /// Owning user ID
        #[arg(short, long)]
        user: Option<i64>,

        /// Expire the link after this many minutes
        #[arg(short, long)]
        expires_in: Option<i64>,
    },

    /// Show the link behind a short code
    Resolve {
        code: String,
    },

    /// Stop a short link from redirecting
    Disable {
        code: String,
    },

    /// Delete a short link
    Delete {
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Code generation subcommands.
#[derive(Subcommand)]
enum CodeAction {
    /// Print random short codes
    Generate {
        /// Number of codes to print
        #[arg(short, long, default_value_t = 1)]
        count: usize,

        /// Code length
        #[arg(short, long)]
        length: Option<usize>,
    },
}

/// Token revocation subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Revoke a single token
    Revoke {
        token: String,

        /// Seconds to keep the token revoked (defaults to the access-token lifetime)
        #[arg(long)]
        ttl: Option<u64>,
    },

    /// Check whether a token is revoked
    Check {
        token: String,
    },

    /// Revoke every tracked token of a user
    RevokeUser {
        user_id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Code { action } => handle_code_action(action)?,
        Commands::Link { action } => {
            let config = load_config()?;
            let pool = connect_database(&config).await?;
            handle_link_action(action, &config, pool).await?;
        }
        Commands::Token { action } => {
            let config = load_config()?;
            handle_token_action(action, &config).await?;
        }
        Commands::Db { action } => {
            let config = load_config()?;
            let pool = connect_database(&config).await?;
            handle_db_action(action, &pool).await?;
        }
    }

    Ok(())
}

/// Loads configuration and installs the tracing subscriber for commands that
/// talk to a backend.
fn load_config() -> Result<Config> {
    let config = load_from_env()?;
    telemetry::init(&config)?;
    config.print_summary();
    Ok(config)
}

async fn connect_database(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, config: &Config, pool: PgPool) -> Result<()> {
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool)));
    let service = LinkService::new(repo.clone(), config.short_code_config());

    match action {
        LinkAction::Create {
            url,
            code,
            user,
            expires_in,
        } => {
            let expires_at = expires_in.map(|minutes| Utc::now() + ChronoDuration::minutes(minutes));
            let link = service.create_link(url, user, expires_at, code).await?;

            println!("{}", "✅ Link created".green().bold());
            println!("  Code:    {}", link.short_code.bright_yellow().bold());
            println!("  Target:  {}", link.original_url.cyan());
            if let Some(expires_at) = link.expires_at {
                println!(
                    "  Expires: {}",
                    expires_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
                );
            }
        }
        LinkAction::Resolve { code } => {
            let link = repo
                .find_by_short_code(&code)
                .await?
                .with_context(|| format!("No link with code '{code}'"))?;

            let status = if !link.is_active {
                "DISABLED".red()
            } else if link.is_expired() {
                "EXPIRED".yellow()
            } else {
                "ACTIVE".green()
            };

            println!("  ID:      {}", link.id.to_string().bright_black());
            println!("  Code:    {}", link.short_code.bright_yellow());
            println!("  Target:  {}", link.original_url.cyan());
            println!("  Status:  {status}");
            println!(
                "  Created: {}",
                link.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
            );
        }
        LinkAction::Disable { code } => {
            let link = repo
                .find_by_short_code(&code)
                .await?
                .with_context(|| format!("No link with code '{code}'"))?;

            if !link.is_active {
                println!("{}", "⚠️  This link is already disabled".yellow());
                return Ok(());
            }

            let patch = LinkPatch {
                is_active: Some(false),
                ..LinkPatch::default()
            };
            service.update_link(link.id, patch).await?;

            println!("{}", "✅ Link disabled".green().bold());
        }
        LinkAction::Delete { code, yes } => {
            let link = repo
                .find_by_short_code(&code)
                .await?
                .with_context(|| format!("No link with code '{code}'"))?;

            println!("  Code:   {}", link.short_code.bright_yellow());
            println!("  Target: {}", link.original_url.cyan());
            println!();

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Delete this link?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            service.delete_link(link.id).await?;
            println!("{}", "✅ Link deleted".green().bold());
        }
    }

    Ok(())
}

/// Prints freshly generated codes. Does not check them against the database.
fn handle_code_action(action: CodeAction) -> Result<()> {
    match action {
        CodeAction::Generate { count, length } => {
            let config = ShortCodeConfig::default();
            let generator = RandomCodeGenerator::new(ShortCodeConfig {
                max_length: ShortCodeConfig::HARD_MAX_LENGTH,
                ..config
            });
            let length = length.unwrap_or(config.length);

            for _ in 0..count {
                println!("{}", generator.generate_with_length(length)?);
            }
        }
    }

    Ok(())
}

/// Dispatches token revocation commands against the shared Redis backend.
async fn handle_token_action(action: TokenAction, config: &Config) -> Result<()> {
    let redis_url = config
        .redis_url
        .as_deref()
        .context("REDIS_URL must be set to manage token revocations")?;
    let backend = Arc::new(RedisRevocationBackend::connect(redis_url).await?);
    let store = TokenRevocationStore::new(backend, config.revocation_config());

    match action {
        TokenAction::Revoke { token, ttl } => {
            let ttl = ttl.unwrap_or(config.access_token_ttl_seconds);
            store.add_token(&token, ttl).await?;
            println!(
                "{} (for {}s)",
                "✅ Token revoked".green().bold(),
                ttl.to_string().bright_white()
            );
        }
        TokenAction::Check { token } => {
            if store.is_blacklisted(&token).await? {
                println!("{}", "REVOKED".red().bold());
            } else {
                println!("{}", "NOT REVOKED".green().bold());
            }
        }
        TokenAction::RevokeUser { user_id, yes } => {
            println!("{}", "🔒 Revoke all sessions".bright_blue().bold());
            println!("  User: {}", user_id.to_string().cyan());
            println!();

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Revoke every tracked token of this user?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            let revoked = store
                .add_user_tokens(user_id, config.access_token_ttl_seconds)
                .await?;

            if revoked == 0 {
                println!("{}", "⚠️  No tracked tokens for this user".yellow());
            } else {
                println!(
                    "{} {}",
                    "✅ Revoked tokens:".green().bold(),
                    revoked.to_string().bright_white().bold()
                );
            }
        }
    }

    Ok(())
}

/// Dispatches database operation commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => check_database(pool).await?,
        DbAction::Migrate => {
            println!("{}", "🗄️  Running migrations".bright_blue().bold());
            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to run migrations")?;
            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}

/// Verifies the connection and reports how many links exist.
async fn check_database(pool: &PgPool) -> Result<()> {
    println!("{}", "🔍 Checking database connection...".bright_blue());

    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .context("Database connection failed")?;

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await
        .context("The links table is missing; run `admin db migrate`")?;

    println!("{}", "✅ Database connection OK".green().bold());
    println!(
        "  Links: {}",
        links_count.to_string().bright_green().bold()
    );

    Ok(())
}
