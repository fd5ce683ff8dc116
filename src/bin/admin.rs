//! CLI administration tool for link-shortener.
//!
//! Provides commands for managing users, viewing statistics,
//! and performing database operations without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Create the demo account (intern@dacoid.com / Test123)
//! cargo run --bin admin -- seed
//!
//! # Create a user
//! cargo run --bin admin -- user create --email someone@example.com
//!
//! # List users
//! cargo run --bin admin -- user list
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection / apply migrations
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_USER`/`DB_PASSWORD`/`DB_NAME` (required)

use link_shortener::application::services::auth_service::hash_password;
use link_shortener::config::{Config, mask_connection_string};
use link_shortener::domain::entities::NewUser;
use link_shortener::domain::repositories::UserRepository;
use link_shortener::infrastructure::persistence::PgUserRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;

const DEMO_EMAIL: &str = "intern@dacoid.com";
const DEMO_PASSWORD: &str = "Test123";

/// CLI tool for managing link-shortener.
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
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Create the demo account if it does not exist
    Seed,

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// User management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Login email
        #[arg(short, long)]
        email: Option<String>,

        /// Password (prompted if not provided)
        #[arg(short, long)]
        password: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all users
    List,
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;

    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })?;

    let users = Arc::new(PgUserRepository::new(Arc::new(pool.clone())));

    match cli.command {
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                password,
                yes,
            } => create_user(users, email, password, yes).await?,
            UserAction::List => list_users(users).await?,
        },
        Commands::Seed => seed(users).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Creates a user with interactive prompts for missing values.
///
/// Only the Argon2 hash of the password is stored.
async fn create_user(
    repo: Arc<PgUserRepository>,
    email: Option<String>,
    password: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Repeat password", "Passwords do not match")
            .interact()?,
    };

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Create user {}?", email))
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let user = insert_user(&repo, &email, &password).await?;

    println!();
    println!(
        "{} {} (id {})",
        "✅ Created".green().bold(),
        user.email.cyan(),
        user.id.to_string().bright_black()
    );
    println!();

    Ok(())
}

/// Creates the demo account used by the frontend. Does nothing if it exists.
async fn seed(repo: Arc<PgUserRepository>) -> Result<()> {
    let existing = repo
        .find_by_email(DEMO_EMAIL)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    if existing.is_some() {
        println!(
            "{} {}",
            "⚠️  Demo user already exists:".yellow(),
            DEMO_EMAIL.cyan()
        );
        return Ok(());
    }

    insert_user(&repo, DEMO_EMAIL, DEMO_PASSWORD).await?;

    println!(
        "{} {} / {}",
        "✅ Demo user created:".green().bold(),
        DEMO_EMAIL.cyan(),
        DEMO_PASSWORD.bright_yellow()
    );

    Ok(())
}

async fn insert_user(
    repo: &PgUserRepository,
    email: &str,
    password: &str,
) -> Result<link_shortener::domain::entities::User> {
    let password_hash =
        hash_password(password).map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    repo.create(NewUser {
        email: email.to_string(),
        password_hash,
    })
    .await
    .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))
}

/// Lists all users.
///
/// # Output Format
///
/// ```text
/// 📋 Users
///
///   ID  Email                          Created
///   ──────────────────────────────────────────────────────────
///   1   intern@dacoid.com              2025-01-15 10:30
/// ```
async fn list_users(repo: Arc<PgUserRepository>) -> Result<()> {
    println!("{}", "📋 Users".bright_blue().bold());
    println!();

    let users = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<5} {:<30} {:<20}",
        "ID".bright_white().bold(),
        "Email".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(58).bright_black());

    for user in &users {
        println!(
            "  {:<5} {:<30} {}",
            user.id.to_string().bright_black(),
            user.email.cyan(),
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Displays system statistics.
///
/// Shows user, link and click totals, and how many links have expired.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let expired_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE expires_at < NOW()")
            .fetch_one(pool)
            .await?;

    let clicks_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clicks")
        .fetch_one(pool)
        .await?;

    println!("  Users:   {}", users_count.to_string().bright_green().bold());
    println!(
        "  Links:   {} ({} expired)",
        links_count.to_string().bright_green().bold(),
        expired_count.to_string().yellow()
    );
    println!("  Clicks:  {}", clicks_count.to_string().bright_green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
        DbAction::Migrate => {
            println!("{}", "🚚 Applying migrations...".bright_blue());

            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to run migrations")?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}
