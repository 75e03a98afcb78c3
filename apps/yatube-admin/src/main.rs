//! # Yatube Admin
//!
//! Management commands run against the same database as the web server.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use yatube_infra::{DatabaseConfig, DatabaseHandle};

mod commands;

/// Command line options for Yatube administration.
#[derive(Debug, Parser)]
#[command(name = "yatube-admin", about = "Yatube management commands", version)]
struct Cli {
    /// Database URL, overriding `DATABASE_URL`.
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a community group.
    CreateGroup {
        #[arg(long)]
        title: String,
        #[arg(long)]
        slug: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List every group.
    ListGroups,
    /// Delete a group; its posts stay, without a group.
    DeleteGroup { slug: String },
    /// Delete a user together with their posts, comments and follows.
    DeleteUser { username: String },
    /// Apply pending migrations.
    Migrate,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(error) = run(cli).await {
        eprintln!("{error:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = DatabaseConfig::from_env();
    if let Some(url) = cli.database_url {
        config.url = url;
    }
    let db = DatabaseHandle::init(&config).await?;

    let repos = db.repositories();

    match cli.command {
        Command::CreateGroup {
            title,
            slug,
            description,
        } => {
            let group = commands::create_group(&repos, title, slug, description).await?;
            println!("Created group {} ({})", group.slug, group.id);
        }
        Command::ListGroups => {
            for group in commands::list_groups(&repos).await? {
                println!("{}\t{}\t{}", group.slug, group.title, group.id);
            }
        }
        Command::DeleteGroup { slug } => {
            commands::delete_group(&repos, &slug).await?;
            println!("Deleted group {slug}");
        }
        Command::DeleteUser { username } => {
            commands::delete_user(&repos, &username).await?;
            println!("Deleted user {username}");
        }
        Command::Migrate => {
            db.run_migrations().await?;
            println!("Migrations applied");
        }
    }

    Ok(())
}
