//! Command line front end for the content repository.
//!
//! # Usage
//!
//! ```bash
//! # First admin can be added without a session
//! cms admin add --username admin --password 'correct horse'
//!
//! cms login --username admin --password 'correct horse'
//! cms content create pricing --json '{"name":"Pro","monthly_price":49,"annual_price":470}' \
//!     --list features=A,B --list limitations=C
//! cms content list pricing
//! cms logout
//! ```
//!
//! # Environment Variables
//!
//! - `CMS_DB_PATH` - SQLite database file
//! - `CMS_STATE_DIR` - directory holding the persisted admin session
//! - `CMS_LOG_LEVEL`, `CMS_LOG_DIR` - rolling file logs (off without a dir)
//! - `CMS_BUSY_TIMEOUT_MS` - wait on a locked database before giving up

use clap::{Parser, Subcommand};
use cms_core::config::{ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL, ENV_STATE_DIR};
use cms_core::db::open_db;
use cms_core::{
    content_schemas, init_logging, AdminConsole, CmsConfig, FileSessionStore, SessionManager,
    SqliteRecordStore,
};
use std::path::PathBuf;

mod commands;

use commands::admin::AdminAction;
use commands::content::ContentAction;

#[derive(Parser)]
#[command(name = "cms")]
#[command(author, version, about = "Content repository and admin console")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = ENV_DB_PATH)]
    db: Option<PathBuf>,

    /// Directory for the persisted admin session
    #[arg(long, global = true, env = ENV_STATE_DIR)]
    state_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, global = true, env = ENV_LOG_LEVEL)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files
    #[arg(long, global = true, env = ENV_LOG_DIR)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Sign in and keep the session for later commands
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "CMS_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// End the current session
    Logout,
    /// Print the signed-in admin
    Whoami,
    /// Read and edit content collections
    Content {
        #[command(subcommand)]
        action: ContentAction,
    },
    /// Print record counts per collection
    Overview,
    /// Print the core library version
    Version,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("cms_core version={}", cms_core::core_version());
        return Ok(());
    }

    let config = load_config(&cli)?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    let conn = open_db(&config.db_path, config.busy_timeout)?;
    let store = SqliteRecordStore::try_new(&conn, content_schemas())?;
    let session = SessionManager::restore(FileSessionStore::new(&config.state_dir));
    let console = AdminConsole::new(&store, &session);

    match cli.command {
        Commands::Admin { action } => commands::admin::run(&console, action),
        Commands::Login { username, password } => {
            commands::admin::login(&console, &username, &password)
        }
        Commands::Logout => commands::admin::logout(&console),
        Commands::Whoami => commands::admin::whoami(&console),
        Commands::Content { action } => commands::content::run(&console, action),
        Commands::Overview => commands::content::overview(&console),
        Commands::Version => Ok(()),
    }
}

/// Command line values win over the environment they default from.
fn load_config(cli: &Cli) -> anyhow::Result<CmsConfig> {
    let path_arg = |value: &Option<PathBuf>| value.as_ref().map(|p| p.display().to_string());
    let config = CmsConfig::from_lookup(|key| match key {
        ENV_DB_PATH => path_arg(&cli.db),
        ENV_STATE_DIR => path_arg(&cli.state_dir),
        ENV_LOG_LEVEL => cli.log_level.clone(),
        ENV_LOG_DIR => path_arg(&cli.log_dir),
        other => std::env::var(other).ok(),
    })?;
    Ok(config)
}
