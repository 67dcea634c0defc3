//! CMLRE access control CLI.
//!
//! Signs demo users in and out, inspects the role table and runs
//! permission, action and module checks against the persisted session.
//!
//! # Quick Start
//!
//! ```bash
//! # Sign in as the demo scientist
//! cmlre login aman.antil@cmlre.gov.in --password demo123
//!
//! # Check a permission with context
//! cmlre check canViewData --classification restricted --project OS-2024-002
//!
//! # Try a named action
//! cmlre action delete_data
//! ```

mod commands;
mod style;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cmlre::{CmlreConfig, ConfigLoader, Platform, Profile, RequestOrigin};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// CMLRE - role and attribute based access control for marine research data.
#[derive(Parser)]
#[command(name = "cmlre")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory holding cmlre.toml and the .cmlre state directory.
    #[arg(long, global = true, default_value = ".")]
    project: PathBuf,

    /// Built-in defaults to start from (default, development, production).
    #[arg(long, global = true, default_value = "default")]
    profile: Profile,

    /// Treat unknown permission, action and module names as errors.
    #[arg(long, global = true)]
    strict: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// Sign in with a directory account.
    Login {
        /// Account email address.
        email: String,

        /// Account password.
        #[arg(short, long)]
        password: String,
    },

    /// Sign out and clear the stored session.
    Logout,

    /// Show the signed-in user and their access summary.
    Whoami {
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Switch the session to another directory user by id.
    Switch {
        /// User id (see `cmlre users`).
        user_id: String,
    },

    /// List directory accounts.
    Users,

    /// Show the role capability table.
    Permissions {
        /// Show a single role instead of the full matrix.
        #[arg(short, long)]
        role: Option<String>,
    },

    /// Check a permission for the signed-in user.
    Check {
        /// Permission name (canViewData or can-view-data).
        permission: String,

        /// Minimum clearance level required.
        #[arg(long)]
        clearance: Option<String>,

        /// Specialization the user must hold.
        #[arg(long)]
        specialization: Option<String>,

        /// Data classification being accessed.
        #[arg(long)]
        classification: Option<String>,

        /// Project being accessed.
        #[arg(long)]
        project_id: Option<String>,

        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Attempt a named action as the signed-in user.
    Action {
        /// Action name (upload_data, create_survey, modify_survey, ...).
        name: String,

        /// Owner of the affected resource (for modify_survey).
        #[arg(long)]
        owner: Option<String>,
    },

    /// List research modules and whether the signed-in user can open them.
    Modules {
        /// Check a single module by name.
        #[arg(long)]
        check: Option<String>,
    },

    /// User preferences.
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Configuration management.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Audit trail.
    #[command(subcommand)]
    Audit(AuditCommands),
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show current settings.
    Show {
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Set one top-level setting. Values are parsed as JSON, else taken as text.
    Set {
        /// Setting key (camelCase, e.g. dateFormat).
        key: String,

        /// New value.
        value: String,
    },

    /// Restore default settings.
    Reset,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration.
    Show {
        /// Output format (text, toml, json).
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand)]
enum AuditCommands {
    /// Show recorded audit entries (file sink only).
    Show {
        /// Only entries with this action.
        #[arg(long)]
        action: Option<String>,

        /// Only entries for this user id.
        #[arg(long)]
        user: Option<String>,

        /// Maximum number of entries.
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

fn main() {
    if let Err(e) = run() {
        style::print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    style::init(cli.no_color);

    let mut config = ConfigLoader::new()
        .with_project_dir(&cli.project)
        .with_profile(cli.profile)
        .load()
        .context("Failed to load configuration")?;
    if cli.strict {
        config.access.strict = true;
    }

    // Initialize logging; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Version => {
            commands::version::run();
            Ok(())
        }
        Commands::Config(ConfigCommands::Show { format }) => {
            commands::config::show(&config, &format)
        }
        command => {
            let platform = open_platform(config)?;
            dispatch(&platform, command)
        }
    }
}

fn open_platform(config: CmlreConfig) -> Result<Platform> {
    let origin = RequestOrigin::new().with_user_agent(format!(
        "{}/{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    ));
    debug!(
        state_dir = %config.session.state_dir.display(),
        sink = %config.audit.sink,
        "opening platform"
    );
    Platform::open(config, origin).context("Failed to open state directory")
}

fn dispatch(platform: &Platform, command: Commands) -> Result<()> {
    match command {
        Commands::Login { email, password } => commands::auth::login(platform, &email, &password),
        Commands::Logout => commands::auth::logout(platform),
        Commands::Whoami { format } => commands::auth::whoami(platform, format),
        Commands::Switch { user_id } => commands::auth::switch(platform, &user_id),
        Commands::Users => commands::auth::users(platform),
        Commands::Permissions { role } => commands::access::permissions(role.as_deref()),
        Commands::Check {
            permission,
            clearance,
            specialization,
            classification,
            project_id,
            format,
        } => {
            let context = commands::access::ContextArgs {
                clearance,
                specialization,
                classification,
                project_id,
                owner: None,
            };
            commands::access::check(platform, &permission, &context, format)
        }
        Commands::Action { name, owner } => commands::access::action(platform, &name, owner),
        Commands::Modules { check } => commands::access::modules(platform, check.as_deref()),
        Commands::Settings(cmd) => match cmd {
            SettingsCommands::Show { format } => commands::settings::show(platform, format),
            SettingsCommands::Set { key, value } => commands::settings::set(platform, &key, &value),
            SettingsCommands::Reset => commands::settings::reset(platform),
        },
        Commands::Audit(AuditCommands::Show {
            action,
            user,
            limit,
        }) => commands::audit::show(platform, action, user, limit),
        Commands::Version | Commands::Config(_) => Ok(()),
    }
}
