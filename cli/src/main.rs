//! TicketFlow CLI
//!
//! Command-line interface for the TicketFlow intake pipeline.
//!
//! # Usage
//!
//! ```bash
//! ticketflow users bootstrap-admin --name "Root" --email root@example.com
//! ticketflow users signup --name "Ada" --email ada@example.com --role skilled
//! ticketflow tickets create --title "Cannot process payment" --customer-email jo@example.com
//! ticketflow tickets list --as <user-id> --sort priority --format json
//! ticketflow ai classify --title "App is crashing on launch"
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use ticketflow_core::application::{SortDirection, TicketSortKey};
use ticketflow_core::{AccountStatus, TicketStatus};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "ticketflow")]
#[command(author = "TicketFlow")]
#[command(version)]
#[command(about = "TicketFlow support ticket intake and routing", long_about = None)]
struct Cli {
    /// Profile name from config file
    #[arg(long, short, global = true)]
    profile: Option<String>,

    /// Directory holding user and ticket records
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, short, global = true, default_value = "table")]
    format: output::OutputFormat,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users and agent skills
    Users {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Create and work tickets
    Tickets {
        #[command(subcommand)]
        action: TicketCommands,
    },
    /// Run the classifier and generators directly
    Ai {
        #[command(subcommand)]
        action: AiCommands,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Register a pending sales or skilled account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "skilled")]
        role: String,
    },
    /// Create the first administrator
    BootstrapAdmin {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Approve a pending account
    Approve {
        id: String,
        #[arg(long = "as")]
        actor: String,
    },
    /// Reject a pending account
    Reject {
        id: String,
        #[arg(long = "as")]
        actor: String,
    },
    /// List users
    List {
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        status: Option<AccountStatus>,
    },
    /// Get user details
    Get { id: String },
    /// Add a skill to your own agent profile
    AddSkill {
        skill: String,
        #[arg(long = "as")]
        actor: String,
    },
    /// Remove a skill from your own agent profile
    RemoveSkill {
        skill: String,
        #[arg(long = "as")]
        actor: String,
    },
}

#[derive(Subcommand)]
enum TicketCommands {
    /// Submit a ticket through the intake pipeline
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        customer_name: Option<String>,
        #[arg(long)]
        customer_email: Option<String>,
        /// Open the ticket as this user (admin or sales)
        #[arg(long = "as")]
        actor: Option<String>,
    },
    /// List tickets
    List {
        /// Only tickets this user may see
        #[arg(long = "as")]
        actor: Option<String>,
        #[arg(long)]
        status: Option<TicketStatus>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value = "created_at")]
        sort: TicketSortKey,
        #[arg(long, default_value = "desc")]
        direction: SortDirection,
    },
    /// Get ticket details
    Get { id: String },
    /// Advance a ticket's status
    Status {
        id: String,
        status: TicketStatus,
        #[arg(long = "as")]
        actor: String,
    },
    /// Hand a ticket to another agent
    Reassign {
        id: String,
        #[arg(long)]
        agent: String,
        #[arg(long = "as")]
        actor: String,
    },
    /// Regenerate description and troubleshooting steps
    RefreshAi {
        id: String,
        #[arg(long = "as")]
        actor: String,
    },
    /// Delete a ticket
    Delete {
        id: String,
        #[arg(long = "as")]
        actor: String,
    },
    /// Ticket counters and agent workloads
    Stats {
        #[arg(long = "as")]
        actor: Option<String>,
    },
}

#[derive(Subcommand)]
enum AiCommands {
    /// Classify a title and description
    Classify {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Generate troubleshooting steps
    Steps {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Send a raw prompt to the configured generator
    Raw {
        #[arg(long)]
        prompt: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let profile = cli.profile.as_deref();
    let command = match cli.command {
        Commands::Config { action } => return commands::config::handle(action, profile),
        other => other,
    };

    let mut config = config::Config::load(profile)?;
    config.apply_env();
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = Some(dir);
    }
    let app = commands::App::build(&config).await?;

    match command {
        Commands::Users { action } => commands::users::handle(action, &app, cli.format).await,
        Commands::Tickets { action } => commands::tickets::handle(action, &app, cli.format).await,
        Commands::Ai { action } => commands::ai::handle(action, &app, cli.format).await,
        Commands::Config { .. } => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
