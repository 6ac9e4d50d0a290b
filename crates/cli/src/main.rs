//! CallDesk CLI
//!
//! Terminal front end for the CallDesk call center console.
//!
//! # Usage
//!
//! ```bash
//! calldesk login --username admin --password admin123
//! calldesk dashboard
//! calldesk calls --status missed --search jane
//! calldesk call "+1 (555) 987-6543" --notes "Callback" --wait
//! calldesk agents call 2 --wait
//! calldesk settings twilio --phone-number +15550001111
//! calldesk queue --format json
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use calldesk_core::CallDesk;
use calldesk_core::filter::Selector;
use calldesk_core::logging::{LoggingConfig, setup_logging};
use calldesk_core::models::{CallDirection, CallStatus};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "calldesk")]
#[command(author = "CallDesk")]
#[command(version)]
#[command(about = "CallDesk call center console", long_about = None)]
struct Cli {
    /// Directory holding config.toml and storage.json (default ~/.calldesk)
    #[arg(long, env = "CALLDESK_HOME", global = true)]
    home: Option<PathBuf>,

    /// Telephony proxy URL, overrides the configured one
    #[arg(long, env = "CALLDESK_API_URL", global = true)]
    api_url: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in to the console
    Login {
        #[arg(long, short)]
        username: String,
        #[arg(long, short, env = "CALLDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show which view a path resolves to
    Open { path: String },
    /// Overview: headline counters, recent calls, hourly volume
    Dashboard,
    /// Call history
    Calls {
        /// Caller name, number, agent or notes
        #[arg(long, short, default_value = "")]
        search: String,
        /// active, waiting, ended, missed or all
        #[arg(long, default_value = "all")]
        status: Selector<CallStatus>,
        /// inbound, outbound or all
        #[arg(long, default_value = "all")]
        direction: Selector<CallDirection>,
    },
    /// Agent roster
    Agents {
        /// Name, email or extension
        #[arg(long, short, default_value = "")]
        search: String,
        #[command(subcommand)]
        action: Option<AgentCommands>,
    },
    /// Callers waiting in the queue
    Queue,
    /// Agent presence
    AgentStatus,
    /// Call report
    Reports,
    /// Place an outbound call
    Call {
        phone_number: String,
        #[arg(long, short)]
        notes: Option<String>,
        /// Poll the call status until it settles
        #[arg(long, short)]
        wait: bool,
    },
    /// Hang up a call by provider SID
    EndCall { sid: String },
    /// Provider status of a call
    CallStatus { sid: String },
    /// View and edit settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommands,
    },
}

#[derive(Subcommand)]
enum AgentCommands {
    /// Dial an agent's extension
    Call {
        /// Agent ID from the roster
        id: String,
        #[arg(long, short)]
        notes: Option<String>,
        /// Poll the call status until it settles
        #[arg(long, short)]
        wait: bool,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Print all settings
    Show,
    /// Update the general tab
    General {
        #[arg(long)]
        company_name: Option<String>,
        #[arg(long)]
        admin_email: Option<String>,
        #[arg(long)]
        support_phone: Option<String>,
        #[arg(long)]
        welcome_message: Option<String>,
    },
    /// Update the database tab
    Database {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long, env = "CALLDESK_DB_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        #[arg(long)]
        database: Option<String>,
    },
    /// Update the notifications tab
    Notifications {
        #[arg(long)]
        email: Option<bool>,
        #[arg(long)]
        sms: Option<bool>,
        #[arg(long)]
        desktop: Option<bool>,
        #[arg(long)]
        missed_call_alerts: Option<bool>,
        #[arg(long)]
        system_updates: Option<bool>,
    },
    /// Update the Twilio credentials
    Twilio {
        #[arg(long)]
        account_sid: Option<String>,
        #[arg(long, env = "CALLDESK_TWILIO_TOKEN", hide_env_values = true)]
        auth_token: Option<String>,
        #[arg(long)]
        phone_number: Option<String>,
    },
    /// Check the stored Twilio credentials
    TestTwilio,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let home = match cli.home {
        Some(home) => home,
        None => calldesk_core::storage::default_home()?,
    };
    let mut desk = CallDesk::open(&home)
        .with_context(|| format!("Failed to open CallDesk home at {}", home.display()))?;

    let ctx = commands::Context {
        api_url: cli.api_url,
        format: cli.format,
    };

    match cli.command {
        Commands::Login { username, password } => commands::session::login(&mut desk, &username, &password),
        Commands::Logout => commands::session::logout(&mut desk),
        Commands::Open { path } => commands::session::open(&desk, &path, &ctx),
        Commands::Dashboard => commands::dashboard::handle(&desk, &ctx),
        Commands::Calls { search, status, direction } => {
            commands::calls::list(&desk, &ctx, search, status, direction)
        }
        Commands::Agents { search, action: None } => commands::agents::list(&desk, &ctx, &search),
        Commands::Agents {
            action: Some(AgentCommands::Call { id, notes, wait }),
            ..
        } => commands::agents::call(&desk, &ctx, &id, notes.as_deref(), wait).await,
        Commands::Queue => commands::services::queue(&desk, &ctx).await,
        Commands::AgentStatus => commands::services::agent_status(&desk, &ctx).await,
        Commands::Reports => commands::services::reports(&desk, &ctx).await,
        Commands::Call { phone_number, notes, wait } => {
            commands::calls::place(&desk, &ctx, &phone_number, notes.as_deref(), wait).await
        }
        Commands::EndCall { sid } => commands::calls::end(&desk, &ctx, &sid).await,
        Commands::CallStatus { sid } => commands::calls::status(&desk, &ctx, &sid).await,
        Commands::Settings { action } => commands::settings::handle(action, &mut desk, &ctx),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::default().with_verbosity(cli.verbose);
    if cli.log_json {
        logging = logging.with_json();
    }
    if let Err(e) = setup_logging(&logging) {
        eprintln!("Warning: {}", e);
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
