//! Output formatting

use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use calldesk_core::models::{AgentStatus, CallStatus, PresenceStatus, QueuePriority};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    /// Print `data` as JSON, or run `table` to render the human view
    pub fn print<T: Serialize>(&self, data: &T, table: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
        match self {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
            OutputFormat::Table => println!("{}", table(data)),
        }
        Ok(())
    }

    pub fn is_table(&self) -> bool {
        matches!(self, OutputFormat::Table)
    }
}

pub fn table<R: Tabled>(rows: impl IntoIterator<Item = R>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct Field {
    #[tabled(rename = "Field")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Two-column key/value table
pub fn fields<K: Into<String>>(pairs: impl IntoIterator<Item = (K, String)>) -> String {
    table(pairs.into_iter().map(|(name, value)| Field {
        name: name.into(),
        value,
    }))
}

pub fn heading(title: &str) -> String {
    title.bold().to_string()
}

pub fn call_status(status: CallStatus) -> ColoredString {
    match status {
        CallStatus::Active => status.label().green(),
        CallStatus::Waiting => status.label().yellow(),
        CallStatus::Ended => status.label().normal(),
        CallStatus::Missed => status.label().red(),
    }
}

pub fn agent_status(status: AgentStatus) -> ColoredString {
    match status {
        AgentStatus::Available => status.label().green(),
        AgentStatus::OnCall => status.label().blue(),
        AgentStatus::Break => status.label().yellow(),
        AgentStatus::Offline => status.label().dimmed(),
    }
}

pub fn presence(status: PresenceStatus) -> ColoredString {
    match status {
        PresenceStatus::Available => status.label().green(),
        PresenceStatus::Busy => status.label().red(),
        PresenceStatus::Break => status.label().yellow(),
        PresenceStatus::Offline => status.label().dimmed(),
    }
}

pub fn priority(priority: QueuePriority) -> ColoredString {
    match priority {
        QueuePriority::High => priority.label().red(),
        QueuePriority::Medium => priority.label().yellow(),
        QueuePriority::Low => priority.label().green(),
    }
}

pub fn success(message: &str) -> String {
    format!("{} {}", "✓".green(), message)
}

pub fn failure(message: &str) -> String {
    format!("{} {}", "✗".red(), message)
}
