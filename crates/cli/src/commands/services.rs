//! Views backed by the remote services: queue, agent presence, reports

use chrono::Utc;
use tabled::Tabled;

use calldesk_core::CallDesk;
use calldesk_core::filter::rank_queue;
use calldesk_core::format::{format_hour, format_minutes_seconds, format_time_since};
use calldesk_core::models::{AgentCallSummary, AgentStatusData, CallReport, QueueItem};
use calldesk_core::routes::Route;

use super::{Context, require};
use crate::output;

#[derive(Tabled)]
struct QueueRow {
    #[tabled(rename = "#")]
    id: u32,
    #[tabled(rename = "Caller")]
    caller: String,
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Waiting")]
    wait: String,
    #[tabled(rename = "Priority")]
    priority: String,
}

impl From<&QueueItem> for QueueRow {
    fn from(item: &QueueItem) -> Self {
        Self {
            id: item.id,
            caller: item.caller_name.clone(),
            number: item.phone_number.clone(),
            wait: format_minutes_seconds(item.wait_time),
            priority: output::priority(item.priority).to_string(),
        }
    }
}

pub async fn queue(desk: &CallDesk, ctx: &Context) -> anyhow::Result<()> {
    require(desk, Route::Dashboard)?;

    let items = rank_queue(desk.backend().queue_status().await?);
    ctx.format.print(&items, |items| {
        if items.is_empty() {
            return "No callers waiting".to_string();
        }
        output::table(items.iter().map(QueueRow::from))
    })
}

#[derive(Tabled)]
struct PresenceRow {
    #[tabled(rename = "Agent")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Active Calls")]
    active_calls: u32,
    #[tabled(rename = "Last Activity")]
    last_activity: String,
}

pub async fn agent_status(desk: &CallDesk, ctx: &Context) -> anyhow::Result<()> {
    require(desk, Route::Agents)?;

    let statuses = desk.backend().agent_statuses().await?;
    let now = Utc::now();
    ctx.format.print(&statuses, |statuses| {
        output::table(statuses.iter().map(|s: &AgentStatusData| PresenceRow {
            name: s.name.clone(),
            status: output::presence(s.status).to_string(),
            active_calls: s.active_calls,
            last_activity: format_time_since(&s.last_activity, &now),
        }))
    })
}

#[derive(Tabled)]
struct AgentReportRow {
    #[tabled(rename = "Agent")]
    agent: String,
    #[tabled(rename = "Calls")]
    calls: u32,
    #[tabled(rename = "Avg. Duration")]
    avg_duration: String,
}

impl From<&AgentCallSummary> for AgentReportRow {
    fn from(summary: &AgentCallSummary) -> Self {
        Self {
            agent: summary.agent_name.clone(),
            calls: summary.calls,
            avg_duration: format_minutes_seconds(summary.avg_duration),
        }
    }
}

pub async fn reports(desk: &CallDesk, ctx: &Context) -> anyhow::Result<()> {
    require(desk, Route::Dashboard)?;

    let report = desk.backend().call_reports().await?;
    ctx.format.print(&report, render_report)
}

fn render_report(report: &CallReport) -> String {
    let totals = output::fields([
        ("Total Calls", report.total_calls.to_string()),
        (
            "Answered",
            format!("{} ({}%)", report.answered_calls, report.answered_percent()),
        ),
        (
            "Missed",
            format!("{} ({}%)", report.missed_calls, report.missed_percent()),
        ),
        ("Avg. Wait Time", format_minutes_seconds(report.avg_wait_time)),
        ("Avg. Call Duration", format_minutes_seconds(report.avg_call_duration)),
        ("Peak Hour", format_hour(report.peak_hour)),
    ]);

    format!(
        "{}\n{}\n\n{}\n{}",
        output::heading("Call Report"),
        totals,
        output::heading("By Agent"),
        output::table(report.calls_by_agent.iter().map(AgentReportRow::from)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use calldesk_core::services::{DeskBackend, MockDeskBackend};

    #[tokio::test]
    async fn test_report_renders_percentages() {
        let report = MockDeskBackend::instant().call_reports().await.unwrap();
        let rendered = render_report(&report);

        assert!(rendered.contains("389 (90%)"));
        assert!(rendered.contains("43 (10%)"));
        assert!(rendered.contains("14:00"));
    }
}
