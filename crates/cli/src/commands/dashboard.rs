//! Dashboard view

use tabled::Tabled;

use calldesk_core::CallDesk;
use calldesk_core::dashboard::{DashboardSummary, RecentCallRow};
use calldesk_core::format::format_hour;
use calldesk_core::models::HourlyVolume;
use calldesk_core::routes::Route;

use super::{Context, require};
use crate::output;

const BAR_WIDTH: u32 = 30;

#[derive(Tabled)]
struct RecentRow {
    #[tabled(rename = "Caller")]
    caller: String,
    #[tabled(rename = "Direction")]
    direction: String,
    #[tabled(rename = "Time")]
    when: String,
    #[tabled(rename = "Duration")]
    summary: String,
}

impl From<&RecentCallRow> for RecentRow {
    fn from(row: &RecentCallRow) -> Self {
        Self {
            caller: row.caller.clone(),
            direction: row.direction.to_string(),
            when: row.when.clone(),
            summary: match row.status {
                status if status.is_live() => output::call_status(status).to_string(),
                _ => row.summary.clone(),
            },
        }
    }
}

pub fn handle(desk: &CallDesk, ctx: &Context) -> anyhow::Result<()> {
    require(desk, Route::Dashboard)?;
    let summary = DashboardSummary::build(desk.data());
    ctx.format.print(&summary, render)
}

fn render(summary: &DashboardSummary) -> String {
    let headline = output::fields([
        ("Active Calls", summary.active_calls.to_string()),
        (
            "Available Agents",
            format!("{} / {}", summary.available_agents, summary.total_agents),
        ),
        ("Answered", format!("{}%", summary.answered_percent)),
        ("Avg. Wait Time", summary.avg_wait.clone()),
        ("Avg. Call Duration", summary.avg_call_duration.clone()),
    ]);

    let recent = output::table(summary.recent_calls.iter().map(RecentRow::from));

    format!(
        "{}\n{}\n\n{}\n{}\n\n{}\n{}",
        output::heading("Overview"),
        headline,
        output::heading("Recent Calls"),
        recent,
        output::heading("Calls per Hour"),
        volume_chart(&summary.metrics.calls_per_hour),
    )
}

/// Horizontal bars scaled to the busiest hour
fn volume_chart(volume: &[HourlyVolume]) -> String {
    let peak = volume.iter().map(|h| h.count).max().unwrap_or(0).max(1);

    volume
        .iter()
        .map(|h| {
            let width = (h.count * BAR_WIDTH).div_ceil(peak) as usize;
            format!("{:>6} {} {}", format_hour(h.hour), "█".repeat(width), h.count)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_chart_scales_to_peak() {
        let chart = volume_chart(&[
            HourlyVolume { hour: 9, count: 5 },
            HourlyVolume { hour: 10, count: 10 },
        ]);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], format!("  9:00 {} 5", "█".repeat(15)));
        assert_eq!(lines[1], format!(" 10:00 {} 10", "█".repeat(30)));
    }

    #[test]
    fn test_volume_chart_handles_empty_hours() {
        assert_eq!(volume_chart(&[]), "");
        let chart = volume_chart(&[HourlyVolume { hour: 8, count: 0 }]);
        assert_eq!(chart, "  8:00  0");
    }
}
