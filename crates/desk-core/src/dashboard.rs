//! Dashboard overview: headline counters, recent calls and hourly volume

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::data::MockDataStore;
use crate::filter::recent_calls;
use crate::format::{format_minutes_seconds, format_timestamp, recent_call_summary};
use crate::models::{CallDirection, CallMetrics, CallStatus};

/// Number of calls on the recent-calls card
pub const RECENT_CALLS_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentCallRow {
    pub id: String,
    pub caller: String,
    pub direction: CallDirection,
    pub status: CallStatus,
    pub when: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub generated_at: DateTime<Utc>,
    pub active_calls: usize,
    pub available_agents: usize,
    pub total_agents: usize,
    pub answered_percent: u32,
    pub avg_wait: String,
    pub avg_call_duration: String,
    pub metrics: CallMetrics,
    pub recent_calls: Vec<RecentCallRow>,
}

impl DashboardSummary {
    pub fn build(store: &MockDataStore) -> Self {
        let metrics = store.metrics().clone();

        let recent_calls = recent_calls(store.calls(), RECENT_CALLS_LIMIT)
            .into_iter()
            .map(|call| RecentCallRow {
                id: call.id.clone(),
                caller: call.caller.clone(),
                direction: call.direction,
                status: call.status,
                when: format_timestamp(&call.timestamp),
                summary: recent_call_summary(call),
            })
            .collect();

        Self {
            generated_at: store.loaded_at(),
            active_calls: store.active_calls().len(),
            available_agents: store.available_agent_count(),
            total_agents: store.agents().len(),
            answered_percent: metrics.answered_percent(),
            avg_wait: format_minutes_seconds(metrics.avg_wait_time),
            avg_call_duration: format_minutes_seconds(metrics.avg_call_duration),
            metrics,
            recent_calls,
        }
    }
}
