//! Call history filtering and ordering
//!
//! A call passes the filter when it matches the free-text query AND the
//! status selector AND the direction selector. Results are ordered newest
//! first with a stable sort, so calls sharing a timestamp keep their input
//! order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CallDeskError;
use crate::models::{Agent, Call, CallDirection, CallStatus, QueueItem};

/// Either every value or exactly one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selector<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selector<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(wanted) => wanted == value,
        }
    }
}

impl<T> FromStr for Selector<T>
where
    T: FromStr<Err = CallDeskError>,
{
    type Err = CallDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Selector::All)
        } else {
            s.parse().map(Selector::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => f.write_str("all"),
            Selector::Only(value) => value.fmt(f),
        }
    }
}

/// Filter parameters for the call history view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallFilter {
    pub query: String,
    pub status: Selector<CallStatus>,
    pub direction: Selector<CallDirection>,
}

impl CallFilter {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_status(mut self, status: Selector<CallStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn with_direction(mut self, direction: Selector<CallDirection>) -> Self {
        self.direction = direction;
        self
    }

    /// Back to empty query and both selectors on `all`
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, call: &Call) -> bool {
        matches_query(call, &self.query.to_lowercase())
            && self.status.matches(&call.status)
            && self.direction.matches(&call.direction)
    }
}

// `needle` must already be lowercased
fn matches_query(call: &Call, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    let contains = |field: &str| field.to_lowercase().contains(needle);

    contains(&call.caller)
        || contains(&call.caller_number)
        || call.agent.as_deref().is_some_and(contains)
        || call.notes.as_deref().is_some_and(contains)
}

/// Apply `filter` to `calls` and order the survivors newest first
pub fn filter_calls<'a>(calls: &'a [Call], filter: &CallFilter) -> Vec<&'a Call> {
    let needle = filter.query.to_lowercase();

    let mut matched: Vec<&Call> = calls
        .iter()
        .filter(|call| {
            matches_query(call, &needle)
                && filter.status.matches(&call.status)
                && filter.direction.matches(&call.direction)
        })
        .collect();

    sort_by_recency(&mut matched);
    matched
}

/// Stable sort by timestamp, most recent first
pub fn sort_by_recency(calls: &mut [&Call]) {
    calls.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// The `limit` most recent calls
pub fn recent_calls(calls: &[Call], limit: usize) -> Vec<&Call> {
    let mut all: Vec<&Call> = calls.iter().collect();
    sort_by_recency(&mut all);
    all.truncate(limit);
    all
}

/// Roster search: name or email case-insensitively, extension as typed
pub fn filter_agents<'a>(agents: &'a [Agent], query: &str) -> Vec<&'a Agent> {
    let needle = query.to_lowercase();

    agents
        .iter()
        .filter(|agent| {
            agent.name.to_lowercase().contains(&needle)
                || agent.email.to_lowercase().contains(&needle)
                || agent.extension.contains(query)
        })
        .collect()
}

/// Order waiting callers by priority, then longest wait
pub fn rank_queue(mut items: Vec<QueueItem>) -> Vec<QueueItem> {
    items.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.wait_time.cmp(&a.wait_time))
    });
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    use crate::data::MockDataStore;
    use crate::models::QueuePriority;

    fn ids(calls: &[&Call]) -> Vec<String> {
        calls.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn test_default_filter_orders_newest_first() {
        let store = MockDataStore::seeded(Utc::now());
        let result = filter_calls(store.calls(), &CallFilter::default());
        assert_eq!(ids(&result), vec!["2", "1", "3", "4", "5", "6", "7", "8"]);
    }

    #[test]
    fn test_query_is_case_insensitive_across_fields() {
        let store = MockDataStore::seeded(Utc::now());
        let calls = store.calls();

        // caller name
        let hits = filter_calls(calls, &CallFilter::default().with_query("JANE"));
        assert_eq!(ids(&hits), vec!["1"]);

        // caller number
        let hits = filter_calls(calls, &CallFilter::default().with_query("345-6789"));
        assert_eq!(ids(&hits), vec!["3"]);

        // agent name
        let hits = filter_calls(calls, &CallFilter::default().with_query("sarah"));
        assert_eq!(ids(&hits), vec!["1", "8"]);

        // notes
        let hits = filter_calls(calls, &CallFilter::default().with_query("billing"));
        assert_eq!(ids(&hits), vec!["6"]);

        let hits = filter_calls(calls, &CallFilter::default().with_query("no such caller"));
        assert!(hits.is_empty());
    }

    #[test]
    fn test_selectors_combine() {
        let store = MockDataStore::seeded(Utc::now());
        let filter = CallFilter::default()
            .with_status(Selector::Only(CallStatus::Ended))
            .with_direction(Selector::Only(CallDirection::Outbound));

        let hits = filter_calls(store.calls(), &filter);
        assert_eq!(ids(&hits), vec!["4", "8"]);
        assert!(hits.iter().all(|c| filter.matches(c)));
    }

    #[test]
    fn test_active_scenario() {
        let now = Utc::now();
        let mut store_calls = MockDataStore::seeded(now).calls().to_vec();
        let missed = store_calls.remove(4);
        let active = store_calls.remove(0);
        assert_eq!(missed.timestamp, now - Duration::hours(3));

        let input = vec![missed, active.clone()];
        let filter = CallFilter::default().with_status(Selector::Only(CallStatus::Active));
        let hits = filter_calls(&input, &filter);
        assert_eq!(hits, vec![&active]);
    }

    #[test]
    fn test_selector_parsing_and_reset() {
        assert_eq!("all".parse::<Selector<CallStatus>>().unwrap(), Selector::All);
        assert_eq!(
            "missed".parse::<Selector<CallStatus>>().unwrap(),
            Selector::Only(CallStatus::Missed)
        );
        assert!("sideways".parse::<Selector<CallDirection>>().is_err());
        assert_eq!(Selector::Only(CallDirection::Inbound).to_string(), "inbound");

        let mut filter = CallFilter::default()
            .with_query("x")
            .with_status(Selector::Only(CallStatus::Waiting));
        filter.reset();
        assert_eq!(filter, CallFilter::default());
    }

    #[test]
    fn test_recent_calls_limit() {
        let store = MockDataStore::seeded(Utc::now());
        let recent = recent_calls(store.calls(), 5);
        assert_eq!(ids(&recent), vec!["2", "1", "3", "4", "5"]);
        assert!(recent_calls(&[], 5).is_empty());
    }

    #[test]
    fn test_agent_search() {
        let store = MockDataStore::seeded(Utc::now());
        let agents = store.agents();

        let names = |hits: Vec<&Agent>| hits.iter().map(|a| a.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(filter_agents(agents, "EMILY")), vec!["Emily Wilson"]);
        assert_eq!(names(filter_agents(agents, "105")), vec!["Robert Brown"]);
        assert_eq!(filter_agents(agents, "example.com").len(), 5);
        assert_eq!(filter_agents(agents, "").len(), 5);
    }

    #[test]
    fn test_queue_ranking() {
        let now = Utc::now();
        let item = |id, wait, priority| QueueItem {
            id,
            caller_name: format!("caller {}", id),
            phone_number: "(555) 000-0000".to_string(),
            wait_time: wait,
            priority,
            timestamp: now - Duration::seconds(wait as i64),
        };

        let ranked = rank_queue(vec![
            item(1, 30, QueuePriority::Low),
            item(2, 45, QueuePriority::Medium),
            item(3, 210, QueuePriority::Low),
            item(4, 10, QueuePriority::High),
        ]);
        let order: Vec<u32> = ranked.iter().map(|i| i.id).collect();
        assert_eq!(order, vec![4, 2, 3, 1]);
    }
}
