//! Static in-memory data store
//!
//! The agent roster, call history and dashboard metrics are generated once,
//! relative to a load-time clock, and never mutated afterwards.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::models::{
    Agent, AgentStatus, Call, CallDirection, CallMetrics, CallStatus, HourlyVolume,
};

/// Read-only store of mock dashboard data
#[derive(Debug, Clone)]
pub struct MockDataStore {
    agents: Vec<Agent>,
    calls: Vec<Call>,
    metrics: CallMetrics,
    loaded_at: DateTime<Utc>,
}

impl MockDataStore {
    /// Build the store with call timestamps offset from `now`
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let agents = seed_agents();
        let calls = seed_calls(now);
        debug!("Seeded mock store with {} agents and {} calls", agents.len(), calls.len());

        Self {
            agents,
            calls,
            metrics: seed_metrics(),
            loaded_at: now,
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn metrics(&self) -> &CallMetrics {
        &self.metrics
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Calls that are active or waiting
    pub fn active_calls(&self) -> Vec<&Call> {
        self.calls.iter().filter(|c| c.status.is_live()).collect()
    }

    pub fn available_agent_count(&self) -> usize {
        self.agents
            .iter()
            .filter(|a| a.status == AgentStatus::Available)
            .count()
    }

    pub fn agent_by_id(&self, id: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Resolve a call's free-text agent name against the roster
    pub fn agent_for_call(&self, call: &Call) -> Option<&Agent> {
        let name = call.agent.as_deref()?;
        self.agents.iter().find(|a| a.name == name)
    }

    /// Calls naming an agent that is not on the roster
    pub fn unlinked_calls(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| c.agent.is_some() && self.agent_for_call(c).is_none())
            .collect()
    }
}

fn agent(id: &str, name: &str, status: AgentStatus, extension: &str, active: u32, total: u32) -> Agent {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    let avatar = format!(
        "https://ui-avatars.com/api/?name={}&background=0D8ABC&color=fff",
        name.replace(' ', "+")
    );

    Agent {
        id: id.to_string(),
        name: name.to_string(),
        email,
        status,
        extension: extension.to_string(),
        active_calls: active,
        total_calls: total,
        avatar: Some(avatar),
    }
}

fn seed_agents() -> Vec<Agent> {
    vec![
        agent("1", "John Smith", AgentStatus::Available, "101", 0, 45),
        agent("2", "Sarah Johnson", AgentStatus::OnCall, "102", 1, 38),
        agent("3", "Michael Davis", AgentStatus::Break, "103", 0, 53),
        agent("4", "Emily Wilson", AgentStatus::Available, "104", 0, 32),
        agent("5", "Robert Brown", AgentStatus::Offline, "105", 0, 27),
    ]
}

struct CallSeed {
    caller: &'static str,
    number: &'static str,
    agent: Option<&'static str>,
    minutes_ago: i64,
    duration: Option<u32>,
    status: CallStatus,
    direction: CallDirection,
    notes: &'static str,
}

const CALL_SEEDS: [CallSeed; 8] = [
    CallSeed {
        caller: "Jane Cooper",
        number: "+1 (555) 123-4567",
        agent: Some("Sarah Johnson"),
        minutes_ago: 15,
        duration: None,
        status: CallStatus::Active,
        direction: CallDirection::Inbound,
        notes: "Customer inquiry about premium subscription plan",
    },
    CallSeed {
        caller: "Brooklyn Simmons",
        number: "+1 (555) 234-5678",
        agent: None,
        minutes_ago: 5,
        duration: None,
        status: CallStatus::Waiting,
        direction: CallDirection::Inbound,
        notes: "",
    },
    CallSeed {
        caller: "Leslie Alexander",
        number: "+1 (555) 345-6789",
        agent: Some("John Smith"),
        minutes_ago: 45,
        duration: Some(173),
        status: CallStatus::Ended,
        direction: CallDirection::Inbound,
        notes: "Technical support for login issues",
    },
    CallSeed {
        caller: "Dianne Russell",
        number: "+1 (555) 456-7890",
        agent: Some("Emily Wilson"),
        minutes_ago: 120,
        duration: Some(62),
        status: CallStatus::Ended,
        direction: CallDirection::Outbound,
        notes: "Follow-up on previous inquiry",
    },
    CallSeed {
        caller: "Cameron Williamson",
        number: "+1 (555) 567-8901",
        agent: Some("Michael Davis"),
        minutes_ago: 180,
        duration: Some(0),
        status: CallStatus::Missed,
        direction: CallDirection::Inbound,
        notes: "",
    },
    CallSeed {
        caller: "Guy Hawkins",
        number: "+1 (555) 678-9012",
        agent: Some("Robert Brown"),
        minutes_ago: 240,
        duration: Some(315),
        status: CallStatus::Ended,
        direction: CallDirection::Inbound,
        notes: "Billing question",
    },
    CallSeed {
        caller: "Kristin Watson",
        number: "+1 (555) 789-0123",
        agent: Some("John Smith"),
        minutes_ago: 300,
        duration: Some(247),
        status: CallStatus::Ended,
        direction: CallDirection::Inbound,
        notes: "Service upgrade inquiry",
    },
    CallSeed {
        caller: "Cody Fisher",
        number: "+1 (555) 890-1234",
        agent: Some("Sarah Johnson"),
        minutes_ago: 360,
        duration: Some(183),
        status: CallStatus::Ended,
        direction: CallDirection::Outbound,
        notes: "Scheduled call for account review",
    },
];

fn seed_calls(now: DateTime<Utc>) -> Vec<Call> {
    CALL_SEEDS
        .iter()
        .enumerate()
        .map(|(i, seed)| Call {
            id: (i + 1).to_string(),
            caller: seed.caller.to_string(),
            caller_number: seed.number.to_string(),
            agent: seed.agent.map(str::to_string),
            timestamp: now - Duration::minutes(seed.minutes_ago),
            duration: seed.duration,
            status: seed.status,
            direction: seed.direction,
            notes: (!seed.notes.is_empty()).then(|| seed.notes.to_string()),
        })
        .collect()
}

fn seed_metrics() -> CallMetrics {
    let hourly = [(9, 5), (10, 8), (11, 12), (12, 7), (13, 4), (14, 6), (15, 5)];

    CallMetrics {
        total_calls: 47,
        answered_calls: 42,
        missed_calls: 5,
        avg_wait_time: 28,
        avg_call_duration: 195,
        calls_per_hour: hourly
            .iter()
            .map(|&(hour, count)| HourlyVolume { hour, count })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_store_shape() {
        let now = Utc::now();
        let store = MockDataStore::seeded(now);

        assert_eq!(store.agents().len(), 5);
        assert_eq!(store.calls().len(), 8);
        assert_eq!(store.loaded_at(), now);
        assert_eq!(store.calls()[0].timestamp, now - Duration::minutes(15));
        assert_eq!(store.agents()[1].email, "sarah.johnson@example.com");
        assert_eq!(store.metrics().calls_per_hour.len(), 7);
    }

    #[test]
    fn test_seeded_calls_respect_duration_invariant() {
        let store = MockDataStore::seeded(Utc::now());
        for call in store.calls() {
            call.validate().expect("seed call violates invariant");
        }
    }

    #[test]
    fn test_dashboard_counters() {
        let store = MockDataStore::seeded(Utc::now());
        let active: Vec<&str> = store.active_calls().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(active, vec!["1", "2"]);
        assert_eq!(store.available_agent_count(), 2);
    }

    #[test]
    fn test_agent_name_resolution() {
        let store = MockDataStore::seeded(Utc::now());
        let first = &store.calls()[0];
        assert_eq!(store.agent_for_call(first).map(|a| a.id.as_str()), Some("2"));

        let waiting = &store.calls()[1];
        assert!(store.agent_for_call(waiting).is_none());
        assert!(store.unlinked_calls().is_empty());
        assert_eq!(store.agent_by_id("5").map(|a| a.name.as_str()), Some("Robert Brown"));
    }
}
