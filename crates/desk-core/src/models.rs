//! # Dashboard Record Types
//!
//! Typed records for everything the dashboard displays: call history,
//! the agent roster, aggregate call metrics, and the payloads returned by
//! the remote services (queue snapshot, agent presence, call reports).
//!
//! All records serialize with camelCase field names so they round-trip
//! through the same JSON shape the dashboard front end consumes.
//!
//! Call records reference agents by free-text name (`Call::agent`), not by
//! identifier. Nothing here enforces that the name exists in the roster;
//! see [`crate::data::MockDataStore::unlinked_calls`] for detecting gaps.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CallDeskError, Result};

/// Call lifecycle status as shown in the call history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Active,
    Waiting,
    Ended,
    Missed,
}

impl CallStatus {
    pub const ALL: [CallStatus; 4] = [
        CallStatus::Active,
        CallStatus::Waiting,
        CallStatus::Ended,
        CallStatus::Missed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Active => "active",
            CallStatus::Waiting => "waiting",
            CallStatus::Ended => "ended",
            CallStatus::Missed => "missed",
        }
    }

    /// Display label ("Active", "Waiting", ...)
    pub fn label(&self) -> &'static str {
        match self {
            CallStatus::Active => "Active",
            CallStatus::Waiting => "Waiting",
            CallStatus::Ended => "Ended",
            CallStatus::Missed => "Missed",
        }
    }

    /// Whether the call is still live (no duration recorded yet)
    pub fn is_live(&self) -> bool {
        matches!(self, CallStatus::Active | CallStatus::Waiting)
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallStatus {
    type Err = CallDeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(CallStatus::Active),
            "waiting" => Ok(CallStatus::Waiting),
            "ended" => Ok(CallStatus::Ended),
            "missed" => Ok(CallStatus::Missed),
            other => Err(CallDeskError::validation(format!("Unknown call status: {}", other))),
        }
    }
}

/// Call direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallDirection {
    Inbound,
    Outbound,
}

impl CallDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallDirection::Inbound => "inbound",
            CallDirection::Outbound => "outbound",
        }
    }
}

impl fmt::Display for CallDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallDirection {
    type Err = CallDeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inbound" => Ok(CallDirection::Inbound),
            "outbound" => Ok(CallDirection::Outbound),
            other => Err(CallDeskError::validation(format!("Unknown call direction: {}", other))),
        }
    }
}

/// One inbound or outbound phone interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub id: String,
    /// Caller display name
    pub caller: String,
    pub caller_number: String,
    /// Assigned agent, by name
    pub agent: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Seconds; `None` while the call is active or waiting
    pub duration: Option<u32>,
    pub status: CallStatus,
    pub direction: CallDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Call {
    /// Check the duration/status invariant: duration is absent exactly
    /// when the call is still live.
    pub fn validate(&self) -> Result<()> {
        match (self.status.is_live(), self.duration) {
            (true, Some(d)) => Err(CallDeskError::validation(format!(
                "call {} is {} but has a duration of {}s",
                self.id, self.status, d
            ))),
            (false, None) => Err(CallDeskError::validation(format!(
                "call {} is {} but has no duration",
                self.id, self.status
            ))),
            _ => Ok(()),
        }
    }
}

/// Agent availability as shown in the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentStatus {
    Available,
    OnCall,
    Break,
    Offline,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Available => "available",
            AgentStatus::OnCall => "on-call",
            AgentStatus::Break => "break",
            AgentStatus::Offline => "offline",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgentStatus::Available => "Available",
            AgentStatus::OnCall => "On Call",
            AgentStatus::Break => "Break",
            AgentStatus::Offline => "Offline",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Call-center staff member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub email: String,
    pub status: AgentStatus,
    pub extension: String,
    pub active_calls: u32,
    pub total_calls: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Call count for one hour of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyVolume {
    pub hour: u8,
    pub count: u32,
}

/// Aggregate dashboard counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallMetrics {
    pub total_calls: u32,
    pub answered_calls: u32,
    pub missed_calls: u32,
    /// Seconds
    pub avg_wait_time: u32,
    /// Seconds
    pub avg_call_duration: u32,
    pub calls_per_hour: Vec<HourlyVolume>,
}

impl CallMetrics {
    /// Answered calls as a rounded percentage of the total
    pub fn answered_percent(&self) -> u32 {
        percent(self.answered_calls, self.total_calls)
    }

    /// Hour with the highest volume, earliest on ties
    pub fn busiest_hour(&self) -> Option<HourlyVolume> {
        self.calls_per_hour
            .iter()
            .copied()
            .reduce(|best, h| if h.count > best.count { h } else { best })
    }
}

/// Caller priority in the waiting queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueuePriority {
    Low,
    Medium,
    High,
}

impl QueuePriority {
    pub fn label(&self) -> &'static str {
        match self {
            QueuePriority::Low => "Low",
            QueuePriority::Medium => "Medium",
            QueuePriority::High => "High",
        }
    }
}

/// Caller currently waiting in the queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub id: u32,
    pub caller_name: String,
    pub phone_number: String,
    /// Seconds spent waiting
    pub wait_time: u32,
    pub priority: QueuePriority,
    pub timestamp: DateTime<Utc>,
}

/// Agent presence as reported by the backend service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Available,
    Busy,
    Offline,
    Break,
}

impl PresenceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PresenceStatus::Available => "Available",
            PresenceStatus::Busy => "Busy",
            PresenceStatus::Offline => "Offline",
            PresenceStatus::Break => "On Break",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStatusData {
    pub id: u32,
    pub name: String,
    pub status: PresenceStatus,
    pub active_calls: u32,
    pub last_activity: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCallSummary {
    pub agent_name: String,
    pub calls: u32,
    /// Seconds
    pub avg_duration: u32,
}

/// Call report summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallReport {
    pub total_calls: u32,
    pub answered_calls: u32,
    pub missed_calls: u32,
    pub avg_wait_time: u32,
    pub avg_call_duration: u32,
    /// Hour of day, 0-23
    pub peak_hour: u8,
    pub calls_by_agent: Vec<AgentCallSummary>,
}

impl CallReport {
    pub fn answered_percent(&self) -> u32 {
        percent(self.answered_calls, self.total_calls)
    }

    pub fn missed_percent(&self) -> u32 {
        percent(self.missed_calls, self.total_calls)
    }
}

/// Result of recording an outbound call with the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    pub success: bool,
    pub call_id: u32,
    pub timestamp: DateTime<Utc>,
}

fn percent(part: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(status: CallStatus, duration: Option<u32>) -> Call {
        Call {
            id: "c1".to_string(),
            caller: "Jane Cooper".to_string(),
            caller_number: "+1 (555) 123-4567".to_string(),
            agent: None,
            timestamp: Utc::now(),
            duration,
            status,
            direction: CallDirection::Inbound,
            notes: None,
        }
    }

    #[test]
    fn test_duration_invariant() {
        assert!(call(CallStatus::Active, None).validate().is_ok());
        assert!(call(CallStatus::Waiting, None).validate().is_ok());
        assert!(call(CallStatus::Ended, Some(62)).validate().is_ok());
        assert!(call(CallStatus::Missed, Some(0)).validate().is_ok());

        assert!(call(CallStatus::Active, Some(437)).validate().is_err());
        assert!(call(CallStatus::Ended, None).validate().is_err());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("Active".parse::<CallStatus>().unwrap(), CallStatus::Active);
        assert_eq!("missed".parse::<CallStatus>().unwrap(), CallStatus::Missed);
        assert!("ringing".parse::<CallStatus>().is_err());
        assert_eq!("OUTBOUND".parse::<CallDirection>().unwrap(), CallDirection::Outbound);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&AgentStatus::OnCall).unwrap(), "\"on-call\"");
        assert_eq!(serde_json::to_string(&CallStatus::Waiting).unwrap(), "\"waiting\"");

        let json = serde_json::to_value(call(CallStatus::Ended, Some(10))).unwrap();
        assert!(json.get("callerNumber").is_some());
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn test_percentages() {
        let metrics = CallMetrics {
            total_calls: 47,
            answered_calls: 42,
            missed_calls: 5,
            avg_wait_time: 28,
            avg_call_duration: 195,
            calls_per_hour: vec![
                HourlyVolume { hour: 10, count: 8 },
                HourlyVolume { hour: 11, count: 12 },
                HourlyVolume { hour: 12, count: 12 },
            ],
        };
        assert_eq!(metrics.answered_percent(), 89);
        assert_eq!(metrics.busiest_hour().unwrap().hour, 11);

        let empty = CallMetrics { total_calls: 0, calls_per_hour: vec![], ..metrics };
        assert_eq!(empty.answered_percent(), 0);
        assert!(empty.busiest_hour().is_none());
    }
}
