//! # Mock Backend Services
//!
//! Stand-ins for the dashboard's backend endpoints (place call, queue
//! snapshot, agent presence, call reports). Every operation waits for an
//! artificial latency and then returns a canned or pseudo-random payload.
//!
//! The [`DeskBackend`] trait is the seam where a real backend client would
//! plug in. [`MockDeskBackend`] never fails: anything unexpected is logged
//! and replaced with the canned payload.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use rand::Rng;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{
    AgentCallSummary, AgentStatusData, CallRecord, CallReport, PresenceStatus, QueueItem,
    QueuePriority,
};

/// Backend operations behind the dashboard's quick actions
#[async_trait]
pub trait DeskBackend: Send + Sync {
    /// Record a new outbound call
    async fn make_call(&self, phone_number: &str, notes: Option<&str>) -> Result<CallRecord>;

    /// Callers currently waiting
    async fn queue_status(&self) -> Result<Vec<QueueItem>>;

    /// Agent presence snapshot
    async fn agent_statuses(&self) -> Result<Vec<AgentStatusData>>;

    /// Call report summary
    async fn call_reports(&self) -> Result<CallReport>;
}

/// Backend that fabricates its responses after a fixed delay
///
/// ```rust
/// use calldesk_core::services::{DeskBackend, MockDeskBackend};
///
/// # tokio_test::block_on(async {
/// let backend = MockDeskBackend::instant();
/// let queue = backend.queue_status().await.unwrap();
/// assert_eq!(queue.len(), 3);
/// # })
/// ```
#[derive(Debug, Clone)]
pub struct MockDeskBackend {
    latency: Duration,
}

impl MockDeskBackend {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// No artificial delay, for tests
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for MockDeskBackend {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

#[async_trait]
impl DeskBackend for MockDeskBackend {
    async fn make_call(&self, phone_number: &str, notes: Option<&str>) -> Result<CallRecord> {
        info!("📞 Recording call to {} (notes: {:?})", phone_number, notes);
        self.simulate_latency().await;

        let call_id = rand::thread_rng().gen_range(0..1_000_000);
        Ok(CallRecord {
            success: true,
            call_id,
            timestamp: Utc::now(),
        })
    }

    async fn queue_status(&self) -> Result<Vec<QueueItem>> {
        info!("📋 Getting queue status");
        self.simulate_latency().await;

        let now = Utc::now();
        let item = |id, name: &str, phone: &str, wait: u32, priority| QueueItem {
            id,
            caller_name: name.to_string(),
            phone_number: phone.to_string(),
            wait_time: wait,
            priority,
            timestamp: now - ChronoDuration::seconds(wait as i64),
        };

        let queue = vec![
            item(1, "John Doe", "(555) 123-4567", 128, QueuePriority::High),
            item(2, "Jane Smith", "(555) 987-6543", 45, QueuePriority::Medium),
            item(3, "Robert Johnson", "(555) 456-7890", 210, QueuePriority::Low),
        ];
        debug!("Queue snapshot has {} callers", queue.len());
        Ok(queue)
    }

    async fn agent_statuses(&self) -> Result<Vec<AgentStatusData>> {
        info!("👥 Getting agent statuses");
        self.simulate_latency().await;

        let now = Utc::now();
        let agent = |id, name: &str, status, active_calls, idle_secs: i64| AgentStatusData {
            id,
            name: name.to_string(),
            status,
            active_calls,
            last_activity: now - ChronoDuration::seconds(idle_secs),
        };

        Ok(vec![
            agent(1, "Alice Cooper", PresenceStatus::Available, 0, 300),
            agent(2, "Bob Smith", PresenceStatus::Busy, 2, 60),
            agent(3, "Charlie Brown", PresenceStatus::Break, 0, 900),
            agent(4, "Diana Prince", PresenceStatus::Offline, 0, 3600),
        ])
    }

    async fn call_reports(&self) -> Result<CallReport> {
        info!("📊 Getting call reports");
        self.simulate_latency().await;

        let summary = |name: &str, calls, avg_duration| AgentCallSummary {
            agent_name: name.to_string(),
            calls,
            avg_duration,
        };

        Ok(CallReport {
            total_calls: 432,
            answered_calls: 389,
            missed_calls: 43,
            avg_wait_time: 37,
            avg_call_duration: 189,
            peak_hour: 14,
            calls_by_agent: vec![
                summary("Alice Cooper", 127, 175),
                summary("Bob Smith", 143, 203),
                summary("Charlie Brown", 119, 168),
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_make_call_returns_record() {
        let backend = MockDeskBackend::instant();
        let before = Utc::now();
        let record = backend.make_call("(555) 123-4567", Some("follow up")).await.unwrap();

        assert!(record.success);
        assert!(record.call_id < 1_000_000);
        assert!(record.timestamp >= before);
    }

    #[tokio::test]
    async fn test_canned_payloads() {
        let backend = MockDeskBackend::instant();

        let queue = backend.queue_status().await.unwrap();
        assert_eq!(queue.len(), 3);
        assert_eq!(queue[0].priority, QueuePriority::High);

        let agents = backend.agent_statuses().await.unwrap();
        assert_eq!(agents.len(), 4);
        assert_eq!(agents[1].status, PresenceStatus::Busy);
        assert_eq!(agents[1].active_calls, 2);

        let report = backend.call_reports().await.unwrap();
        assert_eq!(report.answered_percent(), 90);
        assert_eq!(report.missed_percent(), 10);
        assert_eq!(report.calls_by_agent.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_simulated() {
        let backend = MockDeskBackend::new(Duration::from_millis(250));
        let start = tokio::time::Instant::now();
        backend.queue_status().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(250));
    }
}
