//! Outbound call placement and status polling
//!
//! Placing a call goes through the telephony provider first and then
//! records the call with the backend. After that, the caller may poll the
//! provider on a fixed interval until the call reaches a terminal status or
//! the polling window closes. Polling is the only timed behavior in the
//! dashboard; dropping the future cancels it.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::{CallDeskError, Result};
use crate::models::{Agent, CallRecord};
use crate::services::DeskBackend;
use crate::telephony::{CallInitiation, ProviderStatus, TelephonyProvider};

/// Where an outbound call is in the dial flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallPhase {
    Connecting,
    Connected,
    Completed,
}

impl CallPhase {
    pub fn label(&self) -> &'static str {
        match self {
            CallPhase::Connecting => "Initiating Call...",
            CallPhase::Connected => "Call Connected",
            CallPhase::Completed => "Call Completed",
        }
    }
}

impl fmt::Display for CallPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of a successful dial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedCall {
    pub to: String,
    pub initiation: CallInitiation,
    pub record: CallRecord,
    pub phase: CallPhase,
}

/// Polling cadence and give-up window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub window: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            window: Duration::from_secs(120),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum PollOutcome {
    /// Provider reported a terminal status
    Settled { status: ProviderStatus, polls: u32 },
    /// Window elapsed without a terminal status
    TimedOut { polls: u32 },
}

/// Dial flow over a telephony provider and a backend
pub struct Dialer {
    provider: Arc<dyn TelephonyProvider>,
    backend: Arc<dyn DeskBackend>,
}

impl Dialer {
    pub fn new(provider: Arc<dyn TelephonyProvider>, backend: Arc<dyn DeskBackend>) -> Self {
        Self { provider, backend }
    }

    pub fn provider(&self) -> &Arc<dyn TelephonyProvider> {
        &self.provider
    }

    /// Initiate a call and record it with the backend
    pub async fn place_call(&self, phone_number: &str, notes: Option<&str>) -> Result<PlacedCall> {
        let to = phone_number.trim();
        if to.is_empty() {
            return Err(CallDeskError::validation("Phone number is required"));
        }
        let notes = notes.map(str::trim).filter(|n| !n.is_empty());

        debug!("{} {}", CallPhase::Connecting, to);
        let initiation = self.provider.initiate_call(to, notes).await;
        if !initiation.success {
            warn!("Provider refused call to {}", to);
            return Err(CallDeskError::internal("Failed to initiate call"));
        }

        let record = self.backend.make_call(to, notes).await?;
        info!("✅ Call to {} has been initiated successfully (sid: {:?})", to, initiation.sid);

        Ok(PlacedCall {
            to: to.to_string(),
            initiation,
            record,
            phase: CallPhase::Connected,
        })
    }

    /// Dial an agent at their extension
    pub async fn call_agent(&self, agent: &Agent, notes: Option<&str>) -> Result<PlacedCall> {
        info!("📞 Calling {}...", agent.name);
        self.place_call(&agent.extension, notes).await
    }

    /// Poll a placed call until it settles; calls without a SID are never polled
    pub async fn follow(&self, placed: &mut PlacedCall, policy: PollPolicy) -> Option<PollOutcome> {
        let sid = placed.initiation.sid.clone()?;
        let outcome = poll_until_settled(self.provider.as_ref(), &sid, policy).await;
        if matches!(outcome, PollOutcome::Settled { status: ProviderStatus::Completed, .. }) {
            placed.phase = CallPhase::Completed;
        }
        Some(outcome)
    }
}

/// Shortest interval the poller will use; a zero interval is raised to this
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Poll `call_status` every `policy.interval` until a terminal status or
/// until `policy.window` has elapsed. The first poll happens one interval
/// after the call.
///
/// The window is a hard bound: a status request still in flight at the
/// deadline is abandoned, and when a tick falls on the deadline itself the
/// deadline wins, so no poll is started at the boundary.
pub async fn poll_until_settled(
    provider: &dyn TelephonyProvider,
    call_sid: &str,
    policy: PollPolicy,
) -> PollOutcome {
    let interval = policy.interval.max(MIN_POLL_INTERVAL);
    if interval != policy.interval {
        warn!("Poll interval {:?} too short, using {:?}", policy.interval, interval);
    }

    let deadline = Instant::now() + policy.window;
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut polls = 0u32;

    loop {
        tokio::select! {
            biased;

            _ = tokio::time::sleep_until(deadline) => {
                return timed_out(call_sid, polls);
            }
            _ = ticker.tick() => {
                polls += 1;
                let report = match tokio::time::timeout_at(deadline, provider.call_status(call_sid)).await {
                    Ok(report) => report,
                    Err(_) => {
                        debug!("Poll {} for {} still pending at the deadline", polls, call_sid);
                        return timed_out(call_sid, polls);
                    }
                };
                debug!("Poll {} for {}: {}", polls, call_sid, report.status);
                if report.status.is_terminal() {
                    info!("📴 Call {} settled as {}", call_sid, report.status);
                    return PollOutcome::Settled { status: report.status, polls };
                }
            }
        }
    }
}

fn timed_out(call_sid: &str, polls: u32) -> PollOutcome {
    info!("⏱️ Stopped polling {} after {} polls", call_sid, polls);
    PollOutcome::TimedOut { polls }
}
