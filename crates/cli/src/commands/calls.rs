//! Call history and call control

use serde::Serialize;
use tabled::Tabled;
use tracing::info;

use calldesk_core::CallDesk;
use calldesk_core::dialer::{Dialer, PlacedCall, PollOutcome};
use calldesk_core::filter::{CallFilter, Selector, filter_calls};
use calldesk_core::format::{format_duration, format_timestamp};
use calldesk_core::models::{Call, CallDirection, CallStatus};
use calldesk_core::routes::Route;
use calldesk_core::telephony::TelephonyProvider;

use super::{Context, require};
use crate::output;

#[derive(Tabled)]
struct CallRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Caller")]
    caller: String,
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Agent")]
    agent: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Direction")]
    direction: String,
}

impl From<&Call> for CallRow {
    fn from(call: &Call) -> Self {
        Self {
            id: call.id.clone(),
            caller: call.caller.clone(),
            number: call.caller_number.clone(),
            agent: call.agent.clone().unwrap_or_else(|| "Unassigned".to_string()),
            time: format_timestamp(&call.timestamp),
            duration: format_duration(call.duration),
            status: output::call_status(call.status).to_string(),
            direction: call.direction.to_string(),
        }
    }
}

pub fn list(
    desk: &CallDesk,
    ctx: &Context,
    search: String,
    status: Selector<CallStatus>,
    direction: Selector<CallDirection>,
) -> anyhow::Result<()> {
    require(desk, Route::Calls)?;

    let filter = CallFilter::default()
        .with_query(search)
        .with_status(status)
        .with_direction(direction);
    let calls = filter_calls(desk.data().calls(), &filter);

    ctx.format.print(&calls, |calls| {
        if calls.is_empty() {
            return "No calls match the current filters".to_string();
        }
        output::table(calls.iter().map(|call| CallRow::from(*call)))
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlacedCallView<'a> {
    #[serde(flatten)]
    placed: &'a PlacedCall,
    #[serde(skip_serializing_if = "Option::is_none")]
    poll: Option<PollOutcome>,
}

pub async fn place(
    desk: &CallDesk,
    ctx: &Context,
    phone_number: &str,
    notes: Option<&str>,
    wait: bool,
) -> anyhow::Result<()> {
    require(desk, Route::Dashboard)?;

    let dialer = desk.dialer(ctx.api_url.as_deref())?;
    if ctx.format.is_table() {
        println!("Connecting to {}...", phone_number.trim());
    }
    let placed = dialer.place_call(phone_number, notes).await?;
    report_placed(desk, ctx, &dialer, placed, wait).await
}

/// Optionally follow a placed call, then print it
pub(crate) async fn report_placed(
    desk: &CallDesk,
    ctx: &Context,
    dialer: &Dialer,
    mut placed: PlacedCall,
    wait: bool,
) -> anyhow::Result<()> {
    let poll = if wait {
        let policy = desk.settings().services.poll_policy();
        info!("📞 Following call to {} every {:?}", placed.to, policy.interval);
        dialer.follow(&mut placed, policy).await
    } else {
        None
    };

    let view = PlacedCallView { placed: &placed, poll };
    ctx.format.print(&view, |v| {
        let mut rows = vec![
            ("To", v.placed.to.clone()),
            ("Phase", v.placed.phase.label().to_string()),
            ("SID", v.placed.initiation.sid.clone().unwrap_or_else(|| "-".to_string())),
            ("Record", v.placed.record.call_id.to_string()),
        ];
        match v.poll {
            Some(PollOutcome::Settled { status, polls }) => {
                rows.push(("Final Status", format!("{} after {} polls", status, polls)));
            }
            Some(PollOutcome::TimedOut { polls }) => {
                rows.push(("Final Status", format!("unsettled after {} polls", polls)));
            }
            None => {}
        }
        format!(
            "{}\n{}",
            output::success(&format!("Call to {} has been initiated successfully", v.placed.to)),
            output::fields(rows)
        )
    })
}

pub async fn end(desk: &CallDesk, ctx: &Context, sid: &str) -> anyhow::Result<()> {
    require(desk, Route::Dashboard)?;

    let result = desk.telephony(ctx.api_url.as_deref())?.end_call(sid).await;
    ctx.format.print(&result, |r| {
        let message = r.message.clone().unwrap_or_else(|| "Call ended".to_string());
        if r.success {
            output::success(&message)
        } else {
            output::failure(&message)
        }
    })
}

pub async fn status(desk: &CallDesk, ctx: &Context, sid: &str) -> anyhow::Result<()> {
    require(desk, Route::Dashboard)?;

    let report = desk.telephony(ctx.api_url.as_deref())?.call_status(sid).await;
    ctx.format.print(&report, |r| {
        output::fields([
            ("SID", sid.to_string()),
            ("Status", r.status.to_string()),
            ("Duration", format_duration(r.duration)),
        ])
    })
}
