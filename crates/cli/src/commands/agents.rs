//! Agent roster

use tabled::Tabled;

use calldesk_core::CallDesk;
use calldesk_core::filter::filter_agents;
use calldesk_core::format::initials;
use calldesk_core::models::Agent;
use calldesk_core::routes::Route;

use super::{Context, require};
use crate::commands::calls::report_placed;
use crate::output;

#[derive(Tabled)]
struct AgentRow {
    #[tabled(rename = "")]
    initials: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Ext.")]
    extension: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Active")]
    active_calls: u32,
    #[tabled(rename = "Total")]
    total_calls: u32,
}

impl From<&Agent> for AgentRow {
    fn from(agent: &Agent) -> Self {
        Self {
            initials: initials(&agent.name),
            name: agent.name.clone(),
            email: agent.email.clone(),
            extension: agent.extension.clone(),
            status: output::agent_status(agent.status).to_string(),
            active_calls: agent.active_calls,
            total_calls: agent.total_calls,
        }
    }
}

pub fn list(desk: &CallDesk, ctx: &Context, search: &str) -> anyhow::Result<()> {
    require(desk, Route::Agents)?;

    let agents = filter_agents(desk.data().agents(), search);
    ctx.format.print(&agents, |agents| {
        if agents.is_empty() {
            return format!("No agents match \"{}\"", search);
        }
        output::table(agents.iter().map(|agent| AgentRow::from(*agent)))
    })
}

pub async fn call(
    desk: &CallDesk,
    ctx: &Context,
    id: &str,
    notes: Option<&str>,
    wait: bool,
) -> anyhow::Result<()> {
    require(desk, Route::Agents)?;

    let agent = desk
        .data()
        .agent_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("No agent with ID {}", id))?;
    if ctx.format.is_table() {
        println!("Calling {}...", agent.name);
    }

    let dialer = desk.dialer(ctx.api_url.as_deref())?;
    let placed = dialer.call_agent(agent, notes).await?;
    report_placed(desk, ctx, &dialer, placed, wait).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use calldesk_core::session::{self, Credentials};

    #[tokio::test]
    async fn test_call_unknown_agent_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut desk = CallDesk::open(dir.path()).unwrap();
        session::login(desk.store_mut(), &Credentials::new("admin", "admin123")).unwrap();
        let ctx = Context {
            api_url: None,
            format: OutputFormat::Json,
        };

        let err = call(&desk, &ctx, "99", None, false).await.unwrap_err();
        assert_eq!(err.to_string(), "No agent with ID 99");
    }
}
