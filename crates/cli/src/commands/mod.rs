//! CLI Commands

pub mod agents;
pub mod calls;
pub mod dashboard;
pub mod services;
pub mod session;
pub mod settings;

use anyhow::bail;

use calldesk_core::CallDesk;
use calldesk_core::routes::Route;

use crate::output::OutputFormat;

/// Per-invocation options shared by every command
pub struct Context {
    pub api_url: Option<String>,
    pub format: OutputFormat,
}

/// Refuse to render `route` when the session gate sends it to the login view
pub fn require(desk: &CallDesk, route: Route) -> anyhow::Result<()> {
    if desk.navigate(route.path()) == Route::Login && route != Route::Login {
        bail!(
            "{} requires a signed-in session; run `calldesk login` first",
            route.title()
        );
    }
    Ok(())
}
