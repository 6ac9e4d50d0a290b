//! Login, logout and route resolution

use serde::Serialize;

use calldesk_core::CallDesk;
use calldesk_core::routes::Route;
use calldesk_core::session::{self, Credentials};

use super::Context;
use crate::output;

pub fn login(desk: &mut CallDesk, username: &str, password: &str) -> anyhow::Result<()> {
    let profile = session::login(desk.store_mut(), &Credentials::new(username, password))?;
    println!("{}", output::success(&format!("Signed in as {} ({})", profile.username, profile.role)));
    Ok(())
}

pub fn logout(desk: &mut CallDesk) -> anyhow::Result<()> {
    session::logout(desk.store_mut())?;
    println!("{}", output::success("Signed out"));
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Resolution {
    requested: String,
    route: Route,
    path: &'static str,
    title: &'static str,
    redirected: bool,
}

pub fn open(desk: &CallDesk, path: &str, ctx: &Context) -> anyhow::Result<()> {
    let requested = Route::from_path(path);
    let route = desk.navigate(path);
    let resolution = Resolution {
        requested: path.to_string(),
        route,
        path: route.path(),
        title: route.title(),
        redirected: route != requested,
    };

    ctx.format.print(&resolution, |r| {
        let mut rows = vec![
            ("Requested", r.requested.clone()),
            ("View", format!("{} ({})", r.title, r.path)),
        ];
        if r.redirected {
            rows.push(("Note", "Not signed in, redirected to login".to_string()));
        }
        output::fields(rows)
    })
}
