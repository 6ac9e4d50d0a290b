//! Navigation surface
//!
//! Four top-level views plus the login page and a catch-all. Every view
//! except login requires the session flag; without it navigation lands on
//! the login page instead.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::session;
use crate::storage::LocalStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Dashboard,
    Calls,
    Agents,
    Settings,
    Login,
    NotFound,
}

impl Route {
    /// Sidebar entries, in display order
    pub const MENU: [Route; 4] = [Route::Dashboard, Route::Calls, Route::Agents, Route::Settings];

    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" if trimmed.starts_with('/') => "/",
            other => other,
        };

        match normalized {
            "/" => Route::Dashboard,
            "/calls" => Route::Calls,
            "/agents" => Route::Agents,
            "/settings" => Route::Settings,
            "/login" => Route::Login,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::Calls => "/calls",
            Route::Agents => "/agents",
            Route::Settings => "/settings",
            Route::Login => "/login",
            Route::NotFound => "*",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Calls => "Calls",
            Route::Agents => "Agents",
            Route::Settings => "Settings",
            Route::Login => "Login",
            Route::NotFound => "Not Found",
        }
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login | Route::NotFound)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Resolves paths against the current session flag
pub struct Navigator<'a> {
    store: &'a LocalStore,
}

impl<'a> Navigator<'a> {
    pub fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    /// Route that will actually be shown for `path`
    pub fn resolve(&self, path: &str) -> Route {
        self.gate(Route::from_path(path))
    }

    pub fn gate(&self, route: Route) -> Route {
        if route.requires_auth() && !session::is_authenticated(self.store) {
            debug!("Redirecting {} to login", route.path());
            return Route::Login;
        }
        route
    }
}
