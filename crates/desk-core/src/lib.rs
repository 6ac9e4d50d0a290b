//! # CallDesk Core
//!
//! Data layer and service plumbing for the CallDesk call-center dashboard.
//!
//! ## Features
//!
//! - **Call History**: typed call records with search, status/direction
//!   filters and newest-first ordering
//! - **Agent Roster**: static roster with search
//! - **Dashboard Metrics**: headline counters, recent calls, hourly volume
//! - **Mock Services**: queue snapshot, agent presence, call reports
//! - **Telephony Client**: best-effort Twilio proxy client with mock fallback
//! - **Dialer**: place outbound calls and poll until they settle
//! - **Local Store**: JSON key/value file for provider config and session flag
//! - **Settings**: validated TOML settings file
//!
//! ## Architecture
//!
//! - [`models`]: record types
//! - [`data`]: the static mock store
//! - [`filter`] and [`format`]: pure filtering and display helpers
//! - [`services`]: the [`services::DeskBackend`] seam and its mock
//! - [`telephony`]: the [`telephony::TelephonyProvider`] seam and HTTP client
//! - [`dialer`]: the dial flow and status polling
//! - [`storage`], [`session`], [`routes`], [`settings`]: local state
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use calldesk_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let home = calldesk_core::storage::default_home()?;
//!     let desk = CallDesk::open(&home)?;
//!
//!     let filter = CallFilter::default().with_status(Selector::Only(CallStatus::Ended));
//!     for call in filter_calls(desk.data().calls(), &filter) {
//!         println!("{} {}", call.caller, format_duration(call.duration));
//!     }
//!
//!     let queue = desk.backend().queue_status().await?;
//!     println!("{} callers waiting", queue.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;

pub mod models;
pub mod data;
pub mod filter;
pub mod format;
pub mod dashboard;

pub mod services;
pub mod telephony;
pub mod dialer;

pub mod storage;
pub mod session;
pub mod routes;
pub mod settings;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

pub use error::{CallDeskError, Result};

use data::MockDataStore;
use dialer::Dialer;
use routes::{Navigator, Route};
use services::{DeskBackend, MockDeskBackend};
use settings::DeskSettings;
use storage::LocalStore;
use telephony::{TelephonyProvider, TwilioClient, TwilioConfig};

/// Everything a dashboard session needs, opened from one home directory
pub struct CallDesk {
    home: PathBuf,
    settings: DeskSettings,
    store: LocalStore,
    data: MockDataStore,
    backend: Arc<dyn DeskBackend>,
}

impl CallDesk {
    /// Load settings and the local store from `home` and seed the mock data
    pub fn open(home: &Path) -> Result<Self> {
        let settings = DeskSettings::load(home)?;
        let store = LocalStore::open_in(home)?;
        let backend = Arc::new(MockDeskBackend::new(settings.services.mock_latency()));
        debug!("Opened CallDesk home at {}", home.display());

        Ok(Self {
            home: home.to_path_buf(),
            settings,
            store,
            data: MockDataStore::seeded(Utc::now()),
            backend,
        })
    }

    /// Replace the backend, e.g. with a zero-latency mock
    pub fn with_backend(mut self, backend: Arc<dyn DeskBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn settings(&self) -> &DeskSettings {
        &self.settings
    }

    /// Validate and persist new settings
    pub fn update_settings(&mut self, settings: DeskSettings) -> Result<()> {
        settings.save(&self.home)?;
        self.settings = settings;
        Ok(())
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LocalStore {
        &mut self.store
    }

    pub fn data(&self) -> &MockDataStore {
        &self.data
    }

    pub fn backend(&self) -> &Arc<dyn DeskBackend> {
        &self.backend
    }

    pub fn twilio_config(&self) -> TwilioConfig {
        TwilioConfig::load(&self.store)
    }

    /// Route actually shown for `path` under the current session
    pub fn navigate(&self, path: &str) -> Route {
        Navigator::new(&self.store).resolve(path)
    }

    /// Telephony client for the configured URL, or `base_url` when given
    pub fn telephony(&self, base_url: Option<&str>) -> Result<Arc<dyn TelephonyProvider>> {
        let url = base_url.unwrap_or(&self.settings.services.telephony_url);
        Ok(Arc::new(TwilioClient::new(url, self.twilio_config())?))
    }

    pub fn dialer(&self, base_url: Option<&str>) -> Result<Dialer> {
        Ok(Dialer::new(self.telephony(base_url)?, self.backend.clone()))
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{CallDesk, CallDeskError, Result};

    pub use crate::models::{
        Agent, AgentStatus, AgentStatusData, Call, CallDirection, CallMetrics, CallReport,
        CallStatus, QueueItem, QueuePriority,
    };
    pub use crate::data::MockDataStore;
    pub use crate::filter::{CallFilter, Selector, filter_agents, filter_calls, rank_queue, recent_calls};
    pub use crate::format::{format_duration, format_timestamp};
    pub use crate::dashboard::DashboardSummary;

    pub use crate::services::{DeskBackend, MockDeskBackend};
    pub use crate::telephony::{ProviderStatus, TelephonyProvider, TwilioClient, TwilioConfig};
    pub use crate::dialer::{CallPhase, Dialer, PollOutcome, PollPolicy};

    pub use crate::storage::LocalStore;
    pub use crate::session::Credentials;
    pub use crate::routes::Route;
    pub use crate::settings::DeskSettings;
}
