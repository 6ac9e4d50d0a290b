use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use crate::dialer::PollPolicy;
use crate::error::Result;
use crate::telephony::DEFAULT_BASE_URL;

const SETTINGS_FILE: &str = "config.toml";

/// Dashboard settings, one section per settings tab
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DeskSettings {
    #[validate(nested)]
    pub general: GeneralSettings,

    #[validate(nested)]
    pub database: DatabaseSettings,

    pub notifications: NotificationSettings,

    #[validate(nested)]
    pub services: ServiceSettings,
}

/// General tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GeneralSettings {
    #[validate(length(min = 2, message = "Company name must be at least 2 characters."))]
    pub company_name: String,

    #[validate(email(message = "Please enter a valid email address."))]
    pub admin_email: String,

    pub support_phone: Option<String>,

    pub welcome_message: Option<String>,
}

/// Database tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DatabaseSettings {
    #[validate(length(min = 1, message = "Host is required"))]
    pub host: String,

    #[validate(length(min = 1, message = "Port is required"))]
    pub port: String,

    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(length(min = 1, message = "Database name is required"))]
    pub database: String,
}

/// Notifications tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub desktop_notifications: bool,
    pub missed_call_alerts: bool,
    pub system_updates: bool,
}

/// Service endpoints and timings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServiceSettings {
    #[validate(url(message = "Telephony URL must be a valid URL"))]
    pub telephony_url: String,

    /// Artificial delay of the mock backend (milliseconds)
    pub mock_latency_ms: u64,

    #[validate(range(min = 1, message = "Poll interval must be at least 1 second"))]
    pub poll_interval_secs: u64,

    #[validate(range(min = 1, message = "Poll window must be at least 1 second"))]
    pub poll_window_secs: u64,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            company_name: "Call Control Systems".to_string(),
            admin_email: "admin@example.com".to_string(),
            support_phone: Some("+1 (555) 123-4567".to_string()),
            welcome_message: Some("Thank you for calling. Your call is important to us.".to_string()),
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: "3306".to_string(),
            username: "callsystem".to_string(),
            password: "changeme".to_string(),
            database: "call_control_db".to_string(),
        }
    }
}

impl DatabaseSettings {
    /// Copy with the password hidden, for display
    pub fn masked(&self) -> Self {
        Self {
            password: "•".repeat(8),
            ..self.clone()
        }
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            sms_notifications: false,
            desktop_notifications: true,
            missed_call_alerts: true,
            system_updates: true,
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            telephony_url: DEFAULT_BASE_URL.to_string(),
            mock_latency_ms: 250,
            poll_interval_secs: 5,
            poll_window_secs: 120,
        }
    }
}

impl ServiceSettings {
    pub fn mock_latency(&self) -> Duration {
        Duration::from_millis(self.mock_latency_ms)
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_secs(self.poll_interval_secs),
            window: Duration::from_secs(self.poll_window_secs),
        }
    }
}

impl DeskSettings {
    /// Settings file path inside `home`
    pub fn path_in(home: &Path) -> PathBuf {
        home.join(SETTINGS_FILE)
    }

    /// Load from `home`, falling back to defaults when the file is missing
    pub fn load(home: &Path) -> Result<Self> {
        let path = Self::path_in(home);
        if !path.exists() {
            debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let settings: DeskSettings = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate every section and write the file
    pub fn save(&self, home: &Path) -> Result<()> {
        self.validate()?;

        fs::create_dir_all(home)?;
        let content = toml::to_string_pretty(self)?;
        fs::write(Self::path_in(home), content)?;
        info!("💾 Settings saved to {}", home.display());
        Ok(())
    }

    /// Copy safe to print
    pub fn redacted(&self) -> Self {
        Self {
            database: self.database.masked(),
            ..self.clone()
        }
    }
}
