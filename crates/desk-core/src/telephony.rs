//! # Telephony Provider Client
//!
//! Thin wrapper over the backend's Twilio proxy endpoints:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | initiate  | `POST /api/twilio/call` with `{to, from, notes}` |
//! | end       | `POST /api/twilio/call/end` with `{callSid}` |
//! | status    | `GET /api/twilio/call/{sid}` |
//!
//! Every call is a single best-effort request. Transport failures, non-2xx
//! responses and undecodable bodies are logged and replaced with a mock
//! response, so these operations never surface an error. Account
//! credentials stay in the local store and are never sent.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CallDeskError, Result};
use crate::storage::{LocalStore, keys};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Provider account settings kept in the local store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub phone_number: String,
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: "AC123456789".to_string(),
            auth_token: "your_auth_token".to_string(),
            phone_number: "+15551234567".to_string(),
        }
    }
}

impl TwilioConfig {
    /// Stored configuration, or the placeholders when absent or unreadable
    pub fn load(store: &LocalStore) -> Self {
        match store.get_json::<TwilioConfig>(keys::TWILIO_CONFIG) {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("Error loading Twilio config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Persist after checking every field is non-empty
    pub fn save(&self, store: &mut LocalStore) -> Result<()> {
        for (field, value) in [
            ("accountSid", &self.account_sid),
            ("authToken", &self.auth_token),
            ("phoneNumber", &self.phone_number),
        ] {
            if value.trim().is_empty() {
                return Err(CallDeskError::validation(format!("{} is required", field)));
            }
        }
        store.set_json(keys::TWILIO_CONFIG, self)?;
        info!("Saved Twilio configuration for {}", self.phone_number);
        Ok(())
    }

    /// Presence check only; real validation would need the provider API
    pub fn test_configuration(&self) -> ConfigCheck {
        let filled = |v: &str| v.len() > 5;
        let success = filled(&self.account_sid) && filled(&self.auth_token) && filled(&self.phone_number);

        ConfigCheck {
            success,
            message: if success {
                "Twilio configuration appears valid".to_string()
            } else {
                "Twilio is not properly configured".to_string()
            },
        }
    }

    /// Token with all but the last four characters hidden
    pub fn masked_token(&self) -> String {
        let visible: String = self
            .auth_token
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("{}{}", "•".repeat(self.auth_token.chars().count().saturating_sub(4)), visible)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigCheck {
    pub success: bool,
    pub message: String,
}

/// Call progress as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderStatus {
    Queued,
    Ringing,
    InProgress,
    Completed,
    Busy,
    Failed,
    NoAnswer,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl ProviderStatus {
    /// No further transitions will be reported
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProviderStatus::Completed
                | ProviderStatus::Busy
                | ProviderStatus::Failed
                | ProviderStatus::NoAnswer
                | ProviderStatus::Canceled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderStatus::Queued => "queued",
            ProviderStatus::Ringing => "ringing",
            ProviderStatus::InProgress => "in-progress",
            ProviderStatus::Completed => "completed",
            ProviderStatus::Busy => "busy",
            ProviderStatus::Failed => "failed",
            ProviderStatus::NoAnswer => "no-answer",
            ProviderStatus::Canceled => "canceled",
            ProviderStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallInitiation {
    pub success: bool,
    #[serde(default)]
    pub call_id: Option<String>,
    #[serde(default)]
    pub sid: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndCallResult {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallStatusReport {
    pub success: bool,
    pub status: ProviderStatus,
    /// Seconds
    #[serde(default)]
    pub duration: Option<u32>,
}

#[derive(Serialize)]
struct InitiateCallBody<'a> {
    to: &'a str,
    from: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EndCallBody<'a> {
    call_sid: &'a str,
}

/// Operations against the telephony provider
#[async_trait]
pub trait TelephonyProvider: Send + Sync {
    async fn initiate_call(&self, to: &str, notes: Option<&str>) -> CallInitiation;

    async fn end_call(&self, call_sid: &str) -> EndCallResult;

    async fn call_status(&self, call_sid: &str) -> CallStatusReport;
}

/// HTTP client for the backend's Twilio proxy
#[derive(Debug, Clone)]
pub struct TwilioClient {
    http: reqwest::Client,
    base_url: String,
    config: TwilioConfig,
}

impl TwilioClient {
    pub fn new(base_url: impl Into<String>, config: TwilioConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            config,
        })
    }

    pub fn config(&self) -> &TwilioConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let response = response.error_for_status()?;
        Ok(response.json::<T>().await?)
    }

    async fn try_initiate(&self, to: &str, notes: Option<&str>) -> Result<CallInitiation> {
        let body = InitiateCallBody {
            to,
            from: &self.config.phone_number,
            notes,
        };
        let response = self.http.post(self.url("/api/twilio/call")).json(&body).send().await?;
        Self::decode(response).await
    }

    async fn try_end(&self, call_sid: &str) -> Result<EndCallResult> {
        let response = self
            .http
            .post(self.url("/api/twilio/call/end"))
            .json(&EndCallBody { call_sid })
            .send()
            .await?;
        Self::decode(response).await
    }

    /// `/api/twilio/call/{sid}` with the SID escaped as a single path segment
    fn status_url(&self, call_sid: &str) -> Result<reqwest::Url> {
        let sid = call_sid.trim();
        if sid.is_empty() || sid == "." || sid == ".." {
            return Err(CallDeskError::validation(format!("Invalid call SID: {:?}", call_sid)));
        }

        let mut url = reqwest::Url::parse(&self.url("/api/twilio/call"))
            .map_err(|e| CallDeskError::config(format!("Invalid telephony URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| CallDeskError::config(format!("Telephony URL cannot be a base: {}", self.base_url)))?
            .push(sid);
        Ok(url)
    }

    async fn try_status(&self, call_sid: &str) -> Result<CallStatusReport> {
        let url = self.status_url(call_sid)?;
        let response = self.http.get(url).send().await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl TelephonyProvider for TwilioClient {
    async fn initiate_call(&self, to: &str, notes: Option<&str>) -> CallInitiation {
        info!("📞 Initiating Twilio call to {}", to);
        debug!("Call notes: {:?}", notes);

        match self.try_initiate(to, notes).await {
            Ok(initiation) => initiation,
            Err(e) => {
                warn!("Error making Twilio call, using mock response: {}", e);
                mock_initiation()
            }
        }
    }

    async fn end_call(&self, call_sid: &str) -> EndCallResult {
        info!("📴 Ending Twilio call with SID: {}", call_sid);

        match self.try_end(call_sid).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Error ending Twilio call, using mock response: {}", e);
                EndCallResult {
                    success: true,
                    message: Some("Call ended successfully".to_string()),
                }
            }
        }
    }

    async fn call_status(&self, call_sid: &str) -> CallStatusReport {
        debug!("Getting Twilio call status for SID: {}", call_sid);

        match self.try_status(call_sid).await {
            Ok(report) => report,
            Err(e) => {
                warn!("Error getting Twilio call status, using mock response: {}", e);
                mock_status()
            }
        }
    }
}

fn mock_initiation() -> CallInitiation {
    let mut rng = rand::thread_rng();
    let call_id = format!("twilio-{}", rng.gen_range(0..1_000_000));
    let sid = format!("CA{}", random_base36(&mut rng, 13));

    CallInitiation {
        success: true,
        call_id: Some(call_id),
        sid: Some(sid),
        timestamp: Some(Utc::now()),
    }
}

fn mock_status() -> CallStatusReport {
    CallStatusReport {
        success: true,
        status: ProviderStatus::InProgress,
        duration: Some(rand::thread_rng().gen_range(0..300)),
    }
}

fn random_base36<R: Rng>(rng: &mut R, len: usize) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
