//! Settings tabs

use anyhow::Context as _;
use serde::Serialize;

use calldesk_core::CallDesk;
use calldesk_core::routes::Route;
use calldesk_core::settings::DeskSettings;
use calldesk_core::telephony::TwilioConfig;

use super::{Context, require};
use crate::SettingsCommands;
use crate::output;

#[derive(Serialize)]
struct SettingsView {
    #[serde(flatten)]
    settings: DeskSettings,
    twilio: TwilioView,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TwilioView {
    account_sid: String,
    auth_token: String,
    phone_number: String,
}

impl From<&TwilioConfig> for TwilioView {
    fn from(config: &TwilioConfig) -> Self {
        Self {
            account_sid: config.account_sid.clone(),
            auth_token: config.masked_token(),
            phone_number: config.phone_number.clone(),
        }
    }
}

pub fn handle(action: SettingsCommands, desk: &mut CallDesk, ctx: &Context) -> anyhow::Result<()> {
    require(desk, Route::Settings)?;

    match action {
        SettingsCommands::Show => show(desk, ctx),
        SettingsCommands::General {
            company_name,
            admin_email,
            support_phone,
            welcome_message,
        } => {
            let mut settings = desk.settings().clone();
            let general = &mut settings.general;
            apply(&mut general.company_name, company_name);
            apply(&mut general.admin_email, admin_email);
            if support_phone.is_some() {
                general.support_phone = support_phone.filter(|p| !p.is_empty());
            }
            if welcome_message.is_some() {
                general.welcome_message = welcome_message.filter(|m| !m.is_empty());
            }
            save(desk, settings, "General settings")
        }
        SettingsCommands::Database {
            host,
            port,
            username,
            password,
            database,
        } => {
            let mut settings = desk.settings().clone();
            let db = &mut settings.database;
            apply(&mut db.host, host);
            apply(&mut db.port, port);
            apply(&mut db.username, username);
            apply(&mut db.password, password);
            apply(&mut db.database, database);
            save(desk, settings, "Database settings")
        }
        SettingsCommands::Notifications {
            email,
            sms,
            desktop,
            missed_call_alerts,
            system_updates,
        } => {
            let mut settings = desk.settings().clone();
            let n = &mut settings.notifications;
            apply(&mut n.email_notifications, email);
            apply(&mut n.sms_notifications, sms);
            apply(&mut n.desktop_notifications, desktop);
            apply(&mut n.missed_call_alerts, missed_call_alerts);
            apply(&mut n.system_updates, system_updates);
            save(desk, settings, "Notification preferences")
        }
        SettingsCommands::Twilio {
            account_sid,
            auth_token,
            phone_number,
        } => {
            let mut config = desk.twilio_config();
            apply(&mut config.account_sid, account_sid);
            apply(&mut config.auth_token, auth_token);
            apply(&mut config.phone_number, phone_number);
            config
                .save(desk.store_mut())
                .context("Failed to save Twilio configuration")?;
            println!("{}", output::success("Twilio configuration has been updated"));
            Ok(())
        }
        SettingsCommands::TestTwilio => {
            let check = desk.twilio_config().test_configuration();
            ctx.format.print(&check, |c| {
                if c.success {
                    output::success(&c.message)
                } else {
                    output::failure(&c.message)
                }
            })
        }
    }
}

fn apply<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

fn save(desk: &mut CallDesk, settings: DeskSettings, what: &str) -> anyhow::Result<()> {
    desk.update_settings(settings)
        .with_context(|| format!("{} were not saved", what))?;
    println!("{}", output::success(&format!("{} have been updated", what)));
    Ok(())
}

fn show(desk: &CallDesk, ctx: &Context) -> anyhow::Result<()> {
    let view = SettingsView {
        settings: desk.settings().redacted(),
        twilio: TwilioView::from(&desk.twilio_config()),
    };

    ctx.format.print(&view, |v| {
        let s = &v.settings;
        let yes_no = |b: bool| (if b { "on" } else { "off" }).to_string();
        let optional = |o: &Option<String>| o.clone().unwrap_or_default();

        let sections = [
            (
                "General",
                output::fields([
                    ("Company Name", s.general.company_name.clone()),
                    ("Admin Email", s.general.admin_email.clone()),
                    ("Support Phone", optional(&s.general.support_phone)),
                    ("Welcome Message", optional(&s.general.welcome_message)),
                ]),
            ),
            (
                "Database",
                output::fields([
                    ("Host", s.database.host.clone()),
                    ("Port", s.database.port.clone()),
                    ("Username", s.database.username.clone()),
                    ("Password", s.database.password.clone()),
                    ("Database", s.database.database.clone()),
                ]),
            ),
            (
                "Notifications",
                output::fields([
                    ("Email", yes_no(s.notifications.email_notifications)),
                    ("SMS", yes_no(s.notifications.sms_notifications)),
                    ("Desktop", yes_no(s.notifications.desktop_notifications)),
                    ("Missed Call Alerts", yes_no(s.notifications.missed_call_alerts)),
                    ("System Updates", yes_no(s.notifications.system_updates)),
                ]),
            ),
            (
                "Services",
                output::fields([
                    ("Telephony URL", s.services.telephony_url.clone()),
                    ("Mock Latency", format!("{} ms", s.services.mock_latency_ms)),
                    ("Poll Interval", format!("{} s", s.services.poll_interval_secs)),
                    ("Poll Window", format!("{} s", s.services.poll_window_secs)),
                ]),
            ),
            (
                "Twilio",
                output::fields([
                    ("Account SID", v.twilio.account_sid.clone()),
                    ("Auth Token", v.twilio.auth_token.clone()),
                    ("Phone Number", v.twilio.phone_number.clone()),
                ]),
            ),
        ];

        sections
            .iter()
            .map(|(title, table)| format!("{}\n{}", output::heading(title), table))
            .collect::<Vec<_>>()
            .join("\n\n")
    })
}
