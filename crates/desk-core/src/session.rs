//! Dashboard login state
//!
//! Login is a hard-coded credential check that sets a flag in the local
//! store. It gates navigation on this machine only and is not a security
//! boundary.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use crate::error::{CallDeskError, Result};
use crate::storage::{LocalStore, keys};

const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "admin123";

/// Login form
#[derive(Debug, Clone, Validate)]
pub struct Credentials {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Signed-in user as persisted under the `user` key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub role: String,
}

/// Validate the form, check the fixed admin account and set the session flag
pub fn login(store: &mut LocalStore, credentials: &Credentials) -> Result<UserProfile> {
    credentials.validate()?;

    if credentials.username != ADMIN_USERNAME || credentials.password != ADMIN_PASSWORD {
        warn!("Rejected login for {}", credentials.username);
        return Err(CallDeskError::authentication("Invalid username or password"));
    }

    let profile = UserProfile {
        username: credentials.username.clone(),
        role: "admin".to_string(),
    };
    store.set_item(keys::IS_AUTHENTICATED, "true")?;
    store.set_json(keys::USER, &profile)?;

    info!("🔑 Login successful for {}", profile.username);
    Ok(profile)
}

pub fn logout(store: &mut LocalStore) -> Result<()> {
    store.remove_item(keys::IS_AUTHENTICATED)?;
    store.remove_item(keys::USER)?;
    info!("Logged out");
    Ok(())
}

pub fn is_authenticated(store: &LocalStore) -> bool {
    store.get_item(keys::IS_AUTHENTICATED) == Some("true")
}

/// Profile of the signed-in user, if any
pub fn current_user(store: &LocalStore) -> Option<UserProfile> {
    if !is_authenticated(store) {
        return None;
    }
    match store.get_json(keys::USER) {
        Ok(profile) => profile,
        Err(e) => {
            warn!("Error loading signed-in user, ignoring it: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open_in(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_login_and_logout() {
        let (_dir, mut store) = store();
        assert!(!is_authenticated(&store));

        let profile = login(&mut store, &Credentials::new("admin", "admin123")).unwrap();
        assert_eq!(profile.role, "admin");
        assert!(is_authenticated(&store));
        assert_eq!(current_user(&store), Some(profile));

        logout(&mut store).unwrap();
        assert!(!is_authenticated(&store));
        assert!(current_user(&store).is_none());
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let (_dir, mut store) = store();
        let err = login(&mut store, &Credentials::new("admin", "wrong-pass")).unwrap_err();
        assert!(matches!(err, CallDeskError::Authentication(_)));
        assert!(!is_authenticated(&store));
    }

    #[test]
    fn test_form_validation_runs_first() {
        let (_dir, mut store) = store();
        let err = login(&mut store, &Credentials::new("ad", "123")).unwrap_err();
        match err {
            CallDeskError::Validation(msg) => {
                assert!(msg.contains("Username must be at least 3 characters"));
                assert!(msg.contains("Password must be at least 6 characters"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_user_blob_reads_as_no_user() {
        let (_dir, mut store) = store();
        store.set_item(keys::IS_AUTHENTICATED, "true").unwrap();
        store.set_item(keys::USER, "{not json").unwrap();

        assert!(is_authenticated(&store));
        assert_eq!(current_user(&store), None);
    }
}
