//! Process-wide session store shared by every page.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{
    domain::{PlanStatus, Season},
    protocol::{PlannedCrop, Preferences, UserProfile},
};
use tokio::sync::watch;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Session {
    pub is_authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authenticated_at: Option<DateTime<Utc>>,
    /// Crops added from the recommendation page during this session.
    pub crop_plan: Vec<PlannedCrop>,
    pub preferences: Preferences,
}

/// Single owner of the session value. Clones share the same underlying channel,
/// so a change made through one handle is observed by all of them.
#[derive(Debug, Clone)]
pub struct SessionStore {
    tx: watch::Sender<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Session::default());
        Self { tx }
    }

    pub fn current(&self) -> Session {
        self.tx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_authenticated
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.tx.borrow().user.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    /// Marks the session authenticated for `user`. Returns the new session id.
    pub fn authenticate(&self, user: UserProfile) -> Uuid {
        let session_id = Uuid::new_v4();
        self.tx.send_modify(|session| {
            session.is_authenticated = true;
            session.session_id = Some(session_id);
            if let Some(language) = user.language {
                session.preferences.language = language;
            }
            session.user = Some(user);
            session.authenticated_at = Some(Utc::now());
        });
        session_id
    }

    pub fn logout(&self) {
        self.tx.send_modify(|session| {
            session.is_authenticated = false;
            session.session_id = None;
            session.user = None;
            session.authenticated_at = None;
        });
    }

    /// Returns `false` when the crop is already planned.
    pub fn add_to_crop_plan(&self, name: &str, season: Season) -> bool {
        self.tx.send_if_modified(|session| {
            if session
                .crop_plan
                .iter()
                .any(|planned| planned.name.eq_ignore_ascii_case(name))
            {
                return false;
            }
            session.crop_plan.push(PlannedCrop {
                name: name.to_string(),
                season,
                status: PlanStatus::Planned,
            });
            true
        })
    }

    pub fn update_preferences(&self, update: impl FnOnce(&mut Preferences)) {
        self.tx.send_modify(|session| update(&mut session.preferences));
    }

    /// Drops everything, returning the store to its start-up value.
    pub fn reset(&self) {
        self.tx.send_replace(Session::default());
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
