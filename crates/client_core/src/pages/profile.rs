use serde::Serialize;
use shared::protocol::{AdvisoryRecord, PlannedCrop, Preferences, UserProfile};

use crate::session::Session;

#[derive(Debug, Clone)]
pub struct ProfilePage {
    pub profile: UserProfile,
    pub location: String,
    pub seeded_crops: Vec<PlannedCrop>,
    pub recent_advisories: Vec<AdvisoryRecord>,
}

impl ProfilePage {
    /// The crop plan and preferences come from the session so edits made on
    /// other pages show up here.
    pub fn snapshot(&self, session: &Session) -> ProfileSnapshot {
        ProfileSnapshot {
            initials: self.profile.initials(),
            profile: self.profile.clone(),
            location: self.location.clone(),
            crop_plan: merge_crop_plan(&self.seeded_crops, &session.crop_plan),
            recent_advisories: self.recent_advisories.clone(),
            preferences: session.preferences,
        }
    }
}

/// Seeded entries first, then crops added this session that are not already listed.
pub fn merge_crop_plan(seeded: &[PlannedCrop], added: &[PlannedCrop]) -> Vec<PlannedCrop> {
    let mut plan = seeded.to_vec();
    for crop in added {
        if !plan
            .iter()
            .any(|existing| existing.name.eq_ignore_ascii_case(&crop.name))
        {
            plan.push(crop.clone());
        }
    }
    plan
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSnapshot {
    pub profile: UserProfile,
    pub initials: String,
    pub location: String,
    pub crop_plan: Vec<PlannedCrop>,
    pub recent_advisories: Vec<AdvisoryRecord>,
    pub preferences: Preferences,
}
