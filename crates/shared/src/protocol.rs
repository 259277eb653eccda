use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        ChatRole, CropFilter, Demand, HomeState, Language, LoginField, Page, PlanStatus,
        PreferenceToggle, Region, RemedyKind, Season, SignupField, SoilType, Trend,
    },
    error::ViewError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub role: ChatRole,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            sent_at: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            sent_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub state: HomeState,
    pub language: Language,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub display_name: String,
    pub contact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<HomeState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

impl UserProfile {
    /// Two-letter avatar fallback, e.g. "RK" for "Rajesh Kumar".
    pub fn initials(&self) -> String {
        initials_of(&self.display_name)
    }
}

pub fn initials_of(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect();

    if initials.is_empty() {
        "U".to_string()
    } else {
        initials
    }
}

/// An image picked through the file input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFile {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remedy {
    pub kind: RemedyKind,
    pub title: String,
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub label: String,
    pub description: String,
    pub remedies: Vec<Remedy>,
}

impl DetectionReport {
    pub fn remedies_of(&self, kind: RemedyKind) -> impl Iterator<Item = &Remedy> {
        self.remedies.iter().filter(move |remedy| remedy.kind == kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropQuery {
    pub soil: SoilType,
    pub region: Region,
    pub season: Season,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRecommendation {
    pub name: String,
    pub icon: String,
    pub expected_yield: String,
    pub demand: Demand,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherDay {
    pub day: String,
    pub temperature_c: i16,
    pub condition: String,
    pub humidity_pct: u8,
    pub wind_kmh: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPrice {
    pub crop: String,
    pub price_inr: u32,
    pub change_pct: f64,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumPost {
    pub author: String,
    pub posted_at: DateTime<Utc>,
    pub content: String,
    pub likes: u32,
    pub comments: u32,
    #[serde(default)]
    pub liked: bool,
}

impl ForumPost {
    pub fn initials(&self) -> String {
        initials_of(&self.author)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedCrop {
    pub name: String,
    pub season: Season,
    pub status: PlanStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryRecord {
    pub topic: String,
    pub category: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub language: Language,
    pub notifications: bool,
    pub offline_mode: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: Language::English,
            notifications: true,
            offline_mode: false,
        }
    }
}

impl Preferences {
    pub fn set(&mut self, toggle: PreferenceToggle, enabled: bool) {
        match toggle {
            PreferenceToggle::Notifications => self.notifications = enabled,
            PreferenceToggle::OfflineMode => self.offline_mode = enabled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastTone {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub tone: ToastTone,
}

impl Toast {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            tone: ToastTone::Success,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            tone: ToastTone::Error,
        }
    }
}

/// Discrete user action a front end can hand to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum UserAction {
    Navigate {
        path: String,
    },
    SetLoginField {
        field: LoginField,
        value: String,
    },
    SubmitLogin,
    SetSignupField {
        field: SignupField,
        value: String,
    },
    SubmitSignup,
    Logout,
    SetChatDraft {
        text: String,
    },
    SendChatMessage {
        text: String,
    },
    SelectQuickAction {
        prompt: String,
    },
    UploadImage {
        file: ImageFile,
    },
    RemoveImage,
    SetFilter {
        field: CropFilter,
        value: String,
    },
    RequestRecommendations,
    AddToCropPlan {
        crop: String,
    },
    SetPostDraft {
        text: String,
    },
    PublishPost,
    LikePost {
        index: usize,
    },
    OpenFeature {
        title: String,
    },
    SetPreference {
        toggle: PreferenceToggle,
        enabled: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ViewEvent {
    Navigated {
        from: Page,
        to: Page,
        path: String,
    },
    SessionChanged {
        authenticated: bool,
    },
    Toast(Toast),
    TranscriptAppended {
        entry: ChatEntry,
    },
    PreviewReady {
        file_name: String,
    },
    DetectionReady {
        report: DetectionReport,
    },
    RecommendationsReady {
        count: usize,
    },
    PageUpdated {
        page: Page,
    },
    Error(ViewError),
}

/// Relative age label in the style the forum shows ("2 hours ago").
pub fn age_label(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);
    let (amount, unit) = if elapsed.num_days() >= 7 {
        (elapsed.num_weeks(), "week")
    } else if elapsed.num_days() >= 1 {
        (elapsed.num_days(), "day")
    } else if elapsed.num_hours() >= 1 {
        (elapsed.num_hours(), "hour")
    } else if elapsed.num_minutes() >= 1 {
        (elapsed.num_minutes(), "minute")
    } else {
        return "just now".to_string();
    };

    let plural = if amount == 1 { "" } else { "s" };
    format!("{amount} {unit}{plural} ago")
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn initials_take_first_two_words() {
        assert_eq!(initials_of("Rajesh Kumar"), "RK");
        assert_eq!(initials_of("priya"), "P");
        assert_eq!(initials_of("   "), "U");
    }

    #[test]
    fn age_label_picks_largest_unit() {
        let now = Utc::now();
        assert_eq!(age_label(now, now), "just now");
        assert_eq!(age_label(now - Duration::hours(2), now), "2 hours ago");
        assert_eq!(age_label(now - Duration::days(1), now), "1 day ago");
        assert_eq!(age_label(now - Duration::weeks(2), now), "2 weeks ago");
    }

    #[test]
    fn user_action_uses_tagged_json() {
        let action = UserAction::SetFilter {
            field: CropFilter::SoilType,
            value: "clay".into(),
        };
        let encoded = serde_json::to_value(&action).expect("encode");
        assert_eq!(encoded["type"], "set_filter");
        assert_eq!(encoded["payload"]["field"], "soil");

        let decoded: UserAction =
            serde_json::from_str(r#"{"type":"navigate","payload":{"path":"/forum"}}"#)
                .expect("decode");
        assert_eq!(
            decoded,
            UserAction::Navigate {
                path: "/forum".into()
            }
        );
    }
}
