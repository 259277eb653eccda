use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseError;

/// Declares a closed set of selectable options with a wire value and a display label.
macro_rules! option_enum {
    ($name:ident, $kind:literal, { $($variant:ident => ($value:literal, $label:literal)),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn value(self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let trimmed = raw.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|option| {
                        option.value().eq_ignore_ascii_case(trimmed)
                            || option.label().eq_ignore_ascii_case(trimmed)
                    })
                    .ok_or_else(|| ParseError::UnknownOption {
                        kind: $kind,
                        value: raw.to_string(),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.value())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

option_enum!(SoilType, "soil type", {
    Clay => ("clay", "Clay"),
    Loamy => ("loamy", "Loamy"),
    Sandy => ("sandy", "Sandy"),
    Silt => ("silt", "Silt"),
});

option_enum!(Region, "region", {
    North => ("north", "North"),
    South => ("south", "South"),
    East => ("east", "East"),
    West => ("west", "West"),
});

option_enum!(Season, "season", {
    Kharif => ("kharif", "Kharif"),
    Rabi => ("rabi", "Rabi"),
    Zaid => ("zaid", "Zaid"),
});

option_enum!(HomeState, "state", {
    Punjab => ("punjab", "Punjab"),
    Haryana => ("haryana", "Haryana"),
    UttarPradesh => ("up", "Uttar Pradesh"),
    MadhyaPradesh => ("mp", "Madhya Pradesh"),
    Maharashtra => ("maharashtra", "Maharashtra"),
    Karnataka => ("karnataka", "Karnataka"),
    TamilNadu => ("tamilnadu", "Tamil Nadu"),
    Other => ("other", "Other"),
});

option_enum!(Language, "language", {
    English => ("en", "English"),
    Hindi => ("hi", "हिंदी (Hindi)"),
    Punjabi => ("pa", "ਪੰਜਾਬੀ (Punjabi)"),
    Marathi => ("mr", "मराठी (Marathi)"),
    Bengali => ("bn", "বাংলা (Bengali)"),
    Tamil => ("ta", "தமிழ் (Tamil)"),
    Telugu => ("te", "తెలుగు (Telugu)"),
});

option_enum!(CropFilter, "crop filter", {
    SoilType => ("soil", "Soil Type"),
    Region => ("region", "Region"),
    Season => ("season", "Season"),
});

option_enum!(LoginField, "login field", {
    Identifier => ("identifier", "Email or Phone"),
    Password => ("password", "Password"),
});

option_enum!(SignupField, "signup field", {
    Name => ("name", "Full Name"),
    Email => ("email", "Email"),
    Phone => ("phone", "Phone Number"),
    State => ("state", "State"),
    Language => ("language", "Preferred Language"),
    Password => ("password", "Password"),
});

option_enum!(PreferenceToggle, "preference", {
    Notifications => ("notifications", "Notifications"),
    OfflineMode => ("offline", "Offline Mode"),
});

/// Every screen the router can mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Landing,
    Login,
    Dashboard,
    CropAdvisory,
    PestDetection,
    WeatherMarket,
    Forum,
    Advisory,
    Profile,
    NotFound,
}

impl Page {
    pub const ROUTED: [Page; 9] = [
        Page::Landing,
        Page::Login,
        Page::Dashboard,
        Page::CropAdvisory,
        Page::PestDetection,
        Page::WeatherMarket,
        Page::Forum,
        Page::Advisory,
        Page::Profile,
    ];

    /// Route path for this page; the catch-all page reports `*`.
    pub fn path(self) -> &'static str {
        match self {
            Page::Landing => "/",
            Page::Login => "/login",
            Page::Dashboard => "/dashboard",
            Page::CropAdvisory => "/crop-advisory",
            Page::PestDetection => "/pest-detection",
            Page::WeatherMarket => "/weather-market",
            Page::Forum => "/forum",
            Page::Advisory => "/advisory",
            Page::Profile => "/profile",
            Page::NotFound => "*",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Landing => "Smart Krishi",
            Page::Login => "Login",
            Page::Dashboard => "Dashboard",
            Page::CropAdvisory => "Crop Recommendation",
            Page::PestDetection => "Pest & Disease Detection",
            Page::WeatherMarket => "Weather & Market",
            Page::Forum => "Community Forum",
            Page::Advisory => "AI Advisory",
            Page::Profile => "My Profile",
            Page::NotFound => "Page Not Found",
        }
    }

    /// Matches a location against the route table. Query strings and fragments are
    /// ignored, a trailing slash is tolerated, and matching is case-insensitive.
    pub fn resolve(location: &str) -> Page {
        let path = normalize_path(location);
        Page::ROUTED
            .into_iter()
            .find(|page| page.path().eq_ignore_ascii_case(&path))
            .unwrap_or(Page::NotFound)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

pub fn normalize_path(location: &str) -> String {
    let path = location
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();

    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };

    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Demand {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Stable,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemedyKind {
    Organic,
    Chemical,
    Preventive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Active,
    Planned,
    Completed,
}

/// Lifecycle of a page-level operation backed by simulated latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Complete,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_every_routed_page_from_its_path() {
        for page in Page::ROUTED {
            assert_eq!(Page::resolve(page.path()), page);
        }
    }

    #[test]
    fn unknown_paths_fall_through_to_not_found() {
        assert_eq!(Page::resolve("/alerts"), Page::NotFound);
        assert_eq!(Page::resolve("/dashboard/extra"), Page::NotFound);
    }

    #[test]
    fn resolve_ignores_query_fragment_and_trailing_slash() {
        assert_eq!(Page::resolve("/forum/?tab=latest"), Page::Forum);
        assert_eq!(Page::resolve("/Advisory#chat"), Page::Advisory);
        assert_eq!(Page::resolve(""), Page::Landing);
        assert_eq!(Page::resolve("profile"), Page::Profile);
    }

    #[test]
    fn options_parse_from_value_or_label() {
        assert_eq!("loamy".parse::<SoilType>().expect("soil"), SoilType::Loamy);
        assert_eq!("Tamil Nadu".parse::<HomeState>().expect("state"), HomeState::TamilNadu);
        assert_eq!(" RABI ".parse::<Season>().expect("season"), Season::Rabi);

        let err = "monsoon".parse::<Season>().expect_err("unknown season");
        assert!(err.to_string().contains("monsoon"));
    }

    #[test]
    fn options_serialize_as_wire_values() {
        let encoded = serde_json::to_string(&HomeState::UttarPradesh).expect("encode");
        assert_eq!(encoded, "\"up\"");
        let decoded: Language = serde_json::from_str("\"pa\"").expect("decode");
        assert_eq!(decoded, Language::Punjabi);
    }
}
