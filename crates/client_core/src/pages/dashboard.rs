use serde::Serialize;
use shared::domain::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureCard {
    pub title: &'static str,
    pub description: &'static str,
    pub target: Page,
}

// Alerts has no page of its own and routes to the landing page.
pub const FEATURE_CARDS: [FeatureCard; 6] = [
    FeatureCard {
        title: "Crop Recommendation",
        description: "Get personalized crop suggestions based on your soil type, region, and season.",
        target: Page::CropAdvisory,
    },
    FeatureCard {
        title: "Pest & Disease Detection",
        description: "Upload images to identify pests and diseases with organic remedies.",
        target: Page::PestDetection,
    },
    FeatureCard {
        title: "Weather Updates",
        description: "7-day weather forecast with live alerts for your region.",
        target: Page::WeatherMarket,
    },
    FeatureCard {
        title: "Market Prices",
        description: "Real-time market prices for crops in your area.",
        target: Page::WeatherMarket,
    },
    FeatureCard {
        title: "Alerts",
        description: "Important notifications about floods, pest outbreaks, and advisories.",
        target: Page::Landing,
    },
    FeatureCard {
        title: "Personalized Advisory",
        description: "Chat with our AI assistant for instant farming advice.",
        target: Page::Advisory,
    },
];

pub fn feature_card(title: &str) -> Option<&'static FeatureCard> {
    FEATURE_CARDS
        .iter()
        .find(|card| card.title.eq_ignore_ascii_case(title.trim()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    pub greeting: String,
    pub features: Vec<FeatureCard>,
}

pub fn snapshot(display_name: Option<&str>) -> DashboardSnapshot {
    DashboardSnapshot {
        greeting: format!("Welcome, {}! 🌱", display_name.unwrap_or("Farmer")),
        features: FEATURE_CARDS.to_vec(),
    }
}
