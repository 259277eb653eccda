use async_trait::async_trait;
use chrono::{Duration, Utc};
use shared::{
    domain::{Demand, HomeState, Language, PlanStatus, RemedyKind, Season, Trend},
    protocol::{
        AdvisoryRecord, ChatEntry, CropQuery, CropRecommendation, DetectionReport, ForumPost,
        ImageFile, LoginCredentials, MarketPrice, PlannedCrop, Remedy, SignupDetails, UserProfile,
        WeatherDay,
    },
};

use crate::{
    AuthGateway, ChatResponder, CropRecommender, ForumFeed, PestDetector, ProfileDirectory,
    ProfileOverview, ProviderResult, WeatherMarketFeed,
};

pub const ASSISTANT_GREETING: &str =
    "Hello! I'm your AI farming assistant. How can I help you today?";

pub const CANNED_ASSISTANT_REPLY: &str = "Based on your query, I recommend focusing on soil preparation first. Make sure to test your soil pH levels before planting. Would you like specific recommendations for your region?";

const DEMO_FARMER: &str = "Rajesh Kumar";

/// Accepts every submission and hands back a profile built from the form.
pub struct StaticAuthGateway;

#[async_trait]
impl AuthGateway for StaticAuthGateway {
    async fn login(&self, credentials: &LoginCredentials) -> ProviderResult<UserProfile> {
        Ok(UserProfile {
            display_name: DEMO_FARMER.to_string(),
            contact: credentials.identifier.trim().to_string(),
            state: Some(HomeState::Punjab),
            language: Some(Language::English),
        })
    }

    async fn signup(&self, details: &SignupDetails) -> ProviderResult<UserProfile> {
        Ok(UserProfile {
            display_name: details.name.trim().to_string(),
            contact: details.email.trim().to_string(),
            state: Some(details.state),
            language: Some(details.language),
        })
    }
}

pub struct StaticChatResponder;

#[async_trait]
impl ChatResponder for StaticChatResponder {
    fn greeting(&self) -> String {
        ASSISTANT_GREETING.to_string()
    }

    async fn reply(&self, _transcript: &[ChatEntry], _prompt: &str) -> ProviderResult<String> {
        Ok(CANNED_ASSISTANT_REPLY.to_string())
    }
}

/// Reports the same diagnosis for any image; the bytes are never inspected.
pub struct StaticPestDetector;

#[async_trait]
impl PestDetector for StaticPestDetector {
    async fn detect(&self, _image: &ImageFile) -> ProviderResult<DetectionReport> {
        Ok(DetectionReport {
            label: "Leaf Blight".to_string(),
            description: "Fungal disease affecting crop leaves".to_string(),
            remedies: vec![
                remedy(
                    RemedyKind::Organic,
                    "Neem Oil Spray",
                    "Mix 5ml neem oil per liter of water. Spray in the evening.",
                ),
                remedy(
                    RemedyKind::Organic,
                    "Garlic Extract",
                    "Crush 100g garlic in 1L water. Strain and spray on affected areas.",
                ),
                remedy(
                    RemedyKind::Chemical,
                    "Copper Fungicide",
                    "Apply as per manufacturer instructions. Use protective equipment.",
                ),
                remedy(
                    RemedyKind::Preventive,
                    "Crop Rotation",
                    "Rotate with non-host crops to break disease cycle.",
                ),
                remedy(
                    RemedyKind::Preventive,
                    "Proper Drainage",
                    "Ensure good field drainage to prevent fungal growth.",
                ),
            ],
        })
    }
}

fn remedy(kind: RemedyKind, title: &str, instructions: &str) -> Remedy {
    Remedy {
        kind,
        title: title.to_string(),
        instructions: instructions.to_string(),
    }
}

/// Returns the same shortlist whatever soil, region and season are selected.
pub struct StaticCropRecommender;

#[async_trait]
impl CropRecommender for StaticCropRecommender {
    async fn recommend(&self, _query: &CropQuery) -> ProviderResult<Vec<CropRecommendation>> {
        Ok(vec![
            crop("Rice", "🌾", "4.5 tons/hectare", Demand::High, Trend::Up),
            crop("Wheat", "🌾", "3.8 tons/hectare", Demand::Medium, Trend::Stable),
            crop("Cotton", "🌿", "2.2 tons/hectare", Demand::High, Trend::Up),
            crop("Sugarcane", "🎋", "70 tons/hectare", Demand::Medium, Trend::Stable),
        ])
    }
}

fn crop(name: &str, icon: &str, expected_yield: &str, demand: Demand, trend: Trend) -> CropRecommendation {
    CropRecommendation {
        name: name.to_string(),
        icon: icon.to_string(),
        expected_yield: expected_yield.to_string(),
        demand,
        trend,
    }
}

pub struct StaticWeatherMarketFeed;

#[async_trait]
impl WeatherMarketFeed for StaticWeatherMarketFeed {
    async fn forecast(&self) -> ProviderResult<Vec<WeatherDay>> {
        Ok(vec![
            day("Today", 32, "Sunny", 65, 12),
            day("Tomorrow", 28, "Partly Cloudy", 70, 8),
            day("Day 3", 30, "Clear", 60, 15),
            day("Day 4", 26, "Rain", 85, 20),
            day("Day 5", 29, "Cloudy", 75, 10),
        ])
    }

    async fn market_prices(&self) -> ProviderResult<Vec<MarketPrice>> {
        Ok([
            ("Rice", 2_850, 5.2),
            ("Wheat", 2_200, 2.1),
            ("Cotton", 6_500, -1.8),
            ("Sugarcane", 3_200, 3.5),
            ("Soybean", 4_100, -0.5),
        ]
        .into_iter()
        .map(|(crop, price_inr, change_pct): (&str, u32, f64)| MarketPrice {
            crop: crop.to_string(),
            price_inr,
            change_pct,
            trend: if change_pct < 0.0 { Trend::Down } else { Trend::Up },
        })
        .collect())
    }
}

fn day(day: &str, temperature_c: i16, condition: &str, humidity_pct: u8, wind_kmh: u16) -> WeatherDay {
    WeatherDay {
        day: day.to_string(),
        temperature_c,
        condition: condition.to_string(),
        humidity_pct,
        wind_kmh,
    }
}

pub struct StaticForumFeed;

#[async_trait]
impl ForumFeed for StaticForumFeed {
    async fn posts(&self) -> ProviderResult<Vec<ForumPost>> {
        let now = Utc::now();
        Ok(vec![
            ForumPost {
                author: DEMO_FARMER.to_string(),
                posted_at: now - Duration::hours(2),
                content: "Best practices for pest control in wheat crops during winter season? Looking for organic solutions.".to_string(),
                likes: 12,
                comments: 5,
                liked: false,
            },
            ForumPost {
                author: "Priya Sharma".to_string(),
                posted_at: now - Duration::hours(5),
                content: "Successfully implemented drip irrigation in my cotton farm. Water usage reduced by 40%! Happy to share my experience.".to_string(),
                likes: 8,
                comments: 3,
                liked: false,
            },
            ForumPost {
                author: "Amit Patel".to_string(),
                posted_at: now - Duration::days(1),
                content: "Market prices for rice are looking good this month. Anyone planning to sell their harvest soon?".to_string(),
                likes: 15,
                comments: 7,
                liked: false,
            },
        ])
    }

    async fn trending_topics(&self) -> ProviderResult<Vec<String>> {
        Ok([
            "Organic Farming",
            "Drip Irrigation",
            "Rice Market Prices",
            "Pest Control",
            "Monsoon Preparation",
        ]
        .into_iter()
        .map(str::to_string)
        .collect())
    }
}

pub struct StaticProfileDirectory;

#[async_trait]
impl ProfileDirectory for StaticProfileDirectory {
    async fn overview(&self, signed_in: Option<&UserProfile>) -> ProviderResult<ProfileOverview> {
        let profile = signed_in.cloned().unwrap_or_else(|| UserProfile {
            display_name: DEMO_FARMER.to_string(),
            contact: String::new(),
            state: Some(HomeState::Punjab),
            language: Some(Language::English),
        });
        let location = format!(
            "{}, India",
            profile.state.unwrap_or(HomeState::Punjab).label()
        );

        let now = Utc::now();
        Ok(ProfileOverview {
            profile,
            location,
            saved_crops: vec![
                planned("Rice", Season::Kharif, PlanStatus::Active),
                planned("Wheat", Season::Rabi, PlanStatus::Planned),
                planned("Cotton", Season::Kharif, PlanStatus::Completed),
            ],
            recent_advisories: vec![
                advisory("Pest control for wheat", "Pest Management", now - Duration::days(2)),
                advisory("Fertilizer recommendations", "Crop Care", now - Duration::weeks(1)),
                advisory("Market price inquiry", "Market Info", now - Duration::weeks(2)),
            ],
        })
    }
}

fn planned(name: &str, season: Season, status: PlanStatus) -> PlannedCrop {
    PlannedCrop {
        name: name.to_string(),
        season,
        status,
    }
}

fn advisory(topic: &str, category: &str, recorded_at: chrono::DateTime<Utc>) -> AdvisoryRecord {
    AdvisoryRecord {
        topic: topic.to_string(),
        category: category.to_string(),
        recorded_at,
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::{Region, SoilType};

    use super::*;

    #[tokio::test]
    async fn detection_ignores_image_content() {
        let blank = ImageFile {
            file_name: "blank.png".into(),
            mime_type: None,
            bytes: vec![0; 4],
        };
        let other = ImageFile {
            file_name: "field.jpg".into(),
            mime_type: Some("image/jpeg".into()),
            bytes: vec![0xff, 0xd8, 0xff, 0xe0],
        };

        let first = StaticPestDetector.detect(&blank).await.expect("detect");
        let second = StaticPestDetector.detect(&other).await.expect("detect");
        assert_eq!(first, second);
        assert_eq!(first.label, "Leaf Blight");
        assert_eq!(first.remedies_of(RemedyKind::Organic).count(), 2);
        assert_eq!(first.remedies_of(RemedyKind::Chemical).count(), 1);
        assert_eq!(first.remedies_of(RemedyKind::Preventive).count(), 2);
    }

    #[tokio::test]
    async fn recommendations_do_not_depend_on_filters() {
        let clay = CropQuery {
            soil: SoilType::Clay,
            region: Region::North,
            season: Season::Kharif,
        };
        let sandy = CropQuery {
            soil: SoilType::Sandy,
            region: Region::West,
            season: Season::Zaid,
        };

        let a = StaticCropRecommender.recommend(&clay).await.expect("recommend");
        let b = StaticCropRecommender.recommend(&sandy).await.expect("recommend");
        assert_eq!(a, b);
        let names: Vec<_> = a.iter().map(|crop| crop.name.as_str()).collect();
        assert_eq!(names, ["Rice", "Wheat", "Cotton", "Sugarcane"]);
    }

    #[tokio::test]
    async fn market_trend_follows_sign_of_change() {
        let prices = StaticWeatherMarketFeed.market_prices().await.expect("prices");
        assert_eq!(prices.len(), 5);
        for price in prices {
            assert_eq!(price.trend == Trend::Down, price.change_pct < 0.0);
        }
    }

    #[tokio::test]
    async fn signup_profile_comes_from_the_form() {
        let profile = StaticAuthGateway
            .signup(&SignupDetails {
                name: " Priya Sharma ".into(),
                email: "priya@example.com".into(),
                phone: "+91 98765 43210".into(),
                state: HomeState::Maharashtra,
                language: Language::Marathi,
                password: "secret".into(),
            })
            .await
            .expect("signup");
        assert_eq!(profile.display_name, "Priya Sharma");
        assert_eq!(profile.state, Some(HomeState::Maharashtra));
    }

    #[tokio::test]
    async fn profile_overview_prefers_signed_in_user() {
        let signed_in = UserProfile {
            display_name: "Amit Patel".into(),
            contact: "amit@example.com".into(),
            state: Some(HomeState::Karnataka),
            language: None,
        };
        let overview = StaticProfileDirectory
            .overview(Some(&signed_in))
            .await
            .expect("overview");
        assert_eq!(overview.profile.display_name, "Amit Patel");
        assert_eq!(overview.location, "Karnataka, India");
        assert_eq!(overview.saved_crops.len(), 3);
    }
}
