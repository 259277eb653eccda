//! Capability traits for every data source the controller reads from, plus the
//! static implementations that carry the product's canned content.

use std::sync::Arc;

use async_trait::async_trait;
use shared::protocol::{
    AdvisoryRecord, ChatEntry, CropQuery, CropRecommendation, DetectionReport, ForumPost,
    ImageFile, LoginCredentials, MarketPrice, PlannedCrop, SignupDetails, UserProfile, WeatherDay,
};
use thiserror::Error;

mod static_data;

pub use static_data::{
    StaticAuthGateway, StaticChatResponder, StaticCropRecommender, StaticForumFeed,
    StaticPestDetector, StaticProfileDirectory, StaticWeatherMarketFeed, ASSISTANT_GREETING,
    CANNED_ASSISTANT_REPLY,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("{provider} is unavailable: {reason}")]
    Unavailable {
        provider: &'static str,
        reason: String,
    },
    #[error("{provider} rejected the request: {reason}")]
    Rejected {
        provider: &'static str,
        reason: String,
    },
}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, credentials: &LoginCredentials) -> ProviderResult<UserProfile>;
    async fn signup(&self, details: &SignupDetails) -> ProviderResult<UserProfile>;
}

#[async_trait]
pub trait ChatResponder: Send + Sync {
    fn greeting(&self) -> String;
    async fn reply(&self, transcript: &[ChatEntry], prompt: &str) -> ProviderResult<String>;
}

#[async_trait]
pub trait PestDetector: Send + Sync {
    async fn detect(&self, image: &ImageFile) -> ProviderResult<DetectionReport>;
}

#[async_trait]
pub trait CropRecommender: Send + Sync {
    async fn recommend(&self, query: &CropQuery) -> ProviderResult<Vec<CropRecommendation>>;
}

#[async_trait]
pub trait WeatherMarketFeed: Send + Sync {
    async fn forecast(&self) -> ProviderResult<Vec<WeatherDay>>;
    async fn market_prices(&self) -> ProviderResult<Vec<MarketPrice>>;
}

#[async_trait]
pub trait ForumFeed: Send + Sync {
    async fn posts(&self) -> ProviderResult<Vec<ForumPost>>;
    async fn trending_topics(&self) -> ProviderResult<Vec<String>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileOverview {
    pub profile: UserProfile,
    pub location: String,
    pub saved_crops: Vec<PlannedCrop>,
    pub recent_advisories: Vec<AdvisoryRecord>,
}

#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Loads the profile page content; `signed_in` overrides the directory's own
    /// user card when the session already knows who is signed in.
    async fn overview(&self, signed_in: Option<&UserProfile>) -> ProviderResult<ProfileOverview>;
}

/// Bundle of data sources injected into the controller.
#[derive(Clone)]
pub struct Providers {
    pub auth: Arc<dyn AuthGateway>,
    pub chat: Arc<dyn ChatResponder>,
    pub pests: Arc<dyn PestDetector>,
    pub crops: Arc<dyn CropRecommender>,
    pub weather_market: Arc<dyn WeatherMarketFeed>,
    pub forum: Arc<dyn ForumFeed>,
    pub profiles: Arc<dyn ProfileDirectory>,
}

impl Providers {
    pub fn static_data() -> Self {
        Self {
            auth: Arc::new(StaticAuthGateway),
            chat: Arc::new(StaticChatResponder),
            pests: Arc::new(StaticPestDetector),
            crops: Arc::new(StaticCropRecommender),
            weather_market: Arc::new(StaticWeatherMarketFeed),
            forum: Arc::new(StaticForumFeed),
            profiles: Arc::new(StaticProfileDirectory),
        }
    }

    pub fn with_pests(mut self, pests: Arc<dyn PestDetector>) -> Self {
        self.pests = pests;
        self
    }

    pub fn with_weather_market(mut self, feed: Arc<dyn WeatherMarketFeed>) -> Self {
        self.weather_market = feed;
        self
    }
}

impl Default for Providers {
    fn default() -> Self {
        Self::static_data()
    }
}
