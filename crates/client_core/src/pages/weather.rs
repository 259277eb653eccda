use serde::Serialize;
use shared::protocol::{MarketPrice, WeatherDay};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeatherMarketPage {
    pub forecast: Vec<WeatherDay>,
    pub prices: Vec<MarketPrice>,
}
