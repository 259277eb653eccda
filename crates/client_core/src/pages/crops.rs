use serde::Serialize;
use shared::{
    domain::{CropFilter, Phase, Region, Season, SoilType},
    protocol::{CropQuery, CropRecommendation},
};

use crate::error::{ControllerError, Result};

#[derive(Debug, Default)]
pub struct CropAdvisoryPage {
    pub soil: Option<SoilType>,
    pub region: Option<Region>,
    pub season: Option<Season>,
    pub recommendations: Vec<CropRecommendation>,
    /// Filters the current recommendations were requested with.
    pub requested: Option<CropQuery>,
    pub phase: Phase,
}

impl CropAdvisoryPage {
    /// A blank value unsets the filter.
    pub fn set_filter(&mut self, field: CropFilter, value: &str) -> Result<()> {
        let blank = value.trim().is_empty();
        match field {
            CropFilter::SoilType => self.soil = if blank { None } else { Some(value.parse()?) },
            CropFilter::Region => self.region = if blank { None } else { Some(value.parse()?) },
            CropFilter::Season => self.season = if blank { None } else { Some(value.parse()?) },
        }
        Ok(())
    }

    pub fn query(&self) -> Option<CropQuery> {
        Some(CropQuery {
            soil: self.soil?,
            region: self.region?,
            season: self.season?,
        })
    }

    pub fn can_request(&self) -> bool {
        self.query().is_some()
    }

    pub fn begin_request(&mut self) -> Result<CropQuery> {
        let query = self.query().ok_or(ControllerError::FiltersIncomplete)?;
        self.requested = Some(query);
        self.phase = Phase::Submitting;
        Ok(query)
    }

    pub fn complete(&mut self, recommendations: Vec<CropRecommendation>) {
        self.recommendations = recommendations;
        self.phase = Phase::Complete;
    }

    pub fn request_failed(&mut self) {
        self.phase = Phase::Idle;
    }

    pub fn recommendation(&self, name: &str) -> Option<&CropRecommendation> {
        self.recommendations
            .iter()
            .find(|crop| crop.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn snapshot(&self) -> CropSnapshot {
        CropSnapshot {
            soil: self.soil,
            region: self.region,
            season: self.season,
            can_request: self.can_request(),
            recommendations: self.recommendations.clone(),
            phase: self.phase,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CropSnapshot {
    pub soil: Option<SoilType>,
    pub region: Option<Region>,
    pub season: Option<Season>,
    pub can_request: bool,
    pub recommendations: Vec<CropRecommendation>,
    pub phase: Phase,
}
