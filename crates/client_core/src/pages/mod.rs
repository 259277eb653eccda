//! Per-page state. Each mounted page owns its state exclusively; navigating away
//! drops it.

pub mod advisory;
pub mod auth;
pub mod crops;
pub mod dashboard;
pub mod forum;
pub mod pest;
pub mod profile;
pub mod weather;

use serde::Serialize;
use shared::domain::Page;

use crate::session::Session;

use self::{
    advisory::{ChatPage, ChatSnapshot},
    auth::{AuthPage, AuthSnapshot},
    crops::{CropAdvisoryPage, CropSnapshot},
    dashboard::DashboardSnapshot,
    forum::{ForumPage, ForumSnapshot},
    pest::{PestPage, PestSnapshot},
    profile::{ProfilePage, ProfileSnapshot},
    weather::WeatherMarketPage,
};

#[derive(Debug)]
pub enum PageState {
    Landing,
    Login(AuthPage),
    Dashboard,
    CropAdvisory(CropAdvisoryPage),
    PestDetection(PestPage),
    WeatherMarket(WeatherMarketPage),
    Forum(ForumPage),
    Advisory(ChatPage),
    Profile(ProfilePage),
    NotFound { path: String },
}

impl PageState {
    pub fn page(&self) -> Page {
        match self {
            PageState::Landing => Page::Landing,
            PageState::Login(_) => Page::Login,
            PageState::Dashboard => Page::Dashboard,
            PageState::CropAdvisory(_) => Page::CropAdvisory,
            PageState::PestDetection(_) => Page::PestDetection,
            PageState::WeatherMarket(_) => Page::WeatherMarket,
            PageState::Forum(_) => Page::Forum,
            PageState::Advisory(_) => Page::Advisory,
            PageState::Profile(_) => Page::Profile,
            PageState::NotFound { .. } => Page::NotFound,
        }
    }

    pub fn snapshot(&self, session: &Session) -> PageSnapshot {
        match self {
            PageState::Landing => PageSnapshot::Landing,
            PageState::Login(page) => PageSnapshot::Login(page.snapshot()),
            PageState::Dashboard => PageSnapshot::Dashboard(dashboard::snapshot(
                session.user.as_ref().map(|user| user.display_name.as_str()),
            )),
            PageState::CropAdvisory(page) => PageSnapshot::CropAdvisory(page.snapshot()),
            PageState::PestDetection(page) => PageSnapshot::PestDetection(page.snapshot()),
            PageState::WeatherMarket(page) => PageSnapshot::WeatherMarket(page.clone()),
            PageState::Forum(page) => PageSnapshot::Forum(page.snapshot()),
            PageState::Advisory(page) => PageSnapshot::Advisory(page.snapshot()),
            PageState::Profile(page) => PageSnapshot::Profile(page.snapshot(session)),
            PageState::NotFound { path } => PageSnapshot::NotFound { path: path.clone() },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageSnapshot {
    Landing,
    Login(AuthSnapshot),
    Dashboard(DashboardSnapshot),
    CropAdvisory(CropSnapshot),
    PestDetection(PestSnapshot),
    WeatherMarket(WeatherMarketPage),
    Forum(ForumSnapshot),
    Advisory(ChatSnapshot),
    Profile(ProfileSnapshot),
    NotFound { path: String },
}
