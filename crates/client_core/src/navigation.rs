use serde::Serialize;
use shared::domain::Page;

use crate::session::Session;

pub const NAV_ITEMS: [(&str, Page); 5] = [
    ("Home", Page::Dashboard),
    ("Crop Advisory", Page::CropAdvisory),
    ("Weather & Market", Page::WeatherMarket),
    ("Forum", Page::Forum),
    ("Profile", Page::Profile),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavBar {
    pub items: Vec<NavItem>,
    /// Logout is offered to an authenticated session, Login otherwise.
    pub show_logout: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_initials: Option<String>,
}

pub fn nav_bar(current: Page, session: &Session) -> NavBar {
    NavBar {
        items: NAV_ITEMS
            .iter()
            .map(|&(label, page)| NavItem {
                label,
                path: page.path(),
                active: page == current,
            })
            .collect(),
        show_logout: session.is_authenticated,
        avatar_initials: session
            .user
            .as_ref()
            .filter(|_| session.is_authenticated)
            .map(|user| user.initials()),
    }
}
