use std::sync::Arc;

use data_providers::{ProviderError, Providers};
use serde::Serialize;
use shared::{
    domain::{
        normalize_path, CropFilter, LoginField, Page, Phase, PreferenceToggle, SignupField,
    },
    error::ViewError,
    protocol::{
        ChatEntry, CropRecommendation, ForumPost, ImageFile, LoginCredentials, SignupDetails, Toast,
        UserAction, UserProfile, ViewEvent,
    },
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

pub mod config;
pub mod error;
pub mod navigation;
pub mod pages;
pub mod session;
pub mod tasks;

pub use config::ControllerConfig;
pub use error::{ControllerError, Result};
pub use navigation::NavBar;
pub use pages::{pest::UploadPreview, PageSnapshot};
pub use session::{Session, SessionStore};

use pages::{
    advisory::ChatPage,
    auth::{validate_login, validate_signup, AuthPage},
    crops::CropAdvisoryPage,
    dashboard::feature_card,
    forum::ForumPage,
    pest::PestPage,
    profile::ProfilePage,
    weather::WeatherMarketPage,
    PageState,
};
use tasks::{PageTasks, TaskKind};

/// Borrows the mounted page's state, or bails out when another page is mounted.
macro_rules! mounted {
    ($state:expr, $variant:ident, $action:literal) => {
        match &mut $state.view {
            PageState::$variant(page) => page,
            other => {
                return Err(ControllerError::NotMounted {
                    action: $action,
                    mounted: other.page(),
                })
            }
        }
    };
}

#[derive(Debug, Clone)]
enum AuthRequest {
    Login(LoginCredentials),
    Signup(SignupDetails),
}

impl AuthRequest {
    fn name(&self) -> &'static str {
        match self {
            AuthRequest::Login(_) => "login",
            AuthRequest::Signup(_) => "signup",
        }
    }

    fn success_toast(&self) -> Toast {
        match self {
            AuthRequest::Login(_) => {
                Toast::success("Login Successful!", "Welcome back to Smart Krishi")
            }
            AuthRequest::Signup(_) => {
                Toast::success("Account Created!", "Welcome to Smart Krishi family")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub path: String,
    pub page: Page,
    pub title: &'static str,
    pub session: Session,
    pub nav: NavBar,
    pub view: PageSnapshot,
}

struct ControllerState {
    path: String,
    view: PageState,
    tasks: PageTasks,
    /// Bumped on every mount; delayed work spawned under an older value is stale.
    generation: u64,
}

pub struct AppController {
    config: ControllerConfig,
    providers: Providers,
    session: SessionStore,
    inner: Mutex<ControllerState>,
    events: broadcast::Sender<ViewEvent>,
}

impl AppController {
    pub fn new(config: ControllerConfig, providers: Providers, session: SessionStore) -> Arc<Self> {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Arc::new(Self {
            config,
            providers,
            session,
            inner: Mutex::new(ControllerState {
                path: Page::Landing.path().to_string(),
                view: PageState::Landing,
                tasks: PageTasks::default(),
                generation: 0,
            }),
            events,
        })
    }

    pub fn with_static_data(config: ControllerConfig) -> Arc<Self> {
        Self::new(config, Providers::static_data(), SessionStore::new())
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ViewEvent> {
        self.events.subscribe()
    }

    pub async fn current_page(&self) -> Page {
        self.inner.lock().await.view.page()
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        let state = self.inner.lock().await;
        let session = self.session.current();
        let page = state.view.page();
        ViewSnapshot {
            path: state.path.clone(),
            page,
            title: page.title(),
            nav: navigation::nav_bar(page, &session),
            view: state.view.snapshot(&session),
            session,
        }
    }

    pub async fn nav_bar(&self) -> NavBar {
        let page = self.current_page().await;
        navigation::nav_bar(page, &self.session.current())
    }

    /// Mounts the page for `location`, dropping the previous page's state and
    /// cancelling its pending work. Unknown locations mount the not-found page.
    pub async fn navigate(self: &Arc<Self>, location: &str) -> Page {
        let path = normalize_path(location);
        let page = Page::resolve(&path);
        let view = self.build_page(page, &path).await;

        let (from, previous_tasks) = {
            let mut state = self.inner.lock().await;
            Self::mount(&mut state, view, &path)
        };
        self.finish_navigation(from, page, path, previous_tasks);
        page
    }

    /// Swaps in a new page under the caller's lock and hands back the unmounted
    /// page and its tasks.
    fn mount(state: &mut ControllerState, view: PageState, path: &str) -> (Page, PageTasks) {
        let from = state.view.page();
        state.generation += 1;
        state.view = view;
        state.path = path.to_string();
        (from, std::mem::take(&mut state.tasks))
    }

    fn finish_navigation(&self, from: Page, to: Page, path: String, mut previous: PageTasks) {
        // A completion that navigates aborts its own task here, so nothing after
        // this call may await.
        let cancelled = previous.cancel_all();

        info!(from = ?from, to = ?to, path = %path, cancelled, "navigated");
        self.emit(ViewEvent::Navigated { from, to, path });
    }

    async fn build_page(&self, page: Page, path: &str) -> PageState {
        match page {
            Page::Landing => PageState::Landing,
            Page::Login => PageState::Login(AuthPage::default()),
            Page::Dashboard => PageState::Dashboard,
            Page::CropAdvisory => PageState::CropAdvisory(CropAdvisoryPage::default()),
            Page::PestDetection => PageState::PestDetection(PestPage::default()),
            Page::Advisory => PageState::Advisory(ChatPage::new(self.providers.chat.greeting())),
            Page::WeatherMarket => {
                let feed = &self.providers.weather_market;
                let forecast = self.loaded(page, feed.forecast().await);
                let prices = self.loaded(page, feed.market_prices().await);
                PageState::WeatherMarket(WeatherMarketPage { forecast, prices })
            }
            Page::Forum => {
                let feed = &self.providers.forum;
                PageState::Forum(ForumPage {
                    posts: self.loaded(page, feed.posts().await),
                    trending: self.loaded(page, feed.trending_topics().await),
                    draft: String::new(),
                })
            }
            Page::Profile => {
                let user = self.session.user();
                match self.providers.profiles.overview(user.as_ref()).await {
                    Ok(overview) => PageState::Profile(ProfilePage {
                        profile: overview.profile,
                        location: overview.location,
                        seeded_crops: overview.saved_crops,
                        recent_advisories: overview.recent_advisories,
                    }),
                    Err(err) => {
                        self.report(page, &ControllerError::from(err));
                        PageState::Profile(ProfilePage {
                            profile: user.unwrap_or_else(|| UserProfile {
                                display_name: "Farmer".to_string(),
                                contact: String::new(),
                                state: None,
                                language: None,
                            }),
                            location: String::new(),
                            seeded_crops: Vec::new(),
                            recent_advisories: Vec::new(),
                        })
                    }
                }
            }
            Page::NotFound => PageState::NotFound {
                path: path.to_string(),
            },
        }
    }

    /// Page content that fails to load is reported and rendered empty.
    fn loaded<T>(&self, page: Page, result: std::result::Result<Vec<T>, ProviderError>) -> Vec<T> {
        result.unwrap_or_else(|err| {
            self.report(page, &ControllerError::from(err));
            Vec::new()
        })
    }

    fn report(&self, page: Page, err: &ControllerError) {
        warn!(page = ?page, error = %err, "page operation failed");
        self.emit(ViewEvent::Error(ViewError::from(err)));
    }

    /// Failures of delayed steps also raise an error toast.
    fn report_delayed(&self, page: Page, title: &str, err: ControllerError) {
        self.emit(ViewEvent::Toast(Toast::error(title, err.to_string())));
        self.report(page, &err);
    }

    fn emit(&self, event: ViewEvent) {
        // No subscribers is fine; the controller keeps working headless.
        let _ = self.events.send(event);
    }

    pub async fn set_login_field(&self, field: LoginField, value: impl Into<String>) -> Result<()> {
        let mut state = self.inner.lock().await;
        mounted!(state, Login, "login form").login.set(field, value);
        Ok(())
    }

    pub async fn set_signup_field(
        &self,
        field: SignupField,
        value: impl Into<String>,
    ) -> Result<()> {
        let mut state = self.inner.lock().await;
        mounted!(state, Login, "signup form").signup.set(field, value)
    }

    pub async fn submit_login(self: &Arc<Self>, credentials: LoginCredentials) -> Result<()> {
        validate_login(&credentials)?;
        self.begin_auth(AuthRequest::Login(credentials)).await
    }

    /// Submits whatever the login form currently holds.
    pub async fn submit_login_form(self: &Arc<Self>) -> Result<()> {
        let credentials = {
            let mut state = self.inner.lock().await;
            mounted!(state, Login, "login").login.credentials()?
        };
        self.submit_login(credentials).await
    }

    pub async fn submit_signup(self: &Arc<Self>, details: SignupDetails) -> Result<()> {
        validate_signup(&details)?;
        self.begin_auth(AuthRequest::Signup(details)).await
    }

    pub async fn submit_signup_form(self: &Arc<Self>) -> Result<()> {
        let details = {
            let mut state = self.inner.lock().await;
            mounted!(state, Login, "signup").signup.details()?
        };
        self.submit_signup(details).await
    }

    async fn begin_auth(self: &Arc<Self>, request: AuthRequest) -> Result<()> {
        let mut state = self.inner.lock().await;
        let generation = state.generation;
        mounted!(state, Login, "submit").begin_submit()?;

        debug!(request = request.name(), "auth submission started");
        let controller = Arc::clone(self);
        let handle = tokio::spawn(async move {
            controller.complete_auth(generation, request).await;
        });
        state.tasks.track(TaskKind::Submit, handle);
        Ok(())
    }

    async fn complete_auth(self: Arc<Self>, generation: u64, request: AuthRequest) {
        tokio::time::sleep(self.config.simulated_latency).await;
        let outcome = match &request {
            AuthRequest::Login(credentials) => self.providers.auth.login(credentials).await,
            AuthRequest::Signup(details) => self.providers.auth.signup(details).await,
        };

        // The generation check, the session change and the dashboard mount share
        // one critical section so a navigation by the user cannot slip between them.
        let mut state = self.inner.lock().await;
        if state.generation != generation {
            debug!(request = request.name(), "login page unmounted before completion");
            return;
        }
        if let PageState::Login(page) = &mut state.view {
            page.phase = if outcome.is_ok() {
                Phase::Complete
            } else {
                Phase::Idle
            };
        }

        match outcome {
            Ok(user) => {
                let session_id = self.session.authenticate(user);
                let (from, previous_tasks) =
                    Self::mount(&mut state, PageState::Dashboard, Page::Dashboard.path());
                drop(state);

                info!(request = request.name(), %session_id, "session authenticated");
                self.emit(ViewEvent::SessionChanged {
                    authenticated: true,
                });
                self.emit(ViewEvent::Toast(request.success_toast()));
                self.finish_navigation(
                    from,
                    Page::Dashboard,
                    Page::Dashboard.path().to_string(),
                    previous_tasks,
                );
            }
            Err(err) => {
                drop(state);
                self.report_delayed(Page::Login, "Sign-in failed", err.into());
            }
        }
    }

    /// Clears the session and returns to the landing page. No confirmation step.
    pub async fn logout(self: &Arc<Self>) -> Page {
        self.session.logout();
        info!("session cleared");
        self.emit(ViewEvent::SessionChanged {
            authenticated: false,
        });
        self.navigate(Page::Landing.path()).await
    }

    pub async fn set_chat_draft(&self, text: impl Into<String>) -> Result<()> {
        let mut state = self.inner.lock().await;
        mounted!(state, Advisory, "chat").set_draft(text);
        Ok(())
    }

    /// Pre-fills the chat input. Returns `false` for an empty prompt, which
    /// leaves the draft as it was.
    pub async fn select_quick_action(&self, prompt: &str) -> Result<bool> {
        let mut state = self.inner.lock().await;
        let applied = mounted!(state, Advisory, "quick action").apply_quick_action(prompt);
        if applied {
            self.emit(ViewEvent::PageUpdated {
                page: Page::Advisory,
            });
        }
        Ok(applied)
    }

    /// Appends the user turn now and the assistant reply after the simulated
    /// latency. Whitespace-only input is ignored and returns `false`.
    pub async fn send_chat_message(self: &Arc<Self>, text: &str) -> Result<bool> {
        let mut state = self.inner.lock().await;
        let generation = state.generation;
        let page = mounted!(state, Advisory, "chat");
        let Some(entry) = page.push_user(text) else {
            return Ok(false);
        };
        let history = page.transcript.clone();

        let controller = Arc::clone(self);
        let prompt = entry.content.clone();
        let handle = tokio::spawn(async move {
            controller.complete_reply(generation, history, prompt).await;
        });
        state.tasks.track(TaskKind::ChatReply, handle);
        drop(state);

        debug!(chars = entry.content.len(), "chat message sent");
        self.emit(ViewEvent::TranscriptAppended { entry });
        Ok(true)
    }

    pub async fn send_chat_draft(self: &Arc<Self>) -> Result<bool> {
        let draft = {
            let mut state = self.inner.lock().await;
            mounted!(state, Advisory, "chat").draft.clone()
        };
        self.send_chat_message(&draft).await
    }

    async fn complete_reply(
        self: Arc<Self>,
        generation: u64,
        history: Vec<ChatEntry>,
        prompt: String,
    ) {
        tokio::time::sleep(self.config.simulated_latency).await;
        let reply = self.providers.chat.reply(&history, &prompt).await;

        let mut state = self.inner.lock().await;
        if state.generation != generation {
            return;
        }
        let PageState::Advisory(page) = &mut state.view else {
            return;
        };
        match reply {
            Ok(content) => {
                let entry = page.push_assistant(content);
                drop(state);
                self.emit(ViewEvent::TranscriptAppended { entry });
            }
            Err(err) => {
                page.reply_failed();
                drop(state);
                self.report_delayed(Page::Advisory, "Advisor unavailable", err.into());
            }
        }
    }

    /// Shows the preview immediately; the diagnosis follows after the simulated
    /// latency. A new upload replaces the previous one and its pending diagnosis.
    pub async fn upload_image(self: &Arc<Self>, file: ImageFile) -> Result<UploadPreview> {
        let preview = UploadPreview::from_file(&file)?;

        let mut state = self.inner.lock().await;
        let generation = state.generation;
        mounted!(state, PestDetection, "upload").accept(preview.clone());
        state.tasks.cancel(TaskKind::Detection);

        let controller = Arc::clone(self);
        let handle = tokio::spawn(async move {
            controller.complete_detection(generation, file).await;
        });
        state.tasks.track(TaskKind::Detection, handle);
        drop(state);

        info!(
            file = %preview.file_name,
            mime = %preview.mime_type,
            bytes = preview.size_bytes,
            "image accepted for detection"
        );
        self.emit(ViewEvent::PreviewReady {
            file_name: preview.file_name.clone(),
        });
        Ok(preview)
    }

    async fn complete_detection(self: Arc<Self>, generation: u64, file: ImageFile) {
        tokio::time::sleep(self.config.simulated_latency).await;
        let outcome = self.providers.pests.detect(&file).await;

        let mut state = self.inner.lock().await;
        if state.generation != generation {
            return;
        }
        let PageState::PestDetection(page) = &mut state.view else {
            return;
        };
        match outcome {
            Ok(report) => {
                page.complete(report.clone());
                drop(state);
                info!(label = %report.label, "detection ready");
                self.emit(ViewEvent::DetectionReady { report });
            }
            Err(err) => {
                page.detection_failed();
                drop(state);
                self.report_delayed(Page::PestDetection, "Detection failed", err.into());
            }
        }
    }

    pub async fn remove_image(&self) -> Result<()> {
        let mut state = self.inner.lock().await;
        mounted!(state, PestDetection, "remove image").remove();
        let cancelled = state.tasks.cancel(TaskKind::Detection);
        drop(state);

        debug!(cancelled, "upload removed");
        self.emit(ViewEvent::PageUpdated {
            page: Page::PestDetection,
        });
        Ok(())
    }

    /// Updates one crop filter and reports whether recommendations can now be
    /// requested.
    pub async fn set_filter(&self, field: CropFilter, value: &str) -> Result<bool> {
        let mut state = self.inner.lock().await;
        let page = mounted!(state, CropAdvisory, "crop filters");
        page.set_filter(field, value)?;
        Ok(page.can_request())
    }

    pub async fn request_recommendations(&self) -> Result<Vec<CropRecommendation>> {
        let (generation, query) = {
            let mut state = self.inner.lock().await;
            let generation = state.generation;
            let query = mounted!(state, CropAdvisory, "recommendations").begin_request()?;
            (generation, query)
        };

        let outcome = self.providers.crops.recommend(&query).await;

        let mut state = self.inner.lock().await;
        let still_mounted = state.generation == generation;
        let page = match &mut state.view {
            PageState::CropAdvisory(page) if still_mounted => Some(page),
            _ => None,
        };
        match outcome {
            Ok(recommendations) => {
                if let Some(page) = page {
                    page.complete(recommendations.clone());
                }
                drop(state);
                self.emit(ViewEvent::RecommendationsReady {
                    count: recommendations.len(),
                });
                Ok(recommendations)
            }
            Err(err) => {
                if let Some(page) = page {
                    page.request_failed();
                }
                drop(state);
                let err = ControllerError::from(err);
                self.report(Page::CropAdvisory, &err);
                Err(err)
            }
        }
    }

    /// Adds one of the current recommendations to the session's crop plan.
    /// Returns `false` when the crop was already planned.
    pub async fn add_to_crop_plan(&self, crop: &str) -> Result<bool> {
        let (name, season) = {
            let mut state = self.inner.lock().await;
            let page = mounted!(state, CropAdvisory, "crop plan");
            let recommendation = page
                .recommendation(crop)
                .ok_or_else(|| ControllerError::UnknownCrop(crop.to_string()))?;
            let season = page
                .requested
                .map(|query| query.season)
                .ok_or(ControllerError::FiltersIncomplete)?;
            (recommendation.name.clone(), season)
        };

        let added = self.session.add_to_crop_plan(&name, season);
        debug!(crop = %name, added, "crop plan updated");
        Ok(added)
    }

    pub async fn set_post_draft(&self, text: impl Into<String>) -> Result<()> {
        let mut state = self.inner.lock().await;
        mounted!(state, Forum, "forum").set_draft(text);
        Ok(())
    }

    pub async fn publish_post(&self) -> Result<ForumPost> {
        let author = self
            .session
            .user()
            .map(|user| user.display_name)
            .unwrap_or_else(|| "You".to_string());

        let mut state = self.inner.lock().await;
        let post = mounted!(state, Forum, "publish").publish(&author)?;
        drop(state);

        info!(author = %post.author, "forum post published");
        self.emit(ViewEvent::PageUpdated { page: Page::Forum });
        Ok(post)
    }

    pub async fn like_post(&self, index: usize) -> Result<u32> {
        let mut state = self.inner.lock().await;
        let likes = mounted!(state, Forum, "like").toggle_like(index)?;
        drop(state);

        self.emit(ViewEvent::PageUpdated { page: Page::Forum });
        Ok(likes)
    }

    /// Follows a dashboard feature card to its page.
    pub async fn open_feature(self: &Arc<Self>, title: &str) -> Result<Page> {
        let target = {
            let state = self.inner.lock().await;
            let mounted = state.view.page();
            if mounted != Page::Dashboard {
                return Err(ControllerError::NotMounted {
                    action: "feature cards",
                    mounted,
                });
            }
            feature_card(title)
                .ok_or_else(|| ControllerError::UnknownFeature(title.to_string()))?
                .target
        };
        Ok(self.navigate(target.path()).await)
    }

    pub async fn set_preference(&self, toggle: PreferenceToggle, enabled: bool) -> Result<()> {
        {
            let state = self.inner.lock().await;
            let mounted = state.view.page();
            if mounted != Page::Profile {
                return Err(ControllerError::NotMounted {
                    action: "preferences",
                    mounted,
                });
            }
        }

        self.session
            .update_preferences(|preferences| preferences.set(toggle, enabled));
        debug!(toggle = toggle.value(), enabled, "preference updated");
        self.emit(ViewEvent::PageUpdated {
            page: Page::Profile,
        });
        Ok(())
    }

    /// Applies one user action. Errors are also published as view events so a
    /// front end that only listens to events still sees them.
    pub async fn dispatch(self: &Arc<Self>, action: UserAction) -> Result<()> {
        let result = self.apply(action).await;
        if let Err(err) = &result {
            self.emit(ViewEvent::Error(ViewError::from(err)));
        }
        result
    }

    async fn apply(self: &Arc<Self>, action: UserAction) -> Result<()> {
        match action {
            UserAction::Navigate { path } => {
                self.navigate(&path).await;
            }
            UserAction::SetLoginField { field, value } => self.set_login_field(field, value).await?,
            UserAction::SubmitLogin => self.submit_login_form().await?,
            UserAction::SetSignupField { field, value } => {
                self.set_signup_field(field, value).await?
            }
            UserAction::SubmitSignup => self.submit_signup_form().await?,
            UserAction::Logout => {
                self.logout().await;
            }
            UserAction::SetChatDraft { text } => self.set_chat_draft(text).await?,
            UserAction::SendChatMessage { text } => {
                self.send_chat_message(&text).await?;
            }
            UserAction::SelectQuickAction { prompt } => {
                self.select_quick_action(&prompt).await?;
            }
            UserAction::UploadImage { file } => {
                self.upload_image(file).await?;
            }
            UserAction::RemoveImage => self.remove_image().await?,
            UserAction::SetFilter { field, value } => {
                self.set_filter(field, &value).await?;
            }
            UserAction::RequestRecommendations => {
                self.request_recommendations().await?;
            }
            UserAction::AddToCropPlan { crop } => {
                self.add_to_crop_plan(&crop).await?;
            }
            UserAction::SetPostDraft { text } => self.set_post_draft(text).await?,
            UserAction::PublishPost => {
                self.publish_post().await?;
            }
            UserAction::LikePost { index } => {
                self.like_post(index).await?;
            }
            UserAction::OpenFeature { title } => {
                self.open_feature(&title).await?;
            }
            UserAction::SetPreference { toggle, enabled } => {
                self.set_preference(toggle, enabled).await?
            }
        }
        Ok(())
    }

    /// Cancels whatever the mounted page still has pending and resets the session.
    pub async fn teardown(&self) {
        let cancelled = self.inner.lock().await.tasks.cancel_all();
        self.session.reset();
        info!(cancelled, "controller torn down");
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
