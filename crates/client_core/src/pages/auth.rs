//! Login and signup forms.

use serde::Serialize;
use shared::{
    domain::{HomeState, Language, LoginField, Phase, SignupField},
    protocol::{LoginCredentials, SignupDetails},
};

use crate::error::{ControllerError, Result};

#[derive(Debug, Clone, Default)]
pub struct LoginDraft {
    pub identifier: String,
    pub password: String,
}

impl LoginDraft {
    pub fn set(&mut self, field: LoginField, value: impl Into<String>) {
        let value = value.into();
        match field {
            LoginField::Identifier => self.identifier = value,
            LoginField::Password => self.password = value,
        }
    }

    pub fn credentials(&self) -> Result<LoginCredentials> {
        let credentials = LoginCredentials {
            identifier: self.identifier.clone(),
            password: self.password.clone(),
        };
        validate_login(&credentials)?;
        Ok(credentials)
    }
}

pub fn validate_login(credentials: &LoginCredentials) -> Result<()> {
    require(LoginField::Identifier.label(), &credentials.identifier)?;
    require(LoginField::Password.label(), &credentials.password)
}

#[derive(Debug, Clone, Default)]
pub struct SignupDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub state: Option<HomeState>,
    pub language: Option<Language>,
    pub password: String,
}

impl SignupDraft {
    /// Blank values clear a selection; unknown selections are rejected.
    pub fn set(&mut self, field: SignupField, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        match field {
            SignupField::Name => self.name = value,
            SignupField::Email => self.email = value,
            SignupField::Phone => self.phone = value,
            SignupField::Password => self.password = value,
            SignupField::State => self.state = parse_selection(&value)?,
            SignupField::Language => self.language = parse_selection(&value)?,
        }
        Ok(())
    }

    pub fn details(&self) -> Result<SignupDetails> {
        require(SignupField::Name.label(), &self.name)?;
        require(SignupField::Email.label(), &self.email)?;
        require(SignupField::Phone.label(), &self.phone)?;
        let state = self
            .state
            .ok_or(ControllerError::MissingField(SignupField::State.label()))?;
        let language = self
            .language
            .ok_or(ControllerError::MissingField(SignupField::Language.label()))?;
        require(SignupField::Password.label(), &self.password)?;

        Ok(SignupDetails {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            state,
            language,
            password: self.password.clone(),
        })
    }
}

pub fn validate_signup(details: &SignupDetails) -> Result<()> {
    require(SignupField::Name.label(), &details.name)?;
    require(SignupField::Email.label(), &details.email)?;
    require(SignupField::Phone.label(), &details.phone)?;
    require(SignupField::Password.label(), &details.password)
}

fn parse_selection<T>(value: &str) -> Result<Option<T>>
where
    T: std::str::FromStr<Err = shared::error::ParseError>,
{
    if value.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(value.parse()?))
}

fn require(label: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(ControllerError::MissingField(label))
    } else {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct AuthPage {
    pub login: LoginDraft,
    pub signup: SignupDraft,
    pub phase: Phase,
}

impl AuthPage {
    /// Moves `Idle` to `Submitting`; a second submit while one is pending is refused.
    pub fn begin_submit(&mut self) -> Result<()> {
        if self.phase == Phase::Submitting {
            return Err(ControllerError::AlreadySubmitting);
        }
        self.phase = Phase::Submitting;
        Ok(())
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot {
            phase: self.phase,
            identifier: self.login.identifier.clone(),
            login_ready: self.login.credentials().is_ok(),
            signup_name: self.signup.name.clone(),
            signup_email: self.signup.email.clone(),
            signup_phone: self.signup.phone.clone(),
            signup_state: self.signup.state,
            signup_language: self.signup.language,
            signup_ready: self.signup.details().is_ok(),
        }
    }
}

/// Form state safe to hand to a renderer; passwords are never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthSnapshot {
    pub phase: Phase,
    pub identifier: String,
    pub login_ready: bool,
    pub signup_name: String,
    pub signup_email: String,
    pub signup_phone: String,
    pub signup_state: Option<HomeState>,
    pub signup_language: Option<Language>,
    pub signup_ready: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_both_fields() {
        let mut draft = LoginDraft::default();
        draft.set(LoginField::Identifier, "farmer@example.com");
        assert_eq!(
            draft.credentials(),
            Err(ControllerError::MissingField("Password"))
        );
        draft.set(LoginField::Password, "   ");
        assert!(draft.credentials().is_err());
        draft.set(LoginField::Password, "secret");
        assert!(draft.credentials().is_ok());
    }

    #[test]
    fn signup_selections_are_parsed_and_clearable() {
        let mut draft = SignupDraft::default();
        draft.set(SignupField::State, "Uttar Pradesh").expect("state");
        assert_eq!(draft.state, Some(HomeState::UttarPradesh));
        draft.set(SignupField::State, "").expect("clear");
        assert_eq!(draft.state, None);
        assert!(draft.set(SignupField::Language, "klingon").is_err());
    }

    #[test]
    fn second_submit_is_refused_while_pending() {
        let mut page = AuthPage::default();
        page.begin_submit().expect("first submit");
        assert_eq!(page.begin_submit(), Err(ControllerError::AlreadySubmitting));
    }

    #[test]
    fn snapshot_reports_readiness_without_password() {
        let mut page = AuthPage::default();
        page.login.set(LoginField::Identifier, "9876543210");
        page.login.set(LoginField::Password, "secret");
        let snapshot = page.snapshot();
        assert!(snapshot.login_ready);
        assert!(!snapshot.signup_ready);
    }
}
