use data_providers::ProviderError;
use shared::{
    domain::Page,
    error::{ErrorCode, ParseError, ViewError},
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{action} is not available on {mounted:?}")]
    NotMounted { action: &'static str, mounted: Page },
    #[error("a submission is already in progress")]
    AlreadySubmitting,
    #[error("select soil type, region and season first")]
    FiltersIncomplete,
    #[error("unsupported upload '{file_name}': {reason}")]
    UnsupportedUpload { file_name: String, reason: String },
    #[error(transparent)]
    InvalidOption(#[from] ParseError),
    #[error("no feature card titled '{0}'")]
    UnknownFeature(String),
    #[error("no forum post at position {0}")]
    UnknownPost(usize),
    #[error("'{0}' is not in the current recommendations")]
    UnknownCrop(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

pub type Result<T> = std::result::Result<T, ControllerError>;

impl ControllerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ControllerError::MissingField(_)
            | ControllerError::FiltersIncomplete
            | ControllerError::UnsupportedUpload { .. }
            | ControllerError::InvalidOption(_) => ErrorCode::Validation,
            ControllerError::NotMounted { .. } => ErrorCode::Unavailable,
            ControllerError::AlreadySubmitting => ErrorCode::Busy,
            ControllerError::UnknownFeature(_)
            | ControllerError::UnknownPost(_)
            | ControllerError::UnknownCrop(_) => ErrorCode::NotFound,
            ControllerError::Provider(_) => ErrorCode::Provider,
        }
    }
}

impl From<&ControllerError> for ViewError {
    fn from(value: &ControllerError) -> Self {
        ViewError::new(value.code(), value.to_string())
    }
}
