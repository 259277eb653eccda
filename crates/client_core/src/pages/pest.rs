//! Pest and disease detection: one uploaded image, one canned diagnosis.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use shared::{
    domain::Phase,
    protocol::{DetectionReport, ImageFile},
};

use crate::error::{ControllerError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadPreview {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: usize,
    /// `data:` URL a renderer can display directly.
    pub data_url: String,
}

impl UploadPreview {
    pub fn from_file(file: &ImageFile) -> Result<Self> {
        let unsupported = |reason: &str| ControllerError::UnsupportedUpload {
            file_name: file.file_name.clone(),
            reason: reason.to_string(),
        };

        let mime_type = match file.mime_type.as_deref().map(str::trim) {
            Some(declared) if !declared.is_empty() => declared.to_ascii_lowercase(),
            _ => mime_guess::from_path(&file.file_name)
                .first()
                .map(|mime| mime.essence_str().to_string())
                .ok_or_else(|| unsupported("unknown file type"))?,
        };

        if !mime_type.starts_with("image/") {
            return Err(unsupported("only image files are accepted"));
        }

        Ok(Self {
            file_name: file.file_name.clone(),
            data_url: format!("data:{mime_type};base64,{}", STANDARD.encode(&file.bytes)),
            mime_type,
            size_bytes: file.bytes.len(),
        })
    }
}

#[derive(Debug, Default)]
pub struct PestPage {
    pub preview: Option<UploadPreview>,
    pub detection: Option<DetectionReport>,
    pub phase: Phase,
}

impl PestPage {
    /// Replaces any previous upload; the diagnosis arrives later.
    pub fn accept(&mut self, preview: UploadPreview) {
        self.preview = Some(preview);
        self.detection = None;
        self.phase = Phase::Submitting;
    }

    pub fn complete(&mut self, report: DetectionReport) {
        self.detection = Some(report);
        self.phase = Phase::Complete;
    }

    pub fn detection_failed(&mut self) {
        self.phase = Phase::Idle;
    }

    pub fn remove(&mut self) {
        self.preview = None;
        self.detection = None;
        self.phase = Phase::Idle;
    }

    pub fn snapshot(&self) -> PestSnapshot {
        PestSnapshot {
            preview: self.preview.clone(),
            detection_ready: self.detection.is_some(),
            detection: self.detection.clone(),
            phase: self.phase,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PestSnapshot {
    pub preview: Option<UploadPreview>,
    pub detection_ready: bool,
    pub detection: Option<DetectionReport>,
    pub phase: Phase,
}
