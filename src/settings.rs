use serde::{Deserialize, Serialize};

use crate::orientation::CameraFacing;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPreset {
    Low,
    #[default]
    Medium,
    High,
    Photo,
}

impl SessionPreset {
    /// Longest edge a still may have; `None` keeps full resolution.
    pub fn max_dimension(&self) -> Option<u32> {
        match self {
            SessionPreset::Low => Some(192),
            SessionPreset::Medium => Some(480),
            SessionPreset::High => Some(1280),
            SessionPreset::Photo => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoCodec {
    #[default]
    Jpeg,
    Png,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub preset: SessionPreset,
    pub facing: CameraFacing,
    pub codec: PhotoCodec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub camera: CameraSettings,
    pub recognizer: String,
    pub log_filter: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            camera: CameraSettings::default(),
            recognizer: "placeholder".to_string(),
            log_filter: "info".to_string(),
        }
    }
}
