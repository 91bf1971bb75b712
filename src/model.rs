use std::sync::Arc;

use image::DynamicImage;

use crate::events::RequestId;

pub const MSG_INITIAL: &str = "Click capture to get started";
pub const MSG_PROCESSING: &str = "Processing..";
pub const MSG_RECOGNITION_FAILED: &str = "Error recognizing data";
pub const MSG_UNRECOGNIZED: &str = "Unable to recognize data";
pub const MSG_CAPTURE_FAILED: &str = "Error capturing photo";

/// A still delivered by the camera, kept both encoded (for the recognizer)
/// and decoded (for the preview).
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub bytes: Vec<u8>,
    pub image: DynamicImage,
}

impl Photo {
    pub fn decode(bytes: Vec<u8>) -> image::ImageResult<Self> {
        let image = image::load_from_memory(&bytes)?;
        Ok(Self { bytes, image })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognition {
    Text(String),
    Unrecognized,
    Failed(String),
}

impl Recognition {
    pub fn status_message(&self) -> &str {
        match self {
            Recognition::Text(text) => text,
            Recognition::Unrecognized => MSG_UNRECOGNIZED,
            Recognition::Failed(_) => MSG_RECOGNITION_FAILED,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaptureState {
    Idle,
    Capturing {
        request: RequestId,
    },
    Reviewing {
        request: RequestId,
        photo: Arc<Photo>,
        recognized: Option<Recognition>,
    },
}

impl CaptureState {
    pub fn label(&self) -> &'static str {
        match self {
            CaptureState::Idle => "Idle",
            CaptureState::Capturing { .. } => "Capturing",
            CaptureState::Reviewing {
                recognized: None, ..
            } => "Recognizing",
            CaptureState::Reviewing { .. } => "Reviewing",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, CaptureState::Idle)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActionLabel {
    #[default]
    Capture,
    Reset,
}

impl ActionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionLabel::Capture => "CAPTURE",
            ActionLabel::Reset => "RESET",
        }
    }
}

/// Everything a presentation layer needs to draw the screen.
#[derive(Debug, Clone, PartialEq)]
pub struct UiSignals {
    pub status_message: String,
    pub preview: Option<Arc<Photo>>,
    pub action_label: ActionLabel,
    pub camera_live: bool,
}

impl Default for UiSignals {
    fn default() -> Self {
        Self {
            status_message: MSG_INITIAL.to_string(),
            preview: None,
            action_label: ActionLabel::Capture,
            camera_live: false,
        }
    }
}

impl UiSignals {
    pub fn preview_visible(&self) -> bool {
        self.preview.is_some()
    }
}
