use thiserror::Error;

/// Camera could not be prepared. Fatal for the screen instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("Unable to access back camera!")]
    NoCamera,
    #[error("Unable to initialize back camera: {0}")]
    InputUnavailable(String),
}

/// A single still capture failed. The user may retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("camera session is not running")]
    SessionNotRunning,
    #[error("photo has no data")]
    NoData,
    #[error("capture failed: {0}")]
    Failed(String),
    #[error("photo could not be decoded: {0}")]
    Decode(String),
}

/// The recognizer could not process a photo. The user must reset to retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognitionError {
    #[error("recognition failed: {0}")]
    Failed(String),
}
