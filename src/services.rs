use std::{
    io::Cursor,
    path::{Path, PathBuf},
};

use anyhow::Result;
use image::{imageops::FilterType, DynamicImage, ImageFormat};

use crate::{
    error::{CaptureError, SetupError},
    events::{post, ControllerEvent, EventSender, RequestId},
    orientation::DeviceOrientation,
    settings::{CameraSettings, PhotoCodec, SessionPreset},
};

/// The device camera: one session, one still output.
pub trait CameraService: Send {
    fn configure(&mut self, settings: &CameraSettings) -> Result<(), SetupError>;
    /// May block while hardware spins up; callers dispatch it to a worker.
    fn start(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
    /// Must eventually post exactly one `ControllerEvent::PhotoCaptured` for `request`.
    fn capture_photo(&mut self, request: RequestId, codec: PhotoCodec, reply: EventSender);
}

pub trait OrientationSource: Send {
    fn current(&self) -> DeviceOrientation;
}

pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs work off the UI thread.
pub trait BackgroundWorker: Send {
    fn run(&self, job: Job);
}

#[derive(Default)]
pub struct ThreadWorker;

impl BackgroundWorker for ThreadWorker {
    fn run(&self, job: Job) {
        if let Err(err) = std::thread::Builder::new()
            .name("camera-session".to_string())
            .spawn(job)
        {
            tracing::error!(error = %err, "failed to spawn camera-session worker");
        }
    }
}

/// Runs jobs on the calling thread.
#[derive(Default)]
pub struct InlineWorker;

impl BackgroundWorker for InlineWorker {
    fn run(&self, job: Job) {
        job();
    }
}

pub struct FixedOrientation(pub DeviceOrientation);

impl OrientationSource for FixedOrientation {
    fn current(&self) -> DeviceOrientation {
        self.0
    }
}

/// Camera backed by an image file: every capture delivers the file's
/// contents, scaled down to the session preset and re-encoded to the
/// requested codec when needed.
pub struct StillFileCamera {
    path: PathBuf,
    preset: SessionPreset,
    configured: bool,
    running: bool,
}

impl StillFileCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            preset: SessionPreset::default(),
            configured: false,
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl CameraService for StillFileCamera {
    fn configure(&mut self, settings: &CameraSettings) -> Result<(), SetupError> {
        if !self.path.exists() {
            return Err(SetupError::NoCamera);
        }
        if !self.path.is_file() {
            return Err(SetupError::InputUnavailable(format!(
                "{} is not a file",
                self.path.display()
            )));
        }
        tracing::info!(
            source = %self.path.display(),
            preset = ?settings.preset,
            facing = ?settings.facing,
            codec = ?settings.codec,
            "camera configured"
        );
        self.preset = settings.preset;
        self.configured = true;
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        anyhow::ensure!(self.configured, "camera started before configure");
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.running = false;
        Ok(())
    }

    fn capture_photo(&mut self, request: RequestId, codec: PhotoCodec, reply: EventSender) {
        if !self.running {
            post(
                &reply,
                ControllerEvent::PhotoCaptured {
                    request,
                    result: Err(CaptureError::SessionNotRunning),
                },
            );
            return;
        }

        let path = self.path.clone();
        let preset = self.preset;
        std::thread::spawn(move || {
            let result = read_still(&path, codec, preset);
            post(&reply, ControllerEvent::PhotoCaptured { request, result });
        });
    }
}

fn read_still(
    path: &Path,
    codec: PhotoCodec,
    preset: SessionPreset,
) -> Result<Vec<u8>, CaptureError> {
    let raw = std::fs::read(path).map_err(|err| CaptureError::Failed(err.to_string()))?;
    if raw.is_empty() {
        return Err(CaptureError::NoData);
    }
    encode_still(raw, codec, preset)
}

fn encode_still(
    raw: Vec<u8>,
    codec: PhotoCodec,
    preset: SessionPreset,
) -> Result<Vec<u8>, CaptureError> {
    let format = match codec {
        PhotoCodec::Jpeg => ImageFormat::Jpeg,
        PhotoCodec::Png => ImageFormat::Png,
    };
    let decoded =
        image::load_from_memory(&raw).map_err(|err| CaptureError::Failed(err.to_string()))?;

    let bound = preset
        .max_dimension()
        .filter(|&bound| decoded.width() > bound || decoded.height() > bound);
    if bound.is_none() && image::guess_format(&raw).ok() == Some(format) {
        return Ok(raw);
    }

    let decoded = match bound {
        Some(bound) => decoded.resize(bound, bound, FilterType::Triangle),
        None => decoded,
    };
    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());
    let mut out = Cursor::new(Vec::new());
    rgb.write_to(&mut out, format)
        .map_err(|err| CaptureError::Failed(err.to_string()))?;
    Ok(out.into_inner())
}
