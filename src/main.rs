use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use textreco::{
    events,
    model::CaptureState,
    orientation::DeviceOrientation,
    provider::recognizer_for,
    services::{FixedOrientation, StillFileCamera, ThreadWorker},
    store::SettingsStore,
    ActionOutcome, CaptureController,
};

/// Run one capture/recognize cycle against an image file standing in for the camera.
#[derive(Parser, Debug)]
#[command(name = "textreco")]
struct Args {
    /// Image file delivered as the camera's next still
    #[arg(long)]
    photo: PathBuf,

    /// Physical device orientation reported while recognizing
    #[arg(long, default_value = "portrait")]
    orientation: DeviceOrientation,

    /// Settings file (defaults to the platform config dir)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Give up waiting for results after this many milliseconds
    #[arg(long, default_value_t = 10_000)]
    timeout_ms: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let store = match args.settings.clone() {
        Some(path) => Some(SettingsStore::new(path)),
        None => SettingsStore::default_location(),
    };
    let settings = match &store {
        Some(store) => store.load()?,
        None => Default::default(),
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    if let Some(store) = &store {
        tracing::debug!(path = %store.path().display(), "settings loaded");
    }

    let recognizer = recognizer_for(&settings.recognizer)?;
    let (reply, results) = events::channel();
    let mut controller = CaptureController::new(
        settings.camera.clone(),
        Box::new(StillFileCamera::new(&args.photo)),
        recognizer,
        Box::new(FixedOrientation(args.orientation)),
        Box::new(ThreadWorker),
        reply,
    );

    if let Err(err) = controller.on_screen_shown() {
        println!("{}", controller.signals().status_message);
        return Err(err).context("camera setup failed");
    }

    let outcome = controller.on_action_button_pressed()?;
    tracing::debug!(?outcome, "action pressed");
    if !matches!(outcome, ActionOutcome::CaptureRequested(_)) {
        anyhow::bail!("capture was not requested");
    }

    let deadline = Instant::now() + Duration::from_millis(args.timeout_ms);
    while !cycle_settled(controller.state()) {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let event = results
            .recv_timeout(remaining)
            .context("timed out waiting for camera or recognizer")?;
        controller.handle_event(event);
    }

    let signals = controller.signals();
    println!("{}", signals.status_message);
    println!("[{}]", signals.action_label.as_str());

    let outcome = cycle_outcome(controller.state());
    controller.on_screen_hidden();
    outcome
}

/// Idle after a capture means the capture failed; reviewing with text means done.
fn cycle_settled(state: &CaptureState) -> bool {
    match state {
        CaptureState::Idle => true,
        CaptureState::Capturing { .. } => false,
        CaptureState::Reviewing { recognized, .. } => recognized.is_some(),
    }
}

/// A settled cycle back in `Idle` means the capture itself failed.
fn cycle_outcome(state: &CaptureState) -> Result<()> {
    if state.is_idle() {
        anyhow::bail!("capture failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use textreco::{events::RequestId, model::Photo, model::Recognition};

    #[test]
    fn failed_capture_is_an_error_exit() {
        assert!(cycle_settled(&CaptureState::Idle));
        assert!(cycle_outcome(&CaptureState::Idle).is_err());
    }

    #[test]
    fn recognized_cycle_exits_cleanly() {
        let image = image::DynamicImage::new_rgb8(2, 2);
        let state = CaptureState::Reviewing {
            request: RequestId(2),
            photo: Arc::new(Photo {
                bytes: Vec::new(),
                image,
            }),
            recognized: Some(Recognition::Unrecognized),
        };
        assert!(cycle_settled(&state));
        assert!(cycle_outcome(&state).is_ok());
        assert!(!cycle_settled(&CaptureState::Capturing {
            request: RequestId(1)
        }));
    }
}
