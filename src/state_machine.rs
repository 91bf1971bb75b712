use std::sync::Arc;

use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::{
    error::{CaptureError, RecognitionError, SetupError},
    events::{ControllerEvent, EventSender, RequestId},
    model::{
        ActionLabel, CaptureState, Photo, Recognition, UiSignals, MSG_CAPTURE_FAILED,
        MSG_PROCESSING,
    },
    orientation::tag_for,
    provider::TextRecognizer,
    services::{BackgroundWorker, CameraService, OrientationSource},
    settings::CameraSettings,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    CaptureRequested(RequestId),
    Reset,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SetupStatus {
    Pending,
    Ready,
    Failed(SetupError),
}

/// Drives the single capture/recognize/reset flow of the screen.
///
/// All methods run on the UI thread. Collaborator results come back as
/// [`ControllerEvent`]s and are fed in through [`CaptureController::handle_event`].
pub struct CaptureController {
    state: CaptureState,
    signals: UiSignals,
    settings: CameraSettings,
    setup: SetupStatus,
    camera: Arc<Mutex<Box<dyn CameraService>>>,
    recognizer: Box<dyn TextRecognizer>,
    orientation: Box<dyn OrientationSource>,
    worker: Box<dyn BackgroundWorker>,
    reply: EventSender,
    pending_start: Option<Receiver<()>>,
    screen_visible: bool,
    camera_live: bool,
    next_request: u64,
}

impl CaptureController {
    pub fn new(
        settings: CameraSettings,
        camera: Box<dyn CameraService>,
        recognizer: Box<dyn TextRecognizer>,
        orientation: Box<dyn OrientationSource>,
        worker: Box<dyn BackgroundWorker>,
        reply: EventSender,
    ) -> Self {
        Self {
            state: CaptureState::Idle,
            signals: UiSignals::default(),
            settings,
            setup: SetupStatus::Pending,
            camera: Arc::new(Mutex::new(camera)),
            recognizer,
            orientation,
            worker,
            reply,
            pending_start: None,
            screen_visible: false,
            camera_live: false,
            next_request: 1,
        }
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn signals(&self) -> &UiSignals {
        &self.signals
    }

    pub fn on_screen_shown(&mut self) -> Result<(), SetupError> {
        self.screen_visible = true;
        self.ensure_configured()?;
        if self.state.is_idle() {
            self.start_camera();
        }
        Ok(())
    }

    pub fn on_screen_hidden(&mut self) {
        self.screen_visible = false;
        self.stop_camera();
    }

    pub fn on_action_button_pressed(&mut self) -> Result<ActionOutcome, SetupError> {
        match self.state {
            CaptureState::Idle => self.request_capture().map(ActionOutcome::CaptureRequested),
            CaptureState::Capturing { request } => {
                debug!(request = %request, "capture outstanding; ignoring press");
                Ok(ActionOutcome::Ignored)
            }
            CaptureState::Reviewing { .. } => {
                self.reset_to_idle();
                Ok(ActionOutcome::Reset)
            }
        }
    }

    /// Returns whether the event changed anything; stale results return false.
    pub fn handle_event(&mut self, event: ControllerEvent) -> bool {
        match event {
            ControllerEvent::PhotoCaptured { request, result } => {
                self.on_photo_captured(request, result)
            }
            ControllerEvent::RecognitionFinished { request, result } => {
                self.on_recognition_result(request, result)
            }
        }
    }

    pub fn on_photo_captured(
        &mut self,
        request: RequestId,
        result: Result<Vec<u8>, CaptureError>,
    ) -> bool {
        match self.state {
            CaptureState::Capturing { request: outstanding } if outstanding == request => {}
            _ => {
                debug!(request = %request, state = self.state.label(), "discarding stale photo");
                return false;
            }
        }

        let photo = result.and_then(|bytes| {
            Photo::decode(bytes).map_err(|err| CaptureError::Decode(err.to_string()))
        });

        match photo {
            Ok(photo) => {
                let photo = Arc::new(photo);
                let recognition = self.next_request_id();
                let (width, height) = photo.dimensions();
                info!(request = %request, width, height, "photo captured");

                self.state = CaptureState::Reviewing {
                    request: recognition,
                    photo: Arc::clone(&photo),
                    recognized: None,
                };
                self.signals.preview = Some(Arc::clone(&photo));
                self.stop_camera();
                self.signals.status_message = MSG_PROCESSING.to_string();
                self.recognize(recognition, &photo);
            }
            Err(err) => {
                warn!(request = %request, error = %err, "capture failed; back to idle");
                self.state = CaptureState::Idle;
                self.signals.status_message = MSG_CAPTURE_FAILED.to_string();
                self.signals.preview = None;
                self.signals.action_label = ActionLabel::Capture;
                self.start_camera();
            }
        }
        true
    }

    pub fn on_recognition_result(
        &mut self,
        request: RequestId,
        result: Result<String, RecognitionError>,
    ) -> bool {
        let outstanding = match &self.state {
            CaptureState::Reviewing {
                request,
                recognized: None,
                ..
            } => *request,
            _ => {
                debug!(request = %request, state = self.state.label(), "discarding stale recognition");
                return false;
            }
        };
        if outstanding != request {
            debug!(request = %request, outstanding = %outstanding, "discarding stale recognition");
            return false;
        }

        let outcome = match result {
            Ok(text) if text.trim().is_empty() => {
                info!(request = %request, "no text recognized");
                Recognition::Unrecognized
            }
            Ok(text) => {
                info!(request = %request, chars = text.chars().count(), "text recognized");
                Recognition::Text(text)
            }
            Err(err) => {
                warn!(request = %request, error = %err, "recognition failed");
                Recognition::Failed(err.to_string())
            }
        };

        self.signals.status_message = outcome.status_message().to_string();
        if let CaptureState::Reviewing { recognized, .. } = &mut self.state {
            *recognized = Some(outcome);
        }
        true
    }

    fn ensure_configured(&mut self) -> Result<(), SetupError> {
        match &self.setup {
            SetupStatus::Ready => return Ok(()),
            SetupStatus::Failed(err) => return Err(err.clone()),
            SetupStatus::Pending => {}
        }

        let configured = self.camera.lock().configure(&self.settings);
        match configured {
            Ok(()) => {
                self.setup = SetupStatus::Ready;
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "camera setup failed");
                self.signals.status_message = err.to_string();
                self.setup = SetupStatus::Failed(err.clone());
                Err(err)
            }
        }
    }

    fn request_capture(&mut self) -> Result<RequestId, SetupError> {
        if let Err(err) = self.ensure_configured() {
            warn!(error = %err, "capture unavailable");
            return Err(err);
        }

        let request = self.next_request_id();
        self.state = CaptureState::Capturing { request };
        self.signals.status_message = MSG_PROCESSING.to_string();
        self.signals.action_label = ActionLabel::Reset;

        self.wait_for_session_start();
        info!(request = %request, "capture requested");
        self.camera
            .lock()
            .capture_photo(request, self.settings.codec, self.reply.clone());
        Ok(request)
    }

    fn recognize(&mut self, request: RequestId, photo: &Photo) {
        let orientation = self.orientation.current();
        let tag = tag_for(orientation, self.settings.facing);
        info!(
            request = %request,
            recognizer = self.recognizer.display_name(),
            %orientation,
            %tag,
            "submitting photo for recognition"
        );
        self.recognizer
            .recognize(request, photo.bytes.clone(), tag, self.reply.clone());
    }

    fn reset_to_idle(&mut self) {
        info!("reset");
        self.state = CaptureState::Idle;
        self.signals = UiSignals {
            camera_live: self.camera_live,
            ..UiSignals::default()
        };
        self.start_camera();
    }

    /// No-op while the screen is hidden; showing it again restarts an idle stream.
    fn start_camera(&mut self) {
        if self.camera_live || !self.screen_visible {
            return;
        }
        self.camera_live = true;
        self.signals.camera_live = true;

        let camera = Arc::clone(&self.camera);
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        self.pending_start = Some(done_rx);
        self.worker.run(Box::new(move || {
            if let Err(err) = camera.lock().start() {
                error!(error = %err, "camera session failed to start");
            }
            let _ = done_tx.send(());
        }));
    }

    fn stop_camera(&mut self) {
        self.wait_for_session_start();
        if let Err(err) = self.camera.lock().stop() {
            warn!(error = %err, "camera session failed to stop");
        }
        self.camera_live = false;
        self.signals.camera_live = false;
    }

    /// Keeps stop and capture ordered after a start still running on the worker.
    fn wait_for_session_start(&mut self) {
        if let Some(done) = self.pending_start.take() {
            let _ = done.recv();
        }
    }

    fn next_request_id(&mut self) -> RequestId {
        let id = RequestId(self.next_request);
        self.next_request += 1;
        id
    }
}
