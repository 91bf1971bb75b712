use std::{path::Path, time::Duration};

use image::RgbImage;
use pretty_assertions::assert_eq;
use textreco::{
    events::{self, EventReceiver},
    model::{ActionLabel, CaptureState, Recognition, MSG_CAPTURE_FAILED, MSG_INITIAL},
    orientation::DeviceOrientation,
    provider::PlaceholderRecognizer,
    services::{FixedOrientation, StillFileCamera, ThreadWorker},
    settings::CameraSettings,
    ActionOutcome, CaptureController,
};

fn controller_for(photo: &Path, orientation: DeviceOrientation) -> (CaptureController, EventReceiver) {
    let (tx, rx) = events::channel();
    let controller = CaptureController::new(
        CameraSettings::default(),
        Box::new(StillFileCamera::new(photo)),
        Box::new(PlaceholderRecognizer),
        Box::new(FixedOrientation(orientation)),
        Box::new(ThreadWorker),
        tx,
    );
    (controller, rx)
}

fn pump_one(controller: &mut CaptureController, rx: &EventReceiver) {
    let event = rx
        .recv_timeout(Duration::from_secs(10))
        .expect("collaborator result");
    assert!(controller.handle_event(event));
}

#[test]
fn full_cycle_through_real_services() {
    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("receipt.png");
    RgbImage::from_pixel(32, 16, image::Rgb([240, 240, 240]))
        .save(&photo)
        .unwrap();

    let (mut controller, rx) = controller_for(&photo, DeviceOrientation::LandscapeLeft);
    controller.on_screen_shown().unwrap();
    assert!(matches!(
        controller.on_action_button_pressed(),
        Ok(ActionOutcome::CaptureRequested(_))
    ));

    pump_one(&mut controller, &rx);
    assert_eq!(controller.state().label(), "Recognizing");
    assert!(!controller.signals().camera_live);

    pump_one(&mut controller, &rx);
    let CaptureState::Reviewing {
        recognized: Some(Recognition::Text(text)),
        photo,
        ..
    } = controller.state()
    else {
        panic!("expected recognized text, got {:?}", controller.state());
    };
    assert_eq!(photo.dimensions(), (32, 16));
    assert_eq!(text, "Simulated text from 32x16 photo (topLeft).");
    assert_eq!(&controller.signals().status_message, text);
    assert_eq!(controller.signals().action_label, ActionLabel::Reset);

    assert_eq!(
        controller.on_action_button_pressed(),
        Ok(ActionOutcome::Reset)
    );
    assert_eq!(controller.signals().status_message, MSG_INITIAL);
    assert_eq!(controller.signals().action_label, ActionLabel::Capture);
    assert!(!controller.signals().preview_visible());

    controller.on_screen_hidden();
}

#[test]
fn vanished_source_fails_capture_and_returns_to_idle() {
    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("frame.png");
    RgbImage::new(4, 4).save(&photo).unwrap();

    let (mut controller, rx) = controller_for(&photo, DeviceOrientation::Portrait);
    controller.on_screen_shown().unwrap();
    std::fs::remove_file(&photo).unwrap();
    controller.on_action_button_pressed().unwrap();

    pump_one(&mut controller, &rx);
    assert_eq!(controller.state(), &CaptureState::Idle);
    assert_eq!(controller.signals().status_message, MSG_CAPTURE_FAILED);
    assert!(controller.signals().camera_live);
}
