use anyhow::Result;

use crate::{
    error::RecognitionError,
    events::{post, ControllerEvent, EventSender, RequestId},
    orientation::OrientationTag,
};

pub trait TextRecognizer: Send {
    fn display_name(&self) -> &'static str;
    /// Must eventually post exactly one `ControllerEvent::RecognitionFinished`
    /// for `request`. The text may be empty.
    fn recognize(
        &mut self,
        request: RequestId,
        photo: Vec<u8>,
        orientation: OrientationTag,
        reply: EventSender,
    );
}

/// Picks a recognizer by its settings name.
pub fn recognizer_for(name: &str) -> Result<Box<dyn TextRecognizer>> {
    match name {
        "placeholder" => Ok(Box::new(PlaceholderRecognizer)),
        other => anyhow::bail!("unknown recognizer `{other}`"),
    }
}

/// Stands in for an on-device OCR engine: reports the photo's size and the
/// orientation it was told about.
#[derive(Default)]
pub struct PlaceholderRecognizer;

impl TextRecognizer for PlaceholderRecognizer {
    fn display_name(&self) -> &'static str {
        "Placeholder (simulated)"
    }

    fn recognize(
        &mut self,
        request: RequestId,
        photo: Vec<u8>,
        orientation: OrientationTag,
        reply: EventSender,
    ) {
        std::thread::spawn(move || {
            let result = image::load_from_memory(&photo)
                .map(|image| {
                    format!(
                        "Simulated text from {}x{} photo ({orientation}).",
                        image.width(),
                        image.height()
                    )
                })
                .map_err(|err| RecognitionError::Failed(err.to_string()));
            post(&reply, ControllerEvent::RecognitionFinished { request, result });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn unknown_recognizer_is_rejected() {
        assert!(recognizer_for("placeholder").is_ok());
        assert!(recognizer_for("cloud").is_err());
    }

    #[test]
    fn placeholder_fails_on_garbage() {
        let (tx, rx) = events::channel();
        PlaceholderRecognizer.recognize(RequestId(2), vec![1, 2, 3], OrientationTag::RightTop, tx);

        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(event.request(), RequestId(2));
        assert!(matches!(
            event,
            ControllerEvent::RecognitionFinished {
                result: Err(RecognitionError::Failed(_)),
                ..
            }
        ));
    }
}
