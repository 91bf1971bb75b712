//! Results posted back to the controller by its collaborators.

use std::fmt;

use crossbeam_channel::{Receiver, Sender};

use crate::error::{CaptureError, RecognitionError};

/// Identity of one outstanding capture or recognition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    PhotoCaptured {
        request: RequestId,
        result: Result<Vec<u8>, CaptureError>,
    },
    RecognitionFinished {
        request: RequestId,
        result: Result<String, RecognitionError>,
    },
}

impl ControllerEvent {
    pub fn request(&self) -> RequestId {
        match self {
            ControllerEvent::PhotoCaptured { request, .. }
            | ControllerEvent::RecognitionFinished { request, .. } => *request,
        }
    }
}

pub type EventSender = Sender<ControllerEvent>;
pub type EventReceiver = Receiver<ControllerEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    crossbeam_channel::unbounded()
}

/// Post a collaborator result. A closed channel means the screen is gone,
/// so the result has nowhere to land.
pub fn post(reply: &EventSender, event: ControllerEvent) {
    let request = event.request();
    if reply.send(event).is_err() {
        tracing::debug!(request = %request, "controller gone; dropping result");
    }
}
