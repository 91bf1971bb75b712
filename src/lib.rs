//! Single-screen photo text recognition: capture a still from the rear
//! camera, hand it to a text recognizer, show what came back.

pub mod error;
pub mod events;
pub mod model;
pub mod orientation;
pub mod provider;
pub mod services;
pub mod settings;
pub mod state_machine;
pub mod store;

pub use state_machine::{ActionOutcome, CaptureController};
