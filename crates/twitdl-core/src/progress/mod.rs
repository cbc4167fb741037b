//! Progress tracking for a single download request.
//!
//! Backends push [`ProgressEvent`]s through a bounded channel; a
//! [`ProgressTracker`] drains it and drives a [`ProgressDisplay`].

mod display;
mod event;
mod tracker;

pub use display::{NoopDisplay, ProgressDisplay};
pub use event::{event_channel, ProgressEvent, ProgressReceiver, ProgressSender, EVENT_CHANNEL_CAPACITY};
pub use tracker::{ProgressState, ProgressTracker, PROCESSING_NOTICE};
