//! Typed progress events sent by a backend during one transfer.

/// One status notification from the backend. Events for a single request are
/// delivered in sequence but byte counts are not guaranteed to be monotonic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Bytes transferred so far for the whole request, and the expected total if known.
    Downloading {
        downloaded_bytes: u64,
        total_bytes: Option<u64>,
    },
    /// Transfer done; the backend may still be muxing or post-processing.
    Finished,
    /// The backend gave up; carries its error text.
    Failed(String),
}

/// Sending half of the bounded event channel handed to a backend.
pub type ProgressSender = tokio::sync::mpsc::Sender<ProgressEvent>;
/// Receiving half, drained by the tracker.
pub type ProgressReceiver = tokio::sync::mpsc::Receiver<ProgressEvent>;

/// Capacity of the per-request event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Creates the bounded channel for one request.
pub fn event_channel() -> (ProgressSender, ProgressReceiver) {
    tokio::sync::mpsc::channel(EVENT_CHANNEL_CAPACITY)
}
