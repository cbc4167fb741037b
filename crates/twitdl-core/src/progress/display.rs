//! Presentation side of progress tracking.
//!
//! The tracker drives a [`ProgressDisplay`]; the CLI provides a terminal
//! implementation and everything else can use [`NoopDisplay`].

/// Receives rendering commands from a [`super::ProgressTracker`].
///
/// The tracker calls `start` at most once, and at most one of `finish` /
/// `abandon`, always after `start`.
pub trait ProgressDisplay: Send {
    /// Open the display. `None` means the size is unknown; render an indeterminate indicator.
    fn start(&mut self, total: Option<u64>);

    /// The expected total changed or became known after `start`.
    fn set_total(&mut self, total: u64);

    /// Move the indicator forward by `delta` bytes.
    fn advance(&mut self, delta: u64);

    /// Print a line without disturbing the indicator.
    fn notice(&mut self, message: &str);

    /// Close after a successful transfer.
    fn finish(&mut self);

    /// Close after a failure.
    fn abandon(&mut self, reason: &str);
}

/// Display that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDisplay;

impl ProgressDisplay for NoopDisplay {
    fn start(&mut self, _total: Option<u64>) {}
    fn set_total(&mut self, _total: u64) {}
    fn advance(&mut self, _delta: u64) {}
    fn notice(&mut self, _message: &str) {}
    fn finish(&mut self) {}
    fn abandon(&mut self, _reason: &str) {}
}

impl<D: ProgressDisplay + ?Sized> ProgressDisplay for Box<D> {
    fn start(&mut self, total: Option<u64>) {
        (**self).start(total)
    }
    fn set_total(&mut self, total: u64) {
        (**self).set_total(total)
    }
    fn advance(&mut self, delta: u64) {
        (**self).advance(delta)
    }
    fn notice(&mut self, message: &str) {
        (**self).notice(message)
    }
    fn finish(&mut self) {
        (**self).finish()
    }
    fn abandon(&mut self, reason: &str) {
        (**self).abandon(reason)
    }
}
