//! Per-request progress state machine: `Idle -> Downloading -> Finished | Failed`.

use super::display::ProgressDisplay;
use super::event::{ProgressEvent, ProgressReceiver};

/// Notice shown once the transfer is done and the backend starts muxing.
pub const PROCESSING_NOTICE: &str = "Processing video...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressState {
    Idle,
    Downloading {
        downloaded_bytes: u64,
        total_bytes: Option<u64>,
    },
    Finished,
    Failed(String),
}

impl ProgressState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressState::Finished | ProgressState::Failed(_))
    }
}

/// Turns backend events into display updates. One instance per request.
pub struct ProgressTracker<D> {
    state: ProgressState,
    /// Highest cumulative byte count applied to the display.
    last_downloaded: u64,
    display: D,
    display_open: bool,
}

impl<D: ProgressDisplay> ProgressTracker<D> {
    pub fn new(display: D) -> Self {
        Self {
            state: ProgressState::Idle,
            last_downloaded: 0,
            display,
            display_open: false,
        }
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn handle(&mut self, event: ProgressEvent) {
        if self.state.is_terminal() {
            tracing::debug!(?event, state = ?self.state, "progress event after terminal state ignored");
            return;
        }
        match event {
            ProgressEvent::Downloading {
                downloaded_bytes,
                total_bytes,
            } => self.on_downloading(downloaded_bytes, total_bytes),
            ProgressEvent::Finished => {
                self.close_display(None);
                self.state = ProgressState::Finished;
                self.display.notice(PROCESSING_NOTICE);
            }
            ProgressEvent::Failed(reason) => {
                self.close_display(Some(&reason));
                self.state = ProgressState::Failed(reason);
            }
        }
    }

    fn on_downloading(&mut self, downloaded: u64, total: Option<u64>) {
        let known_total = match &self.state {
            ProgressState::Downloading { total_bytes, .. } => *total_bytes,
            _ => {
                self.display.start(total);
                self.display_open = true;
                total
            }
        };

        let total = match (known_total, total) {
            (Some(old), Some(new)) if old != new => {
                self.display.set_total(new);
                Some(new)
            }
            (None, Some(new)) => {
                self.display.set_total(new);
                Some(new)
            }
            (old, _) => old,
        };

        // Out-of-order or repeated events carry a count at or below the last one.
        if downloaded > self.last_downloaded {
            self.display.advance(downloaded - self.last_downloaded);
            self.last_downloaded = downloaded;
        }

        self.state = ProgressState::Downloading {
            downloaded_bytes: self.last_downloaded,
            total_bytes: total,
        };
    }

    /// Closes the display if it is still open. Safe to call repeatedly.
    pub fn close_display(&mut self, failure: Option<&str>) {
        if !self.display_open {
            return;
        }
        self.display_open = false;
        match failure {
            Some(reason) => self.display.abandon(reason),
            None => self.display.finish(),
        }
    }

    /// Drains `events` until every sender is dropped.
    pub async fn run(mut self, mut events: ProgressReceiver) -> Self {
        while let Some(event) = events.recv().await {
            self.handle(event);
        }
        self
    }

    pub fn into_display(self) -> D {
        self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::event_channel;

    #[derive(Default)]
    struct Recording {
        starts: Vec<Option<u64>>,
        totals: Vec<u64>,
        increments: Vec<u64>,
        notices: Vec<String>,
        finished: usize,
        abandoned: Vec<String>,
    }

    impl ProgressDisplay for Recording {
        fn start(&mut self, total: Option<u64>) {
            self.starts.push(total);
        }
        fn set_total(&mut self, total: u64) {
            self.totals.push(total);
        }
        fn advance(&mut self, delta: u64) {
            self.increments.push(delta);
        }
        fn notice(&mut self, message: &str) {
            self.notices.push(message.to_string());
        }
        fn finish(&mut self) {
            self.finished += 1;
        }
        fn abandon(&mut self, reason: &str) {
            self.abandoned.push(reason.to_string());
        }
    }

    fn downloading(n: u64, total: Option<u64>) -> ProgressEvent {
        ProgressEvent::Downloading {
            downloaded_bytes: n,
            total_bytes: total,
        }
    }

    #[test]
    fn non_positive_deltas_are_ignored() {
        let mut t = ProgressTracker::new(Recording::default());
        for n in [0, 100, 250, 200, 400] {
            t.handle(downloading(n, Some(1000)));
        }
        assert_eq!(
            t.state(),
            &ProgressState::Downloading {
                downloaded_bytes: 400,
                total_bytes: Some(1000)
            }
        );
        let d = t.into_display();
        assert_eq!(d.starts, vec![Some(1000)]);
        assert_eq!(d.increments, vec![100, 150, 200]);
        assert_eq!(d.finished, 0);
    }

    #[test]
    fn unknown_total_starts_indeterminate() {
        let mut t = ProgressTracker::new(Recording::default());
        t.handle(downloading(10, None));
        t.handle(downloading(30, Some(90)));
        let d = t.into_display();
        assert_eq!(d.starts, vec![None]);
        assert_eq!(d.totals, vec![90]);
        assert_eq!(d.increments, vec![10, 20]);
    }

    #[test]
    fn finished_closes_and_notifies() {
        let mut t = ProgressTracker::new(Recording::default());
        t.handle(downloading(50, Some(50)));
        t.handle(ProgressEvent::Finished);
        assert_eq!(t.state(), &ProgressState::Finished);
        let d = t.into_display();
        assert_eq!(d.finished, 1);
        assert_eq!(d.notices, vec![PROCESSING_NOTICE.to_string()]);
    }

    #[test]
    fn finished_without_downloading_events() {
        let mut t = ProgressTracker::new(Recording::default());
        t.handle(ProgressEvent::Finished);
        assert_eq!(t.state(), &ProgressState::Finished);
        let d = t.into_display();
        assert!(d.starts.is_empty());
        assert_eq!(d.finished, 0);
        assert_eq!(d.notices.len(), 1);
    }

    #[test]
    fn failure_carries_reason() {
        let mut t = ProgressTracker::new(Recording::default());
        t.handle(downloading(5, None));
        t.handle(ProgressEvent::Failed("HTTP Error 403".into()));
        assert_eq!(t.state(), &ProgressState::Failed("HTTP Error 403".into()));
        let d = t.into_display();
        assert_eq!(d.abandoned, vec!["HTTP Error 403".to_string()]);
        assert_eq!(d.finished, 0);
    }

    #[test]
    fn events_after_terminal_state_are_ignored() {
        let mut t = ProgressTracker::new(Recording::default());
        t.handle(downloading(5, Some(10)));
        t.handle(ProgressEvent::Finished);
        t.handle(downloading(10, Some(10)));
        t.handle(ProgressEvent::Failed("late".into()));
        t.handle(ProgressEvent::Finished);
        assert_eq!(t.state(), &ProgressState::Finished);
        let d = t.into_display();
        assert_eq!(d.increments, vec![5]);
        assert_eq!(d.finished, 1);
        assert_eq!(d.notices.len(), 1);
        assert!(d.abandoned.is_empty());
    }

    #[test]
    fn double_close_is_harmless() {
        let mut t = ProgressTracker::new(Recording::default());
        t.handle(downloading(1, None));
        t.close_display(None);
        t.close_display(None);
        t.close_display(Some("again"));
        let d = t.into_display();
        assert_eq!(d.finished, 1);
        assert!(d.abandoned.is_empty());
    }

    #[tokio::test]
    async fn run_drains_channel_until_closed() {
        let (tx, rx) = event_channel();
        let tracker = ProgressTracker::new(Recording::default());
        let producer = async move {
            for n in [0, 100, 250, 200, 400] {
                tx.send(downloading(n, Some(1000))).await.unwrap();
            }
            tx.send(ProgressEvent::Finished).await.unwrap();
        };
        let (_, tracker) = tokio::join!(producer, tracker.run(rx));
        assert_eq!(tracker.state(), &ProgressState::Finished);
        assert_eq!(tracker.into_display().increments, vec![100, 150, 200]);
    }
}
