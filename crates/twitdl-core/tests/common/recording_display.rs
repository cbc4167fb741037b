//! Display that records every call into a shared log the test keeps a handle to.

use std::sync::{Arc, Mutex};
use twitdl_core::progress::ProgressDisplay;

#[derive(Debug, Default, Clone)]
pub struct DisplayLog {
    pub starts: Vec<Option<u64>>,
    pub increments: Vec<u64>,
    pub notices: Vec<String>,
    pub finished: usize,
    pub abandoned: Vec<String>,
}

#[derive(Debug, Default, Clone)]
pub struct RecordingDisplay {
    log: Arc<Mutex<DisplayLog>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> DisplayLog {
        self.log.lock().unwrap().clone()
    }
}

impl ProgressDisplay for RecordingDisplay {
    fn start(&mut self, total: Option<u64>) {
        self.log.lock().unwrap().starts.push(total);
    }
    fn set_total(&mut self, _total: u64) {}
    fn advance(&mut self, delta: u64) {
        self.log.lock().unwrap().increments.push(delta);
    }
    fn notice(&mut self, message: &str) {
        self.log.lock().unwrap().notices.push(message.to_string());
    }
    fn finish(&mut self) {
        self.log.lock().unwrap().finished += 1;
    }
    fn abandon(&mut self, reason: &str) {
        self.log.lock().unwrap().abandoned.push(reason.to_string());
    }
}
