//! Scripted in-process backend for orchestrator tests.
//!
//! Replays a fixed list of progress events and optionally writes a body to
//! the requested output path, without spawning anything.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use twitdl_core::backend::{
    BackendError, ExtractionBackend, FormatInfo, MediaInfo, RequestHeaders, TransferOptions,
};
use twitdl_core::progress::{ProgressEvent, ProgressSender};

#[derive(Debug, Clone)]
pub enum ProbeOutcome {
    Media(MediaInfo),
    NoMedia,
    Fail(String),
}

pub struct ScriptedBackend {
    pub probe: ProbeOutcome,
    pub events: Vec<ProgressEvent>,
    /// Body written to the output path; `None` leaves the path untouched.
    pub body: Mutex<Option<Vec<u8>>>,
    pub transfer_error: Option<String>,
    /// Never return from `transfer` once the body is written.
    pub stall: bool,
    pub probes: AtomicUsize,
    pub transfers: AtomicUsize,
    pub seen_headers: Mutex<Vec<RequestHeaders>>,
    pub seen_options: Mutex<Vec<TransferOptions>>,
}

pub fn mp4_media(id: &str) -> MediaInfo {
    MediaInfo {
        id: id.to_string(),
        title: Some(format!("post {id}")),
        duration: Some(9.0),
        formats: vec![FormatInfo {
            format_id: "http-832".into(),
            ext: "mp4".into(),
            filesize: Some(8),
            height: Some(480),
        }],
        url: None,
        entries: None,
    }
}

impl ScriptedBackend {
    /// One mp4, a short progress run, and a successful write.
    pub fn succeeding(id: &str, body: &[u8]) -> Self {
        let total = body.len() as u64;
        Self::new(ProbeOutcome::Media(mp4_media(id)))
            .with_events(vec![
                ProgressEvent::Downloading {
                    downloaded_bytes: 0,
                    total_bytes: Some(total),
                },
                ProgressEvent::Downloading {
                    downloaded_bytes: total / 2,
                    total_bytes: Some(total),
                },
                ProgressEvent::Downloading {
                    downloaded_bytes: total,
                    total_bytes: Some(total),
                },
                ProgressEvent::Finished,
            ])
            .with_body(body)
    }

    pub fn new(probe: ProbeOutcome) -> Self {
        Self {
            probe,
            events: Vec::new(),
            body: Mutex::new(None),
            transfer_error: None,
            stall: false,
            probes: AtomicUsize::new(0),
            transfers: AtomicUsize::new(0),
            seen_headers: Mutex::new(Vec::new()),
            seen_options: Mutex::new(Vec::new()),
        }
    }

    pub fn with_events(mut self, events: Vec<ProgressEvent>) -> Self {
        self.events = events;
        self
    }

    pub fn with_body(self, body: &[u8]) -> Self {
        *self.body.lock().unwrap() = Some(body.to_vec());
        self
    }

    pub fn failing_transfer(mut self, message: &str) -> Self {
        self.transfer_error = Some(message.to_string());
        self
    }

    pub fn stalling(mut self) -> Self {
        self.stall = true;
        self
    }

    pub fn set_body(&self, body: &[u8]) {
        *self.body.lock().unwrap() = Some(body.to_vec());
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn transfer_count(&self) -> usize {
        self.transfers.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExtractionBackend for ScriptedBackend {
    async fn probe(
        &self,
        _url: &str,
        headers: &RequestHeaders,
    ) -> Result<Option<MediaInfo>, BackendError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.seen_headers.lock().unwrap().push(headers.clone());
        match &self.probe {
            ProbeOutcome::Media(info) => Ok(Some(info.clone())),
            ProbeOutcome::NoMedia => Ok(None),
            ProbeOutcome::Fail(m) => Err(BackendError::Failed(m.clone())),
        }
    }

    async fn transfer(
        &self,
        _url: &str,
        options: &TransferOptions,
        events: ProgressSender,
    ) -> Result<(), BackendError> {
        self.transfers.fetch_add(1, Ordering::SeqCst);
        self.seen_options.lock().unwrap().push(options.clone());
        for event in &self.events {
            let _ = events.send(event.clone()).await;
        }
        let body = self.body.lock().unwrap().clone();
        if let Some(body) = body {
            std::fs::write(&options.output_path, body)
                .map_err(|e| BackendError::Unexpected(e.to_string()))?;
        }
        if self.stall {
            std::future::pending::<()>().await;
        }
        if let Some(message) = &self.transfer_error {
            let _ = events.send(ProgressEvent::Failed(message.clone())).await;
            return Err(BackendError::Failed(message.clone()));
        }
        Ok(())
    }
}
