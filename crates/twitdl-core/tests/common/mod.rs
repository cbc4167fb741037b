#![allow(dead_code)]

pub mod fake_backend;
pub mod recording_display;

use std::path::Path;
use twitdl_core::credentials::Credentials;
use twitdl_core::DownloadSettings;

pub fn settings_for(dir: &Path) -> DownloadSettings {
    DownloadSettings {
        download_dir: dir.to_path_buf(),
        user_agent: "twitdl/test".to_string(),
        credentials: Credentials::default(),
    }
}
