pub mod config;
pub mod credentials;
pub mod logging;

pub mod backend;
pub mod downloader;
pub mod error;
pub mod paths;
pub mod progress;
pub mod quality;
pub mod url_model;

pub use downloader::{DownloadRequest, DownloadSettings, Downloader};
pub use error::DownloadError;
pub use quality::{FormatSpec, QualityTier};
