//! CLI command handlers. Each command is in its own file.

mod completions;
mod config;
mod download;
mod info;
mod interactive;

pub use completions::run_completions;
pub use config::{run_config_set_token, run_config_show};
pub use download::{run_download, DownloadArgs};
pub use info::run_info;
pub use interactive::run_interactive;
