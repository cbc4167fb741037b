//! `twitdl config` – bearer token setup and a view of the active settings.

use anyhow::Result;
use std::path::Path;
use twitdl_core::config::{self, TwitdlConfig};
use twitdl_core::credentials::{self, Credentials};

use crate::cli::input::{prompt_confirmation, prompt_string};

/// Stores `token`, or prompts for one. A prompted token never silently
/// replaces an existing file.
pub fn run_config_set_token(token: Option<String>) -> Result<()> {
    let path = credentials::credentials_path()?;
    let token = match token {
        Some(t) => t,
        None => match prompt_token(&path)? {
            Some(t) => t,
            None => {
                println!("Bearer token unchanged.");
                return Ok(());
            }
        },
    };
    if token.trim().is_empty() {
        println!("Empty token; nothing saved.");
        return Ok(());
    }
    credentials::save_to(&path, &token)?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

/// Interactive token entry. `None` means the user backed out.
pub(crate) fn prompt_token(path: &Path) -> Result<Option<String>> {
    println!("Bearer token setup");
    println!("A token can be created at https://developer.twitter.com");
    if path.exists() && prompt_confirmation("A token is already stored. Overwrite?", false)? != Some(true)
    {
        return Ok(None);
    }
    prompt_string("Enter your bearer token (or 'back')")
}

pub fn run_config_show(cfg: &TwitdlConfig) -> Result<()> {
    let creds = credentials::load()?;
    print!("{}", render_config(cfg, &creds));
    if let Ok(path) = config::config_path() {
        println!("Config file:    {}", path.display());
    }
    Ok(())
}

pub(crate) fn render_config(cfg: &TwitdlConfig, creds: &Credentials) -> String {
    let token = creds
        .masked_token()
        .unwrap_or_else(|| "not configured".to_string());
    format!(
        "Bearer token:   {token}\n\
         Download dir:   {}\n\
         Quality:        {}\n\
         yt-dlp:         {}\n\
         User-Agent:     {}\n",
        cfg.effective_download_dir().display(),
        cfg.default_quality,
        cfg.ytdlp_path.display(),
        cfg.effective_user_agent(),
    )
}
