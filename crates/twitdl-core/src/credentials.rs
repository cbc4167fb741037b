//! Optional bearer token, kept in a `.env` style file next to the config.
//!
//! The file is read with `dotenvy::from_path_iter`, so loading never touches
//! the process environment. The `BEARER_TOKEN` variable is a fallback.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const BEARER_TOKEN_KEY: &str = "BEARER_TOKEN";

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    bearer_token: Option<String>,
}

// Keep tokens out of debug logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("bearer_token", &self.masked_token())
            .finish()
    }
}

impl Credentials {
    pub fn new(bearer_token: Option<String>) -> Self {
        Self {
            bearer_token: bearer_token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    /// `abcdefgh...wxyz`; short tokens are fully masked.
    pub fn masked_token(&self) -> Option<String> {
        self.bearer_token.as_deref().map(mask_token)
    }
}

pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// `~/.config/twitdl/.env`
pub fn credentials_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("twitdl")?;
    Ok(xdg_dirs.get_config_home().join("twitdl").join(".env"))
}

/// Reads the token from `path` if it exists, else from the environment.
pub fn load_from(path: &Path) -> Result<Credentials> {
    if path.exists() {
        let iter = dotenvy::from_path_iter(path)
            .with_context(|| format!("open {}", path.display()))?;
        for item in iter {
            let (key, value) = item.with_context(|| format!("parse {}", path.display()))?;
            if key == BEARER_TOKEN_KEY {
                return Ok(Credentials::new(Some(value)));
            }
        }
    }
    Ok(Credentials::new(std::env::var(BEARER_TOKEN_KEY).ok()))
}

pub fn load() -> Result<Credentials> {
    load_from(&credentials_path()?)
}

/// Writes `BEARER_TOKEN=<token>` to `path`, replacing the file.
pub fn save_to(path: &Path, token: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, format!("{BEARER_TOKEN_KEY}={}\n", token.trim()))
        .with_context(|| format!("write {}", path.display()))?;
    tracing::info!("saved bearer token to {}", path.display());
    Ok(())
}
