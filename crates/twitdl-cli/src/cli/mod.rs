//! CLI for the twitdl video downloader.

mod commands;
mod input;
mod progress;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use twitdl_core::config;
use twitdl_core::QualityTier;

use commands::{
    run_completions, run_config_set_token, run_config_show, run_download, run_info,
    run_interactive, DownloadArgs,
};

/// Top-level CLI. Without a subcommand it opens the interactive menu.
#[derive(Debug, Parser)]
#[command(name = "twitdl", version)]
#[command(about = "Download videos from Twitter/X posts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download the video from a post.
    Download {
        /// Post URL (https://twitter.com/... or https://x.com/...).
        url: String,

        /// Output file. Relative paths are placed under the download directory.
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Quality tier: best, medium or low. Defaults to the configured quality.
        #[arg(short, long, value_name = "TIER")]
        quality: Option<QualityTier>,

        /// Save directory for this run (overrides config).
        #[arg(long, value_name = "DIR")]
        download_dir: Option<PathBuf>,
    },

    /// Show title, duration and available mp4 formats without downloading.
    Info {
        /// Post URL.
        url: String,
    },

    /// Manage the bearer token and show current settings.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print a shell completion script to stdout.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Store a bearer token. Prompts for it when omitted.
    SetToken {
        /// Token value.
        token: Option<String>,
    },

    /// Show the active configuration (token masked).
    Show,
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        // Completions need neither config nor credentials.
        if let Some(CliCommand::Completions { shell }) = &cli.command {
            return run_completions(*shell);
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            None => run_interactive(&cfg).await?,
            Some(CliCommand::Download {
                url,
                output,
                quality,
                download_dir,
            }) => {
                let args = DownloadArgs {
                    url,
                    output,
                    quality: quality.unwrap_or(cfg.default_quality),
                    download_dir,
                };
                run_download(&cfg, args).await?;
            }
            Some(CliCommand::Info { url }) => run_info(&cfg, &url).await?,
            Some(CliCommand::Config { action }) => match action {
                ConfigAction::SetToken { token } => run_config_set_token(token)?,
                ConfigAction::Show => run_config_show(&cfg)?,
            },
            Some(CliCommand::Completions { .. }) => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
