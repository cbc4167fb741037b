//! `twitdl` with no subcommand – menu-driven session.
//!
//! Failures are printed with tips and the menu comes back; only "Exit", a
//! closed stdin or Ctrl-C at a prompt ends the session.

use anyhow::Result;
use std::path::{Path, PathBuf};
use twitdl_core::config::TwitdlConfig;
use twitdl_core::credentials;
use twitdl_core::paths;
use twitdl_core::url_model::{is_supported_post_url, resource_id_from_url, SUPPORTED_PREFIXES};
use twitdl_core::{DownloadError, DownloadRequest, QualityTier};

use super::config::{prompt_token, render_config};
use super::download::{build_downloader, download_until_interrupted, print_tips, Outcome};
use crate::cli::input::{
    ask_or_interrupt, ctrl_c_pressed, prompt_choice, prompt_confirmation, prompt_string,
    prompt_string_with_default, Answer, BACK,
};

const MAIN_MENU: [&str; 4] = ["Download a video", "Configure settings", "Show information", "Exit"];
const CONFIG_MENU: [&str; 3] = [
    "Set up bearer token",
    "Show current configuration",
    "Back to main menu",
];

/// Where a workflow hands control back to.
enum Flow {
    Menu,
    Interrupted,
}

/// A prompt answer, or the reason there is none.
enum Reply<T> {
    Value(T),
    Back,
    Interrupted,
}

/// Blocking prompt raced against Ctrl-C.
async fn ask<T, F>(prompt: F) -> Result<Reply<T>>
where
    T: Send + 'static,
    F: FnOnce() -> Result<Option<T>> + Send + 'static,
{
    Ok(match ask_or_interrupt(prompt, ctrl_c_pressed()).await? {
        Answer::Given(Some(v)) => Reply::Value(v),
        Answer::Given(None) => Reply::Back,
        Answer::Interrupted => Reply::Interrupted,
    })
}

pub async fn run_interactive(cfg: &TwitdlConfig) -> Result<()> {
    print_welcome();
    loop {
        let choice = ask(|| prompt_choice("What would you like to do?", &MAIN_MENU, None)).await?;
        let flow = match choice {
            Reply::Value(0) => download_workflow(cfg).await,
            Reply::Value(1) => config_workflow(cfg).await,
            Reply::Value(2) => {
                show_information(cfg).await;
                Ok(Flow::Menu)
            }
            Reply::Interrupted => Ok(Flow::Interrupted),
            _ => {
                println!("Goodbye!");
                return Ok(());
            }
        };
        match flow {
            Ok(Flow::Menu) => {}
            Ok(Flow::Interrupted) => {
                println!();
                println!("Operation cancelled by user");
                // The interrupted prompt's thread is still blocked on stdin,
                // which would stall runtime shutdown.
                std::process::exit(0);
            }
            Err(err) => eprintln!("Error: {err:#}"),
        }
    }
}

fn print_welcome() {
    println!("Twitter/X video downloader");
    println!();
    println!("  1. Paste a post URL");
    println!("  2. Choose video quality");
    println!("  3. Download!");
    println!();
    println!("Type '{BACK}' at any prompt to return to the menu, Ctrl-C to quit.");
    println!();
}

async fn download_workflow(cfg: &TwitdlConfig) -> Result<Flow> {
    let url = match ask(prompt_post_url).await? {
        Reply::Value(url) => url,
        Reply::Back => return Ok(Flow::Menu),
        Reply::Interrupted => return Ok(Flow::Interrupted),
    };

    let default = QualityTier::ALL.iter().position(|q| *q == cfg.default_quality);
    let index = match ask(move || {
        let qualities: Vec<&str> = QualityTier::ALL.iter().map(|q| q.as_str()).collect();
        prompt_choice("Select video quality:", &qualities, default)
    })
    .await?
    {
        Reply::Value(i) => i,
        Reply::Back => return Ok(Flow::Menu),
        Reply::Interrupted => return Ok(Flow::Interrupted),
    };
    let quality = QualityTier::ALL[index];

    let downloader = build_downloader(cfg, None)?;
    let custom = match ask(|| {
        prompt_confirmation("Specify a custom save location? (default: Downloads folder)", false)
    })
    .await?
    {
        Reply::Value(custom) => custom,
        Reply::Back => return Ok(Flow::Menu),
        Reply::Interrupted => return Ok(Flow::Interrupted),
    };
    let output = if custom {
        let suggestion = suggested_output(&url, &downloader.settings().download_dir)?
            .display()
            .to_string();
        match ask(move || prompt_string_with_default("Output path", &suggestion)).await? {
            Reply::Value(p) => Some(PathBuf::from(p)),
            Reply::Back => return Ok(Flow::Menu),
            Reply::Interrupted => return Ok(Flow::Interrupted),
        }
    } else {
        None
    };

    let request = DownloadRequest::new(url, output, quality);
    println!();
    println!("Downloading video from: {}", request.url());
    match download_until_interrupted(&downloader, &request).await {
        Ok(Outcome::Saved(path)) => {
            println!();
            println!("Video downloaded successfully to: {}", path.display());
            print_next_steps();
        }
        Ok(Outcome::Cancelled) => {
            println!();
            println!("Download cancelled.");
        }
        Err(err) => {
            eprintln!();
            eprintln!("Download failed: {err}");
            print_tips(&err);
        }
    }
    Ok(Flow::Menu)
}

/// Post URLs the menu accepts: a recognized prefix and a usable identifier.
fn is_downloadable_url(url: &str) -> bool {
    is_supported_post_url(url) && resource_id_from_url(url).is_ok()
}

/// Re-asks until the input is a post URL.
fn prompt_post_url() -> Result<Option<String>> {
    loop {
        let Some(url) = prompt_string("Enter the post URL")? else {
            return Ok(None);
        };
        if is_downloadable_url(&url) {
            return Ok(Some(url));
        }
        eprintln!(
            "The URL must start with {} and point at a post.",
            SUPPORTED_PREFIXES.join(" or ")
        );
    }
}

/// Default offered at the "Output path" prompt: the file a plain download would create.
fn suggested_output(url: &str, save_dir: &Path) -> Result<PathBuf, DownloadError> {
    paths::output_path_for(url, None, save_dir)
}

fn print_next_steps() {
    println!();
    println!("What's next?");
    println!("  - Download another video");
    println!("  - Change settings");
    println!("  - Exit the program");
    println!();
}

async fn config_workflow(cfg: &TwitdlConfig) -> Result<Flow> {
    loop {
        let choice = match ask(|| prompt_choice("Configuration options:", &CONFIG_MENU, None)).await? {
            Reply::Value(c) => c,
            Reply::Back => return Ok(Flow::Menu),
            Reply::Interrupted => return Ok(Flow::Interrupted),
        };
        let step = match choice {
            0 => set_token().await,
            1 => show_config(cfg),
            _ => return Ok(Flow::Menu),
        };
        match step {
            Ok(Flow::Menu) => {}
            Ok(Flow::Interrupted) => return Ok(Flow::Interrupted),
            Err(err) => eprintln!("Error: {err:#}"),
        }
    }
}

async fn set_token() -> Result<Flow> {
    let path = credentials::credentials_path()?;
    let prompt_path = path.clone();
    match ask(move || prompt_token(&prompt_path)).await? {
        Reply::Value(token) if !token.trim().is_empty() => {
            credentials::save_to(&path, &token)?;
            println!("Configuration saved successfully.");
        }
        Reply::Interrupted => return Ok(Flow::Interrupted),
        _ => println!("Bearer token unchanged."),
    }
    Ok(Flow::Menu)
}

fn show_config(cfg: &TwitdlConfig) -> Result<Flow> {
    let creds = credentials::load()?;
    println!();
    print!("{}", render_config(cfg, &creds));
    println!();
    Ok(Flow::Menu)
}

async fn show_information(cfg: &TwitdlConfig) {
    let downloader = match build_downloader(cfg, None) {
        Ok(d) => d,
        Err(err) => {
            eprintln!("Cannot load settings: {err:#}");
            return;
        }
    };
    let backend_version = match downloader.backend().version().await {
        Ok(v) => format!("yt-dlp {v}"),
        Err(err) => format!("unavailable ({err})"),
    };
    println!();
    println!("twitdl {}", env!("CARGO_PKG_VERSION"));
    println!("A command-line tool to download videos from Twitter/X.");
    println!();
    println!("Features:");
    println!("  - Download videos in best, medium or low quality");
    println!("  - Custom output file names and save locations");
    println!("  - Bearer token and settings stored under your config directory");
    println!();
    println!("Backend:        {backend_version}");
    println!("Save directory: {}", downloader.settings().download_dir.display());
    println!();
}
