//! Stdin prompts for the interactive menu.
//!
//! Every prompt returns `Ok(None)` when stdin is closed so the menu can exit
//! cleanly instead of spinning on empty reads.
//!
//! Once a Ctrl-C listener is installed the default SIGINT exit is gone, so
//! the menu runs each blocking prompt through [`ask_or_interrupt`].

use anyhow::{Context, Result};
use std::future::Future;
use std::io::{self, BufRead, Write};

/// Word that backs out of any prompt.
pub const BACK: &str = "back";

/// Resolves on Ctrl-C. Never resolves if the listener cannot be installed.
pub async fn ctrl_c_pressed() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Result of a prompt raced against an interrupt.
#[derive(Debug, PartialEq, Eq)]
pub enum Answer<T> {
    Given(T),
    Interrupted,
}

/// Runs `prompt` on the blocking pool and returns early if `interrupt`
/// resolves first. An interrupted prompt keeps its thread blocked on stdin.
pub async fn ask_or_interrupt<T, F, I>(prompt: F, interrupt: I) -> Result<Answer<T>>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
    I: Future<Output = ()>,
{
    let task = tokio::task::spawn_blocking(prompt);
    tokio::select! {
        joined = task => Ok(Answer::Given(joined.context("prompt task failed")??)),
        () = interrupt => Ok(Answer::Interrupted),
    }
}

fn read_trimmed_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("Failed to read user input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn ask(prompt: &str) -> Result<Option<String>> {
    print!("{prompt} ");
    io::stdout().flush().context("Failed to flush stdout")?;
    read_trimmed_line(&mut io::stdin().lock())
}

/// Free text. `back` yields `None`.
pub fn prompt_string(prompt: &str) -> Result<Option<String>> {
    Ok(ask(&format!("{prompt}:"))?.filter(|s| !s.eq_ignore_ascii_case(BACK)))
}

/// Free text with a default used on empty input.
pub fn prompt_string_with_default(prompt: &str, default: &str) -> Result<Option<String>> {
    let answer = prompt_string(&format!("{prompt} [{default}]"))?;
    Ok(answer.map(|s| if s.is_empty() { default.to_string() } else { s }))
}

/// Yes/no. Empty input takes `default`.
pub fn prompt_confirmation(prompt: &str, default: bool) -> Result<Option<bool>> {
    let hint = if default { "(Y/n)" } else { "(y/N)" };
    loop {
        let Some(input) = ask(&format!("{prompt} {hint}"))? else {
            return Ok(None);
        };
        match parse_yes_no(&input, default) {
            Some(answer) => return Ok(Some(answer)),
            None => eprintln!("Please enter 'y' for yes or 'n' for no."),
        }
    }
}

/// Numbered menu. Returns the chosen index; empty input picks `default`.
pub fn prompt_choice(prompt: &str, choices: &[&str], default: Option<usize>) -> Result<Option<usize>> {
    println!("{prompt}");
    for (i, choice) in choices.iter().enumerate() {
        let marker = if Some(i) == default { " (default)" } else { "" };
        println!("  {}) {choice}{marker}", i + 1);
    }
    loop {
        let Some(input) = ask(">")? else {
            return Ok(None);
        };
        match parse_choice(&input, choices, default) {
            Some(i) => return Ok(Some(i)),
            None => eprintln!("Please enter a number between 1 and {}.", choices.len()),
        }
    }
}

fn parse_yes_no(input: &str, default: bool) -> Option<bool> {
    match input.to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        "" => Some(default),
        _ => None,
    }
}

/// Accepts a 1-based number or the choice text itself.
fn parse_choice(input: &str, choices: &[&str], default: Option<usize>) -> Option<usize> {
    if input.is_empty() {
        return default;
    }
    if let Ok(n) = input.parse::<usize>() {
        return (1..=choices.len()).contains(&n).then(|| n - 1);
    }
    choices.iter().position(|c| c.eq_ignore_ascii_case(input))
}
