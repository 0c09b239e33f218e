//! Interactive confirmation before expensive searches.

use log::{info, warn};
use std::io::{self, BufRead, Write};

use crate::error::{Error, Result};

/// Re-prompt shown after an answer other than `y` or `n`.
pub const RETRY_MESSAGE: &str = "Please enter either \"y\" or \"n\".";

/// A source of yes/no answers.
pub trait Prompt {
    /// Shows `message` and returns the next answer, or `None` once input is exhausted.
    fn ask(&mut self, message: &str) -> Result<Option<String>>;
}

/// Asks on stdout and reads answers line by line from stdin.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, message: &str) -> Result<Option<String>> {
        let mut stdout = io::stdout();
        writeln!(stdout, "{}", message)?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Answers `y` to every question, for non-interactive runs.
#[derive(Debug, Default)]
pub struct AssumeYes;

impl Prompt for AssumeYes {
    fn ask(&mut self, message: &str) -> Result<Option<String>> {
        info!("Confirmation assumed: {}", message.lines().next().unwrap_or_default());
        Ok(Some("y".to_string()))
    }
}

/// The warning shown before a search of `max_results` tweets.
pub fn large_request_message(max_results: usize) -> String {
    format!(
        "Warning: Retrieving {0} Tweets will result in a large number of API calls. \
         The Twitter API only allows a limited number of calls, so make sure you have \
         the capacity to retrieve {0} Tweets.\n\nDo you want to continue? [y/n]",
        max_results
    )
}

/// Asks whether a search of `max_results` tweets should go ahead.
///
/// Only the exact answers `y` and `n` are accepted; anything else is asked
/// again with [`RETRY_MESSAGE`].
///
/// # Errors
///
/// [`Error::UserAborted`] on `n` or when the prompt runs out of input.
pub fn confirm_large_request<P: Prompt + ?Sized>(
    prompt: &mut P,
    max_results: usize,
) -> Result<()> {
    let mut answer = prompt.ask(&large_request_message(max_results))?;

    loop {
        match answer.as_deref() {
            Some("y") => return Ok(()),
            Some("n") => {
                warn!("Search of {} tweets declined", max_results);
                return Err(Error::UserAborted);
            }
            None => {
                warn!("Confirmation input closed, stopping search");
                return Err(Error::UserAborted);
            }
            Some(_) => answer = prompt.ask(RETRY_MESSAGE)?,
        }
    }
}
