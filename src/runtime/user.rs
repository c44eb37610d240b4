//! User interaction operations (line prompts and confirmations).

use anyhow::Result;

use super::RealRuntime;

use std::io::{self, BufRead, Write};

/// Write a prompt and read one trimmed line of input.
///
/// Returns `None` when input is exhausted, so callers can stop instead of
/// spinning on an empty answer.
pub fn ask_with_io<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> Result<Option<String>> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Ask a yes/no question where anything but y/yes (or end of input) means no.
pub fn confirm_with_io<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    let answer = ask_with_io(&format!("{} [y/N] ", prompt), input, output)?;
    Ok(matches!(
        answer.map(|a| a.to_lowercase()).as_deref(),
        Some("y") | Some("yes")
    ))
}

impl RealRuntime {
    pub(crate) fn confirm_impl(&self, prompt: &str) -> Result<bool> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut stdin_lock = stdin.lock();
        confirm_with_io(prompt, &mut stdin_lock, &mut stdout)
    }
}
