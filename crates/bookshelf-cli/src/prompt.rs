//! Line-oriented input helpers
//!
//! The shell reads through these with any `BufRead`/`Write` pair so sessions
//! can be scripted in tests.

use anyhow::Result;
use std::io::{self, BufRead, Write};

/// Print `prompt` and read one line of input
///
/// Only the line terminator is removed; other whitespace is part of the
/// answer. Returns `None` at end of input.
pub fn read_line<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(out, "{}", prompt)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Some(line))
}

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    let stdin = io::stdin();
    let answer = read_line(&mut stdin.lock(), &mut io::stdout(), &format!("{} [y/N] ", prompt))?;

    let answer = answer.unwrap_or_default().trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
