//! Blocking line-oriented console I/O.
//!
//! # Responsibility
//! - Print prompts and read one answer per line.
//! - Re-prompt on unparseable numbers.
//!
//! # Invariants
//! - `Ok(None)` means input is exhausted; callers treat it as "exit".

use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// Prompt/answer console over any reader and writer.
pub struct Console<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writes one full line.
    pub fn say(&mut self, line: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", line.as_ref())
    }

    /// Prints `label` without a newline and reads the answer, trimmed of the
    /// line terminator.
    pub fn prompt_line(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Prompts until the answer parses as `T`.
    pub fn prompt_number<T: FromStr>(&mut self, label: &str) -> io::Result<Option<T>> {
        loop {
            let Some(answer) = self.prompt_line(label)? else {
                return Ok(None);
            };
            match answer.trim().parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => self.say("Please enter a valid whole number.")?,
            }
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
