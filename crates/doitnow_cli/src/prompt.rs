//! Line-oriented operator prompts.
//!
//! All interactive validation lives here: callers describe how to parse and
//! check one answer, and `prompt_until` re-asks until both pass.

use crate::views::info_box;
use std::io::{self, BufRead, ErrorKind, Write};

/// Prompt reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writes `text` followed by a newline.
    pub fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// Writes `message` inside an info box.
    pub fn notice(&mut self, message: &str) -> io::Result<()> {
        self.say(&info_box(message))
    }

    /// Shows `message` and reads one line, without its line terminator.
    ///
    /// # Errors
    /// - `UnexpectedEof` once input is exhausted.
    pub fn read_line(&mut self, message: &str) -> io::Result<String> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Reads a trimmed line.
    pub fn read_trimmed(&mut self, message: &str) -> io::Result<String> {
        Ok(self.read_line(message)?.trim().to_string())
    }

    /// Asks `message` until `parse` accepts the answer and `validate`
    /// accepts the parsed value. Each refusal is shown as a notice.
    pub fn prompt_until<T>(
        &mut self,
        message: &str,
        mut parse: impl FnMut(&str) -> Result<T, String>,
        mut validate: impl FnMut(&T) -> Result<(), String>,
    ) -> io::Result<T> {
        loop {
            let answer = self.read_line(message)?;
            let refusal = match parse(answer.trim()) {
                Ok(value) => match validate(&value) {
                    Ok(()) => return Ok(value),
                    Err(refusal) => refusal,
                },
                Err(refusal) => refusal,
            };
            self.notice(&refusal)?;
        }
    }

    /// Asks until the answer is an integer.
    pub fn prompt_int(&mut self, message: &str) -> io::Result<i64> {
        self.prompt_until(
            message,
            |answer| {
                answer
                    .parse::<i64>()
                    .map_err(|_| "Error - Please enter a number".to_string())
            },
            |_| Ok(()),
        )
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }
}
