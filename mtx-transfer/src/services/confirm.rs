//! Removal confirmation
//!
//! Destination files are never deleted without an explicit yes. The prompt
//! repeats until it gets an answer starting with `y`/`Y` or `n`/`N`.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::warn;

/// Asks whether the removal candidates may be deleted
pub trait RemovalConfirmer {
    /// Called once for the whole batch
    fn confirm(&mut self, candidates: &[PathBuf]) -> io::Result<bool>;
}

/// Interactive prompt over a reader/writer pair
pub struct PromptConfirmer<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirmer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl PromptConfirmer<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process's stdin/stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

/// Interpret one answer line
fn parse_answer(line: &str) -> Option<bool> {
    match line.trim_start().chars().next() {
        Some('y') | Some('Y') => Some(true),
        Some('n') | Some('N') => Some(false),
        _ => None,
    }
}

impl<R: BufRead, W: Write> RemovalConfirmer for PromptConfirmer<R, W> {
    fn confirm(&mut self, candidates: &[PathBuf]) -> io::Result<bool> {
        loop {
            writeln!(self.output, "Files in destination not found in source files list:")?;
            for path in candidates {
                writeln!(self.output, "  {}", path.display())?;
            }
            write!(
                self.output,
                "Delete {} files not found in source files list? [y/n] ",
                candidates.len()
            )?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                warn!("End of input while waiting for confirmation; keeping destination files");
                return Ok(false);
            }

            if let Some(answer) = parse_answer(&line) {
                return Ok(answer);
            }
        }
    }
}

/// Fixed answer, for non-interactive use and tests
pub struct FixedAnswer(pub bool);

impl RemovalConfirmer for FixedAnswer {
    fn confirm(&mut self, _candidates: &[PathBuf]) -> io::Result<bool> {
        Ok(self.0)
    }
}
