use crate::error::Result;
use std::io::{self, BufRead, Write};

/// Yes/no question asked before a destructive action
pub trait ConfirmationPrompt {
    fn ask(&mut self, message: &str) -> Result<bool>;
}

/// Only a literal `yes` confirms; anything else declines.
pub fn is_confirmation(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

/// Reads the answer from stdin
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl ConfirmationPrompt for StdinPrompt {
    fn ask(&mut self, message: &str) -> Result<bool> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{message}")?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(is_confirmation(&answer))
    }
}

/// Fixed answer, for `--yes` and scripted runs.
/// The question is still written out, followed by the answer given.
#[derive(Debug)]
pub struct AutoConfirm<W = io::Stdout> {
    answer: bool,
    out: W,
}

impl AutoConfirm {
    pub fn new(answer: bool) -> Self {
        Self::with_writer(answer, io::stdout())
    }
}

impl<W: Write> AutoConfirm<W> {
    pub fn with_writer(answer: bool, out: W) -> Self {
        Self { answer, out }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }
}

impl<W: Write> ConfirmationPrompt for AutoConfirm<W> {
    fn ask(&mut self, message: &str) -> Result<bool> {
        let reply = if self.answer { "yes" } else { "no" };
        writeln!(self.out, "{message}{reply}")?;
        self.out.flush()?;
        Ok(self.answer)
    }
}
