//! Console writers.

use console::Term;
use std::sync::{Mutex, PoisonError};

use crate::domain::ports::ConsoleWriter;

/// Writes lines to the process's standard error terminal.
#[derive(Debug, Clone)]
pub struct TermConsole {
    term: Term,
}

impl TermConsole {
    pub fn stderr() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Default for TermConsole {
    fn default() -> Self {
        Self::stderr()
    }
}

impl ConsoleWriter for TermConsole {
    fn write_line(&self, line: &str) {
        // Nowhere left to report a failing terminal.
        let _ = self.term.write_line(line);
    }
}

/// Keeps every line in memory; handy for asserting on console output.
#[derive(Debug, Default)]
pub struct MemoryConsole {
    lines: Mutex<Vec<String>>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the captured lines.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Captured lines with ANSI escape codes removed.
    pub fn plain_lines(&self) -> Vec<String> {
        self.lines()
            .iter()
            .map(|line| console::strip_ansi_codes(line).into_owned())
            .collect()
    }

    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl ConsoleWriter for MemoryConsole {
    fn write_line(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}
