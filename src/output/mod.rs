//! Output surfaces the readout writes into.
//!
//! A surface is a single text region. Every write replaces the previous
//! contents; lines are separated by `<br>` in the written markup.

use crate::error::DisplayError;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

pub mod input;
pub mod terminal;

/// Line separator used in written markup
pub const LINE_BREAK: &str = "<br>";

/// Which surface the application renders into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Terminal panel when stdout is a TTY, plain lines otherwise
    Auto,
    Terminal,
    Plain,
}

impl FromStr for OutputKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(OutputKind::Auto),
            "terminal" | "tui" => Ok(OutputKind::Terminal),
            "plain" => Ok(OutputKind::Plain),
            other => Err(format!("unknown output '{}'", other)),
        }
    }
}

impl OutputKind {
    /// Resolve `Auto` against the current stdout
    pub fn resolve(self) -> OutputKind {
        match self {
            OutputKind::Auto if atty::is(atty::Stream::Stdout) => OutputKind::Terminal,
            OutputKind::Auto => OutputKind::Plain,
            other => other,
        }
    }
}

/// A mutable text region owned by one writer
#[cfg_attr(test, mockall::automock)]
pub trait OutputSurface: Send {
    /// Replace the surface contents with `markup`
    fn write(&mut self, markup: &str) -> Result<(), DisplayError>;
}

/// Split written markup into display lines
pub fn markup_lines(markup: &str) -> impl Iterator<Item = &str> {
    markup.split(LINE_BREAK)
}

/// Surface that keeps the last written text in memory.
///
/// Clones share the same region, so a caller can keep one clone to inspect
/// what the readout wrote.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    contents: Arc<Mutex<Option<String>>>,
    writes: Arc<Mutex<usize>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents, `None` until the first write
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().map(|w| *w).unwrap_or(0)
    }
}

impl OutputSurface for MemorySurface {
    fn write(&mut self, markup: &str) -> Result<(), DisplayError> {
        let mut contents = self
            .contents
            .lock()
            .map_err(|e| DisplayError::WriteError(e.to_string()))?;
        *contents = Some(markup.to_string());
        if let Ok(mut writes) = self.writes.lock() {
            *writes += 1;
        }
        Ok(())
    }
}

/// Prints one line per write, for pipes and log-style output
pub struct PlainSurface<W: Write + Send> {
    out: W,
}

impl PlainSurface<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write + Send> PlainSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> OutputSurface for PlainSurface<W> {
    fn write(&mut self, markup: &str) -> Result<(), DisplayError> {
        let line = markup_lines(markup).collect::<Vec<_>>().join("  ");
        writeln!(self.out, "{}", line)
            .and_then(|_| self.out.flush())
            .map_err(|e| DisplayError::WriteError(e.to_string()))
    }
}

/// Build the surface for `kind`. `title` labels surfaces that have a frame.
///
/// Callers are expected to pass an already resolved kind; `Auto` is resolved
/// here only as a fallback.
pub fn create(kind: OutputKind, title: &str) -> Result<Box<dyn OutputSurface>, DisplayError> {
    match kind {
        OutputKind::Terminal => Ok(Box::new(terminal::TerminalSurface::new(title)?)),
        OutputKind::Plain => Ok(Box::new(PlainSurface::stdout())),
        OutputKind::Auto => create(kind.resolve(), title),
    }
}
