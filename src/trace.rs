//! Write-only trace sinks for the engine's diagnostic side channel.
//!
//! The engine appends a configuration snapshot before every step plus a
//! one-word action note after choosing a transition. Sinks are never read
//! back; swapping in [`NullTraceSink`] must not change any parse result.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::engine::Configuration;

/// Append-only diagnostic log of engine steps.
pub trait TraceSink {
    /// Records the full configuration immediately before a step.
    fn snapshot(&mut self, configuration: &Configuration) -> io::Result<()>;
    /// Records an action name or a final verdict message.
    fn note(&mut self, text: &str) -> io::Result<()>;
}

/// Drops everything. Used where the trace is not wanted and to demonstrate
/// that its absence does not affect parsing.
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn snapshot(&mut self, _configuration: &Configuration) -> io::Result<()> {
        Ok(())
    }

    fn note(&mut self, _text: &str) -> io::Result<()> {
        Ok(())
    }
}

/// Collects the trace into a `String` for tests or programmatic capture.
#[derive(Default)]
pub struct TraceBuffer {
    buffer: String,
}

impl TraceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

impl TraceSink for TraceBuffer {
    fn snapshot(&mut self, configuration: &Configuration) -> io::Result<()> {
        self.buffer.push_str("--------------\n");
        self.buffer.push_str(&configuration.to_string());
        self.buffer.push('\n');
        Ok(())
    }

    fn note(&mut self, text: &str) -> io::Result<()> {
        self.buffer.push_str(text);
        self.buffer.push('\n');
        Ok(())
    }
}

/// Buffered, human-readable trace file.
pub struct FileTraceSink {
    writer: BufWriter<File>,
}

impl FileTraceSink {
    /// Creates (or truncates) the trace file.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl TraceSink for FileTraceSink {
    fn snapshot(&mut self, configuration: &Configuration) -> io::Result<()> {
        writeln!(self.writer, "--------------")?;
        writeln!(self.writer, "{configuration}")
    }

    fn note(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.writer, "{text}")
    }
}
