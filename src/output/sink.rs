//! Where rendered lines go

use std::io::{self, Write};

use termcolor::{BufferedStandardStream, ColorChoice};
use tracing::Level;

use crate::logging::log_message;

use super::style::{Role, write_styled};

/// Receives rendered lines, one call per line.
pub trait OutputSink {
    /// Print a line on the console only.
    fn emit(&mut self, line: &str, role: Role) -> io::Result<()>;

    /// Print a line and mirror it to the log at `level`. Used for status and
    /// error messages, never for tree body lines.
    fn report(&mut self, line: &str, role: Role, level: Level) -> io::Result<()> {
        self.emit(line, role)?;
        log_message(level, line);
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes lines to stdout. Tree lines arrive already classified; error lines
/// are colored only when `error_color` is set.
pub struct ConsoleSink {
    stdout: BufferedStandardStream,
    error_color: bool,
}

impl ConsoleSink {
    pub fn new(error_color: bool) -> Self {
        Self {
            stdout: BufferedStandardStream::stdout(ColorChoice::Always),
            error_color,
        }
    }
}

impl OutputSink for ConsoleSink {
    fn emit(&mut self, line: &str, role: Role) -> io::Result<()> {
        let role = match role {
            Role::Error if !self.error_color => Role::Plain,
            other => other,
        };
        write_styled(&mut self.stdout, line, role)?;
        writeln!(self.stdout)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

impl Drop for ConsoleSink {
    fn drop(&mut self) {
        let _ = self.stdout.flush();
    }
}
