//! Line styling

use std::io::{self, IsTerminal, Write};

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

/// What a printed line represents, which decides its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Directory,
    File,
    Error,
    Plain,
}

impl Role {
    /// Color for this role, `None` for unstyled text.
    pub fn color_spec(self) -> Option<ColorSpec> {
        let color = match self {
            Role::Directory => Color::Blue,
            Role::File => Color::Green,
            Role::Error => Color::Red,
            Role::Plain => return None,
        };
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(color));
        Some(spec)
    }
}

/// Write `text` in the role's color and reset afterwards.
pub fn write_styled<W: WriteColor>(out: &mut W, text: &str, role: Role) -> io::Result<()> {
    match role.color_spec() {
        Some(spec) => {
            out.set_color(&spec)?;
            write!(out, "{}", text)?;
            out.reset()
        }
        None => write!(out, "{}", text),
    }
}

/// Return `text` wrapped in ANSI escapes for its role, or unchanged when
/// styling is disabled.
pub fn style(text: &str, role: Role, enabled: bool) -> String {
    if !enabled || role == Role::Plain {
        return text.to_string();
    }
    let mut buffer = Buffer::ansi();
    // Writes into an in-memory buffer do not fail
    if write_styled(&mut buffer, text, role).is_err() {
        return text.to_string();
    }
    String::from_utf8_lossy(buffer.as_slice()).into_owned()
}

/// Decide whether stdout should get colors when nothing forces them.
pub fn stdout_supports_color() -> bool {
    // Respect NO_COLOR environment variable (https://no-color.org/)
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
        return false;
    }
    io::stdout().is_terminal()
}
