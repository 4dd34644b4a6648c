//! Log file setup
//!
//! Status and error messages are recorded through `tracing`. The CLI builds
//! one file-backed subscriber per run and installs it as the scoped default,
//! so the file is closed when the run ends.

use std::fmt;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use chrono::Local;
use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber, debug, error, info, trace, warn};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::error::TwigError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Threshold for the log file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    #[value(name = "DEBUG")]
    Debug,
    #[default]
    #[value(name = "INFO")]
    Info,
    #[value(name = "WARNING")]
    Warning,
    #[value(name = "ERROR")]
    Error,
    /// Nothing is more severe than an error in `tracing`, so this keeps
    /// the same records as `Error`.
    #[value(name = "CRITICAL")]
    Critical,
}

impl LogLevel {
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warning => LevelFilter::WARN,
            LogLevel::Error | LogLevel::Critical => LevelFilter::ERROR,
        }
    }
}

/// Level name as written to the log file.
pub fn level_label(level: &Level) -> &'static str {
    if *level == Level::ERROR {
        "ERROR"
    } else if *level == Level::WARN {
        "WARNING"
    } else if *level == Level::INFO {
        "INFO"
    } else {
        "DEBUG"
    }
}

/// Record a message at a level chosen at runtime.
pub fn log_message(level: Level, message: &str) {
    if level == Level::ERROR {
        error!("{}", message);
    } else if level == Level::WARN {
        warn!("{}", message);
    } else if level == Level::INFO {
        info!("{}", message);
    } else if level == Level::DEBUG {
        debug!("{}", message);
    } else {
        trace!("{}", message);
    }
}

/// Formats each event as `<timestamp> - <LEVEL> - <message>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLineFormat;

impl<S, N> FormatEvent<S, N> for LogLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{} - {} - ",
            Local::now().format(TIMESTAMP_FORMAT),
            level_label(event.metadata().level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Build a subscriber writing to `path`, truncating any previous log.
pub fn file_subscriber(
    path: &Path,
    level: LogLevel,
) -> Result<impl Subscriber + Send + Sync + 'static, TwigError> {
    let file = File::create(path).map_err(|source| TwigError::LogFile {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(tracing_subscriber::fmt()
        .with_max_level(level.to_level_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .event_format(LogLineFormat)
        .finish())
}
