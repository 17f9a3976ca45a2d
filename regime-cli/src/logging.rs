//! Log output for `regime-compare`.
//!
//! Reports go to stdout, so every log line goes to stderr (and optionally to
//! a file). The level can be changed after startup, which the interactive
//! prompt exposes as `:log <filter>`.

use std::{
    fs::File,
    io::{self, IsTerminal},
    path::PathBuf,
    sync::{Mutex, OnceLock},
};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{
        FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

const DEFAULT_FILTER: &str = "info";

/// Where logs go and how much of them.
#[derive(Debug, Clone, Default)]
pub struct LogSettings {
    /// EnvFilter directive; falls back to `RUST_LOG`, then `info`.
    pub level: Option<String>,

    /// Appended to in addition to stderr.
    pub file: Option<PathBuf>,

    /// Suppresses stderr output. The file, if any, still receives logs.
    pub quiet: bool,
}

// --- Formatter ---

/// `HH:MM:SS.mmm LEVEL target: message`, colored on a terminal.
struct CliFormat;

fn level_color(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "\x1b[1;31m",
        Level::WARN => "\x1b[1;33m",
        Level::INFO => "\x1b[1;32m",
        Level::DEBUG => "\x1b[1;34m",
        Level::TRACE => "\x1b[1;35m",
    }
}

impl<S, N> FormatEvent<S, N> for CliFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let time = Local::now().format("%H:%M:%S%.3f");

        if writer.has_ansi_escapes() {
            write!(
                writer,
                "\x1b[2m{time}\x1b[0m {}{:>5}\x1b[0m \x1b[36m{}\x1b[0m: ",
                level_color(meta.level()),
                meta.level(),
                meta.target()
            )?;
        } else {
            write!(writer, "{time} {:>5} {}: ", meta.level(), meta.target())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// --- Runtime level control ---

type LevelHandle = reload::Handle<EnvFilter, Registry>;

static LEVEL_HANDLE: OnceLock<LevelHandle> = OnceLock::new();

fn parse_filter(directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directive).with_context(|| format!("invalid log level '{directive}'"))
}

/// Changes the active log filter.
///
/// Accepts a bare level ("warn", "debug") or any EnvFilter directive such as
/// `regime_core=trace`.
pub fn set_log_level(directive: &str) -> Result<()> {
    let handle = LEVEL_HANDLE
        .get()
        .context("logging not yet initialized")?;
    handle
        .reload(parse_filter(directive)?)
        .context("log filter reload failed")
}

// --- Setup ---

/// Installs the global subscriber. Call once at startup; later calls leave
/// the first subscriber in place.
pub fn init(settings: &LogSettings) -> Result<()> {
    let filter = match &settings.level {
        Some(directive) => parse_filter(directive)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };
    let (filter, handle) = reload::Layer::new(filter);

    let console = (!settings.quiet).then(|| {
        tracing_subscriber::fmt::layer()
            .event_format(CliFormat)
            .with_ansi(io::stderr().is_terminal())
            .with_writer(io::stderr)
    });

    let file = match &settings.file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file '{}'", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .event_format(CliFormat)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    if tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .is_ok()
    {
        let _ = LEVEL_HANDLE.set(handle);
    }
    Ok(())
}
