use std::fs::{self, File};
use std::io::stderr;
use std::path::PathBuf;
use std::sync::{LazyLock, Mutex};

use crate::board::zobrist::ZOBRIST;
use chrono::Local;
use miette::{Context, IntoDiagnostic, miette};
use tracing::level_filters::LevelFilter;
use tracing::{Level, debug};
use tracing_appender::non_blocking;
use tracing_subscriber::reload;
use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt, reload::Handle, util::SubscriberInitExt,
};

const LOG_DIR: &str = "/tmp/ponder_logs";

pub trait LogHandle: Send + Sync {
    fn set_filter(&self, new_filter: EnvFilter) -> miette::Result<()>;
}

impl<S> LogHandle for Handle<EnvFilter, S>
where
    S: tracing::Subscriber + Send + Sync + 'static,
{
    fn set_filter(&self, new_filter: EnvFilter) -> miette::Result<()> {
        self.modify(|current| *current = new_filter)
            .into_diagnostic()
    }
}

pub struct LogHandles {
    console_handle: Mutex<Box<dyn LogHandle>>,
    file_handle: Mutex<Box<dyn LogHandle>>,
    /// Where file logging goes once enabled, `None` if the file could not
    /// be created
    log_file: Option<PathBuf>,
}

fn open_log_file() -> std::io::Result<(PathBuf, File)> {
    fs::create_dir_all(LOG_DIR)?;
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let path = PathBuf::from(format!("{LOG_DIR}/ponder_{timestamp}.log"));
    let file = File::create(&path)?;
    Ok((path, file))
}

static LOG_HANDLES: LazyLock<LogHandles> = LazyLock::new(|| {
    #[cfg(feature = "dev-tools")]
    color_backtrace::install();

    // Console Layer with its own reloadable filter
    let console_filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();
    let (console_filter, console_handle) = reload::Layer::new(console_filter);
    let console_layer = fmt::layer()
        .without_time()
        .with_writer(stderr)
        .with_filter(console_filter);

    // File Layer with its own reloadable filter (initially off)
    let file_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::OFF.into())
        .from_env_lossy();
    let (file_filter, file_handle) = reload::Layer::new(file_filter);

    let (log_file, (file_writer, guard)) = match open_log_file() {
        Ok((path, file)) => (Some(path), non_blocking(file)),
        Err(e) => {
            eprintln!("File logging unavailable ({LOG_DIR}): {e}");
            (None, non_blocking(std::io::sink()))
        }
    };
    std::mem::forget(guard); // Keep the writer thread alive.

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false) // No colors in file
        .with_filter(file_filter);

    // Fails only if another subscriber was installed first, e.g. by a bench
    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();

    LogHandles {
        console_handle: Mutex::new(Box::new(console_handle)),
        file_handle: Mutex::new(Box::new(file_handle)),
        log_file,
    }
});

pub fn set_log_level(level: Level) -> miette::Result<()> {
    let new_filter = EnvFilter::new(level.to_string());

    LOG_HANDLES
        .console_handle
        .lock()
        .map_err(|_| miette!("Console log handle poisoned"))?
        .set_filter(new_filter)
        .with_context(|| format!("Failed to modify log filter to level: {level}"))
}

/// Turns the debug-level log file on or off. Returns the file path.
pub fn toggle_file_logging(enable: bool) -> miette::Result<Option<PathBuf>> {
    let new_filter = if enable {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("off")
    };

    LOG_HANDLES
        .file_handle
        .lock()
        .map_err(|_| miette!("File log handle poisoned"))?
        .set_filter(new_filter)
        .context("Failed to modify log filter")?;

    Ok(LOG_HANDLES.log_file.clone())
}

/// Initialize tracing and backtrace. Safe to call more than once.
pub fn init() {
    LazyLock::force(&LOG_HANDLES);
    LazyLock::force(&ZOBRIST);
    debug!("Logging initialized");
}
