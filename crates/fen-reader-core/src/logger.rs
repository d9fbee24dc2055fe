//! Logging setup for the `fen-reader` binary and examples.
//!
//! Two backends:
//! - [`init_with_level`]: a `log` sink writing one line per record to stderr,
//!   `[  0.012s DEBUG pieces::threshold_search] message`. The `fen_reader_`
//!   crate prefix is dropped from the target so per-stage lines line up.
//! - `init_tracing` (feature `tracing`): a `tracing-subscriber` fmt layer
//!   with `RUST_LOG` filtering and span close timings.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

const CRATE_PREFIX: &str = "fen_reader_";

struct PipelineLog {
    max_level: LevelFilter,
    epoch: Instant,
}

/// Workspace targets lose their crate prefix; foreign targets pass through.
fn short_target(target: &str) -> &str {
    target.strip_prefix(CRATE_PREFIX).unwrap_or(target)
}

fn format_line(
    elapsed_s: f64,
    level: Level,
    target: &str,
    message: &std::fmt::Arguments<'_>,
) -> String {
    format!(
        "[{elapsed_s:8.3}s {level:>5} {}] {message}",
        short_target(target)
    )
}

impl Log for PipelineLog {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            self.epoch.elapsed().as_secs_f64(),
            record.level(),
            record.target(),
            record.args(),
        );
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static PIPELINE_LOG: OnceLock<PipelineLog> = OnceLock::new();

/// Route `log` records at or above `level` to stderr.
///
/// The first call installs the sink and fixes its level; later calls return
/// `Ok(())` without changing anything.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if PIPELINE_LOG.get().is_some() {
        return Ok(());
    }
    let sink = PIPELINE_LOG.get_or_init(|| PipelineLog {
        max_level: level,
        epoch: Instant::now(),
    });
    log::set_logger(sink)?;
    log::set_max_level(level);
    Ok(())
}

/// Install a `tracing` fmt subscriber filtered by `RUST_LOG` (default `info`).
///
/// With `json = true` every event is one flattened JSON object, which is the
/// format used when collecting per-square span timings.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    if json {
        let _ = builder.json().flatten_event(true).finish().try_init();
    } else {
        let _ = builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}
