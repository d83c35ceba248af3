//! File-only diagnostic logging.
//!
//! The terminal belongs to the UI, so log output never goes to stdout or
//! stderr. Without `--debug` no subscriber is installed and every event is
//! discarded.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Log file used when `--log-file` is not given.
pub fn default_log_path() -> PathBuf {
    PathBuf::from("slots-rs.log")
}

/// Filter from `RUST_LOG`, falling back to `debug` or `info` for this crate.
pub fn env_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose { "slots_rs=debug" } else { "slots_rs=info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Plain-text subscriber writing through `make_writer`.
pub fn file_subscriber<W>(make_writer: W, filter: EnvFilter) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_writer(make_writer)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(filter)
        .finish()
}

/// Install the global subscriber appending to `path`.
pub fn init_file_logging(path: &Path, verbose: bool) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let subscriber = file_subscriber(Mutex::new(file), env_filter(verbose));
    tracing::subscriber::set_global_default(subscriber).map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn events_land_in_the_file_without_colour() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        let writer = Mutex::new(tmp.reopen().unwrap());
        let subscriber = file_subscriber(writer, EnvFilter::new("debug"));
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(symbol = "star", "spin settled");
        });
        let mut text = String::new();
        tmp.read_to_string(&mut text).unwrap();
        assert!(text.contains("spin settled"));
        assert!(text.contains("symbol=\"star\""));
        assert!(!text.contains('\u{1b}'));
    }
}
