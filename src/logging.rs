use std::path::PathBuf;
use std::sync::Mutex;

use tracing::warn;
use tracing_subscriber::EnvFilter;

pub fn log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("countdown")
        .join("debug.log")
}

/// Installs the global subscriber. Debug mode logs to a file so the output
/// never lands on top of the clock; otherwise only warnings reach stderr.
/// `RUST_LOG` overrides either level.
pub fn init(debug_mode: bool) {
    if debug_mode {
        match open_log() {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter("debug"))
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .init();
                return;
            }
            Err(e) => {
                init_stderr();
                warn!(path = %log_path().display(), error = %e, "cannot open debug log");
                return;
            }
        }
    }
    init_stderr();
}

fn init_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(filter("warn"))
        .with_writer(std::io::stderr)
        .init();
}

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn open_log() -> std::io::Result<std::fs::File> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_ends_with_expected() {
        assert!(log_path().ends_with("countdown/debug.log"));
    }
}
