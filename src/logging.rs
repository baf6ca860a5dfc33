/// File logging.
///
/// The terminal is in raw mode on the alternate screen while the game runs,
/// so nothing may go to stdout/stderr. Logs go to a file, and only when asked
/// for: `--debug` writes `wordlego.log` at Debug level, `--log-file <path>`
/// picks the file (Info level unless `--debug` is also given). Otherwise no
/// logger is installed and every `log::` call is a no-op.

use std::fs::File;
use std::path::{Path, PathBuf};

use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use thiserror::Error;

pub const DEFAULT_LOG_FILE: &str = "wordlego.log";

#[derive(Debug, Error)]
pub enum LogError {
    #[error("cannot create log file {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("logger already installed: {0}")]
    Install(#[from] log::SetLoggerError),
}

/// Level and destination, or `None` for no logging.
pub fn plan(debug: bool, log_file: Option<&Path>) -> Option<(LevelFilter, PathBuf)> {
    match (debug, log_file) {
        (false, None) => None,
        (true, None) => Some((LevelFilter::Debug, PathBuf::from(DEFAULT_LOG_FILE))),
        (true, Some(path)) => Some((LevelFilter::Debug, path.to_path_buf())),
        (false, Some(path)) => Some((LevelFilter::Info, path.to_path_buf())),
    }
}

pub fn setup_logging(debug: bool, log_file: Option<&Path>) -> Result<(), LogError> {
    let Some((level, path)) = plan(debug, log_file) else {
        return Ok(());
    };
    let file = File::create(&path).map_err(|source| LogError::Create { path: path.clone(), source })?;
    WriteLogger::init(
        level,
        ConfigBuilder::new()
            .set_target_level(LevelFilter::Error)
            // gilrs and rodio backends are chatty at Debug
            .add_filter_allow_str(env!("CARGO_PKG_NAME"))
            .build(),
        file,
    )?;
    log::info!("logging to {} at {level}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_is_opt_in() {
        assert_eq!(plan(false, None), None);
        assert_eq!(plan(true, None), Some((LevelFilter::Debug, PathBuf::from(DEFAULT_LOG_FILE))));
        let custom = Path::new("/tmp/w.log");
        assert_eq!(plan(false, Some(custom)), Some((LevelFilter::Info, custom.to_path_buf())));
        assert_eq!(plan(true, Some(custom)).map(|(l, _)| l), Some(LevelFilter::Debug));
    }

    #[test]
    fn unwritable_path_is_reported() {
        let err = setup_logging(false, Some(Path::new("/nonexistent-dir/x/y.log"))).unwrap_err();
        assert!(matches!(err, LogError::Create { .. }));
        assert!(err.to_string().contains("y.log"));
    }
}
