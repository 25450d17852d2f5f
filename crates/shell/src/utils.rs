//! Some utilities

use std::path::PathBuf;

use ftlog::{
    appender::{FileAppender, Period},
    LevelFilter, LoggerGuard,
};

/// Sends logs to `./logs/<file_name>.log`, rotated daily, with warnings and
/// errors of the appender itself going to a sibling `.err.log` file.
pub fn configure_logger(file_name: &str) -> Result<(LoggerGuard, PathBuf), String> {
    let logs_dir = PathBuf::from(".")
        .canonicalize()
        .map_err(|e| e.to_string())?
        .join("logs");
    if !logs_dir.exists() {
        std::fs::create_dir(&logs_dir).map_err(|e| e.to_string())?;
    }
    let log_path = logs_dir.join(format!("{file_name}.log"));
    let err_path = log_path.with_extension("err.log");

    let guard = ftlog::Builder::new()
        .max_log_level(LevelFilter::Debug)
        .root(FileAppender::builder().path(&log_path).rotate(Period::Day).build())
        .filter("ftlog::appender", "ftlog-appender", LevelFilter::Warn)
        .appender("ftlog-appender", FileAppender::new(err_path))
        .try_init()
        .map_err(|e| e.to_string())?;

    Ok((guard, log_path))
}
