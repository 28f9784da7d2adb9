use std::path::Path;

use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Send tracing output to `path`. The terminal belongs to the UI, so without
/// a path nothing is logged.
pub fn init(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("log file path {} has no file name", path.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy().into_owned())
        .build(directory)
        .wrap_err_with(|| format!("can't open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(appender)
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .map_err(|e| eyre!("can't install log subscriber: {e}"))?;

    tracing::info!(path = %path.display(), "logging started");
    Ok(())
}
