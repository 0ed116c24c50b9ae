//! Output writing.
//!
//! Generated text goes either to a file (parent directories created,
//! existing content replaced) or to stdout.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::error::ScenarioGenError;

/// Writes `content` to `path`, creating parent directories and truncating
/// any existing file.
///
/// # Errors
///
/// Returns an I/O error if the path is empty, a directory cannot be
/// created, or the file cannot be written.
pub fn write_file(path: &Path, content: &str) -> Result<(), ScenarioGenError> {
    if path.as_os_str().is_empty() {
        return Err(ScenarioGenError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "output path is empty",
        )));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
        debug!(dir = %parent.display(), "output directory ready");
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content.as_bytes())?;
    writer.flush()?;

    info!(path = %path.display(), bytes = content.len(), "output written");
    Ok(())
}

/// Writes `content` to `path`, or to stdout when no path is given.
///
/// # Errors
///
/// Returns an I/O error if writing fails.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<(), ScenarioGenError> {
    match path {
        Some(path) => write_file(path, content),
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(content.as_bytes())?;
            lock.flush()?;
            Ok(())
        }
    }
}
