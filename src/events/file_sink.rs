use crate::events::{log_timestamp, Event, EventSink};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Event sink that appends rendered lines to the run log file
///
/// Every event is also mirrored to `tracing` so it shows up on the console.
#[derive(Debug)]
pub struct FileEventSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileEventSink {
    /// Opens (or creates) the log file in append mode
    pub fn open(path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }
}

impl EventSink for FileEventSink {
    fn record(&self, event: Event) {
        event.trace();

        let line = event.render(&log_timestamp());
        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = writeln!(file, "{}", line) {
            tracing::error!("Failed to append to {}: {}", self.path.display(), e);
        }
    }
}
