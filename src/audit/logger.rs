//! Append-only session log
//!
//! One JSON object per line, flushed after every write.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{FoodprintError, FoodprintResult};

use super::entry::SessionEntry;

pub struct SessionLog {
    log_path: PathBuf,
}

impl SessionLog {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append one entry
    pub fn log(&self, entry: &SessionEntry) -> FoodprintResult<()> {
        if let Some(parent) = self.log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| FoodprintError::Io(format!("Failed to open session log: {}", e)))?;

        let json = serde_json::to_string(entry)
            .map_err(|e| FoodprintError::Json(format!("Failed to serialize log entry: {}", e)))?;

        writeln!(file, "{}", json)
            .and_then(|_| file.flush())
            .map_err(|e| FoodprintError::Io(format!("Failed to write session log: {}", e)))
    }

    /// Every entry, oldest first
    pub fn read_all(&self) -> FoodprintResult<Vec<SessionEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| FoodprintError::Io(format!("Failed to open session log: {}", e)))?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                FoodprintError::Io(format!("Failed to read session log line {}: {}", line_num + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let entry = serde_json::from_str(&line).map_err(|e| {
                FoodprintError::Json(format!(
                    "Failed to parse session log line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// The last `count` entries
    pub fn read_recent(&self, count: usize) -> FoodprintResult<Vec<SessionEntry>> {
        Ok(last(self.read_all()?, count))
    }

    /// The last `count` notes
    pub fn read_recent_notes(&self, count: usize) -> FoodprintResult<Vec<SessionEntry>> {
        Ok(last(self.read_notes()?, count))
    }

    pub fn read_notes(&self) -> FoodprintResult<Vec<SessionEntry>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(SessionEntry::is_note)
            .collect())
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

fn last(mut entries: Vec<SessionEntry>, count: usize) -> Vec<SessionEntry> {
    let start = entries.len().saturating_sub(count);
    entries.split_off(start)
}
