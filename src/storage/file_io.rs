//! JSON file helpers with atomic writes
//!
//! A write either replaces the target completely or leaves it untouched.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::FoodprintError;

/// Read and parse a JSON file that must exist
pub fn read_json<T, P>(path: P) -> Result<T, FoodprintError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let file = File::open(path)
        .map_err(|e| FoodprintError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| FoodprintError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write `data` as pretty JSON via a sibling temp file and a rename
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), FoodprintError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            FoodprintError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path);
    let file = File::create(&temp_path).map_err(|e| {
        FoodprintError::Storage(format!("Failed to create {}: {}", temp_path.display(), e))
    })?;

    let mut writer = BufWriter::new(file);
    let written = serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| FoodprintError::Storage(format!("Failed to serialize data: {}", e)))
        .and_then(|_| {
            writer
                .flush()
                .map_err(|e| FoodprintError::Storage(format!("Failed to flush data: {}", e)))
        })
        .and_then(|_| {
            writer
                .get_ref()
                .sync_all()
                .map_err(|e| FoodprintError::Storage(format!("Failed to sync data: {}", e)))
        });

    if let Err(err) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        FoodprintError::Storage(format!(
            "Failed to replace {}: {}",
            path.display(),
            e
        ))
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
