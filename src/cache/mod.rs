#![warn(clippy::all, clippy::pedantic)]

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::resolver::Resolution;

/// Directory under the per-user cache dir that holds the hand-off file.
pub const HANDOFF_DIR: &str = "clac";

/// File the last accepted command is written to for the shell binding.
pub const HANDOFF_FILE: &str = "clac.cache";

static HANDOFF_PATH: Lazy<PathBuf> = Lazy::new(|| {
    // Check for environment variable override first
    if let Ok(path) = std::env::var("CLAC_CACHE_PATH") {
        return PathBuf::from(path);
    }

    dirs::cache_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(HANDOFF_DIR)
        .join(HANDOFF_FILE)
});

/// Single-slot memoization in front of the resolver, keyed on exact string
/// equality of the full input line.
///
/// The slot is replaced wholesale whenever the input differs from the
/// previous call; there is no eviction policy beyond capacity one.
#[derive(Debug, Default)]
pub struct ResultCache {
    slot: Option<(String, Resolution)>,
}

impl ResultCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the memoized resolution when the line matches the slot
    /// exactly.
    #[must_use]
    pub fn get(&self, line: &str) -> Option<Resolution> {
        self.slot
            .as_ref()
            .filter(|(key, _)| key == line)
            .map(|(_, resolution)| resolution.clone())
    }

    pub fn store(&mut self, line: &str, resolution: Resolution) {
        self.slot = Some((line.to_string(), resolution));
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}

/// Persists an accepted command for the shell binding to read back,
/// overwriting any previous hand-off.
///
/// # Errors
///
/// Returns an error if the cache directory cannot be created or the file
/// cannot be written.
pub fn write_handoff(command: &str) -> Result<()> {
    write_handoff_at(&HANDOFF_PATH, command)
}

/// Writes the hand-off to a specific path.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written.
pub fn write_handoff_at(path: &Path, command: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create cache directory {parent:?}"))?;
    }

    // Write to a sibling temp file and rename so the shell binding never
    // observes a partial write.
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, command)
        .with_context(|| format!("failed to write temporary hand-off file {temp_path:?}"))?;
    fs::rename(&temp_path, path)
        .with_context(|| format!("failed to replace hand-off file {path:?}"))?;

    Ok(())
}

/// Reads back the last accepted command.
///
/// # Errors
///
/// Returns an error if the hand-off file cannot be read.
pub fn read_handoff() -> Result<String> {
    read_handoff_at(&HANDOFF_PATH)
}

/// Reads the hand-off from a specific path.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_handoff_at(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read hand-off file {path:?}"))
}

/// Truncates the hand-off file if it exists.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be truncated.
pub fn clear_handoff() -> Result<()> {
    clear_handoff_at(&HANDOFF_PATH)
}

/// Truncates the hand-off file at a specific path.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be truncated.
pub fn clear_handoff_at(path: &Path) -> Result<()> {
    if path.exists() {
        fs::write(path, "")
            .with_context(|| format!("failed to truncate hand-off file {path:?}"))?;
    }
    Ok(())
}
