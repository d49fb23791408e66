//! JSONL history of warm-up attempts
//!
//! Attempts are appended to `.warmup/history.jsonl`, one JSON object per
//! line. Uses file locking for concurrent access safety.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use super::config::PROJECT_DIR;
use crate::domain::WarmupAttempt;

/// Append-only store of warm-up attempts
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default store for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(PROJECT_DIR).join("history.jsonl"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all attempts, oldest first
    pub fn read_all(&self) -> Result<Vec<WarmupAttempt>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open history: {}", self.path.display()))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .context("Failed to acquire read lock on history")?;

        let reader = BufReader::new(&file);
        let mut attempts = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let attempt: WarmupAttempt = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse attempt at line {}", line_num + 1))?;

            attempts.push(attempt);
        }

        Ok(attempts)
    }

    /// Reads the most recent `limit` attempts, newest first
    pub fn recent(&self, limit: usize, failed_only: bool) -> Result<Vec<WarmupAttempt>> {
        let attempts = self.read_all()?;

        Ok(attempts
            .into_iter()
            .rev()
            .filter(|a| !failed_only || !a.passed)
            .take(limit)
            .collect())
    }

    /// Appends a single attempt
    pub fn append(&self, attempt: &WarmupAttempt) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open history: {}", self.path.display()))?;

        file.lock_exclusive()
            .context("Failed to acquire write lock on history")?;

        let mut writer = BufWriter::new(&file);
        let line = serde_json::to_string(attempt).context("Failed to serialize attempt")?;
        writeln!(writer, "{}", line).context("Failed to write attempt")?;

        writer.flush().context("Failed to flush history")?;

        Ok(())
    }
}
