//! Atomic file emission and the run manifest.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::AnalyticsError;

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub sha256: String,
    pub bytes: usize,
}

/// Index of every file one run wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub files: Vec<ManifestEntry>,
}

/// Writes report files into one output directory.
///
/// Each file is written to `<name>.tmp` and renamed into place, so a reader
/// never sees a half-written table.
#[derive(Debug)]
pub struct ReportWriter {
    dir: PathBuf,
    run_id: Uuid,
    written: Vec<ManifestEntry>,
}

impl ReportWriter {
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Io`] if the directory cannot be created.
    pub fn new(dir: &Path, run_id: Uuid) -> Result<Self, AnalyticsError> {
        fs::create_dir_all(dir).map_err(|source| AnalyticsError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
            run_id,
            written: Vec::new(),
        })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Serialize `value` as pretty JSON into `name`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError`] on serialization or I/O failure.
    pub fn write_json<T>(&mut self, name: &str, value: &T) -> Result<PathBuf, AnalyticsError>
    where
        T: Serialize + ?Sized,
    {
        let mut bytes =
            serde_json::to_vec_pretty(value).map_err(|source| AnalyticsError::Serialize {
                name: name.to_string(),
                source,
            })?;
        bytes.push(b'\n');
        self.write_atomic(name, &bytes)
    }

    /// # Errors
    ///
    /// Returns [`AnalyticsError::Io`] on I/O failure.
    pub fn write_text(&mut self, name: &str, content: &str) -> Result<PathBuf, AnalyticsError> {
        self.write_atomic(name, content.as_bytes())
    }

    fn write_atomic(&mut self, name: &str, bytes: &[u8]) -> Result<PathBuf, AnalyticsError> {
        let target = self.dir.join(name);
        let tmp = self.dir.join(format!("{name}.tmp"));

        fs::write(&tmp, bytes).map_err(|source| AnalyticsError::Io {
            path: tmp.clone(),
            source,
        })?;
        if let Err(source) = fs::rename(&tmp, &target) {
            // Best effort: the rename error is what the caller needs to see.
            let _ = fs::remove_file(&tmp);
            return Err(AnalyticsError::Io {
                path: target,
                source,
            });
        }

        let sha256 = format!("{:x}", Sha256::digest(bytes));
        tracing::debug!(file = name, bytes = bytes.len(), %sha256, "wrote report file");

        self.written.retain(|e| e.name != name);
        self.written.push(ManifestEntry {
            name: name.to_string(),
            sha256,
            bytes: bytes.len(),
        });
        Ok(target)
    }

    /// Write `manifest.json` listing every file written so far.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError`] if the manifest cannot be written.
    pub fn finish(mut self, generated_at: DateTime<Utc>) -> Result<Manifest, AnalyticsError> {
        let mut files = std::mem::take(&mut self.written);
        files.sort_by(|a, b| a.name.cmp(&b.name));
        let manifest = Manifest {
            run_id: self.run_id,
            generated_at,
            files,
        };
        self.write_json(MANIFEST_FILE, &manifest)?;
        tracing::info!(
            run_id = %manifest.run_id,
            files = manifest.files.len(),
            dir = %self.dir.display(),
            "report manifest written"
        );
        Ok(manifest)
    }
}
