use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::matrix::HomologMatrix;
use crate::core::types::CoreGenome;
use crate::homology::builder::DegradedPair;
use crate::orthology::consistency::ReferenceSummary;
use crate::parsing::blast::HitThresholds;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Manifest format version for compatibility checking
pub const MANIFEST_VERSION: &str = "1.0.0";

/// `<dir>/homolog_<run>.json`
pub fn homolog_path(dir: &Path, run: &str) -> PathBuf {
    dir.join(format!("homolog_{run}.json"))
}

/// `<dir>/core_<run>.json`
pub fn core_path(dir: &Path, run: &str) -> PathBuf {
    dir.join(format!("core_{run}.json"))
}

/// `<dir>/manifest_<run>.json`
pub fn manifest_path(dir: &Path, run: &str) -> PathBuf {
    dir.join(format!("manifest_{run}.json"))
}

/// A homolog matrix read from disk, with the digest of the exact bytes read
#[derive(Debug, Clone)]
pub struct PersistedMatrix {
    pub matrix: HomologMatrix,
    /// Lowercase hex MD5 of the file content
    pub md5: String,
}

/// Record of the settings and outcome of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub version: String,
    pub created_at: String,
    pub tool_version: String,
    pub run: String,
    /// Unknown when the core genome was computed from an existing homolog file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<HitThresholds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub organisms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded_pairs: Vec<DegradedPair>,
    pub homolog_file: String,
    pub homolog_md5: String,
    pub core_sizes: BTreeMap<String, usize>,
}

impl RunManifest {
    pub fn new(run: &str, persisted: &PersistedMatrix, homolog_file: &Path) -> Self {
        Self {
            version: MANIFEST_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            run: run.to_string(),
            thresholds: None,
            reference: None,
            organisms: persisted.matrix.organisms().map(str::to_string).collect(),
            degraded_pairs: Vec::new(),
            homolog_file: homolog_file.display().to_string(),
            homolog_md5: persisted.md5.clone(),
            core_sizes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_thresholds(mut self, thresholds: HitThresholds) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    #[must_use]
    pub fn with_reference(mut self, reference: Option<&str>) -> Self {
        self.reference = reference.map(str::to_string);
        self
    }

    #[must_use]
    pub fn with_degraded_pairs(mut self, degraded: Vec<DegradedPair>) -> Self {
        self.degraded_pairs = degraded;
        self
    }

    /// Keep the homolog-phase settings of `previous` when it describes the
    /// same homolog file and this manifest does not know them.
    #[must_use]
    pub fn inherit_homolog_settings(mut self, previous: &RunManifest) -> Self {
        if previous.homolog_md5 != self.homolog_md5 {
            return self;
        }
        if self.thresholds.is_none() {
            self.thresholds = previous.thresholds;
        }
        if self.degraded_pairs.is_empty() {
            self.degraded_pairs = previous.degraded_pairs.clone();
        }
        self
    }

    #[must_use]
    pub fn with_summaries(mut self, summaries: &[ReferenceSummary]) -> Self {
        self.core_sizes = summaries
            .iter()
            .map(|s| (s.reference.clone(), s.core_genes))
            .collect();
        self
    }
}

fn write_json<T: Serialize>(value: &T, path: &Path, pretty: bool) -> Result<(), StoreError> {
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    let written = if pretty {
        serde_json::to_writer_pretty(&mut writer, value)
    } else {
        serde_json::to_writer(&mut writer, value)
    };
    written.map_err(|err| {
        if err.is_io() {
            write_err(std::io::Error::from(err))
        } else {
            StoreError::Serialize(err)
        }
    })?;
    writer.flush().map_err(write_err)
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, StoreError> {
    std::fs::read(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the matrix as compact JSON. Output is byte-identical for equal matrices.
///
/// # Errors
///
/// Returns `StoreError::Write` if the file cannot be written.
pub fn save_matrix(matrix: &HomologMatrix, path: &Path) -> Result<(), StoreError> {
    write_json(matrix, path, false)
}

/// Read a matrix back, completing it if the file omits self-pairs or padding
///
/// # Errors
///
/// Returns `StoreError::Read` if the file cannot be read, or
/// `StoreError::Parse` if it is not a valid homolog matrix.
pub fn load_matrix(path: &Path) -> Result<PersistedMatrix, StoreError> {
    let bytes = read_bytes(path)?;
    let matrix = serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(PersistedMatrix {
        matrix,
        md5: format!("{:x}", md5::compute(&bytes)),
    })
}

/// # Errors
///
/// Returns `StoreError::Write` if the file cannot be written.
pub fn save_core(core: &CoreGenome, path: &Path) -> Result<(), StoreError> {
    write_json(core, path, false)
}

/// # Errors
///
/// Returns `StoreError::Write` if the file cannot be written.
pub fn save_manifest(manifest: &RunManifest, path: &Path) -> Result<(), StoreError> {
    write_json(manifest, path, true)
}

/// # Errors
///
/// Returns `StoreError::Read` or `StoreError::Parse` on failure.
pub fn load_manifest(path: &Path) -> Result<RunManifest, StoreError> {
    let bytes = read_bytes(path)?;
    serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
