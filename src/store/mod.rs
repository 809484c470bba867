//! Persistence of run artifacts.
//!
//! A run writes up to three JSON files into its output directory:
//!
//! | File | Content |
//! |------|---------|
//! | `homolog_<run>.json` | [`HomologMatrix`](crate::HomologMatrix): organism -> organism -> gene -> best hit or `null` |
//! | `core_<run>.json` | [`CoreGenome`](crate::CoreGenome): organism -> sorted core gene ids |
//! | `manifest_<run>.json` | [`RunManifest`]: settings, degraded pairs, MD5 of the homolog file read back |
//!
//! The core-genome phase always consumes a matrix read back from disk, so the
//! core genome can be recomputed later from the homolog file alone.

pub mod json;

pub use json::{
    core_path, homolog_path, load_manifest, load_matrix, manifest_path, save_core, save_manifest,
    save_matrix, PersistedMatrix, RunManifest, StoreError, MANIFEST_VERSION,
};
