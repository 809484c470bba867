use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::{info, warn};

use crate::cli::{configure_threads, print_summaries, OutputFormat};
use crate::core::types::CoreGenome;
use crate::orthology::consistency::{CoreConsistencyChecker, ReferenceSummary};
use crate::orthology::families::FamilyIndex;
use crate::store::{self, PersistedMatrix, RunManifest};
use crate::utils::validation::validate_run_name;

#[derive(Args)]
pub struct CoreArgs {
    /// Homolog matrix written by the homologs or run command
    #[arg(required = true)]
    pub homologs: PathBuf,

    /// Output directory (created if missing)
    #[arg(required = true)]
    pub output: PathBuf,

    /// Run name, used in output file names
    #[arg(long, required = true)]
    pub run: String,

    /// Reference organism (default: every organism)
    #[arg(short = 'r', long)]
    pub reference: Option<String>,

    /// Worker threads (0 = one per core)
    #[arg(short = 't', long, default_value = "0")]
    pub threads: usize,
}

/// Execute core subcommand
///
/// # Errors
///
/// Returns an error if the matrix cannot be read, the reference is unknown,
/// or the results cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CoreArgs, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    validate_run_name(&args.run)?;
    configure_threads(args.threads)?;
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create output directory {}", args.output.display()))?;

    let persisted = store::load_matrix(&args.homologs)?;
    let (core, summaries) = compute_core(&persisted, args.reference.as_deref())?;
    save_core(&args.output, &args.run, &core)?;

    let manifest_path = store::manifest_path(&args.output, &args.run);
    let mut manifest = RunManifest::new(&args.run, &persisted, &args.homologs)
        .with_reference(args.reference.as_deref())
        .with_summaries(&summaries);
    // Thresholds and degraded pairs are only known to the homolog phase
    if manifest_path.exists() {
        match store::load_manifest(&manifest_path) {
            Ok(previous) => manifest = manifest.inherit_homolog_settings(&previous),
            Err(e) => warn!("Ignoring unreadable manifest: {e}"),
        }
    }
    store::save_manifest(&manifest, &manifest_path)?;

    print_summaries(&summaries, format)
}

/// Phase two: families for every organism, then the consistency check
pub(crate) fn compute_core(
    persisted: &PersistedMatrix,
    reference: Option<&str>,
) -> anyhow::Result<(CoreGenome, Vec<ReferenceSummary>)> {
    let matrix = &persisted.matrix;
    if let Some(reference) = reference {
        // Fail before building any family
        anyhow::ensure!(
            matrix.contains_organism(reference),
            crate::orthology::consistency::CoreError::InvalidReference(reference.to_string())
        );
    }

    info!(
        "Building ortholog families for {} organisms (homolog md5 {})",
        matrix.organism_count(),
        persisted.md5
    );
    let index = FamilyIndex::build(matrix);

    info!("Core genome construction");
    let checker = CoreConsistencyChecker::new(matrix, &index);
    let core = checker.core_genome(reference)?;
    let summaries = checker.summarize(&core);
    Ok((core, summaries))
}

pub(crate) fn save_core(output: &Path, run: &str, core: &CoreGenome) -> anyhow::Result<()> {
    let path = store::core_path(output, run);
    store::save_core(core, &path)?;
    info!("Core genome written to {}", path.display());
    Ok(())
}
