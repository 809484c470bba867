use std::path::PathBuf;

use clap::Args;

use crate::cli::genome::{compute_core, save_core};
use crate::cli::homologs::build_and_save;
use crate::cli::{configure_threads, print_summaries, OutputFormat, ThresholdArgs};
use crate::store::{self, RunManifest};
use crate::utils::validation::validate_run_name;

#[derive(Args)]
pub struct RunArgs {
    /// Directory holding the '<ref>-vs-<tar>.bl' BLAST results
    #[arg(required = true)]
    pub blast_output: PathBuf,

    /// Run name, used in output file names
    #[arg(required = true)]
    pub run: String,

    /// Output directory (created if missing)
    #[arg(required = true)]
    pub output: PathBuf,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,

    /// Reference organism (default: every organism)
    #[arg(short = 'r', long)]
    pub reference: Option<String>,

    /// Worker threads (0 = one per core)
    #[arg(short = 't', long, default_value = "0")]
    pub threads: usize,
}

/// Execute run subcommand
///
/// The core genome is computed from the homolog file as read back from disk,
/// never from the in-memory matrix, so `core` can reproduce it later.
///
/// # Errors
///
/// Returns an error if either phase fails. A failure in the core phase leaves
/// the homolog file in place.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: RunArgs, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    validate_run_name(&args.run)?;
    configure_threads(args.threads)?;

    let (report, homolog_path) =
        build_and_save(&args.blast_output, &args.output, &args.run, &args.thresholds)?;
    let degraded = report.degraded;
    drop(report.matrix);

    let persisted = store::load_matrix(&homolog_path)?;
    let (core, summaries) = compute_core(&persisted, args.reference.as_deref())?;
    save_core(&args.output, &args.run, &core)?;

    let manifest = RunManifest::new(&args.run, &persisted, &homolog_path)
        .with_thresholds(args.thresholds.to_thresholds())
        .with_reference(args.reference.as_deref())
        .with_degraded_pairs(degraded)
        .with_summaries(&summaries);
    store::save_manifest(&manifest, &store::manifest_path(&args.output, &args.run))?;

    print_summaries(&summaries, format)
}
