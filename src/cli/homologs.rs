use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::{configure_threads, OutputFormat, ThresholdArgs};
use crate::homology::builder::{HomologMatrixBuilder, HomologReport};
use crate::store;
use crate::utils::validation::validate_run_name;

#[derive(Args)]
pub struct HomologsArgs {
    /// Directory holding the '<ref>-vs-<tar>.bl' BLAST results
    #[arg(required = true)]
    pub blast_output: PathBuf,

    /// Output directory (created if missing)
    #[arg(required = true)]
    pub output: PathBuf,

    /// Run name, used in output file names
    #[arg(long, required = true)]
    pub run: String,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,

    /// Worker threads for parsing (0 = one per core)
    #[arg(short = 't', long, default_value = "0")]
    pub threads: usize,
}

/// Execute homologs subcommand
///
/// # Errors
///
/// Returns an error if no result files are found, thresholds are invalid, or
/// the matrix cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: HomologsArgs, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    validate_run_name(&args.run)?;
    configure_threads(args.threads)?;

    let (report, path) = build_and_save(
        &args.blast_output,
        &args.output,
        &args.run,
        &args.thresholds,
    )?;

    print_report(&report, &path, format)
}

/// Phase one: build the homolog matrix and write it to `<output>/homolog_<run>.json`
pub(crate) fn build_and_save(
    blast_output: &Path,
    output: &Path,
    run: &str,
    thresholds: &ThresholdArgs,
) -> anyhow::Result<(HomologReport, PathBuf)> {
    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory {}", output.display()))?;

    let builder = HomologMatrixBuilder::new(thresholds.to_thresholds())?;
    let report = builder.build_from_dir(blast_output)?;

    let path = store::homolog_path(output, run);
    store::save_matrix(&report.matrix, &path)?;
    info!("Homolog matrix written to {}", path.display());

    Ok((report, path))
}

fn print_report(report: &HomologReport, path: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let matrix = &report.matrix;
    match format {
        OutputFormat::Text => {
            println!("Homolog Matrix");
            println!("{}", "=".repeat(60));
            println!("\nOutput: {}", path.display());
            println!("Result files parsed: {}", report.parsed);
            println!("Organisms: {}", matrix.organism_count());
            for organism in matrix.organisms() {
                println!("  {organism}: {} genes", matrix.gene_count(organism));
            }
            if !report.degraded.is_empty() {
                println!("\nDegraded pairs (treated as having no hits):");
                for pair in &report.degraded {
                    println!("  {} vs {}: {}", pair.reference, pair.target, pair.reason);
                }
            }
        }
        OutputFormat::Json => {
            let genes: serde_json::Map<String, serde_json::Value> = matrix
                .organisms()
                .map(|o| (o.to_string(), matrix.gene_count(o).into()))
                .collect();
            let output = serde_json::json!({
                "output": path.display().to_string(),
                "parsed": report.parsed,
                "organisms": genes,
                "degraded_pairs": report.degraded,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("organism\tgenes");
            for organism in matrix.organisms() {
                println!("{organism}\t{}", matrix.gene_count(organism));
            }
        }
    }
    Ok(())
}
