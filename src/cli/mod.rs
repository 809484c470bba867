//! Command-line interface for core-genome.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **homologs**: Build the homolog matrix from a directory of BLAST results
//! - **core**: Compute the core genome from a saved homolog matrix
//! - **run**: Both phases; the core genome is computed from the saved matrix
//!
//! ## Usage
//!
//! ```text
//! # BLAST every proteome against every other one first:
//! #   blastp -query A.faa -db B -outfmt '7 qseqid sseqid pident length mismatch
//! #     gapopen qstart qend sstart send evalue bitscore qlen slen gaps' > blast/A-vs-B.bl
//!
//! # Full run, core genome for every organism
//! core-genome run blast/ Streptomyces results/
//!
//! # Stricter homologs, core genome of a single reference
//! core-genome run blast/ Streptomyces results/ -i 60 -a 80 --reference Sco_A3
//!
//! # Recompute the core genome from an existing homolog file
//! core-genome core results/homolog_Streptomyces.json results/ --run Streptomyces --format json
//! ```

use clap::{Parser, Subcommand};

use crate::orthology::consistency::ReferenceSummary;
use crate::parsing::blast::{
    HitThresholds, DEFAULT_ALIGNMENT_THRESHOLD, DEFAULT_EVALUE_THRESHOLD,
    DEFAULT_IDENTITY_THRESHOLD, DEFAULT_LENGTH_VARIATION_THRESHOLD,
};

pub mod genome;
pub mod homologs;
pub mod run;

#[derive(Parser)]
#[command(name = "core-genome")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Detect homologs and the core genome of an organism collection from BLAST results")]
#[command(
    long_about = "core-genome finds the genes shared by every organism of a collection.\n\nIt reads all-vs-all BLAST results ('<ref>-vs-<tar>.bl', -outfmt 7 with qlen and slen), keeps the best hit of every gene that passes the identity, coverage, e-value and length thresholds, and reports for each reference organism the genes whose reciprocal-best-hit family is:\n- Complete: one ortholog in every organism\n- Consistent: the same family from every member's point of view"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for the summary printed on stdout
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the homolog matrix from BLAST results
    Homologs(homologs::HomologsArgs),

    /// Compute the core genome from a homolog matrix file
    Core(genome::CoreArgs),

    /// Build the homolog matrix, then compute the core genome from it
    Run(run::RunArgs),
}

/// Thresholds a best hit must pass to be kept as a homolog
#[derive(clap::Args, Debug, Clone)]
pub struct ThresholdArgs {
    /// Minimum percent identity
    #[arg(short = 'i', long, default_value_t = DEFAULT_IDENTITY_THRESHOLD)]
    pub identity_threshold: f64,

    /// Minimum alignment length, as a percentage of the shorter sequence
    #[arg(short = 'a', long, default_value_t = DEFAULT_ALIGNMENT_THRESHOLD)]
    pub alignment_threshold: f64,

    /// Maximum e-value
    #[arg(short = 'e', long, default_value_t = DEFAULT_EVALUE_THRESHOLD)]
    pub evalue_threshold: f64,

    /// Maximum length difference, as a percentage of the shorter sequence (999 = no limit)
    #[arg(short = 'l', long, default_value_t = DEFAULT_LENGTH_VARIATION_THRESHOLD)]
    pub variation_threshold: f64,
}

impl ThresholdArgs {
    pub fn to_thresholds(&self) -> HitThresholds {
        HitThresholds {
            identity: self.identity_threshold,
            alignment: self.alignment_threshold,
            evalue: self.evalue_threshold,
            length_variation: self.variation_threshold,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Log filter directives: crate progress at info, everything else at warn
pub fn log_directives(verbose: bool) -> &'static str {
    if verbose {
        "core_genome=debug,info"
    } else {
        "core_genome=info,warn"
    }
}

/// Size the global worker pool; 0 keeps rayon's default of one thread per core
///
/// # Errors
///
/// Returns an error if the global pool was already initialized.
pub fn configure_threads(threads: usize) -> anyhow::Result<()> {
    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }
    Ok(())
}

/// Print per-reference core-genome statistics on stdout
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print_summaries(summaries: &[ReferenceSummary], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("Core Genome");
            println!("{}", "=".repeat(60));
            for s in summaries {
                println!("\n{}", s.reference);
                println!("  Genes: {}", s.genes);
                println!("  Families with reciprocal partners: {}", s.candidate_families);
                println!("  Complete families: {}", s.complete_families);
                println!("  Core genes: {}", s.core_genes);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(summaries)?);
        }
        OutputFormat::Tsv => {
            println!("reference\tgenes\tcandidate_families\tcomplete_families\tcore_genes");
            for s in summaries {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    s.reference, s.genes, s.candidate_families, s.complete_families, s.core_genes
                );
            }
        }
    }
    Ok(())
}
