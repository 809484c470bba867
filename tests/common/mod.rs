//! Helpers for writing BLAST `-outfmt 7` result files in tests.

#![allow(dead_code)]

use std::fmt::Write as _;
use std::path::Path;

/// First hit of a query: (query, subject, percent identity)
pub struct Hit<'a> {
    pub query: &'a str,
    pub subject: &'a str,
    pub identity: f64,
}

pub fn hit<'a>(query: &'a str, subject: &'a str) -> Hit<'a> {
    Hit {
        query,
        subject,
        identity: 90.0,
    }
}

pub fn hit_with_identity<'a>(query: &'a str, subject: &'a str, identity: f64) -> Hit<'a> {
    Hit {
        query,
        subject,
        identity,
    }
}

/// Render a result file. Queries listed in `no_hits` get an empty block.
pub fn blast_text(hits: &[Hit<'_>], no_hits: &[&str]) -> String {
    let mut text = String::from("# BLASTP 2.12.0+\n");
    for h in hits {
        writeln!(text, "# Query: {} hypothetical protein", h.query).unwrap();
        text.push_str("# Fields: query acc.ver, subject acc.ver, % identity, alignment length, mismatches, gap opens, q. start, q. end, s. start, s. end, evalue, bit score, query length, subject length, gaps\n");
        text.push_str("# 1 hits found\n");
        writeln!(
            text,
            "{}\t{}\t{}\t300\t10\t0\t1\t300\t1\t300\t1e-100\t550\t300\t300\t0",
            h.query, h.subject, h.identity
        )
        .unwrap();
    }
    for query in no_hits {
        writeln!(text, "# Query: {query}\n# 0 hits found").unwrap();
    }
    text.push_str("# BLAST processed queries\n");
    text
}

pub fn write_pair(dir: &Path, reference: &str, target: &str, hits: &[Hit<'_>], no_hits: &[&str]) {
    let path = dir.join(format!("{reference}-vs-{target}.bl"));
    std::fs::write(path, blast_text(hits, no_hits)).unwrap();
}

/// Three organisms A, B, C sharing a single gene `g1`, every pair reciprocal
pub fn write_three_way_reciprocal(dir: &Path) {
    for (reference, target) in [("A", "B"), ("A", "C"), ("B", "A"), ("B", "C"), ("C", "A"), ("C", "B")] {
        write_pair(dir, reference, target, &[hit("g1", "g1")], &[]);
    }
}
