use std::io::BufRead;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::matrix::GeneHits;
use crate::core::types::BestHit;

/// Comment prefix that opens a new query block
const QUERY_HEADER: &str = "# Query:";

/// Columns of a hit line in the expected `-outfmt 7` layout
pub const HIT_FIELDS: usize = 15;

const IDENTITY_FIELD: usize = 2;
const ALIGNMENT_LENGTH_FIELD: usize = 3;
const EVALUE_FIELD: usize = 10;
const QUERY_LENGTH_FIELD: usize = 12;
const SUBJECT_LENGTH_FIELD: usize = 13;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Hit on line {line} is not preceded by a '# Query:' header")]
    MissingQueryHeader { line: usize },

    #[error("Line {line} has {found} fields, expected {expected}")]
    FieldCount {
        line: usize,
        found: usize,
        expected: usize,
    },

    #[error("Invalid {field} on line {line}: '{value}'")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("Zero sequence length on line {line}")]
    InvalidLength { line: usize },
}

/// Quality thresholds a best hit must pass to count as a homolog
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitThresholds {
    /// Minimum percent identity
    pub identity: f64,
    /// Minimum alignment length as a percentage of the shorter sequence
    pub alignment: f64,
    /// Maximum e-value
    pub evalue: f64,
    /// Maximum length difference as a percentage of the shorter sequence
    pub length_variation: f64,
}

pub const DEFAULT_IDENTITY_THRESHOLD: f64 = 40.0;
pub const DEFAULT_ALIGNMENT_THRESHOLD: f64 = 70.0;
pub const DEFAULT_EVALUE_THRESHOLD: f64 = 1e-10;
/// Large enough that the length variation gate never triggers in practice
pub const DEFAULT_LENGTH_VARIATION_THRESHOLD: f64 = 999.0;

impl Default for HitThresholds {
    fn default() -> Self {
        Self {
            identity: DEFAULT_IDENTITY_THRESHOLD,
            alignment: DEFAULT_ALIGNMENT_THRESHOLD,
            evalue: DEFAULT_EVALUE_THRESHOLD,
            length_variation: DEFAULT_LENGTH_VARIATION_THRESHOLD,
        }
    }
}

impl HitThresholds {
    /// Length variation gate: |qlen - slen| <= min(qlen, slen) * variation%
    #[must_use]
    pub fn within_length_variation(&self, hit: &HitRecord) -> bool {
        let difference = (hit.query_length - hit.subject_length).abs();
        difference <= hit.shorter_length() * (self.length_variation / 100.0)
    }

    #[must_use]
    pub fn accepts(&self, hit: &HitRecord) -> bool {
        // The gate comes first: a length mismatch rejects regardless of quality
        self.within_length_variation(hit)
            && hit.evalue <= self.evalue
            && hit.identity >= self.identity
            && hit.coverage() >= self.alignment
    }

    #[must_use]
    pub fn evaluate(&self, hit: &HitRecord) -> BestHit {
        if self.accepts(hit) {
            BestHit::Gene(hit.subject.clone())
        } else {
            BestHit::NoHit
        }
    }
}

/// The columns of one tabular hit line that the thresholds need
#[derive(Debug, Clone, PartialEq)]
pub struct HitRecord {
    pub query: String,
    pub subject: String,
    pub identity: f64,
    pub alignment_length: f64,
    pub evalue: f64,
    pub query_length: f64,
    pub subject_length: f64,
}

impl HitRecord {
    /// Parse a whitespace-separated hit line
    ///
    /// # Errors
    ///
    /// Returns `ParseError::FieldCount` unless the line has exactly [`HIT_FIELDS`] columns,
    /// `ParseError::InvalidNumber` if a numeric column does not parse, or
    /// `ParseError::InvalidLength` if either sequence length is zero.
    pub fn parse_line(line: &str, line_num: usize) -> Result<Self, ParseError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != HIT_FIELDS {
            return Err(ParseError::FieldCount {
                line: line_num,
                found: fields.len(),
                expected: HIT_FIELDS,
            });
        }

        let number = |index: usize, field: &'static str| -> Result<f64, ParseError> {
            fields[index]
                .parse::<f64>()
                .ok()
                .filter(|v| !v.is_nan())
                .ok_or_else(|| ParseError::InvalidNumber {
                    line: line_num,
                    field,
                    value: fields[index].to_string(),
                })
        };

        let record = Self {
            query: fields[0].to_string(),
            subject: fields[1].to_string(),
            identity: number(IDENTITY_FIELD, "percent identity")?,
            alignment_length: number(ALIGNMENT_LENGTH_FIELD, "alignment length")?,
            evalue: number(EVALUE_FIELD, "e-value")?,
            query_length: number(QUERY_LENGTH_FIELD, "query length")?,
            subject_length: number(SUBJECT_LENGTH_FIELD, "subject length")?,
        };

        if record.shorter_length() <= 0.0 {
            return Err(ParseError::InvalidLength { line: line_num });
        }

        Ok(record)
    }

    pub fn shorter_length(&self) -> f64 {
        self.query_length.min(self.subject_length)
    }

    /// Alignment length as a percentage of the shorter sequence
    pub fn coverage(&self) -> f64 {
        self.alignment_length / self.shorter_length() * 100.0
    }
}

/// Extract the query id from a `# Query: <id> [description]` line
fn query_header(line: &str) -> Option<&str> {
    line.strip_prefix(QUERY_HEADER)
        .map(|rest| rest.split_whitespace().next().unwrap_or_default())
}

/// Turns one alignment result block into a best-hit verdict per query gene
#[derive(Debug, Clone, Copy, Default)]
pub struct HitRecordParser {
    thresholds: HitThresholds,
}

impl HitRecordParser {
    pub fn new(thresholds: HitThresholds) -> Self {
        Self { thresholds }
    }

    /// Parse result text held in memory
    ///
    /// # Errors
    ///
    /// See [`HitRecordParser::parse_reader`].
    pub fn parse_text(&self, text: &str) -> Result<GeneHits, ParseError> {
        self.parse_reader(text.as_bytes())
    }

    /// Parse a result block, keeping only the first hit reported for each query.
    ///
    /// Queries whose block holds no hit line map to [`BestHit::NoHit`], as do
    /// first hits that fail a threshold. Hits are keyed by the query column of
    /// the hit line; no-hit queries by the id in their `# Query:` header. A
    /// query that occurs twice keeps its first verdict.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingQueryHeader` if a hit line appears before
    /// any query header, or the errors of [`HitRecord::parse_line`] for a
    /// malformed first hit.
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<GeneHits, ParseError> {
        let mut hits = GeneHits::new();
        let mut seen_header = false;
        // Query whose header was read but whose first hit line has not been
        let mut pending: Option<String> = None;

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            // Line numbers in errors are 1-based for user friendliness
            let line_num = i + 1;

            if line.is_empty() {
                continue;
            }

            if line.starts_with('#') {
                if let Some(query) = query_header(line) {
                    if let Some(previous) = pending.take() {
                        hits.entry(previous).or_insert(BestHit::NoHit);
                    }
                    if query.is_empty() {
                        return Err(ParseError::MissingQueryHeader { line: line_num });
                    }
                    pending = Some(query.to_string());
                    seen_header = true;
                }
                continue;
            }

            if !seen_header {
                return Err(ParseError::MissingQueryHeader { line: line_num });
            }

            // Only the first hit of a block is the best hit
            if pending.take().is_some() {
                let record = HitRecord::parse_line(line, line_num)?;
                let verdict = self.thresholds.evaluate(&record);
                hits.entry(record.query).or_insert(verdict);
            }
        }

        if let Some(previous) = pending {
            hits.entry(previous).or_insert(BestHit::NoHit);
        }

        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "# BLASTP 2.12.0+\n# Database: B\n";

    fn hit_line(query: &str, subject: &str, identity: f64, length: u32, evalue: &str) -> String {
        format!("{query}\t{subject}\t{identity}\t{length}\t10\t1\t1\t300\t1\t300\t{evalue}\t450\t300\t300\t2")
    }

    fn hit_line_with_lengths(qlen: u32, slen: u32) -> String {
        format!("a1\tb1\t90.0\t1000\t10\t1\t1\t1000\t1\t1000\t1e-80\t900\t{qlen}\t{slen}\t2")
    }

    fn parse(text: &str) -> GeneHits {
        HitRecordParser::default().parse_text(text).unwrap()
    }

    #[test]
    fn test_first_hit_is_best_hit() {
        let text = format!(
            "{HEADER}# Query: a1 hypothetical protein\n# Fields: ...\n# 2 hits found\n{}\n{}\n",
            hit_line("a1", "b1", 85.0, 290, "1e-50"),
            hit_line("a1", "b2", 95.0, 300, "1e-90"),
        );
        let hits = parse(&text);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits["a1"], BestHit::Gene("b1".to_string()));
    }

    #[test]
    fn test_query_without_hits_is_no_hit() {
        let text = format!(
            "{HEADER}# Query: a1\n# 0 hits found\n# Query: a2\n# 1 hits found\n{}\n# Query: a3\n# 0 hits found\n",
            hit_line("a2", "b2", 85.0, 290, "1e-50"),
        );
        let hits = parse(&text);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits["a1"], BestHit::NoHit);
        assert_eq!(hits["a2"].gene(), Some("b2"));
        assert_eq!(hits["a3"], BestHit::NoHit);
    }

    #[test]
    fn test_default_thresholds() {
        let text = format!(
            "# Query: low_identity\n{}\n# Query: weak_evalue\n{}\n# Query: short_alignment\n{}\n# Query: at_limits\n{}\n",
            hit_line("low_identity", "b1", 39.9, 290, "1e-50"),
            hit_line("weak_evalue", "b2", 85.0, 290, "1e-9"),
            hit_line("short_alignment", "b3", 85.0, 209, "1e-50"),
            hit_line("at_limits", "b4", 40.0, 210, "1e-10"),
        );
        let hits = parse(&text);
        assert_eq!(hits["low_identity"], BestHit::NoHit);
        assert_eq!(hits["weak_evalue"], BestHit::NoHit);
        assert_eq!(hits["short_alignment"], BestHit::NoHit);
        assert_eq!(hits["at_limits"].gene(), Some("b4"));
    }

    #[test]
    fn test_length_variation_gate_rejects_first() {
        let thresholds = HitThresholds {
            length_variation: 10.0,
            ..HitThresholds::default()
        };
        let parser = HitRecordParser::new(thresholds);

        // 200 > 1000 * 10%, even though identity, coverage and e-value are fine
        let text = format!("# Query: a1\n{}\n", hit_line_with_lengths(1000, 1200));
        assert_eq!(parser.parse_text(&text).unwrap()["a1"], BestHit::NoHit);

        let text = format!("# Query: a1\n{}\n", hit_line_with_lengths(1000, 1100));
        assert_eq!(parser.parse_text(&text).unwrap()["a1"].gene(), Some("b1"));
    }

    #[test]
    fn test_coverage_uses_shorter_sequence() {
        let record = HitRecord::parse_line(&hit_line_with_lengths(1000, 1400), 1).unwrap();
        assert!((record.shorter_length() - 1000.0).abs() < f64::EPSILON);
        assert!((record.coverage() - 100.0).abs() < f64::EPSILON);
        assert!(HitThresholds::default().accepts(&record));
    }

    #[test]
    fn test_hit_before_query_header_is_error() {
        let text = format!("{HEADER}{}\n", hit_line("a1", "b1", 85.0, 290, "1e-50"));
        let err = HitRecordParser::default().parse_text(&text).unwrap_err();
        assert!(matches!(err, ParseError::MissingQueryHeader { line: 3 }));
    }

    #[test]
    fn test_short_line_is_error() {
        let text = "# Query: a1\na1\tb1\t85.0\t290\n";
        let err = HitRecordParser::default().parse_text(text).unwrap_err();
        assert!(matches!(
            err,
            ParseError::FieldCount {
                line: 2,
                found: 4,
                expected: HIT_FIELDS
            }
        ));
    }

    #[test]
    fn test_other_column_layout_is_error() {
        // Default -outfmt 7 columns: no qlen, slen or gaps
        let text = "# Query: a1\na1\tb1\t85.0\t290\t10\t1\t1\t300\t1\t300\t1e-50\t450\n";
        let err = HitRecordParser::default().parse_text(text).unwrap_err();
        assert!(matches!(err, ParseError::FieldCount { line: 2, found: 12, .. }));

        let extra = format!("# Query: a1\n{}\tqcovs\n", hit_line("a1", "b1", 85.0, 290, "1e-50"));
        let err = HitRecordParser::default().parse_text(&extra).unwrap_err();
        assert!(matches!(
            err,
            ParseError::FieldCount {
                line: 2,
                found: 16,
                expected: HIT_FIELDS
            }
        ));
    }

    #[test]
    fn test_non_numeric_field_is_error() {
        let text = "# Query: a1\na1\tb1\thigh\t290\t10\t1\t1\t300\t1\t300\t1e-50\t450\t300\t300\t2\n";
        let err = HitRecordParser::default().parse_text(text).unwrap_err();
        match err {
            ParseError::InvalidNumber { line, field, value } => {
                assert_eq!(line, 2);
                assert_eq!(field, "percent identity");
                assert_eq!(value, "high");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_length_is_error() {
        let text = format!("# Query: a1\n{}\n", hit_line_with_lengths(0, 300));
        let err = HitRecordParser::default().parse_text(&text).unwrap_err();
        assert!(matches!(err, ParseError::InvalidLength { line: 2 }));
    }

    #[test]
    fn test_malformed_secondary_hits_are_ignored() {
        let text = format!(
            "# Query: a1\n{}\nthis line is never read\n",
            hit_line("a1", "b1", 85.0, 290, "1e-50")
        );
        assert_eq!(parse(&text)["a1"].gene(), Some("b1"));
    }

    #[test]
    fn test_repeated_query_keeps_first_verdict() {
        let text = format!(
            "# Query: a1\n{}\n# Query: a1\n{}\n",
            hit_line("a1", "b1", 85.0, 290, "1e-50"),
            hit_line("a1", "b2", 85.0, 290, "1e-50"),
        );
        assert_eq!(parse(&text)["a1"].gene(), Some("b1"));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("# BLASTP 2.12.0+\n# BLAST processed 0 queries\n").is_empty());
    }
}
