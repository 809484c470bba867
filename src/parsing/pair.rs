use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

/// Extension marking an alignment result file as eligible
pub const HIT_FILE_EXTENSION: &str = "bl";

/// Separator between the two organism names in a result file name
pub const PAIR_SEPARATOR: &str = "-vs-";

/// An alignment result file for an ordered organism pair
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PairFile {
    pub reference: String,
    pub target: String,
    pub path: PathBuf,
}

impl PairFile {
    /// Interpret a path as `<ref>-vs-<tar>.bl` (or `.bl.gz`).
    ///
    /// Returns `None` for anything that does not follow the convention exactly:
    /// wrong extension, missing separator, more than one separator, or an empty
    /// organism name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let stem = strip_hit_extension(file_name)?;

        let mut parts = stem.split(PAIR_SEPARATOR);
        let reference = parts.next()?;
        let target = parts.next()?;
        if parts.next().is_some() || reference.is_empty() || target.is_empty() {
            return None;
        }

        Some(Self {
            reference: reference.to_string(),
            target: target.to_string(),
            path: path.to_path_buf(),
        })
    }

    pub fn is_self_pair(&self) -> bool {
        self.reference == self.target
    }

    pub fn is_gzipped(&self) -> bool {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("gz"))
    }

    /// Open the file for line reading, decompressing gzip transparently
    ///
    /// # Errors
    ///
    /// Returns the underlying IO error if the file cannot be opened.
    pub fn open(&self) -> std::io::Result<Box<dyn BufRead>> {
        let file = File::open(&self.path)?;
        if self.is_gzipped() {
            Ok(Box::new(BufReader::new(GzDecoder::new(file))))
        } else {
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

/// Strip `.bl` or `.bl.gz` from a file name
fn strip_hit_extension(file_name: &str) -> Option<&str> {
    let name = file_name.strip_suffix(".gz").unwrap_or(file_name);
    let (stem, extension) = name.rsplit_once('.')?;
    (extension == HIT_FILE_EXTENSION).then_some(stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_from_path() {
        let pair = PairFile::from_path(Path::new("/data/Sco_A3-vs-Sgr_NBRC.bl")).unwrap();
        assert_eq!(pair.reference, "Sco_A3");
        assert_eq!(pair.target, "Sgr_NBRC");
        assert!(!pair.is_self_pair());
        assert!(!pair.is_gzipped());
    }

    #[test]
    fn test_pair_from_gzipped_path() {
        let pair = PairFile::from_path(Path::new("A-vs-B.bl.gz")).unwrap();
        assert_eq!(pair.reference, "A");
        assert_eq!(pair.target, "B");
        assert!(pair.is_gzipped());
    }

    #[test]
    fn test_organism_names_may_contain_dots() {
        let pair = PairFile::from_path(Path::new("S.coelicolor_A3(2)-vs-S.griseus.bl")).unwrap();
        assert_eq!(pair.reference, "S.coelicolor_A3(2)");
        assert_eq!(pair.target, "S.griseus");
    }

    #[test]
    fn test_self_pair() {
        let pair = PairFile::from_path(Path::new("A-vs-A.bl")).unwrap();
        assert!(pair.is_self_pair());
    }

    #[test]
    fn test_ineligible_names_are_ignored() {
        assert!(PairFile::from_path(Path::new("A-vs-B.txt")).is_none());
        assert!(PairFile::from_path(Path::new("A-vs-B.bl.bak")).is_none());
        assert!(PairFile::from_path(Path::new("A_B.bl")).is_none());
        assert!(PairFile::from_path(Path::new("A-vs-B-vs-C.bl")).is_none());
        assert!(PairFile::from_path(Path::new("-vs-B.bl")).is_none());
        assert!(PairFile::from_path(Path::new("A-vs-.bl")).is_none());
        assert!(PairFile::from_path(Path::new("bl")).is_none());
    }
}
