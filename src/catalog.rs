//! TLD catalog
//!
//! The catalog is loaded once at startup and never mutated. Entries are kept
//! longest first so a query ending in `co.uk` is split on `co.uk` before `uk`.

use std::cmp::Ordering;
use std::path::Path;

use crate::error::{DomainHackError, Result};

/// TLD list compiled into the binary
const BUNDLED_TLDS: &str = include_str!("../data/tld-list.json");

/// Read-only, ordered set of known TLDs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TldCatalog {
    tlds: Vec<String>,
}

impl TldCatalog {
    /// Build a catalog from in-memory TLD strings
    pub fn from_tlds<I, S>(tlds: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized = tlds
            .into_iter()
            .map(|tld| normalize_tld(tld.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        normalized.sort_by(|a, b| longest_first(a, b));
        normalized.dedup();

        Ok(Self { tlds: normalized })
    }

    /// Parse a JSON array of TLD strings
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: Vec<String> = serde_json::from_str(json).map_err(|e| {
            DomainHackError::catalog(format!("expected a JSON array of strings: {}", e))
        })?;
        Self::from_tlds(raw)
    }

    /// Load a JSON TLD list from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            DomainHackError::io(e.to_string(), Some(path.display().to_string()))
        })?;
        let catalog = Self::from_json_str(&json)?;

        tracing::debug!(path = %path.display(), tlds = catalog.len(), "Loaded TLD catalog");
        Ok(catalog)
    }

    /// The TLD list shipped with the crate
    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED_TLDS)
    }

    /// TLDs in matching order
    pub fn tlds(&self) -> &[String] {
        &self.tlds
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tlds.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tlds.is_empty()
    }

    pub fn contains(&self, tld: &str) -> bool {
        let tld = tld.trim().trim_start_matches('.').to_lowercase();
        self.tlds.iter().any(|t| *t == tld)
    }
}

/// Lowercase and drop a leading dot, so `.IO` and `io` are the same entry
fn normalize_tld(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let tld = trimmed.strip_prefix('.').unwrap_or(trimmed).to_lowercase();

    if tld.is_empty() {
        return Err(DomainHackError::catalog("TLD list contains an empty entry"));
    }
    if tld.chars().any(char::is_whitespace) || tld.starts_with('.') || tld.ends_with('.') {
        return Err(DomainHackError::catalog(format!("invalid TLD entry: '{}'", raw)));
    }
    Ok(tld)
}

/// Descending length, then ascending lexicographic
fn longest_first(a: &str, b: &str) -> Ordering {
    b.chars()
        .count()
        .cmp(&a.chars().count())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sorted_longest_first_with_lexicographic_ties() {
        let catalog = TldCatalog::from_tlds(["io", "co", "com", "app", "co.uk", "ai"]).unwrap();
        assert_eq!(catalog.tlds(), &["co.uk", "app", "com", "ai", "co", "io"]);
    }

    #[test]
    fn test_entries_are_lowercased_and_undotted() {
        let catalog = TldCatalog::from_json_str(r#"[".IO", "Co", "ME"]"#).unwrap();
        assert_eq!(catalog.tlds(), &["co", "io", "me"]);
        assert!(catalog.contains(".io"));
        assert!(catalog.contains("CO"));
        assert!(!catalog.contains("com"));
    }

    #[test]
    fn test_duplicates_collapse() {
        let catalog = TldCatalog::from_tlds(["io", ".io", "IO"]).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(
            TldCatalog::from_json_str("{\"tlds\": []}"),
            Err(DomainHackError::Catalog { .. })
        ));
        assert!(TldCatalog::from_json_str("[1, 2]").is_err());
        assert!(TldCatalog::from_json_str("not json").is_err());
    }

    #[test]
    fn test_blank_entries_are_rejected() {
        assert!(TldCatalog::from_tlds(["io", "  "]).is_err());
        assert!(TldCatalog::from_tlds(["."]).is_err());
        assert!(TldCatalog::from_tlds(["c o"]).is_err());
    }

    #[test]
    fn test_empty_array_is_an_empty_catalog() {
        let catalog = TldCatalog::from_json_str("[]").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = TldCatalog::from_path("/definitely/not/here/tld-list.json").unwrap_err();
        assert!(matches!(err, DomainHackError::Io { path: Some(_), .. }));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"["io", "ly", "ple"]"#).unwrap();

        let catalog = TldCatalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.tlds(), &["ple", "io", "ly"]);
    }

    #[test]
    fn test_bundled_catalog_loads() {
        let catalog = TldCatalog::bundled().unwrap();
        assert!(catalog.len() > 100);
        assert!(catalog.contains("io"));

        let lengths: Vec<usize> = catalog.iter().map(|t| t.chars().count()).collect();
        assert!(lengths.windows(2).all(|w| w[0] >= w[1]));
    }
}
