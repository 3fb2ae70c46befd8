//! Candidate generation: every (label, TLD) split of a query

use crate::catalog::TldCatalog;

/// A query split into a leftmost label and a cataloged TLD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub left: String,
    pub tld: String,
}

impl Candidate {
    /// Fully-qualified name to look up, `left.tld`
    pub fn domain(&self) -> String {
        format!("{}.{}", self.left, self.tld)
    }
}

/// Trim, lowercase and drop every whitespace character
pub fn normalize_query(query: &str) -> String {
    query
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Split `normalized` on `tld` if it ends with it.
///
/// A single dot in front of the suffix is dropped, so `hello.io` and
/// `helloio` both give `hello` + `io`. Returns `None` when nothing is
/// left for the label.
pub fn split_candidate(normalized: &str, tld: &str) -> Option<Candidate> {
    let prefix = normalized.strip_suffix(tld)?;
    let left = prefix.strip_suffix('.').unwrap_or(prefix);

    if left.is_empty() {
        return None;
    }

    Some(Candidate {
        left: left.to_string(),
        tld: tld.to_string(),
    })
}

/// All candidates for an already-normalized query, in catalog order
pub fn candidates(normalized: &str, catalog: &TldCatalog) -> Vec<Candidate> {
    if normalized.is_empty() {
        return Vec::new();
    }

    catalog
        .iter()
        .filter_map(|tld| split_candidate(normalized, tld))
        .collect()
}
