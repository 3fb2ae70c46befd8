//! Domain hack discovery
//!
//! A domain hack splits a word so its ending becomes the TLD: `example` with
//! the catalog entry `ple` gives `exam.ple`.

pub mod candidate;
pub mod matcher;

pub use candidate::{candidates, normalize_query, split_candidate, Candidate};
pub use matcher::DomainHackMatcher;
