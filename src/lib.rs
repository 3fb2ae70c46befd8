//! Domain Hack - find domain names where the TLD finishes the word
//!
//! Given a query such as `example`, every cataloged TLD the query ends with
//! becomes a candidate (`exam.ple`, `examp.le`, ...) and each candidate is
//! checked for NS records over DNS-over-HTTPS.

pub mod catalog;
pub mod error;
pub mod hack;
pub mod resolver;
pub mod types;

// Re-export commonly used types
pub use catalog::TldCatalog;
pub use error::{DomainHackError, Result};
pub use types::{Availability, DomainHackSuggestion, FailurePolicy, HackConfig};

// Re-export main functionality
pub use hack::{normalize_query, DomainHackMatcher};
pub use resolver::{DohResolver, NsLookup};

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
