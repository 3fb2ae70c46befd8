//! NS lookups used to decide whether a candidate is registered

pub mod doh;

pub use doh::DohResolver;

use crate::error::Result;
use crate::types::Availability;
use async_trait::async_trait;

/// Trait for anything that can tell whether a domain has NS records
#[async_trait]
pub trait NsLookup: Send + Sync {
    /// Look up NS records for a fully-qualified domain
    async fn lookup_ns(&self, domain: &str) -> Result<Availability>;

    /// Short name used in logs
    fn name(&self) -> &str;
}
