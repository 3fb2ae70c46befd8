//! Concurrent availability checks for domain hack candidates

use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::time::timeout;

use super::candidate::{candidates, normalize_query, Candidate};
use crate::catalog::TldCatalog;
use crate::error::{DomainHackError, Result};
use crate::resolver::{DohResolver, NsLookup};
use crate::types::{Availability, DomainHackSuggestion, HackConfig};

/// Finds domain hacks for a query against a fixed TLD catalog
pub struct DomainHackMatcher {
    catalog: Arc<TldCatalog>,
    resolver: Arc<dyn NsLookup>,
    config: HackConfig,
    semaphore: Semaphore,
}

impl DomainHackMatcher {
    /// Matcher backed by the DoH resolver named in `config`
    pub fn new(catalog: Arc<TldCatalog>, config: HackConfig) -> Result<Self> {
        let resolver = Arc::new(DohResolver::from_config(&config));
        Self::with_resolver(catalog, resolver, config)
    }

    /// Matcher with a caller-supplied resolver
    pub fn with_resolver(
        catalog: Arc<TldCatalog>,
        resolver: Arc<dyn NsLookup>,
        config: HackConfig,
    ) -> Result<Self> {
        config.validate()?;
        let semaphore = Semaphore::new(config.max_concurrent_lookups);

        Ok(Self {
            catalog,
            resolver,
            config,
            semaphore,
        })
    }

    /// Every domain hack for `query`, longest TLD first.
    ///
    /// Lookups that fail are handled by the configured failure policy.
    pub async fn find_domain_hacks(&self, query: &str) -> Vec<DomainHackSuggestion> {
        let policy = self.config.failure_policy;

        self.check_candidates(query)
            .await
            .into_iter()
            .filter_map(|(candidate, availability)| {
                let available = policy.resolve(&availability)?;
                Some(DomainHackSuggestion::new(candidate.left, candidate.tld, available))
            })
            .collect()
    }

    /// Candidates for `query` paired with their raw lookup outcome
    pub async fn check_candidates(&self, query: &str) -> Vec<(Candidate, Availability)> {
        let normalized = normalize_query(query);
        let candidates = candidates(&normalized, &self.catalog);
        if candidates.is_empty() {
            return Vec::new();
        }

        let batch_start = Instant::now();
        let lookups = candidates.iter().map(|candidate| self.check_candidate(candidate));
        let outcomes = join_all(lookups).await;

        let unknown = outcomes.iter().filter(|a| !a.is_known()).count();
        tracing::info!(
            query = %normalized,
            candidates = candidates.len(),
            unknown,
            resolver = self.resolver.name(),
            batch_duration_ms = %batch_start.elapsed().as_millis(),
            "Domain hack lookups completed"
        );

        candidates.into_iter().zip(outcomes).collect()
    }

    /// One candidate, with its own deadline and retries; never fails
    async fn check_candidate(&self, candidate: &Candidate) -> Availability {
        let domain = candidate.domain();

        let _permit = match self.semaphore.acquire().await {
            Ok(permit) => permit,
            Err(e) => return Availability::Unknown(format!("Failed to acquire semaphore: {}", e)),
        };

        let mut attempt = 0;
        loop {
            let start = Instant::now();
            match self.lookup_once(&domain).await {
                Ok(availability) => {
                    tracing::debug!(
                        domain = %domain,
                        status = %availability,
                        attempt,
                        duration_ms = %start.elapsed().as_millis(),
                        "NS lookup completed"
                    );
                    return availability;
                }
                Err(e) if e.is_transient() && attempt < self.config.retry_attempts => {
                    attempt += 1;
                    tracing::debug!(domain = %domain, error = %e, attempt, "Retrying NS lookup");
                }
                Err(e) => {
                    tracing::warn!(domain = %domain, error = %e, "NS lookup failed");
                    return Availability::Unknown(e.to_string());
                }
            }
        }
    }

    async fn lookup_once(&self, domain: &str) -> Result<Availability> {
        let deadline = self.config.lookup_timeout;
        timeout(deadline, self.resolver.lookup_ns(domain))
            .await
            .map_err(|_| {
                DomainHackError::timeout(
                    format!("NS lookup for {}", domain),
                    deadline.as_millis() as u64,
                )
            })?
    }
}
