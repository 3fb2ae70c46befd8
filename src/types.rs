//! Core types and structures for domain-hack

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{DomainHackError, Result};

/// Default public DNS-over-HTTPS endpoint (JSON API)
pub const DEFAULT_RESOLVER_URL: &str = "https://cloudflare-dns.com/dns-query";

/// One domain hack for a query, e.g. `exa.mple` for `example`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainHackSuggestion {
    pub domain: String,
    pub host: String,
    /// Matched TLD as stored in the catalog, without its leading dot (`io`)
    pub tld: String,
    pub left: String,
    pub available: bool,
}

impl DomainHackSuggestion {
    pub fn new(left: impl Into<String>, tld: impl Into<String>, available: bool) -> Self {
        let left = left.into();
        let tld = tld.into();
        let domain = format!("{}.{}", left, tld);
        Self {
            host: domain.clone(),
            domain,
            tld,
            left,
            available,
        }
    }
}

/// Outcome of a single NS lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// No NS records came back
    Available,
    /// At least one NS record came back
    Taken,
    /// The lookup failed; carries the reason
    Unknown(String),
}

impl Availability {
    pub fn is_known(&self) -> bool {
        !matches!(self, Availability::Unknown(_))
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Availability::Available => write!(f, "available"),
            Availability::Taken => write!(f, "taken"),
            Availability::Unknown(_) => write!(f, "unknown"),
        }
    }
}

/// What to report for a candidate whose lookup failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Leave the candidate out of the results
    #[default]
    Omit,
    /// Report it as available (fail-open)
    Available,
    /// Report it as registered (fail-closed)
    Unavailable,
}

impl FailurePolicy {
    /// Map a lookup outcome to the `available` flag, or `None` to drop it
    pub fn resolve(&self, availability: &Availability) -> Option<bool> {
        match availability {
            Availability::Available => Some(true),
            Availability::Taken => Some(false),
            Availability::Unknown(_) => match self {
                FailurePolicy::Omit => None,
                FailurePolicy::Available => Some(true),
                FailurePolicy::Unavailable => Some(false),
            },
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = DomainHackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "omit" | "skip" => Ok(FailurePolicy::Omit),
            "available" | "open" => Ok(FailurePolicy::Available),
            "unavailable" | "taken" | "closed" => Ok(FailurePolicy::Unavailable),
            other => Err(DomainHackError::config(format!(
                "Unknown failure policy '{}'. Expected omit, available or unavailable",
                other
            ))),
        }
    }
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::Omit => write!(f, "omit"),
            FailurePolicy::Available => write!(f, "available"),
            FailurePolicy::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Configuration for domain hack lookups
#[derive(Debug, Clone)]
pub struct HackConfig {
    /// DNS-over-HTTPS JSON endpoint
    pub resolver_url: String,
    /// Deadline for each lookup, independent of its siblings
    pub lookup_timeout: Duration,
    /// Extra attempts after a transient failure
    pub retry_attempts: usize,
    /// Upper bound on lookups in flight across all queries sharing a matcher
    pub max_concurrent_lookups: usize,
    pub failure_policy: FailurePolicy,
}

impl Default for HackConfig {
    fn default() -> Self {
        Self {
            resolver_url: DEFAULT_RESOLVER_URL.to_string(),
            lookup_timeout: Duration::from_secs(5),
            retry_attempts: 1,
            max_concurrent_lookups: 32,
            failure_policy: FailurePolicy::Omit,
        }
    }
}

impl HackConfig {
    /// Defaults overridden by `DOMAIN_HACK_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("DOMAIN_HACK_RESOLVER_URL") {
            config.resolver_url = url;
        }
        if let Some(secs) = lookup("DOMAIN_HACK_TIMEOUT_SECS") {
            let secs: f64 = parse_env("DOMAIN_HACK_TIMEOUT_SECS", &secs)?;
            if !secs.is_finite() || secs <= 0.0 {
                return Err(DomainHackError::config(
                    "DOMAIN_HACK_TIMEOUT_SECS must be a positive number",
                ));
            }
            config.lookup_timeout = Duration::from_secs_f64(secs);
        }
        if let Some(retries) = lookup("DOMAIN_HACK_RETRIES") {
            config.retry_attempts = parse_env("DOMAIN_HACK_RETRIES", &retries)?;
        }
        if let Some(limit) = lookup("DOMAIN_HACK_CONCURRENCY") {
            config.max_concurrent_lookups = parse_env("DOMAIN_HACK_CONCURRENCY", &limit)?;
        }
        if let Some(policy) = lookup("DOMAIN_HACK_ON_FAILURE") {
            config.failure_policy = policy.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would stall or misroute every lookup
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_lookups == 0 {
            return Err(DomainHackError::config(
                "max concurrent lookups must be at least 1",
            ));
        }
        if self.lookup_timeout.is_zero() {
            return Err(DomainHackError::config("lookup timeout must be non-zero"));
        }
        if !self.resolver_url.starts_with("https://") && !self.resolver_url.starts_with("http://") {
            return Err(DomainHackError::config(format!(
                "resolver URL must be http(s): {}",
                self.resolver_url
            )));
        }
        Ok(())
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| DomainHackError::config(format!("Invalid value for {}: '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_suggestion_fields() {
        let s = DomainHackSuggestion::new("exa", "mple", true);
        assert_eq!(s.domain, "exa.mple");
        assert_eq!(s.host, s.domain);
        assert_eq!(s.left, "exa");
        assert_eq!(s.tld, "mple");
    }

    #[test]
    fn test_suggestion_serializes_flat() {
        let s = DomainHackSuggestion::new("hello", "io", false);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "domain": "hello.io",
                "host": "hello.io",
                "tld": "io",
                "left": "hello",
                "available": false
            })
        );
    }

    #[test]
    fn test_failure_policy_resolve() {
        let unknown = Availability::Unknown("boom".to_string());
        assert_eq!(FailurePolicy::Omit.resolve(&unknown), None);
        assert_eq!(FailurePolicy::Available.resolve(&unknown), Some(true));
        assert_eq!(FailurePolicy::Unavailable.resolve(&unknown), Some(false));

        for policy in [FailurePolicy::Omit, FailurePolicy::Available, FailurePolicy::Unavailable] {
            assert_eq!(policy.resolve(&Availability::Available), Some(true));
            assert_eq!(policy.resolve(&Availability::Taken), Some(false));
        }
    }

    #[test]
    fn test_failure_policy_parse() {
        assert_eq!("omit".parse::<FailurePolicy>().unwrap(), FailurePolicy::Omit);
        assert_eq!(" Available ".parse::<FailurePolicy>().unwrap(), FailurePolicy::Available);
        assert_eq!("taken".parse::<FailurePolicy>().unwrap(), FailurePolicy::Unavailable);
        assert!("maybe".parse::<FailurePolicy>().is_err());
    }

    #[test]
    fn test_config_from_env() {
        let config = HackConfig::from_lookup(env_of(&[
            ("DOMAIN_HACK_RESOLVER_URL", "https://dns.google/resolve"),
            ("DOMAIN_HACK_TIMEOUT_SECS", "1.5"),
            ("DOMAIN_HACK_RETRIES", "0"),
            ("DOMAIN_HACK_CONCURRENCY", "4"),
            ("DOMAIN_HACK_ON_FAILURE", "unavailable"),
        ]))
        .unwrap();

        assert_eq!(config.resolver_url, "https://dns.google/resolve");
        assert_eq!(config.lookup_timeout, Duration::from_millis(1500));
        assert_eq!(config.retry_attempts, 0);
        assert_eq!(config.max_concurrent_lookups, 4);
        assert_eq!(config.failure_policy, FailurePolicy::Unavailable);
    }

    #[test]
    fn test_config_defaults_without_env() {
        let config = HackConfig::from_lookup(env_of(&[])).unwrap();
        assert_eq!(config.resolver_url, DEFAULT_RESOLVER_URL);
        assert_eq!(config.failure_policy, FailurePolicy::Omit);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        assert!(HackConfig::from_lookup(env_of(&[("DOMAIN_HACK_CONCURRENCY", "0")])).is_err());
        assert!(HackConfig::from_lookup(env_of(&[("DOMAIN_HACK_TIMEOUT_SECS", "-1")])).is_err());
        assert!(HackConfig::from_lookup(env_of(&[("DOMAIN_HACK_RETRIES", "lots")])).is_err());
        let bare_host = env_of(&[("DOMAIN_HACK_RESOLVER_URL", "dns.google")]);
        assert!(HackConfig::from_lookup(bare_host).is_err());
    }
}
