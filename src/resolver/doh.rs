//! DNS-over-HTTPS (JSON API) NS resolver

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::NsLookup;
use crate::error::{DomainHackError, Result};
use crate::types::{Availability, HackConfig};

/// Record type for name server records
const NS_RECORD_TYPE: u16 = 2;

/// Resolver speaking the `application/dns-json` dialect (Cloudflare, Google)
pub struct DohResolver {
    client: Client,
    endpoint: String,
}

impl DohResolver {
    /// Create a resolver for the given endpoint with a default client
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(build_client(Duration::from_secs(30)), endpoint)
    }

    /// Create a resolver from checker configuration
    pub fn from_config(config: &HackConfig) -> Self {
        Self::with_client(
            build_client(config.lookup_timeout),
            config.resolver_url.clone(),
        )
    }

    /// Create a resolver sharing an existing HTTP client
    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("domain-hack/", env!("CARGO_PKG_VERSION")))
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to create HTTP client: {}. Using default.", e);
            Client::new()
        })
}

#[async_trait]
impl NsLookup for DohResolver {
    async fn lookup_ns(&self, domain: &str) -> Result<Availability> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("name", domain), ("type", "NS")])
            .header(reqwest::header::ACCEPT, "application/dns-json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainHackError::network(
                format!("DoH request failed with status {}", status),
                Some(status.as_u16()),
                Some(self.endpoint.clone()),
            ));
        }

        let text = response.text().await?;
        let parsed: DohResponse = serde_json::from_str(&text)
            .map_err(|e| DomainHackError::parse(e.to_string(), Some(text)))?;

        tracing::trace!(
            domain = %domain,
            rcode = parsed.status,
            answers = parsed.answer.as_ref().map_or(0, Vec::len),
            "DoH response"
        );

        Ok(parsed.availability())
    }

    fn name(&self) -> &str {
        "doh"
    }
}

/// Subset of the DNS JSON response we care about
#[derive(Debug, Deserialize)]
struct DohResponse {
    /// DNS RCODE (0 = NOERROR, 3 = NXDOMAIN)
    #[serde(rename = "Status", default)]
    status: u16,
    #[serde(rename = "Answer")]
    answer: Option<Vec<DohAnswer>>,
}

#[derive(Debug, Deserialize)]
struct DohAnswer {
    #[serde(rename = "type", default)]
    record_type: u16,
    #[serde(default)]
    data: String,
}

impl DohResponse {
    /// Any answer means the name is delegated somewhere
    fn availability(&self) -> Availability {
        match &self.answer {
            Some(answers) if !answers.is_empty() => {
                let nameservers: Vec<&str> = answers
                    .iter()
                    .filter(|a| a.record_type == NS_RECORD_TYPE)
                    .map(|a| a.data.as_str())
                    .collect();
                tracing::trace!(answers = answers.len(), ?nameservers, "Domain has DNS answers");
                Availability::Taken
            }
            _ => Availability::Available,
        }
    }
}
