//! Domain Hack - find domain hacks for a word from the command line

use anyhow::Context;
use clap::Parser;
use domain_hack::{
    DomainHackMatcher, DomainHackSuggestion, FailurePolicy, HackConfig, TldCatalog,
};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "domain-hack",
    about = "Find domain hacks for a word and check whether they are registered",
    version,
    long_about = None
)]
struct Args {
    /// Word or phrase to hack, e.g. "example"
    #[arg(required = true)]
    query: Vec<String>,

    /// JSON file with an array of TLDs (defaults to the bundled list)
    #[arg(short, long, env = "DOMAIN_HACK_TLD_FILE")]
    tlds: Option<PathBuf>,

    /// DNS-over-HTTPS JSON endpoint
    #[arg(long)]
    resolver: Option<String>,

    /// Per-lookup timeout in seconds
    #[arg(long)]
    timeout: Option<f64>,

    /// Retries for a lookup that failed transiently
    #[arg(long)]
    retries: Option<usize>,

    /// Maximum lookups in flight
    #[arg(long)]
    concurrency: Option<usize>,

    /// What to report when a lookup fails: omit, available or unavailable
    #[arg(long)]
    on_failure: Option<FailurePolicy>,

    /// Print suggestions as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    // Initialize the library
    if let Err(e) = domain_hack::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }

    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        match e.downcast_ref::<domain_hack::DomainHackError>() {
            Some(err) => eprintln!("{}", err.user_message()),
            None => eprintln!("❌ Error: {:#}", e),
        }
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "domain_hack=debug" } else { "domain_hack=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = build_config(&args)?;

    // A broken catalog means nothing can be matched
    let catalog = match &args.tlds {
        Some(path) => TldCatalog::from_path(path)?,
        None => TldCatalog::bundled().context("bundled TLD list is invalid")?,
    };
    tracing::debug!(tlds = catalog.len(), resolver = %config.resolver_url, "Catalog ready");

    let matcher = DomainHackMatcher::new(Arc::new(catalog), config)?;
    let query = args.query.join(" ");

    let start = Instant::now();
    let suggestions = matcher.find_domain_hacks(&query).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
    } else {
        display_suggestions(&query, &suggestions, start.elapsed());
    }

    Ok(())
}

/// Environment first, then command line flags
fn build_config(args: &Args) -> domain_hack::Result<HackConfig> {
    let mut config = HackConfig::from_env()?;

    if let Some(url) = &args.resolver {
        config.resolver_url = url.clone();
    }
    if let Some(secs) = args.timeout {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(domain_hack::DomainHackError::config(
                "--timeout must be a positive number",
            ));
        }
        config.lookup_timeout = Duration::from_secs_f64(secs);
    }
    if let Some(retries) = args.retries {
        config.retry_attempts = retries;
    }
    if let Some(limit) = args.concurrency {
        config.max_concurrent_lookups = limit;
    }
    if let Some(policy) = args.on_failure {
        config.failure_policy = policy;
    }

    config.validate()?;
    Ok(config)
}

fn display_suggestions(query: &str, suggestions: &[DomainHackSuggestion], elapsed: Duration) {
    if suggestions.is_empty() {
        if domain_hack::normalize_query(query).is_empty() {
            println!("Enter a search term to find domain hacks.");
        } else {
            println!("😔 No domain hacks found for \"{}\".", query.trim());
        }
        return;
    }

    println!("🔍 Domain hacks for \"{}\" ({}):", query.trim(), suggestions.len());
    println!("═══════════════════════════════");

    for suggestion in suggestions {
        if suggestion.available {
            println!("✅ {:<24} AVAILABLE", suggestion.domain);
        } else {
            println!("❌ {:<24} TAKEN", suggestion.domain);
        }
    }

    let available = suggestions.iter().filter(|s| s.available).count();
    println!();
    println!("📈 Summary:");
    println!("   ✅ Available: {}", available);
    println!("   ❌ Taken: {}", suggestions.len() - available);
    println!("   ⏱️  Total time: {:.2}s", elapsed.as_secs_f32());
}
