//! osint-linktree main entry point
//!
//! This is the command-line interface for the osint-linktree crawler.

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use osint_linktree::config::{
    load_config_with_hash, validate, Config, CrawlOptions, CrawlSettings, ParentTieBreak,
    DEFAULT_CONFIG_HASH,
};
use osint_linktree::output::{
    collect_contacts, contacts_to_json, print_statistics, render_ascii_tree, render_site_report,
    render_table_with, render_tor_check, save_tree, tree_to_json_string, ContactKind,
    CrawlStatistics,
};
use osint_linktree::recon::{check_tor, investigate, TOR_CHECK_URL};
use osint_linktree::storage::{open_storage, Storage};
use osint_linktree::{CrawlTree, Crawler, HttpFetcher, KeywordClassifier};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// osint-linktree: a depth-bounded OSINT link crawler
///
/// Crawls outward from a seed URL (optionally through Tor), builds a tree of
/// visited pages and collects the email addresses and phone numbers linked
/// from them.
#[derive(Parser, Debug)]
#[command(name = "osint-linktree")]
#[command(version)]
#[command(about = "A depth-bounded OSINT link crawler", long_about = None)]
struct Cli {
    /// Root URL to crawl from
    #[arg(short, long, value_name = "URL")]
    url: Option<String>,

    /// Maximum crawl depth (0 = root only)
    #[arg(short, long, allow_negative_numbers = true)]
    depth: Option<i64>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// How to print the tree
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Tree)]
    format: OutputFormat,

    /// Print only the email addresses found
    #[arg(long)]
    emails: bool,

    /// Print only the phone numbers found
    #[arg(long)]
    phones: bool,

    /// Print crawl statistics
    #[arg(long)]
    stats: bool,

    /// Save the tree as text and JSON files
    #[arg(long)]
    save: bool,

    /// Store the run in this SQLite database
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,

    /// Classify every visited page
    #[arg(long)]
    classify: bool,

    /// Number of concurrent fetches
    #[arg(long)]
    workers: Option<u32>,

    /// Per-fetch timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// SOCKS5 proxy host
    #[arg(long)]
    host: Option<String>,

    /// SOCKS5 proxy port
    #[arg(long)]
    port: Option<u16>,

    /// Connect directly instead of through the SOCKS5 proxy
    #[arg(long)]
    no_socks: bool,

    /// Parent rule for pages found by several pages of one level
    #[arg(long, value_name = "RULE")]
    tie_break: Option<ParentTieBreak>,

    /// Gather information on the root URL (robots.txt, exposed files,
    /// intel, bitcoin addresses, meta tags) instead of crawling
    #[arg(short, long)]
    info: bool,

    /// Directory for saved trees
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// List the runs stored in the database and exit
    #[arg(long, requires = "db", conflicts_with_all = ["url", "show_run", "info"])]
    list_runs: bool,

    /// Print a stored run instead of crawling
    #[arg(long, value_name = "RUN_ID", requires = "db", conflicts_with_all = ["url", "info"])]
    show_run: Option<i64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Tree,
    Table,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::debug!("Configuration hash: {}", hash);
            (config, hash)
        }
        None => (Config::default(), DEFAULT_CONFIG_HASH.to_string()),
    };
    apply_overrides(&mut config, &cli);
    validate(&config).context("Invalid configuration")?;

    if cli.list_runs {
        handle_list_runs(&cli)
    } else if let Some(run_id) = cli.show_run {
        handle_show_run(&cli, run_id)
    } else {
        let settings = CrawlOptions::from_config(&config, cli.url.clone())
            .validate()
            .context("Invalid crawl options")?;
        let fetcher = HttpFetcher::new(&config.user_agent, &config.proxy)
            .context("Failed to build HTTP client")?;
        if !cli.quiet && config.proxy.enabled {
            print_tor_ip(&fetcher, &config).await;
        }

        if cli.info {
            handle_info(&settings, &config, &fetcher).await
        } else {
            handle_crawl(&cli, &config, &config_hash, settings, fetcher).await
        }
    }
}

fn color_stdout() -> bool {
    std::io::stdout().is_terminal()
}

fn fetch_timeout(config: &Config) -> Duration {
    Duration::from_millis(config.crawler.fetch_timeout_ms)
}

/// Reports the exit address the proxy gives us; failures only warn
async fn print_tor_ip(fetcher: &HttpFetcher, config: &Config) {
    println!("Attempting to connect to {}", TOR_CHECK_URL);
    match check_tor(fetcher.client(), TOR_CHECK_URL, fetch_timeout(config)).await {
        Ok(check) => {
            if !check.uses_tor() {
                tracing::warn!("Traffic does not appear to go through Tor");
            }
            print!("{}", render_tor_check(&check, color_stdout()));
        }
        Err(e) => tracing::warn!("Could not determine Tor IP address: {}", e),
    }
}

/// Handles --info: recon of the root URL
async fn handle_info(
    settings: &CrawlSettings,
    config: &Config,
    fetcher: &HttpFetcher,
) -> anyhow::Result<()> {
    let report = investigate(fetcher.client(), &settings.root_url, fetch_timeout(config))
        .await
        .with_context(|| format!("Failed to gather information on {}", settings.root_url))?;

    let exposed = report.exposed().count();
    if exposed > 0 {
        let alert = format!("{} sensitive file(s) exposed", exposed);
        if color_stdout() {
            println!("{}", alert.as_str().red().bold());
        } else {
            println!("{}", alert);
        }
    }
    print!("{}", render_site_report(&report, color_stdout()));
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("osint_linktree=info,warn"),
            1 => EnvFilter::new("osint_linktree=debug,info"),
            2 => EnvFilter::new("osint_linktree=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Command-line flags win over configuration file values
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.crawler.fetch_timeout_ms = timeout_ms;
    }
    if let Some(tie_break) = cli.tie_break {
        config.crawler.parent_tie_break = tie_break;
    }
    if cli.classify {
        config.crawler.classify = true;
    }
    if let Some(host) = &cli.host {
        config.proxy.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.proxy.port = port;
    }
    if cli.no_socks {
        config.proxy.enabled = false;
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.display().to_string();
    }
}

/// Handles the main crawl operation
async fn handle_crawl(
    cli: &Cli,
    config: &Config,
    config_hash: &str,
    settings: CrawlSettings,
    fetcher: HttpFetcher,
) -> anyhow::Result<()> {
    let max_depth = settings.max_depth;

    match config.proxy.proxy_url() {
        Some(proxy) => tracing::info!("Using SOCKS5 proxy {}", proxy),
        None => tracing::warn!("SOCKS5 proxy disabled, connecting directly"),
    }

    let mut crawler = Crawler::new(settings, Arc::new(fetcher));

    if config.crawler.classify {
        let classifier = KeywordClassifier::from_config(&config.classifier);
        if classifier.is_empty() {
            tracing::warn!("Classification requested but no [[classifier.category]] is configured");
        } else {
            crawler = crawler.with_classifier(Arc::new(classifier));
        }
    }

    let token = CancellationToken::new();
    let interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current level");
            interrupt.cancel();
        }
    });

    let report = crawler.crawl_with_cancellation(token).await;
    if !report.is_complete() {
        tracing::warn!("Crawl was cancelled; the tree is partial");
    }

    print_tree(&report.tree, cli)?;

    if cli.save {
        let paths = save_tree(
            &report.tree,
            Path::new(&config.output.directory),
            max_depth,
        )
        .context("Failed to save tree")?;
        for path in paths {
            println!("Saved {}", path.display());
        }
    }

    if let Some(db) = &cli.db {
        let mut storage = open_storage(db)
            .with_context(|| format!("Failed to open database {}", db.display()))?;
        let run_id = storage
            .save_report(&report, config_hash)
            .context("Failed to store crawl run")?;
        tracing::info!("Stored run {} in {}", run_id, db.display());
    }

    Ok(())
}

/// Handles --list-runs: prints the runs stored in the database
fn handle_list_runs(cli: &Cli) -> anyhow::Result<()> {
    let Some(db) = &cli.db else {
        bail!("--list-runs needs --db");
    };
    let storage = open_storage(db)?;

    let runs = storage.list_runs()?;
    if runs.is_empty() {
        println!("No runs stored in {}", db.display());
        return Ok(());
    }

    for run in runs {
        println!(
            "#{} {} depth={} nodes={} status={} started={}",
            run.id,
            run.root_url,
            run.max_depth,
            storage.count_nodes(run.id)?,
            run.status.to_db_string(),
            run.started_at
        );
    }

    Ok(())
}

/// Handles --show-run: prints a stored tree
fn handle_show_run(cli: &Cli, run_id: i64) -> anyhow::Result<()> {
    let Some(db) = &cli.db else {
        bail!("--show-run needs --db");
    };
    let storage = open_storage(db)?;

    let tree = storage
        .load_tree(run_id)
        .with_context(|| format!("Failed to load run {}", run_id))?;
    print_tree(&tree, cli)
}

/// Prints the tree, or only the requested contacts, in the selected format
fn print_tree(tree: &CrawlTree, cli: &Cli) -> anyhow::Result<()> {
    let kinds: Vec<ContactKind> = [
        (cli.emails, ContactKind::Emails),
        (cli.phones, ContactKind::Phones),
    ]
    .into_iter()
    .filter_map(|(wanted, kind)| wanted.then_some(kind))
    .collect();

    if kinds.is_empty() {
        match cli.format {
            OutputFormat::Tree => print!("{}", render_ascii_tree(tree)),
            OutputFormat::Table => print!("{}", render_table_with(tree, color_stdout())),
            OutputFormat::Json => println!("{}", tree_to_json_string(tree)?),
        }
    } else {
        for kind in kinds {
            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&contacts_to_json(tree, kind))?);
            } else {
                for value in collect_contacts(tree, kind) {
                    println!("{}", value);
                }
            }
        }
    }

    if cli.stats {
        println!();
        print_statistics(&CrawlStatistics::from_tree(tree));
    }

    Ok(())
}
