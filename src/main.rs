use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use option_screener::{config, load_config, load_snapshot, logging, report, RankKey, StrategyEngine};
use std::path::PathBuf;
use tracing::info;

/// Screen an option chain snapshot for single legs, straddles, strangles
/// and iron condors, then rank the survivors.
#[derive(Parser)]
#[command(name = "option-screener", version, about)]
struct Cli {
    /// Config document with strategy_filter, config_filter and ranking sections
    #[arg(long, short = 'c', env = config::ENV_CONFIG_PATH, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Chain snapshot JSON
    #[arg(long, short = 'd', env = config::ENV_DATA_PATH, default_value = config::DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// Number of strategies to keep (overrides ranking.top_n)
    #[arg(long, short = 'n')]
    top: Option<usize>,

    /// Rank key: rr, gain, loss, cost or credit (overrides ranking.key)
    #[arg(long, short = 'r')]
    rank: Option<RankKey>,

    /// Rank ascending instead of descending (loss is always ascending)
    #[arg(long)]
    ascending: bool,

    /// Also write the ranked strategies as JSON
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Directory for rolling log files
    #[arg(long, env = config::ENV_LOG_DIR, default_value = config::DEFAULT_LOG_DIR)]
    log_dir: PathBuf,

    /// Do not install the log subscriber
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.quiet {
        logging::init_logging(&cli.log_dir)?;
    }

    println!("{}", "=".repeat(60).blue());
    println!("{}", "Option Strategy Screener".green().bold());
    println!("{}", "=".repeat(60).blue());
    println!();

    // Step 1: Load config
    println!("{} Config: {}", "→".cyan(), cli.config.display());
    let cfg = load_config(&cli.config)
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;

    let mut ranking = cfg.ranking;
    if let Some(key) = cli.rank {
        ranking.key = key;
    }
    if let Some(n) = cli.top {
        ranking.top_n = n;
    }
    if cli.ascending {
        ranking.reverse = false;
    }

    // Step 2: Load snapshot
    println!("{} Snapshot: {}", "→".cyan(), cli.data.display());
    let snapshot = load_snapshot(&cli.data)
        .with_context(|| format!("Failed to load snapshot {}", cli.data.display()))?;
    let spot = snapshot.require_spot()?;
    println!(
        "{} {} → {} contracts, spot {:.2}",
        "✓".green(),
        snapshot.symbol.yellow(),
        snapshot.records.len(),
        spot
    );
    println!();

    // Step 3: Generate, rank, truncate
    let start_time = std::time::Instant::now();
    let engine = StrategyEngine::new(&snapshot.records, spot);
    let all = engine.generate(&cfg.strategy_filter, &cfg.config_filter)?;
    let results = all.rank(ranking.key, ranking.reverse).top(ranking.top_n);
    let elapsed = start_time.elapsed();

    info!(
        symbol = %snapshot.symbol,
        screened = all.len(),
        shown = results.len(),
        rank_key = %ranking.key,
        "screening finished"
    );

    println!("{} Found {} strategies", "ℹ".blue(), all.len());
    println!("{} Ranked by: {}", "ℹ".blue(), ranking.key.to_string().yellow());
    println!("{} Time taken: {:.3}s", "⏱".yellow(), elapsed.as_secs_f64());
    println!();

    let summaries = report::summarize(&results);
    if summaries.is_empty() {
        println!("{} No strategies passed the filters", "ℹ".blue());
    } else {
        report::print_table(&summaries);
    }

    // Step 4: Save to JSON (optional)
    if let Some(path) = &cli.output {
        report::write_json(path, &summaries)?;
        println!();
        println!("{} Saved {} strategies to {}", "✓".green(), summaries.len(), path.display());
    }

    println!();
    println!("{}", "=".repeat(60).blue());
    println!("{}", "Done!".green().bold());
    println!("{}", "=".repeat(60).blue());

    Ok(())
}
