use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use regime_cli::config::AppConfig;
use regime_cli::report::{self, BatchRow};
use regime_cli::session::Session;
use regime_cli::{csv_loader, logging, utils};
use regime_core::RegimeComparison;
use regime_core::calculations::comparison::{Delta, Verdict};
use regime_data::SlabTableLoader;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Compare income tax under the current and proposed Indian slab regimes.
///
/// Applies the standard deduction, the slab walk, the 87A rebate, surcharge
/// and cess to one income (or a batch of incomes) under two regimes and
/// reports where the proposed regime saves or costs money.
#[derive(Debug, Parser)]
#[command(name = "regime-compare", version, about)]
struct Cli {
    /// Gross annual income. Currency signs and separators are ignored,
    /// e.g. `₹15,00,000`.
    #[arg(long, default_value = "1500000")]
    income: String,

    /// TOML file adjusting or adding regimes and levies.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Slab table CSV (`table,upper_bound,rate`) overriding slabs by regime name.
    #[arg(long)]
    slabs: Option<PathBuf>,

    /// Regime compared against (default `current`).
    #[arg(long)]
    baseline: Option<String>,

    /// Regime being evaluated (default `proposed`).
    #[arg(long)]
    candidate: Option<String>,

    /// CSV of `label,income` rows to compare in one go.
    #[arg(long, conflicts_with = "interactive")]
    batch: Option<PathBuf>,

    /// Read incomes from stdin, one per line, and report after each.
    /// `:log <filter>` changes the log level; `quit` or EOF ends the session.
    #[arg(long)]
    interactive: bool,

    /// Print JSON instead of the text report.
    #[arg(long)]
    json: bool,

    /// Log filter, e.g. `debug` or `regime_core=trace`.
    #[arg(long)]
    log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Hide log output on stderr (file logging is unaffected).
    #[arg(long)]
    quiet_logs: bool,
}

// ─── JSON output ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    baseline: &'a str,
    candidate: &'a str,
    comparison: &'a RegimeComparison,
    savings: Decimal,
    verdict: Verdict,
    deltas: Vec<Delta>,
}

impl<'a> JsonReport<'a> {
    fn new(
        config: &'a AppConfig,
        comparison: &'a RegimeComparison,
    ) -> Self {
        Self {
            baseline: &config.baseline,
            candidate: &config.candidate,
            comparison,
            savings: comparison.savings(),
            verdict: comparison.verdict(),
            deltas: comparison.deltas(),
        }
    }
}

// ─── logging ─────────────────────────────────────────────────────────────────

fn init_logging(cli: &Cli) -> Result<()> {
    logging::init(&logging::LogSettings {
        level: cli.log_level.clone(),
        file: cli.log_file.clone(),
        quiet: cli.quiet_logs,
    })
}

// ─── configuration ───────────────────────────────────────────────────────────

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load config")?;

    if let Some(path) = &cli.slabs {
        info!("Loading slab tables from: {}", path.display());
        let file =
            File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
        let tables = SlabTableLoader::load(file)
            .with_context(|| format!("Invalid slab table CSV: {}", path.display()))?;
        config
            .apply_slab_overrides(tables)
            .context("Slab table does not match a configured regime")?;
    }

    config
        .select(cli.baseline.clone(), cli.candidate.clone())
        .context("Invalid regime selection")?;
    debug!(baseline = %config.baseline, candidate = %config.candidate, "regimes selected");

    Ok(config)
}

// ─── modes ───────────────────────────────────────────────────────────────────

fn print_comparison(
    config: &AppConfig,
    comparison: &RegimeComparison,
    json: bool,
) -> Result<()> {
    if json {
        let report = JsonReport::new(config, comparison);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let current = config.regimes.get(&config.baseline)?;
        let proposed = config.regimes.get(&config.candidate)?;
        print!(
            "{}",
            report::render_comparison(comparison, current, proposed, config.regimes.levies())
        );
    }
    Ok(())
}

fn run_single(
    config: &AppConfig,
    income: &str,
    json: bool,
) -> Result<()> {
    let income = utils::parse_income(income);
    let comparison = config
        .regimes
        .compare(income, &config.baseline, &config.candidate)?;
    print_comparison(config, &comparison, json)
}

fn run_batch(
    config: &AppConfig,
    path: &std::path::Path,
    json: bool,
) -> Result<()> {
    let entries = csv_loader::load_from_file(path)
        .with_context(|| format!("Failed to load batch file: {}", path.display()))?;
    info!("Comparing {} incomes", entries.len());

    let rows = entries
        .into_iter()
        .map(|entry| -> Result<BatchRow> {
            let comparison =
                config
                    .regimes
                    .compare(entry.income, &config.baseline, &config.candidate)?;
            Ok(BatchRow {
                label: entry.label,
                comparison,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!(
            "{}",
            report::render_batch(&rows, &config.baseline, &config.candidate)
        );
    }
    Ok(())
}

fn run_interactive(
    config: AppConfig,
    initial_income: &str,
    json: bool,
) -> Result<()> {
    let mut session = Session::new(config, utils::parse_income(initial_income))?;
    print_comparison(session.config(), session.comparison(), json)?;

    let stdin = io::stdin();
    loop {
        eprint!("income> ");
        io::stderr().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if matches!(input, "q" | "quit" | "exit") {
            break;
        }
        if let Some(directive) = input.strip_prefix(":log ") {
            if let Err(e) = logging::set_log_level(directive.trim()) {
                eprintln!("{e:#}");
            }
            continue;
        }

        session.set_income(input)?;
        println!();
        print_comparison(session.config(), session.comparison(), json)?;
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = load_config(&cli)?;

    if let Some(path) = &cli.batch {
        run_batch(&config, path, cli.json)
    } else if cli.interactive {
        run_interactive(config, &cli.income, cli.json)
    } else {
        run_single(&config, &cli.income, cli.json)
    }
}
