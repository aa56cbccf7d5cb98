//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_central_bank_adapter::CsvCentralBankAdapter;
use crate::adapters::csv_data_adapter::CsvDataAdapter;
use crate::adapters::csv_history_adapter::CsvHistoryAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::markdown_report_adapter::MarkdownReportAdapter;
use crate::adapters::template_narrative_adapter::TemplateNarrativeAdapter;
use crate::domain::central_bank::{CentralBankRecord, assess_latest};
use crate::domain::config_validation::validate_run_config;
use crate::domain::deriver::DeriverConfig;
use crate::domain::engine::{self, EngineConfig};
use crate::domain::error::GoldmonError;
use crate::domain::indicator::names;
use crate::domain::scoring::ScoringTable;
use crate::domain::series::MarketSnapshot;
use crate::domain::zscore::WindowPolicy;
use crate::ports::central_bank_port::CentralBankPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;
use crate::ports::history_port::HistoryPort;
use crate::ports::narrative_port::NarrativePort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "goldmon", about = "Monthly gold market regime monitor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the monthly report pipeline
    Report {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Evaluation date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Skip the history append
        #[arg(long)]
        no_history: bool,
    },
    /// Append a quarterly central bank record
    CbUpdate {
        #[arg(short, long)]
        config: PathBuf,
        /// Quarter label, e.g. Q1_2025
        #[arg(long)]
        quarter: String,
        /// Net purchases in tonnes (negative for net selling)
        #[arg(long, allow_hyphen_values = true)]
        tonnes: f64,
        #[arg(long, default_value = "WGC")]
        source: String,
        /// Validation date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show the latest central bank record and its freshness
    CbStatus {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data ranges for configured series
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        series: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Report {
            config,
            output,
            date,
            no_history,
        } => run_report(&config, output.as_ref(), date, no_history),
        Command::CbUpdate {
            config,
            quarter,
            tonnes,
            source,
            date,
        } => run_cb_update(&config, &quarter, tonnes, &source, date),
        Command::CbStatus { config } => run_cb_status(&config),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, series } => run_info(&config, series.as_deref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = GoldmonError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn require_string(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, ExitCode> {
    config.get_string(section, key).ok_or_else(|| {
        let err = GoldmonError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Default series fetched when `[data] series` is not set.
const DEFAULT_SERIES: &[&str] = &[
    names::REAL_YIELD,
    names::NOMINAL_YIELD,
    names::DXY,
    names::GOLD_SPOT,
    names::SP500,
    names::CPI,
    names::VIX,
    names::GPR,
    names::GLD_SHARES,
];

pub fn resolve_series(config: &dyn ConfigPort) -> Vec<String> {
    match config.get_string("data", "series") {
        Some(list) => list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => DEFAULT_SERIES.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn build_scoring_table(config: &dyn ConfigPort) -> ScoringTable {
    let mut table = ScoringTable::default();

    table.real_yields.weight =
        config.get_double("scoring", "real_yields_weight", table.real_yields.weight);
    table.usd_strength.weight =
        config.get_double("scoring", "usd_strength_weight", table.usd_strength.weight);
    table.cb_buying.weight =
        config.get_double("scoring", "cb_buying_weight", table.cb_buying.weight);
    table.valuation.weight =
        config.get_double("scoring", "valuation_weight", table.valuation.weight);

    let sharp = config.get_double("scoring", "sharp_move_pct", table.real_yields.sharp_pct);
    table.real_yields.sharp_pct = sharp;
    table.usd_strength.sharp_pct = sharp;

    table.cb_buying.strong_tonnes = config.get_double(
        "scoring",
        "strong_buying_tonnes",
        table.cb_buying.strong_tonnes,
    );
    table.cb_buying.moderate_tonnes = config.get_double(
        "scoring",
        "moderate_buying_tonnes",
        table.cb_buying.moderate_tonnes,
    );

    table.valuation.overvalued_z =
        config.get_double("scoring", "overvalued_zscore", table.valuation.overvalued_z);
    table.valuation.undervalued_z = config.get_double(
        "scoring",
        "undervalued_zscore",
        table.valuation.undervalued_z,
    );

    table
}

pub fn build_engine_config(config: &dyn ConfigPort) -> EngineConfig {
    let horizons = config
        .get_string("engine", "momentum_horizons")
        .map(|list| {
            list.split(',')
                .filter_map(|s| s.trim().parse::<u64>().ok())
                .collect::<Vec<u64>>()
        })
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| DeriverConfig::default().momentum_horizons);

    EngineConfig {
        deriver: DeriverConfig {
            change_lookback_days: config.get_int("engine", "change_lookback_days", 30) as u64,
            momentum_horizons: horizons,
        },
        window: WindowPolicy {
            window_days: config.get_int("engine", "zscore_window_days", 1825) as u64,
            min_observations: config.get_int("engine", "zscore_min_observations", 30) as usize,
        },
        scoring: build_scoring_table(config),
        staleness_days: config.get_int("central_bank", "staleness_days", 90),
    }
}

fn run_report(
    config_path: &PathBuf,
    output_path: Option<&PathBuf>,
    date: Option<NaiveDate>,
    no_history: bool,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_run_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let eval = date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let engine_config = build_engine_config(&adapter);

    // Stage 2: Fetch raw series
    let series_dir = match require_string(&adapter, "data", "series_dir") {
        Ok(dir) => dir,
        Err(code) => return code,
    };
    let data_port = CsvDataAdapter::new(PathBuf::from(series_dir));

    let fetch_start = eval
        .checked_sub_days(chrono::Days::new(engine_config.window.window_days))
        .unwrap_or(NaiveDate::MIN);

    let series_names = resolve_series(&adapter);
    eprintln!("Fetching {} series through {}", series_names.len(), eval);

    let mut snapshot = MarketSnapshot::new();
    for name in &series_names {
        match data_port.fetch_series(name, fetch_start, eval) {
            Ok(series) => {
                eprintln!("  {}: {} observations", name, series.len());
                snapshot.insert(series);
            }
            Err(e) => eprintln!("warning: skipping {name} ({e})"),
        }
    }

    // Stage 3: Load central bank records
    let cb_file = match require_string(&adapter, "central_bank", "data_file") {
        Ok(path) => path,
        Err(code) => return code,
    };
    let cb_port = CsvCentralBankAdapter::new(PathBuf::from(cb_file));
    let cb_records = match cb_port.load_records() {
        Ok(records) => records,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 4: Run the engine
    let run = match engine::run(&snapshot, &cb_records, eval, &engine_config) {
        Ok(run) => run,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\n=== Regime Score ===");
    eprintln!("Score:      {:.2}", run.regime.total);
    eprintln!("Assessment: {}", run.regime.assessment);
    eprintln!("Conviction: {}", run.regime.assessment.conviction());
    eprintln!("Action:     {}", run.regime.assessment.action());
    if !run.flags.is_empty() {
        eprintln!("\n=== Data Quality ===");
        for flag in &run.flags {
            eprintln!("  {flag}");
        }
    }

    // Stage 5: Narrative (falls back to a single line if synthesis fails)
    let narrative = match TemplateNarrativeAdapter::new().synthesize(&run) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("warning: narrative synthesis failed ({e}); using summary line");
            format!(
                "Regime assessment: {} ({})",
                run.regime.assessment,
                run.regime.assessment.action()
            )
        }
    };

    // Stage 6: Write report
    let output = match output_path {
        Some(path) => path.clone(),
        None => {
            let dir = adapter
                .get_string("report", "output_dir")
                .unwrap_or_else(|| "reports".to_string());
            let dir = PathBuf::from(dir);
            if let Err(e) = fs::create_dir_all(&dir) {
                eprintln!("error: failed to create {}: {}", dir.display(), e);
                return ExitCode::from(1);
            }
            dir.join(format!("gold_monitor_{}.md", eval.format("%Y_%m")))
        }
    };

    if let Err(e) = MarkdownReportAdapter::new().write(&run, &narrative, &output) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("\nReport written to: {}", output.display());

    // Stage 7: Append history
    if no_history {
        eprintln!("History append skipped (--no-history)");
        return ExitCode::SUCCESS;
    }
    let history_file = match require_string(&adapter, "history", "data_file") {
        Ok(path) => path,
        Err(code) => return code,
    };
    let history_port = CsvHistoryAdapter::new(PathBuf::from(history_file));
    match history_port.append_run(&run) {
        Ok(()) => {
            eprintln!("History row appended for {eval}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_cb_update(
    config_path: &PathBuf,
    quarter: &str,
    tonnes: f64,
    source: &str,
    date: Option<NaiveDate>,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let cb_file = match require_string(&adapter, "central_bank", "data_file") {
        Ok(path) => path,
        Err(code) => return code,
    };

    let record = CentralBankRecord {
        quarter: quarter.to_string(),
        net_tonnes: tonnes,
        source: source.to_string(),
        validated_date: date.unwrap_or_else(|| chrono::Local::now().date_naive()),
    };

    let cb_port = CsvCentralBankAdapter::new(PathBuf::from(cb_file));
    match cb_port.append_record(&record) {
        Ok(()) => {
            eprintln!(
                "Recorded {}: {:.1} tonnes ({})",
                record.quarter, record.net_tonnes, record.source
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_cb_status(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let cb_file = match require_string(&adapter, "central_bank", "data_file") {
        Ok(path) => path,
        Err(code) => return code,
    };

    let cb_port = CsvCentralBankAdapter::new(PathBuf::from(cb_file));
    let records = match cb_port.load_records() {
        Ok(records) => records,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let staleness = adapter.get_int("central_bank", "staleness_days", 90);
    let today = chrono::Local::now().date_naive();
    match assess_latest(&records, today, staleness) {
        Ok(assessment) => {
            println!("Quarter:    {}", assessment.record.quarter);
            println!("Net tonnes: {:.1}", assessment.record.net_tonnes);
            println!("Source:     {}", assessment.record.source);
            println!(
                "Validated:  {} ({} days ago{})",
                assessment.record.validated_date,
                assessment.days_old,
                if assessment.is_stale { ", STALE" } else { "" },
            );
            eprintln!("{} quarters on record", records.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match validate_run_config(&adapter) {
        Ok(()) => {
            eprintln!("Configuration is valid");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(config_path: &PathBuf, series_override: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let series_dir = match require_string(&adapter, "data", "series_dir") {
        Ok(dir) => dir,
        Err(code) => return code,
    };

    let data_port = CsvDataAdapter::new(PathBuf::from(series_dir));
    let series_names: Vec<String> = match series_override {
        Some(name) => vec![name.to_string()],
        None => resolve_series(&adapter),
    };

    for name in &series_names {
        match data_port.data_range(name) {
            Ok(Some((min_date, max_date, count))) => {
                println!("{name}: {count} observations, {min_date} to {max_date}");
            }
            Ok(None) => eprintln!("{name}: no data found"),
            Err(e) => eprintln!("error querying {name}: {e}"),
        }
    }
    ExitCode::SUCCESS
}
