//! CLI definition and dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report::CsvReport;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report::TextReport;
use crate::domain::config_validation::{
    read_horizons, read_lookback, read_reweight_params, read_universe, validate_config,
    validate_scoring_config,
};
use crate::domain::error::TrendrankError;
use crate::domain::lookback::LookbackPeriod;
use crate::domain::pipeline::{self, RankingConfig, RankingReport};
use crate::domain::universe::{parse_instruments, Universe};
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "trendrank",
    about = "Rank instruments by correlation-adjusted trend clarity"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score and rank the configured universe
    Rank {
        #[arg(short, long)]
        config: PathBuf,
        /// Directory of <INSTRUMENT>.csv price files (overrides [data] dir)
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Comma-separated instrument list (overrides [universe] instruments)
        #[arg(long)]
        instruments: Option<String>,
        /// Reference instrument (overrides [universe] reference)
        #[arg(long)]
        reference: Option<String>,
        #[arg(long, value_enum)]
        format: Option<ReportFormat>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Omit the per-horizon section of the text report
        #[arg(long)]
        no_horizons: bool,
        #[arg(short, long)]
        verbose: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show available price data per instrument
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        instrument: Option<String>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Csv,
}

impl ReportFormat {
    fn from_config(config: &dyn ConfigPort) -> Self {
        match config.get_string("report", "format") {
            Some(f) if f.trim().eq_ignore_ascii_case("csv") => ReportFormat::Csv,
            _ => ReportFormat::Text,
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub instruments: Option<String>,
    pub reference: Option<String>,
    pub format: Option<ReportFormat>,
    pub output: Option<PathBuf>,
    pub no_horizons: bool,
}

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub data_dir: PathBuf,
    pub lookback: LookbackPeriod,
    pub ranking: RankingConfig,
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
    pub show_horizons: bool,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Rank {
            config,
            data_dir,
            instruments,
            reference,
            format,
            output,
            no_horizons,
            verbose,
        } => {
            let overrides = Overrides {
                data_dir,
                instruments,
                reference,
                format,
                output,
                no_horizons,
            };
            run_rank(&config, &overrides, verbose)
        }
        Command::Validate { config } => run_validate(&config),
        Command::Info {
            config,
            instrument,
            data_dir,
        } => run_info(&config, instrument.as_deref(), data_dir),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Installs the stderr subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &dyn ConfigPort, verbose: bool) {
    let level = if verbose {
        "debug".to_string()
    } else {
        config
            .get_string("logging", "level")
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| "info".to_string())
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.trim()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A second initialisation (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

pub fn build_settings(
    config: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<RunSettings, TrendrankError> {
    let data_dir = match &overrides.data_dir {
        Some(dir) => dir.clone(),
        None => config
            .get_string("data", "dir")
            .filter(|d| !d.trim().is_empty())
            .map(|d| PathBuf::from(d.trim()))
            .ok_or_else(|| TrendrankError::ConfigMissing {
                section: "data".into(),
                key: "dir".into(),
            })?,
    };

    let universe = resolve_universe(config, overrides)?;

    let mut ranking = RankingConfig::new(universe.instruments, universe.reference);
    ranking.horizons = read_horizons(config)?;
    ranking.reweight = read_reweight_params(config)?;

    let output = overrides.output.clone().or_else(|| {
        config
            .get_string("report", "output")
            .filter(|o| !o.trim().is_empty())
            .map(|o| PathBuf::from(o.trim()))
    });

    Ok(RunSettings {
        data_dir,
        lookback: read_lookback(config)?,
        ranking,
        format: overrides
            .format
            .unwrap_or_else(|| ReportFormat::from_config(config)),
        output,
        show_horizons: !overrides.no_horizons
            && config.get_bool("report", "show_horizons", true),
    })
}

pub fn resolve_universe(
    config: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<Universe, TrendrankError> {
    let configured = read_universe(config)?;
    let instruments = match &overrides.instruments {
        Some(list) => parse_instruments(list)?,
        None => configured.instruments,
    };
    let reference = overrides
        .reference
        .clone()
        .unwrap_or(configured.reference);
    Ok(Universe::new(instruments, &reference)?)
}

/// Fetches prices through `price_port`, ranks, and renders the report.
pub fn run_rank_pipeline(
    price_port: &dyn PricePort,
    settings: &RunSettings,
    out: &mut dyn Write,
) -> Result<RankingReport, TrendrankError> {
    let instruments = &settings.ranking.instruments;
    eprintln!(
        "Fetching {} of prices for {} instruments...",
        settings.lookback,
        instruments.len()
    );
    let prices = price_port.fetch_daily_prices_batch(instruments, settings.lookback);

    let missing = instruments
        .iter()
        .filter(|i| prices.get(*i).is_none_or(|s| s.is_empty()))
        .count();
    if missing > 0 {
        eprintln!("  {missing} instrument(s) without usable data; scored as neutral");
    }

    eprintln!(
        "Scoring {} horizons, reference {}",
        settings.ranking.horizons.len(),
        settings.ranking.reference
    );
    let report = pipeline::run(&prices, &settings.ranking);

    match settings.format {
        ReportFormat::Text => TextReport::now(settings.show_horizons).write(&report, out)?,
        ReportFormat::Csv => CsvReport.write(&report, out)?,
    }
    out.flush()?;

    Ok(report)
}

fn run_rank(config_path: &Path, overrides: &Overrides, verbose: bool) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    init_logging(&adapter, verbose);

    // The universe is checked by `build_settings` once overrides are applied.
    if let Err(e) = validate_scoring_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let settings = match build_settings(&adapter, overrides) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let price_port = CsvAdapter::new(settings.data_dir.clone());

    let result = match &settings.output {
        Some(path) => File::create(path)
            .map_err(TrendrankError::from)
            .and_then(|file| {
                let mut writer = BufWriter::new(file);
                run_rank_pipeline(&price_port, &settings, &mut writer)
            }),
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            run_rank_pipeline(&price_port, &settings, &mut lock)
        }
    };

    match result {
        Ok(report) => {
            if let Some(path) = &settings.output {
                eprintln!("\nRanking of {} instruments written to: {}", report.ranking.len(), path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let settings = match build_settings(&adapter, &Overrides::default()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nData:");
    eprintln!("  dir:       {}", settings.data_dir.display());
    eprintln!("  lookback:  {}", settings.lookback);
    eprintln!("\nUniverse:");
    eprintln!("  instruments: {}", settings.ranking.instruments.join(", "));
    eprintln!("  reference:   {}", settings.ranking.reference);
    eprintln!("\nHorizons:");
    for h in &settings.ranking.horizons {
        eprintln!("  {:<5} {} sessions", h.label, h.sessions);
    }
    let params = settings.ranking.reweight;
    eprintln!("\nReweighting:");
    eprintln!("  self_correlation_threshold: {}", params.self_correlation_threshold);
    eprintln!("  min_correlation_threshold:  {}", params.min_correlation_threshold);
    eprintln!("  max_inverse:                {}", params.max_inverse);

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_info(config_path: &Path, instrument: Option<&str>, data_dir: Option<PathBuf>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    init_logging(&adapter, false);

    let overrides = Overrides {
        data_dir,
        ..Overrides::default()
    };
    let settings = match build_settings(&adapter, &overrides) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let price_port = CsvAdapter::new(settings.data_dir.clone());
    let instruments = match instrument {
        Some(i) => vec![i.trim().to_uppercase()],
        None => settings.ranking.instruments.clone(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match write_info(&price_port, &instruments, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// One line per instrument; missing or unreadable files are reported, not fatal.
pub fn write_info(
    price_port: &dyn PricePort,
    instruments: &[String],
    out: &mut dyn Write,
) -> Result<(), TrendrankError> {
    for instrument in instruments {
        match price_port.data_range(instrument) {
            Ok(Some((first, last, count))) => {
                writeln!(out, "{instrument}: {count} observations, {first} to {last}")?;
            }
            Ok(None) => writeln!(out, "{instrument}: no data found")?,
            Err(e) => writeln!(out, "{instrument}: error: {e}")?,
        }
    }
    Ok(())
}
