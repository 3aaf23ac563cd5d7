//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::adapters::credentials::{DEFAULT_ENV_FILE, load_token_with};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::http_fetch::HttpFetcher;
use crate::adapters::moex_adapter::{self, MoexIssAdapter};
use crate::adapters::report_writer_for;
use crate::adapters::tinkoff_adapter::{self, TinkoffRestAdapter};
use crate::domain::error::BondExportError;
use crate::domain::export::collect_rows;
use crate::domain::instrument::UniverseScope;
use crate::domain::params::{DEFAULT_OUTFILE, ExportParams, normalize_isins, parse_isin_list};
use crate::domain::probe::{PROBE_HEADER, probe_isin};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_PARAMS_FILE: &str = "params.ini";

#[derive(Parser, Debug)]
#[command(
    name = "bondexport",
    about = "Export brokerage bonds joined with Moscow Exchange quotes"
)]
pub struct Cli {
    /// Print debug diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the bond report
    Export {
        #[arg(short, long, default_value = DEFAULT_PARAMS_FILE)]
        params: PathBuf,
        #[arg(long, default_value = DEFAULT_ENV_FILE)]
        env: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Enumerate the whole catalog instead of the base offering
        #[arg(long)]
        all: bool,
        /// Only the base offering, even if the params file sets `all`
        #[arg(long, conflicts_with = "all")]
        base: bool,
        #[arg(long, value_parser = parse_finite)]
        min_ytm: Option<f64>,
        #[arg(long, value_parser = parse_finite)]
        max_duration: Option<f64>,
        /// Restrict the run to this ISIN (repeatable)
        #[arg(long = "isin")]
        isins: Vec<String>,
    },
    /// Look up ISINs on the exchange and print what it reports
    Probe {
        #[arg(required = true)]
        isins: Vec<String>,
        #[arg(short, long)]
        params: Option<PathBuf>,
    },
}

/// Command-line values that take precedence over the params file.
#[derive(Debug, Clone, Default)]
pub struct ExportOverrides {
    pub output: Option<PathBuf>,
    pub all: bool,
    pub base: bool,
    pub min_ytm: Option<f64>,
    pub max_duration: Option<f64>,
    pub isins: Vec<String>,
}

impl ExportOverrides {
    pub fn apply(self, mut params: ExportParams) -> ExportParams {
        if let Some(output) = self.output {
            params.outfile = output;
        }
        if self.all {
            params.scope = UniverseScope::All;
        } else if self.base {
            params.scope = UniverseScope::Base;
        }
        if self.min_ytm.is_some() {
            params.filters.min_ytm = self.min_ytm;
        }
        if self.max_duration.is_some() {
            params.filters.max_duration = self.max_duration;
        }
        let isins = normalize_isins(self.isins.iter().map(String::as_str));
        if !isins.is_empty() {
            params.only_isins = isins;
        }
        params
    }
}

pub fn run(cli: Cli) -> ExitCode {
    init_tracing(cli.verbose);

    match cli.command {
        Command::Export {
            params,
            env,
            output,
            all,
            base,
            min_ytm,
            max_duration,
            isins,
        } => {
            let overrides = ExportOverrides {
                output,
                all,
                base,
                min_ytm,
                max_duration,
                isins,
            };
            run_export(&params, &env, overrides)
        }
        Command::Probe { isins, params } => run_probe(&isins, params.as_deref()),
    }
}

pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,bondexport=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load the params file. A file that does not exist means "all defaults".
pub fn load_params_config(path: &Path) -> Result<FileConfigAdapter, BondExportError> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no params file, using defaults");
        return Ok(FileConfigAdapter::empty());
    }
    FileConfigAdapter::from_file(path).map_err(|e| BondExportError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Threshold argument parser: NaN and infinities are not thresholds.
fn parse_finite(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("expected a number, got {raw:?}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("expected a finite number, got {raw:?}"))
    }
}

fn optional_number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, BondExportError> {
    let invalid = |reason: String| BondExportError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason,
    };
    match config.get_optional_double(section, key) {
        Ok(Some(value)) if !value.is_finite() => Err(invalid(format!(
            "expected a finite number, got {value}"
        ))),
        Ok(value) => Ok(value),
        Err(raw) => Err(invalid(format!("expected a number, got {raw:?}"))),
    }
}

pub fn build_export_params(config: &dyn ConfigPort) -> Result<ExportParams, BondExportError> {
    let outfile = config
        .get_string("export", "outfile")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_OUTFILE.to_string());

    let scope = if config.get_bool("export", "all", false) {
        UniverseScope::All
    } else {
        UniverseScope::Base
    };

    let mut params = ExportParams {
        outfile: PathBuf::from(outfile),
        scope,
        only_isins: config
            .get_string("export", "only_isins")
            .map(|s| parse_isin_list(&s))
            .unwrap_or_default(),
        ..Default::default()
    };
    params.filters.min_ytm = optional_number(config, "export", "min_ytm")?;
    params.filters.max_duration = optional_number(config, "export", "max_duration")?;
    Ok(params)
}

/// Base URLs for the exchange and the brokerage, overridable in `[providers]`.
pub fn provider_urls(config: &dyn ConfigPort) -> (String, String) {
    let moex = config
        .get_string("providers", "moex_base_url")
        .unwrap_or_else(|| moex_adapter::DEFAULT_BASE_URL.to_string());
    let tinkoff = config
        .get_string("providers", "tinkoff_base_url")
        .unwrap_or_else(|| tinkoff_adapter::DEFAULT_BASE_URL.to_string());
    (moex, tinkoff)
}

fn runtime() -> Result<tokio::runtime::Runtime, ExitCode> {
    tokio::runtime::Runtime::new().map_err(|e| {
        let err = BondExportError::Io(e);
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn run_export(params_path: &Path, env_path: &Path, overrides: ExportOverrides) -> ExitCode {
    run_export_with(params_path, env_path, overrides, |key| std::env::var(key).ok())
}

/// [`run_export`] with the process environment replaced by `lookup`.
pub fn run_export_with<F>(
    params_path: &Path,
    env_path: &Path,
    overrides: ExportOverrides,
    lookup: F,
) -> ExitCode
where
    F: Fn(&str) -> Option<String>,
{
    // Stage 1: Credential, before anything touches the network
    let token = match load_token_with(env_path, lookup) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 2: Run parameters
    let config = match load_params_config(params_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let params = match build_export_params(&config) {
        Ok(p) => overrides.apply(p),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 3: Providers
    let (moex_url, tinkoff_url) = provider_urls(&config);
    let http = match HttpFetcher::new() {
        Ok(h) => h,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let exchange = MoexIssAdapter::with_base_url(http.clone(), &moex_url);
    let catalog = TinkoffRestAdapter::with_base_url(http, token, &tinkoff_url);

    eprintln!(
        "Exporting {} bonds{}",
        match params.scope {
            UniverseScope::Base => "base",
            UniverseScope::All => "all",
        },
        if params.only_isins.is_empty() {
            String::new()
        } else {
            format!(" (restricted to {} ISINs)", params.only_isins.len())
        }
    );

    // Stage 4: Join and filter
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };
    let now = chrono::Utc::now();
    let outcome = match rt.block_on(collect_rows(&catalog, &exchange, &params, now)) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if outcome.candidates == 0 {
        eprintln!("No bonds match the configured selection.");
        return ExitCode::SUCCESS;
    }
    if outcome.rows.is_empty() {
        eprintln!(
            "No bonds passed the filters ({} checked); nothing written.",
            outcome.candidates
        );
        return ExitCode::SUCCESS;
    }

    // Stage 5: Report
    let writer = report_writer_for(&params.outfile);
    match writer.write(&outcome.rows, &params.outfile) {
        Ok(()) => {
            println!(
                "Done: {} (rows: {})",
                params.outfile.display(),
                outcome.rows.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn run_probe(isins: &[String], params_path: Option<&Path>) -> ExitCode {
    let config = match params_path {
        Some(path) => match load_params_config(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        },
        None => FileConfigAdapter::empty(),
    };
    let (moex_url, _) = provider_urls(&config);
    let http = match HttpFetcher::new() {
        Ok(h) => h,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let exchange = MoexIssAdapter::with_base_url(http, &moex_url);

    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    println!("{PROBE_HEADER}");
    rt.block_on(async {
        for isin in isins {
            let line = probe_isin(&exchange, isin.trim()).await;
            println!("{}", line.to_tsv());
        }
    });
    ExitCode::SUCCESS
}
