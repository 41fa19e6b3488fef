//! Finstate CLI
//!
//! Renders configured financial statements from a ledger snapshot.
//!
//! Usage:
//!   finstate validate reports/income-statement.json
//!   finstate render --statement income --ledger demos/ledger.json --compare ytd
//!   finstate tree --statement income --ledger demos/ledger.json --year 2025 --period 6
//!   finstate ltm --ledger demos/ledger.json

mod commands;
mod loader;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use finstate_core::ltm;
use finstate_core::period::ComparisonContext;
use finstate_core::trial_balance::LedgerRow;
use finstate_shared::types::{StatementType, VarianceMode};
use finstate_shared::{AppError, EngineConfig};

#[derive(Parser)]
#[command(name = "finstate")]
#[command(about = "Finstate - configurable financial statement reports")]
#[command(version)]
struct Cli {
    /// Directory holding `default.toml` and per-mode overrides
    #[arg(long, global = true, default_value = "config")]
    config_dir: String,

    /// Overrides the configured report definition directory
    #[arg(long, global = true)]
    reports_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate report definition files
    Validate {
        /// Report definition JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Render a report as JSON
    Render(RenderArgs),

    /// Build the account hierarchy tree as JSON
    Tree(TreeArgs),

    /// Show the LTM window ending at a period
    Ltm(LtmArgs),
}

#[derive(Args)]
struct RenderArgs {
    /// Report id to render
    #[arg(long, conflicts_with = "statement")]
    report: Option<String>,

    /// Render the default report for this statement type
    #[arg(long)]
    statement: Option<StatementType>,

    #[command(flatten)]
    period: PeriodArgs,

    /// Keep only subtotal, total and metric rows
    #[arg(long)]
    summary: bool,

    /// Which variance fields to expose
    #[arg(long, value_enum)]
    variance: Option<VarianceArg>,
}

#[derive(Args)]
struct TreeArgs {
    /// Statement whose rows are included
    #[arg(long, default_value = "income")]
    statement: StatementType,

    #[command(flatten)]
    period: PeriodArgs,

    /// JSON file with calculated metric rows
    #[arg(long)]
    metrics: Option<PathBuf>,
}

#[derive(Args)]
struct LtmArgs {
    /// Ledger JSON file
    #[arg(long)]
    ledger: PathBuf,

    /// Fiscal year of the window end (defaults to the latest in the ledger)
    #[arg(long)]
    year: Option<i32>,

    /// Period of the window end (defaults to the latest in the ledger)
    #[arg(long)]
    period: Option<i32>,

    /// Window length in months (defaults to the configured length)
    #[arg(long)]
    window: Option<i32>,
}

#[derive(Args)]
struct PeriodArgs {
    /// Ledger JSON file
    #[arg(long)]
    ledger: PathBuf,

    /// Fiscal year (defaults to the latest in the ledger)
    #[arg(long)]
    year: Option<i32>,

    /// Fiscal period 1-12 (defaults to the latest in the ledger)
    #[arg(long)]
    period: Option<i32>,

    /// How the prior and current columns are chosen
    #[arg(long, value_enum, default_value_t = CompareArg::Month)]
    compare: CompareArg,
}

impl PeriodArgs {
    fn comparison(&self, ledger: &[LedgerRow], ltm_window: i32) -> ComparisonContext {
        let latest = ltm::latest_available_period(ledger);
        let year = self.year.unwrap_or(latest.year);
        let period = self.period.unwrap_or(latest.period);
        match self.compare {
            CompareArg::Month => ComparisonContext::month_over_year(year, period),
            CompareArg::Ytd => ComparisonContext::year_to_date(year, period),
            CompareArg::Ltm => ComparisonContext::ltm(year, period, ltm_window),
            CompareArg::Balance => ComparisonContext::balance_positions(year, period),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CompareArg {
    /// Month against the same month a year earlier
    Month,
    /// Year-to-date against the prior year-to-date
    Ytd,
    /// Trailing window against the window a year earlier
    Ltm,
    /// Cumulative position against the prior year end
    Balance,
}

#[derive(Clone, Copy, ValueEnum)]
enum VarianceArg {
    None,
    Amount,
    Percent,
    Both,
}

impl From<VarianceArg> for VarianceMode {
    fn from(arg: VarianceArg) -> Self {
        match arg {
            VarianceArg::None => Self::None,
            VarianceArg::Amount => Self::Amount,
            VarianceArg::Percent => Self::Percent,
            VarianceArg::Both => Self::Both,
        }
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "finstate=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            let code = err.downcast_ref::<AppError>().map_or(2, AppError::exit_code);
            error!(error = %err, "command failed");
            eprintln!("error: {err}");
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = EngineConfig::load_from(&cli.config_dir).map_err(AppError::from)?;
    if let Some(dir) = cli.reports_dir {
        config.reports.directory = dir;
    }

    match cli.command {
        Commands::Validate { files } => Ok(commands::validate(&files)),
        Commands::Render(args) => commands::render(&config, &args),
        Commands::Tree(args) => commands::tree(&config, &args),
        Commands::Ltm(args) => commands::ltm(&config, &args),
    }
}
