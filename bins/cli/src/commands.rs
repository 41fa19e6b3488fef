//! Subcommand implementations.

use std::path::PathBuf;
use std::process::ExitCode;

use serde::Serialize;

use finstate_core::hierarchy::{CalculatedRowConfig, TreeOptions, build_tree};
use finstate_core::ltm::{self, LtmCompleteness, LtmRange};
use finstate_core::reports::{RenderOptions, ReportEngine, ReportValidator};
use finstate_shared::types::{DetailLevel, FiscalPeriod};
use finstate_shared::{AppError, EngineConfig};

use crate::loader;
use crate::{LtmArgs, RenderArgs, TreeArgs};

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Validates each file, exiting 1 on an invalid definition and 2 when a
/// file cannot be read or parsed.
pub fn validate(files: &[PathBuf]) -> ExitCode {
    let mut worst = 0u8;
    for path in files {
        let outcome = loader::read_file(path).and_then(|text| {
            ReportValidator::validate_json(&text)
                .map_err(|err| AppError::Parse(format!("{}: {err}", path.display())))
        });
        match outcome {
            Ok(result) => {
                let status = if result.is_valid { "ok" } else { "invalid" };
                println!("{status}: {}", path.display());
                for issue in &result.errors {
                    println!("  error: {issue}");
                }
                for issue in &result.warnings {
                    println!("  warning: {issue}");
                }
                if !result.is_valid {
                    worst = worst.max(1);
                }
            }
            Err(err) => {
                println!("error: {err}");
                worst = worst.max(err.exit_code());
            }
        }
    }
    ExitCode::from(worst)
}

pub fn render(config: &EngineConfig, args: &RenderArgs) -> anyhow::Result<ExitCode> {
    let registry = loader::load_registry(&config.reports)?;
    let report = match (&args.report, args.statement) {
        (Some(report_id), _) => registry
            .get_by_id(report_id)
            .ok_or_else(|| AppError::NotFound(format!("report '{report_id}'")))?,
        (None, Some(statement_type)) => registry
            .get_default(statement_type)
            .or_else(|| registry.list_by_statement_type(statement_type).into_iter().next())
            .ok_or_else(|| AppError::NotFound(format!("no {statement_type} report registered")))?,
        (None, None) => {
            return Err(AppError::Validation("pass --report or --statement".to_string()).into());
        }
    };

    let ledger = loader::load_ledger(&args.period.ledger)?;
    let comparison = args.period.comparison(&ledger, config.ltm.window_length);

    let mut options = RenderOptions::from(&config.render);
    if args.summary {
        options.detail_level = DetailLevel::Summary;
    }
    if let Some(mode) = args.variance {
        options.variance_mode = mode.into();
    }

    let rendered =
        ReportEngine::render(&report, &ledger, &comparison, &options).map_err(AppError::from)?;
    print_json(&rendered)?;
    Ok(ExitCode::SUCCESS)
}

pub fn tree(config: &EngineConfig, args: &TreeArgs) -> anyhow::Result<ExitCode> {
    let ledger = loader::load_ledger(&args.period.ledger)?;
    let metrics: Vec<CalculatedRowConfig> = match &args.metrics {
        Some(path) => loader::read_json(path)?,
        None => Vec::new(),
    };
    for (index, metric) in metrics.iter().enumerate() {
        if let Some(err) = metric.filter.check().into_iter().next() {
            return Err(AppError::Validation(format!("metrics[{index}].filter: {err}")).into());
        }
    }

    let comparison = args.period.comparison(&ledger, config.ltm.window_length);
    let options = TreeOptions::new(args.statement, comparison).with_calculated_rows(metrics);
    print_json(&build_tree(&ledger, &options))?;
    Ok(ExitCode::SUCCESS)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LtmSummary {
    end: FiscalPeriod,
    window_length: i32,
    label: String,
    ranges: Vec<LtmRange>,
    completeness: LtmCompleteness,
    rows: usize,
}

pub fn ltm(config: &EngineConfig, args: &LtmArgs) -> anyhow::Result<ExitCode> {
    let ledger = loader::load_ledger(&args.ledger)?;
    let latest = ltm::latest_available_period(&ledger);
    let end = FiscalPeriod::new(
        args.year.unwrap_or(latest.year),
        args.period.unwrap_or(latest.period),
    );
    let window_length = args.window.unwrap_or(config.ltm.window_length);

    let ranges = ltm::calculate_ltm_range(end.year, end.period, window_length);
    let summary = LtmSummary {
        end,
        window_length,
        label: ltm::generate_ltm_label(&ranges),
        completeness: ltm::has_complete_data(&ranges, &ltm::available_years(&ledger), window_length),
        rows: ltm::filter_movements_for_ltm(&ledger, &ranges).len(),
        ranges,
    };
    print_json(&summary)?;
    Ok(ExitCode::SUCCESS)
}
