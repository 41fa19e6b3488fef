//! End-to-end statement tests against the bundled report definitions.
//!
//! Covers the path a host takes: validate and register definitions, pick the
//! default report, render it for a comparison, and build the account tree.

#![allow(clippy::too_many_lines)]

use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use finstate_core::hierarchy::{CalculatedRowConfig, NodeType, PathSegment, TreeOptions, build_tree};
use finstate_core::ltm;
use finstate_core::period::{BySide, ComparisonContext};
use finstate_core::reports::{
    RenderOptions, ReportDefinition, ReportEngine, ReportRegistry, ReportValidator,
};
use finstate_core::trial_balance::LedgerRow;
use finstate_shared::types::{DetailLevel, StatementType, VarianceMode};

const INCOME_STATEMENT: &str = include_str!("../../../reports/income-statement.json");
const BALANCE_SHEET: &str = include_str!("../../../reports/balance-sheet.json");
const DEMO_LEDGER: &str = include_str!("../../../demos/ledger.json");

fn income(year: i32, period: i32, code0: &str, code1: &str, account: &str, amount: Decimal) -> LedgerRow {
    LedgerRow::new(year, period, StatementType::Income, code0, account, amount)
        .with_level(1, code1, "")
        .with_description(format!("Account {account}"))
}

#[fixture]
fn registry() -> ReportRegistry {
    let mut registry = ReportRegistry::new();
    for json in [INCOME_STATEMENT, BALANCE_SHEET] {
        let definition: ReportDefinition = serde_json::from_str(json).unwrap();
        registry.register(definition).unwrap();
    }
    registry
        .set_default(StatementType::Income, "income-statement")
        .unwrap();
    registry
        .set_default(StatementType::Balance, "balance-sheet")
        .unwrap();
    registry
}

#[fixture]
fn ledger() -> Vec<LedgerRow> {
    vec![
        income(2024, 6, "4", "500", "5000", dec!(100)),
        income(2024, 6, "4", "510", "5100", dec!(-40)),
        income(2024, 6, "4", "600", "6000", dec!(-20)),
        income(2024, 6, "4", "610", "6100", dec!(-10)),
        income(2024, 6, "7", "700", "7000", dec!(5)),
        income(2025, 6, "4", "500", "5000", dec!(150)),
        income(2025, 6, "4", "510", "5100", dec!(-60)),
        income(2025, 6, "4", "600", "6000", dec!(-30)),
        income(2025, 6, "4", "610", "6100", dec!(-10)),
        income(2025, 6, "7", "700", "7010", dec!(-5)),
    ]
}

fn demo_ledger() -> Vec<LedgerRow> {
    serde_json::from_str(DEMO_LEDGER).unwrap()
}

#[rstest]
#[case(INCOME_STATEMENT)]
#[case(BALANCE_SHEET)]
fn test_bundled_definitions_are_clean(#[case] json: &str) {
    let result = ReportValidator::validate_json(json).unwrap();
    assert!(result.is_valid, "{:?}", result.error_messages());
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
}

#[rstest]
fn test_registry_defaults(registry: ReportRegistry) {
    assert_eq!(registry.len(), 2);
    let income = registry.get_default(StatementType::Income).unwrap();
    assert_eq!(income.definition().report_id, "income-statement");
    assert!(registry.get_default(StatementType::Cashflow).is_none());
    assert_eq!(registry.list_by_statement_type(StatementType::Balance).len(), 1);
}

#[rstest]
fn test_income_statement_month_over_year(registry: ReportRegistry, ledger: Vec<LedgerRow>) {
    let report = registry.get_default(StatementType::Income).unwrap();
    let rendered = ReportEngine::render(
        &report,
        &ledger,
        &ComparisonContext::month_over_year(2025, 6),
        &RenderOptions::default(),
    )
    .unwrap();

    assert_eq!(rendered.report_id, "income-statement");
    assert_eq!(rendered.errored_rows().count(), 0);

    let amounts = |order: i32| rendered.row(order).unwrap().amounts;
    assert_eq!(amounts(100), BySide::new(Some(dec!(100)), Some(dec!(150))));
    assert_eq!(amounts(300), BySide::new(Some(dec!(60)), Some(dec!(90))));
    // personnel narrows operating expenses to code1 600
    assert_eq!(amounts(400), BySide::new(Some(dec!(-20)), Some(dec!(-30))));
    assert_eq!(amounts(410), BySide::new(Some(dec!(-10)), Some(dec!(-10))));
    assert_eq!(amounts(450), BySide::new(Some(dec!(-30)), Some(dec!(-40))));
    assert_eq!(amounts(500), BySide::new(Some(dec!(30)), Some(dec!(50))));
    assert_eq!(amounts(600), BySide::new(Some(dec!(5)), Some(dec!(-5))));
    assert_eq!(amounts(700), BySide::new(Some(dec!(35)), Some(dec!(45))));

    let gross_margin = rendered.row(310).unwrap();
    assert_eq!(gross_margin.formatted.prior, "60.0%");
    assert_eq!(gross_margin.formatted.current, "60.0%");
    assert_eq!(rendered.row(510).unwrap().formatted.current, "33.3%");

    let net_income = rendered.row(700).unwrap();
    assert_eq!(net_income.variance_amount, Some(dec!(10)));
    assert_eq!(net_income.variance_percent, Some(dec!(28.57)));
    assert_eq!(net_income.formatted.variance_percent, "28.6%");
    assert!(net_income.always_visible);
}

#[rstest]
fn test_summary_without_variance(registry: ReportRegistry, ledger: Vec<LedgerRow>) {
    let report = registry.get_by_id("income-statement").unwrap();
    let options = RenderOptions {
        detail_level: DetailLevel::Summary,
        variance_mode: VarianceMode::None,
        ..RenderOptions::default()
    };
    let rendered = ReportEngine::render(
        &report,
        &ledger,
        &ComparisonContext::month_over_year(2025, 6),
        &options,
    )
    .unwrap();

    let orders: Vec<i32> = rendered.rows.iter().map(|row| row.order).collect();
    assert_eq!(orders, vec![300, 310, 450, 500, 510, 700]);
    assert!(rendered.rows.iter().all(|row| row.variance_amount.is_none()));
    assert!(rendered.rows.iter().all(|row| row.formatted.variance_percent.is_empty()));
}

#[rstest]
fn test_year_to_date_uses_both_windows(registry: ReportRegistry) {
    let report = registry.get_default(StatementType::Income).unwrap();
    let ledger = demo_ledger();
    let rendered = ReportEngine::render(
        &report,
        &ledger,
        &ComparisonContext::year_to_date(2025, 6),
        &RenderOptions::default(),
    )
    .unwrap();

    assert_eq!(rendered.labels.current, "2025 P1-P6");
    assert_eq!(rendered.labels.prior, "2024 P1-P6");
    assert_eq!(rendered.errored_rows().count(), 0);
    let revenue = rendered.row(100).unwrap();
    assert!(revenue.amounts.prior.is_some());
    assert!(revenue.amounts.current > revenue.amounts.prior);
}

#[rstest]
fn test_balance_sheet_balances(registry: ReportRegistry) {
    let report = registry.get_default(StatementType::Balance).unwrap();
    let rendered = ReportEngine::render(
        &report,
        &demo_ledger(),
        &ComparisonContext::balance_positions(2025, 6),
        &RenderOptions::default(),
    )
    .unwrap();

    assert_eq!(rendered.labels.current, "As of 2025 P6");
    let check = rendered.row(300).unwrap();
    assert_eq!(check.amounts, BySide::new(Some(Decimal::ZERO), Some(Decimal::ZERO)));
    let total_assets = rendered.row(190).unwrap().amounts.current.unwrap();
    assert!(total_assets > Decimal::ZERO);
}

#[rstest]
fn test_ltm_comparison_on_demo_ledger(registry: ReportRegistry) {
    let ledger = demo_ledger();
    let end = ltm::latest_available_period(&ledger);
    assert_eq!((end.year, end.period), (2025, 6));

    let ranges = ltm::calculate_ltm_range(end.year, end.period, ltm::DEFAULT_LTM_WINDOW);
    let completeness =
        ltm::has_complete_data(&ranges, &ltm::available_years(&ledger), ltm::DEFAULT_LTM_WINDOW);
    assert!(completeness.complete);

    let report = registry.get_default(StatementType::Income).unwrap();
    let rendered = ReportEngine::render(
        &report,
        &ledger,
        &ComparisonContext::ltm(end.year, end.period, ltm::DEFAULT_LTM_WINDOW),
        &RenderOptions::default(),
    )
    .unwrap();
    assert_eq!(rendered.labels.current, "LTM (2024 P7 - 2025 P6)");
    // the prior window starts before the ledger does but still has rows
    assert!(rendered.row(100).unwrap().amounts.prior.is_some());
}

#[rstest]
fn test_tree_with_metrics(ledger: Vec<LedgerRow>) {
    let metrics: Vec<CalculatedRowConfig> = serde_json::from_str(
        r#"[
            {"id": "net-income", "label": "Net Income", "order": 20,
             "filter": {"statementType": "income"}},
            {"id": "gross-profit", "label": "Gross Profit", "order": 10,
             "filter": {"code1": ["500", "510"]}, "afterSection": "4"}
        ]"#,
    )
    .unwrap();
    let options = TreeOptions::new(
        StatementType::Income,
        ComparisonContext::month_over_year(2025, 6),
    )
    .with_calculated_rows(metrics);
    let tree = build_tree(&ledger, &options);

    let keys: Vec<String> = tree.iter().map(|node| node.path_key()).collect();
    assert_eq!(
        keys,
        vec![
            "4",
            "4/500",
            "4/500/#5000",
            "4/510",
            "4/510/#5100",
            "4/600",
            "4/600/#6000",
            "4/610",
            "4/610/#6100",
            "=gross-profit",
            "7",
            "7/700",
            "7/700/#7000",
            "7/700/#7010",
            "=net-income",
        ]
    );

    let operating = &tree[0];
    assert_eq!(operating.node_type, NodeType::Category);
    assert_eq!(operating.amounts, BySide::new(Some(dec!(30)), Some(dec!(50))));
    assert!(operating.always_visible);

    let gross_profit = &tree[9];
    assert_eq!(gross_profit.org_hierarchy, vec![PathSegment::Metric("gross-profit".into())]);
    assert_eq!(gross_profit.amounts, BySide::new(Some(dec!(60)), Some(dec!(90))));

    let interest_expense = &tree[13];
    assert_eq!(interest_expense.label, "Account 7010");
    assert_eq!(interest_expense.amounts, BySide::new(Some(dec!(0)), Some(dec!(-5))));

    let net_income = tree.last().unwrap();
    assert_eq!(net_income.amounts, BySide::new(Some(dec!(35)), Some(dec!(45))));
    assert_eq!(net_income.variance_amount, Some(dec!(10)));
}

#[rstest]
fn test_tree_of_other_statement_is_empty(ledger: Vec<LedgerRow>) {
    let options = TreeOptions::new(
        StatementType::Balance,
        ComparisonContext::month_over_year(2025, 6),
    );
    assert!(build_tree(&ledger, &options).is_empty());
}
