//! Property-based tests for the hierarchy tree builder.
//!
//! - Path uniqueness
//! - Aggregation consistency
//! - Metric ordering
//! - Always-visible rows

use std::collections::HashSet;

use proptest::prelude::*;
use rust_decimal::Decimal;

use finstate_shared::types::StatementType;

use super::builder::build_tree;
use super::types::{CalculatedRowConfig, NodeType, TreeNode, TreeOptions};
use crate::filter::FilterSpec;
use crate::period::ComparisonContext;
use crate::reports::RowStyle;
use crate::trial_balance::LedgerRow;

/// Strategy to generate ledger rows with sparse hierarchies around 2025 P6.
fn ledger_row() -> impl Strategy<Value = LedgerRow> {
    (
        prop_oneof![Just(2024), Just(2025)],
        prop_oneof![Just(5), Just(6)],
        prop_oneof![Just("4"), Just("6"), Just("8")],
        prop_oneof![Just(""), Just("100"), Just("200")],
        prop_oneof![Just(""), Just("10"), Just("20")],
        prop_oneof![Just("A1"), Just("A2"), Just("A3"), Just("100")],
        -1_000_000i64..1_000_000,
        any::<bool>(),
    )
        .prop_map(|(year, period, code0, code1, code2, account, cents, balance)| {
            let statement_type = if balance {
                StatementType::Balance
            } else {
                StatementType::Income
            };
            LedgerRow::new(year, period, statement_type, code0, account, Decimal::new(cents, 2))
                .with_level(1, code1, "")
                .with_level(2, code2, "")
        })
}

/// Strategy to generate metrics with arbitrary orders and anchors.
fn metric() -> impl Strategy<Value = CalculatedRowConfig> {
    (
        0i32..50,
        prop_oneof![Just(None), Just(Some("4")), Just(Some("6")), Just(Some("8")), Just(Some("9"))],
        0usize..6,
    )
        .prop_map(|(order, anchor, id)| CalculatedRowConfig {
            id: format!("m{id}"),
            label: format!("Metric {id}"),
            order,
            filter: FilterSpec::new(),
            after_section: anchor.map(str::to_string),
            style: RowStyle::Total,
        })
}

fn options(metrics: Vec<CalculatedRowConfig>) -> TreeOptions {
    TreeOptions::new(
        StatementType::Income,
        ComparisonContext::month_over_year(2025, 6),
    )
    .with_calculated_rows(metrics)
}

fn children<'a>(tree: &'a [TreeNode], parent: &'a TreeNode) -> impl Iterator<Item = &'a TreeNode> {
    tree.iter().filter(move |node| node.is_child_of(parent))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every node's path is unique.
    #[test]
    fn prop_paths_are_unique(
        rows in prop::collection::vec(ledger_row(), 0..60),
        metrics in prop::collection::vec(metric(), 0..6),
    ) {
        let tree = build_tree(&rows, &options(metrics));
        let mut seen = HashSet::new();
        for node in &tree {
            prop_assert!(seen.insert(node.org_hierarchy.clone()), "duplicate path {}", node.path_key());
        }
    }

    /// A group's amount equals the sum of its direct children on each side.
    #[test]
    fn prop_groups_sum_their_children(rows in prop::collection::vec(ledger_row(), 0..60)) {
        let tree = build_tree(&rows, &options(Vec::new()));
        let tolerance = Decimal::new(1, 2);
        for group in tree.iter().filter(|n| n.node_type == NodeType::Category) {
            for (own, sum) in [
                (
                    group.amounts.prior,
                    children(&tree, group).filter_map(|c| c.amounts.prior).sum::<Decimal>(),
                ),
                (
                    group.amounts.current,
                    children(&tree, group).filter_map(|c| c.amounts.current).sum::<Decimal>(),
                ),
            ] {
                if let Some(own) = own {
                    prop_assert!((own - sum).abs() <= tolerance, "{} != {}", own, sum);
                }
            }
        }
    }

    /// Metrics appear in non-decreasing order.
    #[test]
    fn prop_metrics_are_ordered(
        rows in prop::collection::vec(ledger_row(), 1..60),
        metrics in prop::collection::vec(metric(), 0..6),
    ) {
        let tree = build_tree(&rows, &options(metrics));
        let orders: Vec<i32> = tree.iter().filter_map(|n| n.order).collect();
        prop_assert!(orders.windows(2).all(|w| w[0] <= w[1]), "{:?}", orders);
    }

    /// Level-0 groups, total-styled and calculated nodes are always visible.
    #[test]
    fn prop_always_visible(
        rows in prop::collection::vec(ledger_row(), 0..60),
        metrics in prop::collection::vec(metric(), 0..6),
    ) {
        let tree = build_tree(&rows, &options(metrics));
        for node in &tree {
            let required = (node.node_type == NodeType::Category && node.level == 0)
                || node.style.is_total()
                || node.is_calculated;
            if required {
                prop_assert!(node.always_visible, "{} is hidden", node.path_key());
            }
            prop_assert_eq!(node.is_group, node.node_type == NodeType::Category);
        }
    }
}
