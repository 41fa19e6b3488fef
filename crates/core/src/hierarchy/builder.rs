//! Flat ledger rows to a coded tree.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::types::{ACCOUNT_LEVEL, CalculatedRowConfig, NodeType, PathSegment, TreeNode, TreeOptions};
use crate::period::{BySide, ComparisonContext, Side};
use crate::reports::RowStyle;
use crate::trial_balance::{LedgerRow, checked_sum};
use crate::variance::Variance;

/// Running totals per side; `None` once a side has left the decimal range.
type Totals = BySide<Option<Decimal>>;

const ZERO_TOTALS: Totals = BySide::new(Some(Decimal::ZERO), Some(Decimal::ZERO));

struct GroupTotals<'a> {
    name: &'a str,
    totals: Totals,
    groups: BTreeMap<&'a str, GroupTotals<'a>>,
    accounts: BTreeMap<&'a str, AccountTotals<'a>>,
}

impl Default for GroupTotals<'_> {
    fn default() -> Self {
        Self {
            name: "",
            totals: ZERO_TOTALS,
            groups: BTreeMap::new(),
            accounts: BTreeMap::new(),
        }
    }
}

struct AccountTotals<'a> {
    description: &'a str,
    totals: Totals,
}

fn accumulate(totals: &mut Totals, contribution: BySide<Decimal>) {
    for side in Side::BOTH {
        let total = totals.get_mut(side);
        *total = total.and_then(|sum| sum.checked_add(*contribution.get(side)));
    }
}

/// Builds the statement tree for `options.statement_type`.
///
/// Output is depth-first with groups before accounts, each ordered by code.
/// Metrics are placed in non-decreasing order, each after the level-0
/// section named by its anchor or at the end.
#[must_use]
pub fn build_tree(rows: &[LedgerRow], options: &TreeOptions) -> Vec<TreeNode> {
    let comparison = &options.comparison;
    let typed: Vec<&LedgerRow> = rows
        .iter()
        .filter(|row| row.statement_type == options.statement_type)
        .filter(|row| comparison.prior.contains_row(row) || comparison.current.contains_row(row))
        .collect();
    if typed.is_empty() {
        return Vec::new();
    }

    let available = BySide::from_fn(|side| {
        let window = comparison.window(side);
        typed.iter().any(|row| window.contains_row(row))
    });

    let mut root = GroupTotals::default();
    for &row in &typed {
        let contribution = BySide::from_fn(|side| {
            if comparison.window(side).contains_row(row) {
                row.movement_amount
            } else {
                Decimal::ZERO
            }
        });
        add_row(&mut root, row, contribution);
    }

    let mut emitter = Emitter {
        available,
        nodes: Vec::new(),
    };
    let mut metrics = metric_queue(&typed, comparison, &options.calculated_rows, available);
    let mut emitted_sections = BTreeSet::new();
    let mut path = Vec::new();

    for (code, group) in &root.groups {
        emitter.group(&mut path, 0, code, group);
        emitted_sections.insert(*code);
        while metrics.front().is_some_and(|(anchor, _)| {
            anchor
                .as_deref()
                .is_some_and(|a| emitted_sections.contains(a))
        }) {
            if let Some((_, node)) = metrics.pop_front() {
                emitter.nodes.push(node);
            }
        }
    }
    for (code, account) in &root.accounts {
        emitter.account(&mut path, code, account);
    }
    emitter.nodes.extend(metrics.into_iter().map(|(_, node)| node));

    debug!(
        statement_type = %options.statement_type,
        rows = typed.len(),
        nodes = emitter.nodes.len(),
        "built hierarchy tree"
    );
    emitter.nodes
}

fn add_row<'a>(root: &mut GroupTotals<'a>, row: &'a LedgerRow, contribution: BySide<Decimal>) {
    let mut node = root;
    for (level, code) in row.hierarchy_path().into_iter().enumerate() {
        node = node.groups.entry(code).or_insert_with(|| GroupTotals {
            name: row.name(level).unwrap_or(code),
            ..GroupTotals::default()
        });
        accumulate(&mut node.totals, contribution);
    }
    let account = node
        .accounts
        .entry(row.account_code.as_str())
        .or_insert_with(|| AccountTotals {
            description: row.account_description.as_str(),
            totals: ZERO_TOTALS,
        });
    accumulate(&mut account.totals, contribution);
}

/// Metric nodes sorted by order, each paired with its anchor section.
fn metric_queue(
    rows: &[&LedgerRow],
    comparison: &ComparisonContext,
    configs: &[CalculatedRowConfig],
    available: BySide<bool>,
) -> VecDeque<(Option<String>, TreeNode)> {
    let mut sorted: Vec<&CalculatedRowConfig> = configs.iter().collect();
    sorted.sort_by_key(|config| config.order);

    let mut seen = BTreeSet::new();
    let mut queue = VecDeque::with_capacity(sorted.len());
    for config in sorted {
        if !seen.insert(config.id.as_str()) {
            warn!(metric = %config.id, "duplicate calculated row id, skipping");
            continue;
        }
        let amounts = BySide::from_fn(|side| {
            let window = comparison.window(side);
            if !*available.get(side) {
                return None;
            }
            checked_sum(
                rows.iter()
                    .filter(|row| window.contains_row(row) && config.filter.matches(row))
                    .map(|row| row.movement_amount),
            )
        });
        let node = node_with_amounts(
            TreeNode {
                org_hierarchy: vec![PathSegment::Metric(config.id.clone())],
                code: config.id.clone(),
                label: config.label.clone(),
                level: 0,
                node_type: NodeType::Calculated,
                amounts: BySide::default(),
                variance_amount: None,
                variance_percent: None,
                always_visible: true,
                is_group: false,
                is_calculated: true,
                order: Some(config.order),
                style: config.style,
            },
            amounts,
        );
        queue.push_back((config.after_section.clone(), node));
    }
    queue
}

fn node_with_amounts(mut node: TreeNode, amounts: BySide<Option<Decimal>>) -> TreeNode {
    let variance = Variance::between(&amounts);
    node.amounts = amounts;
    node.variance_amount = variance.map(|v| v.amount);
    node.variance_percent = variance.map(|v| v.percent);
    node
}

struct Emitter {
    available: BySide<bool>,
    nodes: Vec<TreeNode>,
}

impl Emitter {
    fn amounts(&self, totals: Totals) -> Totals {
        BySide::from_fn(|side: Side| {
            if *self.available.get(side) {
                *totals.get(side)
            } else {
                None
            }
        })
    }

    fn group(&mut self, path: &mut Vec<PathSegment>, level: u8, code: &str, group: &GroupTotals<'_>) {
        path.push(PathSegment::Code(code.to_string()));
        let node = TreeNode {
            org_hierarchy: path.clone(),
            code: code.to_string(),
            label: group.name.to_string(),
            level,
            node_type: NodeType::Category,
            amounts: BySide::default(),
            variance_amount: None,
            variance_percent: None,
            always_visible: level == 0,
            is_group: true,
            is_calculated: false,
            order: None,
            style: RowStyle::Normal,
        };
        self.nodes.push(node_with_amounts(node, self.amounts(group.totals)));

        for (child_code, child) in &group.groups {
            self.group(path, level + 1, child_code, child);
        }
        for (account_code, account) in &group.accounts {
            self.account(path, account_code, account);
        }
        path.pop();
    }

    fn account(&mut self, path: &mut Vec<PathSegment>, code: &str, account: &AccountTotals<'_>) {
        path.push(PathSegment::Account(code.to_string()));
        let label = if account.description.is_empty() {
            code
        } else {
            account.description
        };
        let node = TreeNode {
            org_hierarchy: path.clone(),
            code: code.to_string(),
            label: label.to_string(),
            level: ACCOUNT_LEVEL,
            node_type: NodeType::Account,
            amounts: BySide::default(),
            variance_amount: None,
            variance_percent: None,
            always_visible: false,
            is_group: false,
            is_calculated: false,
            order: None,
            style: RowStyle::Normal,
        };
        self.nodes.push(node_with_amounts(node, self.amounts(account.totals)));
        path.pop();
    }
}
