//! Hierarchy tree types.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use finstate_shared::types::StatementType;

use crate::filter::FilterSpec;
use crate::period::{BySide, ComparisonContext};
use crate::reports::RowStyle;

/// Level assigned to account leaf nodes.
pub const ACCOUNT_LEVEL: u8 = 5;

/// One step of a node's path from the root.
///
/// Segments are typed so a group code can never collide with an account
/// code or a metric id at the same depth.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathSegment {
    /// Hierarchy code of a group.
    Code(String),
    /// Account code of a leaf.
    Account(String),
    /// Id of a calculated metric.
    Metric(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Account(code) => write!(f, "#{code}"),
            Self::Metric(id) => write!(f, "={id}"),
        }
    }
}

/// Kind of tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Group of rows sharing a code prefix.
    Category,
    /// Single account.
    Account,
    /// Filter-defined metric such as gross profit.
    Calculated,
}

/// A node of the statement tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Path from the root, unique across the tree.
    pub org_hierarchy: Vec<PathSegment>,
    /// Group code, account code or metric id.
    pub code: String,
    /// Display label.
    pub label: String,
    /// 0-3 for groups, 5 for accounts.
    pub level: u8,
    /// Node kind.
    pub node_type: NodeType,
    /// Aggregated movement per side; `None` when the side has no data.
    pub amounts: BySide<Option<Decimal>>,
    /// `current - prior` when both sides have values.
    pub variance_amount: Option<Decimal>,
    /// Variance relative to `|prior|` when both sides have values.
    pub variance_percent: Option<Decimal>,
    /// Must stay displayed regardless of collapse state.
    pub always_visible: bool,
    /// Node can be expanded and collapsed.
    pub is_group: bool,
    /// Node is a calculated metric.
    pub is_calculated: bool,
    /// Metric order; `None` for groups and accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    /// Visual weight.
    pub style: RowStyle,
}

impl TreeNode {
    /// Path rendered as `code/code/#account`.
    #[must_use]
    pub fn path_key(&self) -> String {
        self.org_hierarchy
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Returns true if `self` is a direct child of `parent`.
    #[must_use]
    pub fn is_child_of(&self, parent: &Self) -> bool {
        self.org_hierarchy.len() == parent.org_hierarchy.len() + 1
            && self.org_hierarchy.starts_with(&parent.org_hierarchy)
    }
}

/// A filter-defined total inserted into the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedRowConfig {
    /// Unique metric id.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Position among metrics.
    pub order: i32,
    /// Rows summed into the metric.
    #[serde(default)]
    pub filter: FilterSpec,
    /// Level-0 code the metric follows; `None` places it at the end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_section: Option<String>,
    /// Visual weight.
    #[serde(default = "default_metric_style")]
    pub style: RowStyle,
}

const fn default_metric_style() -> RowStyle {
    RowStyle::Total
}

/// Inputs of [`super::build_tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeOptions {
    /// Statement whose rows are included.
    pub statement_type: StatementType,
    /// Period pair to aggregate.
    pub comparison: ComparisonContext,
    /// Metrics to insert.
    pub calculated_rows: Vec<CalculatedRowConfig>,
}

impl TreeOptions {
    /// Options without metrics.
    #[must_use]
    pub fn new(statement_type: StatementType, comparison: ComparisonContext) -> Self {
        Self {
            statement_type,
            comparison,
            calculated_rows: Vec::new(),
        }
    }

    /// Adds metrics.
    #[must_use]
    pub fn with_calculated_rows(mut self, rows: Vec<CalculatedRowConfig>) -> Self {
        self.calculated_rows = rows;
        self
    }
}
