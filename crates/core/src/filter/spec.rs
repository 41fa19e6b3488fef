//! Filter specification types and matching.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::FilterSpecError;
use crate::trial_balance::{FieldValue, LedgerRow};

/// Ledger fields a filter may name.
pub const FILTER_FIELDS: [&str; 14] = [
    "year",
    "period",
    "statementType",
    "code0",
    "code1",
    "code2",
    "code3",
    "name0",
    "name1",
    "name2",
    "name3",
    "accountCode",
    "accountDescription",
    "movementAmount",
];

/// Field name to matcher map. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSpec(pub BTreeMap<String, FilterMatcher>);

/// How one field is matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterMatcher {
    /// Field equals the value.
    Exact(FilterScalar),
    /// Field equals any of the values.
    AnyOf(Vec<FilterScalar>),
    /// Field satisfies every bound (`gte`, `lte`, `gt`, `lt`).
    Range(BTreeMap<String, FilterScalar>),
}

/// A literal value in a filter.
///
/// Text is tried first so quoted codes such as `"500"` stay textual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterScalar {
    /// Quoted value.
    Text(String),
    /// Numeric value.
    Number(Decimal),
}

/// Range bound operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOp {
    /// Greater than or equal.
    Gte,
    /// Less than or equal.
    Lte,
    /// Strictly greater.
    Gt,
    /// Strictly less.
    Lt,
}

impl FromStr for RangeOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gte" => Ok(Self::Gte),
            "lte" => Ok(Self::Lte),
            "gt" => Ok(Self::Gt),
            "lt" => Ok(Self::Lt),
            _ => Err(format!("Unknown range operator: {s}")),
        }
    }
}

impl RangeOp {
    const fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Gte => !matches!(ordering, Ordering::Less),
            Self::Lte => !matches!(ordering, Ordering::Greater),
            Self::Gt => matches!(ordering, Ordering::Greater),
            Self::Lt => matches!(ordering, Ordering::Less),
        }
    }
}

impl FilterScalar {
    fn as_number(&self) -> Option<Decimal> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(t) => Decimal::from_str(t.trim()).ok(),
        }
    }

    fn as_text(&self) -> String {
        match self {
            Self::Text(t) => t.clone(),
            Self::Number(n) => n.normalize().to_string(),
        }
    }

    /// Equality against a field value. Text fields compare case-sensitively
    /// as strings, numeric fields compare as numbers.
    fn equals(&self, value: FieldValue<'_>) -> bool {
        match value {
            FieldValue::Text(text) => match self {
                Self::Text(t) => t == text,
                Self::Number(_) => self.as_text() == text,
            },
            FieldValue::Number(number) => self.as_number() == Some(number),
            FieldValue::Missing => false,
        }
    }

    /// Ordering of the field value relative to this scalar.
    fn compare(&self, value: FieldValue<'_>) -> Option<Ordering> {
        let field_number = match value {
            FieldValue::Text(text) => Decimal::from_str(text.trim()).ok(),
            FieldValue::Number(number) => Some(number),
            FieldValue::Missing => return None,
        };
        if let (Some(field), Some(bound)) = (field_number, self.as_number()) {
            return Some(field.cmp(&bound));
        }
        match value {
            FieldValue::Text(text) => Some(text.cmp(self.as_text().as_str())),
            FieldValue::Number(number) => Some(number.to_string().cmp(&self.as_text())),
            FieldValue::Missing => None,
        }
    }
}

impl FilterMatcher {
    fn matches(&self, field: &str, value: FieldValue<'_>) -> bool {
        match self {
            Self::Exact(scalar) => scalar.equals(value),
            Self::AnyOf(values) => values.iter().any(|scalar| scalar.equals(value)),
            Self::Range(bounds) => {
                if bounds.is_empty() {
                    warn!(field, "range filter without bounds, matching nothing");
                    return false;
                }
                bounds.iter().all(|(op, bound)| match RangeOp::from_str(op) {
                    Ok(op) => bound.compare(value).is_some_and(|ord| op.accepts(ord)),
                    Err(_) => {
                        warn!(field, operator = %op, "unknown range operator, matching nothing");
                        false
                    }
                })
            }
        }
    }

    fn check(&self, field: &str, errors: &mut Vec<FilterSpecError>) {
        match self {
            Self::Exact(_) => {}
            Self::AnyOf(values) => {
                if values.is_empty() {
                    errors.push(FilterSpecError::EmptyValueList(field.to_string()));
                }
            }
            Self::Range(bounds) => {
                if bounds.is_empty() {
                    errors.push(FilterSpecError::EmptyRange(field.to_string()));
                }
                for op in bounds.keys() {
                    if RangeOp::from_str(op).is_err() {
                        errors.push(FilterSpecError::UnknownOperator {
                            field: field.to_string(),
                            operator: op.clone(),
                        });
                    }
                }
            }
        }
    }
}

impl FilterSpec {
    /// Creates an empty spec.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an exact matcher.
    #[must_use]
    pub fn with_exact(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.0
            .insert(field.into(), FilterMatcher::Exact(FilterScalar::Text(value.into())));
        self
    }

    /// Adds an array matcher.
    #[must_use]
    pub fn with_any_of<I, S>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values
            .into_iter()
            .map(|v| FilterScalar::Text(v.into()))
            .collect();
        self.0.insert(field.into(), FilterMatcher::AnyOf(values));
        self
    }

    /// Returns true if the spec matches everything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if every field matcher accepts the row.
    ///
    /// Unknown fields and malformed matchers match nothing.
    #[must_use]
    pub fn matches(&self, row: &LedgerRow) -> bool {
        self.0.iter().all(|(field, matcher)| match row.field(field) {
            Some(value) => matcher.matches(field, value),
            None => {
                warn!(field = %field, "unknown filter field, matching nothing");
                false
            }
        })
    }

    /// Collects every structural problem in the spec.
    #[must_use]
    pub fn check(&self) -> Vec<FilterSpecError> {
        let mut errors = Vec::new();
        for (field, matcher) in &self.0 {
            if !FILTER_FIELDS.contains(&field.as_str()) {
                errors.push(FilterSpecError::UnknownField(field.clone()));
            }
            matcher.check(field, &mut errors);
        }
        errors
    }
}
