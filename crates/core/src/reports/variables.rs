//! Variable resolution.
//!
//! A variable is a filter plus an aggregate. Resolution selects the ledger
//! rows inside a [`PeriodWindow`] that match the filter and aggregates their
//! movement amounts. Results are memoized in a [`VariableCache`] that belongs
//! to a single render and is keyed by variable id and window signature.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use tracing::debug;

use super::error::ReportError;
use super::types::{ReportDefinition, VariableDefinition};
use crate::period::{BySide, PeriodWindow, Side};
use crate::trial_balance::LedgerRow;

/// Memoized variable values for one render.
#[derive(Debug, Default)]
pub struct VariableCache {
    values: HashMap<(String, String), Decimal>,
    hits: u64,
}

impl VariableCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of lookups answered from the cache.
    #[must_use]
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    fn get(&mut self, id: &str, signature: &str) -> Option<Decimal> {
        let value = self
            .values
            .get(&(id.to_string(), signature.to_string()))
            .copied();
        if value.is_some() {
            self.hits += 1;
        }
        value
    }

    fn insert(&mut self, id: &str, signature: String, value: Decimal) {
        self.values.insert((id.to_string(), signature), value);
    }
}

/// Resolves a report's variables against a ledger snapshot.
pub struct VariableResolver<'a> {
    variables: HashMap<&'a str, &'a VariableDefinition>,
    rows: &'a [LedgerRow],
    cache: &'a mut VariableCache,
}

impl<'a> VariableResolver<'a> {
    /// Creates a resolver over `rows` using `cache` for memoization.
    pub fn new(
        definition: &'a ReportDefinition,
        rows: &'a [LedgerRow],
        cache: &'a mut VariableCache,
    ) -> Self {
        let variables = definition
            .variables
            .iter()
            .map(|v| (v.id.as_str(), v))
            .collect();
        Self {
            variables,
            rows,
            cache,
        }
    }

    /// Resolves one variable inside `window`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownVariable` for an undefined id, `CircularDependency`
    /// when `extends` chains loop and `AggregateOverflow` when the selected
    /// amounts cannot be aggregated.
    pub fn resolve(&mut self, id: &str, window: &PeriodWindow) -> Result<Decimal, ReportError> {
        let signature = window.signature();
        if let Some(value) = self.cache.get(id, &signature) {
            return Ok(value);
        }

        let definition = self.lookup(id)?;
        let mut visiting = Vec::new();
        let selected = self.select(id, window, &mut visiting)?;
        let value = definition
            .aggregate
            .apply(&selected)
            .ok_or_else(|| ReportError::AggregateOverflow(id.to_string()))?;
        debug!(
            variable = id,
            window = %signature,
            rows = selected.len(),
            value = %value,
            "resolved variable"
        );
        self.cache.insert(id, signature, value);
        Ok(value)
    }

    /// Resolves several variables inside `window`.
    ///
    /// # Errors
    ///
    /// Returns the first resolution error.
    pub fn resolve_all<'i, I>(
        &mut self,
        ids: I,
        window: &PeriodWindow,
    ) -> Result<BTreeMap<String, Decimal>, ReportError>
    where
        I: IntoIterator<Item = &'i str>,
    {
        let mut values = BTreeMap::new();
        for id in ids {
            let value = self.resolve(id, window)?;
            values.insert(id.to_string(), value);
        }
        Ok(values)
    }

    fn lookup(&self, id: &str) -> Result<&'a VariableDefinition, ReportError> {
        self.variables
            .get(id)
            .copied()
            .ok_or_else(|| ReportError::UnknownVariable(id.to_string()))
    }

    /// Rows selected by `id`, following `extends` chains.
    fn select(
        &self,
        id: &str,
        window: &PeriodWindow,
        visiting: &mut Vec<String>,
    ) -> Result<Vec<&'a LedgerRow>, ReportError> {
        if let Some(start) = visiting.iter().position(|v| v == id) {
            let mut cycle = visiting[start..].to_vec();
            cycle.push(id.to_string());
            return Err(ReportError::CircularDependency { cycle });
        }
        let definition = self.lookup(id)?;
        visiting.push(id.to_string());

        let rows = match &definition.extends {
            Some(parent) => self
                .select(parent, window, visiting)?
                .into_iter()
                .filter(|row| definition.filter.matches(row))
                .collect(),
            None => self
                .rows
                .iter()
                .filter(|row| window.contains_row(row) && definition.filter.matches(row))
                .collect(),
        };

        visiting.pop();
        Ok(rows)
    }
}

/// Variable values per comparison side. `None` marks a side with no data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedVariables {
    sides: BySide<Option<BTreeMap<String, Decimal>>>,
}

impl ResolvedVariables {
    /// Wraps per-side value maps.
    #[must_use]
    pub const fn new(sides: BySide<Option<BTreeMap<String, Decimal>>>) -> Self {
        Self { sides }
    }

    /// Returns true if `side` produced values.
    #[must_use]
    pub const fn is_available(&self, side: Side) -> bool {
        self.sides.get(side).is_some()
    }

    /// Values for `side`, `None` if the side has no data.
    #[must_use]
    pub fn side(&self, side: Side) -> Option<&BTreeMap<String, Decimal>> {
        self.sides.get(side).as_ref()
    }

    /// Value of `id` on `side`.
    #[must_use]
    pub fn get(&self, side: Side, id: &str) -> Option<Decimal> {
        self.side(side).and_then(|values| values.get(id).copied())
    }
}
