//! Catalog of validated report definitions.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use finstate_shared::types::StatementType;

use super::compiled::CompiledReport;
use super::error::ReportError;
use super::types::ReportDefinition;
use super::validation::ReportValidator;

/// Serializable snapshot of a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryState {
    /// Registered definitions ordered by id.
    pub reports: Vec<ReportDefinition>,
    /// Default report id per statement type.
    #[serde(default)]
    pub defaults: BTreeMap<StatementType, String>,
}

/// Registered reports keyed by id.
///
/// Mutation takes `&mut self`; share it across threads behind a lock.
#[derive(Debug, Default)]
pub struct ReportRegistry {
    reports: BTreeMap<String, Arc<CompiledReport>>,
    defaults: BTreeMap<StatementType, String>,
}

impl ReportRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates, compiles and stores `definition`.
    ///
    /// Validation warnings are logged and do not block registration.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` if the id is taken and `InvalidDefinition` if
    /// validation reports errors.
    pub fn register(&mut self, definition: ReportDefinition) -> Result<Arc<CompiledReport>, ReportError> {
        if self.reports.contains_key(&definition.report_id) {
            return Err(ReportError::DuplicateId(definition.report_id));
        }

        let result = ReportValidator::validate(&definition);
        if !result.is_valid {
            return Err(ReportError::InvalidDefinition {
                report_id: definition.report_id,
                errors: result.error_messages(),
            });
        }
        for warning in &result.warnings {
            warn!(report_id = %definition.report_id, %warning, "report definition warning");
        }

        let compiled = Arc::new(CompiledReport::compile(definition));
        let report_id = compiled.report_id().to_string();
        info!(
            report_id = %report_id,
            statement_type = %compiled.definition().statement_type,
            "registered report"
        );
        self.reports.insert(report_id, Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Looks up a report by id.
    #[must_use]
    pub fn get_by_id(&self, report_id: &str) -> Option<Arc<CompiledReport>> {
        self.reports.get(report_id).cloned()
    }

    /// Reports for `statement_type`, ordered by id.
    #[must_use]
    pub fn list_by_statement_type(&self, statement_type: StatementType) -> Vec<Arc<CompiledReport>> {
        self.reports
            .values()
            .filter(|report| report.definition().statement_type == statement_type)
            .cloned()
            .collect()
    }

    /// Every registered report, ordered by id.
    #[must_use]
    pub fn list(&self) -> Vec<Arc<CompiledReport>> {
        self.reports.values().cloned().collect()
    }

    /// Marks `report_id` as the default for `statement_type`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unregistered id and `StatementTypeMismatch`
    /// when the report renders another statement.
    pub fn set_default(
        &mut self,
        statement_type: StatementType,
        report_id: &str,
    ) -> Result<(), ReportError> {
        let report = self
            .reports
            .get(report_id)
            .ok_or_else(|| ReportError::NotFound(report_id.to_string()))?;
        let actual = report.definition().statement_type;
        if actual != statement_type {
            return Err(ReportError::StatementTypeMismatch {
                report_id: report_id.to_string(),
                expected: statement_type,
                actual,
            });
        }
        self.defaults.insert(statement_type, report_id.to_string());
        info!(report_id, %statement_type, "set default report");
        Ok(())
    }

    /// Default report for `statement_type`, if one is set.
    #[must_use]
    pub fn get_default(&self, statement_type: StatementType) -> Option<Arc<CompiledReport>> {
        self.defaults
            .get(&statement_type)
            .and_then(|id| self.get_by_id(id))
    }

    /// Removes a report, clearing any default that pointed at it.
    pub fn remove(&mut self, report_id: &str) -> Option<Arc<CompiledReport>> {
        let removed = self.reports.remove(report_id)?;
        self.defaults.retain(|_, id| id != report_id);
        info!(report_id, "removed report");
        Some(removed)
    }

    /// Removes every report and default.
    pub fn clear(&mut self) {
        self.reports.clear();
        self.defaults.clear();
    }

    /// Number of registered reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Snapshot of every definition and default.
    #[must_use]
    pub fn export_state(&self) -> RegistryState {
        RegistryState {
            reports: self
                .reports
                .values()
                .map(|report| report.definition().clone())
                .collect(),
            defaults: self.defaults.clone(),
        }
    }

    /// Replaces the registry contents with `state`.
    ///
    /// The registry is left untouched when any part of `state` is rejected.
    ///
    /// # Errors
    ///
    /// Returns the first registration or default error.
    pub fn import_state(&mut self, state: RegistryState) -> Result<(), ReportError> {
        let mut imported = Self::new();
        for definition in state.reports {
            imported.register(definition)?;
        }
        for (statement_type, report_id) in &state.defaults {
            imported.set_default(*statement_type, report_id)?;
        }
        *self = imported;
        Ok(())
    }
}
