//! Static checks on report definitions.
//!
//! Validation never stops at the first problem; every violation is
//! collected with the path of the offending field.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use finstate_shared::types::StatementType;

use super::types::{
    Aggregate, FormatKind, LayoutItem, LayoutItemType, LayoutKind, ReportDefinition, RowStyle,
    VariableDefinition,
};
use crate::expression;
use crate::filter::FilterSpec;

/// Largest allowed indent.
pub const MAX_INDENT: u8 = 3;

/// Largest allowed number of decimals in a format.
pub const MAX_DECIMALS: u32 = 6;

static REPORT_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:[-_][a-z0-9]+)*$").expect("valid regex"));

static VERSION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?$").expect("valid regex")
});

static IDENTIFIER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Path of the offending field, e.g. `layout[2].expression`.
    pub path: String,
    /// What is wrong.
    pub message: String,
}

impl ValidationIssue {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Outcome of validating one definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// True when there are no errors. Warnings do not affect validity.
    pub is_valid: bool,
    /// Violations that make the definition unusable.
    pub errors: Vec<ValidationIssue>,
    /// Suspicious but usable constructs.
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Error messages formatted as `path: message`.
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Validates report definitions.
pub struct ReportValidator;

impl ReportValidator {
    /// Checks `definition` and collects every error and warning.
    #[must_use]
    pub fn validate(definition: &ReportDefinition) -> ValidationResult {
        let mut checker = Checker::default();
        checker.report_id(&definition.report_id);
        checker.name(&definition.name);
        checker.version(&definition.version);
        checker.variables(definition);
        checker.layout(definition);
        checker.unused_variables(definition);
        checker.finish()
    }

    /// Validates a JSON definition document.
    ///
    /// The document is first checked field by field, so missing fields,
    /// mistyped values and unknown enum names are all reported together.
    /// A document without such problems is then validated like
    /// [`ReportValidator::validate`].
    ///
    /// # Errors
    ///
    /// Returns the parse error only when `text` is not well-formed JSON.
    pub fn validate_json(text: &str) -> Result<ValidationResult, serde_json::Error> {
        let document: Value = serde_json::from_str(text)?;
        let mut checker = Checker::default();
        checker.document(&document);
        if checker.errors.is_empty() {
            match ReportDefinition::deserialize(&document) {
                Ok(definition) => return Ok(Self::validate(&definition)),
                Err(err) => checker.error("$", err.to_string()),
            }
        }
        Ok(checker.finish())
    }
}

/// `None` for an absent or null field.
fn present<'v>(fields: &'v Map<String, Value>, key: &str) -> Option<&'v Value> {
    fields.get(key).filter(|value| !value.is_null())
}

#[derive(Default)]
struct Checker {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Checker {
    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationIssue::new(path, message));
    }

    fn warning(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationIssue::new(path, message));
    }

    fn finish(self) -> ValidationResult {
        ValidationResult {
            is_valid: self.errors.is_empty(),
            errors: self.errors,
            warnings: self.warnings,
        }
    }

    fn report_id(&mut self, report_id: &str) {
        if report_id.trim().is_empty() {
            self.error("reportId", "is required");
        } else if !REPORT_ID_PATTERN.is_match(report_id) {
            self.error(
                "reportId",
                format!(
                    "'{report_id}' must be lowercase letters and digits separated by '-' or '_'"
                ),
            );
        }
    }

    fn name(&mut self, name: &str) {
        if name.trim().is_empty() {
            self.error("name", "is required");
        }
    }

    fn version(&mut self, version: &str) {
        if version.trim().is_empty() {
            self.error("version", "is required");
        } else if !VERSION_PATTERN.is_match(version) {
            self.error("version", format!("'{version}' is not a semantic version"));
        }
    }

    fn document(&mut self, document: &Value) {
        let Some(root) = document.as_object() else {
            self.error("$", "definition must be a JSON object");
            return;
        };

        let header: [(&str, fn(&mut Self, &str)); 3] = [
            ("reportId", Self::report_id),
            ("name", Self::name),
            ("version", Self::version),
        ];
        for (key, check) in header {
            match present(root, key) {
                None => check(self, ""),
                Some(Value::String(text)) => check(self, text),
                Some(_) => self.error(key, "must be a string"),
            }
        }
        self.required_enum::<StatementType>(
            "statementType",
            present(root, "statementType"),
            "statement type",
        );

        if let Some(variables) = self.array("variables", present(root, "variables")) {
            for (index, variable) in variables.iter().enumerate() {
                self.variable_document(&format!("variables[{index}]"), variable);
            }
        }
        if let Some(layout) = self.array("layout", present(root, "layout")) {
            for (index, item) in layout.iter().enumerate() {
                self.layout_document(&format!("layout[{index}]"), item);
            }
        }
    }

    fn variable_document(&mut self, path: &str, variable: &Value) {
        let Some(fields) = self.object(path, variable) else {
            return;
        };
        self.required::<String>(&format!("{path}.id"), present(fields, "id"));
        self.required_enum::<Aggregate>(
            &format!("{path}.aggregate"),
            present(fields, "aggregate"),
            "aggregate",
        );
        self.optional::<String>(&format!("{path}.name"), present(fields, "name"));
        self.optional::<FilterSpec>(&format!("{path}.filter"), present(fields, "filter"));
        self.optional::<String>(
            &format!("{path}.description"),
            present(fields, "description"),
        );
        self.optional::<String>(&format!("{path}.extends"), present(fields, "extends"));
    }

    fn layout_document(&mut self, path: &str, item: &Value) {
        let Some(fields) = self.object(path, item) else {
            return;
        };
        self.required::<i32>(&format!("{path}.order"), present(fields, "order"));
        self.optional::<String>(&format!("{path}.label"), present(fields, "label"));
        self.optional::<u8>(&format!("{path}.indent"), present(fields, "indent"));
        if let Some(style) = present(fields, "style") {
            self.enum_value::<RowStyle>(&format!("{path}.style"), style, "style");
        }
        if let Some(format) = present(fields, "format") {
            let format_path = format!("{path}.format");
            if let Some(format_fields) = self.object(&format_path, format) {
                if let Some(kind) = present(format_fields, "type") {
                    self.enum_value::<FormatKind>(
                        &format!("{format_path}.type"),
                        kind,
                        "format type",
                    );
                }
                self.optional::<u32>(
                    &format!("{format_path}.decimals"),
                    present(format_fields, "decimals"),
                );
            }
        }

        let type_path = format!("{path}.type");
        let kind = self.required_enum::<LayoutItemType>(
            &type_path,
            present(fields, "type"),
            "layout type",
        );
        let Some(kind) = kind else {
            return;
        };
        match kind {
            LayoutItemType::Variable => {
                self.required::<String>(&format!("{path}.variable"), present(fields, "variable"));
            }
            LayoutItemType::Calculated => {
                self.required::<String>(
                    &format!("{path}.expression"),
                    present(fields, "expression"),
                );
            }
            LayoutItemType::Category => {
                self.optional::<FilterSpec>(&format!("{path}.filter"), present(fields, "filter"));
            }
            LayoutItemType::Subtotal => {
                self.required::<i32>(&format!("{path}.from"), present(fields, "from"));
                self.required::<i32>(&format!("{path}.to"), present(fields, "to"));
            }
            LayoutItemType::Spacer => {}
        }
    }

    fn object<'v>(&mut self, path: &str, value: &'v Value) -> Option<&'v Map<String, Value>> {
        let fields = value.as_object();
        if fields.is_none() {
            self.error(path, "must be an object");
        }
        fields
    }

    fn array<'v>(&mut self, path: &str, value: Option<&'v Value>) -> Option<&'v Vec<Value>> {
        match value {
            None => None,
            Some(Value::Array(items)) => Some(items),
            Some(_) => {
                self.error(path, "must be an array");
                None
            }
        }
    }

    fn required<'v, T: Deserialize<'v>>(
        &mut self,
        path: &str,
        value: Option<&'v Value>,
    ) -> Option<T> {
        let Some(value) = value else {
            self.error(path, "is required");
            return None;
        };
        self.optional(path, Some(value))
    }

    fn optional<'v, T: Deserialize<'v>>(
        &mut self,
        path: &str,
        value: Option<&'v Value>,
    ) -> Option<T> {
        match T::deserialize(value?) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                self.error(path, err.to_string());
                None
            }
        }
    }

    fn required_enum<'v, T: Deserialize<'v>>(
        &mut self,
        path: &str,
        value: Option<&'v Value>,
        what: &str,
    ) -> Option<T> {
        let Some(value) = value else {
            self.error(path, "is required");
            return None;
        };
        self.enum_value(path, value, what)
    }

    fn enum_value<'v, T: Deserialize<'v>>(
        &mut self,
        path: &str,
        value: &'v Value,
        what: &str,
    ) -> Option<T> {
        let parsed = T::deserialize(value).ok();
        if parsed.is_none() {
            match value.as_str() {
                Some(name) => self.error(path, format!("unknown {what} '{name}'")),
                None => self.error(path, format!("{what} must be a string")),
            }
        }
        parsed
    }

    fn variables(&mut self, definition: &ReportDefinition) {
        let mut seen = BTreeSet::new();
        for (index, variable) in definition.variables.iter().enumerate() {
            let path = format!("variables[{index}]");

            if variable.id.is_empty() {
                self.error(format!("{path}.id"), "is required");
            } else if !IDENTIFIER_PATTERN.is_match(&variable.id) {
                self.error(
                    format!("{path}.id"),
                    format!("'{}' is not a valid identifier", variable.id),
                );
            } else if !seen.insert(variable.id.as_str()) {
                self.error(
                    format!("{path}.id"),
                    format!("duplicate variable id '{}'", variable.id),
                );
            }

            self.filter(&format!("{path}.filter"), &variable.filter);

            if let Some(parent) = &variable.extends {
                if parent == &variable.id {
                    self.error(format!("{path}.extends"), "variable cannot extend itself");
                } else if definition.variable(parent).is_none() {
                    self.error(
                        format!("{path}.extends"),
                        format!("unknown variable '{parent}'"),
                    );
                } else if let Some(cycle) = extends_cycle(definition, variable) {
                    self.error(
                        format!("{path}.extends"),
                        format!("circular extends: {}", cycle.join(" -> ")),
                    );
                }
            }
        }
    }

    fn filter(&mut self, path: &str, filter: &FilterSpec) {
        for err in filter.check() {
            self.error(path, err.to_string());
        }
    }

    fn layout(&mut self, definition: &ReportDefinition) {
        if definition.layout.is_empty() {
            self.warning("layout", "layout has no items");
            return;
        }

        let mut kinds: BTreeMap<i32, &LayoutKind> = BTreeMap::new();
        for (index, item) in definition.layout.iter().enumerate() {
            if kinds.insert(item.order, &item.kind).is_some() {
                self.error(
                    format!("layout[{index}].order"),
                    format!("duplicate order {}", item.order),
                );
            }
        }

        for (index, item) in definition.layout.iter().enumerate() {
            let path = format!("layout[{index}]");
            if item.indent > MAX_INDENT {
                self.error(
                    format!("{path}.indent"),
                    format!("indent {} exceeds {MAX_INDENT}", item.indent),
                );
            }
            if item.format.decimals > MAX_DECIMALS {
                self.error(
                    format!("{path}.format.decimals"),
                    format!("decimals {} exceeds {MAX_DECIMALS}", item.format.decimals),
                );
            }
            self.layout_kind(definition, &kinds, &path, item);
        }
    }

    fn layout_kind(
        &mut self,
        definition: &ReportDefinition,
        kinds: &BTreeMap<i32, &LayoutKind>,
        path: &str,
        item: &LayoutItem,
    ) {
        match &item.kind {
            LayoutKind::Variable { variable } => {
                if definition.variable(variable).is_none() {
                    self.error(
                        format!("{path}.variable"),
                        format!("unknown variable '{variable}'"),
                    );
                }
            }
            LayoutKind::Calculated { expression } => {
                let path = format!("{path}.expression");
                let expr = match expression::parse(expression) {
                    Ok(expr) => expr,
                    Err(err) => {
                        self.error(path, err.to_string());
                        return;
                    }
                };
                for name in expr.variable_refs() {
                    if definition.variable(name).is_none() {
                        self.error(&path, format!("unknown variable '{name}'"));
                    }
                }
                for order in expr.order_refs() {
                    match kinds.get(&order) {
                        None => self.error(&path, format!("@{order} does not exist")),
                        Some(_) if order >= item.order => self.error(
                            &path,
                            format!("@{order} must refer to an earlier row than {}", item.order),
                        ),
                        Some(LayoutKind::Spacer) => {
                            self.error(&path, format!("@{order} refers to a spacer"));
                        }
                        Some(_) => {}
                    }
                }
            }
            LayoutKind::Category { filter } => self.filter(&format!("{path}.filter"), filter),
            LayoutKind::Subtotal { from, to } => {
                if from > to {
                    self.error(
                        path,
                        format!("subtotal range from {from} is greater than to {to}"),
                    );
                }
                for (field, order) in [("from", from), ("to", to)] {
                    if !kinds.contains_key(order) {
                        self.error(
                            format!("{path}.{field}"),
                            format!("order {order} does not exist"),
                        );
                    }
                }
                if *to > item.order {
                    self.error(
                        format!("{path}.to"),
                        format!("subtotal range ends after its own order {}", item.order),
                    );
                }
            }
            LayoutKind::Spacer => {
                if !item.label.is_empty() {
                    self.warning(format!("{path}.label"), "spacer label is ignored");
                }
            }
        }
    }

    fn unused_variables(&mut self, definition: &ReportDefinition) {
        let mut used: BTreeSet<String> = definition
            .variables
            .iter()
            .filter_map(|v| v.extends.clone())
            .collect();
        for item in &definition.layout {
            match &item.kind {
                LayoutKind::Variable { variable } => {
                    used.insert(variable.clone());
                }
                LayoutKind::Calculated { expression } => {
                    if let Ok(expr) = expression::parse(expression) {
                        used.extend(expr.variable_refs().into_iter().map(str::to_string));
                    }
                }
                _ => {}
            }
        }

        for (index, variable) in definition.variables.iter().enumerate() {
            if !used.contains(&variable.id) {
                self.warning(
                    format!("variables[{index}]"),
                    format!("variable '{}' is never used", variable.id),
                );
            }
        }
    }
}

/// Cycle through `extends` starting at `start`, reported only from the
/// smallest id of the cycle so each cycle appears once.
fn extends_cycle<'a>(
    definition: &'a ReportDefinition,
    start: &'a VariableDefinition,
) -> Option<Vec<String>> {
    let mut chain = vec![start.id.as_str()];
    let mut current = start;
    while let Some(parent) = current.extends.as_deref() {
        if parent == start.id {
            let smallest = chain.iter().min().copied().unwrap_or_default();
            if smallest != start.id {
                return None;
            }
            chain.push(parent);
            return Some(chain.into_iter().map(str::to_string).collect());
        }
        if chain.contains(&parent) {
            return None;
        }
        current = definition.variable(parent)?;
        chain.push(parent);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn definition(variables: &str, layout: &str) -> ReportDefinition {
        serde_json::from_str(&format!(
            r#"{{"reportId": "income-statement", "name": "Income Statement",
                "version": "1.0.0", "statementType": "income",
                "variables": {variables}, "layout": {layout}}}"#
        ))
        .unwrap()
    }

    fn valid() -> ReportDefinition {
        definition(
            r#"[{"id": "revenue", "filter": {"code1": "500"}, "aggregate": "sum"},
                {"id": "cogs", "filter": {"code1": "510"}, "aggregate": "sum"}]"#,
            r#"[{"order": 100, "type": "variable", "label": "Revenue", "variable": "revenue"},
                {"order": 200, "type": "variable", "label": "COGS", "variable": "cogs"},
                {"order": 300, "type": "calculated", "label": "Gross Profit",
                 "expression": "@100 + @200", "style": "subtotal"},
                {"order": 400, "type": "spacer"},
                {"order": 500, "type": "subtotal", "label": "Check", "from": 100, "to": 200}]"#,
        )
    }

    fn paths(result: &ValidationResult) -> Vec<&str> {
        result.errors.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn test_valid_definition() {
        let result = ReportValidator::validate(&valid());
        assert!(result.is_valid, "{:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[rstest]
    #[case("income-statement", true)]
    #[case("pnl_v2", true)]
    #[case("Income", false)]
    #[case("bad--id", false)]
    #[case("-leading", false)]
    #[case("", false)]
    fn test_report_id_pattern(#[case] id: &str, #[case] ok: bool) {
        let mut def = valid();
        def.report_id = id.to_string();
        assert_eq!(ReportValidator::validate(&def).is_valid, ok);
    }

    #[rstest]
    #[case("1.0.0", true)]
    #[case("2.10.3-beta.1", true)]
    #[case("1.0", false)]
    #[case("v1.0.0", false)]
    fn test_version_pattern(#[case] version: &str, #[case] ok: bool) {
        let mut def = valid();
        def.version = version.to_string();
        assert_eq!(ReportValidator::validate(&def).is_valid, ok);
    }

    #[test]
    fn test_collects_every_error() {
        let def = definition(
            r#"[{"id": "revenue", "filter": {"colour": "red"}, "aggregate": "sum"},
                {"id": "revenue", "aggregate": "sum"},
                {"id": "1bad", "aggregate": "sum"}]"#,
            r#"[{"order": 100, "type": "variable", "label": "R", "variable": "missing", "indent": 4},
                {"order": 100, "type": "calculated", "label": "X", "expression": "revenue +",
                 "format": {"type": "percent", "decimals": 7}}]"#,
        );
        let result = ReportValidator::validate(&def);
        assert!(!result.is_valid);
        let paths = paths(&result);
        assert!(paths.contains(&"variables[0].filter"));
        assert!(paths.contains(&"variables[1].id"));
        assert!(paths.contains(&"variables[2].id"));
        assert!(paths.contains(&"layout[0].variable"));
        assert!(paths.contains(&"layout[0].indent"));
        assert!(paths.contains(&"layout[1].order"));
        assert!(paths.contains(&"layout[1].format.decimals"));
        assert!(paths.contains(&"layout[1].expression"));
    }

    #[test]
    fn test_order_references_must_point_backwards() {
        let def = definition(
            r#"[{"id": "revenue", "aggregate": "sum"}]"#,
            r#"[{"order": 100, "type": "calculated", "label": "A", "expression": "@200 + revenue"},
                {"order": 200, "type": "variable", "label": "B", "variable": "revenue"},
                {"order": 300, "type": "calculated", "label": "C", "expression": "@300 + @999"}]"#,
        );
        let result = ReportValidator::validate(&def);
        let messages = result.error_messages();
        assert_eq!(messages.len(), 3, "{messages:?}");
        assert!(messages[0].contains("@200 must refer to an earlier row"));
        assert!(messages.iter().any(|m| m.contains("@300 must refer")));
        assert!(messages.iter().any(|m| m.contains("@999 does not exist")));
    }

    #[test]
    fn test_subtotal_range_checks() {
        let def = definition(
            "[]",
            r#"[{"order": 100, "type": "category", "label": "A", "filter": {}},
                {"order": 200, "type": "subtotal", "label": "S", "from": 150, "to": 100},
                {"order": 300, "type": "subtotal", "label": "T", "from": 100, "to": 400},
                {"order": 400, "type": "category", "label": "B"}]"#,
        );
        let result = ReportValidator::validate(&def);
        let paths = paths(&result);
        assert!(paths.contains(&"layout[1]"));
        assert!(paths.contains(&"layout[1].from"));
        assert!(paths.contains(&"layout[2].to"));
    }

    #[test]
    fn test_extends_checks() {
        let def = definition(
            r#"[{"id": "a", "extends": "b", "aggregate": "sum"},
                {"id": "b", "extends": "a", "aggregate": "sum"},
                {"id": "c", "extends": "ghost", "aggregate": "sum"},
                {"id": "d", "extends": "d", "aggregate": "sum"}]"#,
            r#"[{"order": 1, "type": "calculated", "label": "x", "expression": "a + b + c + d"}]"#,
        );
        let result = ReportValidator::validate(&def);
        let messages = result.error_messages();
        assert_eq!(messages.len(), 3, "{messages:?}");
        assert!(messages.contains(&"variables[0].extends: circular extends: a -> b -> a".to_string()));
        assert!(messages.iter().any(|m| m.contains("unknown variable 'ghost'")));
        assert!(messages.iter().any(|m| m.contains("cannot extend itself")));
    }

    #[test]
    fn test_warnings_do_not_invalidate() {
        let def = definition(
            r#"[{"id": "revenue", "aggregate": "sum"}, {"id": "spare", "aggregate": "count"}]"#,
            r#"[{"order": 1, "type": "variable", "label": "R", "variable": "revenue"},
                {"order": 2, "type": "spacer", "label": "oops"}]"#,
        );
        let result = ReportValidator::validate(&def);
        assert!(result.is_valid);
        let warned: Vec<&str> = result.warnings.iter().map(|w| w.path.as_str()).collect();
        assert_eq!(warned, vec!["layout[1].label", "variables[1]"]);
    }

    #[test]
    fn test_empty_layout_warns() {
        let result = ReportValidator::validate(&definition("[]", "[]"));
        assert!(result.is_valid);
        assert_eq!(result.warnings[0].path, "layout");
    }

    #[test]
    fn test_validate_json_only_fails_on_malformed_json() {
        assert!(ReportValidator::validate_json("{not json").is_err());

        let result = ReportValidator::validate_json("[1, 2]").unwrap();
        assert!(!result.is_valid);
        assert_eq!(result.error_messages(), vec!["$: definition must be a JSON object"]);

        let result = ReportValidator::validate_json(
            r#"{"reportId": "R!", "name": "R", "version": "1.0.0", "statementType": "income"}"#,
        )
        .unwrap();
        assert!(!result.is_valid);
        assert_eq!(paths(&result), vec!["reportId"]);
    }

    #[test]
    fn test_validate_json_collects_unknown_names() {
        let result = ReportValidator::validate_json(
            r#"{"reportId": "Bad Id", "version": "x", "statementType": "equity",
                "layout": [{"order": 1, "type": "chart", "style": "loud"}]}"#,
        )
        .unwrap();
        assert!(!result.is_valid);
        assert_eq!(
            paths(&result),
            vec![
                "reportId",
                "name",
                "version",
                "statementType",
                "layout[0].style",
                "layout[0].type",
            ]
        );
        let messages = result.error_messages();
        assert!(messages.contains(&"name: is required".to_string()));
        assert!(messages.contains(&"statementType: unknown statement type 'equity'".to_string()));
        assert!(messages.contains(&"layout[0].style: unknown style 'loud'".to_string()));
        assert!(messages.contains(&"layout[0].type: unknown layout type 'chart'".to_string()));
    }

    #[test]
    fn test_validate_json_collects_missing_fields() {
        let result = ReportValidator::validate_json(
            r#"{"reportId": "r", "name": "R", "version": "1.0.0", "statementType": "income",
                "variables": [{"id": "a", "aggregate": "median"}, {"aggregate": "sum"}],
                "layout": [
                    {"type": "subtotal", "from": 1},
                    {"order": 2, "type": "calculated", "indent": 300},
                    {"order": 3, "type": "variable", "format": {"type": "money", "decimals": -1}},
                    "spacer"
                ]}"#,
        )
        .unwrap();
        assert_eq!(
            paths(&result),
            vec![
                "variables[0].aggregate",
                "variables[1].id",
                "layout[0].order",
                "layout[0].to",
                "layout[1].indent",
                "layout[1].expression",
                "layout[2].format.type",
                "layout[2].format.decimals",
                "layout[2].variable",
                "layout[3]",
            ]
        );
        assert!(result.warnings.is_empty());
    }
}
