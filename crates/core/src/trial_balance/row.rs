//! Ledger movement rows.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use finstate_shared::types::{FiscalPeriod, StatementType};

/// Number of coded hierarchy levels above the account (code0..code3).
pub const MAX_HIERARCHY_DEPTH: usize = 4;

/// One recorded account movement for a fiscal year/period.
///
/// Rows are produced once by an import collaborator and never mutated by the
/// engine. `code0` is mandatory; deeper codes are optional and an empty string
/// counts as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRow {
    /// Fiscal year.
    pub year: i32,
    /// Period within the year (1-12).
    pub period: i32,
    /// Statement the movement belongs to.
    pub statement_type: StatementType,
    /// Top-level section code.
    pub code0: String,
    /// Top-level section name.
    #[serde(default)]
    pub name0: String,
    /// Level 1 code.
    #[serde(default)]
    pub code1: Option<String>,
    /// Level 1 name.
    #[serde(default)]
    pub name1: Option<String>,
    /// Level 2 code.
    #[serde(default)]
    pub code2: Option<String>,
    /// Level 2 name.
    #[serde(default)]
    pub name2: Option<String>,
    /// Level 3 code.
    #[serde(default)]
    pub code3: Option<String>,
    /// Level 3 name.
    #[serde(default)]
    pub name3: Option<String>,
    /// Account code.
    pub account_code: String,
    /// Account description.
    #[serde(default)]
    pub account_description: String,
    /// Signed movement amount.
    pub movement_amount: Decimal,
}

/// A field value as seen by filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Textual field (codes, names, statement type).
    Text(&'a str),
    /// Numeric field (year, period, amount).
    Number(Decimal),
    /// Optional field not present on this row.
    Missing,
}

impl LedgerRow {
    /// Creates a row with only the mandatory fields set.
    #[must_use]
    pub fn new(
        year: i32,
        period: i32,
        statement_type: StatementType,
        code0: impl Into<String>,
        account_code: impl Into<String>,
        movement_amount: Decimal,
    ) -> Self {
        Self {
            year,
            period,
            statement_type,
            code0: code0.into(),
            name0: String::new(),
            code1: None,
            name1: None,
            code2: None,
            name2: None,
            code3: None,
            name3: None,
            account_code: account_code.into(),
            account_description: String::new(),
            movement_amount,
        }
    }

    /// Sets the code and name for hierarchy `level` (0-3).
    ///
    /// Levels beyond 3 are ignored.
    #[must_use]
    pub fn with_level(mut self, level: usize, code: impl Into<String>, name: impl Into<String>) -> Self {
        let (code, name) = (code.into(), name.into());
        match level {
            0 => {
                self.code0 = code;
                self.name0 = name;
            }
            1 => {
                self.code1 = Some(code);
                self.name1 = Some(name);
            }
            2 => {
                self.code2 = Some(code);
                self.name2 = Some(name);
            }
            3 => {
                self.code3 = Some(code);
                self.name3 = Some(name);
            }
            _ => {}
        }
        self
    }

    /// Sets the account description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.account_description = description.into();
        self
    }

    /// The row's fiscal period.
    #[must_use]
    pub const fn fiscal_period(&self) -> FiscalPeriod {
        FiscalPeriod::new(self.year, self.period)
    }

    /// Hierarchy code at `level`, `None` when absent or empty.
    #[must_use]
    pub fn code(&self, level: usize) -> Option<&str> {
        let code = match level {
            0 => Some(self.code0.as_str()),
            1 => self.code1.as_deref(),
            2 => self.code2.as_deref(),
            3 => self.code3.as_deref(),
            _ => None,
        };
        code.filter(|c| !c.is_empty())
    }

    /// Hierarchy name at `level`, falling back to the code when unnamed.
    #[must_use]
    pub fn name(&self, level: usize) -> Option<&str> {
        let name = match level {
            0 => Some(self.name0.as_str()),
            1 => self.name1.as_deref(),
            2 => self.name2.as_deref(),
            3 => self.name3.as_deref(),
            _ => None,
        };
        name.filter(|n| !n.is_empty()).or_else(|| self.code(level))
    }

    /// The contiguous run of present codes starting at code0.
    ///
    /// A gap truncates the path: a row with code1 missing but code2 present
    /// is placed directly under its code0 section.
    #[must_use]
    pub fn hierarchy_path(&self) -> Vec<&str> {
        (0..MAX_HIERARCHY_DEPTH)
            .map_while(|level| self.code(level))
            .collect()
    }

    /// Looks up a field by its wire name.
    ///
    /// Returns `None` for names that are not ledger fields.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        fn text(value: Option<&str>) -> FieldValue<'_> {
            value.map_or(FieldValue::Missing, FieldValue::Text)
        }

        let value = match name {
            "year" => FieldValue::Number(Decimal::from(self.year)),
            "period" => FieldValue::Number(Decimal::from(self.period)),
            "statementType" => FieldValue::Text(self.statement_type.as_str()),
            "code0" => text(self.code(0)),
            "code1" => text(self.code(1)),
            "code2" => text(self.code(2)),
            "code3" => text(self.code(3)),
            "name0" => FieldValue::Text(&self.name0),
            "name1" => text(self.name1.as_deref()),
            "name2" => text(self.name2.as_deref()),
            "name3" => text(self.name3.as_deref()),
            "accountCode" => FieldValue::Text(&self.account_code),
            "accountDescription" => FieldValue::Text(&self.account_description),
            "movementAmount" => FieldValue::Number(self.movement_amount),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> LedgerRow {
        LedgerRow::new(2025, 3, StatementType::Income, "4", "4100", dec!(250.00))
            .with_level(0, "4", "Revenue")
            .with_level(1, "41", "Product revenue")
            .with_description("Widget sales")
    }

    #[test]
    fn test_hierarchy_path_stops_at_first_gap() {
        let row = sample().with_level(3, "4111", "Orphan");
        assert_eq!(row.hierarchy_path(), vec!["4", "41"]);
    }

    #[test]
    fn test_empty_code_counts_as_missing() {
        let row = sample().with_level(2, "", "Blank");
        assert_eq!(row.code(2), None);
        assert_eq!(row.hierarchy_path().len(), 2);
    }

    #[test]
    fn test_name_falls_back_to_code() {
        let row = LedgerRow::new(2025, 1, StatementType::Balance, "1", "1000", dec!(1));
        assert_eq!(row.name(0), Some("1"));
        assert_eq!(row.name(1), None);
    }

    #[test]
    fn test_field_lookup() {
        let row = sample();
        assert_eq!(row.field("code1"), Some(FieldValue::Text("41")));
        assert_eq!(row.field("code2"), Some(FieldValue::Missing));
        assert_eq!(row.field("name1"), Some(FieldValue::Text("Product revenue")));
        assert_eq!(row.field("name3"), Some(FieldValue::Missing));
        assert_eq!(row.field("accountDescription"), Some(FieldValue::Text("Widget sales")));
        assert_eq!(row.field("year"), Some(FieldValue::Number(dec!(2025))));
        assert_eq!(row.field("statementType"), Some(FieldValue::Text("income")));
        assert_eq!(
            row.field("movementAmount"),
            Some(FieldValue::Number(dec!(250.00)))
        );
        assert_eq!(row.field("colour"), None);
    }

    #[test]
    fn test_deserialize_wire_format() {
        let json = r#"{
            "year": 2025, "period": 6, "statementType": "income",
            "code0": "4", "name0": "Revenue", "code1": "500",
            "accountCode": "5001", "movementAmount": "-12.50"
        }"#;
        let row: LedgerRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.code(1), Some("500"));
        assert_eq!(row.name(1), Some("500"));
        assert_eq!(row.movement_amount, dec!(-12.50));
        assert_eq!(row.account_description, "");
    }
}
