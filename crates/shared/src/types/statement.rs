//! Financial statement kinds.

use serde::{Deserialize, Serialize};

/// The statement a ledger row or report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementType {
    /// Income statement (profit and loss).
    Income,
    /// Balance sheet.
    Balance,
    /// Cash-flow statement.
    Cashflow,
}

impl StatementType {
    /// All statement types in display order.
    pub const ALL: [Self; 3] = [Self::Income, Self::Balance, Self::Cashflow];

    /// Returns the wire name of the statement type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Balance => "balance",
            Self::Cashflow => "cashflow",
        }
    }
}

impl std::fmt::Display for StatementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StatementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "balance" => Ok(Self::Balance),
            "cashflow" => Ok(Self::Cashflow),
            _ => Err(format!("Unknown statement type: {s}")),
        }
    }
}
