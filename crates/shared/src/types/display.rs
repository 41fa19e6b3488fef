//! Presentation options shared by the engine and its hosts.

use serde::{Deserialize, Serialize};

/// Which rendered rows survive post-render filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    /// Every row.
    #[default]
    Detail,
    /// Only subtotal, total and metric rows.
    Summary,
}

/// Which variance fields are exposed on rendered rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceMode {
    /// No variance fields.
    None,
    /// Variance amount only.
    Amount,
    /// Variance percent only.
    Percent,
    /// Amount and percent.
    #[default]
    Both,
}

impl VarianceMode {
    /// Returns true if the variance amount is exposed.
    #[must_use]
    pub const fn shows_amount(self) -> bool {
        matches!(self, Self::Amount | Self::Both)
    }

    /// Returns true if the variance percent is exposed.
    #[must_use]
    pub const fn shows_percent(self) -> bool {
        matches!(self, Self::Percent | Self::Both)
    }
}
