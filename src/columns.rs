use serde::{Deserialize, Serialize};

use crate::table::Table;

pub const PLOT: &str = "कित्ता नं.";
pub const VILLAGE_UNIT: &str = "साविक गा.";
pub const WARD: &str = "वडा नं.";
pub const LAND_USE: &str = "भूउपयोग क्षेत्र";

/// Header text of the four semantically significant source columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLabels {
    pub plot: String,
    pub village_unit: String,
    pub ward: String,
    pub land_use: String,
}

impl Default for ColumnLabels {
    fn default() -> Self {
        Self {
            plot: PLOT.to_string(),
            village_unit: VILLAGE_UNIT.to_string(),
            ward: WARD.to_string(),
            land_use: LAND_USE.to_string(),
        }
    }
}

impl ColumnLabels {
    /// Columns shown first in the result table.
    pub fn leading(&self) -> [&str; 3] {
        [&self.plot, &self.village_unit, &self.ward]
    }

    /// Every expected column, in diagnostic order.
    pub fn expected(&self) -> [&str; 4] {
        [&self.village_unit, &self.ward, &self.plot, &self.land_use]
    }
}

/// Expected columns absent from a loaded table, with what *is* there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub missing: Vec<String>,
    pub available: Vec<String>,
}

impl Diagnostics {
    /// `None` when every expected column is present.
    pub fn inspect(table: &Table, labels: &ColumnLabels) -> Option<Self> {
        let missing: Vec<String> = labels
            .expected()
            .iter()
            .filter(|name| !table.has_column(name))
            .map(|name| name.to_string())
            .collect();
        if missing.is_empty() {
            return None;
        }
        Some(Self {
            missing,
            available: table.column_names(),
        })
    }
}
