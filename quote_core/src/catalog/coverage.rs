//! Material Coverage
//!
//! How much one purchasable unit of a non-tile material covers, and what it
//! costs. Discrete units (bags, boxes, tubes, gallons) round up to whole
//! units; underlayment is sold by the square foot and passes through as-is.

use serde::{Deserialize, Serialize};

use crate::units::ceil_units;

/// How an input quantity converts to purchasable units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageFormula {
    /// `ceil(input / coverage)`
    CeilPerUnit,
    /// Input is already in purchasable units
    Identity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCoverage {
    pub id: String,
    pub name: String,
    /// Quantity one unit covers (sqft, lb or linear ft depending on material)
    pub coverage: f64,
    pub price_per_unit: f64,
    pub unit: String,
    pub formula: CoverageFormula,
}

impl MaterialCoverage {
    /// Convert an input quantity into purchasable units.
    ///
    /// Returns 0 for non-positive input or non-positive coverage.
    pub fn quantity(&self, input: f64) -> f64 {
        if !input.is_finite() || input <= 0.0 {
            return 0.0;
        }
        match self.formula {
            CoverageFormula::Identity => input,
            CoverageFormula::CeilPerUnit => {
                if self.coverage <= 0.0 {
                    0.0
                } else {
                    ceil_units(input / self.coverage)
                }
            }
        }
    }

    /// Cost of the units needed for `input`
    pub fn cost(&self, input: f64) -> f64 {
        self.quantity(input) * self.price_per_unit
    }

    /// Unit label pluralized for a quantity, e.g. "bag" / "bags"
    pub fn unit_label(&self, quantity: f64) -> String {
        if self.formula == CoverageFormula::Identity || quantity == 1.0 {
            self.unit.clone()
        } else {
            format!("{}s", self.unit)
        }
    }
}

struct CoverageRow(&'static str, &'static str, f64, f64, &'static str, CoverageFormula);

const COVERAGE_ROWS: [CoverageRow; 13] = [
    CoverageRow("vinyl-plank-box", "Vinyl Plank", 20.0, 45.0, "box", CoverageFormula::CeilPerUnit),
    CoverageRow("laminate-box", "Laminate", 22.0, 38.0, "box", CoverageFormula::CeilPerUnit),
    CoverageRow("thinset-bag", "Thinset", 50.0, 22.0, "bag", CoverageFormula::CeilPerUnit),
    CoverageRow("grout-bag", "Grout", 25.0, 28.0, "bag", CoverageFormula::CeilPerUnit),
    CoverageRow("silicone-tube", "Silicone", 25.0, 9.0, "tube", CoverageFormula::CeilPerUnit),
    CoverageRow("underlayment", "Underlayment", 1.0, 0.5, "sqft", CoverageFormula::Identity),
    CoverageRow("paint-gallon", "Paint", 350.0, 45.0, "gallon", CoverageFormula::CeilPerUnit),
    CoverageRow("primer-gallon", "Primer", 300.0, 30.0, "gallon", CoverageFormula::CeilPerUnit),
    CoverageRow("drywall-mud", "Drywall Mud", 200.0, 18.0, "bucket", CoverageFormula::CeilPerUnit),
    CoverageRow("drywall-tape", "Drywall Tape", 250.0, 6.0, "roll", CoverageFormula::CeilPerUnit),
    CoverageRow("drywall-sheet", "Drywall Sheet", 32.0, 16.0, "sheet", CoverageFormula::CeilPerUnit),
    CoverageRow("sealer", "Grout Sealer", 150.0, 20.0, "bottle", CoverageFormula::CeilPerUnit),
    CoverageRow("trim-piece", "Trim", 8.0, 12.0, "piece", CoverageFormula::CeilPerUnit),
];

pub(crate) fn builtin_coverage() -> Vec<MaterialCoverage> {
    COVERAGE_ROWS
        .iter()
        .map(|CoverageRow(id, name, coverage, price, unit, formula)| MaterialCoverage {
            id: id.to_string(),
            name: name.to_string(),
            coverage: *coverage,
            price_per_unit: *price,
            unit: unit.to_string(),
            formula: *formula,
        })
        .collect()
}
