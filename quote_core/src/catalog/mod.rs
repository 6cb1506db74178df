//! # Catalog
//!
//! Static reference data for quoting: categories → subcategories → suggested
//! add-ons, the tile-size table, and the material-coverage table.
//!
//! The catalog is built once on first access and never mutated afterwards.
//! Everything else in the crate refers to entries by their string id.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::catalog::{catalog, PriceType};
//!
//! let sub = catalog().subcategory("bathroom", "shower-walls").unwrap();
//! assert!(sub.requires_tile_size);
//!
//! let niche = sub.addon("shower-niche").unwrap();
//! assert_eq!(niche.pricing.price_type(), PriceType::Unit);
//! ```

pub mod categories;
pub mod coverage;
pub mod tile_sizes;

pub use coverage::{CoverageFormula, MaterialCoverage};
pub use tile_sizes::{TileCategory, TileSize};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{QuoteError, QuoteResult};

/// Subcategory id that opens the free-form custom add-on form instead of
/// the suggestion list.
pub const OTHERS_SUBCATEGORY_ID: &str = "others";

static CATALOG: Lazy<Catalog> = Lazy::new(Catalog::builtin);

/// The process-wide catalog.
pub fn catalog() -> &'static Catalog {
    &CATALOG
}

// ============================================================================
// Price types
// ============================================================================

/// How a suggested add-on is priced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    /// Rate per square foot of the line item's area
    Sqft,
    /// Rate per unit (each)
    Unit,
    /// Rate per linear foot
    Ft,
    /// Rate per stair step
    Step,
    /// Percentage of the line item's base amount
    Percent,
}

impl PriceType {
    /// All price types for UI selection
    pub const ALL: [PriceType; 5] = [
        PriceType::Sqft,
        PriceType::Unit,
        PriceType::Ft,
        PriceType::Step,
        PriceType::Percent,
    ];

    /// Price types whose total is derived from the line item's area/rate.
    pub fn is_area_based(&self) -> bool {
        matches!(self, PriceType::Sqft | PriceType::Percent)
    }

    /// Price types priced as rate × user-entered quantity.
    pub fn is_quantity_based(&self) -> bool {
        !self.is_area_based()
    }

    /// Short unit label shown next to the rate
    pub fn unit_label(&self) -> &'static str {
        match self {
            PriceType::Sqft => "sqft",
            PriceType::Unit => "unit",
            PriceType::Ft => "ft",
            PriceType::Step => "step",
            PriceType::Percent => "%",
        }
    }
}

impl std::fmt::Display for PriceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.unit_label())
    }
}

/// What kind of thing an add-on represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddonType {
    /// Physical material; tracked for quantity only, never priced into the line
    Material,
    /// Labor service (demolition, leveling, ...)
    Service,
    /// Complexity surcharge (patterns, high ceilings, ...)
    Complexity,
    /// Anything else
    General,
}

/// Price range of a catalog add-on.
///
/// `min` is always present. A missing `max` means a fixed-price add-on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<f64>,
}

impl PriceRange {
    /// Fixed single-value price
    pub const fn fixed(value: f64) -> Self {
        PriceRange { min: value, max: None, default: None }
    }

    /// Price between `min` and `max`
    pub const fn between(min: f64, max: f64) -> Self {
        PriceRange { min, max: Some(max), default: None }
    }

    /// Set an explicit default rate
    pub const fn with_default(mut self, default: f64) -> Self {
        self.default = Some(default);
        self
    }

    /// Rate used when the user has not chosen one.
    ///
    /// Prefers the explicit default, then the top of the range, then the
    /// minimum.
    pub fn default_rate(&self) -> f64 {
        self.default.or(self.max).unwrap_or(self.min)
    }
}

/// Pricing of a catalog add-on, one variant per price type.
///
/// ```json
/// { "price_type": "sqft", "range": { "min": 1.5, "max": 3.0 } }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "price_type", content = "range", rename_all = "lowercase")]
pub enum PriceSpec {
    Sqft(PriceRange),
    Unit(PriceRange),
    Ft(PriceRange),
    Step(PriceRange),
    Percent(PriceRange),
}

impl PriceSpec {
    pub fn price_type(&self) -> PriceType {
        match self {
            PriceSpec::Sqft(_) => PriceType::Sqft,
            PriceSpec::Unit(_) => PriceType::Unit,
            PriceSpec::Ft(_) => PriceType::Ft,
            PriceSpec::Step(_) => PriceType::Step,
            PriceSpec::Percent(_) => PriceType::Percent,
        }
    }

    pub fn range(&self) -> &PriceRange {
        match self {
            PriceSpec::Sqft(r)
            | PriceSpec::Unit(r)
            | PriceSpec::Ft(r)
            | PriceSpec::Step(r)
            | PriceSpec::Percent(r) => r,
        }
    }

    pub fn default_rate(&self) -> f64 {
        self.range().default_rate()
    }
}

// ============================================================================
// Category tree
// ============================================================================

/// Which material estimate applies to a subcategory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    TileFloor,
    TileWall,
    Backsplash,
    VinylPlank,
    Laminate,
    Paint,
    Drywall,
}

/// Catalog template for an add-on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedAddon {
    pub id: String,
    pub name: String,
    pub pricing: PriceSpec,
    pub addon_type: AddonType,
}

impl SuggestedAddon {
    pub fn new(id: &str, name: &str, pricing: PriceSpec, addon_type: AddonType) -> Self {
        SuggestedAddon {
            id: id.to_string(),
            name: name.to_string(),
            pricing,
            addon_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: String,
    pub name: String,
    pub addons: Vec<SuggestedAddon>,
    #[serde(default)]
    pub requires_tile_size: bool,
    /// Rate mirrored into the line item's price per sqft when chosen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_price_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_kind: Option<MaterialKind>,
}

impl Subcategory {
    /// Find a suggested add-on by id
    pub fn addon(&self, addon_id: &str) -> Option<&SuggestedAddon> {
        self.addons.iter().find(|a| a.id == addon_id)
    }

    /// True for the sentinel subcategory that opens the custom add-on form
    pub fn is_others(&self) -> bool {
        self.id == OTHERS_SUBCATEGORY_ID
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub subcategories: Vec<Subcategory>,
}

impl Category {
    pub fn subcategory(&self, subcategory_id: &str) -> Option<&Subcategory> {
        self.subcategories.iter().find(|s| s.id == subcategory_id)
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Immutable reference tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub tile_sizes: Vec<TileSize>,
    pub coverage: Vec<MaterialCoverage>,
}

impl Catalog {
    /// Built-in catalog data
    pub fn builtin() -> Self {
        Catalog {
            categories: categories::builtin_categories(),
            tile_sizes: tile_sizes::builtin_tile_sizes(),
            coverage: coverage::builtin_coverage(),
        }
    }

    pub fn category(&self, category_id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    pub fn subcategory(&self, category_id: &str, subcategory_id: &str) -> Option<&Subcategory> {
        self.category(category_id)?.subcategory(subcategory_id)
    }

    /// Find a subcategory by id alone, across all categories.
    pub fn find_subcategory(&self, subcategory_id: &str) -> Option<(&Category, &Subcategory)> {
        // "others" exists in every category and is ambiguous on its own
        if subcategory_id == OTHERS_SUBCATEGORY_ID {
            return None;
        }
        self.categories
            .iter()
            .find_map(|c| c.subcategory(subcategory_id).map(|s| (c, s)))
    }

    pub fn tile_size(&self, tile_size_id: &str) -> Option<&TileSize> {
        self.tile_sizes.iter().find(|t| t.id == tile_size_id)
    }

    pub fn coverage(&self, coverage_id: &str) -> Option<&MaterialCoverage> {
        self.coverage.iter().find(|c| c.id == coverage_id)
    }

    /// Category lookup that reports a missing id as an error
    pub fn require_category(&self, category_id: &str) -> QuoteResult<&Category> {
        self.category(category_id)
            .ok_or_else(|| QuoteError::catalog_not_found("category", category_id))
    }

    /// Subcategory lookup that reports a missing id as an error
    pub fn require_subcategory(&self, category_id: &str, subcategory_id: &str) -> QuoteResult<&Subcategory> {
        self.require_category(category_id)?
            .subcategory(subcategory_id)
            .ok_or_else(|| QuoteError::catalog_not_found("subcategory", subcategory_id))
    }

    /// Tile size lookup that reports a missing id as an error
    pub fn require_tile_size(&self, tile_size_id: &str) -> QuoteResult<&TileSize> {
        self.tile_size(tile_size_id)
            .ok_or_else(|| QuoteError::catalog_not_found("tile size", tile_size_id))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rate_prefers_max() {
        assert_eq!(PriceRange::between(1.5, 3.0).default_rate(), 3.0);
        assert_eq!(PriceRange::fixed(75.0).default_rate(), 75.0);
        assert_eq!(PriceRange::between(1.5, 3.0).with_default(2.0).default_rate(), 2.0);
    }

    #[test]
    fn test_price_spec_serialization() {
        let spec = PriceSpec::Percent(PriceRange::between(10.0, 20.0));
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#"{"price_type":"percent","range":{"min":10.0,"max":20.0}}"#);
        let parsed: PriceSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, spec);
        assert_eq!(parsed.price_type(), PriceType::Percent);
    }

    #[test]
    fn test_every_category_has_others() {
        for category in &catalog().categories {
            let others = category.subcategory(OTHERS_SUBCATEGORY_ID);
            assert!(others.is_some(), "{} has no 'others' subcategory", category.id);
            assert!(others.unwrap().addons.is_empty());
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let cat = catalog();
        for category in &cat.categories {
            let count = cat.categories.iter().filter(|c| c.id == category.id).count();
            assert_eq!(count, 1, "duplicate category {}", category.id);
            for sub in &category.subcategories {
                for addon in &sub.addons {
                    let n = sub.addons.iter().filter(|a| a.id == addon.id).count();
                    assert_eq!(n, 1, "duplicate add-on {} in {}", addon.id, sub.id);
                }
            }
        }
        for tile in &cat.tile_sizes {
            assert_eq!(cat.tile_sizes.iter().filter(|t| t.id == tile.id).count(), 1);
        }
    }

    #[test]
    fn test_tile_subcategories_have_material_kind() {
        for category in &catalog().categories {
            for sub in &category.subcategories {
                if sub.requires_tile_size {
                    assert!(sub.material_kind.is_some(), "{} needs a material kind", sub.id);
                }
            }
        }
    }

    #[test]
    fn test_lookups() {
        let cat = catalog();
        assert!(cat.category("flooring").is_some());
        assert!(cat.category("roofing").is_none());
        assert!(cat.tile_size("12x24").is_some());
        assert!(cat.coverage("thinset-bag").is_some());

        let (category, sub) = cat.find_subcategory("backsplash").unwrap();
        assert_eq!(category.id, "kitchen");
        assert_eq!(sub.base_price, Some(15.0));
        assert!(cat.find_subcategory(OTHERS_SUBCATEGORY_ID).is_none());

        let err = cat.require_subcategory("flooring", "pool-deck").unwrap_err();
        assert_eq!(err.error_code(), "CATALOG_NOT_FOUND");
    }

    #[test]
    fn test_min_never_exceeds_max() {
        for category in &catalog().categories {
            for sub in &category.subcategories {
                for addon in &sub.addons {
                    let range = addon.pricing.range();
                    if let Some(max) = range.max {
                        assert!(range.min <= max, "{} has min > max", addon.id);
                    }
                }
            }
        }
    }
}
