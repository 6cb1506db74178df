//! # Add-on Pricing Engine
//!
//! Turns a catalog add-on plus the line item's current inputs into a concrete
//! price, and owns the selected add-on entity ([`Addon`]) with its two edit
//! contracts:
//!
//! - **Base** editing: the user edits the rate (per sqft, percent, or per
//!   unit) and the engine derives the total.
//! - **Total** editing: the user types the dollar amount directly. The price
//!   is held in [`PriceMode::Manual`] and is never re-derived from area or
//!   rate until the user switches back to base editing.
//!
//! ## Price formulas
//!
//! | Price type          | Price                                     |
//! |---------------------|-------------------------------------------|
//! | `sqft`              | `rate × area`                             |
//! | `percent`           | `area × price_per_sqft × rate / 100`      |
//! | `unit`/`ft`/`step`  | `rate × quantity` (quantity ≥ 1)          |
//!
//! where `rate = custom ?? default ?? max ?? min`.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::catalog::catalog;
//! use quote_core::pricing::{price_addon, PricingInputs};
//!
//! let pattern = catalog()
//!     .subcategory("flooring", "tile-floor")
//!     .and_then(|s| s.addon("diagonal-pattern"))
//!     .unwrap();
//!
//! let inputs = PricingInputs::new(100.0, 5.0).with_custom_base(10.0);
//! assert_eq!(price_addon(pattern, &inputs).price, 50.0);
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{AddonType, PriceSpec, PriceType, SuggestedAddon};
use crate::units::non_negative;

/// How an add-on's price is governed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", content = "total", rename_all = "snake_case")]
pub enum PriceMode {
    /// Price follows the formula for the add-on's price type
    #[default]
    Derived,
    /// Price was typed by the user and is authoritative
    Manual(f64),
}

impl PriceMode {
    pub fn is_manual(&self) -> bool {
        matches!(self, PriceMode::Manual(_))
    }
}

/// Which value the user is editing on an area-based add-on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    /// Edit the rate; the total is derived
    Base,
    /// Edit the total directly
    Total,
}

/// Line item inputs that drive add-on prices
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PricingInputs {
    pub area: f64,
    pub price_per_sqft: f64,
    /// Quantity for unit/ft/step add-ons (defaults to 1)
    pub quantity: Option<u32>,
    /// User override of the catalog rate
    pub custom_base: Option<f64>,
    pub mode: PriceMode,
}

impl PricingInputs {
    pub fn new(area: f64, price_per_sqft: f64) -> Self {
        PricingInputs {
            area,
            price_per_sqft,
            ..Default::default()
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_custom_base(mut self, rate: f64) -> Self {
        self.custom_base = Some(rate);
        self
    }

    pub fn with_mode(mut self, mode: PriceMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Output of [`price_addon`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricedAddon {
    pub price: f64,
    /// Rate the price was derived from
    pub rate: f64,
    /// Present for quantity-based price types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

/// Rate for a catalog add-on: a valid user override, else the catalog default.
pub fn resolve_rate(pricing: &PriceSpec, custom_base: Option<f64>) -> f64 {
    match custom_base {
        Some(rate) if rate.is_finite() && rate >= 0.0 => rate,
        _ => pricing.default_rate(),
    }
}

/// Formula for one price type, clamped to a finite, non-negative value.
pub fn price_for(price_type: PriceType, rate: f64, area: f64, price_per_sqft: f64, quantity: u32) -> f64 {
    let raw = match price_type {
        PriceType::Sqft => rate * area,
        PriceType::Percent => (area * price_per_sqft * rate) / 100.0,
        PriceType::Unit | PriceType::Ft | PriceType::Step => rate * quantity.max(1) as f64,
    };
    non_negative(raw)
}

/// Price a catalog add-on for the given inputs.
///
/// Material add-ons are always priced at 0. A manual total on an area-based
/// add-on is returned as-is.
pub fn price_addon(addon: &SuggestedAddon, inputs: &PricingInputs) -> PricedAddon {
    let price_type = addon.pricing.price_type();
    let rate = resolve_rate(&addon.pricing, inputs.custom_base);
    let quantity = price_type
        .is_quantity_based()
        .then(|| inputs.quantity.unwrap_or(1).max(1));

    let price = if addon.addon_type == AddonType::Material {
        0.0
    } else {
        match inputs.mode {
            PriceMode::Manual(total) if price_type.is_area_based() => non_negative(total),
            _ => price_for(
                price_type,
                rate,
                inputs.area,
                inputs.price_per_sqft,
                quantity.unwrap_or(1),
            ),
        }
    };

    PricedAddon { price, rate, quantity }
}

/// Clamp raw quantity input to a whole number ≥ 1.
///
/// Non-numeric input (NaN), infinities and anything below 1 become 1.
pub fn sanitize_quantity(raw: f64) -> u32 {
    if !raw.is_finite() || raw < 1.0 {
        1
    } else if raw >= u32::MAX as f64 {
        u32::MAX
    } else {
        raw.floor() as u32
    }
}

// ============================================================================
// Selected add-on
// ============================================================================

/// An add-on attached to a line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Addon {
    pub id: Uuid,
    pub name: String,
    /// Price in the quote's currency, always ≥ 0
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addon_type: Option<AddonType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_type: Option<PriceType>,
    /// Rate, percent or unit price kept for later recomputation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub mode: PriceMode,
}

impl Addon {
    /// Select a catalog add-on at the line item's current area and rate.
    ///
    /// Area-based add-ons start in base-editing mode; quantity-based ones
    /// start at quantity 1.
    pub fn from_suggested(suggested: &SuggestedAddon, area: f64, price_per_sqft: f64) -> Self {
        let priced = price_addon(suggested, &PricingInputs::new(area, price_per_sqft));
        let price_type = suggested.pricing.price_type();
        Addon {
            id: Uuid::new_v4(),
            name: suggested.name.clone(),
            price: priced.price,
            addon_type: Some(suggested.addon_type),
            price_type: Some(price_type),
            base_price: Some(priced.rate),
            quantity: priced.quantity.map(f64::from),
            unit: Some(price_type.unit_label().to_string()),
            mode: PriceMode::Derived,
        }
    }

    /// Free-form add-on with a fixed price, from the custom add-on form
    pub fn custom(name: impl Into<String>, price: f64, addon_type: AddonType) -> Self {
        let price = if addon_type == AddonType::Material { 0.0 } else { non_negative(price) };
        Addon {
            id: Uuid::new_v4(),
            name: name.into(),
            price,
            addon_type: Some(addon_type),
            price_type: None,
            base_price: None,
            quantity: None,
            unit: None,
            mode: PriceMode::Derived,
        }
    }

    /// Free-form add-on priced by a rate, from the custom add-on form
    pub fn custom_rated(
        name: impl Into<String>,
        price_type: PriceType,
        rate: f64,
        area: f64,
        price_per_sqft: f64,
    ) -> Self {
        let rate = non_negative(rate);
        let quantity = price_type.is_quantity_based().then_some(1.0);
        Addon {
            id: Uuid::new_v4(),
            name: name.into(),
            price: price_for(price_type, rate, area, price_per_sqft, 1),
            addon_type: Some(AddonType::General),
            price_type: Some(price_type),
            base_price: Some(rate),
            quantity,
            unit: Some(price_type.unit_label().to_string()),
            mode: PriceMode::Derived,
        }
    }

    /// Zero-priced material entry tracked for quantity only
    pub fn material(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Addon {
            id: Uuid::new_v4(),
            name: name.into(),
            price: 0.0,
            addon_type: Some(AddonType::Material),
            price_type: None,
            base_price: None,
            quantity: Some(non_negative(quantity)),
            unit: Some(unit.into()),
            mode: PriceMode::Derived,
        }
    }

    pub fn is_material(&self) -> bool {
        self.addon_type == Some(AddonType::Material)
    }

    /// True for sqft/percent add-ons
    pub fn is_area_based(&self) -> bool {
        self.price_type.is_some_and(|p| p.is_area_based())
    }

    /// Name with any parenthesized suffix removed, e.g. "Thinset (2 bags)" → "Thinset"
    pub fn base_name(&self) -> &str {
        base_name(&self.name)
    }

    /// Edit mode for area-based add-ons; `None` for everything else
    pub fn edit_mode(&self) -> Option<EditMode> {
        if !self.is_area_based() {
            return None;
        }
        Some(if self.mode.is_manual() { EditMode::Total } else { EditMode::Base })
    }

    fn quantity_or_one(&self) -> u32 {
        self.quantity.map_or(1, sanitize_quantity)
    }

    /// Whether a change of area or price per sqft should re-run this add-on's price.
    pub fn tracks_line_inputs(&self) -> bool {
        self.is_material()
            || self.is_area_based()
            || (self.price_type.is_some() && self.base_price.is_some())
    }

    /// Price this add-on would have at the given line inputs.
    pub fn reprice(&self, area: f64, price_per_sqft: f64) -> f64 {
        if self.is_material() {
            return 0.0;
        }
        if let PriceMode::Manual(total) = self.mode {
            return non_negative(total);
        }
        match (self.price_type, self.base_price) {
            (Some(price_type), Some(rate)) => {
                price_for(price_type, rate, area, price_per_sqft, self.quantity_or_one())
            }
            _ => self.price,
        }
    }

    /// Switch between base-rate and total editing.
    ///
    /// Going to `Total` freezes the current price. Going back to `Base`
    /// re-derives the price from the stored rate.
    pub fn set_edit_mode(&mut self, mode: EditMode, area: f64, price_per_sqft: f64) {
        if !self.is_area_based() {
            return;
        }
        match mode {
            EditMode::Total => {
                if !self.mode.is_manual() {
                    self.mode = PriceMode::Manual(self.price);
                    tracing::debug!(addon = %self.name, price = self.price, "add-on total frozen");
                }
            }
            EditMode::Base => {
                self.mode = PriceMode::Derived;
                self.price = self.reprice(area, price_per_sqft);
            }
        }
    }

    /// User typed a total.
    ///
    /// Area-based add-ons move to manual mode and keep the total. Quantity
    /// based add-ons keep their quantity and back out the unit price.
    pub fn set_manual_total(&mut self, total: f64) {
        let total = non_negative(total);
        if self.is_material() {
            return;
        }
        if self.is_area_based() {
            self.mode = PriceMode::Manual(total);
        } else if self.price_type.is_some() {
            self.base_price = Some(total / self.quantity_or_one() as f64);
        }
        self.price = total;
    }

    /// User typed a rate (per sqft, percent, or per unit).
    ///
    /// Leaves manual mode and re-derives the price.
    pub fn set_base_rate(&mut self, rate: f64, area: f64, price_per_sqft: f64) {
        if self.price_type.is_none() {
            return;
        }
        self.base_price = Some(non_negative(rate));
        self.mode = PriceMode::Derived;
        self.price = self.reprice(area, price_per_sqft);
    }

    /// User changed the quantity of a unit/ft/step add-on.
    ///
    /// Malformed input clamps to 1.
    pub fn set_quantity(&mut self, raw: f64) {
        if self.is_material() {
            self.quantity = Some(non_negative(raw));
            return;
        }
        if self.is_area_based() {
            return;
        }
        self.quantity = Some(sanitize_quantity(raw) as f64);
        if let (Some(price_type), Some(rate)) = (self.price_type, self.base_price) {
            self.price = price_for(price_type, rate, 0.0, 0.0, self.quantity_or_one());
        }
    }
}

/// Text before the first `(`, trimmed
pub fn base_name(name: &str) -> &str {
    name.split('(').next().unwrap_or(name).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{catalog, PriceRange};

    fn suggested(category: &str, sub: &str, id: &str) -> &'static SuggestedAddon {
        catalog().subcategory(category, sub).and_then(|s| s.addon(id)).unwrap()
    }

    #[test]
    fn test_percent_price() {
        let pattern = suggested("flooring", "tile-floor", "diagonal-pattern");
        let inputs = PricingInputs::new(100.0, 5.0).with_custom_base(10.0);
        let priced = price_addon(pattern, &inputs);
        assert_eq!(priced.price, 50.0);
        assert_eq!(priced.quantity, None);
    }

    #[test]
    fn test_sqft_price_prefers_range_max() {
        let demo = suggested("flooring", "tile-floor", "floor-demo");
        let priced = price_addon(demo, &PricingInputs::new(100.0, 6.0));
        assert_eq!(priced.rate, 3.0);
        assert_eq!(priced.price, 300.0);
    }

    #[test]
    fn test_fixed_price_uses_min() {
        let grab_bar = suggested("bathroom", "shower-walls", "grab-bar");
        let priced = price_addon(grab_bar, &PricingInputs::new(50.0, 12.0).with_quantity(2));
        assert_eq!(priced.rate, 75.0);
        assert_eq!(priced.price, 150.0);
        assert_eq!(priced.quantity, Some(2));
    }

    #[test]
    fn test_quantity_types_default_to_one() {
        let niche = suggested("bathroom", "shower-walls", "shower-niche");
        let priced = price_addon(niche, &PricingInputs::new(500.0, 12.0));
        assert_eq!(priced.quantity, Some(1));
        assert_eq!(priced.price, 300.0);

        let zero_qty = price_addon(niche, &PricingInputs::new(500.0, 12.0).with_quantity(0));
        assert_eq!(zero_qty.quantity, Some(1));
    }

    #[test]
    fn test_material_addons_are_free() {
        let sealer = suggested("flooring", "tile-floor", "grout-sealer");
        let priced = price_addon(sealer, &PricingInputs::new(100.0, 6.0).with_quantity(3));
        assert_eq!(priced.price, 0.0);
        assert_eq!(priced.quantity, Some(3));
    }

    #[test]
    fn test_manual_mode_is_authoritative_for_area_types() {
        let demo = suggested("flooring", "tile-floor", "floor-demo");
        let inputs = PricingInputs::new(100.0, 6.0).with_mode(PriceMode::Manual(200.0));
        assert_eq!(price_addon(demo, &inputs).price, 200.0);
    }

    #[test]
    fn test_invalid_override_falls_back_to_default() {
        let spec = PriceSpec::Sqft(PriceRange::between(1.0, 2.0));
        assert_eq!(resolve_rate(&spec, Some(f64::NAN)), 2.0);
        assert_eq!(resolve_rate(&spec, Some(-1.0)), 2.0);
        assert_eq!(resolve_rate(&spec, Some(0.0)), 0.0);
    }

    #[test]
    fn test_negative_inputs_clamp_to_zero() {
        assert_eq!(price_for(PriceType::Sqft, 2.0, -10.0, 0.0, 1), 0.0);
        assert_eq!(price_for(PriceType::Percent, 10.0, 100.0, f64::NAN, 1), 0.0);
    }

    #[test]
    fn test_sanitize_quantity() {
        assert_eq!(sanitize_quantity(f64::NAN), 1);
        assert_eq!(sanitize_quantity(0.0), 1);
        assert_eq!(sanitize_quantity(-4.0), 1);
        assert_eq!(sanitize_quantity(3.7), 3);
        assert_eq!(sanitize_quantity(12.0), 12);
    }

    #[test]
    fn test_selecting_initializes_addon() {
        let demo = Addon::from_suggested(suggested("flooring", "tile-floor", "floor-demo"), 80.0, 6.0);
        assert_eq!(demo.price, 240.0);
        assert_eq!(demo.base_price, Some(3.0));
        assert_eq!(demo.edit_mode(), Some(EditMode::Base));
        assert_eq!(demo.quantity, None);

        let threshold = Addon::from_suggested(suggested("flooring", "tile-floor", "threshold"), 80.0, 6.0);
        assert_eq!(threshold.price, 60.0);
        assert_eq!(threshold.quantity, Some(1.0));
        assert_eq!(threshold.edit_mode(), None);
    }

    #[test]
    fn test_total_mode_survives_area_change() {
        let mut demo = Addon::from_suggested(suggested("flooring", "tile-floor", "floor-demo"), 100.0, 6.0);
        demo.set_edit_mode(EditMode::Total, 100.0, 6.0);
        demo.set_manual_total(200.0);
        assert_eq!(demo.reprice(150.0, 6.0), 200.0);
        assert_eq!(demo.base_price, Some(3.0));

        demo.set_edit_mode(EditMode::Base, 150.0, 6.0);
        assert_eq!(demo.price, 450.0);
        assert_eq!(demo.mode, PriceMode::Derived);
    }

    #[test]
    fn test_set_base_rate_leaves_manual_mode() {
        let mut demo = Addon::from_suggested(suggested("flooring", "tile-floor", "floor-demo"), 100.0, 6.0);
        demo.set_manual_total(999.0);
        assert_eq!(demo.edit_mode(), Some(EditMode::Total));
        demo.set_base_rate(2.0, 100.0, 6.0);
        assert_eq!(demo.price, 200.0);
        assert_eq!(demo.edit_mode(), Some(EditMode::Base));
    }

    #[test]
    fn test_set_quantity() {
        let mut niche = Addon::from_suggested(suggested("bathroom", "shower-walls", "shower-niche"), 60.0, 12.0);
        niche.set_quantity(3.0);
        assert_eq!(niche.price, 900.0);
        niche.set_quantity(f64::NAN);
        assert_eq!(niche.quantity, Some(1.0));
        assert_eq!(niche.price, 300.0);
    }

    #[test]
    fn test_manual_total_on_unit_addon_backs_out_rate() {
        let mut niche = Addon::from_suggested(suggested("bathroom", "shower-walls", "shower-niche"), 60.0, 12.0);
        niche.set_quantity(2.0);
        niche.set_manual_total(500.0);
        assert_eq!(niche.base_price, Some(250.0));
        assert_eq!(niche.reprice(10.0, 1.0), 500.0);
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("Thinset (2 bags)"), "Thinset");
        assert_eq!(base_name("  Grout Sealer  "), "Grout Sealer");
        assert_eq!(base_name("(odd)"), "");
        assert_eq!(base_name("Tile (110 pieces) (extra)"), "Tile");
    }

    #[test]
    fn test_price_mode_serialization() {
        let json = serde_json::to_string(&PriceMode::Manual(200.0)).unwrap();
        assert_eq!(json, r#"{"mode":"manual","total":200.0}"#);
        let json = serde_json::to_string(&PriceMode::Derived).unwrap();
        assert_eq!(json, r#"{"mode":"derived"}"#);
    }

    #[test]
    fn test_custom_addons() {
        let custom = Addon::custom("Haul-away", 120.0, AddonType::General);
        assert!(!custom.tracks_line_inputs());
        assert_eq!(custom.reprice(1000.0, 50.0), 120.0);

        let rated = Addon::custom_rated("Sealing", PriceType::Sqft, 0.5, 200.0, 4.0);
        assert_eq!(rated.price, 100.0);
        assert!(rated.tracks_line_inputs());
    }
}
