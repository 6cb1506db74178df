//! # Line Items
//!
//! A [`QuoteItem`] is one priced unit of work ("Bathroom Floor"): an area, a
//! rate per sqft, and the add-ons attached to it. This module keeps the line
//! total consistent with those inputs:
//!
//! ```text
//! line_total = area × price_per_sqft + Σ price(non-material add-ons)
//! ```
//!
//! Material add-ons are carried for the bill of materials and contribute
//! nothing to the line total.
//!
//! ## Category attachment
//!
//! ```text
//! Empty ──► CategorySelected ──► SubcategorySelected ──► Populated
//!                 ▲                                          │
//!                 └──────── confirmed category change ───────┘
//! ```
//!
//! Once any add-on exists the category and subcategory are locked: changing
//! either discards every add-on and so requires explicit confirmation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{catalog, SuggestedAddon};
use crate::errors::{QuoteError, QuoteResult};
use crate::materials::{estimate_for_subcategory, material_names};
use crate::pricing::{Addon, EditMode};
use crate::units::non_negative;

/// Where a line item is in the category/subcategory flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentState {
    Empty,
    CategorySelected,
    SubcategorySelected,
    /// At least one add-on attached; category is locked
    Populated,
}

/// Outcome of [`QuoteItem::select_category`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryChange {
    Applied,
    /// Already the selected category
    Unchanged,
    /// Add-ons exist; nothing changed, ask the user and retry with confirmation
    NeedsConfirmation,
}

/// What the UI should show after a subcategory is chosen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "prompt", rename_all = "snake_case")]
pub enum SubcategoryPrompt {
    /// Suggestion popup with the subcategory's catalog add-ons
    Suggestions {
        addons: Vec<SuggestedAddon>,
        requires_tile_size: bool,
    },
    /// Simple form for a free-form add-on ("others" subcategory)
    CustomAddonForm,
    /// Add-ons exist under another subcategory; nothing changed, ask the
    /// user and retry with confirmation
    NeedsConfirmation,
}

/// Edit applied to one add-on of a line item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "edit", content = "value", rename_all = "snake_case")]
pub enum AddonEdit {
    EditMode(EditMode),
    ManualTotal(f64),
    BaseRate(f64),
    Quantity(f64),
}

/// One line of a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteItem {
    pub id: Uuid,
    pub item_name: String,
    /// Area in sqft
    pub area: f64,
    pub price_per_sqft: f64,
    /// Derived; kept in sync by every mutating method
    pub line_total: f64,
    #[serde(default)]
    pub addons: Vec<Addon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_size_id: Option<String>,
}

impl QuoteItem {
    pub fn new(item_name: impl Into<String>) -> Self {
        QuoteItem {
            id: Uuid::new_v4(),
            item_name: item_name.into(),
            area: 0.0,
            price_per_sqft: 0.0,
            line_total: 0.0,
            addons: Vec::new(),
            category_id: None,
            subcategory_id: None,
            tile_size_id: None,
        }
    }

    /// Builder-style area and rate, with the line total computed
    pub fn with_area(mut self, area: f64, price_per_sqft: f64) -> Self {
        self.area = non_negative(area);
        self.price_per_sqft = non_negative(price_per_sqft);
        self.line_total = self.compute_line_total();
        self
    }

    /// `area × price_per_sqft`
    pub fn base_amount(&self) -> f64 {
        non_negative(self.area) * non_negative(self.price_per_sqft)
    }

    /// Sum of non-material add-on prices
    pub fn addons_total(&self) -> f64 {
        self.addons
            .iter()
            .filter(|a| !a.is_material())
            .map(|a| non_negative(a.price))
            .sum()
    }

    pub fn compute_line_total(&self) -> f64 {
        self.base_amount() + self.addons_total()
    }

    /// Material add-ons, for the bill of materials
    pub fn materials(&self) -> impl Iterator<Item = &Addon> {
        self.addons.iter().filter(|a| a.is_material())
    }

    pub fn attachment_state(&self) -> AttachmentState {
        if !self.addons.is_empty() {
            return AttachmentState::Populated;
        }
        match (&self.category_id, &self.subcategory_id) {
            (None, _) => AttachmentState::Empty,
            (Some(_), None) => AttachmentState::CategorySelected,
            (Some(_), Some(_)) => AttachmentState::SubcategorySelected,
        }
    }

    // ------------------------------------------------------------------
    // Add-ons
    // ------------------------------------------------------------------

    fn duplicate_index(&self, addon: &Addon) -> Option<usize> {
        self.addons.iter().position(|existing| is_duplicate(existing, addon))
    }

    /// Append an add-on, replacing any duplicate of it.
    ///
    /// Returns the add-on that was replaced, if any.
    pub fn add_addon(&mut self, addon: Addon) -> Option<Addon> {
        let replaced = self.duplicate_index(&addon).map(|i| self.addons.remove(i));
        if let Some(old) = &replaced {
            tracing::debug!(item = %self.item_name, old = %old.name, new = %addon.name, "add-on replaced");
        }
        self.addons.push(addon);
        self.line_total = self.compute_line_total();
        replaced
    }

    pub fn remove_addon(&mut self, addon_id: Uuid) -> Option<Addon> {
        let index = self.addons.iter().position(|a| a.id == addon_id)?;
        let removed = self.addons.remove(index);
        self.line_total = self.compute_line_total();
        Some(removed)
    }

    /// Check or uncheck a suggested add-on.
    ///
    /// Checking prices it at the current area and rate. Unchecking removes
    /// whatever checking it would have replaced, under the same dedup rule.
    pub fn toggle_suggested_addon(&mut self, suggested: &SuggestedAddon, checked: bool) {
        let candidate = Addon::from_suggested(suggested, self.area, self.price_per_sqft);
        if checked {
            self.add_addon(candidate);
        } else {
            self.addons.retain(|a| !is_duplicate(a, &candidate));
            self.line_total = self.compute_line_total();
        }
    }

    /// Apply an edit to one add-on and refresh the line total.
    pub fn edit_addon(&mut self, addon_id: Uuid, edit: AddonEdit) -> QuoteResult<()> {
        let (area, price_per_sqft) = (self.area, self.price_per_sqft);
        let addon = self
            .addons
            .iter_mut()
            .find(|a| a.id == addon_id)
            .ok_or_else(|| QuoteError::addon_not_found(addon_id))?;

        match edit {
            AddonEdit::EditMode(mode) => addon.set_edit_mode(mode, area, price_per_sqft),
            AddonEdit::ManualTotal(total) => addon.set_manual_total(total),
            AddonEdit::BaseRate(rate) => addon.set_base_rate(rate, area, price_per_sqft),
            AddonEdit::Quantity(quantity) => addon.set_quantity(quantity),
        }
        self.line_total = self.compute_line_total();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------

    /// Change the area and re-price dependent add-ons.
    ///
    /// An area of 0 with no add-ons clears the category selection. With
    /// add-ons present the selection is kept.
    pub fn set_area(&mut self, area: f64) {
        self.area = non_negative(area);
        if self.area == 0.0 && self.addons.is_empty() && self.category_id.is_some() {
            tracing::debug!(item = %self.item_name, "area cleared, dropping category selection");
            self.clear_category();
        }
        self.refresh_addon_prices();
    }

    pub fn set_price_per_sqft(&mut self, price_per_sqft: f64) {
        self.price_per_sqft = non_negative(price_per_sqft);
        self.refresh_addon_prices();
    }

    /// Re-price every add-on that follows area or rate, then the line total.
    ///
    /// Only add-ons whose price actually changes are replaced. Returns how
    /// many changed.
    pub fn refresh_addon_prices(&mut self) -> usize {
        let (area, price_per_sqft) = (self.area, self.price_per_sqft);
        let mut changed = 0;
        for addon in self.addons.iter_mut().filter(|a| a.tracks_line_inputs()) {
            let price = addon.reprice(area, price_per_sqft);
            if price != addon.price {
                addon.price = price;
                changed += 1;
            }
        }
        self.line_total = self.compute_line_total();
        if changed > 0 {
            tracing::trace!(item = %self.item_name, changed, "add-on prices refreshed");
        }
        changed
    }

    // ------------------------------------------------------------------
    // Category / subcategory
    // ------------------------------------------------------------------

    fn clear_category(&mut self) {
        self.category_id = None;
        self.subcategory_id = None;
        self.tile_size_id = None;
    }

    fn require_area(&self) -> QuoteResult<()> {
        if self.area > 0.0 {
            Ok(())
        } else {
            Err(QuoteError::invalid_input(
                "area",
                self.area.to_string(),
                "Area must be positive before choosing a category",
            ))
        }
    }

    /// Choose a category.
    ///
    /// With add-ons present the change is destructive: without `confirmed`
    /// nothing happens and [`CategoryChange::NeedsConfirmation`] is returned;
    /// with it, every add-on is discarded and the subcategory reset.
    pub fn select_category(&mut self, category_id: &str, confirmed: bool) -> QuoteResult<CategoryChange> {
        self.require_area()?;
        catalog().require_category(category_id)?;

        if self.category_id.as_deref() == Some(category_id) {
            return Ok(CategoryChange::Unchanged);
        }
        if !self.addons.is_empty() {
            if !confirmed {
                return Ok(CategoryChange::NeedsConfirmation);
            }
            tracing::debug!(
                item = %self.item_name,
                discarded = self.addons.len(),
                "category changed, add-ons discarded"
            );
            self.addons.clear();
        }

        self.clear_category();
        self.category_id = Some(category_id.to_string());
        self.line_total = self.compute_line_total();
        Ok(CategoryChange::Applied)
    }

    /// Choose a subcategory of the selected category.
    ///
    /// A subcategory base price is mirrored into `price_per_sqft`. Switching
    /// away from a subcategory that has add-ons follows the same lock as
    /// [`QuoteItem::select_category`]: without `confirmed` nothing changes and
    /// [`SubcategoryPrompt::NeedsConfirmation`] is returned; with it, every
    /// add-on is discarded.
    pub fn select_subcategory(&mut self, subcategory_id: &str, confirmed: bool) -> QuoteResult<SubcategoryPrompt> {
        self.require_area()?;
        let category_id = self
            .category_id
            .as_deref()
            .ok_or_else(|| QuoteError::invalid_input("category_id", "none", "Choose a category first"))?;
        let subcategory = catalog().require_subcategory(category_id, subcategory_id)?;

        if !self.addons.is_empty() && self.subcategory_id.as_deref() != Some(subcategory.id.as_str()) {
            if !confirmed {
                return Ok(SubcategoryPrompt::NeedsConfirmation);
            }
            tracing::debug!(
                item = %self.item_name,
                discarded = self.addons.len(),
                "subcategory changed, add-ons discarded"
            );
            self.addons.clear();
        }

        self.subcategory_id = Some(subcategory.id.clone());
        if !subcategory.requires_tile_size {
            self.tile_size_id = None;
        }
        match subcategory.base_price {
            Some(base_price) => self.set_price_per_sqft(base_price),
            None => self.line_total = self.compute_line_total(),
        }

        if subcategory.is_others() {
            Ok(SubcategoryPrompt::CustomAddonForm)
        } else {
            Ok(SubcategoryPrompt::Suggestions {
                addons: subcategory.addons.clone(),
                requires_tile_size: subcategory.requires_tile_size,
            })
        }
    }

    pub fn select_tile_size(&mut self, tile_size_id: &str) -> QuoteResult<()> {
        let tile = catalog().require_tile_size(tile_size_id)?;
        self.tile_size_id = Some(tile.id.clone());
        Ok(())
    }

    /// Attach the material estimate for the selected subcategory and tile.
    ///
    /// Every material this kind of estimate can produce is cleared first, so
    /// lines that no longer apply after a tile or area change are dropped
    /// rather than kept stale. Returns how many material add-ons were attached.
    pub fn apply_material_estimate(&mut self) -> QuoteResult<usize> {
        let (Some(category_id), Some(subcategory_id)) = (&self.category_id, &self.subcategory_id) else {
            return Err(QuoteError::invalid_input(
                "subcategory_id",
                "none",
                "Choose a subcategory before estimating materials",
            ));
        };
        let kind = catalog().require_subcategory(category_id, subcategory_id)?.material_kind;
        let estimates = estimate_for_subcategory(
            category_id,
            subcategory_id,
            self.tile_size_id.as_deref(),
            self.area,
        )?;

        if let Some(kind) = kind {
            let managed = material_names(kind);
            let before = self.addons.len();
            self.addons.retain(|a| {
                let base = a.base_name().to_lowercase();
                !(a.is_material() && managed.iter().any(|name| name.to_lowercase() == base))
            });
            let cleared = before - self.addons.len();
            if cleared > 0 {
                tracing::debug!(item = %self.item_name, cleared, "earlier material estimate cleared");
            }
        }
        for estimate in &estimates {
            self.add_addon(estimate.to_addon());
        }
        self.line_total = self.compute_line_total();
        Ok(estimates.len())
    }
}

/// Whether `b` should replace `a` on insert.
///
/// Materials match on case-insensitive base name, everything else on
/// case-insensitive full name. A material never matches a non-material.
pub fn is_duplicate(a: &Addon, b: &Addon) -> bool {
    match (a.is_material(), b.is_material()) {
        (true, true) => a.base_name().to_lowercase() == b.base_name().to_lowercase(),
        (false, false) => a.name.to_lowercase() == b.name.to_lowercase(),
        _ => false,
    }
}

/// Re-price add-ons and the line total without touching the input.
///
/// Running it twice gives the same result as running it once.
pub fn recompute_line_item(item: &QuoteItem) -> QuoteItem {
    let mut next = item.clone();
    next.refresh_addon_prices();
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AddonType, OTHERS_SUBCATEGORY_ID};
    use crate::pricing::PriceMode;
    use pretty_assertions::assert_eq;

    fn suggested(category: &str, sub: &str, id: &str) -> &'static SuggestedAddon {
        catalog().subcategory(category, sub).and_then(|s| s.addon(id)).unwrap()
    }

    #[test]
    fn test_line_total_excludes_materials() {
        let mut item = QuoteItem::new("Bathroom Floor").with_area(100.0, 5.0);
        item.add_addon(Addon::custom("Demolition", 50.0, AddonType::Service));
        item.add_addon(Addon::material("Thinset (2 bags)", 2.0, "bags"));
        assert_eq!(item.line_total, 550.0);

        item.edit_addon(item.addons[1].id, AddonEdit::Quantity(40.0)).unwrap();
        assert_eq!(item.line_total, 550.0);
    }

    #[test]
    fn test_material_dedup_by_base_name() {
        let mut item = QuoteItem::new("Floor").with_area(100.0, 5.0);
        item.add_addon(Addon::material("Thinset (3 bags)", 3.0, "bags"));
        let replaced = item.add_addon(Addon::material("thinset (5 bags)", 5.0, "bags"));

        assert_eq!(replaced.map(|a| a.name), Some("Thinset (3 bags)".to_string()));
        assert_eq!(item.addons.len(), 1);
        assert_eq!(item.addons[0].quantity, Some(5.0));
        assert_eq!(item.addons[0].base_name(), "thinset");
    }

    #[test]
    fn test_non_material_dedup_by_full_name() {
        let mut item = QuoteItem::new("Floor").with_area(100.0, 5.0);
        item.add_addon(Addon::custom("Haul Away", 100.0, AddonType::General));
        item.add_addon(Addon::custom("haul away", 150.0, AddonType::General));
        item.add_addon(Addon::custom("Haul Away (truck)", 80.0, AddonType::General));
        assert_eq!(item.addons.len(), 2);
        assert_eq!(item.line_total, 500.0 + 150.0 + 80.0);
    }

    #[test]
    fn test_material_and_service_with_same_name_both_kept() {
        let mut item = QuoteItem::new("Floor").with_area(10.0, 1.0);
        item.add_addon(Addon::custom("Grout Sealer", 40.0, AddonType::Service));
        item.add_addon(Addon::material("Grout Sealer (1 bottle)", 1.0, "bottle"));
        assert_eq!(item.addons.len(), 2);
    }

    #[test]
    fn test_dedup_moves_replacement_to_end() {
        let mut item = QuoteItem::new("Floor").with_area(10.0, 1.0);
        item.add_addon(Addon::material("Grout (1 bag)", 1.0, "bag"));
        item.add_addon(Addon::material("Thinset (1 bag)", 1.0, "bag"));
        item.add_addon(Addon::material("Grout (2 bags)", 2.0, "bags"));
        let names: Vec<&str> = item.addons.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Thinset (1 bag)", "Grout (2 bags)"]);
    }

    #[test]
    fn test_area_change_reprices_sqft_and_percent() {
        let mut item = QuoteItem::new("Floor").with_area(100.0, 6.0);
        item.toggle_suggested_addon(suggested("flooring", "tile-floor", "floor-demo"), true);
        item.toggle_suggested_addon(suggested("flooring", "tile-floor", "diagonal-pattern"), true);
        item.toggle_suggested_addon(suggested("flooring", "tile-floor", "threshold"), true);
        // 600 + 300 demo + 120 pattern (20%) + 60 threshold
        assert_eq!(item.line_total, 1080.0);

        item.set_area(50.0);
        // 300 + 150 + 60 + 60
        assert_eq!(item.line_total, 570.0);

        item.set_price_per_sqft(10.0);
        // 500 + 150 + 100 + 60
        assert_eq!(item.line_total, 810.0);
    }

    #[test]
    fn test_refresh_counts_only_changed_addons() {
        let mut item = QuoteItem::new("Floor").with_area(100.0, 6.0);
        item.toggle_suggested_addon(suggested("flooring", "tile-floor", "floor-demo"), true);
        item.toggle_suggested_addon(suggested("flooring", "tile-floor", "threshold"), true);
        item.area = 120.0;
        assert_eq!(item.refresh_addon_prices(), 1);
        assert_eq!(item.refresh_addon_prices(), 0);
    }

    #[test]
    fn test_manual_total_survives_area_change() {
        let mut item = QuoteItem::new("Floor").with_area(100.0, 5.0);
        item.toggle_suggested_addon(suggested("flooring", "tile-floor", "floor-demo"), true);
        let id = item.addons[0].id;

        item.edit_addon(id, AddonEdit::EditMode(EditMode::Total)).unwrap();
        item.edit_addon(id, AddonEdit::ManualTotal(200.0)).unwrap();
        item.set_area(300.0);
        assert_eq!(item.addons[0].price, 200.0);
        assert_eq!(item.addons[0].mode, PriceMode::Manual(200.0));
        assert_eq!(item.line_total, 1500.0 + 200.0);

        item.edit_addon(id, AddonEdit::EditMode(EditMode::Base)).unwrap();
        assert_eq!(item.addons[0].price, 900.0);
        assert_eq!(item.line_total, 1500.0 + 900.0);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut item = QuoteItem::new("Walls").with_area(87.3, 12.0);
        item.toggle_suggested_addon(suggested("bathroom", "shower-walls", "accent-strip"), true);
        item.toggle_suggested_addon(suggested("bathroom", "shower-walls", "waterproofing"), true);
        item.area = 91.7;

        let once = recompute_line_item(&item);
        let twice = recompute_line_item(&once);
        assert_eq!(once.line_total, twice.line_total);
        assert_eq!(once, twice);
        // Input untouched
        assert_eq!(item.area, 91.7);
    }

    #[test]
    fn test_uncheck_removes_addon() {
        let mut item = QuoteItem::new("Floor").with_area(100.0, 6.0);
        let demo = suggested("flooring", "tile-floor", "floor-demo");
        item.toggle_suggested_addon(demo, true);
        item.toggle_suggested_addon(demo, true);
        assert_eq!(item.addons.len(), 1);
        item.toggle_suggested_addon(demo, false);
        assert!(item.addons.is_empty());
        assert_eq!(item.line_total, 600.0);
    }

    #[test]
    fn test_uncheck_keeps_material_with_same_name() {
        let mut item = QuoteItem::new("Floor").with_area(100.0, 6.0);
        let demo = suggested("flooring", "tile-floor", "floor-demo");
        item.toggle_suggested_addon(demo, true);
        item.add_addon(Addon::material(demo.name.clone(), 2.0, "bags"));
        assert_eq!(item.addons.len(), 2);

        item.toggle_suggested_addon(demo, false);
        assert_eq!(item.addons.len(), 1);
        assert!(item.addons[0].is_material());
        assert_eq!(item.line_total, 600.0);
    }

    #[test]
    fn test_state_machine() {
        let mut item = QuoteItem::new("Shower").with_area(60.0, 0.0);
        assert_eq!(item.attachment_state(), AttachmentState::Empty);

        assert_eq!(item.select_category("bathroom", false).unwrap(), CategoryChange::Applied);
        assert_eq!(item.attachment_state(), AttachmentState::CategorySelected);

        let prompt = item.select_subcategory("shower-walls", false).unwrap();
        assert!(matches!(prompt, SubcategoryPrompt::Suggestions { requires_tile_size: true, .. }));
        assert_eq!(item.attachment_state(), AttachmentState::SubcategorySelected);
        assert_eq!(item.price_per_sqft, 12.0);
        assert_eq!(item.line_total, 720.0);

        item.toggle_suggested_addon(suggested("bathroom", "shower-walls", "shower-niche"), true);
        assert_eq!(item.attachment_state(), AttachmentState::Populated);

        // Locked
        assert_eq!(item.select_category("kitchen", false).unwrap(), CategoryChange::NeedsConfirmation);
        assert_eq!(item.category_id.as_deref(), Some("bathroom"));
        assert_eq!(item.addons.len(), 1);

        // Confirmed
        assert_eq!(item.select_category("kitchen", true).unwrap(), CategoryChange::Applied);
        assert!(item.addons.is_empty());
        assert_eq!(item.subcategory_id, None);
        assert_eq!(item.attachment_state(), AttachmentState::CategorySelected);
    }

    #[test]
    fn test_subcategory_locked_once_populated() {
        let mut item = QuoteItem::new("Bathroom").with_area(60.0, 0.0);
        item.select_category("bathroom", false).unwrap();
        item.select_subcategory("shower-walls", false).unwrap();
        item.toggle_suggested_addon(suggested("bathroom", "shower-walls", "shower-niche"), true);
        let addons = item.addons.clone();

        // Re-selecting the same subcategory keeps the add-ons
        let prompt = item.select_subcategory("shower-walls", false).unwrap();
        assert!(matches!(prompt, SubcategoryPrompt::Suggestions { .. }));
        assert_eq!(item.addons, addons);

        let prompt = item.select_subcategory("bathroom-floor", false).unwrap();
        assert_eq!(prompt, SubcategoryPrompt::NeedsConfirmation);
        assert_eq!(item.subcategory_id.as_deref(), Some("shower-walls"));
        assert_eq!(item.price_per_sqft, 12.0);
        assert_eq!(item.addons, addons);

        item.select_subcategory("bathroom-floor", true).unwrap();
        assert_eq!(item.subcategory_id.as_deref(), Some("bathroom-floor"));
        assert_eq!(item.price_per_sqft, 7.0);
        assert!(item.addons.is_empty());
        assert_eq!(item.line_total, 420.0);
    }

    #[test]
    fn test_same_category_is_unchanged() {
        let mut item = QuoteItem::new("Floor").with_area(10.0, 1.0);
        item.select_category("flooring", false).unwrap();
        item.add_addon(Addon::custom("Extra", 5.0, AddonType::General));
        assert_eq!(item.select_category("flooring", false).unwrap(), CategoryChange::Unchanged);
        assert_eq!(item.addons.len(), 1);
    }

    #[test]
    fn test_others_opens_custom_form() {
        let mut item = QuoteItem::new("Misc").with_area(10.0, 3.0);
        item.select_category("kitchen", false).unwrap();
        let prompt = item.select_subcategory(OTHERS_SUBCATEGORY_ID, false).unwrap();
        assert_eq!(prompt, SubcategoryPrompt::CustomAddonForm);
        // No base price, rate kept
        assert_eq!(item.price_per_sqft, 3.0);
    }

    #[test]
    fn test_category_requires_area() {
        let mut item = QuoteItem::new("Floor");
        let err = item.select_category("flooring", false).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let mut item = QuoteItem::new("Floor").with_area(10.0, 1.0);
        assert!(item.select_category("roofing", false).is_err());
        assert!(item.select_subcategory("tile-floor", false).is_err());
    }

    #[test]
    fn test_zero_area_clears_category_only_without_addons() {
        let mut item = QuoteItem::new("Floor").with_area(10.0, 1.0);
        item.select_category("flooring", false).unwrap();
        item.select_subcategory("tile-floor", false).unwrap();
        item.set_area(0.0);
        assert_eq!(item.category_id, None);
        assert_eq!(item.subcategory_id, None);

        let mut item = QuoteItem::new("Floor").with_area(10.0, 1.0);
        item.select_category("flooring", false).unwrap();
        item.select_subcategory("tile-floor", false).unwrap();
        item.toggle_suggested_addon(suggested("flooring", "tile-floor", "threshold"), true);
        item.set_area(0.0);
        assert_eq!(item.category_id.as_deref(), Some("flooring"));
        assert_eq!(item.subcategory_id.as_deref(), Some("tile-floor"));
    }

    #[test]
    fn test_apply_material_estimate_replaces_on_rerun() {
        let mut item = QuoteItem::new("Kitchen").with_area(30.0, 0.0);
        item.select_category("kitchen", false).unwrap();
        item.select_subcategory("backsplash", false).unwrap();
        item.select_tile_size("3x6").unwrap();
        let line_total = item.line_total;

        let attached = item.apply_material_estimate().unwrap();
        assert_eq!(item.materials().count(), attached);

        item.set_area(60.0);
        item.apply_material_estimate().unwrap();
        assert_eq!(item.materials().count(), attached);
        let tile = item.materials().find(|a| a.base_name() == "Tile").unwrap();
        // 60 * 1.1 / 0.125 = 528
        assert_eq!(tile.name, "Tile (528 pieces)");
        // Materials never change the total
        assert_eq!(item.line_total, line_total * 2.0);
    }

    #[test]
    fn test_apply_material_estimate_drops_stale_lines() {
        let mut item = QuoteItem::new("Floor").with_area(100.0, 0.0);
        item.select_category("flooring", false).unwrap();
        item.select_subcategory("tile-floor", false).unwrap();
        item.select_tile_size("12x24").unwrap();
        item.add_addon(Addon::custom("Floor Protection", 75.0, AddonType::General));
        item.apply_material_estimate().unwrap();
        assert!(item.materials().any(|a| a.base_name() == "Leveling Clips"));

        // Subway tile uses spacers, not clips
        item.select_tile_size("3x6").unwrap();
        let attached = item.apply_material_estimate().unwrap();

        assert_eq!(item.materials().count(), attached);
        assert!(item.materials().all(|a| a.base_name() != "Leveling Clips"));
        assert!(item.materials().any(|a| a.base_name() == "Spacers"));
        // Non-material add-ons are left alone
        assert!(item.addons.iter().any(|a| a.name == "Floor Protection"));
    }

    #[test]
    fn test_apply_material_estimate_needs_subcategory() {
        let mut item = QuoteItem::new("Floor").with_area(10.0, 1.0);
        assert!(item.apply_material_estimate().is_err());
    }

    #[test]
    fn test_edit_unknown_addon() {
        let mut item = QuoteItem::new("Floor");
        let err = item.edit_addon(Uuid::new_v4(), AddonEdit::Quantity(2.0)).unwrap_err();
        assert_eq!(err.error_code(), "ADDON_NOT_FOUND");
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut item = QuoteItem::new("Floor").with_area(100.0, 5.0);
        item.toggle_suggested_addon(suggested("flooring", "tile-floor", "floor-demo"), true);
        let json = serde_json::to_string(&item).unwrap();
        let parsed: QuoteItem = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, item);
    }
}
