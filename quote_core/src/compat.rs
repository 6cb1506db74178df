//! # Legacy Add-on Encoding
//!
//! Older quote records (and the PDF/email renderers that read them) keep a
//! line item's category selection inside its `addons` array, as a sentinel
//! entry whose id is `"_metadata"`:
//!
//! ```json
//! [
//!   { "id": "a1", "name": "Shower Niche", "price": 300, "addonType": "general",
//!     "priceType": "unit", "basePrice": 300, "quantity": 1 },
//!   { "id": "_metadata", "name": "", "price": 0,
//!     "category_id": "bathroom", "subcategory_id": "shower-walls" }
//! ]
//! ```
//!
//! [`QuoteItem`] keeps the selection in first-class fields; this module
//! converts between the two shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::catalog::{AddonType, PriceType};
use crate::errors::QuoteResult;
use crate::line_item::QuoteItem;
use crate::pricing::{Addon, EditMode, PriceMode};

/// Id of the sentinel entry carrying the category selection
pub const METADATA_ADDON_ID: &str = "_metadata";

/// One entry of a legacy `addons` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyAddon {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addon_type: Option<AddonType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_type: Option<PriceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_mode: Option<EditMode>,
    #[serde(rename = "category_id", default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(rename = "subcategory_id", default, skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<String>,
}

impl LegacyAddon {
    pub fn is_metadata(&self) -> bool {
        self.id == METADATA_ADDON_ID
    }

    fn metadata(category_id: Option<String>, subcategory_id: Option<String>) -> Self {
        LegacyAddon {
            id: METADATA_ADDON_ID.to_string(),
            name: String::new(),
            price: 0.0,
            addon_type: None,
            price_type: None,
            base_price: None,
            quantity: None,
            unit: None,
            edit_mode: None,
            category_id,
            subcategory_id,
        }
    }
}

impl From<&Addon> for LegacyAddon {
    fn from(addon: &Addon) -> Self {
        LegacyAddon {
            id: addon.id.to_string(),
            name: addon.name.clone(),
            price: addon.price,
            addon_type: addon.addon_type,
            price_type: addon.price_type,
            base_price: addon.base_price,
            quantity: addon.quantity,
            unit: addon.unit.clone(),
            edit_mode: addon.edit_mode(),
            category_id: None,
            subcategory_id: None,
        }
    }
}

impl From<LegacyAddon> for Addon {
    fn from(legacy: LegacyAddon) -> Self {
        // Legacy ids were not always UUIDs
        let id = Uuid::parse_str(&legacy.id).unwrap_or_else(|_| Uuid::new_v4());
        let mode = match legacy.edit_mode {
            Some(EditMode::Total) => PriceMode::Manual(legacy.price),
            _ => PriceMode::Derived,
        };
        Addon {
            id,
            name: legacy.name,
            price: legacy.price,
            addon_type: legacy.addon_type,
            price_type: legacy.price_type,
            base_price: legacy.base_price,
            quantity: legacy.quantity,
            unit: legacy.unit,
            mode,
        }
    }
}

/// Add-ons and category selection recovered from a legacy array
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LegacyParts {
    pub addons: Vec<Addon>,
    pub category_id: Option<String>,
    pub subcategory_id: Option<String>,
}

/// Legacy `addons` array for a line item, with the sentinel appended when a
/// category is selected.
pub fn to_legacy_addons(item: &QuoteItem) -> Vec<LegacyAddon> {
    let mut entries: Vec<LegacyAddon> = item.addons.iter().map(LegacyAddon::from).collect();
    if item.category_id.is_some() || item.subcategory_id.is_some() {
        entries.push(LegacyAddon::metadata(
            item.category_id.clone(),
            item.subcategory_id.clone(),
        ));
    }
    entries
}

/// Split a legacy array into real add-ons and the category selection.
///
/// If several sentinels are present the last one wins.
pub fn from_legacy_addons(entries: Vec<LegacyAddon>) -> LegacyParts {
    let mut parts = LegacyParts::default();
    for entry in entries {
        if entry.is_metadata() {
            parts.category_id = entry.category_id;
            parts.subcategory_id = entry.subcategory_id;
        } else {
            parts.addons.push(entry.into());
        }
    }
    parts
}

/// Encode a line item's add-ons as a legacy JSON array
pub fn encode_addons(item: &QuoteItem) -> QuoteResult<Value> {
    Ok(serde_json::to_value(to_legacy_addons(item))?)
}

/// Decode a legacy JSON array onto a line item, replacing its add-ons and
/// category selection and refreshing the line total.
pub fn decode_addons_into(item: &mut QuoteItem, value: Value) -> QuoteResult<()> {
    let entries: Vec<LegacyAddon> = serde_json::from_value(value)?;
    let parts = from_legacy_addons(entries);
    item.addons = parts.addons;
    item.category_id = parts.category_id;
    item.subcategory_id = parts.subcategory_id;
    item.line_total = item.compute_line_total();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_sentinel_appended() {
        let mut item = QuoteItem::new("Shower").with_area(60.0, 12.0);
        item.select_category("bathroom", false).unwrap();
        item.select_subcategory("shower-walls", false).unwrap();
        item.add_addon(Addon::custom("Grab Bar", 75.0, AddonType::General));

        let value = encode_addons(&item).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[1]["id"], json!("_metadata"));
        assert_eq!(array[1]["category_id"], json!("bathroom"));
        assert_eq!(array[1]["subcategory_id"], json!("shower-walls"));
        assert_eq!(array[0]["addonType"], json!("general"));
    }

    #[test]
    fn test_no_sentinel_without_category() {
        let mut item = QuoteItem::new("Misc").with_area(10.0, 1.0);
        item.add_addon(Addon::custom("Trip Charge", 50.0, AddonType::General));
        assert_eq!(to_legacy_addons(&item).len(), 1);
    }

    #[test]
    fn test_decode_legacy_array() {
        let value = json!([
            { "id": "addon-1", "name": "Demolition & Removal", "price": 150,
              "addonType": "service", "priceType": "sqft", "basePrice": 3, "editMode": "base" },
            { "id": "addon-2", "name": "Thinset (2 bags)", "price": 0,
              "addonType": "material", "quantity": 2, "unit": "bags" },
            { "id": "addon-3", "name": "Heated Floor System", "price": 400,
              "addonType": "general", "priceType": "sqft", "basePrice": 15, "editMode": "total" },
            { "id": "_metadata", "category_id": "flooring", "subcategory_id": "tile-floor" }
        ]);

        let mut item = QuoteItem::new("Floor").with_area(50.0, 6.0);
        decode_addons_into(&mut item, value).unwrap();

        assert_eq!(item.addons.len(), 3);
        assert_eq!(item.category_id.as_deref(), Some("flooring"));
        assert_eq!(item.subcategory_id.as_deref(), Some("tile-floor"));
        assert_eq!(item.addons[2].mode, PriceMode::Manual(400.0));
        assert_eq!(item.line_total, 300.0 + 150.0 + 400.0);

        // Manual total survives an area change after import
        item.set_area(100.0);
        assert_eq!(item.addons[0].price, 300.0);
        assert_eq!(item.addons[2].price, 400.0);
    }

    #[test]
    fn test_roundtrip_preserves_selection() {
        let mut item = QuoteItem::new("Kitchen").with_area(30.0, 0.0);
        item.select_category("kitchen", false).unwrap();
        item.select_subcategory("backsplash", false).unwrap();
        item.add_addon(Addon::custom("Outlet Cutouts", 40.0, AddonType::Complexity));

        let value = encode_addons(&item).unwrap();
        let mut restored = QuoteItem::new("Kitchen").with_area(30.0, 15.0);
        decode_addons_into(&mut restored, value).unwrap();

        assert_eq!(restored.category_id, item.category_id);
        assert_eq!(restored.subcategory_id, item.subcategory_id);
        assert_eq!(restored.addons, item.addons);
        assert_eq!(restored.line_total, item.line_total);
    }
}
