//! # Quote Drafts
//!
//! The `QuoteDraft` is the root container for a quote being edited. It is
//! an explicit value: each wizard step applies a [`QuoteEdit`] and gets the
//! next draft back, and persisting it is the caller's job (see
//! [`crate::file_io`]).
//!
//! ## Structure
//!
//! ```text
//! QuoteDraft
//! ├── meta: QuoteMetadata (schema version, id, timestamps)
//! ├── settings: QuoteSettings (currency, contractor)
//! ├── customer: CustomerInfo
//! ├── items: Vec<QuoteItem> (ordered line items)
//! └── material_cost / customer_provides_materials / notes / payment_method
//! ```
//!
//! ## Totals
//!
//! ```text
//! subtotal = Σ line_total
//! total    = subtotal + (customer_provides_materials ? 0 : material_cost)
//! ```
//!
//! `material_cost` is a single figure typed by the contractor. The computed
//! bill of materials is for the crew and is never priced into the total.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::line_item::QuoteItem;
//! use quote_core::quote::{QuoteDraft, QuoteEdit};
//!
//! let draft = QuoteDraft::new("Dana Customer")
//!     .apply(QuoteEdit::AddItem(QuoteItem::new("Kitchen").with_area(40.0, 15.0)))
//!     .apply(QuoteEdit::SetMaterialCost(300.0));
//!
//! let totals = draft.totals();
//! assert_eq!(totals.subtotal, 600.0);
//! assert_eq!(totals.total, 900.0);
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{QuoteError, QuoteResult};
use crate::line_item::{recompute_line_item, AddonEdit, QuoteItem};
use crate::pricing::Addon;
use crate::units::non_negative;

/// Current schema version for draft files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Quote subtotal and total
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteTotals {
    pub subtotal: f64,
    pub total: f64,
}

/// Sum line totals and add the material cost unless the customer supplies materials.
///
/// ```rust
/// use quote_core::line_item::QuoteItem;
/// use quote_core::quote::compute_quote_total;
///
/// let items = vec![QuoteItem::new("Floor").with_area(200.0, 5.0)];
/// assert_eq!(compute_quote_total(&items, 300.0, true).total, 1000.0);
/// assert_eq!(compute_quote_total(&items, 300.0, false).total, 1300.0);
/// ```
pub fn compute_quote_total(items: &[QuoteItem], material_cost: f64, customer_provides_materials: bool) -> QuoteTotals {
    let subtotal: f64 = items.iter().map(|item| non_negative(item.line_total)).sum();
    let materials = if customer_provides_materials {
        0.0
    } else {
        non_negative(material_cost)
    };
    QuoteTotals {
        subtotal,
        total: subtotal + materials,
    }
}

/// Metadata stored in the draft header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,
    pub id: Uuid,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Per-quote settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSettings {
    /// ISO 4217 code shown next to amounts
    pub currency: String,
    pub contractor_name: String,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        QuoteSettings {
            currency: "USD".to_string(),
            contractor_name: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Check,
    Card,
    BankTransfer,
    Financing,
}

impl PaymentMethod {
    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Check => "Check",
            PaymentMethod::Card => "Credit / Debit Card",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Financing => "Financing",
        }
    }
}

/// One line of the crew's bill of materials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLine {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

/// A quote being edited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteDraft {
    pub meta: QuoteMetadata,
    #[serde(default)]
    pub settings: QuoteSettings,
    pub customer: CustomerInfo,
    #[serde(default)]
    pub items: Vec<QuoteItem>,
    #[serde(default)]
    pub material_cost: f64,
    #[serde(default)]
    pub customer_provides_materials: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// One wizard-step change to a draft
///
/// ```json
/// { "type": "set_area", "data": { "item_id": "…", "area": 120.0 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum QuoteEdit {
    SetCustomer(CustomerInfo),
    SetSettings(QuoteSettings),
    AddItem(QuoteItem),
    RemoveItem { item_id: Uuid },
    RenameItem { item_id: Uuid, name: String },
    SetArea { item_id: Uuid, area: f64 },
    SetPricePerSqft { item_id: Uuid, price_per_sqft: f64 },
    AddAddon { item_id: Uuid, addon: Addon },
    RemoveAddon { item_id: Uuid, addon_id: Uuid },
    EditAddon { item_id: Uuid, addon_id: Uuid, edit: AddonEdit },
    SetMaterialCost(f64),
    SetCustomerProvidesMaterials(bool),
    SetNotes(String),
    SetPaymentMethod(PaymentMethod),
}

impl QuoteDraft {
    pub fn new(customer_name: impl Into<String>) -> Self {
        let now = Utc::now();
        QuoteDraft {
            meta: QuoteMetadata {
                version: SCHEMA_VERSION.to_string(),
                id: Uuid::new_v4(),
                created: now,
                modified: now,
            },
            settings: QuoteSettings::default(),
            customer: CustomerInfo {
                name: customer_name.into(),
                ..Default::default()
            },
            items: Vec::new(),
            material_cost: 0.0,
            customer_provides_materials: false,
            notes: String::new(),
            payment_method: PaymentMethod::default(),
        }
    }

    pub fn totals(&self) -> QuoteTotals {
        compute_quote_total(&self.items, self.material_cost, self.customer_provides_materials)
    }

    pub fn item(&self, item_id: Uuid) -> Option<&QuoteItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn item_mut(&mut self, item_id: Uuid) -> QuoteResult<&mut QuoteItem> {
        self.items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| QuoteError::item_not_found(item_id))
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Apply an edit, returning the next draft.
    ///
    /// Edits that name an unknown item or add-on leave the draft unchanged;
    /// use [`QuoteDraft::try_apply`] to see the error.
    pub fn apply(mut self, edit: QuoteEdit) -> QuoteDraft {
        if let Err(e) = self.apply_in_place(edit) {
            tracing::warn!(error = %e, "quote edit ignored");
        }
        self
    }

    /// Apply an edit, failing when it names an unknown item or add-on.
    pub fn try_apply(mut self, edit: QuoteEdit) -> QuoteResult<QuoteDraft> {
        self.apply_in_place(edit)?;
        Ok(self)
    }

    /// Apply an edit to this draft.
    ///
    /// Ids are resolved before anything changes, so on error the draft
    /// (including its modified timestamp) is untouched.
    pub fn apply_in_place(&mut self, edit: QuoteEdit) -> QuoteResult<()> {
        match edit {
            QuoteEdit::SetCustomer(customer) => self.customer = customer,
            QuoteEdit::SetSettings(settings) => self.settings = settings,
            QuoteEdit::AddItem(mut item) => {
                item.line_total = item.compute_line_total();
                self.items.push(item);
            }
            QuoteEdit::RemoveItem { item_id } => {
                let index = self
                    .items
                    .iter()
                    .position(|i| i.id == item_id)
                    .ok_or_else(|| QuoteError::item_not_found(item_id))?;
                self.items.remove(index);
            }
            QuoteEdit::RenameItem { item_id, name } => self.item_mut(item_id)?.item_name = name,
            QuoteEdit::SetArea { item_id, area } => self.item_mut(item_id)?.set_area(area),
            QuoteEdit::SetPricePerSqft { item_id, price_per_sqft } => {
                self.item_mut(item_id)?.set_price_per_sqft(price_per_sqft)
            }
            QuoteEdit::AddAddon { item_id, addon } => {
                self.item_mut(item_id)?.add_addon(addon);
            }
            QuoteEdit::RemoveAddon { item_id, addon_id } => {
                self.item_mut(item_id)?
                    .remove_addon(addon_id)
                    .ok_or_else(|| QuoteError::addon_not_found(addon_id))?;
            }
            QuoteEdit::EditAddon { item_id, addon_id, edit } => {
                self.item_mut(item_id)?.edit_addon(addon_id, edit)?
            }
            QuoteEdit::SetMaterialCost(cost) => self.material_cost = non_negative(cost),
            QuoteEdit::SetCustomerProvidesMaterials(provides) => self.customer_provides_materials = provides,
            QuoteEdit::SetNotes(notes) => self.notes = notes,
            QuoteEdit::SetPaymentMethod(method) => self.payment_method = method,
        }
        self.touch();
        Ok(())
    }

    /// Re-price every item's add-ons and line total from its inputs.
    ///
    /// Stored `line_total` values are never trusted; drafts are recomputed
    /// on load.
    pub fn recompute(&mut self) {
        for item in &mut self.items {
            *item = recompute_line_item(item);
        }
    }

    /// Material add-ons across all items, summed by base name and unit.
    ///
    /// Lines are sorted by name for a stable crew sheet.
    pub fn bill_of_materials(&self) -> Vec<MaterialLine> {
        let mut lines: BTreeMap<(String, String), MaterialLine> = BTreeMap::new();
        for addon in self.items.iter().flat_map(|i| i.materials()) {
            let name = addon.base_name().to_string();
            let unit = addon.unit.clone().unwrap_or_default();
            let key = (name.to_lowercase(), singular(&unit));
            let quantity = addon.quantity.unwrap_or(0.0);
            lines
                .entry(key)
                .and_modify(|line| line.quantity += quantity)
                .or_insert(MaterialLine { name, quantity, unit });
        }
        lines
            .into_values()
            .map(|mut line| {
                line.unit = unit_for(&line.unit, line.quantity);
                line
            })
            .collect()
    }
}

/// "bags" → "bag", leaving "sqft" and already-singular units alone
fn singular(unit: &str) -> String {
    let unit = unit.to_lowercase();
    match unit.strip_suffix("es") {
        Some(stem) if stem.ends_with('x') => stem.to_string(),
        _ => unit.strip_suffix('s').map_or(unit.clone(), |s| s.to_string()),
    }
}

fn unit_for(unit: &str, quantity: f64) -> String {
    let one = singular(unit);
    if quantity == 1.0 || one == "sqft" || one.is_empty() {
        one
    } else if one.ends_with('x') {
        format!("{}es", one)
    } else {
        format!("{}s", one)
    }
}
