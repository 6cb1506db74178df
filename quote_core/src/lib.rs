//! # quote_core - Contractor Quote Pricing Engine
//!
//! `quote_core` prices contractor quotes: a catalog of work categories with
//! suggested add-ons, the rules that turn an add-on's rate into a price, line
//! item and quote totals, and material quantity estimates for the crew.
//!
//! All inputs and outputs are serde types, so drafts can be stored as JSON
//! and handed to renderers or other tools unchanged.
//!
//! ## Quick Start
//!
//! ```rust
//! use quote_core::catalog::catalog;
//! use quote_core::line_item::QuoteItem;
//! use quote_core::quote::{QuoteDraft, QuoteEdit};
//!
//! let mut floor = QuoteItem::new("Bathroom Floor").with_area(50.0, 0.0);
//! floor.select_category("bathroom", false)?;
//! floor.select_subcategory("bathroom-floor", false)?; // base rate from the catalog
//!
//! let waterproofing = catalog()
//!     .subcategory("bathroom", "shower-walls")
//!     .and_then(|s| s.addon("waterproofing"))
//!     .cloned();
//! assert!(waterproofing.is_some());
//!
//! let draft = QuoteDraft::new("Pat Smith").apply(QuoteEdit::AddItem(floor));
//! assert_eq!(draft.totals().subtotal, 350.0);
//! # Ok::<(), quote_core::errors::QuoteError>(())
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Categories, suggested add-ons, tile sizes, coverage rates
//! - [`pricing`] - Add-on price formulas and manual overrides
//! - [`line_item`] - Line items and their add-on lists
//! - [`quote`] - Quote drafts, edits and totals
//! - [`materials`] - Material quantity calculators and estimates
//! - [`compat`] - Legacy `_metadata` add-on encoding
//! - [`file_io`] - Draft files with atomic saves and locking
//! - [`units`] - Area, length and money wrappers
//! - [`errors`] - Structured error types

pub mod catalog;
pub mod compat;
pub mod errors;
pub mod file_io;
pub mod line_item;
pub mod materials;
pub mod pricing;
pub mod quote;
pub mod units;

pub use catalog::catalog;
pub use errors::{QuoteError, QuoteResult};
pub use file_io::{load_draft, save_draft, DraftLock};
pub use line_item::{recompute_line_item, QuoteItem};
pub use materials::{compute_clips, compute_flooring_boxes, compute_spacers, compute_tile_pieces};
pub use pricing::{price_addon, Addon};
pub use quote::{compute_quote_total, QuoteDraft, QuoteEdit, QuoteTotals};
