//! # Materials
//!
//! Material quantity calculators and per-subcategory material estimates.
//!
//! Material quantities are informational: they are attached to line items
//! as zero-priced add-ons for the crew's bill of materials and are never
//! priced into a quote's total.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::materials::{clips_needed, flooring_boxes_needed, FlooringType};
//!
//! assert_eq!(flooring_boxes_needed(FlooringType::Vinyl, 100.0), 6);
//! assert_eq!(clips_needed("3x6", 40.0), 0); // subway tile uses spacers only
//! ```

pub mod calculator;
pub mod estimate;

pub use calculator::{
    backsplash_silicone_tubes, clips_needed, drywall_mud_buckets, drywall_sheets_needed,
    drywall_tape_rolls, flooring_boxes_needed, grout_bags_needed, paint_gallons_needed,
    primer_gallons_needed, sealer_bottles_needed, silicone_tubes_needed, spacers_needed,
    thinset_bags_needed, tile_boxes_needed, tile_pieces_needed, trim_linear_feet,
    trim_pieces_needed, underlayment_sqft, FlooringType,
};
pub use estimate::{estimate_for_subcategory, estimate_materials, material_names, MaterialEstimate};

/// Tile pieces for an area (external name for [`tile_pieces_needed`])
pub fn compute_tile_pieces(tile_size_id: &str, area: f64) -> u32 {
    tile_pieces_needed(tile_size_id, area)
}

/// Plank flooring boxes (external name for [`flooring_boxes_needed`])
pub fn compute_flooring_boxes(flooring: FlooringType, area: f64) -> u32 {
    flooring_boxes_needed(flooring, area)
}

/// Leveling clips (external name for [`clips_needed`])
pub fn compute_clips(tile_size_id: &str, area: f64) -> u32 {
    clips_needed(tile_size_id, area)
}

/// Tile spacers (external name for [`spacers_needed`])
pub fn compute_spacers(tile_size_id: &str, area: f64) -> u32 {
    spacers_needed(tile_size_id, area)
}
