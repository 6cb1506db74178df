//! Material Calculator
//!
//! Pure functions that turn an area (and the perimeter derived from it) into
//! whole-unit material quantities, using the catalog's tile and coverage
//! tables. Every function is total: unknown ids, non-positive or non-finite
//! areas, and zero coefficients all degrade to 0.

use serde::{Deserialize, Serialize};

use crate::catalog::{catalog, TileSize};
use crate::units::{ceil_units, LinearFt, SqFt};

/// Waste buffer applied to tile area before counting pieces
pub const TILE_WASTE_FACTOR: f64 = 1.10;

/// Waste buffer applied to plank flooring area before counting boxes
pub const FLOORING_WASTE_FACTOR: f64 = 1.08;

/// Waste buffer applied to drywall sheet counts
pub const DRYWALL_WASTE_FACTOR: f64 = 1.10;

/// Coats of paint assumed by the paint estimate
pub const DEFAULT_PAINT_COATS: u32 = 2;

/// Boxed plank flooring types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlooringType {
    Vinyl,
    Laminate,
}

impl FlooringType {
    /// Coverage-table entry for one box of this flooring
    pub fn coverage_id(&self) -> &'static str {
        match self {
            FlooringType::Vinyl => "vinyl-plank-box",
            FlooringType::Laminate => "laminate-box",
        }
    }
}

/// Convert a raw quantity to a whole-unit count
fn whole(value: f64) -> u32 {
    let units = ceil_units(value);
    if units >= u32::MAX as f64 {
        u32::MAX
    } else {
        units as u32
    }
}

/// Run an input through a coverage-table entry; missing entries yield 0.
fn coverage_units(coverage_id: &str, input: f64) -> u32 {
    catalog()
        .coverage(coverage_id)
        .map_or(0, |c| whole(c.quantity(input)))
}

fn with_tile(tile_size_id: &str, f: impl FnOnce(&TileSize) -> u32) -> u32 {
    catalog().tile_size(tile_size_id).map_or(0, f)
}

// ============================================================================
// Tile
// ============================================================================

/// Tile pieces for an area, `ceil(area × 1.10 / sqft_per_piece)`.
///
/// ```rust
/// use quote_core::materials::tile_pieces_needed;
///
/// // 100 × 1.10 evaluates to 110.00000000000001 in f64
/// assert_eq!(tile_pieces_needed("12x12", 100.0), 111);
/// assert_eq!(tile_pieces_needed("12x12", 50.0), 55);
/// assert_eq!(tile_pieces_needed("no-such-tile", 100.0), 0);
/// ```
pub fn tile_pieces_needed(tile_size_id: &str, area: f64) -> u32 {
    with_tile(tile_size_id, |tile| tile_pieces_for(tile, area))
}

pub fn tile_pieces_for(tile: &TileSize, area: f64) -> u32 {
    if tile.sqft_per_piece <= 0.0 {
        return 0;
    }
    whole(SqFt(area).with_waste(TILE_WASTE_FACTOR).0 / tile.sqft_per_piece)
}

/// Boxes of tile needed to cover the waste-buffered piece count
pub fn tile_boxes_needed(tile_size_id: &str, area: f64) -> u32 {
    with_tile(tile_size_id, |tile| tile_boxes_for(tile, area))
}

pub fn tile_boxes_for(tile: &TileSize, area: f64) -> u32 {
    if tile.pieces_per_box == 0 {
        return 0;
    }
    whole(tile_pieces_for(tile, area) as f64 / tile.pieces_per_box as f64)
}

/// Leveling clips, `ceil(area × clips_per_sqft)`
pub fn clips_needed(tile_size_id: &str, area: f64) -> u32 {
    with_tile(tile_size_id, |tile| clips_for(tile, area))
}

pub fn clips_for(tile: &TileSize, area: f64) -> u32 {
    whole(SqFt(area).sanitized().0 * tile.clips_per_sqft)
}

/// Tile spacers, `ceil(area × spacers_per_sqft)`
pub fn spacers_needed(tile_size_id: &str, area: f64) -> u32 {
    with_tile(tile_size_id, |tile| spacers_for(tile, area))
}

pub fn spacers_for(tile: &TileSize, area: f64) -> u32 {
    whole(SqFt(area).sanitized().0 * tile.spacers_per_sqft)
}

/// Bags of thinset for the tile's usage per sqft
pub fn thinset_bags_needed(tile_size_id: &str, area: f64) -> u32 {
    with_tile(tile_size_id, |tile| thinset_bags_for(tile, area))
}

pub fn thinset_bags_for(tile: &TileSize, area: f64) -> u32 {
    coverage_units("thinset-bag", SqFt(area).sanitized().0 * tile.thinset_per_sqft)
}

/// Bags of grout for the tile's usage per sqft
pub fn grout_bags_needed(tile_size_id: &str, area: f64) -> u32 {
    with_tile(tile_size_id, |tile| grout_bags_for(tile, area))
}

pub fn grout_bags_for(tile: &TileSize, area: f64) -> u32 {
    coverage_units("grout-bag", SqFt(area).sanitized().0 * tile.grout_per_sqft)
}

/// Bottles of grout sealer for a tiled area
pub fn sealer_bottles_needed(area: f64) -> u32 {
    coverage_units("sealer", area)
}

/// Tubes of silicone to run a bead along `perimeter`
pub fn silicone_tubes_needed(perimeter: LinearFt) -> u32 {
    coverage_units("silicone-tube", perimeter.0)
}

/// Silicone for a backsplash, using the `2 × 2 × sqrt(area)` edge estimate
pub fn backsplash_silicone_tubes(area: f64) -> u32 {
    silicone_tubes_needed(SqFt(area).backsplash_perimeter())
}

// ============================================================================
// Plank flooring
// ============================================================================

/// Boxes of vinyl or laminate, `ceil(area × 1.08 / coverage_per_box)`.
///
/// Returns 0 when the coverage entry is missing or has no coverage.
pub fn flooring_boxes_needed(flooring: FlooringType, area: f64) -> u32 {
    match catalog().coverage(flooring.coverage_id()) {
        Some(entry) if entry.coverage > 0.0 => {
            whole(entry.quantity(SqFt(area).with_waste(FLOORING_WASTE_FACTOR).0))
        }
        _ => 0,
    }
}

/// Underlayment in sqft, one sqft per sqft of floor
pub fn underlayment_sqft(area: f64) -> f64 {
    catalog()
        .coverage("underlayment")
        .map_or(0.0, |c| c.quantity(SqFt(area).sanitized().0))
}

/// Linear feet of trim around a square room of this area
pub fn trim_linear_feet(area: f64) -> f64 {
    SqFt(area).square_room_perimeter().0
}

/// Trim pieces for the square-room perimeter
pub fn trim_pieces_needed(area: f64) -> u32 {
    coverage_units("trim-piece", trim_linear_feet(area))
}

// ============================================================================
// Paint & drywall
// ============================================================================

/// Gallons of paint for `coats` coats over `area`
pub fn paint_gallons_needed(area: f64, coats: u32) -> u32 {
    coverage_units("paint-gallon", SqFt(area).sanitized().0 * coats as f64)
}

/// Gallons of primer for a single coat
pub fn primer_gallons_needed(area: f64) -> u32 {
    coverage_units("primer-gallon", area)
}

/// Drywall sheets with a 10% waste buffer
pub fn drywall_sheets_needed(area: f64) -> u32 {
    coverage_units("drywall-sheet", SqFt(area).with_waste(DRYWALL_WASTE_FACTOR).0)
}

/// Buckets of joint compound
pub fn drywall_mud_buckets(area: f64) -> u32 {
    coverage_units("drywall-mud", area)
}

/// Rolls of joint tape
pub fn drywall_tape_rolls(area: f64) -> u32 {
    coverage_units("drywall-tape", area)
}
