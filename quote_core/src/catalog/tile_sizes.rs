//! Tile Sizes
//!
//! Per-tile material coefficients used by the material calculator.
//!
//! Leveling clips are used on large and rectangular formats, where they also
//! set the joint width, so those formats carry no spacers. Subway, mosaic and
//! special shapes are too small for clips and carry `clips_per_sqft = 0`.

use serde::{Deserialize, Serialize};

/// Shape family of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileCategory {
    Square,
    Rectangular,
    LargeFormat,
    Plank,
    Subway,
    Mosaic,
    Special,
}

/// A selectable tile size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSize {
    pub id: String,
    pub name: String,
    /// Face area of one piece (sheet, for mosaics)
    pub sqft_per_piece: f64,
    pub clips_per_sqft: f64,
    pub spacers_per_sqft: f64,
    /// Thinset usage in lb per sqft
    pub thinset_per_sqft: f64,
    /// Grout usage in lb per sqft
    pub grout_per_sqft: f64,
    pub pieces_per_box: u32,
    pub category: TileCategory,
}

struct TileRow(&'static str, &'static str, f64, f64, f64, f64, f64, u32, TileCategory);

const TILE_ROWS: [TileRow; 11] = [
    TileRow("12x12", "12\" x 12\"", 1.0, 3.0, 4.0, 0.5, 0.10, 15, TileCategory::Square),
    TileRow("18x18", "18\" x 18\"", 2.25, 2.0, 2.0, 0.6, 0.08, 6, TileCategory::Square),
    TileRow("24x24", "24\" x 24\"", 4.0, 1.5, 0.0, 0.7, 0.05, 4, TileCategory::LargeFormat),
    TileRow("12x24", "12\" x 24\"", 2.0, 2.0, 0.0, 0.6, 0.06, 8, TileCategory::Rectangular),
    TileRow("24x48", "24\" x 48\"", 8.0, 1.0, 0.0, 0.8, 0.04, 2, TileCategory::LargeFormat),
    TileRow("6x24", "6\" x 24\" plank", 1.0, 3.0, 0.0, 0.55, 0.08, 14, TileCategory::Plank),
    TileRow("8x48", "8\" x 48\" plank", 2.667, 1.5, 0.0, 0.65, 0.06, 5, TileCategory::Plank),
    TileRow("3x6", "3\" x 6\" subway", 0.125, 0.0, 16.0, 0.45, 0.15, 80, TileCategory::Subway),
    TileRow("4x12", "4\" x 12\" subway", 0.333, 0.0, 9.0, 0.45, 0.12, 30, TileCategory::Subway),
    TileRow("2x2-mosaic", "2\" x 2\" mosaic sheet", 1.0, 0.0, 0.0, 0.45, 0.25, 10, TileCategory::Mosaic),
    TileRow("hexagon-8", "8\" hexagon", 0.35, 0.0, 8.0, 0.5, 0.12, 25, TileCategory::Special),
];

pub(crate) fn builtin_tile_sizes() -> Vec<TileSize> {
    TILE_ROWS
        .iter()
        .map(|TileRow(id, name, sqft, clips, spacers, thinset, grout, per_box, category)| TileSize {
            id: id.to_string(),
            name: name.to_string(),
            sqft_per_piece: *sqft,
            clips_per_sqft: *clips,
            spacers_per_sqft: *spacers,
            thinset_per_sqft: *thinset,
            grout_per_sqft: *grout,
            pieces_per_box: *per_box,
            category: *category,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_free_shapes() {
        for tile in builtin_tile_sizes() {
            if matches!(tile.category, TileCategory::Subway | TileCategory::Mosaic | TileCategory::Special) {
                assert_eq!(tile.clips_per_sqft, 0.0, "{} should not use clips", tile.id);
            }
            if matches!(tile.category, TileCategory::Rectangular | TileCategory::LargeFormat | TileCategory::Plank) {
                assert_eq!(tile.spacers_per_sqft, 0.0, "{} should not use spacers", tile.id);
            }
        }
    }

    #[test]
    fn test_positive_piece_area() {
        for tile in builtin_tile_sizes() {
            assert!(tile.sqft_per_piece > 0.0);
            assert!(tile.pieces_per_box > 0);
        }
    }
}
