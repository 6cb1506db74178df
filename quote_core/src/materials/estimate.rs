//! Material Estimates
//!
//! Builds the list of materials a subcategory needs for a given area (and
//! tile size, for tiled work). Each estimate becomes a zero-priced material
//! add-on named like `"Thinset (2 bags)"`. [`material_names`] lists what each
//! kind can produce, so a re-run can clear the earlier estimate first.

use serde::{Deserialize, Serialize};

use crate::catalog::{catalog, Catalog, MaterialKind, TileSize};
use crate::errors::{QuoteError, QuoteResult};
use crate::pricing::Addon;

use super::calculator::{
    backsplash_silicone_tubes, clips_for, drywall_mud_buckets, drywall_sheets_needed,
    drywall_tape_rolls, flooring_boxes_needed, grout_bags_for, paint_gallons_needed,
    primer_gallons_needed, sealer_bottles_needed, silicone_tubes_needed, spacers_for,
    thinset_bags_for, tile_boxes_for, tile_pieces_for, trim_pieces_needed, underlayment_sqft,
    FlooringType, DEFAULT_PAINT_COATS,
};
use crate::units::SqFt;

/// One line of a material estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialEstimate {
    /// Material name without quantity, e.g. "Thinset"
    pub name: String,
    pub quantity: f64,
    /// Unit label, already pluralized for `quantity`
    pub unit: String,
    /// Catalog unit price, when the coverage table has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
}

impl MaterialEstimate {
    fn new(name: &str, quantity: f64, singular: &str, plural: &str) -> Self {
        let unit = if quantity == 1.0 { singular } else { plural };
        MaterialEstimate {
            name: name.to_string(),
            quantity,
            unit: unit.to_string(),
            unit_price: None,
        }
    }

    fn priced_from(mut self, catalog: &Catalog, coverage_id: &str) -> Self {
        self.unit_price = catalog.coverage(coverage_id).map(|c| c.price_per_unit);
        self
    }

    /// Display label, e.g. "Thinset (2 bags)"
    pub fn label(&self) -> String {
        format!("{} ({} {})", self.name, format_quantity(self.quantity), self.unit)
    }

    /// Informational cost at catalog prices; never part of the quote total
    pub fn estimated_cost(&self) -> f64 {
        self.unit_price.map_or(0.0, |p| p * self.quantity)
    }

    /// Zero-priced material add-on for this estimate
    pub fn to_addon(&self) -> Addon {
        Addon::material(self.label(), self.quantity, self.unit.clone())
    }
}

fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{:.0}", quantity)
    } else {
        format!("{:.1}", quantity)
    }
}

fn count(name: &str, quantity: u32, singular: &str, plural: &str) -> MaterialEstimate {
    MaterialEstimate::new(name, quantity as f64, singular, plural)
}

fn tile_lines(catalog: &Catalog, tile: &TileSize, area: f64) -> Vec<MaterialEstimate> {
    vec![
        count("Tile", tile_pieces_for(tile, area), "piece", "pieces"),
        count("Tile Boxes", tile_boxes_for(tile, area), "box", "boxes"),
        count("Leveling Clips", clips_for(tile, area), "clip", "clips"),
        count("Spacers", spacers_for(tile, area), "spacer", "spacers"),
        count("Thinset", thinset_bags_for(tile, area), "bag", "bags").priced_from(catalog, "thinset-bag"),
        count("Grout", grout_bags_for(tile, area), "bag", "bags").priced_from(catalog, "grout-bag"),
    ]
}

/// Every material name an estimate of this kind can produce.
///
/// Re-running an estimate clears add-ons with these base names first, so a
/// line that no longer applies (clips after switching to subway tile) does
/// not linger.
pub fn material_names(kind: MaterialKind) -> &'static [&'static str] {
    match kind {
        MaterialKind::TileFloor => {
            &["Tile", "Tile Boxes", "Leveling Clips", "Spacers", "Thinset", "Grout", "Grout Sealer"]
        }
        MaterialKind::TileWall | MaterialKind::Backsplash => {
            &["Tile", "Tile Boxes", "Leveling Clips", "Spacers", "Thinset", "Grout", "Silicone"]
        }
        MaterialKind::VinylPlank => &["Vinyl Plank", "Underlayment", "Trim"],
        MaterialKind::Laminate => &["Laminate", "Underlayment", "Trim"],
        MaterialKind::Paint => &["Paint", "Primer"],
        MaterialKind::Drywall => &["Drywall Sheets", "Drywall Mud", "Drywall Tape"],
    }
}

/// Materials for a kind of work at the given area.
///
/// Tile-dependent lines are omitted when no tile size is given. Lines with a
/// zero quantity are dropped.
pub fn estimate_materials(kind: MaterialKind, tile: Option<&TileSize>, area: f64) -> Vec<MaterialEstimate> {
    let catalog = catalog();
    let area = SqFt(area).sanitized().0;
    if area <= 0.0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    match kind {
        MaterialKind::TileFloor => {
            if let Some(tile) = tile {
                lines.extend(tile_lines(catalog, tile, area));
            }
            lines.push(
                count("Grout Sealer", sealer_bottles_needed(area), "bottle", "bottles")
                    .priced_from(catalog, "sealer"),
            );
        }
        MaterialKind::TileWall => {
            if let Some(tile) = tile {
                lines.extend(tile_lines(catalog, tile, area));
            }
            lines.push(
                count("Silicone", silicone_tubes_needed(SqFt(area).square_room_perimeter()), "tube", "tubes")
                    .priced_from(catalog, "silicone-tube"),
            );
        }
        MaterialKind::Backsplash => {
            if let Some(tile) = tile {
                lines.extend(tile_lines(catalog, tile, area));
            }
            lines.push(
                count("Silicone", backsplash_silicone_tubes(area), "tube", "tubes")
                    .priced_from(catalog, "silicone-tube"),
            );
        }
        MaterialKind::VinylPlank | MaterialKind::Laminate => {
            let (name, flooring) = if kind == MaterialKind::VinylPlank {
                ("Vinyl Plank", FlooringType::Vinyl)
            } else {
                ("Laminate", FlooringType::Laminate)
            };
            lines.push(
                count(name, flooring_boxes_needed(flooring, area), "box", "boxes")
                    .priced_from(catalog, flooring.coverage_id()),
            );
            lines.push(
                MaterialEstimate::new("Underlayment", underlayment_sqft(area), "sqft", "sqft")
                    .priced_from(catalog, "underlayment"),
            );
            lines.push(count("Trim", trim_pieces_needed(area), "piece", "pieces").priced_from(catalog, "trim-piece"));
        }
        MaterialKind::Paint => {
            lines.push(
                count("Paint", paint_gallons_needed(area, DEFAULT_PAINT_COATS), "gallon", "gallons")
                    .priced_from(catalog, "paint-gallon"),
            );
            lines.push(
                count("Primer", primer_gallons_needed(area), "gallon", "gallons")
                    .priced_from(catalog, "primer-gallon"),
            );
        }
        MaterialKind::Drywall => {
            lines.push(
                count("Drywall Sheets", drywall_sheets_needed(area), "sheet", "sheets")
                    .priced_from(catalog, "drywall-sheet"),
            );
            lines.push(
                count("Drywall Mud", drywall_mud_buckets(area), "bucket", "buckets")
                    .priced_from(catalog, "drywall-mud"),
            );
            lines.push(
                count("Drywall Tape", drywall_tape_rolls(area), "roll", "rolls")
                    .priced_from(catalog, "drywall-tape"),
            );
        }
    }

    lines.retain(|l| l.quantity > 0.0);
    lines
}

/// Materials for a catalog subcategory.
///
/// Fails when the subcategory or tile size id is unknown, or when the
/// subcategory requires a tile size and none was given. Subcategories with no
/// material kind produce an empty list.
pub fn estimate_for_subcategory(
    category_id: &str,
    subcategory_id: &str,
    tile_size_id: Option<&str>,
    area: f64,
) -> QuoteResult<Vec<MaterialEstimate>> {
    let catalog = catalog();
    let subcategory = catalog.require_subcategory(category_id, subcategory_id)?;
    let tile = tile_size_id.map(|id| catalog.require_tile_size(id)).transpose()?;

    if subcategory.requires_tile_size && tile.is_none() {
        return Err(QuoteError::invalid_input(
            "tile_size_id",
            "none",
            format!("'{}' requires a tile size", subcategory.name),
        ));
    }

    Ok(subcategory
        .material_kind
        .map(|kind| estimate_materials(kind, tile, area))
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn find<'a>(lines: &'a [MaterialEstimate], name: &str) -> Option<&'a MaterialEstimate> {
        lines.iter().find(|l| l.name == name)
    }

    #[test]
    fn test_tile_floor_estimate() {
        let lines = estimate_for_subcategory("flooring", "tile-floor", Some("12x24"), 100.0).unwrap();
        let names: Vec<&str> = lines.iter().map(|l| l.name.as_str()).collect();
        // 12x24 uses clips, no spacers
        assert_eq!(names, vec!["Tile", "Tile Boxes", "Leveling Clips", "Thinset", "Grout", "Grout Sealer"]);

        // 100 * 1.1 / 2.0 is just above 55
        let tile = find(&lines, "Tile").unwrap();
        assert_eq!(tile.quantity, 56.0);
        assert_eq!(tile.label(), "Tile (56 pieces)");

        // 100 * 0.6 = 60 lb -> 2 bags
        let thinset = find(&lines, "Thinset").unwrap();
        assert_eq!(thinset.label(), "Thinset (2 bags)");
        assert_eq!(thinset.estimated_cost(), 44.0);
    }

    #[test]
    fn test_backsplash_uses_backsplash_perimeter() {
        let lines = estimate_for_subcategory("kitchen", "backsplash", Some("3x6"), 25.0).unwrap();
        let silicone = find(&lines, "Silicone").unwrap();
        assert_eq!(silicone.label(), "Silicone (1 tube)");
        assert!(find(&lines, "Leveling Clips").is_none());
        assert_eq!(find(&lines, "Spacers").unwrap().quantity, 400.0);
    }

    #[test]
    fn test_vinyl_estimate() {
        let lines = estimate_for_subcategory("flooring", "vinyl-plank", None, 100.0).unwrap();
        assert_eq!(find(&lines, "Vinyl Plank").unwrap().label(), "Vinyl Plank (6 boxes)");
        assert_eq!(find(&lines, "Underlayment").unwrap().label(), "Underlayment (100 sqft)");
        assert_eq!(find(&lines, "Trim").unwrap().quantity, 5.0);
    }

    #[test]
    fn test_fractional_quantity_label() {
        let lines = estimate_materials(MaterialKind::Laminate, None, 80.5);
        assert_eq!(find(&lines, "Underlayment").unwrap().label(), "Underlayment (80.5 sqft)");
    }

    #[test]
    fn test_tile_required() {
        let err = estimate_for_subcategory("bathroom", "shower-walls", None, 60.0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let err = estimate_for_subcategory("bathroom", "shower-walls", Some("9x9"), 60.0).unwrap_err();
        assert_eq!(err.error_code(), "CATALOG_NOT_FOUND");
    }

    #[test]
    fn test_no_material_kind_or_area() {
        assert!(estimate_for_subcategory("flooring", "hardwood", None, 100.0).unwrap().is_empty());
        assert!(estimate_for_subcategory("flooring", "vinyl-plank", None, 0.0).unwrap().is_empty());
    }

    #[test]
    fn test_material_names_cover_every_line() {
        let kinds = [
            MaterialKind::TileFloor,
            MaterialKind::TileWall,
            MaterialKind::Backsplash,
            MaterialKind::VinylPlank,
            MaterialKind::Laminate,
            MaterialKind::Paint,
            MaterialKind::Drywall,
        ];
        for kind in kinds {
            let names = material_names(kind);
            for tile in catalog().tile_sizes.iter().map(Some).chain([None]) {
                for area in [1.0, 37.0, 100.0, 640.0] {
                    for line in estimate_materials(kind, tile, area) {
                        assert!(
                            names.contains(&line.name.as_str()),
                            "{:?} produced unlisted line {}",
                            kind,
                            line.name
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_to_addon_is_zero_priced_material() {
        let lines = estimate_materials(MaterialKind::Paint, None, 400.0);
        let addon = find(&lines, "Paint").unwrap().to_addon();
        assert!(addon.is_material());
        assert_eq!(addon.price, 0.0);
        assert_eq!(addon.name, "Paint (3 gallons)");
        assert_eq!(addon.base_name(), "Paint");
        assert_eq!(addon.quantity, Some(3.0));
    }
}
