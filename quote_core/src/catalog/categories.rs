//! Category Tree
//!
//! Built-in categories, subcategories and their suggested add-ons.
//! Every category ends with an "others" subcategory that carries no
//! suggestions and opens the custom add-on form.

use super::{
    AddonType, Category, MaterialKind, PriceRange, PriceSpec, Subcategory, SuggestedAddon,
    OTHERS_SUBCATEGORY_ID,
};

use AddonType::{Complexity, General, Material, Service};

fn addon(id: &str, name: &str, pricing: PriceSpec, addon_type: AddonType) -> SuggestedAddon {
    SuggestedAddon::new(id, name, pricing, addon_type)
}

fn sqft(min: f64, max: f64) -> PriceSpec {
    PriceSpec::Sqft(PriceRange::between(min, max))
}

fn unit(min: f64, max: f64) -> PriceSpec {
    PriceSpec::Unit(PriceRange::between(min, max))
}

fn ft(min: f64, max: f64) -> PriceSpec {
    PriceSpec::Ft(PriceRange::between(min, max))
}

fn step(min: f64, max: f64) -> PriceSpec {
    PriceSpec::Step(PriceRange::between(min, max))
}

fn percent(min: f64, max: f64) -> PriceSpec {
    PriceSpec::Percent(PriceRange::between(min, max))
}

/// Subcategory with a base rate
fn priced(id: &str, name: &str, base_price: f64, base_price_name: &str, addons: Vec<SuggestedAddon>) -> Subcategory {
    Subcategory {
        id: id.to_string(),
        name: name.to_string(),
        addons,
        requires_tile_size: false,
        base_price: Some(base_price),
        base_price_name: Some(base_price_name.to_string()),
        material_kind: None,
    }
}

fn tiled(mut sub: Subcategory, kind: MaterialKind) -> Subcategory {
    sub.requires_tile_size = true;
    sub.material_kind = Some(kind);
    sub
}

fn with_materials(mut sub: Subcategory, kind: MaterialKind) -> Subcategory {
    sub.material_kind = Some(kind);
    sub
}

fn others() -> Subcategory {
    Subcategory {
        id: OTHERS_SUBCATEGORY_ID.to_string(),
        name: "Others".to_string(),
        addons: Vec::new(),
        requires_tile_size: false,
        base_price: None,
        base_price_name: None,
        material_kind: None,
    }
}

fn category(id: &str, name: &str, mut subcategories: Vec<Subcategory>) -> Category {
    subcategories.push(others());
    Category {
        id: id.to_string(),
        name: name.to_string(),
        subcategories,
    }
}

pub(crate) fn builtin_categories() -> Vec<Category> {
    vec![flooring(), bathroom(), kitchen(), painting(), drywall()]
}

fn flooring() -> Category {
    category(
        "flooring",
        "Flooring",
        vec![
            tiled(
                priced(
                    "tile-floor",
                    "Tile Floor",
                    6.0,
                    "Tile installation",
                    vec![
                        addon("floor-demo", "Demolition & Removal", sqft(1.5, 3.0), Service),
                        addon("floor-leveling", "Self-Leveling Compound", sqft(1.0, 2.5), Service),
                        addon("heated-floor", "Heated Floor System", sqft(10.0, 15.0), General),
                        addon("diagonal-pattern", "Diagonal / Herringbone Pattern", percent(10.0, 20.0), Complexity),
                        addon("threshold", "Threshold / Transition", unit(35.0, 60.0), General),
                        addon("baseboard-install", "Baseboard Installation", ft(3.0, 6.0), Service),
                        addon("grout-sealer", "Grout Sealer", PriceSpec::Unit(PriceRange::fixed(20.0)), Material),
                    ],
                ),
                MaterialKind::TileFloor,
            ),
            with_materials(
                priced(
                    "vinyl-plank",
                    "Vinyl Plank",
                    3.0,
                    "Vinyl plank installation",
                    vec![
                        addon("floor-demo", "Demolition & Removal", sqft(1.5, 3.0), Service),
                        addon("subfloor-prep", "Subfloor Preparation", sqft(0.75, 1.5), Service),
                        addon("baseboard-install", "Baseboard Installation", ft(3.0, 6.0), Service),
                        addon("transition", "Transition Strip", unit(25.0, 45.0), General),
                        addon("stair-nosing", "Stairs", step(40.0, 75.0), Complexity),
                    ],
                ),
                MaterialKind::VinylPlank,
            ),
            with_materials(
                priced(
                    "laminate",
                    "Laminate",
                    2.5,
                    "Laminate installation",
                    vec![
                        addon("floor-demo", "Demolition & Removal", sqft(1.5, 3.0), Service),
                        addon("baseboard-install", "Baseboard Installation", ft(3.0, 6.0), Service),
                        addon("transition", "Transition Strip", unit(25.0, 45.0), General),
                        addon("stair-nosing", "Stairs", step(40.0, 75.0), Complexity),
                    ],
                ),
                MaterialKind::Laminate,
            ),
            priced(
                "hardwood",
                "Hardwood",
                8.0,
                "Hardwood installation",
                vec![
                    addon("floor-demo", "Demolition & Removal", sqft(1.5, 3.0), Service),
                    addon("refinishing", "Sand & Refinish", sqft(3.0, 5.0), Service),
                    addon("stairs", "Stairs", step(75.0, 150.0), Complexity),
                    addon("pattern-upcharge", "Pattern Layout", percent(15.0, 25.0), Complexity),
                ],
            ),
        ],
    )
}

fn bathroom() -> Category {
    category(
        "bathroom",
        "Bathroom",
        vec![
            tiled(
                priced(
                    "shower-walls",
                    "Shower Walls",
                    12.0,
                    "Wall tile installation",
                    vec![
                        addon("shower-demo", "Demolition & Removal", sqft(2.0, 4.0), Service),
                        addon("waterproofing", "Waterproofing Membrane", sqft(2.0, 4.0), Service),
                        addon("shower-niche", "Shower Niche", unit(150.0, 300.0), General),
                        addon("shower-bench", "Shower Bench", unit(300.0, 600.0), General),
                        addon("accent-strip", "Mosaic Accent Strip", percent(15.0, 25.0), Complexity),
                        addon("grab-bar", "Grab Bar", PriceSpec::Unit(PriceRange::fixed(75.0)), General),
                        addon("edge-trim", "Edge Trim", ft(4.0, 8.0), General),
                    ],
                ),
                MaterialKind::TileWall,
            ),
            tiled(
                priced(
                    "tub-surround",
                    "Tub Surround",
                    10.0,
                    "Wall tile installation",
                    vec![
                        addon("shower-demo", "Demolition & Removal", sqft(2.0, 4.0), Service),
                        addon("waterproofing", "Waterproofing Membrane", sqft(2.0, 4.0), Service),
                        addon("shower-niche", "Shower Niche", unit(150.0, 300.0), General),
                        addon("edge-trim", "Edge Trim", ft(4.0, 8.0), General),
                    ],
                ),
                MaterialKind::TileWall,
            ),
            tiled(
                priced(
                    "bathroom-floor",
                    "Bathroom Floor",
                    7.0,
                    "Floor tile installation",
                    vec![
                        addon("floor-demo", "Demolition & Removal", sqft(1.5, 3.0), Service),
                        addon("heated-floor", "Heated Floor System", sqft(10.0, 15.0), General),
                        addon("toilet-reset", "Toilet Removal & Reset", unit(100.0, 175.0), Service),
                        addon("diagonal-pattern", "Diagonal / Herringbone Pattern", percent(10.0, 20.0), Complexity),
                    ],
                ),
                MaterialKind::TileFloor,
            ),
        ],
    )
}

fn kitchen() -> Category {
    category(
        "kitchen",
        "Kitchen",
        vec![tiled(
            priced(
                "backsplash",
                "Backsplash",
                15.0,
                "Backsplash installation",
                vec![
                    addon("backsplash-demo", "Remove Old Backsplash", sqft(2.0, 4.0), Service),
                    addon("outlet-cutouts", "Outlet Cutouts", unit(15.0, 25.0), Complexity),
                    addon("herringbone", "Herringbone Pattern", percent(15.0, 25.0), Complexity),
                    addon("edge-trim", "Edge Trim", ft(4.0, 8.0), General),
                ],
            ),
            MaterialKind::Backsplash,
        )],
    )
}

fn painting() -> Category {
    category(
        "painting",
        "Painting",
        vec![
            with_materials(
                priced(
                    "interior-walls",
                    "Interior Walls",
                    2.0,
                    "Wall painting",
                    vec![
                        addon("primer-coat", "Primer Coat", sqft(0.5, 1.0), Service),
                        addon("ceiling", "Ceiling Painting", sqft(1.5, 2.5), Service),
                        addon("trim-painting", "Trim Painting", ft(1.0, 2.0), Service),
                        addon("accent-wall", "Accent Wall", PriceSpec::Percent(PriceRange::fixed(10.0)), Complexity),
                        addon("high-ceilings", "High Ceilings", percent(15.0, 25.0), Complexity),
                        addon("drywall-patch", "Drywall Patch", unit(25.0, 75.0), Service),
                    ],
                ),
                MaterialKind::Paint,
            ),
            with_materials(
                priced(
                    "exterior-walls",
                    "Exterior Walls",
                    3.0,
                    "Exterior painting",
                    vec![
                        addon("pressure-wash", "Pressure Washing", sqft(0.25, 0.5), Service),
                        addon("scraping", "Scraping & Sanding", sqft(0.5, 1.0), Service),
                        addon("second-story", "Second Story", percent(15.0, 30.0), Complexity),
                    ],
                ),
                MaterialKind::Paint,
            ),
        ],
    )
}

fn drywall() -> Category {
    category(
        "drywall",
        "Drywall",
        vec![
            with_materials(
                priced(
                    "drywall-install",
                    "Drywall Installation",
                    2.5,
                    "Hang & finish",
                    vec![
                        addon("texture", "Wall Texture", sqft(0.75, 1.5), Service),
                        addon("corner-bead", "Corner Bead", ft(1.0, 2.0), General),
                        addon("level-5", "Level 5 Finish", percent(20.0, 30.0), Complexity),
                    ],
                ),
                MaterialKind::Drywall,
            ),
            with_materials(
                priced(
                    "drywall-repair",
                    "Drywall Repair",
                    4.0,
                    "Patch & finish",
                    vec![
                        addon("hole-patch", "Hole Patch", unit(50.0, 150.0), Service),
                        addon("texture-match", "Texture Matching", sqft(1.0, 2.0), Complexity),
                    ],
                ),
                MaterialKind::Drywall,
            ),
        ],
    )
}
