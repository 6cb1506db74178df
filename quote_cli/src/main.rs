//! # Tilequote CLI
//!
//! Terminal front end over `quote_core`: browse the catalog, run material
//! estimates, and total up saved quote drafts.
//!
//! Set `RUST_LOG` (or pass `-v`) to see engine logging.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use quote_core::catalog::{catalog, PriceSpec, PriceType};
use quote_core::file_io::{load_draft_with_lock_check, save_draft, DraftLock};
use quote_core::materials::estimate_for_subcategory;
use quote_core::quote::QuoteDraft;
use quote_core::units::Dollars;

#[derive(Parser, Debug)]
#[command(name = "quote_cli")]
#[command(about = "Tilequote - contractor quote pricing and material estimates")]
#[command(version)]
struct Args {
    /// Show engine debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List categories, subcategories and suggested add-ons
    Catalog,

    /// List tile sizes and their material coefficients
    Tiles,

    /// Estimate materials for a subcategory
    Estimate {
        /// Subcategory id, e.g. "tile-floor"
        #[arg(long)]
        subcategory: String,

        /// Area in square feet
        #[arg(long)]
        area: f64,

        /// Tile size id, e.g. "12x24"
        #[arg(long, value_name = "ID")]
        tile_size: Option<String>,

        /// Print the estimate as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print line items, totals and bill of materials for a draft
    Totals {
        /// Draft file
        draft: PathBuf,
    },

    /// Create an empty draft file
    New {
        /// Draft file to create
        draft: PathBuf,

        /// Customer name
        #[arg(long)]
        customer: String,

        /// Contractor name shown on the quote
        #[arg(long)]
        contractor: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Catalog => print_catalog(),
        Command::Tiles => print_tiles(),
        Command::Estimate {
            subcategory,
            area,
            tile_size,
            json,
        } => print_estimate(&subcategory, area, tile_size.as_deref(), json)?,
        Command::Totals { draft } => print_totals(&draft)?,
        Command::New {
            draft,
            customer,
            contractor,
        } => create_draft(&draft, customer, contractor)?,
    }
    Ok(())
}

fn describe_pricing(pricing: &PriceSpec) -> String {
    let range = pricing.range();
    let amount = |v: f64| match pricing.price_type() {
        PriceType::Percent => format!("{v}%"),
        price_type => format!("${v}/{}", price_type.unit_label()),
    };
    match range.max {
        Some(max) => format!("{} - {}", amount(range.min), amount(max)),
        None => amount(range.min),
    }
}

fn print_catalog() {
    for category in &catalog().categories {
        println!("{} [{}]", category.name, category.id);
        for sub in &category.subcategories {
            let base = sub
                .base_price
                .map(|p| format!(" base ${p}/sqft"))
                .unwrap_or_default();
            let tile = if sub.requires_tile_size { " (tile size required)" } else { "" };
            println!("  {} [{}]{}{}", sub.name, sub.id, base, tile);
            for addon in &sub.addons {
                println!(
                    "    - {:<28} {:<18} {:?}",
                    addon.name,
                    describe_pricing(&addon.pricing),
                    addon.addon_type
                );
            }
        }
    }
}

fn print_tiles() {
    println!(
        "{:<12} {:<22} {:>8} {:>6} {:>8} {:>8} {:>7} {:>5}",
        "id", "name", "sqft/pc", "clips", "spacers", "thinset", "grout", "box"
    );
    for tile in &catalog().tile_sizes {
        println!(
            "{:<12} {:<22} {:>8.3} {:>6} {:>8} {:>8} {:>7} {:>5}",
            tile.id,
            tile.name,
            tile.sqft_per_piece,
            tile.clips_per_sqft,
            tile.spacers_per_sqft,
            tile.thinset_per_sqft,
            tile.grout_per_sqft,
            tile.pieces_per_box
        );
    }
}

fn print_estimate(subcategory_id: &str, area: f64, tile_size: Option<&str>, json: bool) -> Result<()> {
    let (category, subcategory) = catalog()
        .find_subcategory(subcategory_id)
        .ok_or_else(|| eyre!("unknown subcategory '{subcategory_id}'"))?;
    tracing::debug!(category = %category.id, subcategory = %subcategory.id, area, "estimating materials");
    let lines = estimate_for_subcategory(&category.id, &subcategory.id, tile_size, area)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&lines)?);
        return Ok(());
    }

    println!("{} / {} - {} sqft", category.name, subcategory.name, area);
    if lines.is_empty() {
        println!("  no materials tracked for this subcategory");
        return Ok(());
    }
    for line in &lines {
        match line.unit_price {
            Some(_) => println!("  {:<36} ~{}", line.label(), Dollars(line.estimated_cost())),
            None => println!("  {}", line.label()),
        }
    }
    let cost: f64 = lines.iter().map(|l| l.estimated_cost()).sum();
    println!("  Estimated material cost (not added to quote): {}", Dollars(cost));
    Ok(())
}

fn print_totals(path: &Path) -> Result<()> {
    let (draft, lock) =
        load_draft_with_lock_check(path).wrap_err_with(|| format!("loading {}", path.display()))?;
    if let Some(lock) = lock {
        eprintln!("note: {} is open by {}", path.display(), lock.describe());
    }

    println!("Quote for {}", draft.customer.name);
    for item in &draft.items {
        println!("  {:<32} {:>12}", item.item_name, Dollars(item.line_total).to_string());
        for addon in item.addons.iter().filter(|a| !a.is_material()) {
            println!("    + {:<28} {:>12}", addon.name, Dollars(addon.price).to_string());
        }
    }

    let totals = draft.totals();
    println!("  {:<32} {:>12}", "Subtotal", Dollars(totals.subtotal).to_string());
    if draft.customer_provides_materials {
        println!("  {:<32} {:>12}", "Materials", "by customer");
    } else {
        println!("  {:<32} {:>12}", "Materials", Dollars(draft.material_cost).to_string());
    }
    println!("  {:<32} {:>12}", "Total", Dollars(totals.total).to_string());

    let bom = draft.bill_of_materials();
    if !bom.is_empty() {
        println!();
        println!("Bill of materials");
        for line in bom {
            println!("  {:<24} {} {}", line.name, line.quantity, line.unit);
        }
    }
    Ok(())
}

fn create_draft(path: &Path, customer: String, contractor: Option<String>) -> Result<()> {
    if path.exists() {
        return Err(eyre!("{} already exists", path.display()));
    }
    let holder = std::env::var("USER").unwrap_or_else(|_| "quote_cli".to_string());
    let lock = DraftLock::acquire(path, holder)?;
    tracing::debug!(holder = %lock.info.holder, "holding draft lock");

    let mut draft = QuoteDraft::new(customer);
    if let Some(contractor) = contractor {
        draft.settings.contractor_name = contractor;
    }
    save_draft(&draft, path)?;
    println!("Created {} ({})", path.display(), draft.meta.id);
    Ok(())
}
