//! printquote - price 3D prints and manage customer quotes from the terminal.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use quote_core::calculations::{calculate, evaluate, CostBreakdown, PieceInput, SmallPieceAdvisory};
use quote_core::file_io::{export_config, import_config, load_quote, save_quote};
use quote_core::overhead::{OverheadConfig, OverheadPatch};
use quote_core::pdf::render_quote_pdf;
use quote_core::presets::{limits, FilamentType, Marketplace, PrinterModel, ProjectPreset};
use quote_core::quote::Quote;
use quote_core::time::{from_decimal_hours, to_decimal_hours};
use quote_core::units::MaterialAmount;
use quote_core::errors::ValidationError;
use quote_core::ledger::check_adjustments;
use quote_core::validate;

/// Price 3D-printed pieces and build customer quotes.
#[derive(Parser, Debug)]
#[command(name = "printquote")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price a single piece without saving it
    Price {
        #[command(flatten)]
        piece: PieceArgs,

        /// Overhead rates from an exported config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the breakdown as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an empty quote file
    New {
        file: PathBuf,

        /// Client name
        #[arg(short, long, default_value = "")]
        client: String,

        /// Company name printed in the header
        #[arg(long)]
        company: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Price a piece and add it to a quote
    Add {
        file: PathBuf,

        #[command(flatten)]
        piece: PieceArgs,

        /// Use the suggested minimum batch as the quantity
        #[arg(long)]
        apply_advisory: bool,
    },

    /// Change the quantity of a line item
    SetQty {
        file: PathBuf,
        /// Line item id (or the suffix shown by `show`)
        id: String,
        quantity: u32,
    },

    /// Remove a line item
    Remove { file: PathBuf, id: String },

    /// Take a line item out of the quote and print its input as JSON
    Edit { file: PathBuf, id: String },

    /// Remove every line item
    Clear { file: PathBuf },

    /// List line items and totals
    Show {
        file: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Render a quote to PDF
    Pdf {
        file: PathBuf,

        /// Output path (defaults to the quote path with a .pdf extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Overhead configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// List filament, printer, marketplace and project preset codes
    Presets,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write overhead rates to a JSON file
    Export {
        output: PathBuf,

        /// Export the rates of this quote instead of the defaults
        #[arg(long)]
        quote: Option<PathBuf>,
    },

    /// Replace a quote's overhead rates with an exported config
    Import { config: PathBuf, quote: PathBuf },

    /// Change individual overhead rates of a quote
    Set {
        quote: PathBuf,

        #[arg(long)]
        electricity_rate: Option<f64>,
        #[arg(long)]
        labor_rate: Option<f64>,
        #[arg(long)]
        profit_margin: Option<f64>,
        #[arg(long)]
        machine_wear_rate: Option<f64>,
        #[arg(long)]
        spool_wear_rate: Option<f64>,
    },
}

/// Piece parameters shared by `price` and `add`.
#[derive(Args, Debug)]
struct PieceArgs {
    /// Piece name
    #[arg(short, long)]
    name: Option<String>,

    /// Start from a project preset (keychain, decorative, functional, prototype)
    #[arg(long)]
    preset: Option<String>,

    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    quantity: u32,

    /// Print time hours
    #[arg(long)]
    hours: Option<u32>,
    /// Print time minutes (values above 59 are clamped)
    #[arg(long)]
    minutes: Option<u32>,
    /// Print time seconds (values above 59 are clamped)
    #[arg(long)]
    seconds: Option<u32>,

    /// Filament used, in meters
    #[arg(long, conflicts_with = "grams")]
    meters: Option<f64>,
    /// Filament used, in grams
    #[arg(long)]
    grams: Option<f64>,

    /// Filament code (pla, pla+, pla-cf, abs, petg, tpu, asa, wood)
    #[arg(long, default_value = "pla")]
    filament: String,
    /// Custom filament density in g/cm³ (overrides --filament)
    #[arg(long)]
    density: Option<f64>,

    /// Printer code (k1c, bambu_x1, prusa_mk3s, ...)
    #[arg(long)]
    printer: Option<String>,
    /// Printer power draw in watts (overrides --printer)
    #[arg(long)]
    watts: Option<f64>,

    /// Cost of a 1000 g spool
    #[arg(long)]
    spool_cost: Option<f64>,

    /// Extra cost per copy (inserts, paint, packaging)
    #[arg(long)]
    extra: Option<f64>,

    /// Sales channel code (direct, paypal, ml_basic, ...)
    #[arg(long)]
    marketplace: Option<String>,
    /// Commission in percent (overrides --marketplace)
    #[arg(long)]
    commission: Option<f64>,

    /// Waste allowance in percent
    #[arg(long, default_value_t = limits::DEFAULT_WASTE_PERCENT)]
    waste: f64,
}

impl PieceArgs {
    fn to_piece(&self) -> Result<PieceInput> {
        let filament = FilamentType::from_code(&self.filament)
            .with_context(|| format!("Unknown filament '{}'", self.filament))?;
        let printer = self
            .printer
            .as_deref()
            .map(|code| PrinterModel::from_code(code).with_context(|| format!("Unknown printer '{}'", code)))
            .transpose()?;

        let mut piece = match &self.preset {
            Some(code) => {
                let preset = ProjectPreset::from_code(code).with_context(|| format!("Unknown preset '{}'", code))?;
                PieceInput::from_preset(preset, filament, printer.unwrap_or(PrinterModel::CrealityK1C))?
            }
            None => {
                let piece = PieceInput::new("", 0.0, 0.0, 0.0, 0.0).with_filament(filament);
                match printer {
                    Some(printer) => piece.with_printer(printer),
                    None => piece,
                }
            }
        };

        if let Some(name) = &self.name {
            piece.name = quote_core::calculations::price::sanitize_name(name);
        }
        piece.quantity = self.quantity;

        if self.hours.is_some() || self.minutes.is_some() || self.seconds.is_some() {
            piece.time_hours = to_decimal_hours(
                self.hours.unwrap_or(0),
                self.minutes.unwrap_or(0),
                self.seconds.unwrap_or(0),
            );
        }

        if let Some(density) = self.density {
            let (min, max) = limits::DENSITY_RANGE;
            if density < min || density > max {
                warn!("Density {} g/cm³ is outside the usual range {}-{}", density, min, max);
            }
            piece = piece.with_density(density);
        }

        let amount = match (self.meters, self.grams) {
            (Some(m), _) => Some(MaterialAmount::Meters(m)),
            (None, Some(g)) => Some(MaterialAmount::Grams(g)),
            (None, None) => None,
        };
        if let Some(amount) = amount {
            piece = piece.with_material(amount)?;
        }

        if let Some(watts) = self.watts {
            piece.wattage = watts;
        }
        if let Some(spool_cost) = self.spool_cost {
            piece.spool_cost = spool_cost;
        }
        if let Some(extra) = self.extra {
            piece.extra_cost = extra;
        }

        let marketplace = self
            .marketplace
            .as_deref()
            .map(|code| Marketplace::from_code(code).with_context(|| format!("Unknown marketplace '{}'", code)))
            .transpose()?
            .unwrap_or_default();
        let commission = self.commission.unwrap_or(marketplace.commission_percent());
        warn_out_of_range("Commission", commission, limits::COMMISSION_PERCENT_RANGE);
        warn_out_of_range("Waste", self.waste, limits::WASTE_PERCENT_RANGE);

        Ok(piece.with_commission(commission).with_waste(self.waste))
    }

    /// Flag to fix for a validation failure, following the flags given
    fn flag_for(&self, error: ValidationError) -> &'static str {
        match error {
            ValidationError::NameRequired => "name",
            ValidationError::TimeRequired => "hours",
            ValidationError::MaterialRequired => match (self.density, self.grams) {
                (Some(density), _) if !(density.is_finite() && density > 0.0) => "density",
                (_, Some(_)) => "grams",
                _ => "meters",
            },
            ValidationError::CostRequired => "spool-cost",
            ValidationError::PrinterRequired => "watts",
        }
    }
}

fn warn_out_of_range(label: &str, value: f64, (min, max): (f64, f64)) {
    if value < min || value > max {
        warn!("{} {}% is outside the usual range {}-{}%", label, value, min, max);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Command::Price { piece, config, json } => cmd_price(&piece, config.as_deref(), json),
        Command::New {
            file,
            client,
            company,
            force,
        } => cmd_new(&file, client, company, force),
        Command::Add {
            file,
            piece,
            apply_advisory,
        } => cmd_add(&file, &piece, apply_advisory),
        Command::SetQty { file, id, quantity } => cmd_set_qty(&file, &id, quantity),
        Command::Remove { file, id } => cmd_remove(&file, &id),
        Command::Edit { file, id } => cmd_edit(&file, &id),
        Command::Clear { file } => cmd_clear(&file),
        Command::Show { file, json } => cmd_show(&file, json),
        Command::Pdf { file, output } => cmd_pdf(&file, output),
        Command::Config(command) => cmd_config(command),
        Command::Presets => {
            print_presets();
            Ok(())
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

fn open(path: &Path) -> Result<Quote> {
    load_quote(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn save(quote: &Quote, path: &Path) -> Result<()> {
    save_quote(quote, path).with_context(|| format!("Failed to save {}", path.display()))
}

fn resolve_id(quote: &Quote, id: &str) -> Result<Uuid> {
    match quote.find_item(id) {
        Some(item) => Ok(item.id),
        None => bail!("No unique line item matches '{}'", id),
    }
}

fn cmd_price(args: &PieceArgs, config: Option<&Path>, json: bool) -> Result<()> {
    let overhead = match config {
        Some(path) => import_config(path).with_context(|| format!("Failed to import {}", path.display()))?,
        None => OverheadConfig::default(),
    };

    let piece = args.to_piece()?;
    if let Err(e) = validate(&piece) {
        bail!("{} (--{})", e, args.flag_for(e));
    }
    check_adjustments(&piece)?;

    let breakdown = calculate(&piece, &overhead);
    let advisory = evaluate(breakdown.final_unit_price, piece.time_hours, breakdown.grams_used);

    if json {
        let output = serde_json::json!({
            "piece": piece,
            "breakdown": breakdown,
            "advisory": advisory,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_breakdown(&piece, &breakdown);
    if let Some(advisory) = &advisory {
        print_advisory(advisory);
    }
    Ok(())
}

fn cmd_new(path: &Path, client: String, company: Option<String>, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let mut quote = Quote::new(client);
    if let Some(company) = company {
        quote.meta.company.name = company;
    }
    save(&quote, path)?;
    info!("Created {}", path.display());
    Ok(())
}

fn cmd_add(path: &Path, args: &PieceArgs, apply_advisory: bool) -> Result<()> {
    let mut quote = open(path)?;
    let mut piece = args.to_piece()?;

    if apply_advisory {
        if validate(&piece).is_ok() {
            let breakdown = calculate(&piece, &quote.overhead);
            if let Some(advisory) = evaluate(breakdown.final_unit_price, piece.time_hours, breakdown.grams_used) {
                info!(
                    "Applying suggested batch of {} ({}% discount)",
                    advisory.minimum_quantity, advisory.volume_discount_percent
                );
                piece.apply_advisory(&advisory);
            }
        }
    }

    let item = match quote.add_piece(piece) {
        Ok(item) => item,
        Err(quote_core::QuoteError::Validation(e)) => bail!("{} (--{})", e, args.flag_for(e)),
        Err(e) => return Err(e.into()),
    };
    info!(
        "Added '{}' x{}: {:.2} each, {:.2} total [{}]",
        item.name,
        item.quantity,
        item.unit_price(),
        item.total_price(),
        short_id(&item.id.to_string())
    );
    if item.quantity > limits::QUANTITY_DISPLAY_MAX {
        warn!("Quantity {} exceeds {}", item.quantity, limits::QUANTITY_DISPLAY_MAX);
    }
    if let Some(advisory) = &item.advisory {
        if !apply_advisory {
            print_advisory(advisory);
        }
    }

    save(&quote, path)
}

fn cmd_set_qty(path: &Path, id: &str, quantity: u32) -> Result<()> {
    let mut quote = open(path)?;
    let id = resolve_id(&quote, id)?;
    if quantity > limits::QUANTITY_DISPLAY_MAX {
        warn!("Quantity {} exceeds {}", quantity, limits::QUANTITY_DISPLAY_MAX);
    }
    quote.update_quantity(id, quantity)?;
    info!("Grand total: {:.2}", quote.ledger.grand_total());
    save(&quote, path)
}

fn cmd_remove(path: &Path, id: &str) -> Result<()> {
    let mut quote = open(path)?;
    let id = resolve_id(&quote, id)?;
    let item = quote.remove_piece(id)?;
    info!("Removed '{}'; grand total: {:.2}", item.name, quote.ledger.grand_total());
    save(&quote, path)
}

fn cmd_edit(path: &Path, id: &str) -> Result<()> {
    let mut quote = open(path)?;
    let id = resolve_id(&quote, id)?;
    let piece = quote.edit_piece(id)?;
    println!("{}", serde_json::to_string_pretty(&piece)?);
    save(&quote, path)
}

fn cmd_clear(path: &Path) -> Result<()> {
    let mut quote = open(path)?;
    let count = quote.ledger.len();
    quote.clear();
    info!("Removed {} line items", count);
    save(&quote, path)
}

fn cmd_show(path: &Path, json: bool) -> Result<()> {
    let quote = open(path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
        return Ok(());
    }

    let currency = &quote.meta.company.currency;
    println!("{} - quote for {}", quote.meta.company.name, display_or_dash(&quote.meta.client));
    println!();

    if quote.ledger.is_empty() {
        println!("  (no pieces)");
        return Ok(());
    }

    println!(
        "  {:<12} {:<28} {:>5} {:>12} {:>10} {:>12}",
        "ID", "Piece", "Qty", "Time", "Unit", "Total"
    );
    println!("  {}", "-".repeat(84));
    for item in quote.ledger.items() {
        println!(
            "  {:<12} {:<28} {:>5} {:>12} {:>10.2} {:>12.2}",
            short_id(&item.id.to_string()),
            truncate(&item.name, 28),
            item.quantity,
            item.print_time().to_string(),
            item.unit_price(),
            item.total_price()
        );
    }
    println!("  {}", "-".repeat(84));
    println!("  {:>71} {:>12.2} {}", "Grand total", quote.ledger.grand_total(), currency);

    let summary = quote.ledger.summary();
    println!();
    println!("  Total pieces:  {}", summary.total_pieces);
    println!("  Print time:    {}", from_decimal_hours(summary.total_print_hours));
    println!("  Filament:      {:.1} g", summary.total_grams);
    println!("  Average price: {:.2} {}", summary.average_price, currency);
    Ok(())
}

fn cmd_pdf(path: &Path, output: Option<PathBuf>) -> Result<()> {
    let quote = open(path)?;
    let bytes = render_quote_pdf(&quote).context("Failed to render PDF")?;

    let output_path = output.unwrap_or_else(|| path.with_extension("pdf"));
    std::fs::write(&output_path, &bytes)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    info!("Generated: {}", output_path.display());
    Ok(())
}

fn cmd_config(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Export { output, quote } => {
            let config = match quote {
                Some(path) => open(&path)?.overhead,
                None => OverheadConfig::default(),
            };
            export_config(&config, &output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!("Exported overhead config to {}", output.display());
            Ok(())
        }
        ConfigCommand::Import { config, quote: quote_path } => {
            let imported = import_config(&config).with_context(|| format!("Failed to import {}", config.display()))?;
            let mut quote = open(&quote_path)?;
            quote.overhead = imported;
            quote.touch();
            save(&quote, &quote_path)?;
            info!("Imported overhead config into {}", quote_path.display());
            Ok(())
        }
        ConfigCommand::Set {
            quote: quote_path,
            electricity_rate,
            labor_rate,
            profit_margin,
            machine_wear_rate,
            spool_wear_rate,
        } => {
            let patch = OverheadPatch {
                electricity_rate,
                labor_rate,
                profit_margin_percent: profit_margin,
                machine_wear_rate,
                spool_wear_rate,
            };
            if patch.is_empty() {
                bail!("Nothing to change; pass at least one rate");
            }
            let mut quote = open(&quote_path)?;
            quote.overhead.merge(&patch)?;
            quote.touch();
            save(&quote, &quote_path)?;
            println!("{}", quote.overhead.to_json()?);
            Ok(())
        }
    }
}

// ============================================================================
// Output Helpers
// ============================================================================

fn print_breakdown(piece: &PieceInput, b: &CostBreakdown) {
    println!("{} x{}", display_or_dash(&piece.name), piece.quantity);
    println!("  Time:      {}", from_decimal_hours(piece.time_hours));
    println!("  Material:  {}", piece.material_text);
    println!("  Printer:   {} ({:.0} W)", piece.printer_name, piece.wattage);
    println!("  Filament:  {:.2} g ({:.2} g with waste)", b.grams_used, b.grams_with_waste);
    println!();
    println!("  Electricity   {:>10.2}", b.electricity_cost);
    println!("  Filament      {:>10.2}", b.filament_cost);
    println!("  Labor         {:>10.2}", b.labor_cost);
    println!("  Machine wear  {:>10.2}", b.machine_wear_cost);
    println!("  Spool wear    {:>10.2}", b.spool_wear_cost);
    println!("  Extra         {:>10.2}", b.extra_cost);
    println!("  Base cost     {:>10.2}", b.base_cost);
    println!("  With margin   {:>10.2}", b.price_with_margin);
    println!("  Unit price    {:>10.2}", b.final_unit_price);
    println!("  Total         {:>10.2}", b.total_price);
}

fn print_advisory(a: &SmallPieceAdvisory) {
    println!();
    println!("Small piece: market target is {:.2} per unit (currently {:.2}).", a.target_price, a.current_price);
    println!(
        "  Suggest a minimum of {} units at {:.0}% off: {:.2} each (saves {:.2})",
        a.minimum_quantity, a.volume_discount_percent, a.discounted_unit_price, a.total_savings
    );
}

fn print_presets() {
    println!("Filaments:");
    for f in FilamentType::ALL {
        println!("  {:<10} {}", f.code(), f.display_name());
    }
    println!("Printers:");
    for p in PrinterModel::ALL {
        println!("  {:<20} {} ({:.0} W)", p.code(), p.display_name(), p.watts());
    }
    println!("Marketplaces:");
    for m in Marketplace::ALL {
        println!("  {:<12} {:.2}%", m.code(), m.commission_percent());
    }
    println!("Project presets:");
    for p in ProjectPreset::ALL {
        let v = p.values();
        println!("  {:<12} {} ({}h {}m, {})", p.code(), v.name, v.hours, v.minutes, v.material);
    }
}


/// Tail of a UUID holding its random bits
fn short_id(id: &str) -> &str {
    &id[id.len().saturating_sub(12)..]
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max - 1).collect();
        out.push('…');
        out
    }
}

fn display_or_dash(s: &str) -> &str {
    if s.trim().is_empty() {
        "-"
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece_args(extra: &[&str]) -> PieceArgs {
        let mut argv = vec!["printquote", "price"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Price { piece, .. } => piece,
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_material_hint_follows_given_flag() {
        let args = piece_args(&["--grams", "0"]);
        assert_eq!(args.flag_for(ValidationError::MaterialRequired), "grams");

        let args = piece_args(&["--meters", "0"]);
        assert_eq!(args.flag_for(ValidationError::MaterialRequired), "meters");

        let args = piece_args(&[]);
        assert_eq!(args.flag_for(ValidationError::MaterialRequired), "meters");
    }

    #[test]
    fn test_material_hint_points_at_bad_density() {
        let args = piece_args(&["--grams", "20", "--density", "0"]);
        assert_eq!(args.flag_for(ValidationError::MaterialRequired), "density");

        let args = piece_args(&["--meters", "5", "--density", "1.3"]);
        assert_eq!(args.flag_for(ValidationError::MaterialRequired), "meters");
    }

    #[test]
    fn test_other_hints() {
        let args = piece_args(&[]);
        assert_eq!(args.flag_for(ValidationError::NameRequired), "name");
        assert_eq!(args.flag_for(ValidationError::TimeRequired), "hours");
        assert_eq!(args.flag_for(ValidationError::CostRequired), "spool-cost");
        assert_eq!(args.flag_for(ValidationError::PrinterRequired), "watts");
    }

    #[test]
    fn test_zero_quantity_rejected() {
        assert!(Cli::try_parse_from(["printquote", "price", "--quantity", "0"]).is_err());
        assert_eq!(piece_args(&["-q", "3"]).quantity, 3);
    }

    #[test]
    fn test_negative_extra_rejected_before_pricing() {
        let args = piece_args(&["-n", "Bracket", "--hours", "1", "--meters", "10", "--spool-cost", "500", "--watts", "120", "--extra=-500"]);
        let piece = args.to_piece().unwrap();
        assert_eq!(validate(&piece), Ok(()));
        assert_eq!(check_adjustments(&piece).unwrap_err().error_code(), "INVALID_INPUT");
    }
}
