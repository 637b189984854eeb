//! # Price Calculation
//!
//! Turns one piece's print parameters plus the shop overhead into a cost
//! breakdown and a final price.
//!
//! ## Method
//!
//! ```text
//! electricity  = wattage * hours / 1000 * electricity_rate
//! grams        = meters_to_grams(length, density)
//! grams_waste  = grams * (1 + waste% / 100)
//! filament     = grams_waste / 1000 * spool_cost
//! labor        = hours * labor_rate
//! machine_wear = hours * machine_wear_rate
//! spool_wear   = grams_waste / 100 * spool_wear_rate
//! base         = labor + filament + electricity + machine_wear + spool_wear + extra
//! with_margin  = base * (1 + margin% / 100)
//! unit_price   = with_margin * (1 + commission% / 100)
//! total        = unit_price * quantity
//! ```
//!
//! No rounding is applied; values are rounded only for display.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::calculations::price::{calculate, PieceInput};
//! use quote_core::overhead::OverheadConfig;
//!
//! let piece = PieceInput::new("Bracket", 1.5, 120.0, 500.0, 10.0);
//! let breakdown = calculate(&piece, &OverheadConfig::default());
//! assert!((breakdown.final_unit_price - 93.8485).abs() < 1e-3);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::QuoteResult;
use crate::overhead::OverheadConfig;
use crate::presets::{limits, FilamentType, PrinterModel, ProjectPreset};
use crate::time::to_decimal_hours;
use crate::units::{meters_to_grams, MaterialAmount, SPOOL_WEIGHT_G};

use super::advisor::SmallPieceAdvisory;

/// Input parameters for pricing one piece.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "Bracket",
///   "quantity": 4,
///   "time_hours": 1.5,
///   "wattage": 120.0,
///   "spool_cost": 500.0,
///   "length_used_meters": 10.0,
///   "extra_cost": 0.0,
///   "commission_percent": 0.0,
///   "waste_percent": 10.0,
///   "filament_density": 1.24,
///   "filament_label": "PLA (1.24 g/cm³)",
///   "printer_name": "Creality K1C",
///   "material_text": "10m PLA (1.24 g/cm³)"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceInput {
    /// Piece name shown on the quote
    pub name: String,

    /// Number of copies
    pub quantity: u32,

    /// Print time in decimal hours
    pub time_hours: f64,

    /// Printer average power draw in watts
    pub wattage: f64,

    /// Cost of a standard 1000 g spool
    pub spool_cost: f64,

    /// Filament length per copy in meters
    pub length_used_meters: f64,

    /// Flat extra cost per copy (inserts, paint, packaging)
    pub extra_cost: f64,

    /// Marketplace commission in percent
    pub commission_percent: f64,

    /// Extra filament budgeted for failures and purging, in percent
    pub waste_percent: f64,

    /// Filament density in g/cm³
    pub filament_density: f64,

    /// Filament label for display
    pub filament_label: String,

    /// Printer label for display
    pub printer_name: String,

    /// Material usage as the user entered it, for display
    pub material_text: String,
}

impl PieceInput {
    /// Create a piece of PLA with quantity 1, 10% waste and no extras.
    ///
    /// The name is trimmed and truncated to the maximum name length.
    pub fn new(
        name: impl Into<String>,
        time_hours: f64,
        wattage: f64,
        spool_cost: f64,
        length_used_meters: f64,
    ) -> Self {
        let filament = FilamentType::default();
        PieceInput {
            name: sanitize_name(&name.into()),
            quantity: 1,
            time_hours,
            wattage,
            spool_cost,
            length_used_meters,
            extra_cost: 0.0,
            commission_percent: 0.0,
            waste_percent: limits::DEFAULT_WASTE_PERCENT,
            filament_density: filament.density(),
            filament_label: filament.display_name(),
            printer_name: "Manual".to_string(),
            material_text: format!("{}m {}", length_used_meters, filament.display_name()),
        }
    }

    /// Pre-fill a piece from a project preset.
    pub fn from_preset(
        preset: ProjectPreset,
        filament: FilamentType,
        printer: PrinterModel,
    ) -> QuoteResult<Self> {
        let values = preset.values();
        let time_hours = to_decimal_hours(values.hours, values.minutes, 0);
        PieceInput::new(values.name, time_hours, printer.watts(), values.spool_cost, 0.0)
            .with_filament(filament)
            .with_printer(printer)
            .with_extra_cost(values.extra_cost)
            .with_material(values.material)
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_extra_cost(mut self, extra_cost: f64) -> Self {
        self.extra_cost = extra_cost;
        self
    }

    pub fn with_commission(mut self, commission_percent: f64) -> Self {
        self.commission_percent = commission_percent;
        self
    }

    pub fn with_waste(mut self, waste_percent: f64) -> Self {
        self.waste_percent = waste_percent;
        self
    }

    /// Use a preset filament's density and label.
    pub fn with_filament(mut self, filament: FilamentType) -> Self {
        self.filament_density = filament.density();
        self.filament_label = filament.display_name();
        self
    }

    /// Use a custom filament density.
    pub fn with_density(mut self, density: f64) -> Self {
        self.filament_density = density;
        self.filament_label = format!("Custom ({:.2} g/cm³)", density);
        self
    }

    /// Use a preset printer's wattage and name.
    pub fn with_printer(mut self, printer: PrinterModel) -> Self {
        self.wattage = printer.watts();
        self.printer_name = printer.display_name().to_string();
        self
    }

    /// Set material usage from a raw amount, converting grams at the current density.
    ///
    /// Call after [`with_filament`](Self::with_filament) / [`with_density`](Self::with_density)
    /// so the conversion uses the right density.
    pub fn with_material(mut self, amount: MaterialAmount) -> QuoteResult<Self> {
        self.length_used_meters = amount.to_meters(self.filament_density)?;
        self.material_text = format!("{} {}", amount, self.filament_label);
        Ok(self)
    }

    /// Take the advisory's minimum batch as the requested quantity.
    ///
    /// Prices are not recalculated here; the piece is priced when added.
    pub fn apply_advisory(&mut self, advisory: &SmallPieceAdvisory) {
        self.quantity = advisory.minimum_quantity;
    }
}

/// Trim and cap a piece name at the maximum length (in characters).
pub fn sanitize_name(name: &str) -> String {
    name.trim().chars().take(limits::NAME_MAX_LEN).collect()
}

/// Result of pricing one piece.
///
/// ## JSON Example
///
/// ```json
/// {
///   "electricity_cost": 0.504,
///   "filament_cost": 16.404,
///   "labor_cost": 42.0,
///   "machine_wear_cost": 18.0,
///   "spool_wear_cost": 2.625,
///   "extra_cost": 0.0,
///   "base_cost": 79.533,
///   "price_with_margin": 93.849,
///   "final_unit_price": 93.849,
///   "total_price": 93.849,
///   "grams_used": 29.825,
///   "grams_with_waste": 32.808
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub electricity_cost: f64,
    pub filament_cost: f64,
    pub labor_cost: f64,
    pub machine_wear_cost: f64,
    pub spool_wear_cost: f64,
    pub extra_cost: f64,
    /// Sum of all cost components
    pub base_cost: f64,
    /// Base cost with profit margin
    pub price_with_margin: f64,
    /// Price per copy including commission
    pub final_unit_price: f64,
    /// `final_unit_price * quantity`
    pub total_price: f64,
    pub grams_used: f64,
    pub grams_with_waste: f64,
}

impl CostBreakdown {
    /// All monetary and mass fields, for invariant checks and display
    pub fn fields(&self) -> [(&'static str, f64); 12] {
        [
            ("electricity_cost", self.electricity_cost),
            ("filament_cost", self.filament_cost),
            ("labor_cost", self.labor_cost),
            ("machine_wear_cost", self.machine_wear_cost),
            ("spool_wear_cost", self.spool_wear_cost),
            ("extra_cost", self.extra_cost),
            ("base_cost", self.base_cost),
            ("price_with_margin", self.price_with_margin),
            ("final_unit_price", self.final_unit_price),
            ("total_price", self.total_price),
            ("grams_used", self.grams_used),
            ("grams_with_waste", self.grams_with_waste),
        ]
    }
}

/// Price a piece.
///
/// Expects input that already passed [`crate::ledger::validate`]; this
/// function has no error path.
pub fn calculate(piece: &PieceInput, overhead: &OverheadConfig) -> CostBreakdown {
    // Electricity
    let kwh = piece.wattage * piece.time_hours / 1000.0;
    let electricity_cost = kwh * overhead.electricity_rate;

    // Material
    let grams_used = meters_to_grams(piece.length_used_meters, piece.filament_density);
    let grams_with_waste = grams_used * (1.0 + piece.waste_percent / 100.0);
    let filament_cost = (grams_with_waste / SPOOL_WEIGHT_G) * piece.spool_cost;

    // Labor and wear
    let labor_cost = piece.time_hours * overhead.labor_rate;
    let machine_wear_cost = piece.time_hours * overhead.machine_wear_rate;
    let spool_wear_cost = (grams_with_waste / 100.0) * overhead.spool_wear_rate;

    let base_cost =
        labor_cost + filament_cost + electricity_cost + machine_wear_cost + spool_wear_cost + piece.extra_cost;

    let price_with_margin = base_cost * (1.0 + overhead.profit_margin_percent / 100.0);
    let final_unit_price = price_with_margin * (1.0 + piece.commission_percent / 100.0);

    CostBreakdown {
        electricity_cost,
        filament_cost,
        labor_cost,
        machine_wear_cost,
        spool_wear_cost,
        extra_cost: piece.extra_cost,
        base_cost,
        price_with_margin,
        final_unit_price,
        total_price: final_unit_price * f64::from(piece.quantity),
        grams_used,
        grams_with_waste,
    }
}
