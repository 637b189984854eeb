//! # Quote Ledger
//!
//! The ordered list of priced pieces in a quote, with a running grand total.
//!
//! ## Structure
//!
//! ```text
//! QuoteLedger
//! ├── items: Vec<QuoteLineItem>   (insertion order = display order)
//! └── grand_total: f64            (kept in step with every mutation)
//! ```
//!
//! Both fields are private. Every mutation goes through a ledger method, and
//! each method leaves `grand_total` equal to the sum of the item totals.
//! Changing a quantity never re-prices a piece: the stored unit price is
//! reused.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::calculations::PieceInput;
//! use quote_core::ledger::QuoteLedger;
//! use quote_core::overhead::OverheadConfig;
//!
//! let mut ledger = QuoteLedger::new();
//! let overhead = OverheadConfig::default();
//!
//! let id = ledger
//!     .add(PieceInput::new("Bracket", 1.5, 120.0, 500.0, 10.0), &overhead)
//!     .unwrap()
//!     .id;
//! ledger.update_quantity(id, 5).unwrap();
//!
//! let item = ledger.get(id).unwrap();
//! assert_eq!(item.quantity, 5);
//! assert!((ledger.grand_total() - item.unit_price() * 5.0).abs() < 1e-9);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::calculations::advisor::{self, SmallPieceAdvisory};
use crate::calculations::price::{self, CostBreakdown, PieceInput};
use crate::errors::{QuoteError, QuoteResult, ValidationError};
use crate::overhead::OverheadConfig;
use crate::presets::limits;
use crate::time::{from_decimal_hours, PrintTime};
use crate::units::grams_to_meters;

// ============================================================================
// Validation
// ============================================================================

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Check the required fields of a piece before it is priced.
///
/// Order is fixed and the first failure wins: name, time, material, spool
/// cost, wattage. A material amount that cannot be priced (zero length or
/// a non-positive density) reports [`ValidationError::MaterialRequired`].
///
/// ```rust
/// use quote_core::calculations::PieceInput;
/// use quote_core::errors::ValidationError;
/// use quote_core::ledger::validate;
///
/// let piece = PieceInput::new("", 0.0, 120.0, 500.0, 10.0);
/// assert_eq!(validate(&piece), Err(ValidationError::NameRequired));
/// ```
pub fn validate(piece: &PieceInput) -> Result<(), ValidationError> {
    if piece.name.trim().chars().count() < limits::NAME_MIN_LEN {
        return Err(ValidationError::NameRequired);
    }
    if !is_positive(piece.time_hours) {
        return Err(ValidationError::TimeRequired);
    }
    if !is_positive(piece.length_used_meters) || !is_positive(piece.filament_density) {
        return Err(ValidationError::MaterialRequired);
    }
    if !is_positive(piece.spool_cost) {
        return Err(ValidationError::CostRequired);
    }
    if !is_positive(piece.wattage) {
        return Err(ValidationError::PrinterRequired);
    }
    Ok(())
}

/// Check the optional adjustments of a piece: extra cost, commission and
/// waste must be finite and not negative.
///
/// Runs after [`validate`], so a missing required field is reported first.
///
/// ```rust
/// use quote_core::calculations::PieceInput;
/// use quote_core::ledger::check_adjustments;
///
/// let piece = PieceInput::new("Bracket", 1.5, 120.0, 500.0, 10.0).with_extra_cost(-5.0);
/// assert_eq!(check_adjustments(&piece).unwrap_err().error_code(), "INVALID_INPUT");
/// ```
pub fn check_adjustments(piece: &PieceInput) -> QuoteResult<()> {
    let adjustments = [
        ("extra_cost", piece.extra_cost),
        ("commission_percent", piece.commission_percent),
        ("waste_percent", piece.waste_percent),
    ];
    for (field, value) in adjustments {
        if !value.is_finite() || value < 0.0 {
            return Err(QuoteError::invalid_input(field, value.to_string(), "must be zero or greater"));
        }
    }
    Ok(())
}

// ============================================================================
// Line Items
// ============================================================================

/// A priced piece stored in the ledger.
///
/// Holds a snapshot of the input's display fields next to the breakdown so
/// a quote can be rendered without re-running the calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteLineItem {
    /// Time-ordered unique id
    pub id: Uuid,
    pub name: String,
    pub quantity: u32,
    pub time_hours: f64,
    pub wattage: f64,
    pub spool_cost: f64,
    pub extra_cost: f64,
    pub commission_percent: f64,
    pub waste_percent: f64,
    pub filament_density: f64,
    pub filament_label: String,
    pub printer_name: String,
    pub material_text: String,
    pub breakdown: CostBreakdown,
    /// Batch suggestion computed when the piece was added
    pub advisory: Option<SmallPieceAdvisory>,
    pub added_at: DateTime<Utc>,
}

impl QuoteLineItem {
    fn from_priced(piece: PieceInput, breakdown: CostBreakdown, advisory: Option<SmallPieceAdvisory>) -> Self {
        QuoteLineItem {
            id: Uuid::now_v7(),
            name: piece.name,
            quantity: piece.quantity,
            time_hours: piece.time_hours,
            wattage: piece.wattage,
            spool_cost: piece.spool_cost,
            extra_cost: piece.extra_cost,
            commission_percent: piece.commission_percent,
            waste_percent: piece.waste_percent,
            filament_density: piece.filament_density,
            filament_label: piece.filament_label,
            printer_name: piece.printer_name,
            material_text: piece.material_text,
            breakdown,
            advisory,
            added_at: Utc::now(),
        }
    }

    /// Price per copy
    pub fn unit_price(&self) -> f64 {
        self.breakdown.final_unit_price
    }

    /// Price for all copies
    pub fn total_price(&self) -> f64 {
        self.breakdown.total_price
    }

    /// Print time per copy, split for display
    pub fn print_time(&self) -> PrintTime {
        from_decimal_hours(self.time_hours)
    }

    /// Filament mass for all copies, waste included
    pub fn total_grams(&self) -> f64 {
        self.breakdown.grams_with_waste * f64::from(self.quantity)
    }

    fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.breakdown.total_price = self.breakdown.final_unit_price * f64::from(quantity);
    }

    /// Rebuild an input from the stored snapshot.
    ///
    /// Material comes back as meters derived from the stored mass, so the
    /// unit the user originally typed is not recovered.
    fn to_piece_input(&self) -> PieceInput {
        let grams_used = self.breakdown.grams_with_waste / (1.0 + self.waste_percent / 100.0);
        PieceInput {
            name: self.name.clone(),
            quantity: self.quantity,
            time_hours: self.time_hours,
            wattage: self.wattage,
            spool_cost: self.spool_cost,
            length_used_meters: grams_to_meters(grams_used, self.filament_density),
            extra_cost: self.extra_cost,
            commission_percent: self.commission_percent,
            waste_percent: self.waste_percent,
            filament_density: self.filament_density,
            filament_label: self.filament_label.clone(),
            printer_name: self.printer_name.clone(),
            material_text: self.material_text.clone(),
        }
    }
}

// ============================================================================
// Ledger
// ============================================================================

/// Aggregate figures for a quote.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QuoteSummary {
    /// Sum of quantities
    pub total_pieces: u64,
    /// Print hours across all copies
    pub total_print_hours: f64,
    /// Filament grams across all copies, waste included
    pub total_grams: f64,
    /// Grand total divided by total pieces; 0 when empty
    pub average_price: f64,
}

/// Ordered collection of priced pieces with a running grand total.
///
/// Serialized as a plain array of line items; the total is recomputed on
/// load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<QuoteLineItem>", into = "Vec<QuoteLineItem>")]
pub struct QuoteLedger {
    items: Vec<QuoteLineItem>,
    grand_total: f64,
}

impl QuoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate, price and append a piece.
    ///
    /// The name is trimmed and cut to [`limits::NAME_MAX_LEN`] characters and
    /// a zero quantity becomes 1. On a validation failure the ledger is left
    /// untouched.
    pub fn add(&mut self, mut piece: PieceInput, overhead: &OverheadConfig) -> QuoteResult<&QuoteLineItem> {
        piece.name = price::sanitize_name(&piece.name);
        piece.quantity = piece.quantity.max(1);

        if let Err(e) = validate(&piece) {
            warn!("Rejected piece '{}': {} ({})", piece.name, e, e.field());
            return Err(e.into());
        }
        if let Err(e) = check_adjustments(&piece) {
            warn!("Rejected piece '{}': {}", piece.name, e);
            return Err(e);
        }

        let breakdown = price::calculate(&piece, overhead);
        let advisory = advisor::evaluate(breakdown.final_unit_price, piece.time_hours, breakdown.grams_used);
        let item = QuoteLineItem::from_priced(piece, breakdown, advisory);

        debug!(
            "Added '{}' x{} at {:.2} (id {})",
            item.name, item.quantity, item.unit_price(), item.id
        );

        self.grand_total += item.total_price();
        let index = self.items.len();
        self.items.push(item);
        Ok(&self.items[index])
    }

    /// Change an item's quantity, clamped to at least 1.
    ///
    /// The stored unit price is kept; only the item total and the grand
    /// total move.
    pub fn update_quantity(&mut self, id: Uuid, new_quantity: u32) -> QuoteResult<()> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| QuoteError::not_found(id))?;

        let old_total = item.total_price();
        item.set_quantity(new_quantity.max(1));
        let delta = item.total_price() - old_total;
        self.grand_total += delta;

        debug!("Quantity of {} set to {} (total {:+.2})", id, item.quantity, delta);
        Ok(())
    }

    /// Remove an item and return it.
    pub fn remove(&mut self, id: Uuid) -> QuoteResult<QuoteLineItem> {
        let index = self.position(id)?;
        let item = self.items.remove(index);

        if self.items.is_empty() {
            self.grand_total = 0.0;
        } else {
            self.grand_total -= item.total_price();
        }

        debug!("Removed '{}' ({})", item.name, id);
        Ok(item)
    }

    /// Drop every item and reset the total.
    pub fn clear_all(&mut self) {
        debug!("Cleared {} items", self.items.len());
        self.items.clear();
        self.grand_total = 0.0;
    }

    /// Take an item out of the ledger for re-editing.
    ///
    /// Returns the reconstructed input; the caller re-adds it once modified.
    pub fn edit(&mut self, id: Uuid) -> QuoteResult<PieceInput> {
        let piece = self.get(id).ok_or_else(|| QuoteError::not_found(id))?.to_piece_input();
        self.remove(id)?;
        Ok(piece)
    }

    pub fn get(&self, id: Uuid) -> Option<&QuoteLineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items in insertion order
    pub fn items(&self) -> &[QuoteLineItem] {
        &self.items
    }

    pub fn grand_total(&self) -> f64 {
        self.grand_total
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Totals for the summary section of a quote
    pub fn summary(&self) -> QuoteSummary {
        let mut summary = QuoteSummary::default();
        for item in &self.items {
            let quantity = f64::from(item.quantity);
            summary.total_pieces += u64::from(item.quantity);
            summary.total_print_hours += item.time_hours * quantity;
            summary.total_grams += item.total_grams();
        }
        if summary.total_pieces > 0 {
            summary.average_price = self.grand_total / summary.total_pieces as f64;
        }
        summary
    }

    fn position(&self, id: Uuid) -> QuoteResult<usize> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| QuoteError::not_found(id))
    }
}

impl From<Vec<QuoteLineItem>> for QuoteLedger {
    fn from(mut items: Vec<QuoteLineItem>) -> Self {
        // Files may be hand-edited; re-derive totals from unit price and quantity
        for item in &mut items {
            item.set_quantity(item.quantity.max(1));
        }
        let grand_total = items.iter().map(QuoteLineItem::total_price).sum();
        QuoteLedger { items, grand_total }
    }
}

impl From<QuoteLedger> for Vec<QuoteLineItem> {
    fn from(ledger: QuoteLedger) -> Self {
        ledger.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn piece(name: &str) -> PieceInput {
        PieceInput::new(name, 1.5, 120.0, 500.0, 10.0)
    }

    fn assert_total_in_sync(ledger: &QuoteLedger) {
        let sum: f64 = ledger.items().iter().map(|i| i.total_price()).sum();
        assert!(
            (ledger.grand_total() - sum).abs() < 1e-6,
            "grand total {} != sum {}",
            ledger.grand_total(),
            sum
        );
    }

    // ========================================================================
    // validate
    // ========================================================================

    #[test]
    fn test_validate_accepts_complete_piece() {
        assert_eq!(validate(&piece("Bracket")), Ok(()));
    }

    #[test]
    fn test_validate_name_checked_first() {
        let p = PieceInput::new("", 0.0, 0.0, 0.0, 0.0);
        assert_eq!(validate(&p), Err(ValidationError::NameRequired));
    }

    #[test]
    fn test_validate_name_min_length() {
        assert_eq!(validate(&piece("A")), Err(ValidationError::NameRequired));
        assert_eq!(validate(&piece("   ")), Err(ValidationError::NameRequired));
        assert_eq!(validate(&piece("AB")), Ok(()));
    }

    #[test]
    fn test_validate_order() {
        let p = PieceInput::new("Gear", 0.0, 0.0, 0.0, 0.0);
        assert_eq!(validate(&p), Err(ValidationError::TimeRequired));

        let p = PieceInput::new("Gear", 1.0, 0.0, 0.0, 0.0);
        assert_eq!(validate(&p), Err(ValidationError::MaterialRequired));

        let p = PieceInput::new("Gear", 1.0, 0.0, 0.0, 5.0);
        assert_eq!(validate(&p), Err(ValidationError::CostRequired));

        let p = PieceInput::new("Gear", 1.0, 0.0, 400.0, 5.0);
        assert_eq!(validate(&p), Err(ValidationError::PrinterRequired));
    }

    #[test]
    fn test_validate_rejects_nan_and_bad_density() {
        let p = PieceInput::new("Gear", f64::NAN, 120.0, 400.0, 5.0);
        assert_eq!(validate(&p), Err(ValidationError::TimeRequired));

        let p = piece("Gear").with_density(0.0);
        assert_eq!(validate(&p), Err(ValidationError::MaterialRequired));
    }

    // ========================================================================
    // add / update / remove / clear
    // ========================================================================

    #[test]
    fn test_add_prices_and_tracks_total() {
        let mut ledger = QuoteLedger::new();
        let overhead = OverheadConfig::default();

        let item = ledger.add(piece("Bracket"), &overhead).unwrap().clone();
        assert!((item.unit_price() - 93.848_545_847_787_82).abs() < EPS);
        assert_eq!(item.total_price(), item.unit_price());

        let advisory = item.advisory.unwrap();
        assert_eq!(advisory.minimum_quantity, 4);

        ledger.add(piece("Hinge").with_quantity(3), &overhead).unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.items()[0].name, "Bracket");
        assert_eq!(ledger.items()[1].name, "Hinge");
        assert_total_in_sync(&ledger);
    }

    #[test]
    fn test_add_rejected_leaves_ledger_untouched() {
        let mut ledger = QuoteLedger::new();
        let overhead = OverheadConfig::default();
        ledger.add(piece("Bracket"), &overhead).unwrap();
        let before = ledger.clone();

        let err = ledger.add(piece("X"), &overhead).unwrap_err();
        assert_eq!(err, QuoteError::Validation(ValidationError::NameRequired));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_ids_unique() {
        let mut ledger = QuoteLedger::new();
        let overhead = OverheadConfig::default();
        for i in 0..20 {
            ledger.add(piece(&format!("Part {}", i)), &overhead).unwrap();
        }
        let mut ids: Vec<Uuid> = ledger.items().iter().map(|i| i.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn test_update_quantity_uses_stored_unit_price() {
        let mut ledger = QuoteLedger::new();
        let id = ledger.add(piece("Bracket"), &OverheadConfig::default()).unwrap().id;

        // Pin a round unit price to check the arithmetic exactly
        ledger.items[0].breakdown.final_unit_price = 42.5;
        ledger.items[0].breakdown.total_price = 42.5;
        ledger.grand_total = 42.5;

        let before = ledger.grand_total();
        ledger.update_quantity(id, 5).unwrap();

        let item = ledger.get(id).unwrap();
        assert_eq!(item.unit_price(), 42.5);
        assert_eq!(item.total_price(), 212.5);
        assert_eq!(ledger.grand_total() - before, 170.0);
    }

    #[test]
    fn test_update_quantity_clamps_to_one() {
        let mut ledger = QuoteLedger::new();
        let id = ledger
            .add(piece("Bracket").with_quantity(4), &OverheadConfig::default())
            .unwrap()
            .id;
        ledger.update_quantity(id, 0).unwrap();
        let item = ledger.get(id).unwrap();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.total_price(), item.unit_price());
        assert_total_in_sync(&ledger);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let mut ledger = QuoteLedger::new();
        ledger.add(piece("Bracket"), &OverheadConfig::default()).unwrap();
        let missing = Uuid::now_v7();

        assert_eq!(ledger.update_quantity(missing, 2).unwrap_err().error_code(), "NOT_FOUND");
        assert_eq!(ledger.remove(missing).unwrap_err().error_code(), "NOT_FOUND");
        assert_eq!(ledger.edit(missing).unwrap_err().error_code(), "NOT_FOUND");
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_remove_last_resets_total() {
        let mut ledger = QuoteLedger::new();
        let overhead = OverheadConfig::default();
        let a = ledger.add(piece("Alpha"), &overhead).unwrap().id;
        let b = ledger.add(piece("Beta").with_quantity(2), &overhead).unwrap().id;

        let removed = ledger.remove(a).unwrap();
        assert_eq!(removed.name, "Alpha");
        assert_total_in_sync(&ledger);

        ledger.remove(b).unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.grand_total(), 0.0);
    }

    #[test]
    fn test_clear_all() {
        let mut ledger = QuoteLedger::new();
        let overhead = OverheadConfig::default();
        for name in ["One", "Two", "Three"] {
            ledger.add(piece(name), &overhead).unwrap();
        }
        ledger.clear_all();
        assert!(ledger.items().is_empty());
        assert_eq!(ledger.grand_total(), 0.0);
    }

    // ========================================================================
    // edit / summary / serde
    // ========================================================================

    #[test]
    fn test_edit_reconstructs_and_removes() {
        let mut ledger = QuoteLedger::new();
        let overhead = OverheadConfig::default();
        let original = piece("Bracket").with_quantity(3).with_extra_cost(4.0);
        let id = ledger.add(original.clone(), &overhead).unwrap().id;

        let restored = ledger.edit(id).unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.grand_total(), 0.0);

        assert_eq!(restored.name, original.name);
        assert_eq!(restored.quantity, 3);
        assert_eq!(restored.extra_cost, 4.0);
        assert!((restored.length_used_meters - original.length_used_meters).abs() < 1e-9);

        // Re-adding yields the same price
        let readded = ledger.add(restored, &overhead).unwrap();
        assert!((readded.unit_price() - 93.848_545_847_787_82 - 4.0 * 1.18).abs() < 1e-6);
    }

    #[test]
    fn test_summary() {
        let mut ledger = QuoteLedger::new();
        let overhead = OverheadConfig::default();
        assert_eq!(ledger.summary(), QuoteSummary::default());

        ledger.add(piece("Alpha").with_quantity(2), &overhead).unwrap();
        ledger.add(PieceInput::new("Beta", 3.0, 120.0, 500.0, 10.0), &overhead).unwrap();

        let summary = ledger.summary();
        assert_eq!(summary.total_pieces, 3);
        assert!((summary.total_print_hours - 6.0).abs() < EPS);
        assert!((summary.total_grams - 32.808_044_780_519_9 * 3.0).abs() < 1e-6);
        assert!((summary.average_price - ledger.grand_total() / 3.0).abs() < EPS);
    }

    #[test]
    fn test_check_adjustments() {
        assert!(check_adjustments(&piece("Gear")).is_ok());
        assert!(check_adjustments(&piece("Gear").with_waste(0.0).with_commission(0.0)).is_ok());

        let cases = [
            (piece("Gear").with_extra_cost(-0.01), "extra_cost"),
            (piece("Gear").with_extra_cost(f64::INFINITY), "extra_cost"),
            (piece("Gear").with_commission(-150.0), "commission_percent"),
            (piece("Gear").with_commission(f64::NAN), "commission_percent"),
            (piece("Gear").with_waste(-200.0), "waste_percent"),
        ];
        for (p, expected) in cases {
            match check_adjustments(&p) {
                Err(QuoteError::InvalidInput { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected InvalidInput for {}, got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_add_clamps_zero_quantity() {
        let mut ledger = QuoteLedger::new();
        let item = ledger
            .add(piece("Bracket").with_quantity(0), &OverheadConfig::default())
            .unwrap()
            .clone();

        assert_eq!(item.quantity, 1);
        assert_eq!(item.total_price(), item.unit_price());
        assert!(ledger.grand_total() > 0.0);
        assert_eq!(ledger.summary().total_pieces, 1);
    }

    #[test]
    fn test_add_rejects_negative_adjustments() {
        let mut ledger = QuoteLedger::new();
        let overhead = OverheadConfig::default();
        ledger.add(piece("Keep"), &overhead).unwrap();
        let total = ledger.grand_total();

        let rejected = [
            piece("Bracket").with_extra_cost(-500.0),
            piece("Bracket").with_commission(-150.0),
            piece("Bracket").with_waste(-200.0),
        ];
        for p in rejected {
            let err = ledger.add(p, &overhead).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_INPUT");
        }

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.grand_total(), total);
        assert!(ledger.summary().average_price > 0.0);
    }

    #[test]
    fn test_add_reports_required_fields_before_adjustments() {
        let mut ledger = QuoteLedger::new();
        let p = PieceInput::new("", 1.5, 120.0, 500.0, 10.0).with_extra_cost(-1.0);
        let err = ledger.add(p, &OverheadConfig::default()).unwrap_err();
        assert_eq!(err, QuoteError::Validation(ValidationError::NameRequired));

        let p = PieceInput::new("Gear", 1.5, 0.0, 500.0, 10.0).with_commission(-1.0);
        let err = ledger.add(p, &OverheadConfig::default()).unwrap_err();
        assert_eq!(err, QuoteError::Validation(ValidationError::PrinterRequired));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_add_caps_name_length() {
        let mut ledger = QuoteLedger::new();
        let mut p = piece("Bracket");
        p.name = format!("  {}  ", "x".repeat(limits::NAME_MAX_LEN + 50));

        let item = ledger.add(p, &OverheadConfig::default()).unwrap();
        assert_eq!(item.name.chars().count(), limits::NAME_MAX_LEN);
        assert!(!item.name.starts_with(' '));
    }

    #[test]
    fn test_serde_recomputes_total() {
        let mut ledger = QuoteLedger::new();
        let overhead = OverheadConfig::default();
        ledger.add(piece("Alpha").with_quantity(2), &overhead).unwrap();
        ledger.add(piece("Beta"), &overhead).unwrap();

        let json = serde_json::to_string(&ledger).unwrap();
        assert!(json.starts_with('['));

        let restored: QuoteLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 2);
        assert!((restored.grand_total() - ledger.grand_total()).abs() < 1e-9);
        assert_total_in_sync(&restored);
    }

    #[test]
    fn test_ledger_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<QuoteLedger>();
    }
}
