//! # Filament Units
//!
//! Conversion between filament length and mass. Slicers report usage in
//! either meters or grams; pricing is done on mass, so everything funnels
//! through [`meters_to_grams`].
//!
//! ## Geometry
//!
//! Filament is treated as a solid cylinder of fixed 1.75 mm diameter:
//!
//! ```text
//! volume_cm3 = length_mm * area_mm2 / 1000
//! grams      = volume_cm3 * density_g_cm3
//! ```
//!
//! ## Example
//!
//! ```rust
//! use quote_core::units::{grams_to_meters, meters_to_grams};
//!
//! let grams = meters_to_grams(10.0, 1.24); // 10 m of PLA
//! assert!((grams - 29.8255).abs() < 1e-3);
//! assert!((grams_to_meters(grams, 1.24) - 10.0).abs() < 1e-9);
//! ```

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{QuoteError, QuoteResult};

// ============================================================================
// Filament Constants
// ============================================================================

/// Nominal filament diameter in millimeters
pub const FILAMENT_DIAMETER_MM: f64 = 1.75;

/// Filament cross-section area in mm² (π r²)
pub const CROSS_SECTION_AREA_MM2: f64 =
    PI * (FILAMENT_DIAMETER_MM / 2.0) * (FILAMENT_DIAMETER_MM / 2.0);

/// Mass of a standard spool in grams; spool cost is priced per this unit
pub const SPOOL_WEIGHT_G: f64 = 1000.0;

// ============================================================================
// Conversions
// ============================================================================

/// Convert a filament length in meters to grams.
///
/// Callers must ensure `density > 0`; see [`try_meters_to_grams`].
pub fn meters_to_grams(meters: f64, density: f64) -> f64 {
    let length_mm = meters * 1000.0;
    let volume_mm3 = length_mm * CROSS_SECTION_AREA_MM2;
    let volume_cm3 = volume_mm3 / 1000.0;
    volume_cm3 * density
}

/// Convert a filament mass in grams to meters. Exact inverse of [`meters_to_grams`].
pub fn grams_to_meters(grams: f64, density: f64) -> f64 {
    let volume_cm3 = grams / density;
    let volume_mm3 = volume_cm3 * 1000.0;
    let length_mm = volume_mm3 / CROSS_SECTION_AREA_MM2;
    length_mm / 1000.0
}

/// [`meters_to_grams`] with the density guard applied.
pub fn try_meters_to_grams(meters: f64, density: f64) -> QuoteResult<f64> {
    check_density(density)?;
    Ok(meters_to_grams(meters, density))
}

/// [`grams_to_meters`] with the density guard applied.
pub fn try_grams_to_meters(grams: f64, density: f64) -> QuoteResult<f64> {
    check_density(density)?;
    Ok(grams_to_meters(grams, density))
}

fn check_density(density: f64) -> QuoteResult<()> {
    if !density.is_finite() || density <= 0.0 {
        return Err(QuoteError::invalid_input(
            "filament_density",
            density.to_string(),
            "Density must be a positive number",
        ));
    }
    Ok(())
}

// ============================================================================
// Raw Material Amount
// ============================================================================

/// Filament usage as entered by the user, before normalization to meters.
///
/// ## JSON Example
///
/// ```json
/// { "unit": "grams", "amount": 75.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "amount", rename_all = "lowercase")]
pub enum MaterialAmount {
    Meters(f64),
    Grams(f64),
}

impl MaterialAmount {
    /// Raw number as entered
    pub fn value(&self) -> f64 {
        match self {
            MaterialAmount::Meters(v) | MaterialAmount::Grams(v) => *v,
        }
    }

    /// Normalize to meters at the given density
    pub fn to_meters(&self, density: f64) -> QuoteResult<f64> {
        match self {
            MaterialAmount::Meters(m) => Ok(*m),
            MaterialAmount::Grams(g) => try_grams_to_meters(*g, density),
        }
    }

    /// Normalize to grams at the given density
    pub fn to_grams(&self, density: f64) -> QuoteResult<f64> {
        match self {
            MaterialAmount::Meters(m) => try_meters_to_grams(*m, density),
            MaterialAmount::Grams(g) => Ok(*g),
        }
    }
}

impl fmt::Display for MaterialAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialAmount::Meters(m) => write!(f, "{}m", m),
            MaterialAmount::Grams(g) => write!(f, "{}g", g),
        }
    }
}
