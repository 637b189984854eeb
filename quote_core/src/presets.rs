//! # Presets
//!
//! Reference data for filling in a piece: filament densities, printer power
//! draw, marketplace commissions and typical project shapes. None of this is
//! required by the calculator; it only saves the user from typing numbers.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::presets::{FilamentType, Marketplace, PrinterModel};
//!
//! assert_eq!(FilamentType::Pla.density(), 1.24);
//! assert_eq!(PrinterModel::CrealityK1C.watts(), 120.0);
//! assert_eq!(Marketplace::from_code("ml_basic"), Some(Marketplace::MercadoLibreBasic));
//! ```

use serde::{Deserialize, Serialize};

use crate::units::MaterialAmount;

/// Input limits shared by front ends
pub mod limits {
    /// Minimum piece name length after trimming
    pub const NAME_MIN_LEN: usize = 2;
    /// Names are truncated to this many characters
    pub const NAME_MAX_LEN: usize = 100;
    /// Highest quantity the quote table displays
    pub const QUANTITY_DISPLAY_MAX: u32 = 999;
    /// Default waste allowance in percent
    pub const DEFAULT_WASTE_PERCENT: f64 = 10.0;
    /// Waste allowance range in percent
    pub const WASTE_PERCENT_RANGE: (f64, f64) = (0.0, 50.0);
    /// Commission range in percent
    pub const COMMISSION_PERCENT_RANGE: (f64, f64) = (0.0, 50.0);
    /// Plausible filament densities in g/cm³
    pub const DENSITY_RANGE: (f64, f64) = (0.5, 3.0);
}

// ============================================================================
// Filament Types
// ============================================================================

/// Common filament materials with their nominal density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilamentType {
    #[default]
    Pla,
    PlaPlus,
    PlaCarbon,
    Abs,
    Petg,
    Tpu,
    Asa,
    Wood,
}

impl FilamentType {
    /// All filament types in menu order
    pub const ALL: [FilamentType; 8] = [
        FilamentType::Pla,
        FilamentType::PlaPlus,
        FilamentType::PlaCarbon,
        FilamentType::Abs,
        FilamentType::Petg,
        FilamentType::Tpu,
        FilamentType::Asa,
        FilamentType::Wood,
    ];

    /// Density in g/cm³
    pub fn density(&self) -> f64 {
        match self {
            FilamentType::Pla => 1.24,
            FilamentType::PlaPlus => 1.25,
            FilamentType::PlaCarbon => 1.35,
            FilamentType::Abs => 1.27,
            FilamentType::Petg => 1.23,
            FilamentType::Tpu => 1.20,
            FilamentType::Asa => 1.44,
            FilamentType::Wood => 1.15,
        }
    }

    /// Short code used on the command line and in files
    pub fn code(&self) -> &'static str {
        match self {
            FilamentType::Pla => "pla",
            FilamentType::PlaPlus => "pla+",
            FilamentType::PlaCarbon => "pla-cf",
            FilamentType::Abs => "abs",
            FilamentType::Petg => "petg",
            FilamentType::Tpu => "tpu",
            FilamentType::Asa => "asa",
            FilamentType::Wood => "wood",
        }
    }

    /// Human-readable label including density
    pub fn display_name(&self) -> String {
        let name = match self {
            FilamentType::Pla => "PLA",
            FilamentType::PlaPlus => "PLA+",
            FilamentType::PlaCarbon => "PLA Carbon Fiber",
            FilamentType::Abs => "ABS",
            FilamentType::Petg => "PETG",
            FilamentType::Tpu => "TPU Flexible",
            FilamentType::Asa => "ASA",
            FilamentType::Wood => "WOOD",
        };
        format!("{} ({:.2} g/cm³)", name, self.density())
    }

    /// Look up by [`code`](Self::code), case-insensitive
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_lowercase();
        Self::ALL.into_iter().find(|f| f.code() == code)
    }
}

// ============================================================================
// Printers
// ============================================================================

/// Printer models with typical average power draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrinterModel {
    CrealityK1C,
    CrealityK1Max,
    CrealityEnder3V2,
    CrealityEnder3S1,
    PrusaMk3s,
    BambuX1Carbon,
    BambuA1Mini,
    BambuP1P,
    ArtilleryX2,
    AnycubicKobra2,
    FlashForgeCreatorPro,
    Raise3dE2,
    QidiXMax3,
}

impl PrinterModel {
    /// All printer models in menu order
    pub const ALL: [PrinterModel; 13] = [
        PrinterModel::CrealityK1C,
        PrinterModel::CrealityK1Max,
        PrinterModel::CrealityEnder3V2,
        PrinterModel::CrealityEnder3S1,
        PrinterModel::PrusaMk3s,
        PrinterModel::BambuX1Carbon,
        PrinterModel::BambuA1Mini,
        PrinterModel::BambuP1P,
        PrinterModel::ArtilleryX2,
        PrinterModel::AnycubicKobra2,
        PrinterModel::FlashForgeCreatorPro,
        PrinterModel::Raise3dE2,
        PrinterModel::QidiXMax3,
    ];

    /// Average power draw in watts
    pub fn watts(&self) -> f64 {
        match self {
            PrinterModel::CrealityK1C => 120.0,
            PrinterModel::CrealityK1Max => 350.0,
            PrinterModel::CrealityEnder3V2 => 85.0,
            PrinterModel::CrealityEnder3S1 => 110.0,
            PrinterModel::PrusaMk3s => 80.0,
            PrinterModel::BambuX1Carbon => 350.0,
            PrinterModel::BambuA1Mini => 250.0,
            PrinterModel::BambuP1P => 300.0,
            PrinterModel::ArtilleryX2 => 95.0,
            PrinterModel::AnycubicKobra2 => 140.0,
            PrinterModel::FlashForgeCreatorPro => 160.0,
            PrinterModel::Raise3dE2 => 200.0,
            PrinterModel::QidiXMax3 => 270.0,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PrinterModel::CrealityK1C => "k1c",
            PrinterModel::CrealityK1Max => "k1_max",
            PrinterModel::CrealityEnder3V2 => "ender3_v2",
            PrinterModel::CrealityEnder3S1 => "ender3_s1",
            PrinterModel::PrusaMk3s => "prusa_mk3s",
            PrinterModel::BambuX1Carbon => "bambu_x1",
            PrinterModel::BambuA1Mini => "bambu_a1",
            PrinterModel::BambuP1P => "bambu_p1p",
            PrinterModel::ArtilleryX2 => "artillery_x2",
            PrinterModel::AnycubicKobra2 => "anycubic_kobra2",
            PrinterModel::FlashForgeCreatorPro => "flashforge_creator",
            PrinterModel::Raise3dE2 => "raise3d_e2",
            PrinterModel::QidiXMax3 => "qidi_xmax3",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrinterModel::CrealityK1C => "Creality K1C",
            PrinterModel::CrealityK1Max => "Creality K1 Max",
            PrinterModel::CrealityEnder3V2 => "Creality Ender 3 V2",
            PrinterModel::CrealityEnder3S1 => "Creality Ender 3 S1",
            PrinterModel::PrusaMk3s => "Prusa i3 MK3S+",
            PrinterModel::BambuX1Carbon => "Bambu Lab X1 Carbon",
            PrinterModel::BambuA1Mini => "Bambu Lab A1 mini",
            PrinterModel::BambuP1P => "Bambu Lab P1P",
            PrinterModel::ArtilleryX2 => "Artillery Sidewinder X2",
            PrinterModel::AnycubicKobra2 => "Anycubic Kobra 2",
            PrinterModel::FlashForgeCreatorPro => "FlashForge Creator Pro",
            PrinterModel::Raise3dE2 => "Raise3D E2",
            PrinterModel::QidiXMax3 => "Qidi Tech X-Max 3",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_lowercase();
        Self::ALL.into_iter().find(|p| p.code() == code)
    }
}

// ============================================================================
// Marketplaces
// ============================================================================

/// Sales channels and their effective commission (fee plus VAT on the fee).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Marketplace {
    #[default]
    Direct,
    PayPal,
    OwnStore,
    Shopify,
    AmazonMx,
    MercadoLibreBasic,
    MercadoLibreAds,
    MercadoLibreFull,
    MercadoLibrePremium,
}

impl Marketplace {
    pub const ALL: [Marketplace; 9] = [
        Marketplace::Direct,
        Marketplace::PayPal,
        Marketplace::OwnStore,
        Marketplace::Shopify,
        Marketplace::AmazonMx,
        Marketplace::MercadoLibreBasic,
        Marketplace::MercadoLibreAds,
        Marketplace::MercadoLibreFull,
        Marketplace::MercadoLibrePremium,
    ];

    /// Commission in percent of the margin-inclusive price
    pub fn commission_percent(&self) -> f64 {
        match self {
            Marketplace::Direct => 0.0,
            Marketplace::PayPal => 3.48,
            Marketplace::OwnStore => 5.8,
            Marketplace::Shopify => 9.28,
            Marketplace::AmazonMx => 13.92,
            Marketplace::MercadoLibreBasic => 17.4,
            Marketplace::MercadoLibreAds => 20.88,
            Marketplace::MercadoLibreFull => 25.52,
            Marketplace::MercadoLibrePremium => 29.0,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Marketplace::Direct => "direct",
            Marketplace::PayPal => "paypal",
            Marketplace::OwnStore => "own_store",
            Marketplace::Shopify => "shopify",
            Marketplace::AmazonMx => "amazon_mx",
            Marketplace::MercadoLibreBasic => "ml_basic",
            Marketplace::MercadoLibreAds => "ml_ads",
            Marketplace::MercadoLibreFull => "ml_full",
            Marketplace::MercadoLibrePremium => "ml_premium",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_lowercase();
        Self::ALL.into_iter().find(|m| m.code() == code)
    }
}

// ============================================================================
// Project Presets
// ============================================================================

/// Typical job shapes used to pre-fill a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectPreset {
    /// 1.5h, 15g - keychains and figurines
    Keychain,
    /// 4h, 50g - ornamental objects
    Decorative,
    /// 8h, 120g - tools and useful parts
    Functional,
    /// 12.5h, 200g - complex projects
    Prototype,
}

/// Values a preset fills in.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetValues {
    pub name: &'static str,
    pub hours: u32,
    pub minutes: u32,
    pub material: MaterialAmount,
    pub spool_cost: f64,
    pub extra_cost: f64,
}

impl ProjectPreset {
    pub const ALL: [ProjectPreset; 4] = [
        ProjectPreset::Keychain,
        ProjectPreset::Decorative,
        ProjectPreset::Functional,
        ProjectPreset::Prototype,
    ];

    pub fn values(&self) -> PresetValues {
        match self {
            ProjectPreset::Keychain => PresetValues {
                name: "Mini keychain",
                hours: 1,
                minutes: 30,
                material: MaterialAmount::Grams(15.0),
                spool_cost: 450.0,
                extra_cost: 5.0,
            },
            ProjectPreset::Decorative => PresetValues {
                name: "Decorative object",
                hours: 4,
                minutes: 0,
                material: MaterialAmount::Grams(50.0),
                spool_cost: 500.0,
                extra_cost: 15.0,
            },
            ProjectPreset::Functional => PresetValues {
                name: "Functional part",
                hours: 8,
                minutes: 0,
                material: MaterialAmount::Grams(120.0),
                spool_cost: 550.0,
                extra_cost: 25.0,
            },
            ProjectPreset::Prototype => PresetValues {
                name: "Complex prototype",
                hours: 12,
                minutes: 30,
                material: MaterialAmount::Grams(200.0),
                spool_cost: 650.0,
                extra_cost: 40.0,
            },
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ProjectPreset::Keychain => "keychain",
            ProjectPreset::Decorative => "decorative",
            ProjectPreset::Functional => "functional",
            ProjectPreset::Prototype => "prototype",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_lowercase();
        Self::ALL.into_iter().find(|p| p.code() == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip() {
        for f in FilamentType::ALL {
            assert_eq!(FilamentType::from_code(f.code()), Some(f));
        }
        for p in PrinterModel::ALL {
            assert_eq!(PrinterModel::from_code(p.code()), Some(p));
        }
        for m in Marketplace::ALL {
            assert_eq!(Marketplace::from_code(m.code()), Some(m));
        }
        for p in ProjectPreset::ALL {
            assert_eq!(ProjectPreset::from_code(p.code()), Some(p));
        }
        assert_eq!(FilamentType::from_code(" PETG "), Some(FilamentType::Petg));
        assert_eq!(PrinterModel::from_code("manual"), None);
    }

    #[test]
    fn test_densities_within_limits() {
        let (min, max) = limits::DENSITY_RANGE;
        for f in FilamentType::ALL {
            assert!(f.density() >= min && f.density() <= max);
        }
    }

    #[test]
    fn test_commissions_within_limits() {
        let (min, max) = limits::COMMISSION_PERCENT_RANGE;
        for m in Marketplace::ALL {
            assert!(m.commission_percent() >= min && m.commission_percent() <= max);
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(FilamentType::Pla.display_name(), "PLA (1.24 g/cm³)");
    }
}
