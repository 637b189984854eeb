//! # quote_core - 3D Print Pricing Engine
//!
//! `quote_core` prices 3D-printed pieces and keeps them in a customer quote.
//! All inputs and outputs are JSON-serializable, so front ends (the
//! `printquote` CLI, a GUI, a web service) share one engine.
//!
//! ## Design Philosophy
//!
//! - **Pure calculations**: pricing takes plain values and returns plain values
//! - **Encapsulated state**: the quote ledger keeps its grand total in step
//!   with its items; callers cannot edit either directly
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use quote_core::calculations::{calculate, PieceInput};
//! use quote_core::overhead::OverheadConfig;
//! use quote_core::quote::Quote;
//!
//! let piece = PieceInput::new("Bracket", 1.5, 120.0, 500.0, 10.0);
//! let breakdown = calculate(&piece, &OverheadConfig::default());
//! println!("Unit price: {:.2}", breakdown.final_unit_price);
//!
//! let mut quote = Quote::new("Acme Robotics");
//! quote.add_piece(piece).unwrap();
//! assert_eq!(quote.ledger.len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`units`] - Filament length/mass conversion
//! - [`time`] - Print time normalization
//! - [`calculations`] - Price calculator and small-piece advisor
//! - [`ledger`] - Validation and the quote ledger
//! - [`overhead`] - Shop overhead rates and JSON import/export
//! - [`presets`] - Filaments, printers, marketplaces, project presets
//! - [`quote`] - Quote document container
//! - [`file_io`] - Atomic saves and config files
//! - [`pdf`] - PDF quote rendering
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod ledger;
pub mod overhead;
pub mod pdf;
pub mod presets;
pub mod quote;
pub mod time;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, evaluate, CostBreakdown, PieceInput, SmallPieceAdvisory};
pub use errors::{QuoteError, QuoteResult, ValidationError};
pub use file_io::{export_config, import_config, load_quote, save_quote};
pub use ledger::{check_adjustments, validate, QuoteLedger, QuoteLineItem, QuoteSummary};
pub use overhead::{OverheadConfig, OverheadPatch};
pub use pdf::render_quote_pdf;
pub use quote::{CompanyInfo, Quote, QuoteMetadata};
