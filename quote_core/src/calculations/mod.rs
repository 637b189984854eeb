//! # Calculations
//!
//! Pure pricing functions. Each follows the pattern:
//!
//! - `*Input` - input parameters (JSON-serializable)
//! - a result struct (JSON-serializable)
//! - a free function that maps one to the other without I/O
//!
//! ## Available Calculations
//!
//! - [`price`] - cost breakdown and final price for one piece
//! - [`advisor`] - minimum batch and volume discount for small pieces

pub mod advisor;
pub mod price;

// Re-export commonly used types
pub use advisor::{evaluate, SmallPieceAdvisory};
pub use price::{calculate, CostBreakdown, PieceInput};
