//! # Quote Documents
//!
//! The `Quote` struct is the root container for one customer quote.
//! Quotes serialize to `.pq` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Quote
//! ├── meta: QuoteMetadata (version, company, client, timestamps)
//! ├── overhead: OverheadConfig (rates used to price new pieces)
//! └── ledger: QuoteLedger (priced pieces + grand total)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use quote_core::calculations::PieceInput;
//! use quote_core::quote::Quote;
//!
//! let mut quote = Quote::new("Acme Robotics");
//! quote.add_piece(PieceInput::new("Bracket", 1.5, 120.0, 500.0, 10.0)).unwrap();
//!
//! let json = serde_json::to_string_pretty(&quote).unwrap();
//! assert!(json.contains("Acme Robotics"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::PieceInput;
use crate::errors::QuoteResult;
use crate::ledger::{QuoteLedger, QuoteLineItem};
use crate::overhead::OverheadConfig;

/// Current schema version for .pq files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root quote container, serialized to `.pq` files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub meta: QuoteMetadata,

    /// Rates applied to pieces added from now on. Pieces already in the
    /// ledger keep the price they were added with.
    pub overhead: OverheadConfig,

    pub ledger: QuoteLedger,
}

impl Quote {
    /// Create an empty quote for a client with default overhead.
    pub fn new(client: impl Into<String>) -> Self {
        let now = Utc::now();
        Quote {
            meta: QuoteMetadata {
                version: SCHEMA_VERSION.to_string(),
                company: CompanyInfo::default(),
                client: client.into(),
                created: now,
                modified: now,
            },
            overhead: OverheadConfig::default(),
            ledger: QuoteLedger::new(),
        }
    }

    /// Price a piece with this quote's overhead and add it.
    pub fn add_piece(&mut self, piece: PieceInput) -> QuoteResult<&QuoteLineItem> {
        let item = self.ledger.add(piece, &self.overhead)?;
        self.meta.modified = Utc::now();
        Ok(item)
    }

    pub fn update_quantity(&mut self, id: Uuid, quantity: u32) -> QuoteResult<()> {
        self.ledger.update_quantity(id, quantity)?;
        self.touch();
        Ok(())
    }

    pub fn remove_piece(&mut self, id: Uuid) -> QuoteResult<QuoteLineItem> {
        let item = self.ledger.remove(id)?;
        self.touch();
        Ok(item)
    }

    /// Take a piece out for editing; see [`QuoteLedger::edit`].
    pub fn edit_piece(&mut self, id: Uuid) -> QuoteResult<PieceInput> {
        let piece = self.ledger.edit(id)?;
        self.touch();
        Ok(piece)
    }

    pub fn clear(&mut self) {
        self.ledger.clear_all();
        self.touch();
    }

    /// Find a line item by full id or by a unique id suffix.
    ///
    /// Front ends show the tail of the id, which holds the random bits;
    /// returns `None` when the suffix is ambiguous.
    pub fn find_item(&self, id_or_suffix: &str) -> Option<&QuoteLineItem> {
        let needle = id_or_suffix.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        let mut matches = self
            .ledger
            .items()
            .iter()
            .filter(|item| item.id.to_string().ends_with(&needle));
        match (matches.next(), matches.next()) {
            (Some(item), None) => Some(item),
            _ => None,
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

impl Default for Quote {
    fn default() -> Self {
        Quote::new("")
    }
}

/// Quote metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    pub company: CompanyInfo,

    /// Client name
    pub client: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

/// Seller details printed in the quote header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: String,
    pub slogan: String,
    pub website: String,
    pub email: String,
    /// Currency code shown next to prices (e.g., "MXN")
    pub currency: String,
}

impl Default for CompanyInfo {
    fn default() -> Self {
        CompanyInfo {
            name: "PrintQuote".to_string(),
            slogan: "3D printing on demand".to_string(),
            website: String::new(),
            email: String::new(),
            currency: "MXN".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(name: &str) -> PieceInput {
        PieceInput::new(name, 1.5, 120.0, 500.0, 10.0)
    }

    #[test]
    fn test_quote_creation() {
        let quote = Quote::new("Acme Corp");
        assert_eq!(quote.meta.client, "Acme Corp");
        assert_eq!(quote.meta.version, SCHEMA_VERSION);
        assert_eq!(quote.meta.company.currency, "MXN");
        assert!(quote.ledger.is_empty());
    }

    #[test]
    fn test_quote_serialization() {
        let mut quote = Quote::new("Test Client");
        quote.add_piece(piece("Bracket")).unwrap();
        let json = serde_json::to_string_pretty(&quote).unwrap();

        assert!(json.contains("Test Client"));
        assert!(json.contains("electricityRate"));
        assert!(json.contains("Bracket"));

        let roundtrip: Quote = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.ledger.len(), 1);
        assert!((roundtrip.ledger.grand_total() - quote.ledger.grand_total()).abs() < 1e-9);
    }

    #[test]
    fn test_overhead_applies_to_new_pieces_only() {
        let mut quote = Quote::new("Client");
        let first = quote.add_piece(piece("First")).unwrap().unit_price();

        quote.overhead.labor_rate = 100.0;
        let second = quote.add_piece(piece("Second")).unwrap().unit_price();

        assert!(second > first);
        assert_eq!(quote.ledger.items()[0].unit_price(), first);
    }

    #[test]
    fn test_mutations_touch_modified() {
        let mut quote = Quote::new("Client");
        let created = quote.meta.modified;
        let id = quote.add_piece(piece("Bracket")).unwrap().id;
        quote.update_quantity(id, 3).unwrap();
        assert!(quote.meta.modified >= created);

        let restored = quote.edit_piece(id).unwrap();
        assert_eq!(restored.quantity, 3);
        assert!(quote.ledger.is_empty());
    }

    #[test]
    fn test_find_item_by_suffix() {
        let mut quote = Quote::new("Client");
        let id = quote.add_piece(piece("Bracket")).unwrap().id;
        quote.add_piece(piece("Hinge")).unwrap();

        let full = id.to_string();
        assert_eq!(quote.find_item(&full).map(|i| i.id), Some(id));
        assert_eq!(quote.find_item(&full.to_uppercase()).map(|i| i.id), Some(id));
        assert_eq!(quote.find_item(&full[full.len() - 12..]).map(|i| i.id), Some(id));
        assert!(quote.find_item("").is_none());
        assert!(quote.find_item("zzzz").is_none());
    }
}
