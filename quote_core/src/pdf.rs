//! # PDF Generation Module
//!
//! Renders a customer-facing quote as PDF using Typst.
//!
//! ## Architecture
//!
//! - The Typst source is assembled with `format!` from the quote data
//! - User-entered text is escaped before it reaches the markup
//! - Fonts come from `typst-assets`; no files are read from disk
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Layout
//!
//! 1. Header: company, slogan, contact, client, date
//! 2. One detail block per piece
//! 3. Grand total
//! 4. Summary: total pieces, print time, filament, average price
//! 5. Fixed notes (estimate disclaimer, validity, delivery)
//!
//! ## Example
//!
//! ```rust,no_run
//! use quote_core::calculations::PieceInput;
//! use quote_core::pdf::render_quote_pdf;
//! use quote_core::quote::Quote;
//!
//! let mut quote = Quote::new("Acme Robotics");
//! quote.add_piece(PieceInput::new("Bracket", 1.5, 120.0, 500.0, 10.0)).unwrap();
//!
//! let pdf_bytes = render_quote_pdf(&quote).unwrap();
//! std::fs::write("quote.pdf", pdf_bytes).unwrap();
//! ```

use chrono::Utc;
use tracing::debug;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::layout::PagedDocument;
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::errors::{QuoteError, QuoteResult};
use crate::ledger::QuoteLineItem;
use crate::quote::Quote;
use crate::time::from_decimal_hours;

/// Days a quote stays valid
pub const QUOTE_VALIDITY_DAYS: u32 = 30;

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    main: Source,
    book: LazyHash<FontBook>,
    fonts: Vec<Font>,
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    /// Bundled fonts from typst-assets
    fn load_fonts() -> Vec<Font> {
        typst_assets::fonts()
            .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
            .collect()
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// PDF Rendering
// ============================================================================

/// Render a quote to PDF.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(QuoteError::EmptyQuote)` - The ledger has no pieces
/// * `Err(QuoteError::Internal)` - Typst compilation failed
pub fn render_quote_pdf(quote: &Quote) -> QuoteResult<Vec<u8>> {
    if quote.ledger.is_empty() {
        return Err(QuoteError::EmptyQuote);
    }

    let source = build_source(quote);
    compile(source)
}

fn compile(source: String) -> QuoteResult<Vec<u8>> {
    let world = PdfWorld::new(source);
    let warned = typst::compile::<PagedDocument>(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        QuoteError::Internal {
            message: format!("Typst compilation failed: {}", error_msgs.join("; ")),
        }
    })?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        QuoteError::Internal {
            message: format!("PDF rendering failed: {}", error_msgs.join("; ")),
        }
    })?;

    debug!("Rendered quote PDF ({} bytes)", pdf_bytes.len());
    Ok(pdf_bytes)
}

/// Assemble the Typst markup for a quote
fn build_source(quote: &Quote) -> String {
    let company = &quote.meta.company;
    let summary = quote.ledger.summary();
    let currency = escape_typst(&company.currency);

    let contact: Vec<String> = [&company.website, &company.email]
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| escape_typst(s))
        .collect();

    let client_row = if quote.meta.client.trim().is_empty() {
        String::new()
    } else {
        format!("  [Client:], [{}],\n", escape_typst(&quote.meta.client))
    };

    let pieces: String = quote
        .ledger
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| build_piece_block(i + 1, item, &currency))
        .collect();

    format!(
        r##"
#set page(
  paper: "a4",
  margin: (top: 2cm, bottom: 2cm, left: 2cm, right: 2cm),
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr),
      align(left)[#text(size: 9pt)[{company_name}]],
      align(right)[#text(size: 9pt)[Page #counter(page).display()]],
    )
  ]
)

#set text(size: 10pt)

#align(center)[
  #block(width: 100%, fill: rgb("#eef3f8"), inset: 16pt, radius: 4pt)[
    #text(size: 22pt, weight: "bold")[{company_name}]
    #v(2pt)
    #text(size: 11pt, style: "italic")[{slogan}]
    #v(2pt)
    #text(size: 9pt)[{contact}]
  ]
]

#v(12pt)

#table(
  columns: (auto, 1fr),
  stroke: none,
  row-gutter: 4pt,
{client_row}  [Date:], [{date}],
  [Valid for:], [{validity} days],
)

#v(8pt)
#line(length: 100%, stroke: 0.5pt)

== Pieces

{pieces}
#v(12pt)

#align(right)[
  #block(fill: rgb("#d4edda"), inset: 12pt, radius: 4pt)[
    #text(size: 14pt, weight: "bold")[Grand total: {grand_total} {currency}]
  ]
]

#v(12pt)

== Summary

#table(
  columns: (1fr, 1fr, 1fr, 1fr),
  inset: 8pt,
  stroke: 0.5pt,
  align: center,
  table.header([*Total pieces*], [*Print time*], [*Filament*], [*Average per piece*]),
  [{total_pieces}], [{total_time}], [{total_grams} g], [{average}],
)

#v(12pt)

== Notes

- Prices are estimates based on the print parameters provided.
- Shipping is not included.
- This quote is valid for {validity} days from the date above.
- Estimated delivery is 3 to 7 business days after confirmation.
"##,
        company_name = escape_typst(&company.name),
        slogan = escape_typst(&company.slogan),
        contact = contact.join(" | "),
        client_row = client_row,
        date = Utc::now().format("%Y-%m-%d"),
        validity = QUOTE_VALIDITY_DAYS,
        pieces = pieces,
        grand_total = money(quote.ledger.grand_total()),
        currency = currency,
        total_pieces = summary.total_pieces,
        total_time = from_decimal_hours(summary.total_print_hours),
        total_grams = format!("{:.1}", summary.total_grams),
        average = money(summary.average_price),
    )
}

/// Detail block for one line item
fn build_piece_block(number: usize, item: &QuoteLineItem, currency: &str) -> String {
    let b = &item.breakdown;
    format!(
        r##"
#block(width: 100%, stroke: 0.5pt + gray, inset: 10pt, radius: 3pt, breakable: false)[
  #text(size: 12pt, weight: "bold")[Piece {number}: {name}]
  #v(4pt)
  #grid(
    columns: (1fr, 1fr),
    gutter: 12pt,
    table(
      columns: (auto, 1fr),
      stroke: none,
      inset: 3pt,
      [Quantity:], [{quantity}],
      [Print time:], [{time}],
      [Material:], [{material}],
      [Filament with waste:], [{grams} g],
      [Printer:], [{printer} ({watts} W)],
    ),
    table(
      columns: (auto, 1fr),
      stroke: none,
      inset: 3pt,
      align: (left, right),
      [Base cost:], [{base}],
      [Filament cost:], [{filament}],
      [Electricity cost:], [{electricity}],
      [*Unit price:*], [*{unit}*],
      [*Total:*], [*{total} {currency}*],
    ),
  )
]
#v(6pt)
"##,
        number = number,
        name = escape_typst(&item.name),
        quantity = item.quantity,
        time = item.print_time(),
        material = escape_typst(&item.material_text),
        grams = format!("{:.1}", b.grams_with_waste),
        printer = escape_typst(&item.printer_name),
        watts = format!("{:.0}", item.wattage),
        base = money(b.base_cost),
        filament = money(b.filament_cost),
        electricity = money(b.electricity_cost),
        unit = money(item.unit_price()),
        total = money(item.total_price()),
        currency = currency,
    )
}

/// Format an amount with an escaped dollar sign
fn money(value: f64) -> String {
    format!("\\${:.2}", value)
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '*' | '_' | '#' | '$' | '@' | '<' | '>' | '\\' | '`' | '[' | ']' | '~' | '/' | '=' | '-'
            | '+' => {
                out.push('\\');
                out.push(c);
            }
            '\n' | '\r' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::PieceInput;

    fn sample_quote() -> Quote {
        let mut quote = Quote::new("Acme Robotics");
        quote
            .add_piece(PieceInput::new("Bracket", 1.5, 120.0, 500.0, 10.0).with_quantity(3))
            .unwrap();
        quote
            .add_piece(PieceInput::new("Gear #2 [v1] $special*", 4.0, 350.0, 650.0, 40.0))
            .unwrap();
        quote
    }

    #[test]
    fn test_empty_quote_rejected() {
        let err = render_quote_pdf(&Quote::new("Client")).unwrap_err();
        assert_eq!(err, QuoteError::EmptyQuote);
    }

    #[test]
    fn test_escape_typst() {
        assert_eq!(escape_typst("a*b"), "a\\*b");
        assert_eq!(escape_typst("[x]"), "\\[x\\]");
        assert_eq!(escape_typst("$5"), "\\$5");
        assert_eq!(escape_typst("// note"), "\\/\\/ note");
        assert_eq!(escape_typst("line\nbreak"), "line break");
        assert_eq!(escape_typst("plain text"), "plain text");
    }

    #[test]
    fn test_source_contains_quote_data() {
        let quote = sample_quote();
        let source = build_source(&quote);

        assert!(source.contains("Acme Robotics"));
        assert!(source.contains("Piece 1: Bracket"));
        assert!(source.contains("Gear \\#2 \\[v1\\] \\$special\\*"));
        assert!(source.contains(&money(quote.ledger.grand_total())));
        assert!(source.contains("Shipping is not included"));
        // 3 + 1 copies
        assert!(source.contains("[4], ["));
    }

    #[test]
    fn test_pdf_generation() {
        let pdf = render_quote_pdf(&sample_quote());
        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let pdf_bytes = pdf.unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }
}
