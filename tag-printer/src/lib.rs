//! # tag-printer
//!
//! ZPL thermal label printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ZPL II directive building
//! - Field data escaping (user text can never inject commands)
//! - Network printing (raw TCP port 9100)
//! - Image/logo processing into `^GFA` graphic fields
//!
//! Business logic (WHAT to print) stays in application code:
//! - Price tag layout → tag-station
//!
//! ## Example
//!
//! ```ignore
//! use tag_printer::{NetworkPrinter, Printer, ZplBuilder};
//!
//! let mut zpl = ZplBuilder::new();
//! zpl.start_format();
//! zpl.origin(20, 20).font(32, 32).text("Hello ^ world");
//! zpl.end_format();
//!
//! let printer = NetworkPrinter::new("192.168.1.100", 9100)?;
//! printer.print(zpl.finalize().as_bytes()).await?;
//! ```

mod encoding;
mod error;
mod printer;
mod zpl;

// Re-exports
pub use encoding::{HEX_INDICATOR, escape_field_data, is_reserved};
pub use error::{PrintError, PrintResult};
pub use printer::{NetworkPrinter, Printer};
pub use zpl::{GraphicField, Justify, ZplBuilder};

#[cfg(feature = "image")]
pub use zpl::process_logo;
