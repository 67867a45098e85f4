//! ZPL command builder
//!
//! Provides a fluent API for building ZPL II label formats. Every field is
//! written on its own line so the resulting stream stays human-diffable.

use std::fmt::Write as _;

use crate::encoding::{HEX_INDICATOR, escape_field_data};

/// Text justification inside a `^FB` field block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    #[default]
    Left,
    Center,
    Right,
}

impl Justify {
    fn code(self) -> char {
        match self {
            Justify::Left => 'L',
            Justify::Center => 'C',
            Justify::Right => 'R',
        }
    }
}

/// Monochrome bitmap ready for a `^GFA` graphic field
///
/// Rows are packed MSB first, 1 = black dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicField {
    bytes_per_row: u32,
    rows: u32,
    data: Vec<u8>,
}

impl GraphicField {
    /// Wrap packed raster data. Returns `None` if the data length does not
    /// match `bytes_per_row * rows`.
    pub fn new(bytes_per_row: u32, rows: u32, data: Vec<u8>) -> Option<Self> {
        if bytes_per_row == 0 || data.len() != (bytes_per_row as usize) * (rows as usize) {
            return None;
        }
        Some(Self {
            bytes_per_row,
            rows,
            data,
        })
    }

    pub fn width_dots(&self) -> u32 {
        self.bytes_per_row * 8
    }

    pub fn height_dots(&self) -> u32 {
        self.rows
    }

    /// `^GFA,<total>,<total>,<bytes per row>,<hex data>`
    fn directive(&self) -> String {
        let total = self.data.len();
        let mut out = String::with_capacity(total * 2 + 32);
        let _ = write!(out, "^GFA,{},{},{},", total, total, self.bytes_per_row);
        for byte in &self.data {
            let _ = write!(out, "{:02X}", byte);
        }
        out
    }
}

/// ZPL command builder
///
/// Accumulates a UTF-8 command stream. Field directives are opened with
/// [`origin`](Self::origin), decorated with font / block settings, and
/// closed by one of the field data writers ([`text`](Self::text),
/// [`caption`](Self::caption), [`graphic_box`](Self::graphic_box),
/// [`graphic`](Self::graphic)).
#[derive(Debug, Default)]
pub struct ZplBuilder {
    buf: String,
}

impl ZplBuilder {
    pub fn new() -> Self {
        Self {
            buf: String::with_capacity(512),
        }
    }

    // === Format Control ===

    /// Start of label format (`^XA`)
    pub fn start_format(&mut self) -> &mut Self {
        self.directive_line("^XA")
    }

    /// End of label format (`^XZ`)
    pub fn end_format(&mut self) -> &mut Self {
        self.directive_line("^XZ")
    }

    /// Interpret field data as UTF-8 (`^CI28`)
    pub fn utf8(&mut self) -> &mut Self {
        self.directive_line("^CI28")
    }

    /// Print width in dots (`^PW`)
    pub fn print_width(&mut self, dots: u32) -> &mut Self {
        self.directive_line(&format!("^PW{}", dots))
    }

    /// Label length in dots (`^LL`)
    pub fn label_length(&mut self, dots: u32) -> &mut Self {
        self.directive_line(&format!("^LL{}", dots))
    }

    // === Field Setup ===

    /// Field origin (`^FO`), opens a new field
    pub fn origin(&mut self, x: u32, y: u32) -> &mut Self {
        let _ = write!(self.buf, "^FO{},{}", x, y);
        self
    }

    /// Scalable font 0, normal orientation (`^A0N`)
    pub fn font(&mut self, height: u32, width: u32) -> &mut Self {
        let _ = write!(self.buf, "^A0N,{},{}", height, width);
        self
    }

    /// Field block (`^FB`): wraps text inside `width` dots over at most
    /// `max_lines` lines
    pub fn field_block(&mut self, width: u32, max_lines: u32, justify: Justify) -> &mut Self {
        let _ = write!(
            self.buf,
            "^FB{},{},0,{},0",
            width,
            max_lines,
            justify.code()
        );
        self
    }

    // === Field Data ===

    /// User supplied text, hex escaped (`^FH_^FD...^FS`)
    pub fn text(&mut self, s: &str) -> &mut Self {
        let _ = write!(
            self.buf,
            "^FH{}^FD{}^FS",
            HEX_INDICATOR,
            escape_field_data(s)
        );
        self.newline()
    }

    /// Fixed caption owned by the layout (`^FD...^FS`)
    pub fn caption(&mut self, s: &'static str) -> &mut Self {
        debug_assert!(!s.chars().any(crate::encoding::is_reserved));
        let _ = write!(self.buf, "^FD{}^FS", s);
        self.newline()
    }

    /// Box or line (`^GB`)
    pub fn graphic_box(&mut self, width: u32, height: u32, thickness: u32) -> &mut Self {
        let _ = write!(self.buf, "^GB{},{},{}^FS", width, height, thickness);
        self.newline()
    }

    /// Embedded bitmap (`^GFA`)
    pub fn graphic(&mut self, field: &GraphicField) -> &mut Self {
        self.buf.push_str(&field.directive());
        self.buf.push_str("^FS");
        self.newline()
    }

    // === Build ===

    /// Finalize and return the accumulated command stream
    pub fn finalize(self) -> String {
        self.buf
    }

    /// Get the current buffer as a string reference
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    fn directive_line(&mut self, s: &str) -> &mut Self {
        self.buf.push_str(s);
        self.newline()
    }

    fn newline(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }
}

// ============================================================================
// Image Processing
// ============================================================================

/// Process an image file into a `^GFA` graphic field
///
/// The image will be:
/// - Resized to fit within `max_dots` x `max_dots` (aspect ratio kept)
/// - Converted to 1-bit monochrome (transparent = white)
#[cfg(feature = "image")]
#[tracing::instrument]
pub fn process_logo(path: &str, max_dots: u32) -> crate::PrintResult<GraphicField> {
    use crate::PrintError;
    use image::GenericImageView;
    use tracing::{error, info};

    info!(path = path, "processing logo");

    let img = image::open(path).map_err(|e| {
        error!(error = %e, "open logo failed");
        PrintError::Image(format!("{}: {}", path, e))
    })?;

    let (w, h) = img.dimensions();
    info!(dimensions = ?(w, h), "logo image opened");

    let resized = if w > max_dots || h > max_dots {
        img.resize(max_dots, max_dots, image::imageops::FilterType::Nearest)
    } else {
        img
    };
    let (new_w, new_h) = resized.dimensions();
    if new_w == 0 || new_h == 0 {
        return Err(PrintError::Image(format!("{}: empty image", path)));
    }

    let bytes_per_row = new_w.div_ceil(8);
    let rgba = resized.to_rgba8();
    let mut data = Vec::with_capacity((bytes_per_row * new_h) as usize);

    for y in 0..new_h {
        for x_byte in 0..bytes_per_row {
            let mut byte = 0u8;
            for bit in 0..8 {
                let x = x_byte * 8 + bit;
                if x < new_w {
                    let pixel = rgba.get_pixel(x, y);

                    // Opaque and dark enough = black dot
                    if pixel[3] >= 128 {
                        let luma = (0.299 * pixel[0] as f32
                            + 0.587 * pixel[1] as f32
                            + 0.114 * pixel[2] as f32) as u8;
                        if luma < 128 {
                            byte |= 1 << (7 - bit);
                        }
                    }
                }
            }
            data.push(byte);
        }
    }

    GraphicField::new(bytes_per_row, new_h, data)
        .ok_or_else(|| PrintError::Image(format!("{}: raster size mismatch", path)))
}
