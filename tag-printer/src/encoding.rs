//! Field data escaping for ZPL
//!
//! ZPL treats `^` (format prefix) and `~` (control prefix) as command
//! introducers anywhere in the stream, including inside `^FD` field data.
//! User text is therefore emitted under `^FH` (field hexadecimal) and every
//! reserved character is replaced by its `_XX` hex escape. Inside a `^FB`
//! block `\` starts a formatting code (`\&` line break, `\(` hyphen), so
//! it is escaped too.

use std::borrow::Cow;

/// Hex escape indicator announced with `^FH_`
pub const HEX_INDICATOR: char = '_';

/// Characters that must never appear verbatim in user field data
pub fn is_reserved(c: char) -> bool {
    matches!(c, '^' | '~' | '\\') || c == HEX_INDICATOR
}

/// Escape user text for a `^FH_^FD ... ^FS` field.
///
/// - `^`, `~`, `\` and `_` become `_5E`, `_7E`, `_5C`, `_5F`
/// - ASCII control characters (CR, LF, TAB, ...) become a single space, so
///   a field never spans two lines of the command stream
///
/// Borrows when nothing needs escaping.
pub fn escape_field_data(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| is_reserved(c) || c.is_ascii_control()) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        if is_reserved(c) {
            out.push(HEX_INDICATOR);
            out.push_str(&format!("{:02X}", c as u32));
        } else if c.is_ascii_control() {
            out.push(' ');
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}
