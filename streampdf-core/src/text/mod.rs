//! Text capability: font selection and single-line text placement.

mod encoding;
mod font;

pub use encoding::TextEncoding;
pub use font::Font;

use crate::objects::{escape_literal, format_real};

/// Font and size used by the next text operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextState {
    pub font: Font,
    pub size: f64,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: Font::Helvetica,
            size: 12.0,
        }
    }
}

impl TextState {
    pub fn new(font: Font, size: f64) -> Self {
        Self { font, size }
    }

    /// Text object showing `text` at (x, y) with the font registered as
    /// `resource` on the page. The string is written in the font's
    /// single-byte encoding.
    pub fn show(&self, resource: &str, text: &str, x: f64, y: f64) -> Vec<u8> {
        let mut ops = format!(
            "BT\n/{resource} {} Tf\n{} {} Td\n",
            format_real(self.size),
            format_real(x),
            format_real(y)
        )
        .into_bytes();
        ops.extend_from_slice(&escape_literal(&TextEncoding::for_font(self.font).encode(text)));
        ops.extend_from_slice(b" Tj\nET\n");
        ops
    }
}
