use super::Font;

/// Byte encoding used for strings shown with a simple font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Windows-1252, declared as `/WinAnsiEncoding` on the Latin fonts.
    WinAnsiEncoding,
    /// The font program's own single-byte encoding (Symbol, ZapfDingbats).
    BuiltIn,
}

impl TextEncoding {
    pub fn for_font(font: Font) -> Self {
        if font.is_symbolic() {
            TextEncoding::BuiltIn
        } else {
            TextEncoding::WinAnsiEncoding
        }
    }

    /// Maps `text` to one byte per character. Characters the encoding
    /// cannot represent become `?`.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::WinAnsiEncoding => text.chars().map(win_ansi_byte).collect(),
            TextEncoding::BuiltIn => text
                .chars()
                .map(|ch| u8::try_from(u32::from(ch)).unwrap_or(b'?'))
                .collect(),
        }
    }

    /// Whether every character of `text` has a byte in this encoding.
    pub fn can_encode(&self, text: &str) -> bool {
        match self {
            TextEncoding::WinAnsiEncoding => text
                .chars()
                .all(|ch| ch == '?' || win_ansi_byte(ch) != b'?'),
            TextEncoding::BuiltIn => text.chars().all(|ch| u32::from(ch) <= 0xFF),
        }
    }
}

fn win_ansi_byte(ch: char) -> u8 {
    match u32::from(ch) {
        code @ (0x00..=0x7F | 0xA0..=0xFF) => code as u8,
        0x20AC => 0x80, // euro
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85, // ellipsis
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91, // curly quotes
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95, // bullet
        0x2013 => 0x96, // en dash
        0x2014 => 0x97, // em dash
        0x02DC => 0x98,
        0x2122 => 0x99, // trade mark
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => b'?',
    }
}
