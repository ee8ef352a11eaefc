use crate::objects::format_real;

/// Represents a color in PDF documents.
///
/// Supports RGB, Grayscale, and CMYK color spaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// RGB color (red, green, blue) with values from 0.0 to 1.0
    Rgb(f64, f64, f64),
    /// Grayscale color with value from 0.0 (black) to 1.0 (white)
    Gray(f64),
    /// CMYK color (cyan, magenta, yellow, key/black) with values from 0.0 to 1.0
    Cmyk(f64, f64, f64, f64),
}

impl Color {
    /// Creates an RGB color with values clamped to 0.0-1.0.
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Color::Rgb(r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
    }

    /// Creates a grayscale color with value clamped to 0.0-1.0.
    pub fn gray(value: f64) -> Self {
        Color::Gray(value.clamp(0.0, 1.0))
    }

    /// Creates a CMYK color with values clamped to 0.0-1.0.
    pub fn cmyk(c: f64, m: f64, y: f64, k: f64) -> Self {
        Color::Cmyk(
            c.clamp(0.0, 1.0),
            m.clamp(0.0, 1.0),
            y.clamp(0.0, 1.0),
            k.clamp(0.0, 1.0),
        )
    }

    pub fn black() -> Self {
        Color::Gray(0.0)
    }

    pub fn white() -> Self {
        Color::Gray(1.0)
    }

    pub fn red() -> Self {
        Color::Rgb(1.0, 0.0, 0.0)
    }

    pub fn green() -> Self {
        Color::Rgb(0.0, 1.0, 0.0)
    }

    pub fn blue() -> Self {
        Color::Rgb(0.0, 0.0, 1.0)
    }

    /// RGB approximation, used where only DeviceRGB is allowed (outline `/C`).
    pub fn to_rgb(&self) -> (f64, f64, f64) {
        match *self {
            Color::Rgb(r, g, b) => (r, g, b),
            Color::Gray(g) => (g, g, g),
            Color::Cmyk(c, m, y, k) => (
                (1.0 - c) * (1.0 - k),
                (1.0 - m) * (1.0 - k),
                (1.0 - y) * (1.0 - k),
            ),
        }
    }

    /// Color-setting operator line, e.g. `1 0 0 rg`.
    pub fn operator(&self, stroke: bool) -> String {
        let (components, operator): (Vec<f64>, &str) = match *self {
            Color::Rgb(r, g, b) => (vec![r, g, b], if stroke { "RG" } else { "rg" }),
            Color::Gray(g) => (vec![g], if stroke { "G" } else { "g" }),
            Color::Cmyk(c, m, y, k) => (vec![c, m, y, k], if stroke { "K" } else { "k" }),
        };
        let mut line: Vec<String> = components.into_iter().map(format_real).collect();
        line.push(operator.to_string());
        line.join(" ")
    }
}
