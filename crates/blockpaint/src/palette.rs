//! 16-entry indexed palettes.

use crate::PALETTE_SIZE;

/// One palette entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Squared Euclidean distance in RGB space.
    #[inline]
    pub fn distance_sq(&self, r: i32, g: i32, b: i32) -> i32 {
        let dr = self.r as i32 - r;
        let dg = self.g as i32 - g;
        let db = self.b as i32 - b;
        dr * dr + dg * dg + db * db
    }
}

/// A named set of 16 colors addressed by block attribute nibbles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    name: &'static str,
    colors: [Rgb; PALETTE_SIZE],
}

impl Palette {
    /// Muted palette measured from real hardware output.
    pub fn murky() -> Self {
        Self {
            name: "murky",
            colors: [
                Rgb::new(0, 0, 0),       // black
                Rgb::new(255, 255, 255), // white
                Rgb::new(104, 55, 43),   // red
                Rgb::new(112, 164, 178), // cyan
                Rgb::new(111, 61, 134),  // purple
                Rgb::new(88, 141, 67),   // green
                Rgb::new(53, 40, 121),   // blue
                Rgb::new(184, 199, 111), // yellow
                Rgb::new(111, 79, 37),   // orange
                Rgb::new(67, 57, 0),     // brown
                Rgb::new(154, 103, 89),  // light red
                Rgb::new(68, 68, 68),    // dark grey
                Rgb::new(108, 108, 108), // grey
                Rgb::new(154, 210, 132), // light green
                Rgb::new(108, 94, 181),  // light blue
                Rgb::new(149, 149, 149), // light grey
            ],
        }
    }

    /// Saturated emulator-style palette.
    pub fn lively() -> Self {
        Self {
            name: "lively",
            colors: [
                Rgb::new(0, 0, 0),       // black
                Rgb::new(255, 255, 255), // white
                Rgb::new(136, 0, 0),     // red
                Rgb::new(170, 255, 238), // cyan
                Rgb::new(204, 68, 204),  // purple
                Rgb::new(0, 204, 85),    // green
                Rgb::new(0, 0, 170),     // blue
                Rgb::new(238, 238, 119), // yellow
                Rgb::new(221, 136, 85),  // orange
                Rgb::new(102, 68, 0),    // brown
                Rgb::new(255, 119, 119), // light red
                Rgb::new(51, 51, 51),    // dark grey
                Rgb::new(119, 119, 119), // grey
                Rgb::new(170, 255, 102), // light green
                Rgb::new(0, 136, 255),   // light blue
                Rgb::new(187, 187, 187), // light grey
            ],
        }
    }

    /// Look up a built-in palette by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "murky" => Some(Self::murky()),
            "lively" => Some(Self::lively()),
            _ => None,
        }
    }

    /// The other built-in palette.
    pub fn swapped(&self) -> Self {
        if self.name == "murky" {
            Self::lively()
        } else {
            Self::murky()
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn colors(&self) -> &[Rgb; PALETTE_SIZE] {
        &self.colors
    }

    /// Color for a palette index. Only the low nibble is used.
    #[inline]
    pub fn get(&self, index: u8) -> Rgb {
        self.colors[(index & 0x0f) as usize]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::murky()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name() {
        assert_eq!(Palette::by_name("Lively").map(|p| p.name()), Some("lively"));
        assert_eq!(Palette::by_name("murky").map(|p| p.name()), Some("murky"));
        assert!(Palette::by_name("vivid").is_none());
    }

    #[test]
    fn test_swap_cycles() {
        let p = Palette::default();
        assert_eq!(p.swapped().name(), "lively");
        assert_eq!(p.swapped().swapped(), p);
    }
}
