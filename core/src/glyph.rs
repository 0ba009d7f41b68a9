use serde::{Deserialize, Serialize};

/// Color class for the digit shown on a revealed cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlyphColor {
    Blue,
    Green,
    Red,
    DarkBlue,
    DarkRed,
    DarkGray,
}

impl GlyphColor {
    pub const fn class_name(self) -> &'static str {
        use GlyphColor::*;
        match self {
            Blue => "blue",
            Green => "green",
            Red => "red",
            DarkBlue => "dark-blue",
            DarkRed => "dark-red",
            DarkGray => "dark-gray",
        }
    }
}

/// Maps an adjacency count to its color class, zero cells have no glyph.
pub const fn glyph_color(count: u8) -> Option<GlyphColor> {
    use GlyphColor::*;
    Some(match count {
        0 => return None,
        1 => Blue,
        2 => Green,
        3 => Red,
        4 => DarkBlue,
        5 => DarkRed,
        _ => DarkGray,
    })
}
