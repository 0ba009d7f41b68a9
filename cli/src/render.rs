use crossterm::style::{Color, Stylize};
use minegrid_core::{CellView, GlyphColor, Session, glyph_color};

const fn terminal_color(color: GlyphColor) -> Color {
    use GlyphColor::*;
    match color {
        Blue => Color::Blue,
        Green => Color::Green,
        Red => Color::Red,
        DarkBlue => Color::DarkBlue,
        DarkRed => Color::DarkRed,
        DarkGray => Color::DarkGrey,
    }
}

fn glyph(view: CellView) -> (char, Option<Color>) {
    match view {
        CellView::Hidden => ('#', None),
        CellView::Flagged => ('F', Some(Color::Magenta)),
        CellView::Open(0) => ('.', None),
        CellView::Open(count) => (
            char::from(b'0' + count),
            glyph_color(count).map(terminal_color),
        ),
        CellView::Mine => ('*', None),
        CellView::TriggeredMine => ('X', Some(Color::Red)),
    }
}

/// Draws the whole board with row/column headers, followed by the mine counter.
pub fn render(session: &Session, colored: bool) -> String {
    let (rows, cols) = session.board().size();
    let mut out = String::from("   ");

    for col in 0..cols {
        out.push_str(&format!("{col:>3}"));
    }
    out.push('\n');

    for row in 0..rows {
        out.push_str(&format!("{row:>3}"));
        for col in 0..cols {
            let Ok(view) = session.view_at((row, col)) else {
                continue;
            };
            let (ch, color) = glyph(view);
            out.push_str("  ");
            match color {
                Some(color) if colored => {
                    out.push_str(&ch.to_string().with(color).bold().to_string());
                }
                _ => out.push(ch),
            }
        }
        out.push('\n');
    }

    out.push_str(&session.mine_counter_text());
    out.push('\n');
    out
}
