//! 5x7 dot-matrix glyphs for numeric chart labels and `MM/YY` period ticks.
//!
//! Charts are rasterized without system fonts, so value labels are drawn
//! dot by dot from this table.

pub const GLYPH_WIDTH: i32 = 5;
pub const GLYPH_HEIGHT: i32 = 7;

/// Rows top to bottom, bit 4 is the leftmost column.
fn rows(c: char) -> Option<[u8; 7]> {
    let rows = match c {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '+' => [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00],
        '/' => [0x01, 0x01, 0x02, 0x04, 0x08, 0x10, 0x10],
        ' ' => [0; 7],
        _ => return None,
    };
    Some(rows)
}

/// Lit dots of `text` as `(column, row)` cells, one blank column between glyphs.
/// Characters without a glyph are skipped.
pub fn dots(text: &str) -> Vec<(i32, i32)> {
    let mut cells = Vec::new();
    let mut offset = 0;
    for c in text.chars() {
        let Some(rows) = rows(c) else { continue };
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (0x10 >> col) != 0 {
                    cells.push((offset + col, row as i32));
                }
            }
        }
        offset += GLYPH_WIDTH + 1;
    }
    cells
}

/// Width in cells of the rendered text.
pub fn width(text: &str) -> i32 {
    let count = text.chars().filter(|c| rows(*c).is_some()).count() as i32;
    if count == 0 { 0 } else { count * (GLYPH_WIDTH + 1) - 1 }
}
