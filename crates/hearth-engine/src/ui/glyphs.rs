//! Built-in 3x5 block font, used for labels while no font is loaded.
//!
//! Each glyph is five rows of three bits, most significant bit leftmost.
//! Lowercase letters render as uppercase; unsupported characters render as
//! blanks of the same advance.

pub const GLYPH_W: u32 = 3;
pub const GLYPH_H: u32 = 5;

/// Horizontal advance per character, in font cells (glyph + 1 spacing).
pub const ADVANCE: u32 = GLYPH_W + 1;

pub fn glyph(c: char) -> Option<[u8; 5]> {
    let rows = match c.to_ascii_uppercase() {
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b110, 0b001, 0b010, 0b100, 0b111],
        '3' => [0b110, 0b001, 0b010, 0b001, 0b110],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b110, 0b001, 0b110],
        '6' => [0b011, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b110],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => [0b110, 0b001, 0b010, 0b000, 0b010],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        _ => return None,
    };
    Some(rows)
}

/// Lit cells of `c` as `(column, row)` pairs.
pub fn cells(c: char) -> impl Iterator<Item = (u32, u32)> {
    let rows = glyph(c).unwrap_or([0; 5]);
    (0..GLYPH_H).flat_map(move |row| {
        (0..GLYPH_W).filter_map(move |col| {
            let bit = 1 << (GLYPH_W - 1 - col);
            (rows[row as usize] & bit != 0).then_some((col, row))
        })
    })
}

/// Label width in font cells. Trailing spacing is not counted.
pub fn text_cells(text: &str) -> u32 {
    let n = text.chars().count() as u32;
    if n == 0 { 0 } else { n * ADVANCE - 1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_are_case_insensitive() {
        assert_eq!(glyph('q'), glyph('Q'));
        assert!(glyph('~').is_none());
    }

    #[test]
    fn cells_follow_bit_order() {
        // '1' top row is 0b010: only the middle column.
        let top: Vec<_> = cells('1').filter(|&(_, row)| row == 0).collect();
        assert_eq!(top, vec![(1, 0)]);
        assert_eq!(cells('8').count(), 13);
        assert_eq!(cells(' ').count(), 0);
    }

    #[test]
    fn text_width_excludes_trailing_gap() {
        assert_eq!(text_cells(""), 0);
        assert_eq!(text_cells("A"), 3);
        assert_eq!(text_cells("OK"), 7);
    }
}
