// Dotlanth
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Text drawing
//!
//! A TrueType font is loaded from disk when one is available. Otherwise text
//! is drawn with the 8x8 bitmap font from `font8x8`.

use ab_glyph::{FontVec, PxScale};
use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

const GLYPH_WIDTH: u32 = 8;
const GLYPH_HEIGHT: u32 = 8;
const GLYPH_ADVANCE: u32 = GLYPH_WIDTH;

/// Nominal pixel size the bitmap font is drawn at without scaling
const BUILTIN_NOMINAL_SIZE: u32 = 10;

pub enum FontSource {
    TrueType(FontVec),
    Builtin,
}

impl std::fmt::Debug for FontSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontSource::TrueType(_) => f.write_str("FontSource::TrueType"),
            FontSource::Builtin => f.write_str("FontSource::Builtin"),
        }
    }
}

impl FontSource {
    /// Loads the font at `path`, falling back to the built-in font if it is
    /// missing or unreadable.
    pub fn acquire(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return FontSource::Builtin;
        };

        match std::fs::read(path) {
            Ok(bytes) => match FontVec::try_from_vec(bytes) {
                Ok(font) => {
                    debug!("Using font {}", path.display());
                    FontSource::TrueType(font)
                }
                Err(e) => {
                    warn!("Font {} is not a usable TrueType font ({}), using built-in font", path.display(), e);
                    FontSource::Builtin
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Font {} not found, using built-in font", path.display());
                FontSource::Builtin
            }
            Err(e) => {
                warn!("Cannot read font {} ({}), using built-in font", path.display(), e);
                FontSource::Builtin
            }
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, FontSource::Builtin)
    }

    /// Draws `text` with its top-left corner at `(x, y)`. Pixels outside the image are dropped.
    pub fn draw_text(&self, image: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, size: u32, text: &str) {
        match self {
            FontSource::TrueType(font) => draw_text_mut(image, color, x, y, PxScale::from(size as f32), font, text),
            FontSource::Builtin => draw_bitmap_text(image, color, x, y, size, text),
        }
    }
}

fn draw_bitmap_text(image: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, size: u32, text: &str) {
    let scale = (size / BUILTIN_NOMINAL_SIZE).max(1) as i64;
    // center the glyph rows in the line
    let top = i64::from(y) + (i64::from(size) - GLYPH_HEIGHT as i64 * scale).max(0) / 2;
    let (width, height) = (i64::from(image.width()), i64::from(image.height()));

    let mut left = i64::from(x);
    for ch in text.chars() {
        let rows = glyph(ch);
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if (*bits >> col) & 1 == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        let px = left + i64::from(col) * scale + dx;
                        let py = top + row as i64 * scale + dy;
                        if (0..width).contains(&px) && (0..height).contains(&py) {
                            image.put_pixel(px as u32, py as u32, color);
                        }
                    }
                }
            }
        }
        left += i64::from(GLYPH_ADVANCE) * scale;
    }
}

/// Row bitmaps from the 8x8 basic Latin set; bit 0 of each row is the leftmost column.
fn glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')).unwrap_or([0; 8])
}
