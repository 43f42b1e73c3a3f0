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

//! Image geometry for a dump
//!
//! Every bar shares one pixels-per-byte scale, chosen so the largest block or
//! dedicated allocation exactly fills the content width.

use crate::config::RenderConfig;
use crate::dump::DumpData;
use crate::error::{DumpError, DumpResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub image_width: u32,
    pub image_height: u32,
    pub pixels_per_byte: f64,
    pub max_block_size: u64,
}

impl Layout {
    pub fn compute(dump: &DumpData, config: &RenderConfig) -> DumpResult<Self> {
        let max_block_size = dump.max_block_size();
        if max_block_size == 0 {
            return Err(DumpError::EmptyDump);
        }

        Ok(Self {
            image_width: config.image_width,
            image_height: image_height(dump, config),
            pixels_per_byte: f64::from(config.content_width()) / max_block_size as f64,
            max_block_size,
        })
    }

    /// Pixel offset of a byte offset, truncated toward zero
    pub fn bytes_to_pixels(&self, bytes: u64) -> u32 {
        (bytes as f64 * self.pixels_per_byte) as u32
    }

    /// Byte distance between grid lines: 32 bytes doubled until lines sit at least 64px apart.
    /// Stops doubling at the largest power of two a `u64` can hold.
    pub fn grid_spacing(&self) -> u64 {
        let mut spacing: u64 = 32;
        while (spacing as f64) * self.pixels_per_byte < 64.0 {
            match spacing.checked_mul(2) {
                Some(next) => spacing = next,
                None => break,
            }
        }
        spacing
    }
}

/// Top margin, grid legend, then a header plus one row per bar for each memory type.
pub fn image_height(dump: &DumpData, config: &RenderConfig) -> u32 {
    let legend = config.font_size + config.margin;
    let header = config.margin + config.font_size;
    let rows: u32 = dump.memory_types().map(|(_, data)| header + data.row_count() as u32 * config.row_height()).sum();
    config.margin + legend + rows
}
