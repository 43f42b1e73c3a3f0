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

//! Raster rendering of a loaded dump
//!
//! Rectangles and lines use inclusive corner coordinates: `[x0, x1]` covers
//! `x1 - x0 + 1` pixels, so a bar for a block that fills the content width
//! ends on the right margin's first column.

pub mod font;
pub mod format;

pub use font::FontSource;
pub use format::bytes_to_str;

use crate::config::RenderConfig;
use crate::dump::{Block, DedicatedAllocation, DumpData};
use crate::layout::Layout;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

/// Minimum gap kept between a grid label and the right edge of the content area
const GRID_LABEL_CLEARANCE: u32 = 32;

pub struct Renderer<'a> {
    config: &'a RenderConfig,
    font: FontSource,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a RenderConfig, font: FontSource) -> Self {
        Self { config, font }
    }

    pub fn font(&self) -> &FontSource {
        &self.font
    }

    /// Draws the grid, then one section per memory type in ascending index order.
    pub fn render(&self, dump: &DumpData, layout: &Layout) -> RgbImage {
        let config = self.config;
        let palette = &config.palette;
        let mut image = RgbImage::from_pixel(layout.image_width, layout.image_height, Rgb(palette.background));

        let mut y = config.margin;
        self.draw_grid(&mut image, layout, y);
        y += config.font_size + config.margin;

        for (index, data) in dump.memory_types() {
            self.text(&mut image, Rgb(palette.text_h1), config.margin, y, &format!("Memory type {index}"));
            y += config.font_size + config.margin;

            for (i, allocation) in data.dedicated_allocations.iter().enumerate() {
                y = self.label(&mut image, y, &format!("Dedicated allocation {i}"));
                self.draw_dedicated_allocation(&mut image, layout, y, allocation);
                y += config.bar_height + config.margin;
            }
            for (i, block) in data.default_pool_blocks.iter().enumerate() {
                y = self.label(&mut image, y, &format!("Default pool block {i}"));
                self.draw_block(&mut image, layout, y, block);
                y += config.bar_height + config.margin;
            }
            for (i, block) in data.custom_pool_blocks.iter().enumerate() {
                y = self.label(&mut image, y, &format!("Custom pool block {i}"));
                self.draw_block(&mut image, layout, y, block);
                y += config.bar_height + config.margin;
            }
        }

        image
    }

    fn label(&self, image: &mut RgbImage, y: u32, text: &str) -> u32 {
        self.text(image, Rgb(self.config.palette.text_h2), self.config.margin, y, text);
        y + self.config.font_size + self.config.margin
    }

    fn text(&self, image: &mut RgbImage, color: Rgb<u8>, x: u32, y: u32, text: &str) {
        self.font.draw_text(image, color, x as i32, y as i32, self.config.font_size, text);
    }

    /// Vertical lines at power-of-two byte multiples, labelled along the top row.
    fn draw_grid(&self, image: &mut RgbImage, layout: &Layout, label_y: u32) {
        let config = self.config;
        let spacing = layout.grid_spacing();
        let limit = config.content_width();
        let line_color = Rgb(config.palette.grid_line);

        let mut byte = 0u64;
        loop {
            let x = layout.bytes_to_pixels(byte);
            if x > limit {
                break;
            }
            vertical_line(image, config.margin + x, 0, layout.image_height, line_color);
            if x + GRID_LABEL_CLEARANCE < limit {
                let label_x = x + config.margin + config.font_size / 4;
                self.text(image, Rgb(config.palette.text_h2), label_x, label_y, &bytes_to_str(byte));
            }
            match byte.checked_add(spacing) {
                Some(next) => byte = next,
                None => break,
            }
        }
    }

    fn draw_dedicated_allocation(&self, image: &mut RgbImage, layout: &Layout, y: u32, allocation: &DedicatedAllocation) {
        let config = self.config;
        let right = config.margin + layout.bytes_to_pixels(allocation.size);
        let bottom = y + config.bar_height;
        fill_rect(image, config.margin, y, right, bottom, config.palette.suballocation(allocation.kind));
        outline_rect(image, config.margin, y, right, bottom, Rgb(config.palette.outline));
    }

    /// Draws a block on a FREE-colored background.
    ///
    /// Runs narrower than two pixels become a hard line so they stay visible. A
    /// following rectangle that starts on that line overwrites it with its
    /// outline, so the line is drawn again afterwards.
    fn draw_block(&self, image: &mut RgbImage, layout: &Layout, y: u32, block: &Block) {
        let config = self.config;
        let palette = &config.palette;
        let left = config.margin;
        let bottom = y + config.bar_height;
        let hard_line = Rgb(palette.outline_hard);

        fill_rect(image, left, y, left + layout.bytes_to_pixels(block.size), bottom, Rgb(palette.free));

        let mut x = 0u32;
        let mut last_hard_line_x: Option<u32> = None;
        for (_, end, kind) in block.ranges() {
            let x_end = layout.bytes_to_pixels(end);
            if !kind.is_free() {
                if x_end > x + 1 {
                    fill_rect(image, left + x, y, left + x_end, bottom, palette.suballocation(kind));
                    outline_rect(image, left + x, y, left + x_end, bottom, Rgb(palette.outline));
                    if last_hard_line_x == Some(x) {
                        vertical_line(image, left + x, y, bottom, hard_line);
                    }
                } else {
                    vertical_line(image, left + x, y, bottom, hard_line);
                    last_hard_line_x = Some(x);
                }
            }
            x = x_end;
        }
    }
}

fn inclusive_rect(x0: u32, y0: u32, x1: u32, y1: u32) -> Rect {
    Rect::at(x0 as i32, y0 as i32).of_size(x1.saturating_sub(x0) + 1, y1.saturating_sub(y0) + 1)
}

fn fill_rect(image: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    draw_filled_rect_mut(image, inclusive_rect(x0, y0, x1, y1), color);
}

fn outline_rect(image: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    draw_hollow_rect_mut(image, inclusive_rect(x0, y0, x1, y1), color);
}

fn vertical_line(image: &mut RgbImage, x: u32, y0: u32, y1: u32, color: Rgb<u8>) {
    draw_line_segment_mut(image, (x as f32, y0 as f32), (x as f32, y1 as f32), color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::{Suballocation, SuballocationType};

    const GRAY: Rgb<u8> = Rgb([220, 220, 220]);
    const YELLOW: Rgb<u8> = Rgb([255, 255, 0]);
    const OUTLINE: Rgb<u8> = Rgb([160, 160, 160]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const GRID: Rgb<u8> = Rgb([224, 224, 224]);

    fn config() -> RenderConfig {
        RenderConfig { font_path: None, ..RenderConfig::default() }
    }

    fn render(dump: &DumpData, config: &RenderConfig) -> RgbImage {
        let layout = Layout::compute(dump, config).unwrap();
        Renderer::new(config, FontSource::Builtin).render(dump, &layout)
    }

    fn pool_dump(size: u64, parts: &[(SuballocationType, u64)]) -> DumpData {
        let mut dump = DumpData::default();
        dump.memory_type_mut(0).custom_pool_blocks.push(Block {
            size,
            suballocations: parts.iter().map(|&(kind, size)| Suballocation { kind, size }).collect(),
        });
        dump
    }

    // First bar of the first memory type: margin, legend, header and label rows.
    const FIRST_BAR_Y: u32 = 8 + 18 + 18 + 18;

    #[test]
    fn test_half_buffer_half_free() {
        let dump = pool_dump(1024, &[(SuballocationType::Buffer, 512), (SuballocationType::Free, 512)]);
        let image = render(&dump, &config());
        let mid = FIRST_BAR_Y + 12;

        assert_eq!(image.dimensions(), (800, 94));
        assert_eq!(*image.get_pixel(200, mid), YELLOW);
        assert_eq!(*image.get_pixel(600, mid), GRAY);
        assert_eq!(*image.get_pixel(8, mid), OUTLINE);
        assert_eq!(*image.get_pixel(400, mid), OUTLINE);
        assert_eq!(*image.get_pixel(792, mid), GRAY);
        assert_eq!(*image.get_pixel(796, mid), WHITE);
        assert_eq!(*image.get_pixel(200, FIRST_BAR_Y - 1), WHITE);
        assert_eq!(*image.get_pixel(200, FIRST_BAR_Y + 25), WHITE);
    }

    #[test]
    fn test_grid_lines_span_the_image() {
        let dump = pool_dump(1024, &[]);
        let image = render(&dump, &config());
        // 128-byte spacing at 0.765625 px/byte puts lines every 98px from the margin
        for x in [8, 106, 204, 302, 400, 498, 596, 694, 792] {
            assert_eq!(*image.get_pixel(x, 0), GRID, "grid line at x={x}");
            assert_eq!(*image.get_pixel(x, 93), GRID, "grid line at x={x}");
        }
        assert_eq!(*image.get_pixel(107, 93), WHITE);
    }

    #[test]
    fn test_grid_labels_stop_short_of_right_edge() {
        let dump = pool_dump(1024, &[]);
        let image = render(&dump, &config());
        let text = Rgb([150, 150, 150]);
        let legend: Vec<u32> = image.enumerate_pixels().filter(|(_, y, p)| (8..18).contains(y) && **p == text).map(|(x, _, _)| x).collect();

        // "896 B" at x = 696 is the last label; 1024 B at x = 792 has no room
        assert!(legend.iter().any(|&x| x > 694));
        assert!(legend.iter().all(|&x| x < 740));
    }

    #[test]
    fn test_block_near_u64_max() {
        let dump = pool_dump(u64::MAX, &[(SuballocationType::Buffer, u64::MAX / 2)]);
        let image = render(&dump, &config());
        let mid = FIRST_BAR_Y + 12;

        assert_eq!(image.dimensions(), (800, 94));
        assert_eq!(*image.get_pixel(8, 0), GRID);
        assert_eq!(*image.get_pixel(200, mid), YELLOW);
        assert_eq!(*image.get_pixel(600, mid), GRAY);
    }

    #[test]
    fn test_narrow_suballocation_becomes_hard_line() {
        // 1 MiB at 784px puts the 512 KiB boundary exactly on x = 392
        let dump = pool_dump(1 << 20, &[(SuballocationType::Free, 1 << 19), (SuballocationType::Buffer, 10)]);
        let image = render(&dump, &config());
        let mid = FIRST_BAR_Y + 12;

        assert_eq!(*image.get_pixel(400, mid), BLACK);
        assert_eq!(*image.get_pixel(401, mid), GRAY);
    }

    #[test]
    fn test_hard_line_redrawn_over_outline() {
        let dump = pool_dump(
            1 << 20,
            &[(SuballocationType::Free, 1 << 19), (SuballocationType::Buffer, 10), (SuballocationType::ImageOptimal, 100_000)],
        );
        let image = render(&dump, &config());
        let mid = FIRST_BAR_Y + 12;

        assert_eq!(*image.get_pixel(400, mid), BLACK);
        assert_eq!(*image.get_pixel(420, mid), SuballocationType::ImageOptimal.color());
    }

    #[test]
    fn test_dedicated_allocation_bar() {
        let mut dump = DumpData::default();
        let data = dump.memory_type_mut(1);
        data.dedicated_allocations.push(DedicatedAllocation { kind: SuballocationType::ImageLinear, size: 2048 });
        data.dedicated_allocations.push(DedicatedAllocation { kind: SuballocationType::Buffer, size: 1024 });
        let image = render(&dump, &config());

        let first_mid = FIRST_BAR_Y + 12;
        assert_eq!(*image.get_pixel(400, first_mid), SuballocationType::ImageLinear.color());
        assert_eq!(*image.get_pixel(792, first_mid), OUTLINE);

        let second_mid = first_mid + 50;
        assert_eq!(*image.get_pixel(200, second_mid), YELLOW);
        assert_eq!(*image.get_pixel(400, second_mid), OUTLINE);
        assert_eq!(*image.get_pixel(600, second_mid), WHITE);
    }

    #[test]
    fn test_rows_follow_section_order() {
        let mut dump = pool_dump(4096, &[(SuballocationType::ImageOptimal, 4096)]);
        let data = dump.memory_type_mut(0);
        data.dedicated_allocations.push(DedicatedAllocation { kind: SuballocationType::Buffer, size: 4096 });
        data.default_pool_blocks.push(Block {
            size: 4096,
            suballocations: vec![Suballocation { kind: SuballocationType::ImageLinear, size: 4096 }],
        });
        let image = render(&dump, &config());

        let mid = FIRST_BAR_Y + 12;
        assert_eq!(*image.get_pixel(300, mid), YELLOW);
        assert_eq!(*image.get_pixel(300, mid + 50), SuballocationType::ImageLinear.color());
        assert_eq!(*image.get_pixel(300, mid + 100), SuballocationType::ImageOptimal.color());
    }

    #[test]
    fn test_render_is_deterministic() {
        let dump = pool_dump(
            1 << 20,
            &[(SuballocationType::Buffer, 1000), (SuballocationType::Free, 300_000), (SuballocationType::ImageLinear, 70_000), (SuballocationType::Buffer, 3)],
        );
        let config = config();
        assert_eq!(render(&dump, &config), render(&dump, &config));
    }

    #[test]
    fn test_custom_palette() {
        let mut config = config();
        config.palette.buffer = [1, 2, 3];
        let dump = pool_dump(1024, &[(SuballocationType::Buffer, 512)]);
        let image = render(&dump, &config);
        assert_eq!(*image.get_pixel(200, FIRST_BAR_Y + 12), Rgb([1, 2, 3]));
    }
}
