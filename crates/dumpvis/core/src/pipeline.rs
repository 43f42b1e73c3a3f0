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

//! Load, lay out, render and write a dump in one pass.

use crate::config::RenderConfig;
use crate::dump::DumpData;
use crate::error::DumpResult;
use crate::layout::Layout;
use crate::render::{FontSource, Renderer};
use crate::writer::write_image;
use image::RgbImage;
use std::path::Path;
use tracing::{debug, info};

/// What a finished run produced
#[derive(Debug, Clone, PartialEq)]
pub struct VisualizationReport {
    pub image_width: u32,
    pub image_height: u32,
    pub pixels_per_byte: f64,
    pub memory_types: usize,
    pub rows: usize,
    pub builtin_font: bool,
}

pub struct Visualizer {
    config: RenderConfig,
}

impl Visualizer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Renders an already loaded dump without touching the filesystem
    /// (apart from reading the configured font).
    pub fn render(&self, dump: &DumpData) -> DumpResult<(RgbImage, VisualizationReport)> {
        let layout = Layout::compute(dump, &self.config)?;
        debug!(
            "Layout: {}x{} px, {:.6} px/byte, largest block {} bytes",
            layout.image_width, layout.image_height, layout.pixels_per_byte, layout.max_block_size
        );

        let font = FontSource::acquire(self.config.font_path.as_deref());
        let renderer = Renderer::new(&self.config, font);
        let image = renderer.render(dump, &layout);

        let report = VisualizationReport {
            image_width: layout.image_width,
            image_height: layout.image_height,
            pixels_per_byte: layout.pixels_per_byte,
            memory_types: dump.memory_types().count(),
            rows: dump.row_count(),
            builtin_font: renderer.font().is_builtin(),
        };
        Ok((image, report))
    }

    pub fn run(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> DumpResult<VisualizationReport> {
        let (input, output) = (input.as_ref(), output.as_ref());

        let dump = DumpData::load(input)?;
        let summary = dump.summary();
        debug!(
            "Loaded {} memory types: {} dedicated allocations, {} default pool blocks, {} custom pool blocks",
            summary.memory_types, summary.dedicated_allocations, summary.default_pool_blocks, summary.custom_pool_blocks
        );

        let (image, report) = self.render(&dump)?;
        write_image(&image, output)?;

        info!("Rendered {} rows from {} into {} ({}x{})", report.rows, input.display(), output.display(), report.image_width, report.image_height);
        Ok(report)
    }
}
