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

//! Memory Dump Visualizer
//!
//! Renders a JSON dump from a GPU memory allocator as a raster map. Each
//! dedicated allocation and pool block becomes a horizontal bar, colored by
//! suballocation type and drawn against a byte-scale grid.

pub mod config;
pub mod dump;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod render;
pub mod writer;

pub use config::{Palette, RenderConfig};
pub use dump::{Block, DedicatedAllocation, DumpData, MemoryTypeData, Suballocation, SuballocationType};
pub use error::{DumpError, DumpResult};
pub use layout::Layout;
pub use pipeline::{VisualizationReport, Visualizer};
pub use render::{FontSource, Renderer, bytes_to_str};
pub use writer::write_image;

/// Version string printed by the command-line tool
pub const PROGRAM_VERSION: &str = "VMA Dump Visualization 1.0.0";
