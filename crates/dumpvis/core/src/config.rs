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

use crate::dump::{SuballocationType, model::colors};
use crate::error::{DumpError, DumpResult};
use image::Rgb;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a render configuration file
pub const CONFIG_ENV_VAR: &str = "DUMPVIS_CONFIG";

/// Font tried before falling back to the built-in bitmap font
pub const DEFAULT_FONT_FILE: &str = "segoeuib.ttf";

/// Geometry, font and palette used when drawing a dump
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub image_width: u32,
    pub margin: u32,
    pub font_size: u32,
    /// Height of a single block bar
    pub bar_height: u32,
    pub font_path: Option<PathBuf>,
    pub palette: Palette,
}

/// RGB colors, stored as `[r, g, b]` so they read naturally in TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: [u8; 3],
    pub text_h1: [u8; 3],
    pub text_h2: [u8; 3],
    pub outline: [u8; 3],
    pub outline_hard: [u8; 3],
    pub grid_line: [u8; 3],
    pub free: [u8; 3],
    pub buffer: [u8; 3],
    pub image_optimal: [u8; 3],
    pub image_linear: [u8; 3],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: [255, 255, 255],
            text_h1: [0, 0, 0],
            text_h2: [150, 150, 150],
            outline: [160, 160, 160],
            outline_hard: [0, 0, 0],
            grid_line: [224, 224, 224],
            free: colors::FREE,
            buffer: colors::BUFFER,
            image_optimal: colors::IMAGE_OPTIMAL,
            image_linear: colors::IMAGE_LINEAR,
        }
    }
}

impl Palette {
    pub fn suballocation(&self, kind: SuballocationType) -> Rgb<u8> {
        Rgb(match kind {
            SuballocationType::Free => self.free,
            SuballocationType::Buffer => self.buffer,
            SuballocationType::ImageOptimal => self.image_optimal,
            SuballocationType::ImageLinear => self.image_linear,
        })
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_width: 800,
            margin: 8,
            font_size: 10,
            bar_height: 24,
            font_path: Some(PathBuf::from(DEFAULT_FONT_FILE)),
            palette: Palette::default(),
        }
    }
}

impl RenderConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> DumpResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| DumpError::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        let config: Self = toml::from_str(&content).map_err(|e| DumpError::Config(format!("Cannot parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> DumpResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| DumpError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Picks the config file from the CLI, then `$DUMPVIS_CONFIG`, then defaults.
    /// A font given on the command line overrides the one in the file.
    pub fn resolve_config(cli_config: Option<PathBuf>, cli_font: Option<PathBuf>) -> DumpResult<Self> {
        let mut config = if let Some(config_path) = cli_config {
            Self::load_from_file(config_path)?
        } else if let Ok(env_config) = std::env::var(CONFIG_ENV_VAR) {
            Self::load_from_file(env_config)?
        } else {
            Self::default()
        };

        if let Some(font) = cli_font {
            config.font_path = Some(font);
        }

        Ok(config)
    }

    /// Usable width for bars, in pixels
    pub fn content_width(&self) -> u32 {
        self.image_width.saturating_sub(2 * self.margin)
    }

    /// Height of a labelled bar row: label, bar and the margins around them
    pub fn row_height(&self) -> u32 {
        2 * self.margin + self.font_size + self.bar_height
    }

    pub fn validate(&self) -> DumpResult<()> {
        if self.content_width() == 0 {
            return Err(DumpError::Config(format!("image_width {} leaves no room inside margin {}", self.image_width, self.margin)));
        }
        if self.bar_height == 0 {
            return Err(DumpError::Config("bar_height must be positive".to_string()));
        }
        Ok(())
    }
}
