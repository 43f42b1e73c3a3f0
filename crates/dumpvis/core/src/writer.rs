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

use crate::error::DumpResult;
use image::{ImageFormat, RgbImage};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Writes `image` to `path`, picking the encoder from the file extension.
pub fn write_image(image: &RgbImage, path: impl AsRef<Path>) -> DumpResult<()> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    image.save_with_format(path, format)?;
    debug!("Wrote {}x{} {:?} image to {}", image.width(), image.height(), format, path.display());
    Ok(())
}
