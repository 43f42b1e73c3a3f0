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

//! Error types for dump loading and rendering

use thiserror::Error;

/// Errors that can occur while turning an allocator dump into an image
#[derive(Error, Debug)]
pub enum DumpError {
    #[error("Malformed dump: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid memory type label: {0:?} (expected \"Type <N>\")")]
    InvalidTypeLabel(String),

    #[error("Invalid integer in field {field}: {value:?}")]
    InvalidInteger { field: &'static str, value: String },

    #[error("Unknown suballocation type: {0}")]
    UnknownSuballocationType(String),

    #[error("Dump contains no blocks with a non-zero size")]
    EmptyDump,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for dump visualization operations
pub type DumpResult<T> = Result<T, DumpError>;
