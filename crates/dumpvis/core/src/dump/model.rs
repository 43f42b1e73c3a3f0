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

//! In-memory model of an allocator dump, grouped by memory type.

use crate::error::{DumpError, DumpResult};
use image::Rgb;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Default fill colors for each suballocation type
pub mod colors {
    pub const FREE: [u8; 3] = [220, 220, 220];
    pub const BUFFER: [u8; 3] = [255, 255, 0];
    pub const IMAGE_OPTIMAL: [u8; 3] = [128, 255, 255];
    pub const IMAGE_LINEAR: [u8; 3] = [64, 255, 64];
}

/// Usage tag attached to a suballocation or dedicated allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuballocationType {
    Free,
    Buffer,
    ImageOptimal,
    ImageLinear,
}

impl SuballocationType {
    pub const ALL: [SuballocationType; 4] = [Self::Free, Self::Buffer, Self::ImageOptimal, Self::ImageLinear];

    /// Returns the tag as it appears in the dump.
    pub fn as_str(&self) -> &'static str {
        match self {
            SuballocationType::Free => "FREE",
            SuballocationType::Buffer => "BUFFER",
            SuballocationType::ImageOptimal => "IMAGE_OPTIMAL",
            SuballocationType::ImageLinear => "IMAGE_LINEAR",
        }
    }

    /// Returns the default fill color for this type.
    pub fn color(&self) -> Rgb<u8> {
        Rgb(match self {
            SuballocationType::Free => colors::FREE,
            SuballocationType::Buffer => colors::BUFFER,
            SuballocationType::ImageOptimal => colors::IMAGE_OPTIMAL,
            SuballocationType::ImageLinear => colors::IMAGE_LINEAR,
        })
    }

    pub fn is_free(&self) -> bool {
        matches!(self, SuballocationType::Free)
    }
}

impl FromStr for SuballocationType {
    type Err = DumpError;

    fn from_str(s: &str) -> DumpResult<Self> {
        match s {
            "FREE" => Ok(SuballocationType::Free),
            "BUFFER" => Ok(SuballocationType::Buffer),
            "IMAGE_OPTIMAL" => Ok(SuballocationType::ImageOptimal),
            "IMAGE_LINEAR" => Ok(SuballocationType::ImageLinear),
            other => Err(DumpError::UnknownSuballocationType(other.to_string())),
        }
    }
}

impl fmt::Display for SuballocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A region of a block tagged with its usage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suballocation {
    pub kind: SuballocationType,
    pub size: u64,
}

/// An allocation that owns its whole block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedicatedAllocation {
    pub kind: SuballocationType,
    pub size: u64,
}

/// A pool block subdivided into suballocations
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    pub size: u64,
    pub suballocations: Vec<Suballocation>,
}

impl Block {
    pub fn new(size: u64) -> Self {
        Self { size, suballocations: Vec::new() }
    }

    /// Iterates suballocations with their cumulative `[start, end)` byte range.
    pub fn ranges(&self) -> impl Iterator<Item = (u64, u64, SuballocationType)> + '_ {
        self.suballocations.iter().scan(0u64, |offset, suballoc| {
            let start = *offset;
            let end = start.saturating_add(suballoc.size);
            *offset = end;
            Some((start, end, suballoc.kind))
        })
    }

    /// Sum of all suballocation sizes
    pub fn used_bytes(&self) -> u64 {
        self.suballocations.iter().map(|s| s.size).sum()
    }
}

/// Everything the dump reports for a single memory type
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemoryTypeData {
    pub dedicated_allocations: Vec<DedicatedAllocation>,
    pub default_pool_blocks: Vec<Block>,
    pub custom_pool_blocks: Vec<Block>,
}

impl MemoryTypeData {
    /// Number of bar rows this memory type contributes
    pub fn row_count(&self) -> usize {
        self.dedicated_allocations.len() + self.default_pool_blocks.len() + self.custom_pool_blocks.len()
    }

    /// Largest dedicated allocation or block size
    pub fn max_block_size(&self) -> u64 {
        let dedicated = self.dedicated_allocations.iter().map(|a| a.size);
        let blocks = self.default_pool_blocks.iter().chain(&self.custom_pool_blocks).map(|b| b.size);
        dedicated.chain(blocks).max().unwrap_or(0)
    }
}

/// Counts gathered from a loaded dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DumpSummary {
    pub memory_types: usize,
    pub dedicated_allocations: usize,
    pub default_pool_blocks: usize,
    pub custom_pool_blocks: usize,
    pub total_bytes: u64,
}

/// A loaded dump, keyed by memory type index in ascending order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DumpData {
    pub(crate) memory_types: BTreeMap<u32, MemoryTypeData>,
}

impl DumpData {
    pub fn memory_types(&self) -> impl Iterator<Item = (u32, &MemoryTypeData)> {
        self.memory_types.iter().map(|(index, data)| (*index, data))
    }

    pub fn memory_type(&self, index: u32) -> Option<&MemoryTypeData> {
        self.memory_types.get(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.memory_types.is_empty()
    }

    /// Returns the group for `index`, creating an empty one on first use.
    pub(crate) fn memory_type_mut(&mut self, index: u32) -> &mut MemoryTypeData {
        self.memory_types.entry(index).or_default()
    }

    pub fn max_block_size(&self) -> u64 {
        self.memory_types.values().map(MemoryTypeData::max_block_size).max().unwrap_or(0)
    }

    pub fn row_count(&self) -> usize {
        self.memory_types.values().map(MemoryTypeData::row_count).sum()
    }

    pub fn summary(&self) -> DumpSummary {
        let mut summary = DumpSummary { memory_types: self.memory_types.len(), ..Default::default() };
        for data in self.memory_types.values() {
            summary.dedicated_allocations += data.dedicated_allocations.len();
            summary.default_pool_blocks += data.default_pool_blocks.len();
            summary.custom_pool_blocks += data.custom_pool_blocks.len();
            summary.total_bytes += data.dedicated_allocations.iter().map(|a| a.size).sum::<u64>();
            summary.total_bytes += data.default_pool_blocks.iter().chain(&data.custom_pool_blocks).map(|b| b.size).sum::<u64>();
        }
        summary
    }
}
