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

//! JSON dump loader
//!
//! The allocator writes most integers as strings (`"Size": "1024"`), so every
//! integer field accepts either a JSON string or a JSON number. The raw
//! document is deserialized first and then normalized into [`DumpData`].

use super::model::{Block, DedicatedAllocation, DumpData, Suballocation, SuballocationType};
use crate::error::{DumpError, DumpResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

const TYPE_LABEL_PREFIX: &str = "Type ";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonInteger {
    Number(u64),
    Text(String),
}

impl JsonInteger {
    fn parse(&self, field: &'static str) -> DumpResult<u64> {
        match self {
            JsonInteger::Number(value) => Ok(*value),
            JsonInteger::Text(text) => text.trim().parse().map_err(|_| DumpError::InvalidInteger { field, value: text.clone() }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawDump {
    #[serde(rename = "DedicatedAllocations")]
    dedicated_allocations: Option<BTreeMap<String, Vec<RawAllocation>>>,
    #[serde(rename = "DefaultPools")]
    default_pools: Option<BTreeMap<String, RawPool>>,
    #[serde(rename = "Pools")]
    pools: Option<Vec<RawCustomPool>>,
}

#[derive(Debug, Deserialize)]
struct RawAllocation {
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Size")]
    size: JsonInteger,
}

#[derive(Debug, Deserialize)]
struct RawPool {
    #[serde(rename = "Blocks")]
    blocks: Vec<RawBlock>,
}

#[derive(Debug, Deserialize)]
struct RawCustomPool {
    #[serde(rename = "MemoryTypeIndex")]
    memory_type_index: JsonInteger,
    #[serde(rename = "Blocks")]
    blocks: Vec<RawBlock>,
}

#[derive(Debug, Deserialize)]
struct RawBlock {
    #[serde(rename = "TotalBytes")]
    total_bytes: JsonInteger,
    #[serde(rename = "Suballocations")]
    suballocations: Vec<RawAllocation>,
}

/// Parses a `"Type <N>"` label into its memory type index.
pub fn parse_type_label(label: &str) -> DumpResult<u32> {
    let index = label.strip_prefix(TYPE_LABEL_PREFIX).ok_or_else(|| DumpError::InvalidTypeLabel(label.to_string()))?;
    index.trim().parse().map_err(|_| DumpError::InvalidTypeLabel(label.to_string()))
}

fn memory_type_index(value: &JsonInteger) -> DumpResult<u32> {
    let index = value.parse("MemoryTypeIndex")?;
    u32::try_from(index).map_err(|_| DumpError::InvalidInteger { field: "MemoryTypeIndex", value: index.to_string() })
}

fn convert_allocation(raw: &RawAllocation) -> DumpResult<(SuballocationType, u64)> {
    Ok((raw.kind.parse()?, raw.size.parse("Size")?))
}

fn convert_block(raw: &RawBlock) -> DumpResult<Block> {
    let mut block = Block::new(raw.total_bytes.parse("TotalBytes")?);
    for raw_suballoc in &raw.suballocations {
        let (kind, size) = convert_allocation(raw_suballoc)?;
        block.suballocations.push(Suballocation { kind, size });
    }
    Ok(block)
}

impl DumpData {
    /// Parses a dump from JSON text.
    pub fn from_json_str(json: &str) -> DumpResult<Self> {
        let raw: RawDump = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    pub fn from_reader(reader: impl Read) -> DumpResult<Self> {
        let raw: RawDump = serde_json::from_reader(reader)?;
        Self::from_raw(raw)
    }

    /// Reads and parses the dump file at `path`.
    pub fn load(path: impl AsRef<Path>) -> DumpResult<Self> {
        let path = path.as_ref();
        debug!("Loading dump from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    fn from_raw(raw: RawDump) -> DumpResult<Self> {
        let mut dump = DumpData::default();

        if let Some(dedicated) = raw.dedicated_allocations {
            for (label, allocations) in &dedicated {
                let type_data = dump.memory_type_mut(parse_type_label(label)?);
                for raw_alloc in allocations {
                    let (kind, size) = convert_allocation(raw_alloc)?;
                    type_data.dedicated_allocations.push(DedicatedAllocation { kind, size });
                }
            }
        }

        if let Some(default_pools) = raw.default_pools {
            for (label, pool) in &default_pools {
                let type_data = dump.memory_type_mut(parse_type_label(label)?);
                for raw_block in &pool.blocks {
                    type_data.default_pool_blocks.push(convert_block(raw_block)?);
                }
            }
        }

        if let Some(pools) = raw.pools {
            for pool in &pools {
                let type_data = dump.memory_type_mut(memory_type_index(&pool.memory_type_index)?);
                for raw_block in &pool.blocks {
                    type_data.custom_pool_blocks.push(convert_block(raw_block)?);
                }
            }
        }

        Ok(dump)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "Total": {"Blocks": 3, "Allocations": 4},
        "DedicatedAllocations": {
            "Type 1": [
                {"Type": "IMAGE_OPTIMAL", "Size": "65536"},
                {"Type": "BUFFER", "Size": "256"}
            ]
        },
        "DefaultPools": {
            "Type 0": {
                "Blocks": [
                    {"TotalBytes": "4096", "UnusedBytes": "1024", "Suballocations": [
                        {"Type": "BUFFER", "Size": "1024", "Offset": "0"},
                        {"Type": "FREE", "Size": "1024"},
                        {"Type": "IMAGE_LINEAR", "Size": "2048"}
                    ]}
                ]
            }
        },
        "Pools": [
            {"MemoryTypeIndex": "3", "Blocks": [
                {"TotalBytes": 2048, "Suballocations": [{"Type": "FREE", "Size": 2048}]}
            ]},
            {"MemoryTypeIndex": "0", "Blocks": []}
        ]
    }"#;

    #[test]
    fn test_load_groups_by_memory_type() {
        let dump = DumpData::from_json_str(SAMPLE).unwrap();
        let indices: Vec<u32> = dump.memory_types().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 1, 3]);

        let type0 = dump.memory_type(0).unwrap();
        assert_eq!(type0.default_pool_blocks.len(), 1);
        assert!(type0.custom_pool_blocks.is_empty());
        let block = &type0.default_pool_blocks[0];
        assert_eq!(block.size, 4096);
        assert_eq!(block.suballocations.len(), 3);
        assert_eq!(block.suballocations[2], Suballocation { kind: SuballocationType::ImageLinear, size: 2048 });

        let type1 = dump.memory_type(1).unwrap();
        assert_eq!(
            type1.dedicated_allocations,
            vec![
                DedicatedAllocation { kind: SuballocationType::ImageOptimal, size: 65536 },
                DedicatedAllocation { kind: SuballocationType::Buffer, size: 256 },
            ]
        );

        let type3 = dump.memory_type(3).unwrap();
        assert_eq!(type3.custom_pool_blocks[0].size, 2048);
    }

    #[test]
    fn test_all_keys_optional() {
        let dump = DumpData::from_json_str("{}").unwrap();
        assert!(dump.is_empty());
    }

    #[test]
    fn test_parse_type_label() {
        assert_eq!(parse_type_label("Type 0").unwrap(), 0);
        assert_eq!(parse_type_label("Type 17").unwrap(), 17);
        assert!(matches!(parse_type_label("Heap 1"), Err(DumpError::InvalidTypeLabel(_))));
        assert!(matches!(parse_type_label("Type x"), Err(DumpError::InvalidTypeLabel(_))));
        assert!(matches!(parse_type_label("type 1"), Err(DumpError::InvalidTypeLabel(_))));
    }

    #[test]
    fn test_bad_label_aborts_load() {
        let json = r#"{"DedicatedAllocations": {"Heap 0": []}}"#;
        assert!(matches!(DumpData::from_json_str(json), Err(DumpError::InvalidTypeLabel(label)) if label == "Heap 0"));
    }

    #[test]
    fn test_missing_key_is_parse_error() {
        let json = r#"{"Pools": [{"MemoryTypeIndex": "0"}]}"#;
        assert!(matches!(DumpData::from_json_str(json), Err(DumpError::Json(_))));
    }

    #[test]
    fn test_invalid_integer() {
        let json = r#"{"Pools": [{"MemoryTypeIndex": "0", "Blocks": [{"TotalBytes": "lots", "Suballocations": []}]}]}"#;
        let err = DumpData::from_json_str(json).unwrap_err();
        assert!(matches!(err, DumpError::InvalidInteger { field: "TotalBytes", .. }));
    }

    #[test]
    fn test_unknown_suballocation_type() {
        let json = r#"{"Pools": [{"MemoryTypeIndex": "0", "Blocks": [
            {"TotalBytes": "16", "Suballocations": [{"Type": "UNKNOWN", "Size": "16"}]}
        ]}]}"#;
        assert!(matches!(DumpData::from_json_str(json), Err(DumpError::UnknownSuballocationType(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let dump = DumpData::load(file.path()).unwrap();
        assert_eq!(dump.summary().memory_types, 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = DumpData::load("/nonexistent/dump.json").unwrap_err();
        assert!(matches!(err, DumpError::Io(_)));
    }
}
