use crate::world::block::{BlockId, BlockTraits, ItemStack, ToolContext};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Duplicate block ID: {0:?}")]
    DuplicateId(BlockId),
    #[error("Duplicate block name: {0}")]
    DuplicateName(String),
    #[error("Block ID 0 is reserved for air")]
    ReservedAir,
    #[error("Failed to parse block definition: {0}")]
    ParseError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawBlockDefinition {
    name: String,
    id: u16,
    blast_resistance: f32,
    #[serde(default)]
    primed_explosive: bool,
    #[serde(default)]
    harvest_tier: u8,
    #[serde(default)]
    drops: Vec<RawDrop>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawDrop {
    id: u16,
    #[serde(default = "one")]
    count: u8,
}

fn one() -> u8 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawBlockFile {
    blocks: Vec<RawBlockDefinition>,
}

/// Registry of per-material traits: blast resistance, explosive behavior,
/// and drop tables. ID 0 is always air and carries no traits.
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    by_name: HashMap<String, BlockId>,
    traits: HashMap<BlockId, BlockTraits>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Small built-in block set, enough to stand up a world without any
    /// data files.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let defs = [
            (
                BlockId(1),
                BlockTraits::solid("stone", 30.0).with_drops(vec![ItemStack::single(BlockId(1))]),
            ),
            (
                BlockId(2),
                BlockTraits::solid("dirt", 2.5).with_drops(vec![ItemStack::single(BlockId(2))]),
            ),
            (
                BlockId(3),
                BlockTraits::solid("obsidian", 6000.0)
                    .with_drops(vec![ItemStack::single(BlockId(3))])
                    .with_harvest_tier(3),
            ),
            (BlockId(4), BlockTraits::primed_explosive("tnt")),
            (
                BlockId(5),
                BlockTraits::solid("chest", 12.5).with_drops(vec![ItemStack::single(BlockId(5))]),
            ),
        ];
        for (id, traits) in defs {
            // Built-in table has no duplicates.
            let _ = registry.register_block(id, traits);
        }
        registry
    }

    pub fn register_block(&mut self, id: BlockId, traits: BlockTraits) -> Result<(), RegistryError> {
        if id == BlockId::AIR {
            return Err(RegistryError::ReservedAir);
        }
        if self.traits.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }
        if self.by_name.contains_key(&traits.name) {
            return Err(RegistryError::DuplicateName(traits.name));
        }
        self.by_name.insert(traits.name.clone(), id);
        self.traits.insert(id, traits);
        Ok(())
    }

    /// Loads block definitions from a JSON document:
    /// `{"blocks": [{"name": "stone", "id": 1, "blast_resistance": 30.0, ...}]}`
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        let raw: RawBlockFile = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for def in raw.blocks {
            registry.register_block(
                BlockId(def.id),
                BlockTraits {
                    name: def.name,
                    blast_resistance: def.blast_resistance.max(0.0),
                    primed_explosive: def.primed_explosive,
                    harvest_tier: def.harvest_tier,
                    drops: def
                        .drops
                        .into_iter()
                        .map(|d| ItemStack::new(BlockId(d.id), d.count))
                        .collect(),
                },
            )?;
        }
        Ok(registry)
    }

    pub fn get_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn get_traits(&self, id: BlockId) -> Option<&BlockTraits> {
        self.traits.get(&id)
    }

    pub fn is_air(&self, id: BlockId) -> bool {
        id.is_air()
    }

    /// Resistance of an unregistered material defaults to 0.
    pub fn blast_resistance(&self, id: BlockId) -> f32 {
        self.traits.get(&id).map_or(0.0, |t| t.blast_resistance)
    }

    pub fn is_primed_explosive(&self, id: BlockId) -> bool {
        self.traits.get(&id).map_or(false, |t| t.primed_explosive)
    }

    /// Drops produced when the block breaks under `tool`. Empty when the tool
    /// is below the material's harvest tier.
    pub fn drops_for(&self, id: BlockId, tool: &ToolContext) -> Vec<ItemStack> {
        match self.traits.get(&id) {
            Some(t) if tool.tier >= t.harvest_tier => t.drops.clone(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_registration_fails() {
        let mut registry = BlockRegistry::new();
        registry
            .register_block(BlockId(1), BlockTraits::solid("stone", 30.0))
            .unwrap();
        assert!(matches!(
            registry.register_block(BlockId(1), BlockTraits::solid("granite", 30.0)),
            Err(RegistryError::DuplicateId(_))
        ));
        assert!(matches!(
            registry.register_block(BlockId(2), BlockTraits::solid("stone", 30.0)),
            Err(RegistryError::DuplicateName(_))
        ));
    }

    #[test]
    fn air_is_reserved() {
        let mut registry = BlockRegistry::new();
        assert!(matches!(
            registry.register_block(BlockId::AIR, BlockTraits::solid("not-air", 0.0)),
            Err(RegistryError::ReservedAir)
        ));
        assert!(registry.is_air(BlockId::AIR));
        assert_eq!(registry.blast_resistance(BlockId::AIR), 0.0);
    }

    #[test]
    fn json_definitions_round_trip() {
        let registry = BlockRegistry::from_json_str(
            r#"{
                "blocks": [
                    {"name": "stone", "id": 1, "blast_resistance": 30.0,
                     "drops": [{"id": 1}]},
                    {"name": "tnt", "id": 4, "blast_resistance": 0.0,
                     "primed_explosive": true}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(registry.get_by_name("stone"), Some(BlockId(1)));
        assert_eq!(registry.blast_resistance(BlockId(1)), 30.0);
        assert!(registry.is_primed_explosive(BlockId(4)));
        assert_eq!(
            registry.drops_for(BlockId(1), &ToolContext::bare_hand()),
            vec![ItemStack::single(BlockId(1))]
        );
    }

    #[test]
    fn harvest_tier_gates_drops() {
        let registry = BlockRegistry::with_defaults();
        let obsidian = registry.get_by_name("obsidian").unwrap();
        assert!(registry
            .drops_for(obsidian, &ToolContext::bare_hand())
            .is_empty());
        assert_eq!(
            registry.drops_for(obsidian, &ToolContext { tier: 3 }).len(),
            1
        );
    }
}
