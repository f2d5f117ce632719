use serde::{Deserialize, Serialize};

/// Compact material identifier stored in sub-chunk cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlockId(pub u16);

impl BlockId {
    pub const AIR: BlockId = BlockId(0);

    pub fn new(id: u16) -> Self {
        Self(id)
    }

    pub fn is_air(&self) -> bool {
        *self == Self::AIR
    }
}

impl From<u16> for BlockId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl From<BlockId> for u16 {
    fn from(id: BlockId) -> u16 {
        id.0
    }
}

/// A dropped item with a stack count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub id: BlockId,
    pub count: u8,
}

impl ItemStack {
    pub fn new(id: BlockId, count: u8) -> Self {
        Self { id, count }
    }

    pub fn single(id: BlockId) -> Self {
        Self { id, count: 1 }
    }
}

/// What the destroyer was holding when the block broke. Explosions act as a
/// bare hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToolContext {
    pub tier: u8,
}

impl ToolContext {
    pub fn bare_hand() -> Self {
        Self { tier: 0 }
    }
}

/// Per-material data the explosion core consults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockTraits {
    pub name: String,
    /// Blast resistance, >= 0. Consumed as `resistance / 5 + 0.3` per
    /// traversal step.
    pub blast_resistance: f32,
    /// Primed-explosive variants are ignited by a blast instead of removed.
    #[serde(default)]
    pub primed_explosive: bool,
    /// Minimum tool tier required before the block yields its drops.
    #[serde(default)]
    pub harvest_tier: u8,
    #[serde(default)]
    pub drops: Vec<ItemStack>,
}

impl BlockTraits {
    pub fn solid(name: &str, blast_resistance: f32) -> Self {
        Self {
            name: name.to_string(),
            blast_resistance,
            primed_explosive: false,
            harvest_tier: 0,
            drops: Vec::new(),
        }
    }

    pub fn with_drops(mut self, drops: Vec<ItemStack>) -> Self {
        self.drops = drops;
        self
    }

    pub fn with_harvest_tier(mut self, tier: u8) -> Self {
        self.harvest_tier = tier;
        self
    }

    pub fn primed_explosive(name: &str) -> Self {
        Self {
            name: name.to_string(),
            blast_resistance: 0.0,
            primed_explosive: true,
            harvest_tier: 0,
            drops: Vec::new(),
        }
    }
}
