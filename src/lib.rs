pub mod utils;
pub mod world;

// Re-export commonly used types
pub use utils::math::Aabb;
pub use world::actor::{ActorId, ActorSet, ActorSurface};
pub use world::block::{BlockId, BlockTraits, ItemStack, ToolContext};
pub use world::chunk::{ChunkColumn, GridError, SubChunk, VoxelGrid};
pub use world::cursor::SubChunkCursor;
pub use world::events::{
    DamageCause, DamageEvent, EventOutcome, ExplosionHooks, ExplosionPacket, PreDestructionEvent,
};
pub use world::explosion::{
    AffectedBlockSet, Explosion, ExplosionCause, ExplosionError, ExplosionParams,
};
pub use world::registry::BlockRegistry;
pub use world::voxel::{Face, VoxelAddress};
