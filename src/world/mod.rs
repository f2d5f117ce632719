pub mod actor;
pub mod block;
pub mod chunk;
pub mod cursor;
pub mod events;
pub mod explosion;
pub mod registry;
pub mod voxel;

// Re-export commonly used types
pub use actor::{ActorId, ActorSet, ActorState, ActorSurface};
pub use block::{BlockId, BlockTraits, ItemStack, ToolContext};
pub use chunk::{ChunkColumn, GridError, SubChunk, VoxelGrid, SUB_CHUNK_SIZE};
pub use cursor::SubChunkCursor;
pub use events::{
    DamageCause, DamageEvent, EventOutcome, ExplosionHooks, ExplosionPacket, NoopHooks,
    PreDestructionEvent,
};
pub use explosion::{
    AffectedBlockSet, AffectedVoxel, Explosion, ExplosionCause, ExplosionError, ExplosionParams,
};
pub use registry::{BlockRegistry, RegistryError};
pub use voxel::{Face, VoxelAddress};
