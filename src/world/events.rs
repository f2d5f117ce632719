use crate::world::actor::ActorId;
use crate::world::block::ItemStack;
use crate::world::explosion::AffectedBlockSet;
use crate::world::voxel::VoxelAddress;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Outcome of a cancellable event. Handlers either accept the request,
/// possibly with edited data, or cancel the mutation it guards.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome<T> {
    Accepted(T),
    Cancelled,
}

/// Raised before an actor-caused explosion commits any destruction. The
/// handler may edit the affected set and yield before accepting; cancelling
/// aborts the whole application phase.
#[derive(Debug, Clone)]
pub struct PreDestructionEvent {
    pub causer: ActorId,
    pub epicenter: Vec3,
    pub affected: AffectedBlockSet,
    /// Probability (0-100) that each destroyed voxel spawns its drops.
    pub yield_pct: f32,
}

/// Which collaborator gets the blame for explosion damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DamageCause {
    ActorExplosion(ActorId),
    BlockExplosion(VoxelAddress),
    Explosion,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    pub target: ActorId,
    pub cause: DamageCause,
    pub damage: u32,
}

/// Outward notification broadcast to observers of the epicenter's region.
/// Affected positions are deltas from the floored epicenter to keep the
/// payload small.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplosionPacket {
    pub epicenter: [f32; 3],
    pub radius: f32,
    pub records: Vec<[i32; 3]>,
}

/// Everything the explosion asks of the surrounding world besides voxel
/// storage and actors: cancellable events, drops, lighting, effects, and the
/// outward broadcast. All methods default to accepting no-ops so embedders
/// implement only what they observe.
pub trait ExplosionHooks {
    /// Actor-caused explosions only; consulted before any destruction.
    fn pre_destruction(&mut self, event: PreDestructionEvent) -> EventOutcome<PreDestructionEvent> {
        EventOutcome::Accepted(event)
    }

    /// Consulted once per distinct neighbor of the destroyed region.
    fn block_update(&mut self, _addr: VoxelAddress) -> EventOutcome<()> {
        EventOutcome::Accepted(())
    }

    /// A primed explosive caught in the blast propagates instead of
    /// vanishing; fuse length in ticks.
    fn ignite(&mut self, _addr: VoxelAddress, _fuse_ticks: u32) {}

    fn drop_item(&mut self, _pos: Vec3, _item: ItemStack) {}

    /// The destroyed voxel held an inventory; it should spill its contents.
    fn container_destroyed(&mut self, _addr: VoxelAddress) {}

    fn recompute_light(&mut self, _addr: VoxelAddress) {}

    /// A voxel adjacent to the destroyed region should re-evaluate itself.
    fn notify_block_change(&mut self, _addr: VoxelAddress) {}

    fn broadcast(&mut self, _packet: ExplosionPacket) {}

    fn spawn_particle(&mut self, _pos: Vec3) {}

    fn play_sound(&mut self, _pos: Vec3) {}
}

/// Hooks implementation that accepts everything and observes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl ExplosionHooks for NoopHooks {}
