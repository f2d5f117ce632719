use crate::utils::math::Aabb;
use crate::world::actor::{ActorId, ActorSurface};
use crate::world::block::{BlockId, ToolContext};
use crate::world::chunk::{GridError, VoxelGrid};
use crate::world::cursor::SubChunkCursor;
use crate::world::events::{
    DamageCause, DamageEvent, EventOutcome, ExplosionHooks, ExplosionPacket, PreDestructionEvent,
};
use crate::world::registry::BlockRegistry;
use crate::world::voxel::{Face, VoxelAddress};
use glam::Vec3;
use log::debug;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Damage falloff exposure factor. Fixed: there is no occlusion check, a ray
/// of sight through solid rock attenuates nothing.
const EXPOSURE: f32 = 1.0;

const DEFAULT_RAYS: u32 = 16;
const DEFAULT_STEP_LEN: f32 = 0.3;

#[derive(Error, Debug)]
pub enum ExplosionError {
    #[error("Explosion size must be greater than 0, got {0}")]
    InvalidSize(f32),
    #[error("Explosion epicenter must be a finite world position")]
    InvalidEpicenter,
}

/// What set the explosion off; selects the damage-event flavor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExplosionCause {
    Environment,
    Actor(ActorId),
    Block(VoxelAddress),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionParams {
    pub epicenter: Vec3,
    pub size: f32,
    pub cause: ExplosionCause,
    /// Lattice resolution; rays are cast from the shell of a `rays`-cubed
    /// grid of directions.
    pub rays: u32,
    pub step_len: f32,
}

impl ExplosionParams {
    pub fn new(epicenter: Vec3, size: f32) -> Result<Self, ExplosionError> {
        if !(size > 0.0) {
            return Err(ExplosionError::InvalidSize(size));
        }
        if !epicenter.is_finite() {
            return Err(ExplosionError::InvalidEpicenter);
        }
        Ok(Self {
            epicenter,
            size,
            cause: ExplosionCause::Environment,
            rays: DEFAULT_RAYS,
            step_len: DEFAULT_STEP_LEN,
        })
    }

    pub fn with_cause(mut self, cause: ExplosionCause) -> Self {
        self.cause = cause;
        self
    }

    /// The shell needs two lattice points per axis to exist.
    pub fn with_rays(mut self, rays: u32) -> Self {
        self.rays = rays.max(2);
        self
    }

    pub fn with_step_len(mut self, step_len: f32) -> Self {
        self.step_len = step_len;
        self
    }
}

/// Transient state of one marching ray: current position, scaled step
/// vector, and the remaining force budget. Force only ever decreases, so the
/// walk is guaranteed to terminate.
struct RayCursor {
    pos: Vec3,
    step: Vec3,
    force: f32,
}

/// A voxel caught in the blast, with the material observed by the first ray
/// that reached it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffectedVoxel {
    pub address: VoxelAddress,
    pub block: BlockId,
}

/// Deduplicated set of voxels an explosion will destroy or ignite. The
/// pre-destruction event may edit or wholly replace it before anything
/// commits.
#[derive(Debug, Clone, Default)]
pub struct AffectedBlockSet {
    blocks: HashMap<VoxelAddress, AffectedVoxel>,
}

impl AffectedBlockSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts unless the address is already present; the first observation
    /// wins. Returns whether the entry was inserted.
    pub fn insert_first(&mut self, address: VoxelAddress, block: BlockId) -> bool {
        if self.blocks.contains_key(&address) {
            return false;
        }
        self.blocks.insert(address, AffectedVoxel { address, block });
        true
    }

    pub fn contains(&self, address: VoxelAddress) -> bool {
        self.blocks.contains_key(&address)
    }

    pub fn get(&self, address: VoxelAddress) -> Option<&AffectedVoxel> {
        self.blocks.get(&address)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iteration order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = &AffectedVoxel> {
        self.blocks.values()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&AffectedVoxel) -> bool) {
        self.blocks.retain(|_, v| keep(v));
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }
}

/// A single explosive event. Construct, [`trace`](Self::trace) the blast
/// rays, then [`apply`](Self::apply) the effects; both phases run
/// synchronously inside one simulation step.
pub struct Explosion<'g> {
    pub params: ExplosionParams,
    pub affected: AffectedBlockSet,
    grid: &'g VoxelGrid,
    registry: &'g BlockRegistry,
}

impl<'g> Explosion<'g> {
    pub fn new(grid: &'g VoxelGrid, registry: &'g BlockRegistry, params: ExplosionParams) -> Self {
        Self {
            params,
            affected: AffectedBlockSet::new(),
            grid,
            registry,
        }
    }

    /// Casts the shell lattice of rays and collects every voxel the blast
    /// reaches with force to spare. Returns `false` (no rays, nothing
    /// affected) for sizes under 0.1.
    ///
    /// Each ray draws its starting force from `rng`, so a seeded generator
    /// makes the whole trace reproducible.
    pub fn trace<R: Rng>(&mut self, rng: &mut R) -> bool {
        let params = self.params;
        if params.size < 0.1 {
            return false;
        }

        let registry = self.registry;
        let affected = &mut self.affected;
        let mut cursor = SubChunkCursor::new(self.grid);

        let rays = params.rays.max(2);
        let m = (rays - 1) as f32;
        for i in 0..rays {
            for j in 0..rays {
                for k in 0..rays {
                    // Shell lattice points only.
                    if i != 0 && i != rays - 1 && j != 0 && j != rays - 1 && k != 0 && k != rays - 1
                    {
                        continue;
                    }

                    let dir = Vec3::new(
                        i as f32 / m * 2.0 - 1.0,
                        j as f32 / m * 2.0 - 1.0,
                        k as f32 / m * 2.0 - 1.0,
                    );
                    let mut ray = RayCursor {
                        pos: params.epicenter,
                        step: dir.normalize() * params.step_len,
                        force: params.size * rng.gen_range(0.7..=1.3),
                    };
                    while ray.force > 0.0 {
                        let addr = VoxelAddress::from_world(ray.pos);
                        // Unloaded chunks and empty sub-chunks contribute no
                        // material cost; the ray keeps marching.
                        if cursor.move_to(addr.x(), addr.y(), addr.z(), false) {
                            let block = cursor.block_at(addr.x(), addr.y(), addr.z());
                            if !registry.is_air(block) {
                                ray.force -= (registry.blast_resistance(block) / 5.0 + 0.3)
                                    * params.step_len;
                                if ray.force > 0.0 {
                                    affected.insert_first(addr, block);
                                }
                            }
                        }
                        ray.pos += ray.step;
                        ray.force -= params.step_len * 0.75;
                    }
                }
            }
        }

        debug!(
            "blast of size {} traced, {} voxels affected",
            params.size,
            affected.len()
        );
        true
    }

    /// Applies the traced blast: damages nearby actors, destroys or ignites
    /// the affected voxels, cascades neighbor updates, and emits the outward
    /// notification plus ambient effects.
    ///
    /// `Ok(false)` only when an actor-caused explosion is cancelled by the
    /// pre-destruction handler, in which case nothing was mutated.
    pub fn apply<R: Rng>(
        &mut self,
        actors: &mut dyn ActorSurface,
        hooks: &mut dyn ExplosionHooks,
        rng: &mut R,
    ) -> Result<bool, GridError> {
        let params = self.params;
        let mut yield_pct = (1.0 / params.size) * 100.0;

        if let ExplosionCause::Actor(causer) = params.cause {
            let event = PreDestructionEvent {
                causer,
                epicenter: params.epicenter,
                affected: std::mem::take(&mut self.affected),
                yield_pct,
            };
            match hooks.pre_destruction(event) {
                EventOutcome::Cancelled => {
                    debug!("explosion cancelled by pre-destruction handler");
                    return Ok(false);
                }
                EventOutcome::Accepted(event) => {
                    self.affected = event.affected;
                    yield_pct = event.yield_pct;
                }
            }
        }

        let diameter = params.size * 2.0;
        let volume = Aabb::new(
            (params.epicenter - Vec3::splat(diameter + 1.0)).floor(),
            (params.epicenter + Vec3::splat(diameter + 1.0)).ceil(),
        );
        let exclude = match params.cause {
            ExplosionCause::Actor(id) => Some(id),
            _ => None,
        };

        let mut hit = 0usize;
        for actor in actors.actors_in(volume, exclude) {
            let Some(pos) = actors.position(actor) else {
                continue;
            };
            let distance = pos.distance(params.epicenter) / diameter;
            if distance > 1.0 {
                continue;
            }
            let impact = (1.0 - distance) * EXPOSURE;
            let damage = (((impact * impact + impact) / 2.0) * 8.0 * diameter + 1.0) as u32;
            let cause = match params.cause {
                ExplosionCause::Actor(id) => DamageCause::ActorExplosion(id),
                ExplosionCause::Block(addr) => DamageCause::BlockExplosion(addr),
                ExplosionCause::Environment => DamageCause::Explosion,
            };
            actors.attack(DamageEvent {
                target: actor,
                cause,
                damage,
            });
            actors.push(actor, (pos - params.epicenter).normalize_or_zero() * impact);
            hit += 1;
        }

        let source = VoxelAddress::from_world(params.epicenter);
        let bare_hand = ToolContext::bare_hand();
        let affected = &self.affected;
        let mut scheduled: HashSet<VoxelAddress> = HashSet::new();
        let mut records = Vec::with_capacity(affected.len());

        for voxel in affected.iter() {
            let addr = voxel.address;
            if self.registry.is_primed_explosive(voxel.block) {
                // Propagation, not detonation.
                hooks.ignite(addr, rng.gen_range(10..=30));
            } else {
                if (rng.gen_range(0..=100) as f32) < yield_pct {
                    for drop in self.registry.drops_for(voxel.block, &bare_hand) {
                        hooks.drop_item(addr.center(), drop);
                    }
                }
                // Containers spill regardless of the yield roll.
                hooks.container_destroyed(addr);
                // Ordinary per-write neighbor notification is skipped here;
                // the explosion fans out its own updates below.
                self.grid.set_block(addr, BlockId::AIR)?;
                hooks.recompute_light(addr);
            }

            for face in Face::ALL {
                let neighbor = addr.neighbor(face);
                if !self.grid.in_bounds(neighbor) {
                    continue;
                }
                if affected.contains(neighbor) {
                    continue;
                }
                // Scheduled no matter how the event resolves, so each
                // neighbor fires at most once per explosion.
                if !scheduled.insert(neighbor) {
                    continue;
                }
                if let EventOutcome::Accepted(()) = hooks.block_update(neighbor) {
                    let around = Aabb::unit(neighbor.min_corner()).expand(1.0);
                    for nearby in actors.actors_in(around, None) {
                        actors.nearby_block_change(nearby);
                    }
                    hooks.notify_block_change(neighbor);
                }
            }

            let delta = addr.0 - source.0;
            records.push([delta.x, delta.y, delta.z]);
        }

        hooks.broadcast(ExplosionPacket {
            epicenter: params.epicenter.to_array(),
            radius: params.size,
            records,
        });

        let floored = params.epicenter.floor();
        hooks.spawn_particle(floored);
        hooks.play_sound(floored);

        debug!(
            "blast applied: {} actors hit, {} voxels processed",
            hit,
            affected.len()
        );
        Ok(true)
    }

    /// Runs both phases with ambient randomness. `Ok(true)` once effects
    /// were applied; `Ok(false)` for sub-0.1 sizes and cancelled events.
    pub fn detonate(
        &mut self,
        actors: &mut dyn ActorSurface,
        hooks: &mut dyn ExplosionHooks,
    ) -> Result<bool, GridError> {
        let mut rng = rand::thread_rng();
        if !self.trace(&mut rng) {
            return Ok(false);
        }
        self.apply(actors, hooks, &mut rng)
    }
}
