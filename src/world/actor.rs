use crate::utils::math::Aabb;
use crate::world::events::DamageEvent;
use glam::Vec3;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u64);

/// Query/damage surface over whatever actor simulation hosts this world.
/// The explosion core only needs positions, a damage dispatch, an additive
/// impulse, and the nearby-change notification.
pub trait ActorSurface {
    /// Actors whose position lies inside `volume`, excluding `exclude`.
    fn actors_in(&self, volume: Aabb, exclude: Option<ActorId>) -> Vec<ActorId>;

    fn position(&self, id: ActorId) -> Option<Vec3>;

    fn attack(&mut self, event: DamageEvent);

    /// Additive velocity impulse.
    fn push(&mut self, id: ActorId, impulse: Vec3);

    /// A voxel near the actor changed.
    fn nearby_block_change(&mut self, id: ActorId);
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActorState {
    pub position: Vec3,
    pub health: f32,
    pub velocity: Vec3,
    /// Count of nearby-block-change notifications received.
    pub block_change_notices: u32,
    pub last_damage: Option<DamageEvent>,
}

/// Minimal in-memory actor store. Enough to host tests and headless worlds;
/// real embedders adapt their own simulation behind [`ActorSurface`].
#[derive(Debug, Clone, Default)]
pub struct ActorSet {
    actors: HashMap<ActorId, ActorState>,
    next_id: u64,
}

impl ActorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, position: Vec3, health: f32) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        self.actors.insert(
            id,
            ActorState {
                position,
                health,
                velocity: Vec3::ZERO,
                block_change_notices: 0,
                last_damage: None,
            },
        );
        id
    }

    pub fn state(&self, id: ActorId) -> Option<&ActorState> {
        self.actors.get(&id)
    }
}

impl ActorSurface for ActorSet {
    fn actors_in(&self, volume: Aabb, exclude: Option<ActorId>) -> Vec<ActorId> {
        let mut found: Vec<ActorId> = self
            .actors
            .iter()
            .filter(|(id, state)| Some(**id) != exclude && volume.contains(state.position))
            .map(|(id, _)| *id)
            .collect();
        // Stable order for reproducible runs.
        found.sort();
        found
    }

    fn position(&self, id: ActorId) -> Option<Vec3> {
        self.actors.get(&id).map(|s| s.position)
    }

    fn attack(&mut self, event: DamageEvent) {
        if let Some(state) = self.actors.get_mut(&event.target) {
            state.health = (state.health - event.damage as f32).max(0.0);
            state.last_damage = Some(event);
        }
    }

    fn push(&mut self, id: ActorId, impulse: Vec3) {
        if let Some(state) = self.actors.get_mut(&id) {
            state.velocity += impulse;
        }
    }

    fn nearby_block_change(&mut self, id: ActorId) {
        if let Some(state) = self.actors.get_mut(&id) {
            state.block_change_notices += 1;
        }
    }
}
