//! Live target registry
//!
//! Targets are kept in registration order (ids are allocated monotonically,
//! so that is also id order and lookups can binary search). Expiry is stored
//! as a deadline on the registry's own clock, which only moves inside
//! [`EntityRegistry::advance`]; a session that stops advancing the registry
//! therefore freezes every countdown at its remaining duration.

use glam::Vec2;

use super::state::{Entity, EntityId, EntityKind, RemoveReason};
use crate::tuning::Tuning;

/// Owns the set of live targets
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
    next_id: EntityId,
    /// Active time in milliseconds (paused time excluded)
    clock_ms: f64,
    area_width: f32,
    area_height: f32,
    entity_size: f32,
    wrap_margin: f32,
    max_entities: usize,
}

impl EntityRegistry {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            entities: Vec::with_capacity(tuning.spawn.max_entities + 1),
            next_id: 1,
            clock_ms: 0.0,
            area_width: tuning.area_width,
            area_height: tuning.area_height,
            entity_size: tuning.spawn.entity_size,
            wrap_margin: tuning.spawn.wrap_margin,
            max_entities: tuning.spawn.max_entities,
        }
    }

    /// Insert a target that escapes `lifetime_ms` of active time from now.
    ///
    /// Returns `None` without side effects once the live count is over the cap.
    pub fn spawn(
        &mut self,
        kind: EntityKind,
        pos: Vec2,
        vel: Vec2,
        lifetime_ms: u32,
    ) -> Option<EntityId> {
        if self.entities.len() > self.max_entities {
            log::debug!(
                "Spawn dropped: {} live targets exceeds cap {}",
                self.entities.len(),
                self.max_entities
            );
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.entities.push(Entity {
            id,
            kind,
            pos,
            vel,
            size: self.entity_size,
            spawned_at_ms: self.clock_ms,
            deadline_ms: self.clock_ms + f64::from(lifetime_ms),
        });
        Some(id)
    }

    /// Move every target by `vel * dt` and wrap the ones that left the area
    pub fn advance(&mut self, dt: f32) {
        self.clock_ms += f64::from(dt) * 1000.0;
        for entity in &mut self.entities {
            entity.pos += entity.vel * dt;
            entity.pos.x = wrap_axis(entity.pos.x, self.area_width, self.wrap_margin);
            entity.pos.y = wrap_axis(entity.pos.y, self.area_height, self.wrap_margin);
        }
    }

    /// Evict a target. Removing an unknown or already-removed id is a no-op.
    pub fn remove(&mut self, id: EntityId, reason: RemoveReason) -> Option<Entity> {
        let index = self.index_of(id)?;
        let entity = self.entities.remove(index);
        log::trace!("Removed {:?} target {} ({:?})", entity.kind, id, reason);
        Some(entity)
    }

    /// Evict and return every target whose deadline has passed, oldest first
    pub fn take_expired(&mut self) -> Vec<Entity> {
        let now = self.clock_ms;
        if !self.entities.iter().any(|e| e.deadline_ms <= now) {
            return Vec::new();
        }
        let (expired, live) = std::mem::take(&mut self.entities)
            .into_iter()
            .partition(|e| e.deadline_ms <= now);
        self.entities = live;
        expired
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.entities[i])
    }

    /// Read-only view in registration order
    pub fn all(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Active milliseconds before `id` escapes
    pub fn remaining_ms(&self, id: EntityId) -> Option<f64> {
        self.get(id).map(|e| (e.deadline_ms - self.clock_ms).max(0.0))
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    /// Drop every target and restart the clock.
    ///
    /// Ids keep counting so a stale id from a previous run can never hit a new target.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.clock_ms = 0.0;
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.binary_search_by_key(&id, |e| e.id).ok()
    }
}

/// Teleport a coordinate that left `[-margin, extent)` to the opposite side
fn wrap_axis(value: f32, extent: f32, margin: f32) -> f32 {
    if value <= -margin {
        extent
    } else if value >= extent {
        -margin
    } else {
        value
    }
}
