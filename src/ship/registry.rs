//! The only process-wide mutable structure outside a tick (spec §5
//! "Shared resources"): owns every live [`ShipInstance`] keyed by
//! [`ShipId`], and prunes fully-submerged ships at step (8) of the tick.

use std::collections::BTreeMap;

use bevy_math::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ids::ShipId;
use crate::ship::instance::ShipInstance;
use crate::ship::ship_type::ShipType;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShipRegistry {
    ships: BTreeMap<ShipId, ShipInstance>,
    next_id: u32,
}

impl ShipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, name: impl Into<String>, ship_type: ShipType, position: Vec3, orientation: Quat) -> ShipId {
        let id = ShipId(self.next_id);
        self.next_id += 1;
        let ship = ShipInstance::new(id, name, ship_type, position, orientation);
        self.ships.insert(id, ship);
        id
    }

    pub fn get(&self, id: ShipId) -> Option<&ShipInstance> {
        self.ships.get(&id)
    }

    pub fn get_mut(&mut self, id: ShipId) -> Option<&mut ShipInstance> {
        self.ships.get_mut(&id)
    }

    /// Disjoint mutable access to two distinct ships, needed by pairwise
    /// collision response (spec §4.5). `a` and `b` must be different ids;
    /// since `BTreeMap` keys map to non-overlapping allocations, raw
    /// pointers obtained from two distinct keys can't alias.
    pub fn get_pair_mut(&mut self, a: ShipId, b: ShipId) -> Option<(&mut ShipInstance, &mut ShipInstance)> {
        if a == b {
            return None;
        }
        let ptr_a: *mut ShipInstance = self.ships.get_mut(&a)?;
        let ptr_b: *mut ShipInstance = self.ships.get_mut(&b)?;
        // SAFETY: a != b, and both pointers were obtained from distinct
        // BTreeMap entries, so they cannot alias.
        unsafe { Some((&mut *ptr_a, &mut *ptr_b)) }
    }

    pub fn contains(&self, id: ShipId) -> bool {
        self.ships.contains_key(&id)
    }

    /// Deterministic iteration order (spec §5 "Determinism": "fixed ...
    /// iteration order over ships and pairs").
    pub fn iter(&self) -> impl Iterator<Item = (&ShipId, &ShipInstance)> {
        self.ships.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&ShipId, &mut ShipInstance)> {
        self.ships.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = ShipId> + '_ {
        self.ships.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    /// Removes any ship that is sinking *and* has fully lost positive
    /// buoyancy and health (spec §4.3 "Failure semantics": "pruned from
    /// active simulation by the owning registry when fully submerged").
    /// Returns the ids removed this call, in ascending order.
    pub fn prune_sunk(&mut self) -> Vec<ShipId> {
        let to_remove: Vec<ShipId> = self
            .ships
            .iter()
            .filter(|(_, ship)| ship.is_sinking && ship.buoyancy <= 0.0 && ship.hull_health() <= 0.0)
            .map(|(id, _)| *id)
            .collect();
        for id in &to_remove {
            self.ships.remove(id);
            info!(ship = id.0, "ship pruned from registry (fully submerged)");
        }
        to_remove
    }
}
