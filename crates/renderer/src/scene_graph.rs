//! ECS-backed store of placed primitives with mutable visual parameters.
//!
//! Primitives are addressed by a caller-chosen key. Writes to a key that is not mounted are
//! dropped and reported as `false`, so per-tick updaters can run without checking first.

use std::collections::HashMap;
use std::hash::Hash;

use engine_core::{
    BasePose, Entity, Highlighted, InstanceBatch, Material, PickBounds, Transform, Visible, World,
};

use crate::picking::{pick_nearest, PickHit, Ray};

/// Component tagging an entity with its lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeKey<K>(pub K);

/// Live pose: base pose plus the latest animation offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LivePose(pub Transform);

/// Placed primitives keyed by `K`.
pub struct SceneGraph<K> {
    world: World,
    index: HashMap<K, Entity>,
}

impl<K> Default for SceneGraph<K>
where
    K: Copy + Eq + Hash + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> SceneGraph<K>
where
    K: Copy + Eq + Hash + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            world: World::new(),
            index: HashMap::new(),
        }
    }

    /// Place a primitive. Re-mounting an existing key replaces it.
    pub fn mount(&mut self, key: K, pose: Transform, material: Material) -> Entity {
        self.unmount(key);
        let entity = self.world.spawn((
            NodeKey(key),
            BasePose(pose),
            LivePose(pose),
            material,
            Visible::default(),
            Highlighted::default(),
        ));
        self.index.insert(key, entity);
        entity
    }

    /// Make a mounted primitive pickable.
    pub fn set_pick_bounds(&mut self, key: K, bounds: PickBounds) -> bool {
        match self.index.get(&key) {
            Some(&entity) => self.world.insert_one(entity, bounds).is_ok(),
            None => false,
        }
    }

    /// Attach an instance batch (for example the rain drops) to a mounted primitive.
    pub fn set_batch(&mut self, key: K, batch: InstanceBatch) -> bool {
        match self.index.get(&key) {
            Some(&entity) => {
                log::trace!("Attaching batch of {} instances", batch.len());
                self.world.insert_one(entity, batch).is_ok()
            }
            None => false,
        }
    }

    /// Remove a primitive. Returns false if it was not mounted.
    pub fn unmount(&mut self, key: K) -> bool {
        match self.index.remove(&key) {
            Some(entity) => self.world.despawn(entity).is_ok(),
            None => false,
        }
    }

    pub fn is_mounted(&self, key: K) -> bool {
        self.index.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Mutate one component of a mounted primitive.
    fn with<C, R>(&mut self, key: K, f: impl FnOnce(&mut C) -> R) -> Option<R>
    where
        C: hecs::Component,
    {
        let entity = *self.index.get(&key)?;
        let mut component = self.world.get::<&mut C>(entity).ok()?;
        Some(f(&mut component))
    }

    fn read<C, R>(&self, key: K, f: impl FnOnce(&C) -> R) -> Option<R>
    where
        C: hecs::Component,
    {
        let entity = *self.index.get(&key)?;
        let component = self.world.get::<&C>(entity).ok()?;
        Some(f(&component))
    }

    pub fn update_material(&mut self, key: K, f: impl FnOnce(&mut Material)) -> bool {
        self.with(key, f).is_some()
    }

    /// Recompute the live pose from the base pose.
    pub fn update_pose(&mut self, key: K, f: impl FnOnce(&Transform) -> Transform) -> bool {
        let Some(base) = self.read(key, |b: &BasePose| b.0) else {
            return false;
        };
        self.with(key, |live: &mut LivePose| live.0 = f(&base)).is_some()
    }

    pub fn update_batch(&mut self, key: K, f: impl FnOnce(&mut InstanceBatch)) -> bool {
        self.with(key, f).is_some()
    }

    pub fn set_visible(&mut self, key: K, visible: bool) -> bool {
        self.with(key, |v: &mut Visible| v.0 = visible).is_some()
    }

    pub fn set_highlighted(&mut self, key: K, highlighted: bool) -> bool {
        self.with(key, |h: &mut Highlighted| h.0 = highlighted).is_some()
    }

    pub fn material(&self, key: K) -> Option<Material> {
        self.read(key, |m: &Material| *m)
    }

    pub fn pose(&self, key: K) -> Option<Transform> {
        self.read(key, |p: &LivePose| p.0)
    }

    pub fn is_visible(&self, key: K) -> Option<bool> {
        self.read(key, |v: &Visible| v.0)
    }

    pub fn is_highlighted(&self, key: K) -> Option<bool> {
        self.read(key, |h: &Highlighted| h.0)
    }

    /// Copy of a primitive's instance transforms.
    pub fn batch(&self, key: K) -> Option<InstanceBatch> {
        self.read(key, |b: &InstanceBatch| b.clone())
    }

    /// Raw bytes of a primitive's instance buffer, ready for upload.
    pub fn batch_bytes(&self, key: K) -> Option<Vec<u8>> {
        self.read(key, |b: &InstanceBatch| bytemuck::cast_slice(&b.instances).to_vec())
    }

    /// Nearest visible pickable primitive along `ray`.
    pub fn pick(&self, ray: &Ray) -> Option<PickHit<K>> {
        let mut query = self
            .world
            .query::<(&NodeKey<K>, &LivePose, &PickBounds, &Visible)>();
        let candidates: Vec<_> = query
            .iter()
            .filter(|(_, (_, _, _, visible))| visible.0)
            .map(|(_, (key, pose, bounds, _))| (key.0, pose.0, *bounds))
            .collect();
        pick_nearest(ray, candidates)
    }
}
