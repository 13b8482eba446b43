//! Target objects (marbles) as seen by the navigation core.
//!
//! The registry is owned by the spawner; agents poll it once per scan for position and
//! active flag. The `targeted` flag is advisory only and used for diagnostics.

use crate::collision::types::Vec3;

/// Stable identifier of a target object within its registry.
pub type TargetId = u32;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetObject {
    pub id: TargetId,
    pub position: Vec3,
    /// `false` once the object has left play (sunk, out of bounds, pooled).
    pub active: bool,
    /// Some agent picked this object on its last scan. Advisory; grants no exclusivity.
    pub targeted: bool,
}

impl TargetObject {
    pub fn new(id: TargetId, position: Vec3) -> Self {
        Self {
            id,
            position,
            active: true,
            targeted: false,
        }
    }

    pub fn inactive(id: TargetId, position: Vec3) -> Self {
        Self {
            active: false,
            ..Self::new(id, position)
        }
    }
}

/// Simple in-memory registry. Order is insertion order and is significant: it is the final
/// tie-break when two candidates score the same.
#[derive(Clone, Debug, Default)]
pub struct TargetRegistry {
    objects: Vec<TargetObject>,
}

impl TargetRegistry {
    pub fn new(objects: Vec<TargetObject>) -> Self {
        Self { objects }
    }

    pub fn as_slice(&self) -> &[TargetObject] {
        &self.objects
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TargetObject> {
        self.objects.iter_mut()
    }

    pub fn get(&self, id: TargetId) -> Option<&TargetObject> {
        self.objects.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: TargetId) -> Option<&mut TargetObject> {
        self.objects.iter_mut().find(|t| t.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.objects.iter().filter(|t| t.active).count()
    }

    /// Set the advisory flag on `id`. Unknown ids are ignored.
    pub fn mark_targeted(&mut self, id: TargetId) {
        if let Some(t) = self.get_mut(id) {
            t.targeted = true;
        }
    }

    /// Deactivate `id`, returning whether it was active before.
    pub fn deactivate(&mut self, id: TargetId) -> bool {
        match self.get_mut(id) {
            Some(t) if t.active => {
                t.active = false;
                t.targeted = false;
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
