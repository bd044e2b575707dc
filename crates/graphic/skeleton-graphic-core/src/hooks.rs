//! Ordered observer hooks fired during `advance`.
//!
//! Three registries exist per graphic: `pose_applied` (local transforms may be
//! edited before world propagation), `world_ready` (world values may be edited;
//! registering one triggers a second propagation pass) and `update_complete`
//! (read-only). Callbacks run synchronously in registration order.

use std::fmt;

use crate::ids::{HookId, IdAllocator};

/// Callback that may mutate the skeleton.
pub type MutHook<S> = dyn FnMut(&mut S) + Send + Sync;
/// Callback that only observes the skeleton.
pub type ReadHook<S> = dyn FnMut(&S) + Send + Sync;

/// Ordered list of callbacks keyed by HookId.
pub struct HookRegistry<F: ?Sized> {
    entries: Vec<(HookId, Box<F>)>,
}

impl<F: ?Sized> Default for HookRegistry<F> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<F: ?Sized> HookRegistry<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: HookId, callback: Box<F>) {
        self.entries.push((id, callback));
    }

    /// Remove a callback, keeping the order of the rest.
    pub fn remove(&mut self, id: HookId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(hid, _)| *hid != id);
        self.entries.len() != before
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<S> HookRegistry<MutHook<S>> {
    pub fn invoke(&mut self, target: &mut S) {
        for (_, callback) in self.entries.iter_mut() {
            callback(target);
        }
    }
}

impl<S> HookRegistry<ReadHook<S>> {
    pub fn notify(&mut self, target: &S) {
        for (_, callback) in self.entries.iter_mut() {
            callback(target);
        }
    }
}

impl<F: ?Sized> fmt::Debug for HookRegistry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("len", &self.entries.len())
            .finish()
    }
}

/// The three update hooks of one graphic.
pub struct UpdateHooks<S> {
    pub pose_applied: HookRegistry<MutHook<S>>,
    pub world_ready: HookRegistry<MutHook<S>>,
    pub update_complete: HookRegistry<ReadHook<S>>,
    ids: IdAllocator,
}

impl<S> Default for UpdateHooks<S> {
    fn default() -> Self {
        Self {
            pose_applied: HookRegistry::new(),
            world_ready: HookRegistry::new(),
            update_complete: HookRegistry::new(),
            ids: IdAllocator::new(),
        }
    }
}

impl<S> UpdateHooks<S> {
    pub fn on_pose_applied<F>(&mut self, callback: F) -> HookId
    where
        F: FnMut(&mut S) + Send + Sync + 'static,
    {
        let id = self.ids.alloc_hook();
        self.pose_applied.push(id, Box::new(callback));
        id
    }

    pub fn on_world_ready<F>(&mut self, callback: F) -> HookId
    where
        F: FnMut(&mut S) + Send + Sync + 'static,
    {
        let id = self.ids.alloc_hook();
        self.world_ready.push(id, Box::new(callback));
        id
    }

    pub fn on_update_complete<F>(&mut self, callback: F) -> HookId
    where
        F: FnMut(&S) + Send + Sync + 'static,
    {
        let id = self.ids.alloc_hook();
        self.update_complete.push(id, Box::new(callback));
        id
    }

    /// Unregister a callback from whichever registry holds it.
    pub fn remove(&mut self, id: HookId) -> bool {
        self.pose_applied.remove(id) || self.world_ready.remove(id) || self.update_complete.remove(id)
    }
}

impl<S> fmt::Debug for UpdateHooks<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateHooks")
            .field("pose_applied", &self.pose_applied)
            .field("world_ready", &self.world_ready)
            .field("update_complete", &self.update_complete)
            .finish()
    }
}
