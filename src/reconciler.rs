use alloc::vec::Vec;

use crate::{CacheEntry, IndexRemapper, ItemBuilder, ItemStore, RenderHandle};

/// Coalesces "the active window changed" signals into one deferred pass.
///
/// Scheduling only raises a flag; the pass reads the store and move state as they are when it
/// runs, so any number of range updates between `schedule` and `run` produce one pass that
/// reflects the last of them.
#[derive(Clone, Debug, Default)]
pub struct IdleReconciler {
    pending: bool,
    passes: u64,
    children: Vec<RenderHandle>,
}

impl IdleReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a pass. Returns `false` if one was already pending.
    pub fn schedule(&mut self) -> bool {
        !core::mem::replace(&mut self.pending, true)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Number of passes run so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Active render objects in display order, as of the last pass.
    pub fn children(&self) -> &[RenderHandle] {
        &self.children
    }

    /// Runs the pending pass, if any. Returns whether a pass ran.
    pub fn run<N, B: ItemBuilder<N>>(
        &mut self,
        store: &mut ItemStore<N>,
        remap: &IndexRemapper,
        builder: &mut B,
    ) -> bool {
        if !core::mem::replace(&mut self.pending, false) {
            return false;
        }
        self.passes = self.passes.saturating_add(1);

        let mut ordered: Vec<(i64, RenderHandle)> = store
            .active_iter()
            .filter(|&(_, h)| store.lookup(h).is_some_and(|e| e.node().is_some()))
            .map(|(index, h)| (remap.inverse(index), h))
            .collect();
        ordered.sort_unstable_by_key(|&(display, _)| display);

        // Entries that left the active tier since the last pass are no longer linked.
        store.release_spare_liveness();
        self.children.clear();
        self.children.extend(ordered.iter().map(|&(_, h)| h));
        for &h in &self.children {
            store.set_attached(h, true);
        }

        let mut ctx = PurgeContext {
            store: &mut *store,
            removed: 0,
        };
        builder.purge(&mut ctx);
        vdebug!(
            pass = self.passes,
            active = self.children.len(),
            spare = ctx.spare_len(),
            purged = ctx.removed,
            "idle reconcile pass"
        );

        store.debug_check_invariants();
        true
    }
}

/// The builder's view of the cache during [`ItemBuilder::purge`].
///
/// Only spare-tier entries can be evicted; the active tier is never touched by a purge.
pub struct PurgeContext<'a, N> {
    store: &'a mut ItemStore<N>,
    removed: usize,
}

impl<N> PurgeContext<'_, N> {
    pub fn spare_len(&self) -> usize {
        self.store.spare_len()
    }

    pub fn active_len(&self) -> usize {
        self.store.active_len()
    }

    /// Spare-tier handles, sorted.
    pub fn spare_handles(&self) -> Vec<RenderHandle> {
        self.store.spare_handles()
    }

    pub fn lookup(&self, handle: RenderHandle) -> Option<&CacheEntry<N>> {
        self.store.lookup(handle)
    }

    /// Evicts a spare-tier entry and hands it back.
    ///
    /// Returns `None` for unknown handles and refuses active-tier handles.
    pub fn remove(&mut self, handle: RenderHandle) -> Option<CacheEntry<N>> {
        let entry = self.store.lookup(handle)?;
        if entry.is_active_tier() {
            vwarn!(%handle, "purge requested removal of an active-tier entry; ignored");
            return None;
        }
        self.removed += 1;
        self.store.remove(handle)
    }

    /// Number of entries evicted so far in this pass.
    pub fn removed(&self) -> usize {
        self.removed
    }
}

impl<N> core::fmt::Debug for PurgeContext<'_, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PurgeContext")
            .field("active", &self.store.active_len())
            .field("spare", &self.store.spare_len())
            .field("removed", &self.removed)
            .finish()
    }
}
