use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::key::HandleMap;
use crate::{CacheEntry, RenderHandle};

/// Owns every cached entry and the index mappings of the active tier.
///
/// - `entries`: handle → entry, for both tiers.
/// - `active`: ordered index → handle, exactly the active tier.
/// - `reverse`: handle → index, the inverse of `active`.
///
/// Lookups that find nothing are steady-state outcomes, not errors.
#[derive(Clone, Debug)]
pub struct ItemStore<N> {
    entries: HandleMap<CacheEntry<N>>,
    active: BTreeMap<i64, RenderHandle>,
    reverse: HandleMap<i64>,
}

impl<N> Default for ItemStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> ItemStore<N> {
    pub fn new() -> Self {
        Self {
            entries: HandleMap::new(),
            active: BTreeMap::new(),
            reverse: HandleMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn spare_len(&self) -> usize {
        self.entries.len().saturating_sub(self.active.len())
    }

    pub fn contains(&self, handle: RenderHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    pub fn lookup(&self, handle: RenderHandle) -> Option<&CacheEntry<N>> {
        self.entries.get(&handle)
    }

    /// The handle the ActiveIndexMap holds for `index`, whether or not it is still usable.
    pub fn active_handle(&self, index: i64) -> Option<RenderHandle> {
        self.active.get(&index).copied()
    }

    /// The index currently pointing at `handle` (reverse index of the active tier).
    pub fn index_of(&self, handle: RenderHandle) -> Option<i64> {
        self.reverse.get(&handle).copied()
    }

    /// Returns the active entry for `index` only when it is in the active tier and still holds
    /// its object. A mapping that fails either test is stale and reads as a miss.
    pub fn lookup_active(&self, index: i64) -> Option<&CacheEntry<N>> {
        let handle = self.active.get(&index)?;
        self.entries
            .get(handle)
            .filter(|e| e.flags.active_tier && e.node.is_some())
    }

    /// Adds `entry` under `handle` and maps `index` to it in the active tier.
    ///
    /// An entry previously stored under `handle` is replaced. Whatever held `index` before is
    /// displaced to the spare tier.
    pub fn insert(&mut self, index: i64, handle: RenderHandle, mut entry: CacheEntry<N>) {
        entry.flags.active_tier = true;
        entry.flags.live = true;
        self.entries.insert(handle, entry);
        self.link(index, handle);
    }

    /// Moves an already cached entry into the active tier at `index`.
    ///
    /// Returns `false` if `handle` is not cached.
    pub fn promote(&mut self, index: i64, handle: RenderHandle) -> bool {
        let Some(entry) = self.entries.get_mut(&handle) else {
            return false;
        };
        entry.flags.active_tier = true;
        entry.flags.live = true;
        self.link(index, handle);
        true
    }

    /// Replaces the object held by a cached entry, returning the previous one.
    pub fn replace_node(&mut self, handle: RenderHandle, node: N) -> Option<N> {
        let entry = self.entries.get_mut(&handle)?;
        entry.node.replace(node)
    }

    /// Drops the object of a cached entry but keeps the entry itself.
    pub fn take_node(&mut self, handle: RenderHandle) -> Option<N> {
        self.entries.get_mut(&handle)?.node.take()
    }

    /// Moves an entry to the spare tier.
    ///
    /// Liveness and attachment are left alone: demotion must not pull a visible object off the
    /// structure mid-frame. Returns `true` if the entry was in the active tier or mapped.
    pub fn demote(&mut self, handle: RenderHandle) -> bool {
        let mut changed = false;
        if let Some(index) = self.reverse.remove(&handle) {
            if self.active.get(&index) == Some(&handle) {
                self.active.remove(&index);
            }
            changed = true;
        }
        if let Some(entry) = self.entries.get_mut(&handle) {
            changed |= entry.flags.active_tier;
            entry.flags.active_tier = false;
        }
        changed
    }

    /// Demotes every active entry. Returns how many were demoted.
    pub fn demote_all(&mut self) -> usize {
        let handles: Vec<RenderHandle> = self.active.values().copied().collect();
        handles.into_iter().filter(|&h| self.demote(h)).count()
    }

    /// Removes a stale mapping for `index`, demoting whatever it pointed at.
    pub fn drop_stale(&mut self, index: i64) -> Option<RenderHandle> {
        let handle = self.active.get(&index).copied()?;
        self.demote(handle);
        Some(handle)
    }

    /// Deletes the entry and any index mapping to it.
    pub fn remove(&mut self, handle: RenderHandle) -> Option<CacheEntry<N>> {
        if let Some(index) = self.reverse.remove(&handle) {
            if self.active.get(&index) == Some(&handle) {
                self.active.remove(&index);
            }
        }
        self.entries.remove(&handle)
    }

    /// Clears `live`/`attached` on every spare entry that still carries them.
    ///
    /// Returns the number of entries touched.
    pub fn release_spare_liveness(&mut self) -> usize {
        let mut touched = 0usize;
        for entry in self.entries.values_mut() {
            if entry.flags.active_tier {
                continue;
            }
            if entry.flags.live || entry.flags.attached {
                entry.flags.live = false;
                entry.flags.attached = false;
                touched += 1;
            }
        }
        touched
    }

    pub(crate) fn set_attached(&mut self, handle: RenderHandle, attached: bool) {
        if let Some(entry) = self.entries.get_mut(&handle) {
            entry.flags.attached = attached;
            if attached {
                entry.flags.live = true;
            }
        }
    }

    /// Rewrites every active index through `f`, keeping the handles.
    pub fn rekey(&mut self, mut f: impl FnMut(i64) -> i64) {
        let old = core::mem::take(&mut self.active);
        for (index, handle) in old {
            let next = f(index);
            self.active.insert(next, handle);
            self.reverse.insert(handle, next);
        }
    }

    /// Iterates the active tier in index order.
    pub fn active_iter(&self) -> impl Iterator<Item = (i64, RenderHandle)> + '_ {
        self.active.iter().map(|(&i, &h)| (i, h))
    }

    /// Handles of the spare tier, sorted for deterministic iteration.
    pub fn spare_handles(&self) -> Vec<RenderHandle> {
        let mut out: Vec<RenderHandle> = self
            .entries
            .iter()
            .filter(|(_, e)| !e.flags.active_tier)
            .map(|(&h, _)| h)
            .collect();
        out.sort_unstable();
        out
    }

    /// All cached handles, sorted.
    pub fn handles(&self) -> Vec<RenderHandle> {
        let mut out: Vec<RenderHandle> = self.entries.keys().copied().collect();
        out.sort_unstable();
        out
    }

    pub(crate) fn count_flags(&self) -> (usize, usize) {
        self.entries.values().fold((0, 0), |(live, attached), e| {
            (
                live + usize::from(e.flags.live),
                attached + usize::from(e.flags.attached),
            )
        })
    }

    /// Asserts the store's structural invariants in debug builds.
    ///
    /// Every active mapping points at a cached active-tier entry, the reverse index mirrors the
    /// ActiveIndexMap, and no spare entry is mapped.
    pub fn debug_check_invariants(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        debug_assert_eq!(
            self.active.len(),
            self.reverse.len(),
            "reverse index out of sync with ActiveIndexMap"
        );
        for (&index, handle) in &self.active {
            let entry = self.entries.get(handle);
            debug_assert!(
                entry.is_some(),
                "ActiveIndexMap points at uncached handle (index={index}, handle={handle})"
            );
            debug_assert!(
                entry.is_some_and(|e| e.flags.active_tier),
                "ActiveIndexMap points at a spare entry (index={index}, handle={handle})"
            );
            debug_assert_eq!(
                self.reverse.get(handle),
                Some(&index),
                "handle {handle} mapped from more than one index"
            );
        }
        for (handle, entry) in &self.entries {
            if entry.flags.active_tier {
                debug_assert!(
                    self.reverse.contains_key(handle),
                    "active-tier entry {handle} has no index"
                );
            }
        }
    }

    fn link(&mut self, index: i64, handle: RenderHandle) {
        if let Some(prev_index) = self.reverse.insert(handle, index) {
            if prev_index != index && self.active.get(&prev_index) == Some(&handle) {
                self.active.remove(&prev_index);
            }
        }
        if let Some(displaced) = self.active.insert(index, handle) {
            if displaced != handle {
                self.reverse.remove(&displaced);
                if let Some(entry) = self.entries.get_mut(&displaced) {
                    entry.flags.active_tier = false;
                }
            }
        }
    }
}
