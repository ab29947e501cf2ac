use alloc::string::String;
use alloc::vec::Vec;

use crate::snapshot::{CacheSnapshot, dump};
use crate::types::count_to_i64;
use crate::{
    ActiveRangeCalculator, ActiveRangeNotice, ActiveWindow, BuildResult, CacheEntry, CacheOptions,
    IdleReconciler, IndexRemapper, ItemBuilder, ItemOutcome, ItemStore, MoveState, RangeRequest,
    RenderHandle,
};

/// The render-object cache behind a virtualized list, grid or carousel.
///
/// This type does not hold any UI objects beyond the opaque `N` values the builder hands it.
/// The host layout engine drives it from its UI thread:
/// - `set_active_range` once per layout pass with the visible window and cache padding
/// - `get_item` whenever it needs the object for an index
/// - `run_idle` when the frame is idle, to rebuild the ordered child list and let the builder
///   purge spare objects
///
/// Nothing here fails loudly: a miss that cannot be built yields no object for that index on
/// this pass, and the host retries on a later one.
#[derive(Clone, Debug)]
pub struct RenderCacheController<N, B> {
    options: CacheOptions,
    builder: B,
    store: ItemStore<N>,
    remap: IndexRemapper,
    range: ActiveRangeCalculator,
    idle: IdleReconciler,
    looped: bool,
    last_recycle: Option<(i64, i64)>,
}

impl<N, B: ItemBuilder<N>> RenderCacheController<N, B> {
    pub fn new(options: CacheOptions, builder: B) -> Self {
        vdebug!(
            total_count = options.total_count,
            start_index = options.start_index,
            "RenderCacheController::new"
        );
        Self {
            range: ActiveRangeCalculator::new(options.memoize_active_range),
            options,
            builder,
            store: ItemStore::new(),
            remap: IndexRemapper::new(),
            idle: IdleReconciler::new(),
            looped: false,
            last_recycle: None,
        }
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: CacheOptions) {
        if self.options == options {
            return;
        }
        vdebug!(
            total_count = options.total_count,
            start_index = options.start_index,
            memoize = options.memoize_active_range,
            "RenderCacheController::set_options"
        );
        if self.options.start_index != options.start_index {
            self.last_recycle = None;
        }
        self.range.set_memoize(options.memoize_active_range);
        self.range.force_next();
        self.options = options;
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut CacheOptions)) {
        let mut next = self.options;
        f(&mut next);
        self.set_options(next);
    }

    pub fn total_count(&self) -> usize {
        self.options.total_count
    }

    pub fn set_total_count(&mut self, total_count: usize) {
        if self.options.total_count == total_count {
            return;
        }
        vdebug!(
            from = self.options.total_count,
            to = total_count,
            "set_total_count"
        );
        self.options.total_count = total_count;
        self.range.force_next();
    }

    pub fn set_start_index(&mut self, start_index: i64) {
        if self.options.start_index == start_index {
            return;
        }
        self.options.start_index = start_index;
        self.last_recycle = None;
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut B {
        &mut self.builder
    }

    pub fn into_builder(self) -> B {
        self.builder
    }

    pub fn store(&self) -> &ItemStore<N> {
        &self.store
    }

    pub fn remapper(&self) -> &IndexRemapper {
        &self.remap
    }

    pub fn active_window(&self) -> ActiveWindow {
        self.range.window()
    }

    pub fn is_looped(&self) -> bool {
        self.looped
    }

    pub fn move_state(&self) -> Option<MoveState> {
        self.remap.state()
    }

    /// Returns the render object for display index `index`.
    ///
    /// The index goes through the pending move (if any) first. A current active-tier object is
    /// returned as [`ItemOutcome::Unchanged`]. On a miss, `need_build = false` answers
    /// [`ItemOutcome::NoNode`]; otherwise the builder is asked and its object is placed in the
    /// active tier.
    pub fn get_item(
        &mut self,
        index: i64,
        need_build: bool,
    ) -> (ItemOutcome, Option<&CacheEntry<N>>) {
        let data_index = self.remap.forward(index);

        if let Some(handle) = self.store.active_handle(data_index) {
            if self.store.lookup_active(data_index).is_some() {
                return (ItemOutcome::Unchanged, self.store.lookup(handle));
            }
            vwarn!(
                index = data_index,
                %handle,
                "stale ActiveIndexMap entry; treating as a miss"
            );
            self.store.drop_stale(data_index);
        }

        if !need_build {
            return (ItemOutcome::NoNode, None);
        }

        vtrace!(index, data_index, "build_or_update");
        let built = self.builder.build_or_update(data_index);
        let Some((outcome, handle)) = self.accept_build(data_index, built) else {
            return (ItemOutcome::NoNode, None);
        };
        self.store.debug_check_invariants();
        // new child: the next idle pass attaches it
        self.idle.schedule();
        (outcome, self.store.lookup(handle))
    }

    fn accept_build(
        &mut self,
        index: i64,
        built: BuildResult<N>,
    ) -> Option<(ItemOutcome, RenderHandle)> {
        match built {
            BuildResult::Failed => {
                vwarn!(index, "builder failed");
                None
            }
            BuildResult::Created { handle, node } => {
                if !handle.is_valid() {
                    vwarn!(index, "builder created an object with an invalid handle");
                    return None;
                }
                let Some(node) = node else {
                    vwarn!(index, %handle, "builder reported a new object but produced none");
                    return None;
                };
                if self.store.contains(handle) {
                    vwarn!(index, %handle, "builder reused a cached handle for a new object");
                }
                self.store.insert(index, handle, CacheEntry::new(node));
                Some((ItemOutcome::Created, handle))
            }
            BuildResult::Updated { handle, node } => {
                if !handle.is_valid() {
                    vwarn!(index, "builder updated an object with an invalid handle");
                    return None;
                }
                if !self.store.contains(handle) {
                    let Some(node) = node else {
                        vwarn!(index, %handle, "builder updated an uncached handle without an object");
                        return None;
                    };
                    self.store.insert(index, handle, CacheEntry::new(node));
                    return Some((ItemOutcome::Updated, handle));
                }
                match node {
                    Some(node) => {
                        self.store.replace_node(handle, node);
                    }
                    None if self.store.lookup(handle).is_some_and(|e| e.node().is_none()) => {
                        vwarn!(index, %handle, "builder updated a stale entry without an object");
                        return None;
                    }
                    None => {}
                }
                self.store.promote(index, handle);
                Some((ItemOutcome::Updated, handle))
            }
        }
    }

    /// Applies the host's visible window plus padding.
    ///
    /// Active entries outside the normalized window are demoted to the spare tier; spare
    /// entries still flagged live or attached lose those flags. Returns `true` if anything
    /// changed, in which case an idle pass is scheduled.
    pub fn set_active_range(
        &mut self,
        visible_start: i64,
        visible_end: i64,
        pad_start: usize,
        pad_end: usize,
        looped: bool,
    ) -> bool {
        let request = RangeRequest {
            visible_start,
            visible_end,
            pad_start,
            pad_end,
            looped,
        };
        self.apply_range(request)
    }

    /// Same as [`Self::set_active_range`], taking a prepared request.
    pub fn apply_range(&mut self, request: RangeRequest) -> bool {
        let normalized = self.range.normalize(request, self.options.total_count);
        let window = normalized.window;
        self.looped = request.looped;
        vtrace!(
            visible_start = request.visible_start,
            visible_end = request.visible_end,
            pad_start = request.pad_start,
            pad_end = request.pad_end,
            looped = request.looped,
            window_start = window.start,
            window_end = window.end,
            recomputed = normalized.recomputed,
            "set_active_range"
        );

        let period = if request.looped {
            count_to_i64(self.options.total_count)
        } else {
            0
        };
        let outside: Vec<RenderHandle> = self
            .store
            .active_iter()
            .filter(|&(index, _)| !window.contains_looped(self.remap.inverse(index), period))
            .map(|(_, h)| h)
            .collect();
        let mut demoted = 0usize;
        for handle in outside {
            if self.store.demote(handle) {
                demoted += 1;
            }
        }
        let released = self.store.release_spare_liveness();

        self.builder.notify_active_range(ActiveRangeNotice {
            window,
            visible_start: request.visible_start,
            visible_end: request.visible_end,
            looped: request.looped,
            force_full_run: normalized.recomputed,
        });

        self.store.debug_check_invariants();
        let changed = demoted > 0 || released > 0;
        if changed {
            vtrace!(demoted, released, "active range reclassified entries");
            self.idle.schedule();
        }
        changed
    }

    /// Forwards a recycle notification for `[from, to]` to the builder, relative to the base
    /// offset. A repeat of the previous bounds is suppressed. Returns whether the builder was
    /// notified.
    pub fn recycle_range(&mut self, from: i64, to: i64) -> bool {
        let base = self.options.start_index;
        let bounds = (from.saturating_sub(base), to.saturating_sub(base));
        if self.last_recycle == Some(bounds) {
            return false;
        }
        self.last_recycle = Some(bounds);
        self.builder.notify_recycle_range(bounds.0, bounds.1);
        true
    }

    /// Records a drag hop from display index `from` to `to`.
    ///
    /// No cached object is discarded; only the display order changes. `from == to` is a no-op.
    pub fn move_item(&mut self, from: i64, to: i64) -> bool {
        if !self.remap.set(from, to) {
            return false;
        }
        vtrace!(from, to, state = ?self.remap.state(), "move_item");
        self.idle.schedule();
        true
    }

    /// Finalizes the pending move: the ActiveIndexMap is re-keyed to the new order and the
    /// builder is told about the reorder. Returns the committed move.
    pub fn commit_move(&mut self) -> Option<MoveState> {
        let state = self.remap.clear()?;
        let applied = IndexRemapper::with_state(Some(state));
        self.store.rekey(|index| applied.inverse(index));
        self.store.debug_check_invariants();
        vdebug!(from = state.from, to = state.to, "commit_move");

        self.range.force_next();
        self.builder.notify_move(state.from, state.to);
        self.builder.notify_move(-1, -1);
        self.idle.schedule();
        Some(state)
    }

    /// Drops the pending move. The ActiveIndexMap is left exactly as it was.
    pub fn cancel_move(&mut self) -> Option<MoveState> {
        let state = self.remap.clear()?;
        vdebug!(from = state.from, to = state.to, "cancel_move");
        self.builder.notify_move(-1, -1);
        self.idle.schedule();
        Some(state)
    }

    /// Deletes a cached entry outright and returns its object.
    pub fn remove_node(&mut self, handle: RenderHandle) -> Option<N> {
        let entry = self.store.remove(handle)?;
        if entry.is_active_tier() {
            self.idle.schedule();
        }
        self.store.debug_check_invariants();
        entry.node
    }

    /// The host tore down the object behind `handle`. The entry stays cached without an object;
    /// any active lookup of it is treated as a miss until rebuilt.
    pub fn detach_node(&mut self, handle: RenderHandle) -> Option<N> {
        let node = self.store.take_node(handle)?;
        if self.store.index_of(handle).is_some() {
            self.idle.schedule();
        }
        Some(node)
    }

    /// Demotes every active entry after an out-of-band data reload and forces the next range
    /// computation. Cached objects stay available for reuse. Returns how many entries were
    /// demoted.
    pub fn invalidate_all(&mut self) -> usize {
        let demoted = self.store.demote_all();
        vdebug!(demoted, "invalidate_all");
        self.range.force_next();
        self.idle.schedule();
        demoted
    }

    pub fn is_reconcile_pending(&self) -> bool {
        self.idle.is_pending()
    }

    /// Runs the deferred reconcile pass if one is pending. Returns whether it ran.
    pub fn run_idle(&mut self) -> bool {
        self.idle.run(&mut self.store, &self.remap, &mut self.builder)
    }

    /// Active render objects in display order, as of the last idle pass.
    pub fn children(&self) -> &[RenderHandle] {
        self.idle.children()
    }

    pub fn index_of(&self, handle: RenderHandle) -> Option<i64> {
        self.store.index_of(handle)
    }

    pub fn lookup(&self, handle: RenderHandle) -> Option<&CacheEntry<N>> {
        self.store.lookup(handle)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Visits the active tier in data-index order.
    pub fn for_each_active(&self, mut f: impl FnMut(i64, RenderHandle, &CacheEntry<N>)) {
        for (index, handle) in self.store.active_iter() {
            if let Some(entry) = self.store.lookup(handle) {
                f(index, handle, entry);
            }
        }
    }

    /// Visits the spare tier in handle order.
    pub fn for_each_spare(&self, mut f: impl FnMut(RenderHandle, &CacheEntry<N>)) {
        for handle in self.store.spare_handles() {
            if let Some(entry) = self.store.lookup(handle) {
                f(handle, entry);
            }
        }
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        let (live, attached) = self.store.count_flags();
        CacheSnapshot {
            total_count: self.options.total_count,
            start_index: self.options.start_index,
            window: self.range.window(),
            looped: self.looped,
            active: self.store.active_len(),
            spare: self.store.spare_len(),
            live,
            attached,
            move_state: self.remap.state(),
            reconcile_pending: self.idle.is_pending(),
            idle_passes: self.idle.passes(),
        }
    }

    /// Human-readable dump of the ActiveIndexMap and tier state, stable enough to compare in
    /// logs and tests.
    pub fn dump_cache_state(&self) -> String {
        dump(&self.snapshot(), &self.store, &self.remap)
    }
}
