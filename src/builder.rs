use crate::reconciler::PurgeContext;
use crate::{ActiveWindow, RenderHandle};

/// The builder's answer to a build request for one index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildResult<N> {
    /// A new object was created.
    ///
    /// `node: None` means the builder claimed success without producing anything; the cache
    /// treats that as a failure.
    Created { handle: RenderHandle, node: Option<N> },
    /// An existing object (typically from the spare tier) was updated for the index.
    ///
    /// `node` replaces the cached object when given. It is required if `handle` is not cached.
    Updated { handle: RenderHandle, node: Option<N> },
    Failed,
}

impl<N> BuildResult<N> {
    pub fn created(handle: RenderHandle, node: N) -> Self {
        Self::Created {
            handle,
            node: Some(node),
        }
    }

    pub fn updated(handle: RenderHandle) -> Self {
        Self::Updated { handle, node: None }
    }

    pub fn handle(&self) -> Option<RenderHandle> {
        match self {
            Self::Created { handle, .. } | Self::Updated { handle, .. } => Some(*handle),
            Self::Failed => None,
        }
    }
}

/// Payload of [`ItemBuilder::notify_active_range`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveRangeNotice {
    /// The normalized window.
    pub window: ActiveWindow,
    pub visible_start: i64,
    pub visible_end: i64,
    pub looped: bool,
    /// `true` when the window was recomputed rather than reused from an identical request.
    pub force_full_run: bool,
}

/// The collaborator that owns the render-object pool.
///
/// The cache calls into it synchronously from the host's UI thread. Only
/// [`Self::build_or_update`] is required; the notifications default to no-ops.
pub trait ItemBuilder<N> {
    /// Produces (or refreshes) the render object for data index `index`.
    fn build_or_update(&mut self, index: i64) -> BuildResult<N>;

    /// The host recycled the items in `[from, to]` (already relative to the cache's base
    /// offset).
    fn notify_recycle_range(&mut self, from: i64, to: i64) {
        let _ = (from, to);
    }

    fn notify_active_range(&mut self, notice: ActiveRangeNotice) {
        let _ = notice;
    }

    /// A reorder was finalized. `(-1, -1)` signals that no move is pending any more.
    fn notify_move(&mut self, from: i64, to: i64) {
        let _ = (from, to);
    }

    /// Called once per idle pass. The builder may evict spare-tier entries through `purge`.
    fn purge(&mut self, purge: &mut PurgeContext<'_, N>) {
        let _ = purge;
    }
}

impl<N, B: ItemBuilder<N> + ?Sized> ItemBuilder<N> for &mut B {
    fn build_or_update(&mut self, index: i64) -> BuildResult<N> {
        (**self).build_or_update(index)
    }

    fn notify_recycle_range(&mut self, from: i64, to: i64) {
        (**self).notify_recycle_range(from, to);
    }

    fn notify_active_range(&mut self, notice: ActiveRangeNotice) {
        (**self).notify_active_range(notice);
    }

    fn notify_move(&mut self, from: i64, to: i64) {
        (**self).notify_move(from, to);
    }

    fn purge(&mut self, purge: &mut PurgeContext<'_, N>) {
        (**self).purge(purge);
    }
}

/// An [`ItemBuilder`] backed by a closure; every notification is ignored.
pub struct FnBuilder<F>(pub F);

impl<N, F: FnMut(i64) -> BuildResult<N>> ItemBuilder<N> for FnBuilder<F> {
    fn build_or_update(&mut self, index: i64) -> BuildResult<N> {
        (self.0)(index)
    }
}

impl<F> core::fmt::Debug for FnBuilder<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("FnBuilder(..)")
    }
}
