use alloc::string::String;
use core::fmt::Write;

use crate::{ActiveWindow, EntryFlags, IndexRemapper, ItemStore, MoveState};

/// A lightweight, serializable summary of the cache state.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheSnapshot {
    pub total_count: usize,
    pub start_index: i64,
    pub window: ActiveWindow,
    pub looped: bool,
    pub active: usize,
    pub spare: usize,
    pub live: usize,
    pub attached: usize,
    pub move_state: Option<MoveState>,
    pub reconcile_pending: bool,
    pub idle_passes: u64,
}

impl CacheSnapshot {
    pub fn cached(&self) -> usize {
        self.active + self.spare
    }
}

fn write_flags(out: &mut String, flags: EntryFlags) {
    if flags.live {
        out.push_str(" live");
    }
    if flags.attached {
        out.push_str(" attached");
    }
}

/// Renders the snapshot plus the full ActiveIndexMap and per-entry flags.
///
/// Active entries are listed in index order, spare entries in handle order, so the output is
/// stable across runs.
pub(crate) fn dump<N>(
    snapshot: &CacheSnapshot,
    store: &ItemStore<N>,
    remap: &IndexRemapper,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "cache: total_count={} start_index={} loop={}",
        snapshot.total_count, snapshot.start_index, snapshot.looped
    );
    let _ = writeln!(out, "window: {}", snapshot.window);
    match snapshot.move_state {
        Some(m) => {
            let _ = writeln!(out, "move: {} -> {}", m.from, m.to);
        }
        None => out.push_str("move: none\n"),
    }

    let _ = writeln!(out, "active ({}):", snapshot.active);
    for (index, handle) in store.active_iter() {
        let _ = write!(out, "  {index} -> {handle}");
        let display = remap.inverse(index);
        if display != index {
            let _ = write!(out, " (display {display})");
        }
        match store.lookup(handle) {
            Some(entry) => {
                if entry.node().is_none() {
                    out.push_str(" stale");
                }
                write_flags(&mut out, entry.flags());
            }
            None => out.push_str(" missing"),
        }
        out.push('\n');
    }

    let _ = writeln!(out, "spare ({}):", snapshot.spare);
    for handle in store.spare_handles() {
        let _ = write!(out, "  {handle}");
        if let Some(entry) = store.lookup(handle) {
            if entry.node().is_none() {
                out.push_str(" stale");
            }
            write_flags(&mut out, entry.flags());
        }
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "reconcile: {} (passes={})",
        if snapshot.reconcile_pending {
            "pending"
        } else {
            "idle"
        },
        snapshot.idle_passes
    );
    out
}
