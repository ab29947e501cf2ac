use core::fmt;

/// Opaque identifier of a render object, assigned by the [`crate::ItemBuilder`].
///
/// `RenderHandle::INVALID` (zero) is never a valid cache key; a builder returning it signals a
/// failed build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderHandle(u32);

impl RenderHandle {
    pub const INVALID: RenderHandle = RenderHandle(0);

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for RenderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tier and liveness flags of a cached render object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntryFlags {
    /// Member of the active tier (L1), i.e. reachable by index.
    pub active_tier: bool,
    /// Flagged "in use" by the visible structure.
    pub live: bool,
    /// Linked into the host's structure by the last idle pass.
    pub attached: bool,
}

/// A cached render object plus its tier state.
///
/// Entries are only reachable through their [`RenderHandle`]. The object slot may be empty when
/// the host tore the object down externally; such an entry is a stale reference and never
/// satisfies an active lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry<N> {
    pub(crate) node: Option<N>,
    pub(crate) flags: EntryFlags,
}

impl<N> CacheEntry<N> {
    pub fn new(node: N) -> Self {
        Self {
            node: Some(node),
            flags: EntryFlags::default(),
        }
    }

    pub fn node(&self) -> Option<&N> {
        self.node.as_ref()
    }

    pub fn flags(&self) -> EntryFlags {
        self.flags
    }

    pub fn is_active_tier(&self) -> bool {
        self.flags.active_tier
    }

    pub fn is_live(&self) -> bool {
        self.flags.live
    }

    pub fn is_attached(&self) -> bool {
        self.flags.attached
    }
}

/// The canonical retained range `[start, end]` (both inclusive).
///
/// `start > end` describes a wrapped window in loop mode: an index is inside when it is
/// `>= start` or `<= end`. [`ActiveWindow::EMPTY`] retains nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveWindow {
    pub start: i64,
    pub end: i64,
}

impl ActiveWindow {
    pub const EMPTY: ActiveWindow = ActiveWindow {
        start: i64::MAX,
        end: i64::MAX,
    };

    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    pub fn is_wrapped(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, index: i64) -> bool {
        if self.is_empty() {
            return false;
        }
        if self.is_wrapped() {
            index >= self.start || index <= self.end
        } else {
            self.start <= index && index <= self.end
        }
    }

    /// Membership test for loop mode: against a window that runs past either end of the
    /// sequence, an index shifted by exactly one `period` (the total item count) also counts as
    /// inside.
    ///
    /// A wrapped window already encodes the wraparound, so it gets no shifted allowance. With
    /// `period == 0` this is the same as [`Self::contains`].
    pub fn contains_looped(&self, index: i64, period: i64) -> bool {
        if self.contains(index) {
            return true;
        }
        if period <= 0 || self.is_empty() || self.is_wrapped() {
            return false;
        }
        self.contains(index.saturating_sub(period)) || self.contains(index.saturating_add(period))
    }
}

impl Default for ActiveWindow {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for ActiveWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("empty");
        }
        write!(f, "[{}, {}]", self.start, self.end)?;
        if self.is_wrapped() {
            f.write_str(" wrapped")?;
        }
        Ok(())
    }
}

/// A pending drag reorder: the item at display index `from` is currently shown at `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveState {
    pub from: i64,
    pub to: i64,
}

/// What [`crate::RenderCacheController::get_item`] did to produce its answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemOutcome {
    /// The index already had a current active-tier object.
    Unchanged,
    /// The builder created a new object.
    Created,
    /// The builder updated an existing (usually spare-tier) object.
    Updated,
    /// No object is available for this index on this pass.
    NoNode,
}

impl ItemOutcome {
    pub fn has_node(self) -> bool {
        !matches!(self, Self::NoNode)
    }
}

pub(crate) fn count_to_i64(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}
