use crate::MoveState;

/// Translates indices through at most one in-flight drag reorder.
///
/// `forward` maps a display index (what the host lays out) to the data index the cache is keyed
/// by; `inverse` maps back. Both are the identity when no move is pending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexRemapper {
    state: Option<MoveState>,
}

impl IndexRemapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// A remapper pinned to `state`. A state with `from == to` is dropped.
    pub fn with_state(state: Option<MoveState>) -> Self {
        Self {
            state: state.filter(|s| s.from != s.to),
        }
    }

    pub fn state(&self) -> Option<MoveState> {
        self.state
    }

    pub fn is_moving(&self) -> bool {
        self.state.is_some()
    }

    /// Records a move hop. Returns `false` when nothing changed.
    ///
    /// A hop that starts where the pending move currently ends continues the same drag: the
    /// original `from` is kept and `to` advances. If the chain returns to its origin the state is
    /// cleared.
    pub(crate) fn set(&mut self, from: i64, to: i64) -> bool {
        if from == to {
            return false;
        }
        match self.state {
            Some(cur) if cur.to == from => {
                self.state = (cur.from != to).then_some(MoveState { from: cur.from, to });
            }
            _ => {
                self.state = Some(MoveState { from, to });
            }
        }
        true
    }

    pub(crate) fn clear(&mut self) -> Option<MoveState> {
        self.state.take()
    }

    pub fn forward(&self, index: i64) -> i64 {
        let Some(MoveState { from, to }) = self.state else {
            return index;
        };
        if index == to {
            return from;
        }
        if from < to && from <= index && index < to {
            return index + 1;
        }
        if to < from && to < index && index <= from {
            return index - 1;
        }
        index
    }

    pub fn inverse(&self, index: i64) -> i64 {
        let Some(MoveState { from, to }) = self.state else {
            return index;
        };
        if index == from {
            return to;
        }
        if from < to && from < index && index <= to {
            return index - 1;
        }
        if to < from && to <= index && index < from {
            return index + 1;
        }
        index
    }
}
