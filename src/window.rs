use crate::ActiveWindow;
use crate::types::count_to_i64;

/// Host input to one active-range computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeRequest {
    pub visible_start: i64,
    pub visible_end: i64,
    pub pad_start: usize,
    pub pad_end: usize,
    pub looped: bool,
}

impl RangeRequest {
    pub fn new(visible_start: i64, visible_end: i64, pad_start: usize, pad_end: usize) -> Self {
        Self {
            visible_start,
            visible_end,
            pad_start,
            pad_end,
            looped: false,
        }
    }

    pub fn with_loop(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }
}

/// Result of [`ActiveRangeCalculator::normalize`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Normalized {
    pub window: ActiveWindow,
    /// `false` when the previous window was reused for an identical request.
    pub recomputed: bool,
}

/// Normalizes a visible range plus cache padding into the canonical active window.
///
/// - Outside loop mode the padded range is clamped to `[0, total_count - 1]`; a range lying
///   entirely outside it (or an inverted visible range) yields [`ActiveWindow::EMPTY`].
/// - In loop mode nothing is clamped. An inverted visible range stays inverted; if padding
///   closed the gap, the window is split at the sequence midpoint so that `start > end` still
///   marks it as wrapped.
pub fn normalize_range(request: RangeRequest, total_count: usize) -> ActiveWindow {
    let total = count_to_i64(total_count);
    if total == 0 {
        return ActiveWindow::EMPTY;
    }

    let mut start = request
        .visible_start
        .saturating_sub(count_to_i64(request.pad_start));
    let mut end = request
        .visible_end
        .saturating_add(count_to_i64(request.pad_end));

    if request.visible_start > request.visible_end {
        if !request.looped {
            vwarn!(
                visible_start = request.visible_start,
                visible_end = request.visible_end,
                "inverted visible range outside loop mode"
            );
            return ActiveWindow::EMPTY;
        }
        if start <= end {
            start = total / 2;
            end = start - 1;
        }
        return ActiveWindow::new(start, end);
    }

    if request.looped {
        return ActiveWindow::new(start, end);
    }

    let last = total - 1;
    if end < 0 || start > last {
        return ActiveWindow::EMPTY;
    }
    ActiveWindow::new(start.max(0), end.min(last))
}

/// Memoizing wrapper around [`normalize_range`].
///
/// An identical request reuses the previous window unless the force flag was raised (after an
/// out-of-band rebuild such as a committed reorder or a count change).
#[derive(Clone, Debug)]
pub struct ActiveRangeCalculator {
    last_request: Option<RangeRequest>,
    window: ActiveWindow,
    force: bool,
    memoize: bool,
}

impl Default for ActiveRangeCalculator {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ActiveRangeCalculator {
    pub fn new(memoize: bool) -> Self {
        Self {
            last_request: None,
            window: ActiveWindow::EMPTY,
            force: false,
            memoize,
        }
    }

    pub fn window(&self) -> ActiveWindow {
        self.window
    }

    pub fn last_request(&self) -> Option<RangeRequest> {
        self.last_request
    }

    pub fn is_forced(&self) -> bool {
        self.force
    }

    /// Makes the next [`Self::normalize`] recompute even for an identical request.
    pub fn force_next(&mut self) {
        self.force = true;
    }

    pub fn set_memoize(&mut self, memoize: bool) {
        self.memoize = memoize;
    }

    pub fn normalize(&mut self, request: RangeRequest, total_count: usize) -> Normalized {
        if self.memoize && !self.force && self.last_request == Some(request) {
            return Normalized {
                window: self.window,
                recomputed: false,
            };
        }
        self.force = false;
        self.window = normalize_range(request, total_count);
        self.last_request = Some(request);
        Normalized {
            window: self.window,
            recomputed: true,
        }
    }
}
