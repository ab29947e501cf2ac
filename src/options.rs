/// Configuration for [`crate::RenderCacheController`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheOptions {
    /// Length of the logical sequence. Drives clamping, the loop period and the wraparound
    /// midpoint split.
    pub total_count: usize,

    /// Position of the first item inside the parent container, for nested placement.
    ///
    /// Recycle ranges reported by the host are translated by this offset before they reach the
    /// builder.
    pub start_index: i64,

    /// Reuse the previous active window when `set_active_range` is called with identical
    /// arguments.
    pub memoize_active_range: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self::new(0)
    }
}

impl CacheOptions {
    pub fn new(total_count: usize) -> Self {
        Self {
            total_count,
            start_index: 0,
            memoize_active_range: true,
        }
    }

    pub fn with_total_count(mut self, total_count: usize) -> Self {
        self.total_count = total_count;
        self
    }

    pub fn with_start_index(mut self, start_index: i64) -> Self {
        self.start_index = start_index;
        self
    }

    pub fn with_memoize_active_range(mut self, memoize: bool) -> Self {
        self.memoize_active_range = memoize;
        self
    }
}
