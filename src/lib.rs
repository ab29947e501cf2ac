//! A headless render-object cache for virtualized lists, grids and carousels.
//!
//! Given a huge (or unbounded) logical sequence, the cache decides which items currently need a
//! live render object, keeps a bounded pool of them in two tiers, and hands them back to a host
//! layout engine without rebuilding objects that are already current:
//!
//! - the **active tier** holds objects inside the active window, reachable by index
//! - the **spare tier** holds objects that fell out of the window but are kept for reuse
//!
//! It is UI-agnostic. The host layout engine is expected to:
//! - report the visible range and cache padding once per layout pass
//!   ([`RenderCacheController::set_active_range`])
//! - ask for render objects by index ([`RenderCacheController::get_item`])
//! - run the deferred reconcile pass when idle ([`RenderCacheController::run_idle`])
//!
//! Render objects themselves come from an [`ItemBuilder`] supplied by the application; the cache
//! only ever stores the opaque values and [`RenderHandle`]s it returns.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod builder;
mod controller;
mod key;
mod options;
mod reconciler;
mod remap;
mod snapshot;
mod store;
mod types;
mod window;


pub use builder::{ActiveRangeNotice, BuildResult, FnBuilder, ItemBuilder};
pub use controller::RenderCacheController;
pub use options::CacheOptions;
pub use reconciler::{IdleReconciler, PurgeContext};
pub use remap::IndexRemapper;
pub use snapshot::CacheSnapshot;
pub use store::ItemStore;
pub use types::{ActiveWindow, CacheEntry, EntryFlags, ItemOutcome, MoveState, RenderHandle};
pub use window::{ActiveRangeCalculator, Normalized, RangeRequest, normalize_range};
