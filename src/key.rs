#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::RenderHandle;

#[cfg(feature = "std")]
pub(crate) type HandleMap<V> = HashMap<RenderHandle, V>;
#[cfg(not(feature = "std"))]
pub(crate) type HandleMap<V> = BTreeMap<RenderHandle, V>;
