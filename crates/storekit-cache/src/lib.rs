//! Key-value cache helpers
//!
//! - [`Cache`]: stores scalars under random keys and records every
//!   [`Cache::store`] call (a counter plus input and output history lists)
//! - [`PageCache`]: caches fetched pages for a short time and counts visits

pub mod instrument;
pub mod value;
pub mod value_cache;
pub mod web;

pub use instrument::{call_history, count_calls, MethodKeys};
pub use value::StoreValue;
pub use value_cache::{replay, Cache, CallHistory, STORE_METHOD};
pub use web::{PageCache, DEFAULT_PAGE_TTL, VISIT_COUNT_PREFIX};
