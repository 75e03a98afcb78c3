//! Page and fragment caches.

mod memory;

pub use memory::InMemoryCache;
