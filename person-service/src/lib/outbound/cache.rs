pub mod in_memory;
pub mod noop;

pub use in_memory::InMemoryCacheStore;
pub use noop::NoopCacheStore;
