//! Storage backends
//!
//! Redis and MongoDB for real deployments, plus in-process stand-ins with
//! the same semantics for tests and offline use.

pub mod http;
pub mod memory;
pub mod mongo;
pub mod redis;

pub use http::HttpFetcher;
pub use memory::{MemoryCollection, MemoryStore};
pub use mongo::MongoCollection;
pub use self::redis::RedisStore;
