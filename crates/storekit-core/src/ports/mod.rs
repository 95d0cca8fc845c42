//! Ports - Interfaces for external stores

pub mod documents;
pub mod fetch;
pub mod kv;

pub use documents::DocumentCollection;
pub use fetch::{FetchedPage, PageFetcher};
pub use kv::KeyValueStore;
