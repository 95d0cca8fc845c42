//! Storekit Core Library
//!
//! Error type, store ports, query shapes and settings shared by the
//! document-store helpers and the key-value cache.

pub mod config;
pub mod error;
pub mod ports;
pub mod query;

pub use self::config::{Settings, SettingsManager};
pub use error::{Result, StoreError};
pub use ports::{DocumentCollection, FetchedPage, KeyValueStore, PageFetcher};
pub use query::{Filter, GroupCount};
