//! Document-store helpers
//!
//! Stateless functions over an already-open [`DocumentCollection`]: fixed
//! school queries and request statistics for an nginx access-log collection.
//!
//! [`DocumentCollection`]: storekit_core::DocumentCollection

pub mod log_stats;
pub mod schools;

pub use log_stats::{LogStats, HTTP_METHODS, TOP_IPS_LIMIT};
pub use schools::{insert_school, list_all, schools_by_topic};
