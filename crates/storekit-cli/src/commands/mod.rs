//! Subcommand implementations

pub mod cache;
pub mod config;
pub mod doctor;
pub mod logs;
pub mod schools;
pub mod web;
