//! Core engine modules
//!
//! Engine-level plumbing that is not tied to any one subsystem. Currently
//! this is the configuration system; the registry and managers consume it at
//! startup.

pub mod config;
