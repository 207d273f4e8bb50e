//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Memory management (the generational sparse pool)
//! - Logging utilities

pub mod logging;
pub mod memory;
