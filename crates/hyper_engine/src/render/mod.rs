//! Rendering subsystem
//!
//! Only the resource-registry side of the renderer lives in this crate; the
//! graphics-API backends consume the handles these modules issue.

pub mod resources;
