//! hwinfo-core: hardware inventory library.
//!
//! Provides:
//! - `size`: exact byte quantities and their `"512 MB"` form
//! - `collector`: tool-output extraction and per-entity collectors
//! - `model`: typed, serializable hardware records

pub mod collector;
pub mod model;
pub mod size;
