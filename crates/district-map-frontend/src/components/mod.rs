//! # UI Components Module
//!
//! Leptos components of the map panel.

pub mod controls;
pub mod layer_toggles;
pub mod map;
pub mod properties;
pub mod tooltip;

pub use controls::*;
pub use layer_toggles::*;
pub use map::*;
pub use properties::*;
pub use tooltip::*;
