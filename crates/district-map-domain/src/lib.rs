//! # District Map - Domain Model
//!
//! Target-independent logic of the dashboard's map panel: which layers
//! exist and in which order they draw, how each one is styled, where the
//! camera looks, and what a hover or click on a feature shows. The frontend
//! forwards UI events to a [`MapSession`] and hands the resulting layer
//! configurations to the rendering engine.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod basemap;
pub mod error;
pub mod inspect;
pub mod layer;
pub mod measure;
pub mod session;
pub mod style;
pub mod view;

pub use basemap::Basemap;
pub use error::{MapError, Result};
pub use inspect::{AttributeTables, BuildingProperties, EditRequest, Tooltip};
pub use layer::{
    ClickAction, FillRule, GeoJsonStore, LayerId, LayerKind, LayerOptions, LayerProps, LayerSet,
    LayerSource,
};
pub use session::MapSession;
pub use style::Rgba;
pub use view::{BoundingBox, CameraTarget, ViewState, Viewport};
