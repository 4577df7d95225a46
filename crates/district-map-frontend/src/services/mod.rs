//! # Services Module
//!
//! Browser-side plumbing: page globals, layer fetches, the attribute table
//! widget and the deck.gl engine.

pub mod deck;
pub mod fetch;
pub mod interop;
pub mod page;
pub mod table;

pub use deck::{DeckMap, MapEvents, Pick};
pub use fetch::fetch_layer;
pub use page::{PagePayload, read_payload};
pub use table::edit_feature;
