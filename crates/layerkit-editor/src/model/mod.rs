//! Layer data model.
//!
//! A [`Layer`] carries the attributes every annotation shares (id, visibility,
//! lock, opacity, rotation, style) and a [`Shape`] payload tagged by kind.
//! Layers serialize to the flat camelCase records hosts already store, e.g.
//! `{"id":"layer_1","type":"rectangle","x":0,"y":0,"width":10,"height":5}`.

pub mod background;
pub mod flags;
pub mod layer;
pub mod style;
pub mod tree;

pub use background::BackgroundState;
pub use layer::{Layer, Shape};
pub use style::{ArrowStyle, Style};
pub use tree::{descendant_ids, expand_ids, group_depth, parent_of};
