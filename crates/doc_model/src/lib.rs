//! Document Model - Drawable components and the document that owns them
//!
//! This crate provides the component trait and its built-in variants, the
//! registry used to rebuild components from their serialized envelopes, and
//! the [`Document`] container with identity, spatial and z-order indices.

mod component;
mod component_id;
mod document;
mod error;
mod load_save;
mod localization;
mod registry;
mod spatial;
mod z_index;
pub mod background;
pub mod image;
pub mod shape;
pub mod stroke;
pub mod text;

pub use component::*;
pub use component_id::*;
pub use document::*;
pub use error::*;
pub use load_save::*;
pub use localization::*;
pub use registry::*;
pub use spatial::*;
pub use z_index::*;
pub use background::*;
pub use image::*;
pub use shape::*;
pub use stroke::*;
pub use text::*;
