//! Edit Engine - Commands, history and the editing engine
//!
//! This crate implements reversible, serializable commands over a
//! [`doc_model::Document`], a linear undo/redo history and the
//! [`EditingEngine`] that ties them together.

mod batch;
mod command;
mod component_ref;
mod element_commands;
mod error;
mod executor;
mod localization;
mod settings;
mod transform_commands;
mod undo;

#[cfg(test)]
mod test_support;

pub use batch::*;
pub use command::*;
pub use component_ref::*;
pub use element_commands::*;
pub use error::*;
pub use executor::*;
pub use localization::*;
pub use settings::*;
pub use transform_commands::*;
pub use undo::*;
