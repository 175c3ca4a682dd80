//! Back half of the pipeline: meta configuration, statement lowering, and
//! script rendering.
//!
//! The [`meta`] module parses the `meta` block body into a [`MetaConfig`]
//! and builds the simulator preamble; the [`lower`] module turns each
//! fully-expanded test block into [`Command`]s; the [`emit`] module joins
//! everything into the final script text.

#![warn(missing_docs)]

pub mod command;
pub mod emit;
pub mod lower;
pub mod meta;

pub use command::Command;
pub use emit::render_script;
pub use lower::lower_block;
pub use meta::MetaConfig;
