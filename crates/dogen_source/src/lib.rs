//! Source file management and span tracking for diagnostics.
//!
//! This crate provides the [`SourceFile`] type for the single test-description
//! file a generation run operates on, and the [`Span`] type for tracking byte
//! ranges within it. Comment-line blanking (the preprocessing step every later
//! stage relies on) lives here so that blanked text keeps the exact byte
//! offsets of the original.

#![warn(missing_docs)]

pub mod source_file;
pub mod span;

pub use source_file::SourceFile;
pub use span::Span;
