//! Application state management for Skyfare
//!
//! This crate provides the publish-on-change state container that view-models
//! use to expose a current snapshot and notify renderers when it changes.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod observable;

pub use observable::{Change, Observable};
