//! Foundation types shared by the Ember crates.
//!
//! Holds the RGB [`color::Color`] used by styles and configuration, and
//! the workspace-wide [`error::EmberError`].

pub mod color;
pub mod error;

pub use color::Color;
pub use error::{EmberError, Result};
