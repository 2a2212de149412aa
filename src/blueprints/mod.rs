//! Built-in stack blueprints.
//!
//! A blueprint is a function from parameters to a [`crate::stack::Stack`]:
//! straight-line declaration code with no branching beyond what the
//! parameters select. The one blueprint shipped today is the scalable
//! WordPress deployment.

pub mod wordpress;

pub use wordpress::{build as wordpress, WordPressParams};
