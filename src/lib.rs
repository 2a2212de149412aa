//! # Stackforge - Declarative Infrastructure Definitions
//!
//! Stackforge builds typed AWS resource declarations, wires them together by
//! logical name, validates the resulting reference graph, and synthesizes a
//! CloudFormation template for an external provisioning engine to diff and
//! apply. It executes nothing itself: the whole crate is a one-shot,
//! single-threaded composition step from parameters to a provisioning
//! request.
//!
//! ## Core Concepts
//!
//! - **Resource declarations**: named, typed descriptions of cloud resources
//!   ([`resource::Resource`]), produced by builders in [`resources`]
//! - **Values**: literal properties and deferred references
//!   ([`intrinsics::Value`]) resolved by the engine at apply time
//! - **Stacks**: ordered collections of declarations plus outputs
//! - **The reference graph**: [`graph::ResourceGraph`] enforces that every
//!   reference resolves and that the graph is acyclic
//! - **Synthesis**: [`synth::Synthesizer`] renders a validated stack into a
//!   cloud assembly (template + manifest)
//! - **Blueprints**: parameterized stack definitions in [`blueprints`]
//!
//! ## Pipeline
//!
//! ```text
//! parameters ──▶ blueprint ──▶ Stack ──▶ ResourceGraph ──▶ Template
//!                              (build)    (validate)        (synthesize)
//! ```
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use stackforge::prelude::*;
//!
//! fn main() -> stackforge::error::Result<()> {
//!     let stack = stackforge::blueprints::wordpress(&WordPressParams::default())?;
//!     let assembly = Synthesizer::new("stackforge.out").synthesize(&stack)?;
//!     println!("wrote {}", assembly.template_path.display());
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod blueprints;
pub mod error;
pub mod graph;
pub mod intrinsics;
pub mod resource;
pub mod resources;
pub mod stack;
pub mod synth;
pub mod template;

// Re-export commonly used items in prelude
pub mod prelude {
    //! Convenient re-exports of the most commonly needed types.

    pub use crate::blueprints::WordPressParams;
    pub use crate::error::{Error, Result};
    pub use crate::graph::ResourceGraph;
    pub use crate::intrinsics::Value;
    pub use crate::resource::{CfnResource, LogicalId, Resource};
    pub use crate::stack::Stack;
    pub use crate::synth::{Assembly, Synthesizer};
    pub use crate::template::Template;
}
