//! # lindencity
//!
//! An engine-agnostic procedural city generator. An L-System rulebook
//! expands a grammar seed, a turtle-style interpreter walks the expanded
//! string placing building floors and roofs, and instanced-geometry
//! aggregators accumulate the placements into flat position/normal/index
//! buffers ready for one draw call per mesh type.
//!
//! It decouples the grammar (what to grow) from the renderer (how to show
//! it): the crate knows nothing about GPUs and hands consumers finished
//! [`GeometryBuffers`].

pub mod aggregator;
pub mod city;
pub mod error;
pub mod generator;
pub mod rules;
pub mod shape;
pub mod template;
pub mod turtle;

pub use aggregator::*;
pub use city::*;
pub use error::*;
pub use generator::*;
pub use rules::*;
pub use shape::*;
pub use template::*;
pub use turtle::*;
