//! One cursor frame of procedural state.

use crate::aggregator::GeometryHandle;
use glam::{Mat4, Vec3};

/// A value holding the generator's current placement state: symbol tag,
/// shared geometry handle, position, rotation, scale, and terminal flag.
///
/// Cloning a `Shape` (when a branch is pushed) copies position, rotation,
/// and scale by value but shares the geometry handle, so sibling branches
/// write into the same output buffer.
#[derive(Clone, Debug)]
pub struct Shape {
    /// Informational tag only; never read by the interpreter.
    pub symbol: char,

    /// Shared handle to the aggregator this frame emits into.
    pub geometry: GeometryHandle,

    pub position: Vec3,
    pub rotation: Mat4,
    pub scale: Vec3,

    /// Part of the frame contract; unused by the current interpreter logic.
    pub terminal: bool,
}

impl Shape {
    pub fn new(
        symbol: char,
        geometry: GeometryHandle,
        position: Vec3,
        rotation: Mat4,
        scale: Vec3,
        terminal: bool,
    ) -> Self {
        Self {
            symbol,
            geometry,
            position,
            rotation,
            scale,
            terminal,
        }
    }

    /// Moves the frame by `delta`.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Multiplies the running scale component-wise by `factor`.
    pub fn rescale(&mut self, factor: Vec3) {
        self.scale *= factor;
    }
}
