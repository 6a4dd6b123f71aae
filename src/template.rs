//! Canonical unit-space templates and the source they are fetched from.
//!
//! A template is an opaque bundle of per-vertex positions, per-vertex face
//! normals, and a triangulation index list for one instance of a shape.
//! Parsing external model files is out of scope; the built-in
//! [`TemplateLibrary`] constructs the canonical city shapes procedurally.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Vertex data for one canonical instance of a shape, in local unit-cube
/// coordinates.
///
/// Positions are homogeneous points (`w = 1`), normals homogeneous
/// directions (`w = 0`), one normal per vertex and constant across each
/// face. Indices reference vertex slots `0..V` for a single instance and
/// are never mutated after construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateGeometry {
    pub positions: Vec<Vec4>,
    pub normals: Vec<Vec4>,
    pub indices: Vec<u32>,
}

impl TemplateGeometry {
    /// Vertex count `V` of a single instance.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Checks the structural invariants: parallel position/normal lists and
    /// every index below the vertex count.
    pub fn is_coherent(&self) -> bool {
        let v = self.positions.len() as u32;
        self.positions.len() == self.normals.len() && self.indices.iter().all(|&i| i < v)
    }
}

/// A synchronous, always-available provider of templates by name.
pub trait TemplateSource {
    /// Returns the template registered under `name`, if any.
    fn template(&self, name: &str) -> Option<&TemplateGeometry>;
}

/// HashMap-backed template source preloaded with the canonical city shapes.
#[derive(Clone, Debug, Default)]
pub struct TemplateLibrary {
    templates: HashMap<String, TemplateGeometry>,
}

impl TemplateLibrary {
    /// An empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// A library holding the shapes the city generator places:
    /// `floor`, `roof1`, `roof2`, `road`, `square`, `circle`.
    pub fn builtin() -> Self {
        let mut lib = Self::new();
        lib.register("floor", unit_box(Vec3::splat(0.1)));
        lib.register("roof1", pyramid(0.1, 0.2));
        lib.register("roof2", pyramid(0.15, 0.08));
        lib.register("road", disc(1.0, 24));
        lib.register("square", quad(0.1));
        lib.register("circle", disc(0.5, 16));
        lib
    }

    /// Registers or replaces a template.
    pub fn register(&mut self, name: impl Into<String>, template: TemplateGeometry) {
        self.templates.insert(name.into(), template);
    }
}

impl TemplateSource for TemplateLibrary {
    fn template(&self, name: &str) -> Option<&TemplateGeometry> {
        self.templates.get(name)
    }
}

/// Axis-aligned box with the given half extents: six quad faces, four
/// vertices each, flat per-face normals, 36 indices.
pub fn unit_box(half: Vec3) -> TemplateGeometry {
    let (x, y, z) = (half.x, half.y, half.z);
    // (outward normal, four corners counter-clockwise from outside)
    let faces: [(Vec3, [Vec3; 4]); 6] = [
        (
            Vec3::Z,
            [
                Vec3::new(-x, -y, z),
                Vec3::new(x, -y, z),
                Vec3::new(x, y, z),
                Vec3::new(-x, y, z),
            ],
        ),
        (
            Vec3::NEG_Z,
            [
                Vec3::new(x, -y, -z),
                Vec3::new(-x, -y, -z),
                Vec3::new(-x, y, -z),
                Vec3::new(x, y, -z),
            ],
        ),
        (
            Vec3::Y,
            [
                Vec3::new(-x, y, z),
                Vec3::new(x, y, z),
                Vec3::new(x, y, -z),
                Vec3::new(-x, y, -z),
            ],
        ),
        (
            Vec3::NEG_Y,
            [
                Vec3::new(-x, -y, -z),
                Vec3::new(x, -y, -z),
                Vec3::new(x, -y, z),
                Vec3::new(-x, -y, z),
            ],
        ),
        (
            Vec3::X,
            [
                Vec3::new(x, -y, z),
                Vec3::new(x, -y, -z),
                Vec3::new(x, y, -z),
                Vec3::new(x, y, z),
            ],
        ),
        (
            Vec3::NEG_X,
            [
                Vec3::new(-x, -y, -z),
                Vec3::new(-x, -y, z),
                Vec3::new(-x, y, z),
                Vec3::new(-x, y, -z),
            ],
        ),
    ];

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (face, (normal, corners)) in faces.iter().enumerate() {
        let base = (face * 4) as u32;
        for corner in corners {
            positions.push(corner.extend(1.0));
            normals.push(normal.extend(0.0));
        }
        indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    TemplateGeometry {
        positions,
        normals,
        indices,
    }
}

/// Square pyramid sitting on the y = 0 plane: quad base facing down, four
/// triangular side faces with flat normals, apex at `(0, height, 0)`.
pub fn pyramid(half_base: f32, height: f32) -> TemplateGeometry {
    let d = half_base;
    let apex = Vec3::new(0.0, height, 0.0);
    let corners = [
        Vec3::new(-d, 0.0, d),
        Vec3::new(d, 0.0, d),
        Vec3::new(d, 0.0, -d),
        Vec3::new(-d, 0.0, -d),
    ];

    let mut positions = Vec::with_capacity(16);
    let mut normals = Vec::with_capacity(16);
    let mut indices = Vec::with_capacity(18);

    for corner in corners {
        positions.push(corner.extend(1.0));
        normals.push(Vec3::NEG_Y.extend(0.0));
    }
    indices.extend([0, 2, 1, 0, 3, 2]);

    for side in 0..4u32 {
        let a = corners[side as usize];
        let b = corners[((side + 1) % 4) as usize];
        let outward = ((a + b) / 2.0).with_y(0.0);
        let normal = Vec3::new(outward.x, d * outward.length() / height, outward.z).normalize();
        let base = 4 + side * 3;
        for p in [a, b, apex] {
            positions.push(p.extend(1.0));
            normals.push(normal.extend(0.0));
        }
        indices.extend([base, base + 1, base + 2]);
    }

    TemplateGeometry {
        positions,
        normals,
        indices,
    }
}

/// Flat upward-facing square tile of the given half extent on the y = 0
/// plane.
pub fn quad(half: f32) -> TemplateGeometry {
    let corners = [
        Vec3::new(-half, 0.0, half),
        Vec3::new(half, 0.0, half),
        Vec3::new(half, 0.0, -half),
        Vec3::new(-half, 0.0, -half),
    ];
    TemplateGeometry {
        positions: corners.iter().map(|c| c.extend(1.0)).collect(),
        normals: vec![Vec3::Y.extend(0.0); 4],
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

/// Flat upward-facing triangle fan disc on the y = 0 plane.
pub fn disc(radius: f32, segments: u32) -> TemplateGeometry {
    let mut positions = vec![Vec4::new(0.0, 0.0, 0.0, 1.0)];
    let mut normals = vec![Vec3::Y.extend(0.0)];
    let mut indices = Vec::with_capacity(segments as usize * 3);
    for i in 0..segments {
        let theta = std::f32::consts::TAU * i as f32 / segments as f32;
        positions.push(Vec4::new(radius * theta.sin(), 0.0, radius * theta.cos(), 1.0));
        normals.push(Vec3::Y.extend(0.0));
        let next = 1 + (i + 1) % segments;
        indices.extend([0, i + 1, next]);
    }
    TemplateGeometry {
        positions,
        normals,
        indices,
    }
}
