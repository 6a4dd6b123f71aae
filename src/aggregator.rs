//! Instanced-geometry accumulation into flat draw-ready buffers.
//!
//! One aggregator exists per logical geometry slot (a building's body, its
//! roof, the road). Placement calls append transformed copies of the bound
//! template's vertices; [`GeometryAggregator::finalize`] derives the index
//! and normal buffers from the aggregator's own instance count.

use crate::error::StructureError;
use crate::template::{TemplateGeometry, TemplateSource};
use glam::{Mat4, Vec3, Vec4};
use log::trace;
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// Finished flat buffers for one aggregator, in the layout the rendering
/// consumer expects: homogeneous positions, homogeneous normals, 32-bit
/// triangle indices.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryBuffers {
    pub positions: Vec<Vec4>,
    pub normals: Vec<Vec4>,
    pub indices: Vec<u32>,
}

impl GeometryBuffers {
    /// Total index count, i.e. the count handed to the draw call.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

/// Accumulates transformed instances of one template into flat buffers.
#[derive(Clone, Debug, Default)]
pub struct GeometryAggregator {
    template: Option<(String, TemplateGeometry)>,
    positions: Vec<Vec4>,
    normals: Vec<Vec4>,
    indices: Vec<u32>,
    instances: usize,
}

impl GeometryAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the named template from `source`, caching it on the aggregator.
    ///
    /// Re-binding the currently bound name is a no-op. An unknown name fails
    /// fast with [`StructureError::TemplateNotFound`] before any placement
    /// happens.
    pub fn bind_template(
        &mut self,
        name: &str,
        source: &impl TemplateSource,
    ) -> Result<(), StructureError> {
        if let Some((bound, _)) = &self.template
            && bound.as_str() == name
        {
            return Ok(());
        }
        let template = source
            .template(name)
            .ok_or_else(|| StructureError::TemplateNotFound {
                name: name.to_owned(),
            })?;
        self.template = Some((name.to_owned(), template.clone()));
        Ok(())
    }

    /// Number of instances placed so far. Sole source of truth for
    /// finalization; callers never supply their own count.
    pub fn instance_count(&self) -> usize {
        self.instances
    }

    /// Vertex count `V` of the bound template, or 0 before binding.
    pub fn template_vertex_count(&self) -> usize {
        self.template
            .as_ref()
            .map(|(_, t)| t.vertex_count())
            .unwrap_or(0)
    }

    /// Places one instance scaled uniformly by `scale` and translated to
    /// `center`.
    pub fn place_uniform(&mut self, center: Vec3, scale: f32) -> Result<(), StructureError> {
        self.place_with(center, |v| v * scale)
    }

    /// Places one instance scaled per-axis by `scale` and translated to
    /// `center`.
    pub fn place_scaled(&mut self, center: Vec3, scale: Vec3) -> Result<(), StructureError> {
        self.place_with(center, |v| v * scale)
    }

    /// Places one instance scaled per-axis, then rotated, then translated to
    /// `center`.
    pub fn place_transformed(
        &mut self,
        center: Vec3,
        scale: Vec3,
        rotation: Mat4,
    ) -> Result<(), StructureError> {
        let m = rotation * Mat4::from_scale(scale);
        self.place_with(center, |v| m.transform_vector3(v))
    }

    fn place_with(
        &mut self,
        center: Vec3,
        transform: impl Fn(Vec3) -> Vec3,
    ) -> Result<(), StructureError> {
        let (name, template) = self.template.as_ref().ok_or(StructureError::NoTemplateBound)?;
        trace!(
            "placing instance {} of '{name}' at {center}",
            self.instances
        );
        for &vertex in &template.positions {
            let p = center + transform(vertex.truncate());
            self.positions.push(p.extend(1.0));
        }
        self.instances += 1;
        Ok(())
    }

    /// Rebuilds the index and normal buffers from scratch for the current
    /// instance count: `n` offset copies of the template index list (copy
    /// `i` offset by `i * V`) and `n` copies of the template normal list.
    ///
    /// Idempotent; safe to call after every placement. A no-op before any
    /// template is bound.
    pub fn finalize(&mut self) {
        let Some((_, template)) = &self.template else {
            return;
        };
        let v = template.vertex_count() as u32;

        self.indices.clear();
        self.normals.clear();
        for i in 0..self.instances {
            let start = i as u32 * v;
            self.indices
                .extend(template.indices.iter().map(|&idx| start + idx));
            self.normals.extend_from_slice(&template.normals);
        }
    }

    /// Snapshot of the finished buffers for the rendering consumer.
    pub fn buffers(&self) -> GeometryBuffers {
        GeometryBuffers {
            positions: self.positions.clone(),
            normals: self.normals.clone(),
            indices: self.indices.clone(),
        }
    }
}

/// Shared-ownership handle to an aggregator.
///
/// Sibling branch frames of one structure intentionally write into a common
/// buffer; the handle makes that sharing explicit in the type system.
/// Single-threaded by design, matching the generator's execution model.
#[derive(Clone, Debug, Default)]
pub struct GeometryHandle(Rc<RefCell<GeometryAggregator>>);

impl GeometryHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrows the underlying aggregator immutably.
    pub fn get(&self) -> Ref<'_, GeometryAggregator> {
        self.0.borrow()
    }

    pub fn bind_template(
        &self,
        name: &str,
        source: &impl TemplateSource,
    ) -> Result<(), StructureError> {
        self.0.borrow_mut().bind_template(name, source)
    }

    pub fn place_uniform(&self, center: Vec3, scale: f32) -> Result<(), StructureError> {
        self.0.borrow_mut().place_uniform(center, scale)
    }

    pub fn place_scaled(&self, center: Vec3, scale: Vec3) -> Result<(), StructureError> {
        self.0.borrow_mut().place_scaled(center, scale)
    }

    pub fn place_transformed(
        &self,
        center: Vec3,
        scale: Vec3,
        rotation: Mat4,
    ) -> Result<(), StructureError> {
        self.0.borrow_mut().place_transformed(center, scale, rotation)
    }

    pub fn finalize(&self) {
        self.0.borrow_mut().finalize();
    }

    pub fn instance_count(&self) -> usize {
        self.0.borrow().instance_count()
    }

    pub fn buffers(&self) -> GeometryBuffers {
        self.0.borrow().buffers()
    }
}
