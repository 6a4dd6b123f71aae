//! The structure generator: grammar expansion plus turtle-style
//! interpretation of the expanded string into instanced geometry.
//!
//! The entry point is [`StructureGenerator`]. Construct it with a seed
//! string, a [`GrammarRules`] table, and a [`GeneratorConfig`]; call
//! [`expand`](StructureGenerator::expand) zero or more times, then
//! [`draw`](StructureGenerator::draw) exactly once per generation cycle.
//! `draw` appends; a second call doubles the emitted geometry.

use crate::aggregator::{GeometryBuffers, GeometryHandle};
use crate::error::StructureError;
use crate::rules::GrammarRules;
use crate::shape::Shape;
use crate::template::TemplateSource;
use glam::{Mat4, Vec3};
use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tunables for structure interpretation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Vertical step after placing a base floor (`B`).
    pub floor_rise: f32,
    /// Initial vertical step between stacked stories (`+`); `F` replaces it
    /// for the rest of the pass.
    pub story_rise: f32,
    /// Horizontal magnitude of the random shift applied by `S`.
    pub shift_step: f32,
    /// Template name placed for floors and stories.
    pub floor_template: String,
    /// Template name placed by `X`.
    pub roof1_template: String,
    /// Template name placed by `Y`.
    pub roof2_template: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            floor_rise: 0.2,
            story_rise: 0.35,
            shift_step: 0.3,
            floor_template: "floor".to_owned(),
            roof1_template: "roof1".to_owned(),
            roof2_template: "roof2".to_owned(),
        }
    }
}

/// Outcome of one interpretation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawReport {
    /// Floor/story instances placed into the body aggregator.
    pub body_instances: usize,
    /// Roof instances placed into the roof aggregator.
    pub roof_instances: usize,
    /// Branch frames left on the stack by unmatched `[` symbols. Non-fatal;
    /// the frames are discarded.
    pub dangling_branches: usize,
}

/// Expands a grammar seed and interprets the result into two aggregators,
/// one for the building body and one for its roof.
pub struct StructureGenerator {
    seed: String,
    expanded: String,
    rules: GrammarRules,
    config: GeneratorConfig,
    body: Shape,
    roof: Shape,
    stack: Vec<Shape>,
    city_center: Vec3,
}

impl StructureGenerator {
    /// Creates a generator rooted at `position` with the given orientation
    /// and per-axis scale. Body and roof each get a fresh aggregator.
    pub fn new(
        seed: impl Into<String>,
        rules: GrammarRules,
        config: GeneratorConfig,
        position: Vec3,
        rotation: Mat4,
        scale: Vec3,
    ) -> Self {
        let seed = seed.into();
        let tag = seed.chars().next().unwrap_or(' ');
        let body = Shape::new(tag, GeometryHandle::new(), position, rotation, scale, true);
        let roof = Shape::new(tag, GeometryHandle::new(), position, rotation, scale, true);
        Self {
            expanded: seed.clone(),
            seed,
            rules,
            config,
            body,
            roof,
            stack: Vec::new(),
            city_center: Vec3::ZERO,
        }
    }

    /// Records the reference point used for distance-based rule decisions
    /// (`F` scales outskirts structures harder than central ones).
    pub fn set_city_center(&mut self, center: Vec3) {
        self.city_center = center;
    }

    /// The original grammar seed.
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// The current expanded grammar string.
    pub fn expanded(&self) -> &str {
        &self.expanded
    }

    /// Shared handle to the body aggregator.
    pub fn body_geometry(&self) -> GeometryHandle {
        self.body.geometry.clone()
    }

    /// Shared handle to the roof aggregator.
    pub fn roof_geometry(&self) -> GeometryHandle {
        self.roof.geometry.clone()
    }

    /// Finished body buffers for the rendering consumer.
    pub fn body_buffers(&self) -> GeometryBuffers {
        self.body.geometry.buffers()
    }

    /// Finished roof buffers for the rendering consumer.
    pub fn roof_buffers(&self) -> GeometryBuffers {
        self.roof.geometry.buffers()
    }

    /// Rewrites the expanded string through the rulebook `iterations` times.
    ///
    /// Each pass scans left to right: a symbol with a rule contributes its
    /// replacement, a symbol without a rule contributes nothing. Dropping
    /// unmapped symbols is deliberate (see [`GrammarRules`]); do not treat
    /// it as pass-through.
    pub fn expand(&mut self, iterations: usize) {
        for _ in 0..iterations {
            let mut next = String::with_capacity(self.expanded.len());
            for symbol in self.expanded.chars() {
                if let Some(replacement) = self.rules.lookup(symbol) {
                    next.push_str(replacement);
                }
            }
            self.expanded = next;
        }
        debug!("expanded '{}' -> '{}'", self.seed, self.expanded);
    }

    /// Interprets the expanded string, placing geometry into the body and
    /// roof aggregators.
    ///
    /// All probabilistic decisions draw from `rng`, so a seeded or scripted
    /// source makes the pass reproducible; with an entropy source the output
    /// varies run to run by design. After every geometry-emitting symbol
    /// both aggregators are re-finalized, so the buffers are consistent at
    /// every step.
    ///
    /// # Errors
    ///
    /// [`StructureError::UnbalancedBracket`] when a `]` has no matching `[`;
    /// [`StructureError::TemplateNotFound`] when a configured template name
    /// is missing from `templates`. An unmatched `[` is only a warning,
    /// reported through [`DrawReport::dangling_branches`].
    pub fn draw(
        &mut self,
        templates: &impl TemplateSource,
        rng: &mut impl Rng,
    ) -> Result<DrawReport, StructureError> {
        debug!("interpreting '{}'", self.expanded);

        let mut rise = self.config.story_rise;
        let symbols = self.expanded.clone();

        for (i, symbol) in symbols.char_indices() {
            match symbol {
                // base floor: place and step up
                'B' => {
                    self.body
                        .geometry
                        .bind_template(&self.config.floor_template, templates)?;
                    self.place_body()?;
                    self.body
                        .translate(Vec3::new(0.0, self.config.floor_rise, 0.0));
                }

                // stack a random number of stories, more the farther the
                // structure sits from the origin
                '+' => {
                    self.body
                        .geometry
                        .bind_template(&self.config.floor_template, templates)?;
                    let planar = (self.body.position.x.powi(2)
                        + (self.body.position.z + 10.0).powi(2))
                    .sqrt();
                    let stories = (rng.random::<f32>() * planar).ceil() as usize;
                    for _ in 0..stories {
                        self.place_body()?;
                        self.body.translate(Vec3::new(0.0, rise, 0.0));
                    }
                }

                // half the time, shift sideways and attach an annex floor
                'S' => {
                    self.body
                        .geometry
                        .bind_template(&self.config.floor_template, templates)?;
                    if rng.random::<f32>() > 0.5 {
                        let sx = if rng.random::<f32>() < 0.5 { -1.0 } else { 1.0 };
                        let sz = if rng.random::<f32>() < 0.5 { -1.0 } else { 1.0 };
                        self.body.translate(Vec3::new(
                            sx * self.config.shift_step,
                            0.0,
                            sz * self.config.shift_step,
                        ));
                        self.place_body()?;
                    }
                }

                // narrow spire roof, randomized height
                'X' => {
                    if rng.random::<f32>() > 0.5 {
                        self.roof
                            .geometry
                            .bind_template(&self.config.roof1_template, templates)?;
                        let height = rng.random::<f32>() * 0.5 + 0.2;
                        self.roof.geometry.place_transformed(
                            self.body.position,
                            Vec3::new(0.2, height, 0.2),
                            self.body.rotation,
                        )?;
                    }
                }

                // broad hip roof, randomized height
                'Y' => {
                    if rng.random::<f32>() > 0.5 {
                        self.roof
                            .geometry
                            .bind_template(&self.config.roof2_template, templates)?;
                        let height = rng.random::<f32>() * 0.5 + 0.8;
                        self.roof.geometry.place_transformed(
                            self.body.position,
                            Vec3::new(0.8, height, 0.8),
                            self.body.rotation,
                        )?;
                    }
                }

                // occasionally fatten the structure; outskirts structures
                // grow wider since there is more space out there
                'F' => {
                    if rng.random::<f32>() > 0.8 {
                        let dist = self.city_center.distance(self.body.position);
                        let factor = Vec3::new(
                            (3.0 * rng.random::<f32>() + 0.5) * 0.1 * dist,
                            1.0 + 2.0 * rng.random::<f32>(),
                            (4.0 * rng.random::<f32>() + 0.5) * 0.1 * dist,
                        );
                        self.body.rescale(factor);
                        rise = factor.y;
                    }
                }

                '[' => {
                    self.stack.push(self.body.clone());
                    continue;
                }

                ']' => {
                    self.body = self
                        .stack
                        .pop()
                        .ok_or(StructureError::UnbalancedBracket { index: i })?;
                    continue;
                }

                // symbols without an interpretation are inert
                _ => {}
            }

            self.body.geometry.finalize();
            self.roof.geometry.finalize();
        }

        let dangling_branches = self.stack.len();
        if dangling_branches > 0 {
            warn!(
                "'{}' left {dangling_branches} unmatched '[' frame(s) on the stack",
                self.expanded
            );
            self.stack.clear();
        }

        Ok(DrawReport {
            body_instances: self.body.geometry.instance_count(),
            roof_instances: self.roof.geometry.instance_count(),
            dangling_branches,
        })
    }

    fn place_body(&self) -> Result<(), StructureError> {
        self.body.geometry.place_transformed(
            self.body.position,
            self.body.scale,
            self.body.rotation,
        )
    }
}
