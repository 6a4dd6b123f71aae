//! Ring-layout city driver.
//!
//! Instantiates many [`StructureGenerator`]s around concentric rings and
//! fills the shared scenery slots (road, streets, parks, centerpiece). It
//! only produces finished buffers; rendering is a consumer concern.

use crate::aggregator::{GeometryAggregator, GeometryBuffers};
use crate::error::StructureError;
use crate::generator::{GeneratorConfig, StructureGenerator};
use crate::rules::GrammarRules;
use crate::template::TemplateSource;
use glam::{Mat4, Vec3};
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

const BUILDING_RINGS: std::ops::Range<u32> = 3..9;
const SLOTS_PER_RING: u32 = 25;
const STREET_SPOKES: u32 = 5;

/// Layout parameters for a generated city.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CityConfig {
    /// World-space city center; every building's distance-based decisions
    /// are measured from here.
    pub center: Vec3,
    /// Grammar expansion passes applied to each building before drawing.
    /// Defaults to 0: seeds are interpreted as written, so branch symbols
    /// survive to `draw` (an expansion pass erases any symbol the standard
    /// rulebook leaves unmapped).
    pub expansions: usize,
    /// Interpretation tunables handed to every building.
    pub generator: GeneratorConfig,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            center: Vec3::new(0.0, -1.9, -10.0),
            expansions: 0,
            generator: GeneratorConfig::default(),
        }
    }
}

/// A generated city: building generators plus the shared scenery slots.
#[derive(Default)]
pub struct CityLayout {
    config: CityConfig,
    road: GeometryAggregator,
    streets: GeometryAggregator,
    parks: GeometryAggregator,
    centerpiece: GeometryAggregator,
    buildings: Vec<StructureGenerator>,
}

impl CityLayout {
    pub fn new(config: CityConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Generates the whole city: ring road, radial streets, buildings on
    /// six concentric rings with park clearings, five ring parks plus a
    /// central one, and the centerpiece spire.
    pub fn generate(
        &mut self,
        templates: &impl TemplateSource,
        rng: &mut impl Rng,
    ) -> Result<(), StructureError> {
        let center = self.config.center;

        self.road.bind_template("road", templates)?;
        self.road.place_uniform(center, 3.3)?;
        self.road.finalize();

        self.streets.bind_template("square", templates)?;
        for spoke in 0..STREET_SPOKES {
            let rad = TAU / STREET_SPOKES as f32 * spoke as f32;
            for ring in BUILDING_RINGS {
                let reach = ring as f32;
                let scale = 0.3 + 0.05 * reach;
                self.streets.place_transformed(
                    Vec3::new(rad.sin() * reach, center.y, rad.cos() * reach + center.z),
                    Vec3::new(scale, 1.0, scale),
                    Mat4::from_rotation_y(rad),
                )?;
            }
        }
        self.streets.finalize();

        for ring in BUILDING_RINGS {
            for slot in 0..SLOTS_PER_RING {
                if !occupied(ring, slot) {
                    continue;
                }
                let rad = TAU / SLOTS_PER_RING as f32 * slot as f32;
                let reach = ring as f32;
                let position =
                    Vec3::new(rad.sin() * reach, center.y, rad.cos() * reach + center.z);

                // two building families, spire-roofed and hip-roofed
                let seed = if rng.random::<f32>() < 0.5 {
                    "B[FS+][FS+]+X"
                } else {
                    "B[FS[S+]+][FS+]+Y"
                };
                let mut building = StructureGenerator::new(
                    seed,
                    GrammarRules::standard(),
                    self.config.generator.clone(),
                    position,
                    Mat4::from_rotation_y(rad),
                    Vec3::splat(0.5),
                );
                building.set_city_center(center);
                building.expand(self.config.expansions);
                building.draw(templates, rng)?;
                self.buildings.push(building);
            }
        }
        debug!("generated {} buildings", self.buildings.len());

        self.parks.bind_template("circle", templates)?;
        self.parks
            .place_uniform(Vec3::new(0.0, -2.1, center.z), 1.5)?;
        for i in (1..11).step_by(2) {
            let rad = TAU / 10.0 * i as f32;
            self.parks.place_uniform(
                Vec3::new(rad.sin() * 4.5, -2.1, rad.cos() * 4.5 + center.z),
                0.9,
            )?;
        }
        self.parks.finalize();

        self.centerpiece.bind_template("roof1", templates)?;
        self.centerpiece
            .place_scaled(Vec3::new(0.0, -0.5, center.z), Vec3::new(0.5, 1.5, 0.5))?;
        self.centerpiece.finalize();

        Ok(())
    }

    /// The generated building structures, in placement order.
    pub fn buildings(&self) -> &[StructureGenerator] {
        &self.buildings
    }

    pub fn road_buffers(&self) -> GeometryBuffers {
        self.road.buffers()
    }

    pub fn streets_buffers(&self) -> GeometryBuffers {
        self.streets.buffers()
    }

    pub fn parks_buffers(&self) -> GeometryBuffers {
        self.parks.buffers()
    }

    pub fn centerpiece_buffers(&self) -> GeometryBuffers {
        self.centerpiece.buffers()
    }
}

/// Whether a ring slot holds a building. Every fifth slot stays clear for a
/// street spoke, and slots 2 and 3 past each spoke on rings 4 and 5 stay
/// clear for parks.
fn occupied(ring: u32, slot: u32) -> bool {
    if slot % 5 == 0 {
        return false;
    }
    let park_clearing = (slot % 5 == 2 || slot % 5 == 3) && (ring == 4 || ring == 5);
    !park_clearing
}
