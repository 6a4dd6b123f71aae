// tests/interpretation.rs
use glam::{Mat4, Vec3};
use lindencity::{
    CityConfig, CityLayout, GeneratorConfig, GrammarRules, StructureError, StructureGenerator,
    TemplateLibrary, TemplateSource,
};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Drives every probability check to its permissive branch: uniform draws
/// come out just below 1.0.
struct MaxRng;

impl RngCore for MaxRng {
    fn next_u32(&mut self) -> u32 {
        u32::MAX
    }

    fn next_u64(&mut self) -> u64 {
        u64::MAX
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0xff);
    }
}

/// Drives every probability check to its suppressive branch: uniform draws
/// come out exactly 0.0, so no coin flip fires and story counts are zero.
struct MinRng;

impl RngCore for MinRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }
}

fn generator(seed: &str) -> StructureGenerator {
    StructureGenerator::new(
        seed,
        GrammarRules::standard(),
        GeneratorConfig::default(),
        Vec3::ZERO,
        Mat4::IDENTITY,
        Vec3::splat(0.5),
    )
}

#[test]
fn balanced_brackets_leave_an_empty_stack() {
    let lib = TemplateLibrary::builtin();
    let mut g = generator("B[B[S]B]B[X]");
    let report = g.draw(&lib, &mut MinRng).unwrap();
    assert_eq!(report.dangling_branches, 0);
}

#[test]
fn unmatched_close_bracket_is_fatal() {
    let lib = TemplateLibrary::builtin();
    let mut g = generator("B]B");
    let err = g.draw(&lib, &mut MinRng).unwrap_err();
    assert_eq!(err, StructureError::UnbalancedBracket { index: 1 });
}

#[test]
fn unmatched_open_bracket_is_reported_not_fatal() {
    let lib = TemplateLibrary::builtin();
    let mut g = generator("B[B[B");
    let report = g.draw(&lib, &mut MinRng).unwrap();
    assert_eq!(report.dangling_branches, 2);
    assert_eq!(report.body_instances, 3);
}

#[test]
fn pop_restores_the_pushed_frame() {
    let lib = TemplateLibrary::builtin();
    // B raises the cursor by 0.2 per placement; the branch body between the
    // brackets must not leak its elevation past the `]`.
    let mut g = generator("B[BBB]B");
    let report = g.draw(&lib, &mut MinRng).unwrap();
    assert_eq!(report.body_instances, 5);

    // instance 1 (first inside the branch) and instance 4 (first after the
    // pop) start from the same restored height
    let buffers = g.body_buffers();
    let v = 24;
    assert_eq!(buffers.positions[v].y, buffers.positions[4 * v].y);
}

#[test]
fn suppressive_randomness_places_only_base_floors() {
    let lib = TemplateLibrary::builtin();
    let mut g = generator("B[FS+][FS+]+X");
    let report = g.draw(&lib, &mut MinRng).unwrap();
    // S, X, F all lose their coin flips; + rolls zero stories.
    assert_eq!(report.body_instances, 1);
    assert_eq!(report.roof_instances, 0);
    assert_eq!(g.roof_buffers().index_count(), 0);
}

#[test]
fn expanded_seed_reaches_roof_two_under_permissive_randomness() {
    let lib = TemplateLibrary::builtin();

    let mut rules = GrammarRules::new();
    rules.add('B', "B");
    rules.add('+', "++");
    rules.add('S', "S++");
    rules.add('X', "Y");
    rules.add('F', "F");
    rules.add('[', "[");
    rules.add(']', "]");

    let mut g = StructureGenerator::new(
        "B[FS+]+X",
        rules,
        GeneratorConfig::default(),
        Vec3::ZERO,
        Mat4::IDENTITY,
        Vec3::splat(0.5),
    );
    g.expand(1);
    assert_eq!(g.expanded(), "B[FS++++]++Y");

    let report = g.draw(&lib, &mut MaxRng).unwrap();
    assert!(report.body_instances >= 1, "B must place at least one floor");
    assert_eq!(
        report.roof_instances, 1,
        "Y must fire exactly once when every coin flip succeeds"
    );
    assert_eq!(report.dangling_branches, 0);

    // roof buffers finalized for exactly one roof2 instance
    let lib_roof2 = lib.template("roof2").unwrap();
    let roof = g.roof_buffers();
    assert_eq!(roof.positions.len(), lib_roof2.vertex_count());
    assert_eq!(roof.indices, lib_roof2.indices);
}

#[test]
fn draw_with_missing_template_errors_at_first_placement() {
    let lib = TemplateLibrary::new(); // empty source
    let mut g = generator("B");
    let err = g.draw(&lib, &mut MinRng).unwrap_err();
    assert_eq!(
        err,
        StructureError::TemplateNotFound {
            name: "floor".to_owned()
        }
    );
}

#[test]
fn body_and_roof_counts_stay_consistent_with_buffers() {
    let lib = TemplateLibrary::builtin();
    let mut g = generator("B[S][S]BX");
    let report = g.draw(&lib, &mut MaxRng).unwrap();

    let floor = lib.template("floor").unwrap();
    let roof1 = lib.template("roof1").unwrap();
    let body = g.body_buffers();
    let roof = g.roof_buffers();

    assert_eq!(body.positions.len(), report.body_instances * floor.vertex_count());
    assert_eq!(body.normals.len(), report.body_instances * floor.vertex_count());
    assert_eq!(body.indices.len(), report.body_instances * floor.indices.len());
    assert_eq!(roof.indices.len(), report.roof_instances * roof1.indices.len());
}

#[test]
fn city_layout_fills_every_slot_family() {
    let _ = env_logger::builder().is_test(true).try_init();

    let lib = TemplateLibrary::builtin();
    let mut city = CityLayout::new(CityConfig::default());
    let mut rng = StdRng::seed_from_u64(7);
    city.generate(&lib, &mut rng).unwrap();

    // 6 rings x 25 slots, minus 5 street slots per ring, minus the
    // 10-slot park clearing on each of rings 4 and 5
    assert_eq!(city.buildings().len(), 100);

    assert_eq!(city.road_buffers().index_count(), lib.template("road").unwrap().indices.len());
    // 5 spokes x 6 ring tiles
    assert_eq!(
        city.streets_buffers().index_count(),
        30 * lib.template("square").unwrap().indices.len()
    );
    // central park plus five ring parks
    assert_eq!(
        city.parks_buffers().index_count(),
        6 * lib.template("circle").unwrap().indices.len()
    );
    assert_eq!(
        city.centerpiece_buffers().index_count(),
        lib.template("roof1").unwrap().indices.len()
    );

    // every building produced at least its base floor, with coherent buffers
    for building in city.buildings() {
        let body = building.body_buffers();
        assert!(!body.positions.is_empty());
        assert_eq!(body.positions.len() % 24, 0);
        assert_eq!(body.positions.len(), body.normals.len());
    }
}
