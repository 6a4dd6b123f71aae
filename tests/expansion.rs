// tests/expansion.rs
use glam::{Mat4, Vec3};
use lindencity::{GeneratorConfig, GrammarRules, StructureGenerator};

fn generator(seed: &str, rules: GrammarRules) -> StructureGenerator {
    StructureGenerator::new(
        seed,
        rules,
        GeneratorConfig::default(),
        Vec3::ZERO,
        Mat4::IDENTITY,
        Vec3::ONE,
    )
}

#[test]
fn unmapped_symbols_are_dropped_not_passed_through() {
    let mut rules = GrammarRules::new();
    rules.add('B', "B");

    let mut g = generator("B[FS+]", rules);
    g.expand(1);
    assert_eq!(g.expanded(), "B");
}

#[test]
fn zero_iterations_is_identity() {
    let mut g = generator("B[FS+]+X", GrammarRules::standard());
    g.expand(0);
    assert_eq!(g.expanded(), "B[FS+]+X");
}

#[test]
fn k_passes_equal_k_composed_single_passes() {
    let rules = GrammarRules::standard();

    let mut three_at_once = generator("BS+X", rules.clone());
    three_at_once.expand(3);

    let mut one_at_a_time = generator("BS+X", rules);
    for _ in 0..3 {
        one_at_a_time.expand(1);
    }

    assert_eq!(three_at_once.expanded(), one_at_a_time.expanded());
}

#[test]
fn standard_rulebook_single_pass() {
    // B -> B, S -> S++, + -> ++, X -> Y; brackets and F have no rule
    // and vanish.
    let mut g = generator("B[FS+]+X", GrammarRules::standard());
    g.expand(1);
    assert_eq!(g.expanded(), "BS++++++Y");
}

#[test]
fn self_referential_rules_persist_across_passes() {
    let mut g = generator("BXB", GrammarRules::standard());
    g.expand(2);
    // X -> Y -> X oscillates; B persists.
    assert_eq!(g.expanded(), "BXB");
}

#[test]
fn end_to_end_expansion_with_structural_identity_rules() {
    // Keeping branch symbols alive through expansion requires explicit
    // identity rules; with them registered the bracketed skeleton survives
    // while S and + grow.
    let mut rules = GrammarRules::new();
    rules.add('B', "B");
    rules.add('+', "++");
    rules.add('S', "S++");
    rules.add('X', "Y");
    rules.add('F', "F");
    rules.add('[', "[");
    rules.add(']', "]");

    let mut g = generator("B[FS+]+X", rules);
    g.expand(1);
    assert_eq!(g.expanded(), "B[FS++++]++Y");
}

#[test]
fn add_overwrites_existing_rule() {
    let mut rules = GrammarRules::standard();
    assert_eq!(rules.lookup('B'), Some("B"));
    rules.add('B', "BB");
    assert_eq!(rules.lookup('B'), Some("BB"));
    assert_eq!(rules.lookup('?'), None);
}
