#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shadowops::game::{MAX_PROBABILITY, MIN_PROBABILITY, analyze_operation, resolve_operation, validate};
use shadowops::{ActionKind, Objective, ObjectiveKind, Outcome, Position, Resource};

/// Structured input for resolution fuzzing.
#[derive(Arbitrary, Debug)]
struct ResolutionInput {
    /// Operation selector.
    action: u8,
    /// Archetype selector.
    kind: u8,
    /// Attacker ledger.
    money: u32,
    ammo: u32,
    food: u32,
    units: u32,
    /// Garrison overrides.
    defense: u32,
    garrison: u32,
    bonus: u32,
}

fuzz_target!(|input: ResolutionInput| {
    let action = ActionKind::ALL[usize::from(input.action) % ActionKind::ALL.len()];
    let kind = ObjectiveKind::ALL[usize::from(input.kind) % ObjectiveKind::ALL.len()];
    let wallet = Resource::new(input.money, input.ammo, input.food, input.units);

    let mut target = Objective::spawn(1, kind, Position::default());
    target.current_defense = input.defense;
    target.current_units = input.garrison;
    target.defense_bonus = input.bonus;

    // Must not panic, whatever the inputs
    let _ = validate(action, &wallet, &target);
    let result = resolve_operation(action, &wallet, &target);
    let analysis = analyze_operation(action, &wallet, &target);

    if result.enemy_strength == 0 {
        assert!((result.probability - 1.0).abs() < f64::EPSILON);
    } else {
        assert!(
            (MIN_PROBABILITY..=MAX_PROBABILITY).contains(&result.probability),
            "probability {} out of range",
            result.probability
        );
    }

    assert_eq!(result.outcome, analysis.predicted_outcome);
    match result.outcome {
        Outcome::Success => {
            assert_eq!(result.resources_lost, action.base_cost());
            assert_eq!(result.resources_gained, action.reward());
        }
        Outcome::Failure => {
            assert_eq!(result.resources_gained, Resource::ZERO);
        }
    }

    // Resolution is pure
    assert_eq!(result, resolve_operation(action, &wallet, &target));
});
