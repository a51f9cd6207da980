//! Multi-command integration tests for the engine.
//!
//! These tests play whole campaigns through the public manager API and check
//! the documented scenarios end to end.
//!
//! Run with: cargo test --release engine_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use shadowops::game::{RiskTier, ValidationReason, check_invariants};
use shadowops::{
    ActionKind, BuildingKind, GameManager, GameStatus, NewGameConfig, Objective, ObjectiveKind,
    ObjectiveStatus, Outcome, Position, Rejection, Resource,
};

fn layout(objectives: Vec<Objective>) -> NewGameConfig {
    NewGameConfig {
        objectives: Some(objectives.into()),
        ..NewGameConfig::default()
    }
}

#[test]
fn test_raid_on_fresh_village() {
    let mut manager = GameManager::default();
    let village = manager.objective(1).unwrap().clone();
    assert_eq!(village.kind, ObjectiveKind::Village);

    let result = manager.execute_operation(ActionKind::Raid, 1).unwrap();

    assert_eq!(result.enemy_strength, 28);
    assert!((result.player_strength - 21.0).abs() < 1e-9);
    assert!((result.probability - 0.95).abs() < 1e-12);
    assert_eq!(result.outcome, Outcome::Success);
    assert_eq!(result.target, village);
    assert_eq!(manager.resources(), Resource::new(500, 23, 34, 10));
    assert!((manager.alert_level() - 0.10).abs() < 1e-12);
}

#[test]
fn test_raid_raises_every_active_defense() {
    let mut manager = GameManager::default();
    manager.execute_operation(ActionKind::Raid, 1).unwrap();
    // 0.05 × 100 on success.
    assert!(manager.objectives().iter().all(|o| o.defense_bonus == 5));
}

#[test]
fn test_storage_upgrade_scenario() {
    let mut manager = GameManager::default();
    let before = manager.base_stats();
    assert_eq!(before.capacity.money, 1200);
    assert_eq!(before.next_storage_cost, Some(Resource::new(300, 2, 3, 0)));

    assert_eq!(manager.upgrade_building(BuildingKind::Storage), Ok(2));
    let after = manager.base_stats();
    assert_eq!(after.storage_level, 2);
    assert_eq!(after.capacity.money, 1400);
    assert_eq!(manager.resources(), Resource::new(200, 18, 27, 5));
}

#[test]
fn test_destruction_reduces_other_garrisons() {
    let mut manager = GameManager::default();
    let before: Vec<Objective> = manager.objectives().to_vec();

    // Farm #2: strength 20 against player strength 21 at coefficient 1.0.
    let result = manager.execute_operation(ActionKind::Destruction, 2).unwrap();
    assert_eq!(result.outcome, Outcome::Success);
    assert_eq!(
        manager.objective(2).map(|o| o.status),
        Some(ObjectiveStatus::Destroyed)
    );

    for (old, new) in before.iter().zip(manager.objectives()) {
        if new.id == 2 {
            continue;
        }
        assert_eq!(new.current_units, old.current_units.saturating_sub(2));
        assert_eq!(new.defense_bonus, old.defense_bonus);
    }
    assert_eq!(manager.statistics().destructions, 1);
}

#[test]
fn test_terminal_objectives_cannot_be_retargeted() {
    let mut manager = GameManager::default();
    manager.execute_operation(ActionKind::Destruction, 2).unwrap();

    let validation = manager
        .validate_operation(ActionKind::Destruction, 2)
        .unwrap();
    assert_eq!(
        validation.reasons.first(),
        Some(&ValidationReason::TargetNotActive)
    );
    assert!(validation.reasons.contains(&ValidationReason::AlreadyDestroyed));

    let before = manager.state().clone();
    assert!(matches!(
        manager.execute_operation(ActionKind::Raid, 2),
        Err(Rejection::Invalid(_))
    ));
    assert_eq!(manager.state(), &before);
}

#[test]
fn test_repeated_raids_end_in_defeat() {
    let mut manager = GameManager::default();
    let mut raids = 0;
    while manager.status() == GameStatus::Playing {
        manager.execute_operation(ActionKind::Raid, 1).unwrap();
        raids += 1;
        assert!(raids <= 12, "alert never maxed out");
    }

    assert_eq!(manager.status(), GameStatus::Defeat);
    assert!((manager.alert_level() - 1.0).abs() < f64::EPSILON);
    assert!(check_invariants(manager.state()).is_empty());
    assert_eq!(
        manager.execute_operation(ActionKind::Raid, 1),
        Err(Rejection::NotPlaying(GameStatus::Defeat))
    );
    // Resources never exceed the base ceilings along the way.
    assert!(manager.resources().fits_within(&manager.base_stats().capacity));
}

#[test]
fn test_small_campaign_victory() {
    let mut manager = GameManager::new(NewGameConfig {
        resources: Resource::new(500, 100, 100, 10),
        ..layout(vec![
            Objective::spawn(10, ObjectiveKind::Farm, Position::new(0.0, 0.0)),
            Objective::spawn(20, ObjectiveKind::Farm, Position::new(50.0, 0.0)),
        ])
    });

    let first = manager.execute_operation(ActionKind::Destruction, 10).unwrap();
    assert_eq!(first.outcome, Outcome::Success);
    assert_eq!(manager.status(), GameStatus::Playing);

    let second = manager.execute_operation(ActionKind::Capture, 20).unwrap();
    assert_eq!(second.outcome, Outcome::Success);
    assert_eq!(manager.status(), GameStatus::Victory);

    let map = manager.map_stats();
    assert_eq!((map.active, map.captured, map.destroyed), (0, 1, 1));
    assert_eq!(manager.history().len(), 2);
}

#[test]
fn test_empty_layout_wins_on_first_evaluation() {
    let mut manager = GameManager::new(layout(Vec::new()));
    assert_eq!(manager.status(), GameStatus::Victory);
    let snapshot = manager.export_state(0);
    manager.import_state(snapshot).unwrap();
    assert_eq!(manager.status(), GameStatus::Victory);
}

#[test]
fn test_failed_operation_pays_penalty_and_raises_alert() {
    let mut manager = GameManager::default();
    // Fortress #8: strength 95 against 21 at coefficient 0.9.
    let result = manager.execute_operation(ActionKind::Capture, 8).unwrap();
    assert_eq!(result.outcome, Outcome::Failure);
    assert_eq!(result.resources_lost, Resource::new(0, 15, 5, 2));
    assert_eq!(manager.resources(), Resource::new(500, 5, 25, 3));
    assert!((manager.alert_level() - 0.30).abs() < 1e-12);
    // Failure raises defense by half the bonus: round(0.075 × 100) = 8.
    assert!(manager.objectives().iter().all(|o| o.defense_bonus == 8));
    assert_eq!(manager.statistics().failures, 1);
}

#[test]
fn test_analysis_matches_execution() {
    let mut manager = GameManager::default();
    for id in 1..=8 {
        for action in ActionKind::ALL {
            let analysis = manager.analyze_operation(action, id).unwrap();
            assert_eq!(
                analysis.risk == RiskTier::Low || analysis.risk == RiskTier::Medium,
                analysis.predicted_outcome == Outcome::Success
            );
        }
    }

    let analysis = manager.analyze_operation(ActionKind::Robbery, 5).unwrap();
    let result = manager.execute_operation(ActionKind::Robbery, 5).unwrap();
    assert_eq!(analysis.predicted_outcome, result.outcome);
    assert!((analysis.probability - result.probability).abs() < f64::EPSILON);
}

#[test]
fn test_economy_loop() {
    let mut manager = GameManager::default();
    manager.purchase_supplies(40, 25).unwrap();
    assert_eq!(manager.resources(), Resource::new(250, 60, 55, 5));

    manager.recruit_units(2).unwrap();
    assert_eq!(manager.resources(), Resource::new(50, 60, 45, 7));

    assert!(matches!(
        manager.upgrade_building(BuildingKind::Barracks),
        Err(Rejection::InsufficientResources { .. })
    ));

    // Robbery pays 200 money on success.
    let result = manager.execute_operation(ActionKind::Robbery, 2).unwrap();
    assert_eq!(result.outcome, Outcome::Success);
    assert_eq!(manager.resources().money, 250);
}

#[test]
fn test_nearest_objective_lookup() {
    let manager = GameManager::default();
    let nearest = manager
        .nearest_objective(Position::new(125.0, 175.0), 20.0)
        .unwrap();
    assert_eq!(nearest.id, 1);
    assert!(
        manager
            .nearest_objective(Position::new(-500.0, -500.0), 20.0)
            .is_none()
    );
}

#[test]
fn test_new_game_discards_progress() {
    let mut manager = GameManager::default();
    manager.execute_operation(ActionKind::Raid, 1).unwrap();
    manager.pause_game();

    manager.start_new_game(NewGameConfig::default());
    assert_eq!(manager.state(), GameManager::default().state());
}
