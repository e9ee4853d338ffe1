use hexfront_core::{
    ai::ActionRegistry, load_rules, run_selfplay, CommandOutcome, FixedClock, GameEngine,
    GameState, PlayerManager, RulesSource, ScenarioConfig, SelfPlayConfig, Terrain, TileMap,
};
use hexfront_protocol::{
    wire, Buildable, Command, Event, EventKind, Hex, PlayerId, UnitId, UnitType,
};

const ME: PlayerId = PlayerId(0);
const THEM: PlayerId = PlayerId(1);

fn plains_engine() -> (GameEngine, UnitId) {
    let rules = load_rules(RulesSource::Embedded).expect("rules load");
    let mut state = GameState::new(
        TileMap::disc(Hex::ORIGIN, 5, Terrain::Plains),
        PlayerManager::new(2, false),
        rules,
    );
    let settler = state.spawn_unit(UnitType::Settler, ME, Hex::ORIGIN);
    state.spawn_unit(UnitType::Warrior, THEM, Hex::new(4, 0));
    (GameEngine::new(state, Box::new(FixedClock(7))), settler)
}

fn apply(engine: &mut GameEngine, command: Command) -> Vec<Event> {
    match engine.apply_command(command.clone()).expect("sim error") {
        CommandOutcome::Executed(events) => events,
        CommandOutcome::Rejected(r) => panic!("{command:?} rejected: {:?}", r.error),
    }
}

#[test]
fn founded_city_builds_a_warrior_and_grows() {
    let (mut engine, settler) = plains_engine();
    apply(&mut engine, Command::FoundCity { player: ME, unit: settler });
    let (city, _) = engine.state().city_at(Hex::ORIGIN).expect("city founded");
    apply(
        &mut engine,
        Command::SetProduction {
            player: ME,
            city,
            item: Buildable::Warrior,
        },
    );

    let mut events = Vec::new();
    for _ in 0..10 {
        events.extend(apply(&mut engine, Command::EndTurn { player: ME }));
        events.extend(apply(&mut engine, Command::EndTurn { player: THEM }));
    }

    let spawned: Vec<_> = events
        .iter()
        .filter_map(|e| match &e.kind {
            EventKind::UnitSpawned {
                player, unit_type, at, ..
            } => Some((*player, *unit_type, *at)),
            _ => None,
        })
        .collect();
    assert!(!spawned.is_empty());
    assert_eq!(spawned[0], (ME, UnitType::Warrior, Hex::ORIGIN));
    assert!(events
        .iter()
        .any(|e| matches!(e.kind, EventKind::PopulationGrowth { player: ME, .. })));
    assert!(events.iter().all(|e| e.timestamp_ms == 7));
    assert_eq!(engine.state().turn, 11);
}

#[test]
fn killing_the_last_unit_eliminates_its_owner() {
    let rules = load_rules(RulesSource::Embedded).expect("rules load");
    let mut state = GameState::new(
        TileMap::disc(Hex::ORIGIN, 3, Terrain::Plains),
        PlayerManager::new(2, false),
        rules,
    );
    let warrior = state.spawn_unit(UnitType::Warrior, ME, Hex::ORIGIN);
    let victim = state.spawn_unit(UnitType::Settler, THEM, Hex::new(1, 0));
    let mut engine = GameEngine::new(state, Box::new(FixedClock(0)));

    let events = apply(
        &mut engine,
        Command::Attack {
            player: ME,
            attacker: warrior,
            defender: victim,
        },
    );
    let kinds: Vec<_> = events.iter().map(|e| &e.kind).collect();
    assert!(matches!(
        kinds.as_slice(),
        [
            EventKind::CombatResolved {
                attacker_damage: 0,
                defender_damage: 100,
                ..
            },
            EventKind::UnitDestroyed { .. },
            EventKind::PlayerEliminated { player: THEM },
        ]
    ));
    assert!(!engine.state().players.is_active(THEM));
    assert!(engine.state().units.get(victim).is_none());
}

#[test]
fn invalid_commands_never_reach_state() {
    let (mut engine, settler) = plains_engine();
    let before = engine.state_hash();

    let attempts = [
        Command::MoveUnit {
            player: ME,
            unit: settler,
            to: Hex::new(40, 0),
        },
        Command::FoundCity {
            player: THEM,
            unit: settler,
        },
        Command::EndTurn { player: THEM },
    ];
    for command in attempts {
        let outcome = engine.apply_command(command).unwrap();
        let CommandOutcome::Rejected(rejection) = outcome else {
            panic!("expected rejection");
        };
        assert!(!rejection.valid);
        assert!(rejection.error.is_some());
    }
    assert_eq!(engine.state_hash(), before);
    assert!(engine.command_log().is_empty());
}

#[test]
fn replay_survives_json_round_trip() {
    let rules = load_rules(RulesSource::Embedded).expect("rules load");
    let mut engine = GameEngine::from_scenario(
        ScenarioConfig::default(),
        rules.clone(),
        Box::new(FixedClock(0)),
    );
    let (settler, _) = engine
        .state()
        .units_of(ME)
        .find(|(_, u)| u.unit_type == UnitType::Settler)
        .expect("starting settler");
    apply(&mut engine, Command::FoundCity { player: ME, unit: settler });
    apply(&mut engine, Command::EndTurn { player: ME });
    apply(&mut engine, Command::EndTurn { player: THEM });

    let text = wire::replay_to_json(&engine.export_replay().unwrap()).unwrap();
    let parsed = wire::replay_from_json(&text).unwrap();
    let replayed = GameEngine::replay(parsed, rules).unwrap();
    assert_eq!(replayed.state_hash(), engine.state_hash());
    assert_eq!(replayed.command_log(), engine.command_log());
}

#[test]
fn selfplay_is_deterministic_per_seed() {
    let rules = load_rules(RulesSource::Embedded).expect("rules load");
    let registry = ActionRegistry::standard();
    let config = SelfPlayConfig {
        scenario: ScenarioConfig {
            seed: 99,
            ..ScenarioConfig::default()
        },
        max_turns: 10,
    };

    let first = run_selfplay(&config, &registry, &rules).unwrap();
    let second = run_selfplay(&config, &registry, &rules).unwrap();
    assert_eq!(
        first.metrics.final_state_hash,
        second.metrics.final_state_hash
    );
    assert_eq!(first.metrics, second.metrics);
}
