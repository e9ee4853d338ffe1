//! Headless AI-vs-AI games for balance checks and determinism testing.

use serde::{Deserialize, Serialize};

use hexfront_protocol::{Event, EventKind, PlayerId, ReplayFile};

use crate::{
    ai::{ActionRegistry, AiPlayer},
    clock::SystemClock,
    game::GameEngine,
    pipeline::SimError,
    rules::Rules,
    scenario::ScenarioConfig,
    state::GameState,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelfPlayConfig {
    pub scenario: ScenarioConfig,
    /// Last turn played before the game is scored.
    pub max_turns: u32,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            scenario: ScenarioConfig::default(),
            max_turns: 100,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum VictoryCondition {
    /// Every other player was eliminated.
    Domination { winner: u8 },
    /// Turn limit reached with a single top score.
    ScoreVictory { winner: u8, scores: Vec<u32> },
    /// Turn limit reached with a shared top score.
    Draw,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerStats {
    pub player_id: u8,
    /// cities * 100 + population * 10 + units * 5
    pub final_score: u32,
    pub cities_founded: u32,
    pub units_produced: u32,
    pub units_lost: u32,
    pub final_city_count: u32,
    pub final_unit_count: u32,
    pub eliminated: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameMetrics {
    pub turns_played: u32,
    pub total_commands: u32,
    pub total_cities_founded: u32,
    pub total_units_produced: u32,
    pub total_units_destroyed: u32,
    pub total_combats: u32,
    pub total_eliminations: u32,
    pub final_state_hash: u64,
    pub player_stats: Vec<PlayerStats>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelfPlayResult {
    pub seed: u64,
    pub victory: VictoryCondition,
    pub metrics: GameMetrics,
    /// Wall clock.
    pub duration_ms: u64,
    #[serde(skip)]
    pub replay: Option<ReplayFile>,
}

/// Play one game with every seat driven by `registry`.
pub fn run_selfplay(
    config: &SelfPlayConfig,
    registry: &ActionRegistry,
    rules: &Rules,
) -> Result<SelfPlayResult, SimError> {
    let start = std::time::Instant::now();
    let mut engine = GameEngine::from_scenario(
        config.scenario.clone(),
        rules.clone(),
        Box::new(SystemClock),
    );
    let ai = AiPlayer::new(registry);

    let mut metrics = GameMetrics {
        player_stats: engine
            .state()
            .players
            .iter()
            .map(|p| PlayerStats {
                player_id: p.id.0,
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    };

    while engine.state().turn <= config.max_turns && !is_decided(engine.state()) {
        let player = engine.state().current_player;
        let report = ai.take_turn(&mut engine, player)?;
        if report.commands.is_empty() {
            tracing::warn!(%player, "ai made no progress; stopping");
            break;
        }
        metrics.total_commands += report.commands.len() as u32;
        for event in &report.events {
            record_event(event, &mut metrics);
        }
    }

    metrics.turns_played = engine.state().turn.min(config.max_turns);
    metrics.final_state_hash = engine.state_hash();
    finalize_player_stats(engine.state(), &mut metrics);
    let victory = decide_victory(engine.state(), &metrics);
    tracing::info!(
        seed = config.scenario.seed,
        turns = metrics.turns_played,
        ?victory,
        "self-play finished"
    );

    let replay = match engine.export_replay() {
        Ok(replay) => Some(replay),
        Err(err) => {
            tracing::warn!(%err, "replay export failed");
            None
        }
    };

    Ok(SelfPlayResult {
        seed: config.scenario.seed,
        victory,
        metrics,
        duration_ms: start.elapsed().as_millis() as u64,
        replay,
    })
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchSelfPlayResult {
    pub games_played: u32,
    pub results: Vec<SelfPlayResult>,
    pub aggregate: AggregateMetrics,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub avg_game_length: f64,
    pub game_length_std: f64,
    /// Indexed by seat.
    pub win_rates: Vec<f64>,
    /// 1.0 when every seat wins equally often, 0.0 when one seat's rate is off by a full share.
    pub win_rate_balance: f64,
    pub domination_rate: f64,
    pub avg_combats: f64,
    pub avg_cities: f64,
}

/// Play `games` games, seeding each one `config.scenario.seed + i`.
pub fn run_batch_selfplay(
    config: &SelfPlayConfig,
    games: u32,
    registry: &ActionRegistry,
    rules: &Rules,
) -> Result<BatchSelfPlayResult, SimError> {
    let results = (0..games)
        .map(|i| {
            let mut game = config.clone();
            game.scenario.seed = config.scenario.seed.wrapping_add(u64::from(i));
            run_selfplay(&game, registry, rules)
        })
        .collect::<Result<Vec<_>, _>>()?;
    let aggregate = aggregate(&results, usize::from(config.scenario.players));
    Ok(BatchSelfPlayResult {
        games_played: games,
        results,
        aggregate,
    })
}

fn aggregate(results: &[SelfPlayResult], seats: usize) -> AggregateMetrics {
    if results.is_empty() || seats == 0 {
        return AggregateMetrics::default();
    }
    let n = results.len() as f64;
    let mean = |f: fn(&GameMetrics) -> u32| {
        results.iter().map(|r| f64::from(f(&r.metrics))).sum::<f64>() / n
    };

    let avg_game_length = mean(|m| m.turns_played);
    let game_length_std = (results
        .iter()
        .map(|r| (f64::from(r.metrics.turns_played) - avg_game_length).powi(2))
        .sum::<f64>()
        / n)
        .sqrt();

    let mut wins = vec![0_u32; seats];
    let mut dominations = 0_u32;
    for result in results {
        let winner = match result.victory {
            VictoryCondition::Domination { winner } => {
                dominations += 1;
                Some(winner)
            }
            VictoryCondition::ScoreVictory { winner, .. } => Some(winner),
            VictoryCondition::Draw => None,
        };
        if let Some(slot) = winner.and_then(|w| wins.get_mut(usize::from(w))) {
            *slot += 1;
        }
    }
    let win_rates: Vec<f64> = wins.iter().map(|&w| f64::from(w) / n).collect();
    let fair = 1.0 / seats as f64;
    let worst = win_rates
        .iter()
        .map(|r| (r - fair).abs())
        .fold(0.0_f64, f64::max);

    AggregateMetrics {
        avg_game_length,
        game_length_std,
        win_rates,
        win_rate_balance: 1.0 - (worst / fair).min(1.0),
        domination_rate: f64::from(dominations) / n,
        avg_combats: mean(|m| m.total_combats),
        avg_cities: mean(|m| m.total_cities_founded),
    }
}

fn is_decided(state: &GameState) -> bool {
    state.players.len() > 1 && state.players.active_count() <= 1
}

fn record_event(event: &Event, metrics: &mut GameMetrics) {
    match &event.kind {
        EventKind::CityFounded { player, .. } => {
            metrics.total_cities_founded += 1;
            if let Some(s) = player_stats(metrics, player.0) {
                s.cities_founded += 1;
            }
        }
        EventKind::UnitSpawned { player, .. } => {
            metrics.total_units_produced += 1;
            if let Some(s) = player_stats(metrics, player.0) {
                s.units_produced += 1;
            }
        }
        // Founding also removes a unit, so losses are counted from combat results.
        EventKind::CombatResolved {
            attacker_player,
            defender_player,
            attacker_health,
            defender_health,
            ..
        } => {
            metrics.total_combats += 1;
            for (player, health) in [
                (attacker_player, attacker_health),
                (defender_player, defender_health),
            ] {
                if *health <= 0 {
                    metrics.total_units_destroyed += 1;
                    if let Some(s) = player_stats(metrics, player.0) {
                        s.units_lost += 1;
                    }
                }
            }
        }
        EventKind::PlayerEliminated { .. } => metrics.total_eliminations += 1,
        _ => {}
    }
}

fn player_stats(metrics: &mut GameMetrics, player: u8) -> Option<&mut PlayerStats> {
    metrics
        .player_stats
        .iter_mut()
        .find(|s| s.player_id == player)
}

fn finalize_player_stats(state: &GameState, metrics: &mut GameMetrics) {
    for stats in &mut metrics.player_stats {
        let player = PlayerId(stats.player_id);
        let cities: Vec<_> = state.cities_of(player).collect();
        let population: u32 = cities.iter().map(|(_, c)| c.population).sum();
        stats.final_city_count = cities.len() as u32;
        stats.final_unit_count = state.units_of(player).count() as u32;
        stats.eliminated = !state.players.is_active(player);
        stats.final_score =
            stats.final_city_count * 100 + population * 10 + stats.final_unit_count * 5;
    }
}

fn decide_victory(state: &GameState, metrics: &GameMetrics) -> VictoryCondition {
    if is_decided(state) {
        if let Some(winner) = state.players.active().next() {
            return VictoryCondition::Domination { winner: winner.0 };
        }
    }

    let scores: Vec<u32> = metrics.player_stats.iter().map(|p| p.final_score).collect();
    let best = scores.iter().copied().max().unwrap_or(0);
    let mut leaders = metrics
        .player_stats
        .iter()
        .filter(|p| p.final_score == best);
    match (leaders.next(), leaders.next()) {
        (Some(leader), None) => VictoryCondition::ScoreVictory {
            winner: leader.player_id,
            scores,
        },
        _ => VictoryCondition::Draw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{load_rules, RulesSource};

    fn config(seed: u64, max_turns: u32) -> SelfPlayConfig {
        SelfPlayConfig {
            scenario: ScenarioConfig {
                width: 12,
                height: 10,
                seed,
                ..ScenarioConfig::default()
            },
            max_turns,
        }
    }

    #[test]
    fn short_game_founds_cities_and_stays_in_budget() {
        let rules = load_rules(RulesSource::Embedded).expect("rules load");
        let registry = ActionRegistry::standard();
        let result = run_selfplay(&config(3, 6), &registry, &rules).unwrap();

        assert!(result.metrics.turns_played <= 6);
        assert!(result.metrics.total_cities_founded >= 2);
        assert_eq!(result.metrics.player_stats.len(), 2);
        assert!(result.metrics.total_commands > 0);
        assert!(result.replay.is_some());
    }

    #[test]
    fn same_seed_same_game() {
        let rules = load_rules(RulesSource::Embedded).expect("rules load");
        let registry = ActionRegistry::standard();
        let a = run_selfplay(&config(11, 8), &registry, &rules).unwrap();
        let b = run_selfplay(&config(11, 8), &registry, &rules).unwrap();
        assert_eq!(a.metrics, b.metrics);
        assert_eq!(a.victory, b.victory);
    }

    #[test]
    fn selfplay_replay_verifies() {
        let rules = load_rules(RulesSource::Embedded).expect("rules load");
        let registry = ActionRegistry::standard();
        let result = run_selfplay(&config(5, 5), &registry, &rules).unwrap();
        let replay = result.replay.unwrap();
        let engine = GameEngine::replay(replay, rules).unwrap();
        assert_eq!(engine.state_hash(), result.metrics.final_state_hash);
    }

    #[test]
    fn batch_uses_consecutive_seeds() {
        let rules = load_rules(RulesSource::Embedded).expect("rules load");
        let registry = ActionRegistry::standard();
        let batch = run_batch_selfplay(&config(20, 4), 3, &registry, &rules).unwrap();

        assert_eq!(batch.games_played, 3);
        let seeds: Vec<u64> = batch.results.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![20, 21, 22]);
        assert_eq!(batch.aggregate.win_rates.len(), 2);
        assert!((0.0..=1.0).contains(&batch.aggregate.win_rate_balance));
    }
}
