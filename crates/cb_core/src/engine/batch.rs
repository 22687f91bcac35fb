//! Batch day simulation and the in-memory league store
//!
//! A day's games are independent: each one runs against its own roster
//! snapshot with its own seeded rng, so they are spread over the rayon pool.
//! Results are merged back into [`LeagueStore`] by a single writer once the
//! whole day has finished.
//!
//! ## 포함 함수
//! - `simulate_day()`: 하루 경기 병렬 시뮬레이션 (일정 순서 유지)
//! - `simulate_days()`: N일 자동 진행 (라운드 로빈 일정)
//! - `round_robin()`: 서클 방식 대진표
//! - `LeagueStore::apply_day()`: 피로도/시즌 기록/순위 반영 후 일일 회복

use super::config::FatigueConfig;
use super::context::SimulationContext;
use super::game::{GameEngine, GamePlan};
use super::lineup::{LineupProvider, RosterProvider};
use super::pitching::recover;
use crate::error::{GameError, Result};
use crate::models::{
    GameOutcome, LeagueAverages, Player, PlayerId, SeasonStats, Side, TeamId, TeamSheet,
};
use chrono::{Days, NaiveDate};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// Golden-ratio increment for per-game seeds.
const SEED_STEP: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchup {
    pub home: TeamId,
    pub away: TeamId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueDay {
    pub date: NaiveDate,
    #[serde(default)]
    pub season: u16,
    pub matchups: Vec<Matchup>,
}

/// Seed of the `index`-th game of a batch.
pub fn game_seed(seed: u64, index: usize) -> u64 {
    seed.wrapping_add((index as u64 + 1).wrapping_mul(SEED_STEP))
}

/// Simulate every matchup of `day` in parallel. Output order follows
/// `day.matchups`.
pub fn simulate_day<P, L>(
    sim: &SimulationContext,
    rosters: &P,
    lineups: &L,
    day: &LeagueDay,
    seed: u64,
) -> Vec<GameOutcome>
where
    P: RosterProvider + Sync,
    L: LineupProvider + Sync,
{
    let outcomes: Vec<GameOutcome> = day
        .matchups
        .par_iter()
        .enumerate()
        .map(|(i, matchup)| {
            let plan = GamePlan {
                seed: game_seed(seed, i),
                date: day.date,
                season: day.season,
                home: TeamSheet::new(matchup.home.clone(), rosters.roster(&matchup.home)),
                away: TeamSheet::new(matchup.away.clone(), rosters.roster(&matchup.away)),
            };
            let rng = ChaCha8Rng::seed_from_u64(plan.seed);
            GameEngine::with_provider(plan, sim, rng, lineups).simulate()
        })
        .collect();

    info!(date = %day.date, games = outcomes.len(), "day simulated");
    outcomes
}

/// Circle-method pairing for `round`. With an odd team count one team
/// sits out each round. Home and away alternate between rounds.
pub fn round_robin(teams: &[TeamId], round: usize) -> Vec<Matchup> {
    let mut slots: Vec<Option<&TeamId>> = teams.iter().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }
    let n = slots.len();
    if n < 2 {
        return Vec::new();
    }

    let rest = n - 1;
    let shift = round % rest;
    let mut order = Vec::with_capacity(n);
    order.push(slots[0]);
    for i in 0..rest {
        order.push(slots[1 + (i + shift) % rest]);
    }

    (0..n / 2)
        .filter_map(|i| {
            let a = order[i]?;
            let b = order[n - 1 - i]?;
            let (home, away) = if (round + i) % 2 == 0 { (a, b) } else { (b, a) };
            Some(Matchup {
                home: home.clone(),
                away: away.clone(),
            })
        })
        .collect()
}

// ============================================================================
// League store
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamRecord {
    pub players: Vec<Player>,
    #[serde(default)]
    pub season: BTreeMap<PlayerId, SeasonStats>,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
}

impl TeamRecord {
    pub fn new(players: Vec<Player>) -> Self {
        Self {
            players,
            ..Default::default()
        }
    }

    pub fn win_pct(&self) -> f32 {
        let decided = self.wins + self.losses;
        if decided == 0 {
            0.0
        } else {
            self.wins as f32 / decided as f32
        }
    }

    fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }
}

/// In-memory roster store. Rosters are handed out as snapshots; all
/// writes go through [`LeagueStore::apply_day`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeagueStore {
    teams: BTreeMap<TeamId, TeamRecord>,
}

impl LeagueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_team(&mut self, team: TeamId, players: Vec<Player>) {
        self.teams.insert(team, TeamRecord::new(players));
    }

    pub fn team(&self, team: &TeamId) -> Option<&TeamRecord> {
        self.teams.get(team)
    }

    /// Team ids in sorted order.
    pub fn team_ids(&self) -> Vec<TeamId> {
        self.teams.keys().cloned().collect()
    }

    pub fn season_stats(&self, team: &TeamId, player: PlayerId) -> Option<&SeasonStats> {
        self.teams.get(team)?.season.get(&player)
    }

    /// Teams by win percentage, then wins, then id.
    pub fn standings(&self) -> Vec<(&TeamId, &TeamRecord)> {
        let mut table: Vec<(&TeamId, &TeamRecord)> = self.teams.iter().collect();
        table.sort_by(|(a_id, a), (b_id, b)| {
            b.win_pct()
                .total_cmp(&a.win_pct())
                .then(b.wins.cmp(&a.wins))
                .then(a_id.cmp(b_id))
        });
        table
    }

    /// League baselines over every rostered player.
    pub fn league_averages(&self) -> LeagueAverages {
        let players: Vec<Player> = self
            .teams
            .values()
            .flat_map(|t| t.players.iter().cloned())
            .collect();
        LeagueAverages::from_players(&players)
    }

    /// Merge a finished day: fatigue deltas, season lines and standings,
    /// then one day of recovery for everybody. Nothing is written when an
    /// outcome names a team the store does not know.
    pub fn apply_day(&mut self, outcomes: &[GameOutcome], fatigue: &FatigueConfig) -> Result<()> {
        for outcome in outcomes {
            for side in [Side::Home, Side::Away] {
                let team = outcome.result.team(side);
                if !self.teams.contains_key(team) {
                    return Err(GameError::UnknownTeam(team.to_string()));
                }
            }
        }

        for outcome in outcomes {
            let result = &outcome.result;
            for side in [Side::Home, Side::Away] {
                let Some(record) = self.teams.get_mut(result.team(side)) else {
                    continue;
                };

                match result.winner() {
                    Some(winner) if winner == side => record.wins += 1,
                    Some(_) => record.losses += 1,
                    None => record.ties += 1,
                }

                // a batting pitcher shows up in both boxes
                let mut seen = HashSet::new();
                let lines = result
                    .details
                    .batting(side)
                    .iter()
                    .chain(result.details.pitching(side));
                for line in lines {
                    if seen.insert(line.player_id) {
                        record.season.entry(line.player_id).or_default().absorb(line);
                    }
                }
            }

            for delta in &outcome.fatigue {
                let Some(player) = self
                    .teams
                    .get_mut(&delta.team)
                    .and_then(|t| t.player_mut(delta.player_id))
                else {
                    debug!(team = %delta.team, player = %delta.player_id, "fatigue for unknown player");
                    continue;
                };
                player.fatigue += delta.delta;
                player.games_pitched += 1;
            }
        }

        for player in self.teams.values_mut().flat_map(|t| t.players.iter_mut()) {
            let recovery = if player.abilities.recovery > 0.0 {
                player.abilities.recovery
            } else {
                fatigue.daily_recovery
            };
            player.fatigue = recover(player.fatigue, recovery);
        }
        Ok(())
    }
}

impl RosterProvider for LeagueStore {
    fn roster(&self, team: &TeamId) -> Vec<Player> {
        self.teams
            .get(team)
            .map(|t| t.players.clone())
            .unwrap_or_default()
    }
}

/// Auto-play `days` days of round-robin games starting at `start`, merging
/// each day before the next one is scheduled.
pub fn simulate_days<L>(
    sim: &SimulationContext,
    store: &mut LeagueStore,
    lineups: &L,
    start: NaiveDate,
    season: u16,
    days: u32,
    seed: u64,
) -> Result<Vec<GameOutcome>>
where
    L: LineupProvider + Sync,
{
    let teams = store.team_ids();
    let mut all = Vec::new();

    for day_index in 0..days {
        let date = start
            .checked_add_days(Days::new(u64::from(day_index)))
            .ok_or_else(|| GameError::InvalidRequest(format!("date overflow after {start}")))?;
        let day = LeagueDay {
            date,
            season,
            matchups: round_robin(&teams, day_index as usize),
        };
        let day_seed = game_seed(seed ^ u64::from(day_index).rotate_left(32), 0);

        let outcomes = simulate_day(sim, &*store, lineups, &day, day_seed);
        store.apply_day(&outcomes, &sim.config.fatigue)?;
        all.extend(outcomes);
    }

    info!(days, games = all.len(), "autoplay finished");
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::lineup::DefaultLineupProvider;
    use crate::models::{PitcherRole, Position};

    fn roster(base: u32) -> Vec<Player> {
        let mut players: Vec<Player> = Position::FIELDERS
            .iter()
            .enumerate()
            .map(|(i, pos)| {
                let id = base + i as u32;
                let mut p = Player::new(id, format!("F{id}"), *pos);
                p.abilities.contact = 11.0;
                p.abilities.power = 10.0;
                p.abilities.speed = 10.0;
                p.abilities.fielding = 10.0;
                p.abilities.arm = 10.0;
                p
            })
            .collect();
        for (i, role) in [PitcherRole::Starter, PitcherRole::Reliever, PitcherRole::Closer]
            .into_iter()
            .enumerate()
        {
            let id = base + 20 + i as u32;
            let mut p = Player::new(id, format!("P{id}"), Position::Pitcher);
            p.pitcher_role = Some(role);
            p.abilities.control = 10.0;
            p.abilities.stamina = if role == PitcherRole::Starter { 12.0 } else { 7.0 };
            p.abilities.velocity = 145.0;
            players.push(p);
        }
        players
    }

    fn store(teams: &[&str]) -> LeagueStore {
        let mut store = LeagueStore::new();
        for (i, name) in teams.iter().enumerate() {
            store.insert_team(TeamId::new(*name), roster(100 * (i as u32 + 1)));
        }
        store
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 2).unwrap()
    }

    #[test]
    fn test_round_robin_pairs_every_team_once_per_round() {
        let teams: Vec<TeamId> = ["a", "b", "c", "d"].iter().map(|t| TeamId::new(*t)).collect();
        let mut pairs = HashSet::new();
        for round in 0..3 {
            let day = round_robin(&teams, round);
            assert_eq!(day.len(), 2);
            let mut playing: Vec<&TeamId> =
                day.iter().flat_map(|m| [&m.home, &m.away]).collect();
            playing.sort();
            playing.dedup();
            assert_eq!(playing.len(), 4);
            for m in &day {
                let mut pair = [m.home.clone(), m.away.clone()];
                pair.sort();
                pairs.insert(pair);
            }
        }
        // 4 teams, 3 rounds: every pairing exactly once
        assert_eq!(pairs.len(), 6);
    }

    #[test]
    fn test_round_robin_odd_count_has_bye() {
        let teams: Vec<TeamId> = ["a", "b", "c"].iter().map(|t| TeamId::new(*t)).collect();
        assert_eq!(round_robin(&teams, 0).len(), 1);
        assert!(round_robin(&teams[..1], 0).is_empty());
    }

    #[test]
    fn test_simulate_day_is_deterministic_and_ordered() {
        let sim = SimulationContext::default();
        let store = store(&["a", "b", "c", "d"]);
        let day = LeagueDay {
            date: date(),
            season: 2024,
            matchups: round_robin(&store.team_ids(), 0),
        };

        let first = simulate_day(&sim, &store, &DefaultLineupProvider, &day, 7);
        let second = simulate_day(&sim, &store, &DefaultLineupProvider, &day, 7);
        assert_eq!(first, second);
        for (outcome, matchup) in first.iter().zip(&day.matchups) {
            assert_eq!(outcome.result.home_team, matchup.home);
            assert_eq!(outcome.result.away_team, matchup.away);
        }
    }

    #[test]
    fn test_apply_day_updates_standings_and_fatigue() {
        let sim = SimulationContext::default();
        let mut store = store(&["a", "b"]);
        let day = LeagueDay {
            date: date(),
            season: 2024,
            matchups: vec![Matchup {
                home: TeamId::new("a"),
                away: TeamId::new("b"),
            }],
        };
        let outcomes = simulate_day(&sim, &store, &DefaultLineupProvider, &day, 99);
        store.apply_day(&outcomes, &sim.config.fatigue).unwrap();

        let a = store.team(&TeamId::new("a")).unwrap();
        let b = store.team(&TeamId::new("b")).unwrap();
        assert_eq!(a.wins + a.losses + a.ties, 1);
        assert_eq!(a.wins, b.losses);
        assert_eq!(a.ties, b.ties);

        // every pitcher who appeared got a game pitched
        for delta in &outcomes[0].fatigue {
            let team = store.team(&delta.team).unwrap();
            let player = team.players.iter().find(|p| p.id == delta.player_id).unwrap();
            assert_eq!(player.games_pitched, 1);
            let season = team.season.get(&delta.player_id).unwrap();
            assert_eq!(season.games_pitched, 1);
        }
    }

    #[test]
    fn test_apply_day_recovers_fatigue() {
        let mut store = store(&["a"]);
        let id = TeamId::new("a");
        let cfg = FatigueConfig::default();
        if let Some(record) = store.teams.get_mut(&id) {
            record.players[0].fatigue = 10.0;
            record.players[1].fatigue = 2.0;
            record.players[2].fatigue = 10.0;
            record.players[2].abilities.recovery = 5.0;
        }
        store.apply_day(&[], &cfg).unwrap();

        let players = &store.team(&id).unwrap().players;
        assert_eq!(players[0].fatigue, 7.0);
        assert_eq!(players[1].fatigue, 0.0);
        assert_eq!(players[2].fatigue, 5.0);
    }

    #[test]
    fn test_apply_day_rejects_unknown_team() {
        let sim = SimulationContext::default();
        let mut full = store(&["a", "b"]);
        let day = LeagueDay {
            date: date(),
            season: 2024,
            matchups: vec![Matchup {
                home: TeamId::new("a"),
                away: TeamId::new("b"),
            }],
        };
        let outcomes = simulate_day(&sim, &full, &DefaultLineupProvider, &day, 1);
        full.apply_day(&outcomes, &sim.config.fatigue).unwrap();

        let mut partial = store(&["a"]);
        let err = partial.apply_day(&outcomes, &sim.config.fatigue).unwrap_err();
        assert!(matches!(err, GameError::UnknownTeam(ref t) if t == "b"));
        let a = partial.team(&TeamId::new("a")).unwrap();
        assert_eq!(a.wins + a.losses + a.ties, 0);
    }

    #[test]
    fn test_simulate_days_plays_full_schedule() {
        let sim = SimulationContext::default();
        let mut store = store(&["a", "b", "c", "d"]);
        let outcomes =
            simulate_days(&sim, &mut store, &DefaultLineupProvider, date(), 2024, 3, 42).unwrap();
        assert_eq!(outcomes.len(), 6);

        let games: u32 = store
            .standings()
            .iter()
            .map(|(_, r)| r.wins + r.losses + r.ties)
            .sum();
        assert_eq!(games, 12);
        assert_eq!(outcomes[2].result.date, date().succ_opt().unwrap());
    }
}
