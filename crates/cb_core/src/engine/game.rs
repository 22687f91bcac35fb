//! Game Simulation Engine
//!
//! Drives one game from first pitch to final out:
//!
//! - roster normalisation and lineup resolution (`lineup.rs`)
//! - 9+ innings of half-innings (`half_inning.rs`), with the bottom of the
//!   9th skipped when the home side already leads and a walk-off ending the
//!   game as soon as the home side goes ahead in the 9th or later
//! - pitchers of record, achievements and MVP (`decisions.rs`)
//! - box score and post-game fatigue
//!
//! ## Determinism
//!
//! Every random draw comes from the engine's own `R: Rng`. [`GameEngine::new`]
//! seeds a `ChaCha8Rng` from `GamePlan::seed`, so equal plans give identical
//! results, game id included.

use super::context::{GameSimulationContext, SimulationContext};
use super::decisions::{self, Lead, LeadTracker, Staff};
use super::lineup::{self, DefaultLineupProvider, LineupProvider};
use super::pitching::fatigue_delta;
use super::stats;
use crate::models::{
    FatigueDelta, GameDetails, GameOutcome, GameResult, LineScore, LineupSlot, Player,
    PlayerGameStats, PlayerId, Position, Side, StartingLineup, TeamId, TeamSheet, UNPLAYED_HALF,
};
use chrono::NaiveDate;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;
use uuid::{Builder, Uuid};

/// Regulation length
pub const REGULATION_INNINGS: u8 = 9;

/// Everything needed to play one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamePlan {
    pub seed: u64,
    pub date: NaiveDate,
    #[serde(default)]
    pub season: u16,
    pub home: TeamSheet,
    pub away: TeamSheet,
}

// ============================================================================
// Team state
// ============================================================================

/// One side's in-game state. `stats` runs parallel to `roster`.
#[derive(Debug, Clone)]
pub(crate) struct TeamState {
    pub side: Side,
    pub team: TeamId,
    pub roster: Vec<Player>,
    index: HashMap<PlayerId, usize>,
    pub stats: Vec<PlayerGameStats>,
    /// Batting order; each slot also carries its defensive position
    pub lineup: Vec<LineupSlot>,
    /// Pitcher on the mound
    pub pitcher: PlayerId,
    pub game_starter: PlayerId,
    /// Lineup index of the next batter
    pub next_batter: usize,
    pub pitchers_used: u8,
    /// The pitcher's batting slot was taken by a pinch hitter or runner;
    /// a new pitcher is due at the next defensive half.
    pub pitcher_lifted: bool,
}

impl TeamState {
    pub fn new(side: Side, team: TeamId, roster: Vec<Player>, lineup: StartingLineup) -> Self {
        let index = roster.iter().enumerate().map(|(i, p)| (p.id, i)).collect();
        let stats = roster.iter().map(PlayerGameStats::new).collect();
        let mut state = Self {
            side,
            team,
            roster,
            index,
            stats,
            lineup: lineup.batters,
            pitcher: lineup.pitcher,
            game_starter: lineup.pitcher,
            next_batter: 0,
            pitchers_used: 1,
            pitcher_lifted: false,
        };

        for (i, slot) in state.lineup.clone().iter().enumerate() {
            if let Some(line) = state.line_mut(slot.player_id) {
                line.order = Some(i as u8 + 1);
                line.position = slot.position;
                line.is_starter = true;
            }
        }
        if let Some(line) = state.line_mut(lineup.pitcher) {
            line.pitching_order = Some(1);
            line.is_starting_pitcher = true;
            line.is_starter = true;
            line.position = Position::Pitcher;
        }
        state
    }

    pub fn index_of(&self, id: PlayerId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.index_of(id).map(|i| &self.roster[i])
    }

    pub fn line(&self, id: PlayerId) -> Option<&PlayerGameStats> {
        self.index_of(id).map(|i| &self.stats[i])
    }

    pub fn line_mut(&mut self, id: PlayerId) -> Option<&mut PlayerGameStats> {
        let i = self.index_of(id)?;
        self.stats.get_mut(i)
    }

    pub fn current_pitcher(&self) -> Option<&Player> {
        self.player(self.pitcher)
    }

    pub fn pitcher_slot(&self) -> Option<usize> {
        self.lineup.iter().position(|s| s.position.is_pitcher())
    }

    /// Whoever currently plays `position` in the field.
    pub fn fielder(&self, position: Position) -> Option<&Player> {
        if position.is_pitcher() {
            return self.current_pitcher();
        }
        self.lineup
            .iter()
            .find(|s| s.position == position)
            .and_then(|s| self.player(s.player_id))
    }

    /// Fielders by position; the pitcher is always the one on the mound.
    pub fn alignment(&self) -> Vec<(Position, PlayerId)> {
        let mut alignment: Vec<(Position, PlayerId)> = self
            .lineup
            .iter()
            .filter(|s| s.position.is_defensive() && !s.position.is_pitcher())
            .map(|s| (s.position, s.player_id))
            .collect();
        alignment.push((Position::Pitcher, self.pitcher));
        alignment
    }

    /// Players who have not appeared yet.
    pub fn bench<'t>(&'t self, game: &GameSimulationContext) -> Vec<&'t Player> {
        self.roster
            .iter()
            .filter(|p| !game.is_used(self.side, p.id))
            .collect()
    }

    /// Put `incoming` into batting slot `slot`; returns who left.
    pub fn replace_in_slot(
        &mut self,
        slot: usize,
        incoming: PlayerId,
        label: Position,
    ) -> PlayerId {
        let outgoing = self.lineup[slot].player_id;
        self.lineup[slot].player_id = incoming;
        if let Some(line) = self.line_mut(incoming) {
            line.order = Some(slot as u8 + 1);
            line.position = label;
        }
        outgoing
    }

    /// New pitcher takes the mound and, without a DH, the pitcher's slot.
    pub fn bring_in_pitcher(&mut self, incoming: PlayerId) {
        self.pitchers_used += 1;
        self.pitcher = incoming;
        self.pitcher_lifted = false;
        if let Some(slot) = self.pitcher_slot() {
            self.replace_in_slot(slot, incoming, Position::Pitcher);
        }
        let order = self.pitchers_used;
        if let Some(line) = self.line_mut(incoming) {
            line.pitching_order = Some(order);
        }
    }

    pub fn staff(&self) -> Staff<'_> {
        Staff {
            game_starter: self.game_starter,
            finisher: self.pitcher,
            lines: &self.stats,
        }
    }
}

pub(crate) fn split_teams(
    teams: &mut [TeamState; 2],
    batting: Side,
) -> (&mut TeamState, &mut TeamState) {
    let [away, home] = teams;
    match batting {
        Side::Away => (away, home),
        Side::Home => (home, away),
    }
}

fn prepare_team(
    side: Side,
    sheet: TeamSheet,
    date: NaiveDate,
    provider: &dyn LineupProvider,
) -> TeamState {
    let roster = lineup::prepare_roster(&sheet.team, &sheet.roster);
    let lineup =
        lineup::resolve_lineup(&sheet.team, &roster, sheet.lineup.as_ref(), date, provider);
    TeamState::new(side, sheet.team, roster, lineup)
}

// ============================================================================
// Engine
// ============================================================================

pub struct GameEngine<'a, R: Rng = ChaCha8Rng> {
    pub(crate) sim: &'a SimulationContext,
    pub(crate) rng: R,
    pub(crate) date: NaiveDate,
    pub(crate) season: u16,
    pub(crate) teams: [TeamState; 2],
    pub(crate) game: GameSimulationContext,
    pub(crate) line_score: LineScore,
    pub(crate) lead: LeadTracker,
}

impl<'a> GameEngine<'a, ChaCha8Rng> {
    pub fn new(plan: GamePlan, sim: &'a SimulationContext) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(plan.seed);
        Self::with_rng(plan, sim, rng)
    }
}

impl<'a, R: Rng> GameEngine<'a, R> {
    pub fn with_rng(plan: GamePlan, sim: &'a SimulationContext, rng: R) -> Self {
        Self::with_provider(plan, sim, rng, &DefaultLineupProvider)
    }

    /// Missing or unplayable lineups are filled in by `provider`.
    pub fn with_provider(
        plan: GamePlan,
        sim: &'a SimulationContext,
        rng: R,
        provider: &dyn LineupProvider,
    ) -> Self {
        let away = prepare_team(Side::Away, plan.away, plan.date, provider);
        let home = prepare_team(Side::Home, plan.home, plan.date, provider);

        let mut game = GameSimulationContext::new();
        for team in [&away, &home] {
            for slot in &team.lineup {
                game.mark_used(team.side, slot.player_id);
            }
            game.mark_used(team.side, team.pitcher);
        }

        Self {
            sim,
            rng,
            date: plan.date,
            season: plan.season,
            teams: [away, home],
            game,
            line_score: LineScore::default(),
            lead: LeadTracker::default(),
        }
    }

    pub fn simulate(mut self) -> GameOutcome {
        let id = Builder::from_random_bytes(self.rng.gen()).into_uuid();
        self.play_innings();
        self.finish(id)
    }

    fn play_innings(&mut self) {
        let max_innings = self.sim.config.max_innings.max(REGULATION_INNINGS);
        for inning in 1..=max_innings {
            if inning > REGULATION_INNINGS && self.game.lead(Side::Home) != 0 {
                break;
            }
            self.game.inning = inning;

            self.game.batting = Side::Away;
            let runs = self.play_half();
            self.line_score.away.push(half_runs(runs));
            self.update_lead();

            if inning >= REGULATION_INNINGS && self.game.lead(Side::Home) > 0 {
                self.line_score.home.push(UNPLAYED_HALF);
                break;
            }

            self.game.batting = Side::Home;
            let runs = self.play_half();
            self.line_score.home.push(half_runs(runs));
            self.update_lead();

            if inning >= REGULATION_INNINGS && self.game.lead(Side::Home) > 0 {
                break;
            }
        }
    }

    fn update_lead(&mut self) {
        let [away, home] = &self.teams;
        self.lead.update(
            self.game.score(Side::Home),
            self.game.score(Side::Away),
            home.pitcher,
            away.pitcher,
        );
    }

    fn finish(mut self, id: Uuid) -> GameOutcome {
        let home_score = self.game.score(Side::Home);
        let away_score = self.game.score(Side::Away);

        let decision = {
            let [away, home] = &self.teams;
            decisions::assign_decisions(
                &self.lead,
                home.staff(),
                away.staff(),
                home_score,
                away_score,
            )
        };
        for side in [Side::Away, Side::Home] {
            let runs_allowed = self.game.score(side.opponent());
            let team = &mut self.teams[side.index()];
            decisions::record_decisions(&decision, &mut team.stats);
            decisions::record_achievements(
                &mut team.stats,
                team.game_starter,
                team.pitchers_used as usize,
                runs_allowed,
            );
        }

        let mvp = Lead::of(home_score, away_score).side().and_then(|side| {
            let team = &self.teams[side.index()];
            let pitcher = decision.winning_pitcher.and_then(|id| team.line(id));
            decisions::choose_mvp(&team.stats, pitcher)
        });

        let cfg = &self.sim.config;
        let mut fatigue = Vec::new();
        for team in &self.teams {
            for (player, line) in team.roster.iter().zip(&team.stats) {
                if line.pitched() {
                    fatigue.push(FatigueDelta {
                        team: team.team.clone(),
                        player_id: player.id,
                        delta: fatigue_delta(
                            player,
                            line,
                            player.id == team.game_starter,
                            &cfg.pitching,
                            &cfg.fatigue,
                        ),
                    });
                }
            }
        }

        let [away, home] = self.teams;
        info!(
            away = %away.team,
            home = %home.team,
            away_score,
            home_score,
            "game final"
        );

        let innings = self.line_score.away.len() as u8;
        let result = GameResult {
            id,
            date: self.date,
            season: self.season,
            home_team: home.team,
            away_team: away.team,
            home_score,
            away_score,
            innings,
            line_score: self.line_score,
            decision,
            mvp,
            details: GameDetails {
                home_batting: stats::batting_box(&home.stats),
                away_batting: stats::batting_box(&away.stats),
                home_pitching: stats::pitching_box(&home.stats),
                away_pitching: stats::pitching_box(&away.stats),
            },
        };
        GameOutcome { result, fatigue }
    }
}

fn half_runs(runs: u32) -> i16 {
    i16::try_from(runs).unwrap_or(i16::MAX)
}
