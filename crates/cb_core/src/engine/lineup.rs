//! Roster normalisation and starting lineups
//!
//! A game never fails for lack of players: rosters are cleaned and padded
//! with synthetic fillers, and a lineup that cannot be used as given is
//! rebuilt by [`DefaultLineupProvider`].

use super::pitching::rotation;
use super::pitching::rotation_slot;
use crate::models::{LineupSlot, Player, PlayerId, Position, StartingLineup, TeamId};
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::warn;

/// Batting order length
pub const LINEUP_SIZE: usize = 9;
/// Starters at or above this fatigue are skipped when anyone fresher exists.
const STARTER_REST_THRESHOLD: f32 = 5.0;

// ============================================================================
// Providers
// ============================================================================

/// Source of a team's players.
pub trait RosterProvider {
    fn roster(&self, team: &TeamId) -> Vec<Player>;
}

/// Chooses a starting lineup and pitcher for a game day.
pub trait LineupProvider {
    fn starting_lineup(
        &self,
        team: &TeamId,
        roster: &[Player],
        date: NaiveDate,
    ) -> Option<StartingLineup>;
}

/// Rotation-aware starter plus greedy fielders and batting order, DH used.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLineupProvider;

impl LineupProvider for DefaultLineupProvider {
    fn starting_lineup(
        &self,
        _team: &TeamId,
        roster: &[Player],
        date: NaiveDate,
    ) -> Option<StartingLineup> {
        let pitcher = choose_starter(roster, date)?;
        let fielders: Vec<&Player> = roster
            .iter()
            .filter(|p| !p.is_pitcher() && p.id != pitcher.id)
            .collect();
        let starters = select_starters(&fielders);
        if starters.len() < LINEUP_SIZE {
            return None;
        }
        Some(StartingLineup {
            batters: batting_order(starters),
            pitcher: pitcher.id,
        })
    }
}

// ============================================================================
// Starter selection
// ============================================================================

fn is_starter_candidate(p: &Player) -> bool {
    if p.abilities.starter_aptitude > 0.0 {
        p.abilities.starter_aptitude >= 3.0 && p.abilities.stamina >= 8.0
    } else {
        p.abilities.stamina >= 10.0
    }
}

/// 선발 투수 선택: rotation, then rested candidates, then least fatigued.
pub fn choose_starter(roster: &[Player], date: NaiveDate) -> Option<&Player> {
    if let Some(slot) = rotation_slot(date) {
        let rotation = rotation(roster);
        if let Some(p) = rotation.get(slot) {
            if p.fatigue < STARTER_REST_THRESHOLD {
                return Some(*p);
            }
        }
    }

    let pitchers: Vec<&Player> = roster.iter().filter(|p| p.is_pitcher()).collect();
    let starters: Vec<&Player> = pitchers
        .iter()
        .copied()
        .filter(|p| is_starter_candidate(p))
        .collect();
    let candidates = if starters.is_empty() { pitchers } else { starters };

    let mut rested: Vec<&Player> = candidates
        .iter()
        .copied()
        .filter(|p| p.fatigue < STARTER_REST_THRESHOLD)
        .collect();
    if !rested.is_empty() {
        // fatigue within a 2-point band counts as equal
        rested.sort_by(|a, b| {
            (a.fatigue / 2.0)
                .floor()
                .total_cmp(&(b.fatigue / 2.0).floor())
                .then(b.abilities.starter_aptitude.total_cmp(&a.abilities.starter_aptitude))
                .then(arm_score(b).total_cmp(&arm_score(a)))
        });
        return rested.first().copied();
    }

    candidates
        .into_iter()
        .min_by(|a, b| a.fatigue.total_cmp(&b.fatigue))
}

fn arm_score(p: &Player) -> f32 {
    p.abilities.control + p.abilities.stamina + p.abilities.velocity
}

// ============================================================================
// Fielders
// ============================================================================

fn fielder_score(p: &Player, position: Position) -> f32 {
    let aptitude = p.aptitude_at(position);
    let defense = p.abilities.fielding + p.abilities.arm * 0.5;
    let penalty = if aptitude < 3.0 {
        (3.0 - aptitude) * 10.0
    } else {
        0.0
    };
    aptitude * 2.0 + defense - penalty + p.abilities.batting_score() * 0.15
}

/// Best glove per position, then the best remaining bat as DH.
pub fn select_starters<'a>(fielders: &[&'a Player]) -> Vec<(Position, &'a Player)> {
    let mut chosen: Vec<(Position, &'a Player)> = Vec::with_capacity(LINEUP_SIZE);
    let mut taken: HashSet<PlayerId> = HashSet::new();

    for position in Position::FIELDERS {
        let best = fielders
            .iter()
            .copied()
            .filter(|p| !taken.contains(&p.id))
            .max_by(|a, b| fielder_score(a, position).total_cmp(&fielder_score(b, position)));
        if let Some(p) = best {
            taken.insert(p.id);
            chosen.push((position, p));
        }
    }

    let dh = fielders
        .iter()
        .copied()
        .filter(|p| !taken.contains(&p.id))
        .max_by(|a, b| {
            a.abilities
                .batting_score()
                .total_cmp(&b.abilities.batting_score())
        });
    if let Some(p) = dh {
        chosen.push((Position::DesignatedHitter, p));
    }
    chosen
}

// ============================================================================
// Batting order
// ============================================================================

/// 타순별 점수 (1번: 출루+발, 4번: 장타, ...)
pub fn batting_slot_score(p: &Player, slot: usize) -> f32 {
    let a = &p.abilities;
    let (contact, eye, power, speed) = (a.contact, a.eye, a.power, a.speed);
    match slot {
        1 => (contact * 2.0 + eye + speed * 2.0) * 1.5,
        2 => (contact * 1.5 + eye * 1.5 + speed + a.bunt) * 1.5,
        3 => (contact - 3.0) * 8.0 + eye + power * 3.0,
        4 => (contact * 2.0 + power * 3.0) * 2.0 + eye / 5.0 - speed,
        5 => (contact + eye / 3.0 + power * 2.0) * 2.0,
        6 => (contact + eye / 3.0 + power) * 2.0,
        7 => (contact + eye / 3.0 + power) * 2.0 - 1.0,
        8 => (contact + eye / 3.0 + power) * 2.0 - 2.0,
        _ => contact + eye + power + speed,
    }
}

/// Fill slots 1..9 in turn with the best remaining scorer for that slot.
pub fn batting_order(starters: Vec<(Position, &Player)>) -> Vec<LineupSlot> {
    let mut remaining = starters;
    let mut order = Vec::with_capacity(remaining.len());
    for slot in 1..=LINEUP_SIZE {
        let best = remaining
            .iter()
            .enumerate()
            .max_by(|(ia, (_, a)), (ib, (_, b))| {
                batting_slot_score(a, slot)
                    .total_cmp(&batting_slot_score(b, slot))
                    // earliest wins ties
                    .then(ib.cmp(ia))
            })
            .map(|(i, _)| i);
        let Some(i) = best else { break };
        let (position, player) = remaining.remove(i);
        order.push(LineupSlot {
            player_id: player.id,
            position,
        });
    }
    order
}

// ============================================================================
// Normalisation
// ============================================================================

fn synthetic_player(id: u32, position: Position) -> Player {
    let mut p = Player::new(id, format!("Player {id}"), position);
    if position.is_pitcher() {
        p.name = format!("Pitcher {id}");
    }
    p
}

/// Smallest unused id above `after`, wrapping to the low end once ids run out.
fn free_id(players: &[Player], after: u32) -> u32 {
    let taken = |id: u32| players.iter().any(|p| p.id.0 == id);
    (after.saturating_add(1)..=u32::MAX)
        .chain(1..=after)
        .find(|&id| !taken(id))
        .unwrap_or(after)
}

/// Clean a roster for play.
///
/// Drops duplicate ids, zeroes bad ratings, keeps only active players when
/// enough of them (9, including a pitcher) are available, and pads with
/// synthetic players until there is a pitcher and nine position players.
pub fn prepare_roster(team: &TeamId, roster: &[Player]) -> Vec<Player> {
    let mut seen = HashSet::new();
    let mut players: Vec<Player> = roster
        .iter()
        .filter(|p| seen.insert(p.id))
        .cloned()
        .map(|mut p| {
            p.sanitize();
            p
        })
        .collect();

    let active: Vec<Player> = players.iter().filter(|p| p.is_active()).cloned().collect();
    if active.len() >= LINEUP_SIZE && active.iter().any(Player::is_pitcher) {
        players = active;
    }

    let was_empty = players.is_empty();

    let mut last_id = players.iter().map(|p| p.id.0).max().unwrap_or(0);
    let mut fielders = players.iter().filter(|p| !p.is_pitcher()).count();
    let mut padded = 0;
    while fielders < LINEUP_SIZE {
        let position = Position::FIELDERS
            .get(fielders)
            .copied()
            .unwrap_or(Position::Unknown);
        last_id = free_id(&players, last_id);
        players.push(synthetic_player(last_id, position));
        fielders += 1;
        padded += 1;
    }
    if !players.iter().any(Player::is_pitcher) {
        let id = free_id(&players, last_id);
        players.push(synthetic_player(id, Position::Pitcher));
        padded += 1;
    }
    if was_empty {
        warn!(team = %team, "empty roster, using a synthetic one");
    } else if padded > 0 {
        warn!(team = %team, padded, "roster padded with synthetic players");
    }
    players
}

/// Check a supplied lineup against the prepared roster.
fn is_playable(lineup: &StartingLineup, roster: &[Player]) -> bool {
    let ids: HashSet<PlayerId> = roster.iter().map(|p| p.id).collect();
    let batters: HashSet<PlayerId> = lineup.batters.iter().map(|s| s.player_id).collect();
    let pitcher_slots: Vec<&LineupSlot> = lineup
        .batters
        .iter()
        .filter(|s| s.position == Position::Pitcher)
        .collect();

    lineup.batters.len() == LINEUP_SIZE
        && batters.len() == LINEUP_SIZE
        && batters.iter().all(|id| ids.contains(id))
        && ids.contains(&lineup.pitcher)
        && pitcher_slots.len() <= 1
        && pitcher_slots.iter().all(|s| s.player_id == lineup.pitcher)
        // without a pitcher slot the starter must not also be a batter
        && (!pitcher_slots.is_empty() || !batters.contains(&lineup.pitcher))
}

/// Use the supplied lineup when it is playable, otherwise build one.
pub fn resolve_lineup(
    team: &TeamId,
    roster: &[Player],
    supplied: Option<&StartingLineup>,
    date: NaiveDate,
    provider: &dyn LineupProvider,
) -> StartingLineup {
    if let Some(lineup) = supplied {
        if is_playable(lineup, roster) {
            return lineup.clone();
        }
        warn!(team = %team, "supplied lineup is not playable, rebuilding");
    }

    if let Some(lineup) = provider.starting_lineup(team, roster, date) {
        if is_playable(&lineup, roster) {
            return lineup;
        }
    }
    if let Some(lineup) = DefaultLineupProvider.starting_lineup(team, roster, date) {
        return lineup;
    }

    // Unreachable for a prepared roster; keep the game going anyway.
    warn!(team = %team, "no lineup could be built, batting in roster order");
    let pitcher = roster
        .iter()
        .find(|p| p.is_pitcher())
        .or_else(|| roster.first())
        .map(|p| p.id)
        .unwrap_or_default();
    StartingLineup {
        batters: roster
            .iter()
            .filter(|p| p.id != pitcher)
            .take(LINEUP_SIZE)
            .zip(Position::FIELDERS.iter().chain(std::iter::once(&Position::DesignatedHitter)))
            .map(|(p, position)| LineupSlot {
                player_id: p.id,
                position: *position,
            })
            .collect(),
        pitcher,
    }
}
