//! Box score assembly and team totals

use crate::models::{GameDetails, PlayNotation, PlayerGameStats, Side};
use serde::{Deserialize, Serialize};

/// Everyone who batted or held a lineup slot, in batting order. Starters
/// come before their substitutes.
pub fn batting_box(lines: &[PlayerGameStats]) -> Vec<PlayerGameStats> {
    let mut batting: Vec<PlayerGameStats> = lines.iter().filter(|s| s.batted()).cloned().collect();
    batting.sort_by_key(|s| (s.order.unwrap_or(u8::MAX), !s.is_starter));
    batting
}

/// Everyone who faced a batter or recorded an out, in order of appearance.
pub fn pitching_box(lines: &[PlayerGameStats]) -> Vec<PlayerGameStats> {
    let mut pitching: Vec<PlayerGameStats> =
        lines.iter().filter(|s| s.pitched()).cloned().collect();
    pitching.sort_by_key(|s| s.pitching_order.unwrap_or(u8::MAX));
    pitching
}

/// Team line: R / H / E plus a few counting stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamTotals {
    pub runs: u32,
    pub hits: u32,
    pub errors: u32,
    pub home_runs: u32,
    pub walks: u32,
    pub strikeouts: u32,
    pub stolen_bases: u32,
    pub left_on_base: u32,
}

impl TeamTotals {
    /// Totals for one side of a finished game. Errors are summed over
    /// batters and pitchers without counting anyone twice.
    pub fn of(details: &GameDetails, side: Side) -> Self {
        let batting = details.batting(side);
        let pitching = details.pitching(side);

        let mut totals = TeamTotals::default();
        for line in batting {
            totals.runs += line.runs;
            totals.hits += line.hits;
            totals.home_runs += line.home_runs;
            totals.walks += line.walks + line.hit_by_pitch;
            totals.strikeouts += line.strikeouts;
            totals.stolen_bases += line.stolen_bases;
            totals.errors += line.errors;
        }
        totals.errors += pitching
            .iter()
            .filter(|p| batting.iter().all(|b| b.player_id != p.player_id))
            .map(|p| p.errors)
            .sum::<u32>();

        // reached safely minus scored minus erased on the bases
        let reached: u32 = batting
            .iter()
            .map(|l| {
                l.hits + l.walks + l.hit_by_pitch
                    + l.at_bat_details
                        .iter()
                        .filter(|d| d.notation == PlayNotation::ReachedOnError)
                        .count() as u32
            })
            .sum();
        let erased: u32 = batting
            .iter()
            .map(|l| l.caught_stealing + l.double_plays)
            .sum();
        totals.left_on_base = reached.saturating_sub(totals.runs + erased);
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerId;

    fn line(id: u32) -> PlayerGameStats {
        PlayerGameStats {
            player_id: PlayerId(id),
            ..Default::default()
        }
    }

    #[test]
    fn test_batting_box_filters_and_orders() {
        let mut starter = line(1);
        starter.order = Some(2);
        starter.is_starter = true;
        starter.plate_appearances = 3;
        let mut sub = line(2);
        sub.order = Some(2);
        let mut leadoff = line(3);
        leadoff.order = Some(1);
        leadoff.is_starter = true;
        let bench = line(4);

        let ids: Vec<u32> = batting_box(&[sub, starter, bench, leadoff])
            .iter()
            .map(|s| s.player_id.0)
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_pitching_box_uses_appearance_order() {
        let mut closer = line(1);
        closer.pitching_order = Some(3);
        closer.batters_faced = 3;
        let mut starter = line(2);
        starter.pitching_order = Some(1);
        starter.outs_recorded = 18;
        let mut unused = line(3);
        unused.pitching_order = None;

        let ids: Vec<u32> = pitching_box(&[closer, unused, starter])
            .iter()
            .map(|s| s.player_id.0)
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_team_totals_count_pitcher_errors_once() {
        let mut hitter = line(1);
        hitter.order = Some(1);
        hitter.hits = 2;
        hitter.runs = 1;
        hitter.walks = 1;
        hitter.errors = 1;
        let mut pitcher = line(9);
        pitcher.outs_recorded = 27;
        pitcher.errors = 1;

        let details = GameDetails {
            home_batting: vec![hitter],
            home_pitching: vec![pitcher],
            ..Default::default()
        };
        let totals = TeamTotals::of(&details, Side::Home);
        assert_eq!(totals.hits, 2);
        assert_eq!(totals.errors, 2);
        assert_eq!(totals.left_on_base, 2);
        assert_eq!(TeamTotals::of(&details, Side::Away), TeamTotals::default());
    }
}
