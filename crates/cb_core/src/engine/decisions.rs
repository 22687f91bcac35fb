//! Win / loss / save, pitcher achievements and MVP

use crate::models::{Decision, Mvp, PlayerGameStats, PlayerId, Side};

/// Outs a starter must record to qualify for the win (5 innings)
const STARTER_WIN_OUTS: u32 = 15;
const QUALITY_START_OUTS: u32 = 18;
const QUALITY_START_MAX_ER: u32 = 3;
/// Pitcher MVP: 7+ innings, at most one earned run
const MVP_PITCHER_OUTS: u32 = 21;
const MVP_PITCHER_MAX_ER: u32 = 1;

// ============================================================================
// Lead tracking
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lead {
    #[default]
    Tie,
    Home,
    Away,
}

impl Lead {
    pub fn of(home_score: u32, away_score: u32) -> Lead {
        match home_score.cmp(&away_score) {
            std::cmp::Ordering::Greater => Lead::Home,
            std::cmp::Ordering::Less => Lead::Away,
            std::cmp::Ordering::Equal => Lead::Tie,
        }
    }

    pub fn side(self) -> Option<Side> {
        match self {
            Lead::Home => Some(Side::Home),
            Lead::Away => Some(Side::Away),
            Lead::Tie => None,
        }
    }
}

/// Pitchers of record, re-evaluated after every half-inning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadTracker {
    lead: Lead,
    win_candidate: Option<PlayerId>,
    loss_candidate: Option<PlayerId>,
}

impl LeadTracker {
    pub fn lead(&self) -> Lead {
        self.lead
    }

    pub fn candidates(&self) -> (Option<PlayerId>, Option<PlayerId>) {
        (self.win_candidate, self.loss_candidate)
    }

    /// On a lead change the new leader's current pitcher becomes the win
    /// candidate and the pitcher who gave it up the loss candidate. A tie
    /// clears both.
    pub fn update(
        &mut self,
        home_score: u32,
        away_score: u32,
        home_pitcher: PlayerId,
        away_pitcher: PlayerId,
    ) {
        let lead = Lead::of(home_score, away_score);
        if lead == self.lead {
            return;
        }
        (self.win_candidate, self.loss_candidate) = match lead {
            Lead::Home => (Some(home_pitcher), Some(away_pitcher)),
            Lead::Away => (Some(away_pitcher), Some(home_pitcher)),
            Lead::Tie => (None, None),
        };
        self.lead = lead;
    }
}

// ============================================================================
// Decisions
// ============================================================================

/// One team's pitching as seen at the final out.
#[derive(Debug, Clone, Copy)]
pub struct Staff<'a> {
    pub game_starter: PlayerId,
    /// Pitcher on the mound at the end of the game
    pub finisher: PlayerId,
    pub lines: &'a [PlayerGameStats],
}

impl Staff<'_> {
    fn line(&self, id: PlayerId) -> Option<&PlayerGameStats> {
        self.lines.iter().find(|s| s.player_id == id)
    }
}

/// Assign win, loss and save. Nothing is assigned on a tie.
pub fn assign_decisions(
    tracker: &LeadTracker,
    home: Staff<'_>,
    away: Staff<'_>,
    home_score: u32,
    away_score: u32,
) -> Decision {
    let (Some(winner_side), (Some(mut winner), Some(loser))) =
        (tracker.lead().side(), tracker.candidates())
    else {
        return Decision::default();
    };
    let staff = match winner_side {
        Side::Home => home,
        Side::Away => away,
    };

    // A starter needs five innings; otherwise the next man in gets it.
    if winner == staff.game_starter {
        if let Some(line) = staff.line(winner) {
            if line.outs_recorded < STARTER_WIN_OUTS {
                let next_order = line.pitching_order.map(|o| o + 1);
                winner = staff
                    .lines
                    .iter()
                    .find(|s| s.pitching_order.is_some() && s.pitching_order == next_order)
                    .map(|s| s.player_id)
                    .unwrap_or(staff.finisher);
            }
        }
    }

    let mut save = None;
    if staff.finisher != winner {
        if let Some(line) = staff.line(staff.finisher) {
            let margin = home_score.abs_diff(away_score);
            if (margin <= 3 && line.outs_recorded >= 3) || line.outs_recorded >= 9 {
                save = Some(staff.finisher);
            }
        }
    }

    Decision {
        winning_pitcher: Some(winner),
        losing_pitcher: Some(loser),
        save_pitcher: save,
    }
}

/// Stamp W/L/S onto the stat lines of both staffs.
pub fn record_decisions(decision: &Decision, lines: &mut [PlayerGameStats]) {
    for line in lines.iter_mut() {
        if decision.winning_pitcher == Some(line.player_id) {
            line.wins = 1;
        }
        if decision.losing_pitcher == Some(line.player_id) {
            line.losses = 1;
        }
        if decision.save_pitcher == Some(line.player_id) {
            line.saves = 1;
        }
    }
}

// ============================================================================
// Achievements
// ============================================================================

/// Complete game / shutout / quality start for a team's starter.
///
/// A complete game means the starter was the team's only pitcher.
pub fn record_achievements(
    lines: &mut [PlayerGameStats],
    game_starter: PlayerId,
    pitchers_used: usize,
    runs_allowed: u32,
) {
    let Some(line) = lines.iter_mut().find(|s| s.player_id == game_starter) else {
        return;
    };
    if line.outs_recorded == 0 {
        return;
    }
    if pitchers_used == 1 {
        line.complete_game = true;
        line.shutout = runs_allowed == 0;
    }
    line.quality_start =
        line.outs_recorded >= QUALITY_START_OUTS && line.earned_runs <= QUALITY_START_MAX_ER;
}

// ============================================================================
// MVP
// ============================================================================

/// Batter game score: total bases + RBI + runs + steals + walks / 2
pub fn batter_game_score(line: &PlayerGameStats) -> f32 {
    (line.total_bases() + line.rbi + line.runs + line.stolen_bases) as f32
        + line.walks as f32 / 2.0
}

/// MVP from the winning side. A dominant winning pitcher takes it;
/// otherwise the top batter by game score.
pub fn choose_mvp(
    winning_batting: &[PlayerGameStats],
    winning_pitcher: Option<&PlayerGameStats>,
) -> Option<Mvp> {
    if let Some(p) = winning_pitcher {
        if p.outs_recorded >= MVP_PITCHER_OUTS && p.earned_runs <= MVP_PITCHER_MAX_ER {
            return Some(Mvp {
                player_id: p.player_id,
                name: p.name.clone(),
            });
        }
    }

    let mut best: Option<(&PlayerGameStats, f32)> = None;
    for line in winning_batting.iter().filter(|s| s.plate_appearances > 0) {
        let score = batter_game_score(line);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((line, score));
        }
    }
    best.map(|(line, _)| Mvp {
        player_id: line.player_id,
        name: line.name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pitcher_line(id: u32, order: u8, outs: u32) -> PlayerGameStats {
        PlayerGameStats {
            player_id: PlayerId(id),
            pitching_order: Some(order),
            outs_recorded: outs,
            batters_faced: outs + 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_tracker_follows_lead_changes() {
        let mut t = LeadTracker::default();
        t.update(0, 1, PlayerId(10), PlayerId(20));
        assert_eq!(t.candidates(), (Some(PlayerId(20)), Some(PlayerId(10))));
        // still away: unchanged even if pitchers changed
        t.update(0, 2, PlayerId(11), PlayerId(21));
        assert_eq!(t.candidates(), (Some(PlayerId(20)), Some(PlayerId(10))));
        t.update(2, 2, PlayerId(11), PlayerId(21));
        assert_eq!(t.candidates(), (None, None));
        t.update(3, 2, PlayerId(12), PlayerId(22));
        assert_eq!(t.lead(), Lead::Home);
        assert_eq!(t.candidates(), (Some(PlayerId(12)), Some(PlayerId(22))));
    }

    #[test]
    fn test_no_decision_on_tie() {
        let t = LeadTracker::default();
        let lines = vec![pitcher_line(1, 1, 36)];
        let staff = Staff {
            game_starter: PlayerId(1),
            finisher: PlayerId(1),
            lines: &lines,
        };
        assert_eq!(assign_decisions(&t, staff, staff, 3, 3), Decision::default());
    }

    #[test]
    fn test_short_starter_passes_win_to_next_pitcher() {
        let mut t = LeadTracker::default();
        t.update(4, 0, PlayerId(1), PlayerId(9));
        let home = vec![
            pitcher_line(1, 1, 12),
            pitcher_line(2, 2, 9),
            pitcher_line(3, 3, 6),
        ];
        let away = vec![pitcher_line(9, 1, 24)];
        let decision = assign_decisions(
            &t,
            Staff {
                game_starter: PlayerId(1),
                finisher: PlayerId(3),
                lines: &home,
            },
            Staff {
                game_starter: PlayerId(9),
                finisher: PlayerId(9),
                lines: &away,
            },
            4,
            2,
        );
        assert_eq!(decision.winning_pitcher, Some(PlayerId(2)));
        assert_eq!(decision.losing_pitcher, Some(PlayerId(9)));
        // finisher: 2 innings, 2-run margin
        assert_eq!(decision.save_pitcher, Some(PlayerId(3)));
        assert_ne!(decision.save_pitcher, decision.winning_pitcher);
    }

    #[test]
    fn test_no_save_for_winner_or_blowout_short_stint() {
        let mut t = LeadTracker::default();
        t.update(0, 8, PlayerId(5), PlayerId(1));
        let away = vec![pitcher_line(1, 1, 24), pitcher_line(2, 2, 3)];
        let home = vec![pitcher_line(5, 1, 27)];
        let decision = assign_decisions(
            &t,
            Staff {
                game_starter: PlayerId(5),
                finisher: PlayerId(5),
                lines: &home,
            },
            Staff {
                game_starter: PlayerId(1),
                finisher: PlayerId(2),
                lines: &away,
            },
            0,
            8,
        );
        assert_eq!(decision.winning_pitcher, Some(PlayerId(1)));
        assert_eq!(decision.save_pitcher, None);
    }

    #[test]
    fn test_complete_game_shutout_and_quality_start() {
        let mut lines = vec![PlayerGameStats {
            player_id: PlayerId(1),
            outs_recorded: 27,
            earned_runs: 0,
            ..Default::default()
        }];
        record_achievements(&mut lines, PlayerId(1), 1, 0);
        assert!(lines[0].complete_game && lines[0].shutout && lines[0].quality_start);

        let mut lines = vec![PlayerGameStats {
            player_id: PlayerId(1),
            outs_recorded: 18,
            earned_runs: 4,
            ..Default::default()
        }];
        record_achievements(&mut lines, PlayerId(1), 3, 5);
        assert!(!lines[0].complete_game && !lines[0].shutout && !lines[0].quality_start);
    }

    #[test]
    fn test_mvp_prefers_dominant_pitcher_then_best_bat() {
        let bat = |id: u32, hits: u32, hr: u32, rbi: u32| PlayerGameStats {
            player_id: PlayerId(id),
            plate_appearances: 4,
            at_bats: 4,
            hits,
            home_runs: hr,
            rbi,
            ..Default::default()
        };
        let batting = vec![bat(1, 1, 0, 0), bat(2, 2, 1, 3)];
        let ace = PlayerGameStats {
            player_id: PlayerId(9),
            outs_recorded: 24,
            earned_runs: 1,
            ..Default::default()
        };
        assert_eq!(choose_mvp(&batting, Some(&ace)).map(|m| m.player_id), Some(PlayerId(9)));
        let tired = PlayerGameStats {
            outs_recorded: 15,
            ..ace
        };
        assert_eq!(choose_mvp(&batting, Some(&tired)).map(|m| m.player_id), Some(PlayerId(2)));
        assert_eq!(choose_mvp(&[], None), None);
    }
}
