use super::game_stats::{ratio, PlayerGameStats};
use serde::{Deserialize, Serialize};

/// Season totals for one player, merged game by game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonStats {
    pub games: u32,
    pub plate_appearances: u32,
    pub at_bats: u32,
    pub hits: u32,
    pub doubles: u32,
    pub triples: u32,
    pub home_runs: u32,
    pub runs: u32,
    pub rbi: u32,
    pub walks: u32,
    pub hit_by_pitch: u32,
    pub strikeouts: u32,
    pub stolen_bases: u32,
    pub caught_stealing: u32,
    pub double_plays: u32,
    pub errors: u32,
    pub uzr: f32,
    pub ubr: f32,

    pub games_pitched: u32,
    pub games_started: u32,
    pub outs_recorded: u32,
    pub batters_faced: u32,
    pub pitch_count: u32,
    pub runs_allowed: u32,
    pub earned_runs: u32,
    pub hits_allowed: u32,
    pub home_runs_allowed: u32,
    pub walks_allowed: u32,
    pub hit_batters: u32,
    pub pitching_strikeouts: u32,
    pub wins: u32,
    pub losses: u32,
    pub saves: u32,
    pub complete_games: u32,
    pub shutouts: u32,
    pub quality_starts: u32,
}

impl SeasonStats {
    pub fn absorb(&mut self, game: &PlayerGameStats) {
        if game.batted() {
            self.games += 1;
            self.plate_appearances += game.plate_appearances;
            self.at_bats += game.at_bats;
            self.hits += game.hits;
            self.doubles += game.doubles;
            self.triples += game.triples;
            self.home_runs += game.home_runs;
            self.runs += game.runs;
            self.rbi += game.rbi;
            self.walks += game.walks;
            self.hit_by_pitch += game.hit_by_pitch;
            self.strikeouts += game.strikeouts;
            self.stolen_bases += game.stolen_bases;
            self.caught_stealing += game.caught_stealing;
            self.double_plays += game.double_plays;
        }
        self.errors += game.errors;
        self.uzr += game.uzr;
        self.ubr += game.ubr;

        if game.pitched() {
            self.games_pitched += 1;
            if game.is_starting_pitcher {
                self.games_started += 1;
            }
            self.outs_recorded += game.outs_recorded;
            self.batters_faced += game.batters_faced;
            self.pitch_count += game.pitch_count;
            self.runs_allowed += game.runs_allowed;
            self.earned_runs += game.earned_runs;
            self.hits_allowed += game.hits_allowed;
            self.home_runs_allowed += game.home_runs_allowed;
            self.walks_allowed += game.walks_allowed;
            self.hit_batters += game.hit_batters;
            self.pitching_strikeouts += game.pitching_strikeouts;
            self.wins += game.wins;
            self.losses += game.losses;
            self.saves += game.saves;
            self.complete_games += game.complete_game as u32;
            self.shutouts += game.shutout as u32;
            self.quality_starts += game.quality_start as u32;
        }
    }

    // ========================================================================
    // Batting rates
    // ========================================================================

    pub fn avg(&self) -> f32 {
        ratio(self.hits as f32, self.at_bats as f32)
    }

    pub fn obp(&self) -> f32 {
        let on_base = self.hits + self.walks + self.hit_by_pitch;
        let chances = self.at_bats + self.walks + self.hit_by_pitch;
        ratio(on_base as f32, chances as f32)
    }

    pub fn slg(&self) -> f32 {
        let singles = self
            .hits
            .saturating_sub(self.doubles + self.triples + self.home_runs);
        let total_bases = singles + self.doubles * 2 + self.triples * 3 + self.home_runs * 4;
        ratio(total_bases as f32, self.at_bats as f32)
    }

    pub fn ops(&self) -> f32 {
        self.obp() + self.slg()
    }

    // ========================================================================
    // Pitching rates
    // ========================================================================

    pub fn innings_pitched(&self) -> f32 {
        self.outs_recorded as f32 / 3.0
    }

    pub fn era(&self) -> f32 {
        ratio(self.earned_runs as f32 * 9.0, self.innings_pitched())
    }

    pub fn whip(&self) -> f32 {
        ratio(
            (self.walks_allowed + self.hits_allowed) as f32,
            self.innings_pitched(),
        )
    }

    pub fn k_per_9(&self) -> f32 {
        ratio(self.pitching_strikeouts as f32 * 9.0, self.innings_pitched())
    }

    pub fn bb_per_9(&self) -> f32 {
        ratio(self.walks_allowed as f32 * 9.0, self.innings_pitched())
    }
}
