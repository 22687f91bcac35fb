pub mod game_result;
pub mod game_stats;
pub mod league;
pub mod player;
pub mod season_stats;
pub mod team;

pub use game_result::{
    Decision, FatigueDelta, GameDetails, GameOutcome, GameResult, LineScore, Mvp, UNPLAYED_HALF,
};
pub use game_stats::{AtBatDetail, PlayNotation, PlayerGameStats};
pub use league::{Baseline, LeagueAverages};
pub use player::{
    Abilities, Aptitudes, PitchType, PitcherRole, Player, PlayerId, Position, RegistrationStatus,
};
pub use season_stats::SeasonStats;
pub use team::{LineupSlot, Side, StartingLineup, TeamId, TeamSheet};
