//! CellBall CLI
//!
//! 단일 경기 JSON 시뮬레이션 / 리그 N일 자동 진행

use anyhow::{Context, Result};
use cb_core::engine::{
    simulate_days, DefaultLineupProvider, EngineConfig, LeagueStore, SimulationContext,
};
use cb_core::GameOutcome;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cellball")]
#[command(about = "Deterministic baseball game simulation", long_about = None)]
struct Cli {
    /// Debug logging (substitutions, pitching changes, steals)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one game from a JSON request
    Game {
        /// Request JSON file path
        #[arg(long)]
        request: PathBuf,

        /// Pretty-print the result
        #[arg(long, default_value = "false")]
        pretty: bool,
    },

    /// Auto-play a league for a number of days
    Autoplay {
        /// League JSON file path
        #[arg(long)]
        league: PathBuf,

        #[arg(long, default_value_t = 1)]
        days: u32,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Write the updated league here
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// League file: rosters and records plus where the schedule resumes.
#[derive(Debug, Serialize, Deserialize)]
struct LeagueFile {
    start: NaiveDate,
    #[serde(default)]
    season: u16,
    teams: LeagueStore,
    #[serde(default)]
    config: Option<EngineConfig>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Game { request, pretty } => {
            let body = run_game(&request, pretty)?;
            println!("{body}");
        }
        Commands::Autoplay {
            league,
            days,
            seed,
            out,
        } => {
            let mut file = load_league(&league)?;
            let outcomes = autoplay(&mut file, days, seed)?;
            print_standings(&file.teams, &outcomes);
            if let Some(path) = out {
                save_league(&path, &file)?;
                println!("\nLeague saved to: {}", path.display());
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_game(path: &Path, pretty: bool) -> Result<String> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read request {}", path.display()))?;
    if !pretty {
        return cb_core::simulate_game_json(&json).context("simulation request rejected");
    }
    let request: cb_core::GameRequest =
        serde_json::from_str(&json).context("invalid request JSON")?;
    let outcome = cb_core::simulate_game_request(&request).context("simulation request rejected")?;
    Ok(serde_json::to_string_pretty(&outcome)?)
}

fn load_league(path: &Path) -> Result<LeagueFile> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read league {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("invalid league file {}", path.display()))
}

fn save_league(path: &Path, file: &LeagueFile) -> Result<()> {
    let json = serde_json::to_string_pretty(file)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

/// Plays `days` days and moves the league's start date past them.
fn autoplay(file: &mut LeagueFile, days: u32, seed: u64) -> Result<Vec<GameOutcome>> {
    let league = file.teams.league_averages();
    let sim = SimulationContext::new(file.config.clone().unwrap_or_default(), league);

    let outcomes = simulate_days(
        &sim,
        &mut file.teams,
        &DefaultLineupProvider,
        file.start,
        file.season,
        days,
        seed,
    )?;

    file.start = file
        .start
        .checked_add_days(chrono::Days::new(u64::from(days)))
        .context("league date out of range")?;
    info!(games = outcomes.len(), next = %file.start, "autoplay done");
    Ok(outcomes)
}

fn print_standings(store: &LeagueStore, outcomes: &[GameOutcome]) {
    for outcome in outcomes {
        let r = &outcome.result;
        println!(
            "{}  {} {} - {} {}{}",
            r.date,
            r.away_team,
            r.away_score,
            r.home_score,
            r.home_team,
            if r.innings > 9 {
                format!(" ({})", r.innings)
            } else {
                String::new()
            }
        );
    }

    println!("\n{:<12} {:>4} {:>4} {:>4} {:>6}", "TEAM", "W", "L", "T", "PCT");
    for (team, record) in store.standings() {
        println!(
            "{:<12} {:>4} {:>4} {:>4} {:>6.3}",
            team.to_string(),
            record.wins,
            record.losses,
            record.ties,
            record.win_pct()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_run_game_from_file() {
        let request = write(
            r#"{
                "schema_version": 1,
                "seed": 9,
                "date": "2024-04-02",
                "home": { "team": "h" },
                "away": { "team": "a" }
            }"#,
        );
        let compact = run_game(request.path(), false).unwrap();
        let pretty = run_game(request.path(), true).unwrap();

        let a: GameOutcome = serde_json::from_str(&compact).unwrap();
        let b: GameOutcome = serde_json::from_str(&pretty).unwrap();
        assert_eq!(a, b);
        assert!(pretty.contains('\n'));
    }

    #[test]
    fn test_run_game_missing_file() {
        let err = run_game(Path::new("/nonexistent/request.json"), false).unwrap_err();
        assert!(err.to_string().contains("failed to read request"));
    }

    #[test]
    fn test_autoplay_advances_league() {
        let league = write(
            r#"{
                "start": "2024-04-02",
                "season": 2024,
                "teams": {
                    "a": { "players": [] },
                    "b": { "players": [] }
                }
            }"#,
        );
        let mut file = load_league(league.path()).unwrap();
        let outcomes = autoplay(&mut file, 2, 5).unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(file.start, NaiveDate::from_ymd_opt(2024, 4, 4).unwrap());
        let played: u32 = file
            .teams
            .standings()
            .iter()
            .map(|(_, r)| r.wins + r.losses + r.ties)
            .sum();
        assert_eq!(played, 4);

        let out = NamedTempFile::new().unwrap();
        save_league(out.path(), &file).unwrap();
        let reloaded = load_league(out.path()).unwrap();
        assert_eq!(reloaded.start, file.start);
    }
}
