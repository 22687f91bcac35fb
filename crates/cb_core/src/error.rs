use thiserror::Error;

/// Errors at the crate boundary. The simulation itself never fails; these
/// come from request parsing and the league store.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("Unsupported schema version: found {found}, expected {expected}")]
    SchemaVersion { found: u32, expected: u32 },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown team: {0}")]
    UnknownTeam(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
