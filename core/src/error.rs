use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigError),
    #[error("Coordinates out of bounds")]
    OutOfBounds,
    #[error("Invalid operation: {0}")]
    InvalidOperation(#[from] InvalidOperation),
}

/// Construction parameters that can never produce a board or dungeon.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("too many mines for the playable area")]
    TooManyMines,
    #[error("too many rooms for the dungeon grid")]
    TooManyRooms,
    #[error("border must be at least one tile thick and leave a playable area")]
    InvalidBorder,
    #[error("dungeon needs at least one room")]
    NoRooms,
    #[error("grid has no cells")]
    EmptyGrid,
    #[error("start position lies outside the grid")]
    StartOutOfBounds,
    #[error("mine position lies outside the playable area")]
    MineOutOfBounds,
    #[error("fewer distinct mines than the mine budget")]
    MineBudgetMismatch,
    #[error("board shape does not match declared size")]
    InvalidBoardShape,
}

/// Commands that are well-formed but not allowed in the current state.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum InvalidOperation {
    #[error("tile is already discovered")]
    AlreadyDiscovered,
    #[error("walls and doors cannot be flagged")]
    NotFlaggable,
    #[error("board is already fully revealed")]
    BoardRevealed,
    #[error("room is not the active room")]
    InactiveRoom,
    #[error("no door in that direction")]
    NoDoor,
    #[error("room is not solved yet")]
    RoomUnsolved,
    #[error("expedition already ended, no new moves are accepted")]
    AlreadyEnded,
}

impl GameError {
    /// Whether the caller may simply re-prompt and carry on.
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Configuration(_))
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
