use crate::data::Cell;
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Indicates that an error occurred while building the dictionary or applying a move.
#[derive(Debug, Error)]
pub enum BaldaError {
    /// The word source or the persisted index could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The persisted index could not be encoded.
    #[error("failed to encode the dictionary index: {0}")]
    Encode(#[from] ron::Error),
    /// The persisted index could not be decoded.
    #[error("failed to decode the dictionary index: {0}")]
    Decode(#[from] ron::error::SpannedError),
    /// The persisted index was written by an incompatible version, or holds another index kind.
    #[error("persisted index is {found}, expected {expected}")]
    IndexMismatch { found: String, expected: String },
    /// The board must have at least one row and one column.
    #[error("a board needs at least one row and one column")]
    EmptyBoard,
    /// Every row of the board must have the same width.
    #[error("row {0} has a different width from the first row")]
    RaggedBoard(usize),
    /// The given word does not fit the board.
    #[error("word of length {length} does not fit a board of width {width}")]
    WordLength { length: usize, width: usize },
    /// The cell lies outside the board.
    #[error("cell {0} is outside the board")]
    OutOfBounds(Cell),
    /// The cell already holds a letter.
    #[error("cell {0} is already filled")]
    CellOccupied(Cell),
    /// The cell is not next to any filled cell.
    #[error("cell {0} is not adjacent to a filled cell")]
    NotAdjacent(Cell),
    /// The move's path does not spell its word.
    #[error("the path of the move does not spell {0}")]
    PathMismatch(Arc<str>),
    /// The word was already played this game.
    #[error("word {0} has already been used")]
    WordUsed(Arc<str>),
}

/// A single move: place `letter` at `cell`, then read `word` along `path`.
///
/// The path always contains `cell` exactly once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub cell: Cell,
    pub letter: char,
    pub word: Arc<str>,
    pub path: Vec<Cell>,
}

impl Move {
    /// The score of the move, i.e. the number of letters in its word.
    pub fn score(&self) -> usize {
        self.path.len()
    }
}

/// A move together with the index of the player who made it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayedMove {
    pub player: usize,
    pub played: Move,
}

/// Why a game finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEnd {
    /// Every player passed in a row.
    AllPassed,
    /// Fewer empty cells remained than there are players.
    BoardFull,
}

/// The outcome of a finished game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameResult {
    /// Score per player, in player order.
    pub scores: Vec<usize>,
    pub moves: Vec<PlayedMove>,
    pub end: GameEnd,
}
