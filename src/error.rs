use std::fmt;

/// Failures surfaced by the puzzle engine.
///
/// All variants are recoverable: the session stays in its last valid state
/// when one is returned, and no partially built registry is ever exposed.
/// `PieceNotFound` signals a caller bug (a stale id from a previous session)
/// and should be logged loudly rather than swallowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    /// The requested grid size is not a supported perfect square.
    InvalidDifficulty(usize),
    /// The source image could not be decoded or has zero area.
    ImageLoad(String),
    /// A placement or lookup referenced a piece id missing from the registry.
    PieceNotFound(usize),
}

impl fmt::Display for PuzzleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PuzzleError::InvalidDifficulty(size) => {
                write!(f, "{size} is not a supported grid size (expected a perfect square >= 4)")
            }
            PuzzleError::ImageLoad(reason) => write!(f, "{reason}"),
            PuzzleError::PieceNotFound(id) => {
                write!(f, "piece {id} does not exist in the current puzzle")
            }
        }
    }
}

impl std::error::Error for PuzzleError {}
