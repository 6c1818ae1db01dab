//! Game session: lifecycle, timer, scoring and drag bookkeeping.
//!
//! The session wraps a [`PieceRegistry`] with the NotStarted -> Playing ->
//! Completed lifecycle. All engine mutations flow through it so the shell
//! never has to reason about which operations are legal in which phase.

use crate::board::{PieceRegistry, Placement};
use crate::constants::{COMPLETION_BONUS, TIME_BUDGET_SECS};
use crate::error::PuzzleError;
use crate::piece::GridPos;
use crate::slicer;
use eframe::egui::{Pos2, Vec2};
use image::DynamicImage;
use rand::Rng;

/// Where the session is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    NotStarted,
    Playing,
    Completed,
}

/// Parameters for starting a new round.
#[derive(Clone, Copy, Debug)]
pub struct PuzzleConfig {
    /// Total piece count; must be a perfect square with side >= 2.
    pub grid_size: usize,
    /// Randomize the pool before the first render. Disabled for custom
    /// pictures so the child first sees the pieces in reading order.
    pub shuffle_on_init: bool,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            grid_size: crate::constants::DEFAULT_GRID_SIZE,
            shuffle_on_init: true,
        }
    }
}

/// Transient record of an in-flight drag.
///
/// Holds the piece id rather than a reference so the registry stays freely
/// borrowable while a drag is active; a stale id simply fails placement.
#[derive(Clone, Copy, Debug)]
pub struct DragState {
    pub piece_id: usize,
    /// Offset from the piece's top-left corner to the grab point, so the
    /// piece doesn't jump under the cursor.
    pub grab_offset: Vec2,
    /// Last known pointer position, in screen space.
    pub live_position: Pos2,
}

/// What the shell needs to know after a placement: feedback color, and
/// whether this move finished the puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementFeedback {
    pub placement: Placement,
    pub completed: bool,
    /// Set on the move that completes the puzzle.
    pub final_score: Option<u32>,
}

/// One puzzle round from start to completion.
pub struct GameSession {
    status: GameStatus,
    registry: Option<PieceRegistry>,
    grid_size: usize,
    elapsed_secs: u32,
    score: Option<u32>,
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            status: GameStatus::NotStarted,
            registry: None,
            grid_size: crate::constants::DEFAULT_GRID_SIZE,
            elapsed_secs: 0,
            score: None,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn registry(&self) -> Option<&PieceRegistry> {
        self.registry.as_ref()
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    /// Final score, set once the puzzle completes.
    pub fn score(&self) -> Option<u32> {
        self.score
    }

    /// Slices `image` and begins a new round.
    ///
    /// On any error the session keeps its previous state untouched, so a bad
    /// picture or difficulty never destroys a round in progress.
    pub fn start(
        &mut self,
        image: &DynamicImage,
        config: PuzzleConfig,
        rng: &mut impl Rng,
    ) -> Result<(), PuzzleError> {
        let side = slicer::grid_side(config.grid_size)?;
        let pieces = slicer::slice_image(image, config.grid_size)?;

        let mut registry = PieceRegistry::new(pieces, side);
        if config.shuffle_on_init {
            registry.shuffle_pool(rng);
        }

        self.registry = Some(registry);
        self.grid_size = config.grid_size;
        self.elapsed_secs = 0;
        self.score = None;
        self.status = GameStatus::Playing;
        Ok(())
    }

    /// Advances the play clock by one second. Only ticks while Playing, so
    /// the timer freezes on the completion screen.
    pub fn tick(&mut self) {
        if self.status == GameStatus::Playing {
            self.elapsed_secs += 1;
        }
    }

    /// Drops a piece onto a board cell.
    ///
    /// Outside of Playing this is a guarded no-op: dropping on the finished
    /// board (or before a round starts) changes nothing and reports no
    /// feedback.
    pub fn place(
        &mut self,
        piece_id: usize,
        target: GridPos,
    ) -> Result<Option<PlacementFeedback>, PuzzleError> {
        if self.status != GameStatus::Playing {
            return Ok(None);
        }
        let registry = self
            .registry
            .as_mut()
            .ok_or(PuzzleError::PieceNotFound(piece_id))?;

        let placement = registry.place(piece_id, target)?;
        let completed = registry.is_complete();
        let mut final_score = None;
        if completed {
            self.status = GameStatus::Completed;
            let score = COMPLETION_BONUS + TIME_BUDGET_SECS.saturating_sub(self.elapsed_secs);
            self.score = Some(score);
            final_score = Some(score);
        }

        Ok(Some(PlacementFeedback {
            placement,
            completed,
            final_score,
        }))
    }

    /// Re-randomizes the unplaced pool mid-round.
    pub fn shuffle_pool(&mut self, rng: &mut impl Rng) {
        if self.status == GameStatus::Playing {
            if let Some(registry) = self.registry.as_mut() {
                registry.shuffle_pool(rng);
            }
        }
    }

    /// Discards the round and returns to NotStarted.
    pub fn reset(&mut self) {
        self.status = GameStatus::NotStarted;
        self.registry = None;
        self.elapsed_secs = 0;
        self.score = None;
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
