//! Piece registry and placement rules.
//!
//! [`PieceRegistry`] owns every piece for the running puzzle and is the only
//! code allowed to mutate placement state, which keeps the board invariant
//! simple to audit: at most one piece per cell, every piece either on the
//! board or in the pool, never both.

use crate::error::PuzzleError;
use crate::piece::{GridPos, Piece};
use eframe::egui::{Pos2, Rect};
use rand::seq::SliceRandom;
use rand::Rng;

/// Outcome of a successful placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// The moved piece landed on its home cell.
    pub was_correct: bool,
    /// Id of a piece that was evicted back to the pool, if the target cell
    /// was occupied by someone else.
    pub evicted: Option<usize>,
}

/// All pieces of the running puzzle, split between the board grid and the
/// unplaced pool.
///
/// `pool_order` holds the display order of unplaced pieces; shuffling and
/// evictions only ever touch this list, so board state and pool presentation
/// stay independent.
pub struct PieceRegistry {
    pieces: Vec<Piece>,
    pool_order: Vec<usize>,
    side: usize,
}

impl PieceRegistry {
    /// Takes ownership of freshly sliced pieces. They must arrive in id
    /// order, all unplaced; the pool starts in solved order until shuffled.
    pub fn new(pieces: Vec<Piece>, side: usize) -> Self {
        let pool_order = pieces.iter().map(|p| p.id()).collect();
        Self {
            pieces,
            pool_order,
            side,
        }
    }

    /// Board side length in cells.
    pub fn side(&self) -> usize {
        self.side
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn get(&self, piece_id: usize) -> Option<&Piece> {
        self.pieces.get(piece_id)
    }

    /// Unplaced pieces in their current pool display order.
    pub fn pool(&self) -> impl Iterator<Item = &Piece> {
        self.pool_order.iter().map(|&id| &self.pieces[id])
    }

    /// Pieces currently occupying a board cell, in id order.
    pub fn on_grid(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(|p| p.is_placed())
    }

    /// The piece occupying `pos`, if any.
    pub fn piece_at(&self, pos: GridPos) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.current_pos() == Some(pos))
    }

    /// Randomizes the display order of the unplaced pool. Placed pieces are
    /// untouched.
    pub fn shuffle_pool(&mut self, rng: &mut impl Rng) {
        self.pool_order.shuffle(rng);
    }

    /// Moves `piece_id` onto `target`, whether it comes from the pool or from
    /// another cell.
    ///
    /// If the target is occupied by a different piece, that occupant is
    /// evicted to the back of the pool first. Placing a piece onto the cell
    /// it already occupies is a no-op that reports the current correctness.
    pub fn place(&mut self, piece_id: usize, target: GridPos) -> Result<Placement, PuzzleError> {
        if piece_id >= self.pieces.len() {
            return Err(PuzzleError::PieceNotFound(piece_id));
        }
        debug_assert!(target.row < self.side && target.col < self.side);

        if self.pieces[piece_id].current_pos() == Some(target) {
            return Ok(Placement {
                was_correct: self.pieces[piece_id].is_correct(),
                evicted: None,
            });
        }

        let occupant = self.piece_at(target).map(Piece::id);
        if let Some(occupant_id) = occupant {
            self.pieces[occupant_id].return_to_pool();
            self.pool_order.push(occupant_id);
        }

        // Vacate the moved piece's old spot (pool slot or previous cell)
        // before assigning the new one.
        self.pool_order.retain(|&id| id != piece_id);
        self.pieces[piece_id].place_at(target);

        Ok(Placement {
            was_correct: self.pieces[piece_id].is_correct(),
            evicted: occupant,
        })
    }

    /// Number of pieces sitting on their home cell.
    pub fn correct_count(&self) -> usize {
        self.pieces.iter().filter(|p| p.is_correct()).count()
    }

    /// True once every piece is correctly placed.
    pub fn is_complete(&self) -> bool {
        !self.pieces.is_empty() && self.pieces.iter().all(Piece::is_correct)
    }
}

/// Maps between screen space and grid cells for one on-screen board rect.
#[derive(Clone, Copy, Debug)]
pub struct GridFrame {
    pub rect: Rect,
    pub side: usize,
}

impl GridFrame {
    pub fn new(rect: Rect, side: usize) -> Self {
        Self { rect, side }
    }

    /// The cell under a pointer position, or `None` when the pointer is
    /// outside the board rect. Positions on the outer edge clamp to the last
    /// row/column rather than falling off the grid.
    pub fn cell_at(&self, pos: Pos2) -> Option<GridPos> {
        if !self.rect.contains(pos) {
            return None;
        }
        let cell = self.cell_size();
        let col = (((pos.x - self.rect.min.x) / cell) as usize).min(self.side - 1);
        let row = (((pos.y - self.rect.min.y) / cell) as usize).min(self.side - 1);
        Some(GridPos::new(row, col))
    }

    /// Screen rect of one cell.
    pub fn cell_rect(&self, pos: GridPos) -> Rect {
        let cell = self.cell_size();
        let min = Pos2::new(
            self.rect.min.x + pos.col as f32 * cell,
            self.rect.min.y + pos.row as f32 * cell,
        );
        Rect::from_min_size(min, eframe::egui::Vec2::splat(cell))
    }

    fn cell_size(&self) -> f32 {
        self.rect.width() / self.side as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{Color32, ColorImage, Vec2};

    fn registry(side: usize) -> PieceRegistry {
        let mut pieces = Vec::new();
        for row in 0..side {
            for col in 0..side {
                pieces.push(Piece::new(
                    ColorImage::new([1, 1], Color32::WHITE),
                    GridPos::new(row, col),
                    side,
                ));
            }
        }
        PieceRegistry::new(pieces, side)
    }

    #[test]
    fn every_piece_is_in_exactly_one_place() {
        let mut reg = registry(2);
        reg.place(0, GridPos::new(0, 0)).unwrap();
        reg.place(3, GridPos::new(0, 1)).unwrap();

        assert_eq!(reg.pool().count() + reg.on_grid().count(), reg.len());
        assert_eq!(reg.pool().count(), 2);
        for pos in [GridPos::new(0, 0), GridPos::new(0, 1)] {
            assert!(reg.piece_at(pos).is_some());
        }
    }

    #[test]
    fn placing_on_occupied_cell_evicts_to_pool_back() {
        let mut reg = registry(2);
        reg.place(0, GridPos::new(1, 0)).unwrap();

        let placement = reg.place(2, GridPos::new(1, 0)).unwrap();
        assert_eq!(placement.evicted, Some(0));
        assert!(placement.was_correct);

        assert!(!reg.get(0).unwrap().is_placed());
        assert_eq!(reg.get(2).unwrap().current_pos(), Some(GridPos::new(1, 0)));
        // Evicted piece goes to the back of the pool.
        assert_eq!(reg.pool().last().map(Piece::id), Some(0));
    }

    #[test]
    fn replacing_on_same_cell_is_idempotent() {
        let mut reg = registry(2);
        let first = reg.place(1, GridPos::new(0, 1)).unwrap();
        let second = reg.place(1, GridPos::new(0, 1)).unwrap();

        assert_eq!(first, second);
        assert!(second.was_correct);
        assert_eq!(second.evicted, None);
        assert_eq!(reg.on_grid().count(), 1);
        assert_eq!(reg.pool().count(), 3);
    }

    #[test]
    fn moving_a_piece_vacates_its_old_cell() {
        let mut reg = registry(2);
        reg.place(3, GridPos::new(0, 0)).unwrap();
        reg.place(3, GridPos::new(1, 1)).unwrap();

        assert!(reg.piece_at(GridPos::new(0, 0)).is_none());
        assert_eq!(reg.piece_at(GridPos::new(1, 1)).map(Piece::id), Some(3));
        assert!(reg.get(3).unwrap().is_correct());
    }

    #[test]
    fn unknown_piece_id_is_rejected() {
        let mut reg = registry(2);
        assert_eq!(
            reg.place(99, GridPos::new(0, 0)),
            Err(PuzzleError::PieceNotFound(99))
        );
        assert_eq!(reg.pool().count(), 4);
    }

    #[test]
    fn completion_requires_every_home_cell() {
        let mut reg = registry(2);
        let side = reg.side();
        for id in 0..reg.len() {
            assert!(!reg.is_complete());
            reg.place(id, GridPos::new(id / side, id % side)).unwrap();
        }
        assert!(reg.is_complete());
        assert_eq!(reg.correct_count(), 4);

        // One misplaced piece breaks completion again.
        reg.place(0, GridPos::new(1, 1)).unwrap();
        assert!(!reg.is_complete());
    }

    #[test]
    fn shuffle_keeps_pool_membership() {
        let mut reg = registry(3);
        reg.place(4, GridPos::new(1, 1)).unwrap();

        let mut rng = rand::rng();
        reg.shuffle_pool(&mut rng);

        let mut pool_ids: Vec<usize> = reg.pool().map(Piece::id).collect();
        pool_ids.sort_unstable();
        assert_eq!(pool_ids, vec![0, 1, 2, 3, 5, 6, 7, 8]);
        assert_eq!(reg.get(4).unwrap().current_pos(), Some(GridPos::new(1, 1)));
    }

    #[test]
    fn cell_at_maps_pointer_to_cells() {
        let frame = GridFrame::new(
            Rect::from_min_size(Pos2::new(100.0, 50.0), Vec2::splat(400.0)),
            2,
        );

        assert_eq!(
            frame.cell_at(Pos2::new(150.0, 100.0)),
            Some(GridPos::new(0, 0))
        );
        assert_eq!(
            frame.cell_at(Pos2::new(350.0, 300.0)),
            Some(GridPos::new(1, 1))
        );
        // On the outer edge the pointer clamps to the last row/column.
        assert_eq!(
            frame.cell_at(Pos2::new(500.0, 450.0)),
            Some(GridPos::new(1, 1))
        );
        // Outside the board rect there is no cell.
        assert_eq!(frame.cell_at(Pos2::new(99.0, 100.0)), None);
        assert_eq!(frame.cell_at(Pos2::new(150.0, 501.0)), None);
    }

    #[test]
    fn cell_rects_tile_the_board() {
        let frame = GridFrame::new(
            Rect::from_min_size(Pos2::ZERO, Vec2::splat(400.0)),
            4,
        );
        let rect = frame.cell_rect(GridPos::new(2, 3));
        assert_eq!(rect.min, Pos2::new(300.0, 200.0));
        assert_eq!(rect.width(), 100.0);
    }
}
