use eframe::egui::ColorImage;

/// A (row, col) cell on the board grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// One jigsaw cell: a fixed home cell, an owned bitmap, and the mutable
/// placement state the board tracks for it.
///
/// The placement fields are only mutated through [`crate::board::PieceRegistry`]
/// so the one-piece-per-cell invariant can't be broken from outside.
pub struct Piece {
    id: usize,
    bitmap: ColorImage,
    correct: GridPos,
    current: Option<GridPos>,
    is_correct: bool,
}

impl Piece {
    /// Builds an unplaced piece. The id is derived from the home cell so it
    /// stays stable for the whole session: `row * grid_side + col`.
    pub fn new(bitmap: ColorImage, correct: GridPos, grid_side: usize) -> Self {
        Self {
            id: correct.row * grid_side + correct.col,
            bitmap,
            correct,
            current: None,
            is_correct: false,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// The rendered sub-image for this piece. Immutable after creation.
    pub fn bitmap(&self) -> &ColorImage {
        &self.bitmap
    }

    pub fn correct_pos(&self) -> GridPos {
        self.correct
    }

    /// `None` means the piece sits in the unplaced pool.
    pub fn current_pos(&self) -> Option<GridPos> {
        self.current
    }

    /// True once the piece occupies any board cell, correct or not.
    pub fn is_placed(&self) -> bool {
        self.current.is_some()
    }

    /// True iff the piece occupies its home cell.
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    pub(crate) fn place_at(&mut self, pos: GridPos) {
        self.current = Some(pos);
        self.is_correct = pos == self.correct;
    }

    pub(crate) fn return_to_pool(&mut self) {
        self.current = None;
        self.is_correct = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitmap() -> ColorImage {
        ColorImage::new([1, 1], eframe::egui::Color32::WHITE)
    }

    #[test]
    fn id_follows_row_major_order() {
        let piece = Piece::new(bitmap(), GridPos::new(2, 1), 3);
        assert_eq!(piece.id(), 7);
    }

    #[test]
    fn correctness_tracks_home_cell() {
        let mut piece = Piece::new(bitmap(), GridPos::new(0, 1), 2);
        assert!(!piece.is_placed());

        piece.place_at(GridPos::new(1, 1));
        assert!(piece.is_placed());
        assert!(!piece.is_correct());

        piece.place_at(GridPos::new(0, 1));
        assert!(piece.is_correct());

        piece.return_to_pool();
        assert!(!piece.is_placed());
        assert!(!piece.is_correct());
    }
}
