//! Centralized constants for the puzzle engine and UI sizing.
//!
//! This module consolidates all magic numbers and colors used throughout the
//! application to improve maintainability and provide semantic meaning to values.

use eframe::egui::Color32;

// =============================================================================
// SLICER CONSTANTS
// =============================================================================

/// Side length, in logical pixels, of the square render target the source
/// image is letterboxed into before slicing.
pub const RENDER_SQUARE: u32 = 400;

/// Padding ring, in pixels, added around each piece bitmap so the border
/// stroke doesn't eat into the picture.
pub const PIECE_PADDING: u32 = 2;

/// Outer stroke of the two-tone piece border.
pub const COLOR_PIECE_BORDER_DARK: [u8; 4] = [60, 60, 60, 255];

/// Inner stroke of the two-tone piece border.
pub const COLOR_PIECE_BORDER_LIGHT: [u8; 4] = [230, 230, 230, 255];

/// Fill used for the letterbox bars when the source image is not square.
pub const COLOR_LETTERBOX: [u8; 4] = [245, 243, 238, 255];

// =============================================================================
// SCORING CONSTANTS
// =============================================================================

/// Flat bonus awarded for finishing the puzzle.
pub const COMPLETION_BONUS: u32 = 50;

/// Seconds of time bonus available; finishing after this budget still scores
/// the completion bonus, never a negative total.
pub const TIME_BUDGET_SECS: u32 = 300;

// =============================================================================
// DIFFICULTY CONSTANTS
// =============================================================================

/// Grid sizes offered by the difficulty selector. Any perfect square works
/// at the engine level; these are the ones surfaced in the UI.
pub const DIFFICULTY_CHOICES: [usize; 3] = [4, 9, 16];

/// Default difficulty for a fresh session (2x2).
pub const DEFAULT_GRID_SIZE: usize = 4;

// =============================================================================
// BOARD AND POOL LAYOUT CONSTANTS
// =============================================================================

/// On-screen side length of the board square.
pub const BOARD_SIDE: f32 = 400.0;

/// Spacing between the window edges, the board and the pool strip.
pub const PANEL_PADDING: f32 = 16.0;

/// Gap between pool pieces in the wrap layout.
pub const POOL_SPACING: f32 = 8.0;

/// Corner radius for piece rectangles.
pub const PIECE_CORNER_RADIUS: f32 = 4.0;

// =============================================================================
// FEEDBACK CONSTANTS
// =============================================================================

/// How long a placement flash stays on screen, in seconds.
pub const FLASH_SECS: f64 = 0.6;

/// Flash color for a correct placement.
pub const COLOR_FLASH_CORRECT: Color32 = Color32::from_rgb(80, 190, 90);

/// Flash color for an incorrect placement.
pub const COLOR_FLASH_WRONG: Color32 = Color32::from_rgb(220, 90, 80);

/// Stroke for empty board cells.
pub const COLOR_CELL_STROKE: Color32 = Color32::from_rgb(150, 150, 160);

/// Hint tint over a correctly placed piece.
pub const COLOR_HINT_CORRECT: Color32 = Color32::from_rgba_premultiplied(0, 90, 0, 60);

/// Hint tint over a misplaced piece.
pub const COLOR_HINT_WRONG: Color32 = Color32::from_rgba_premultiplied(90, 0, 0, 60);

// =============================================================================
// WINDOW CONSTANTS
// =============================================================================

/// Initial window width when the application starts.
pub const INITIAL_WINDOW_WIDTH: f32 = 760.0;

/// Initial window height when the application starts.
pub const INITIAL_WINDOW_HEIGHT: f32 = 720.0;
