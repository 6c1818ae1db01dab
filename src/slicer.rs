//! Turns one source picture into a grid of bordered piece bitmaps.
//!
//! The source is letterboxed (aspect-preserved, centered) into a fixed
//! square render target, rasterized once, and then cropped per grid cell.
//! Each crop gets a small padded two-tone border so pieces read as separate
//! tiles on screen.

use crate::constants::{
    COLOR_LETTERBOX, COLOR_PIECE_BORDER_DARK, COLOR_PIECE_BORDER_LIGHT, PIECE_PADDING,
    RENDER_SQUARE,
};
use crate::error::PuzzleError;
use crate::piece::{GridPos, Piece};
use eframe::egui::ColorImage;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::fs;
use std::path::Path;

/// Validates a difficulty and returns the board side length.
///
/// Supported difficulties are perfect squares with a side of at least 2
/// (4, 9, 16, 25, ...).
pub fn grid_side(grid_size: usize) -> Result<usize, PuzzleError> {
    let side = (grid_size as f64).sqrt().round() as usize;
    if side < 2 || side * side != grid_size {
        return Err(PuzzleError::InvalidDifficulty(grid_size));
    }
    Ok(side)
}

/// Reads and decodes an image file, sniffing the format from the bytes and
/// falling back to the file extension.
pub fn load_image(path: &Path) -> Result<DynamicImage, PuzzleError> {
    let bytes = fs::read(path)
        .map_err(|err| PuzzleError::ImageLoad(format!("Failed to read {}: {err}", path.display())))?;

    let format = image::guess_format(&bytes)
        .or_else(|_| ImageFormat::from_path(path))
        .map_err(|err| {
            PuzzleError::ImageLoad(format!(
                "Failed to determine format for {}: {err}",
                path.display()
            ))
        })?;

    let decoded = image::load_from_memory_with_format(&bytes, format)
        .map_err(|err| PuzzleError::ImageLoad(format!("Failed to decode image: {err}")))?;
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(PuzzleError::ImageLoad(format!(
            "{} has zero-area dimensions",
            path.display()
        )));
    }
    Ok(decoded)
}

/// Slices `image` into `grid_size` bordered piece bitmaps.
///
/// Pieces come back in row-major order, one per `(row, col)` cell, all
/// unplaced. Fails with `InvalidDifficulty` before touching the image and
/// with `ImageLoad` on a zero-area source; no pieces are produced on error.
pub fn slice_image(image: &DynamicImage, grid_size: usize) -> Result<Vec<Piece>, PuzzleError> {
    let side = grid_side(grid_size)?;
    if image.width() == 0 || image.height() == 0 {
        return Err(PuzzleError::ImageLoad(
            "source image has zero-area dimensions".to_string(),
        ));
    }

    let square = letterbox(image);
    let piece_size = RENDER_SQUARE / side as u32;

    let mut pieces = Vec::with_capacity(grid_size);
    for row in 0..side {
        for col in 0..side {
            let crop = image::imageops::crop_imm(
                &square,
                col as u32 * piece_size,
                row as u32 * piece_size,
                piece_size,
                piece_size,
            )
            .to_image();
            let bitmap = bordered_bitmap(&crop);
            pieces.push(Piece::new(bitmap, GridPos::new(row, col), side));
        }
    }
    Ok(pieces)
}

/// Rasterizes the source into the fixed render square, aspect-preserved and
/// centered, with letterbox bars filling the rest.
fn letterbox(image: &DynamicImage) -> RgbaImage {
    let mut square = RgbaImage::from_pixel(RENDER_SQUARE, RENDER_SQUARE, Rgba(COLOR_LETTERBOX));

    let scaled = image.thumbnail(RENDER_SQUARE, RENDER_SQUARE).to_rgba8();
    let offset_x = (RENDER_SQUARE - scaled.width()) / 2;
    let offset_y = (RENDER_SQUARE - scaled.height()) / 2;
    image::imageops::overlay(&mut square, &scaled, offset_x as i64, offset_y as i64);
    square
}

/// Wraps a crop in the padding ring and strokes the two-tone border
/// (outer dark, inner light).
fn bordered_bitmap(crop: &RgbaImage) -> ColorImage {
    let dim = crop.width() + PIECE_PADDING * 2;
    let mut framed = RgbaImage::from_pixel(dim, dim, Rgba(COLOR_PIECE_BORDER_DARK));
    for x in 1..dim - 1 {
        for y in 1..dim - 1 {
            framed.put_pixel(x, y, Rgba(COLOR_PIECE_BORDER_LIGHT));
        }
    }
    image::imageops::overlay(&mut framed, crop, PIECE_PADDING as i64, PIECE_PADDING as i64);

    let size = [framed.width() as usize, framed.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, &framed.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        }))
    }

    #[test]
    fn rejects_non_square_grid_sizes() {
        for bad in [0, 1, 2, 3, 5, 8, 12] {
            assert_eq!(
                slice_image(&sample_image(64, 64), bad).err(),
                Some(PuzzleError::InvalidDifficulty(bad)),
                "grid size {bad} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_zero_area_image() {
        let empty = DynamicImage::new_rgba8(0, 0);
        assert!(matches!(
            slice_image(&empty, 4),
            Err(PuzzleError::ImageLoad(_))
        ));
    }

    #[test]
    fn partition_covers_every_cell_exactly_once() {
        for (grid_size, side) in [(4, 2), (9, 3), (16, 4)] {
            let pieces = slice_image(&sample_image(120, 90), grid_size).unwrap();
            assert_eq!(pieces.len(), grid_size);

            let mut seen = vec![false; grid_size];
            for piece in &pieces {
                let pos = piece.correct_pos();
                assert!(pos.row < side && pos.col < side);
                let slot = pos.row * side + pos.col;
                assert!(!seen[slot], "cell {pos:?} produced twice");
                seen[slot] = true;
                assert_eq!(piece.id(), slot);
            }
            assert!(seen.iter().all(|&s| s));
        }
    }

    #[test]
    fn pieces_start_unplaced() {
        let pieces = slice_image(&sample_image(64, 64), 9).unwrap();
        assert!(pieces.iter().all(|p| !p.is_placed() && !p.is_correct()));
    }

    #[test]
    fn bitmaps_carry_the_padding_ring() {
        let pieces = slice_image(&sample_image(200, 200), 4).unwrap();
        let expected = (RENDER_SQUARE / 2 + PIECE_PADDING * 2) as usize;
        for piece in &pieces {
            assert_eq!(piece.bitmap().size, [expected, expected]);
        }
    }

    #[test]
    fn wide_image_is_centered_in_the_square() {
        // A wide white image on a distinct letterbox fill: the top-left
        // corner of the render square must be letterbox, the center must be
        // picture.
        let white = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            400,
            100,
            Rgba([255, 255, 255, 255]),
        ));
        let square = letterbox(&white);
        assert_eq!(square.get_pixel(0, 0).0, COLOR_LETTERBOX);
        assert_eq!(
            square.get_pixel(RENDER_SQUARE / 2, RENDER_SQUARE / 2).0,
            [255, 255, 255, 255]
        );
    }
}
