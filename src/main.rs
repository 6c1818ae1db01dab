mod board;
mod constants;
mod error;
mod piece;
mod session;
mod slicer;

use board::GridFrame;
use constants::{
    BOARD_SIDE, COLOR_CELL_STROKE, COLOR_FLASH_CORRECT, COLOR_FLASH_WRONG, COLOR_HINT_CORRECT,
    COLOR_HINT_WRONG, DEFAULT_GRID_SIZE, DIFFICULTY_CHOICES, FLASH_SECS, INITIAL_WINDOW_HEIGHT,
    INITIAL_WINDOW_WIDTH, PANEL_PADDING, PIECE_CORNER_RADIUS, POOL_SPACING, RENDER_SQUARE,
};
use eframe::egui::{self, Align2, Color32, FontId, Rect, RichText, Sense, Stroke, Vec2};
use egui::{pos2, vec2};
use image::{DynamicImage, Rgba, RgbaImage};
use piece::GridPos;
use session::{DragState, GameSession, GameStatus, PuzzleConfig};
use std::time::{Duration, Instant};

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([INITIAL_WINDOW_WIDTH, INITIAL_WINDOW_HEIGHT])
            .with_min_inner_size([520.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Picture Puzzle",
        options,
        Box::new(|cc| Ok(Box::new(PuzzleApp::new(cc)))),
    )
}

/// Short-lived highlight over the cell of the latest placement.
#[derive(Clone, Copy)]
struct Flash {
    cell: GridPos,
    color: Color32,
    until: f64,
}

struct PuzzleApp {
    session: GameSession,
    /// One GPU texture per piece id, rebuilt when a round starts.
    textures: Vec<egui::TextureHandle>,
    drag: Option<DragState>,
    flash: Option<Flash>,
    /// Wall-clock anchor for the play timer. `None` whenever not Playing,
    /// so a completed round never accrues time.
    last_tick: Option<Instant>,
    picture: DynamicImage,
    picture_name: Option<String>,
    grid_choice: usize,
    shuffle_on_init: bool,
    hints_enabled: bool,
    debug_overlay: bool,
    status_line: Option<String>,
    rng: rand::rngs::ThreadRng,
}

impl PuzzleApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            session: GameSession::new(),
            textures: Vec::new(),
            drag: None,
            flash: None,
            last_tick: None,
            picture: default_picture(),
            picture_name: None,
            grid_choice: DEFAULT_GRID_SIZE,
            shuffle_on_init: true,
            hints_enabled: false,
            debug_overlay: false,
            status_line: None,
            rng: rand::rng(),
        }
    }

    fn start_round(&mut self, ctx: &egui::Context) {
        let config = PuzzleConfig {
            grid_size: self.grid_choice,
            shuffle_on_init: self.shuffle_on_init,
        };
        match self.session.start(&self.picture, config, &mut self.rng) {
            Ok(()) => {
                self.status_line = None;
                self.drag = None;
                self.flash = None;
                self.last_tick = None;
                self.rebuild_textures(ctx);
            }
            Err(err) => {
                log::error!("Failed to start a round: {err}");
                self.status_line = Some(err.to_string());
            }
        }
    }

    fn rebuild_textures(&mut self, ctx: &egui::Context) {
        self.textures.clear();
        if let Some(registry) = self.session.registry() {
            for piece in registry.pieces() {
                self.textures.push(ctx.load_texture(
                    format!("piece-{}", piece.id()),
                    piece.bitmap().clone(),
                    egui::TextureOptions::LINEAR,
                ));
            }
        }
    }

    fn pick_picture(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp"])
            .pick_file()
        {
            match slicer::load_image(&path) {
                Ok(image) => {
                    self.picture = image;
                    self.picture_name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned());
                    // Custom pictures start in reading order; the child can
                    // shuffle once they have seen the whole image.
                    self.shuffle_on_init = false;
                    self.status_line = None;
                }
                Err(err) => {
                    log::error!("{err}");
                    self.status_line = Some(err.to_string());
                }
            }
        }
    }

    fn reset_round(&mut self) {
        self.session.reset();
        self.textures.clear();
        self.drag = None;
        self.flash = None;
        self.last_tick = None;
        self.status_line = None;
    }

    /// Converts wall-clock progress into whole-second ticks while Playing.
    fn advance_clock(&mut self, ctx: &egui::Context) {
        if self.session.status() != GameStatus::Playing {
            self.last_tick = None;
            return;
        }
        let now = Instant::now();
        let anchor = self.last_tick.get_or_insert(now);
        while now.duration_since(*anchor) >= Duration::from_secs(1) {
            *anchor += Duration::from_secs(1);
            self.session.tick();
        }
        ctx.request_repaint_after(Duration::from_secs(1) - now.duration_since(*anchor));
    }

    fn resolve_drop(&mut self, ctx: &egui::Context, piece_id: usize, cell: Option<GridPos>) {
        let Some(cell) = cell else {
            // Released outside the board: the drag just cancels.
            log::debug!("piece {piece_id} released off-board, drag cancelled");
            return;
        };
        match self.session.place(piece_id, cell) {
            Ok(Some(feedback)) => {
                let color = if feedback.placement.was_correct {
                    COLOR_FLASH_CORRECT
                } else {
                    COLOR_FLASH_WRONG
                };
                self.flash = Some(Flash {
                    cell,
                    color,
                    until: ctx.input(|i| i.time) + FLASH_SECS,
                });
                if let Some(evicted) = feedback.placement.evicted {
                    log::debug!("piece {evicted} evicted back to the pool");
                }
                if let Some(score) = feedback.final_score {
                    log::info!(
                        "puzzle completed in {}s, score {score}",
                        self.session.elapsed_secs()
                    );
                }
            }
            Ok(None) => {}
            Err(err) => {
                log::error!("Placement failed: {err}");
                self.status_line = Some(err.to_string());
            }
        }
    }

    /// Screen rects for every visible piece: placed pieces on their board
    /// cells, pool pieces in a wrapping strip under the board.
    fn layout_tiles(&self, frame: &GridFrame, avail: Rect) -> Vec<(usize, Rect)> {
        let mut tiles = Vec::new();
        let Some(registry) = self.session.registry() else {
            return tiles;
        };

        for piece in registry.on_grid() {
            if let Some(pos) = piece.current_pos() {
                tiles.push((piece.id(), frame.cell_rect(pos).shrink(2.0)));
            }
        }

        let tile = (BOARD_SIDE / registry.side() as f32) * 0.75;
        let right_limit = avail.max.x - PANEL_PADDING;
        let mut cursor = pos2(frame.rect.min.x, frame.rect.max.y + PANEL_PADDING);
        for piece in registry.pool() {
            if cursor.x + tile > right_limit && cursor.x > frame.rect.min.x {
                cursor.x = frame.rect.min.x;
                cursor.y += tile + POOL_SPACING;
            }
            tiles.push((piece.id(), Rect::from_min_size(cursor, Vec2::splat(tile))));
            cursor.x += tile + POOL_SPACING;
        }
        tiles
    }

    fn paint_piece(&self, painter: &egui::Painter, rect: Rect, piece_id: usize) {
        if let Some(texture) = self.textures.get(piece_id) {
            let mut shape = egui::epaint::RectShape::filled(
                rect,
                egui::Rounding::same(PIECE_CORNER_RADIUS),
                Color32::WHITE,
            );
            shape.fill_texture_id = texture.id();
            shape.uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
            painter.add(shape);
        }
    }

    fn toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::default()
                    .fill(Color32::from_rgb(30, 30, 30))
                    .inner_margin(4.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.add_space(8.0);
                    if ui
                        .add(
                            egui::Button::new(RichText::new("🖼").size(24.0))
                                .min_size(Vec2::new(32.0, 32.0))
                                .frame(false),
                        )
                        .on_hover_text("Pick a picture")
                        .clicked()
                    {
                        self.pick_picture();
                    }

                    egui::ComboBox::from_id_salt("difficulty")
                        .selected_text(format!("{} pieces", self.grid_choice))
                        .show_ui(ui, |ui| {
                            for choice in DIFFICULTY_CHOICES {
                                ui.selectable_value(
                                    &mut self.grid_choice,
                                    choice,
                                    format!("{choice} pieces"),
                                );
                            }
                        });

                    if ui
                        .add(
                            egui::Button::new(RichText::new("▶").size(24.0))
                                .min_size(Vec2::new(32.0, 32.0))
                                .frame(false),
                        )
                        .on_hover_text("Start a new round")
                        .clicked()
                    {
                        self.start_round(ctx);
                    }

                    let playing = self.session.status() == GameStatus::Playing;
                    if ui
                        .add_enabled(
                            playing,
                            egui::Button::new(RichText::new("🔀").size(24.0))
                                .min_size(Vec2::new(32.0, 32.0))
                                .frame(false),
                        )
                        .on_hover_text("Shuffle the pool")
                        .clicked()
                    {
                        self.session.shuffle_pool(&mut self.rng);
                    }

                    if ui
                        .add(
                            egui::Button::new(RichText::new("⏹").size(24.0))
                                .min_size(Vec2::new(32.0, 32.0))
                                .frame(false),
                        )
                        .on_hover_text("Reset")
                        .clicked()
                    {
                        self.reset_round();
                    }

                    ui.separator();
                    ui.checkbox(&mut self.hints_enabled, "Hints");
                    ui.checkbox(&mut self.debug_overlay, "Debug");
                    ui.separator();

                    let elapsed = self.session.elapsed_secs();
                    ui.label(
                        RichText::new(format!("⏱ {}:{:02}", elapsed / 60, elapsed % 60))
                            .size(16.0),
                    );
                    if let Some(score) = self.session.score() {
                        ui.label(
                            RichText::new(format!("⭐ {score}"))
                                .size(16.0)
                                .color(Color32::GOLD),
                        );
                    }
                    if let Some(name) = &self.picture_name {
                        ui.label(RichText::new(name).size(12.0).color(Color32::GRAY));
                    }
                    if let Some(msg) = &self.status_line {
                        ui.colored_label(COLOR_FLASH_WRONG, msg);
                    }
                });
            });
    }
}

impl eframe::App for PuzzleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.advance_clock(ctx);
        self.toolbar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            let avail = ui.max_rect();
            let board_rect = Rect::from_min_size(
                avail.min + vec2(PANEL_PADDING, PANEL_PADDING),
                Vec2::splat(BOARD_SIDE),
            );
            let side = self
                .session
                .registry()
                .map(|r| r.side())
                .or_else(|| slicer::grid_side(self.grid_choice).ok())
                .unwrap_or(2);
            let frame = GridFrame::new(board_rect, side);

            // Interactions first, against the pre-drop layout.
            let playing = self.session.status() == GameStatus::Playing;
            let mut pending_drop: Option<(usize, Option<GridPos>)> = None;
            for &(id, rect) in &self.layout_tiles(&frame, avail) {
                let response = ui.interact(rect, ui.id().with(("piece", id)), Sense::click_and_drag());

                if playing
                    && self.drag.is_none()
                    && response.drag_started_by(egui::PointerButton::Primary)
                {
                    if let Some(pointer) = response.interact_pointer_pos() {
                        self.drag = Some(DragState {
                            piece_id: id,
                            grab_offset: pointer - rect.min,
                            live_position: pointer,
                        });
                    }
                }

                if let Some(drag) = &mut self.drag {
                    if drag.piece_id == id {
                        if response.dragged_by(egui::PointerButton::Primary) {
                            if let Some(pointer) = response.interact_pointer_pos() {
                                drag.live_position = pointer;
                            }
                        }
                        if response.drag_stopped() {
                            pending_drop = Some((id, frame.cell_at(drag.live_position)));
                        }
                    }
                }
            }

            if let Some((id, cell)) = pending_drop {
                self.drag = None;
                self.resolve_drop(ctx, id, cell);
            }

            let painter = ui.painter_at(avail);

            for row in 0..side {
                for col in 0..side {
                    let cell = frame.cell_rect(GridPos::new(row, col));
                    painter.rect_stroke(
                        cell.shrink(1.0),
                        egui::Rounding::same(2.0),
                        Stroke::new(1.0, COLOR_CELL_STROKE),
                    );
                }
            }

            if self.session.registry().is_none() {
                painter.text(
                    board_rect.center(),
                    Align2::CENTER_CENTER,
                    "Press ▶ to start",
                    FontId::proportional(22.0),
                    COLOR_CELL_STROKE,
                );
            }

            // Post-drop layout for painting.
            for (id, rect) in self.layout_tiles(&frame, avail) {
                if self.drag.map(|d| d.piece_id) == Some(id) {
                    continue;
                }
                self.paint_piece(&painter, rect, id);

                let piece = self.session.registry().and_then(|r| r.get(id));
                if let Some(piece) = piece {
                    if self.hints_enabled && piece.is_placed() {
                        let tint = if piece.is_correct() {
                            COLOR_HINT_CORRECT
                        } else {
                            COLOR_HINT_WRONG
                        };
                        painter.rect_filled(rect, egui::Rounding::same(PIECE_CORNER_RADIUS), tint);
                    }
                    if self.debug_overlay {
                        let label = match piece.current_pos() {
                            Some(pos) => format!("{id} ({},{})", pos.row, pos.col),
                            None => format!("{id}"),
                        };
                        painter.text(
                            rect.left_top() + vec2(4.0, 4.0),
                            Align2::LEFT_TOP,
                            label,
                            FontId::monospace(12.0),
                            Color32::YELLOW,
                        );
                    }
                }
            }

            if let Some(flash) = self.flash {
                if ctx.input(|i| i.time) < flash.until {
                    painter.rect_filled(
                        frame.cell_rect(flash.cell).shrink(2.0),
                        egui::Rounding::same(PIECE_CORNER_RADIUS),
                        flash.color.gamma_multiply(0.45),
                    );
                    ctx.request_repaint();
                } else {
                    self.flash = None;
                }
            }

            // Dragged piece floats on top, kept under the grab point.
            if let Some(drag) = self.drag {
                let cell = frame.rect.width() / side as f32;
                let rect = Rect::from_min_size(
                    drag.live_position - drag.grab_offset,
                    Vec2::splat(cell),
                );
                self.paint_piece(&painter, rect, drag.piece_id);
            }

            if self.session.status() == GameStatus::Completed {
                painter.rect_filled(
                    board_rect,
                    egui::Rounding::same(8.0),
                    Color32::from_black_alpha(140),
                );
                painter.text(
                    board_rect.center() - vec2(0.0, 18.0),
                    Align2::CENTER_CENTER,
                    "🎉 Puzzle complete!",
                    FontId::proportional(32.0),
                    Color32::WHITE,
                );
                if let Some(score) = self.session.score() {
                    painter.text(
                        board_rect.center() + vec2(0.0, 22.0),
                        Align2::CENTER_CENTER,
                        format!("Score: {score}"),
                        FontId::proportional(24.0),
                        Color32::GOLD,
                    );
                }
            }
        });
    }
}

/// Built-in picture so the game is playable before any file is picked.
fn default_picture() -> DynamicImage {
    let size = RENDER_SQUARE;
    DynamicImage::ImageRgba8(RgbaImage::from_fn(size, size, |x, y| {
        let r = (x * 255 / size) as u8;
        let g = (y * 255 / size) as u8;
        let b = ((x + y) * 255 / (size * 2)) as u8;
        Rgba([r, g, 255 - b, 255])
    }))
}
