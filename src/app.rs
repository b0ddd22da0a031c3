use std::path::Path;

use eframe::egui;
use egui::{Color32, Pos2, Rect, Sense, TextureHandle, TextureOptions, Vec2, pos2};

use crate::canvas::{ERASE_CELL, PixelCanvas};
use crate::history::{UNDO_LIMIT, UndoStack};
use crate::io;
use crate::palette::{Palette, QUICK_SLOTS, swatch_color};

// ---- Layout constants ------------------------------------------------------

/// Canvas size in cells.
pub const PIXELS_X: u32 = 32;
pub const PIXELS_Y: u32 = 32;
/// On-screen size of one cell, in points.
pub const PIXEL_SIZE: f32 = 20.0;
/// Integer upscale factor for PNG export (matches the on-screen cell size).
pub const EXPORT_SCALE: u32 = 20;

const MARGIN: f32 = 10.0;
const PALETTE_PANEL_WIDTH: f32 = 160.0;
const STATUS_PANEL_HEIGHT: f32 = 84.0;
const SWATCH_SIZE: f32 = 32.0;

const BG_COLOR: Color32 = Color32::from_rgb(220, 220, 220);
const GRID_COLOR: Color32 = Color32::from_rgb(180, 180, 180);
const HIGHLIGHT_COLOR: Color32 = Color32::from_rgb(255, 0, 0);

/// Inner window size that fits the canvas, palette panel and status bar.
pub fn window_size() -> Vec2 {
    Vec2::new(
        PIXELS_X as f32 * PIXEL_SIZE + MARGIN * 2.0 + PALETTE_PANEL_WIDTH,
        PIXELS_Y as f32 * PIXEL_SIZE + MARGIN * 2.0 + STATUS_PANEL_HEIGHT,
    )
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Kind of pointer gesture currently in progress on the canvas.
#[derive(Clone, Copy, PartialEq)]
enum StrokeKind {
    Paint,
    Erase,
}

/// The whole application state, owned by the event loop.  One undo snapshot
/// is pushed per gesture: at stroke button-down, per flood fill, per clear.
pub struct PixelFEApp {
    canvas: PixelCanvas,
    undo: UndoStack,
    palette: Palette,

    /// When set, the next primary click flood-fills instead of painting.
    bucket_mode: bool,
    /// Gesture in progress (pointer button held after starting on the canvas).
    stroke: Option<StrokeKind>,
    /// Last cell written during the current gesture, to skip duplicate writes
    /// while the pointer stays inside one cell.
    last_cell: Option<(i32, i32)>,

    status: String,
    texture: Option<TextureHandle>,
}

impl PixelFEApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());

        let canvas = PixelCanvas::new(PIXELS_X, PIXELS_Y);
        let mut undo = UndoStack::new(UNDO_LIMIT);
        // Baseline snapshot so the very first gesture can be undone back to
        // the empty canvas.
        undo.push(&canvas, "initial state");

        crate::log_info!("canvas {}×{} ready", PIXELS_X, PIXELS_Y);

        Self {
            canvas,
            undo,
            palette: Palette::new(),
            bucket_mode: false,
            stroke: None,
            last_cell: None,
            status: String::new(),
            texture: None,
        }
    }

    // ---- keyboard shortcuts ------------------------------------------------

    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::S)) {
            self.save();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::C)) {
            self.undo.push(&self.canvas, "clear");
            self.canvas.clear();
            self.status = "Canvas cleared".to_owned();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Z)) {
            match self.undo.undo(&mut self.canvas) {
                Some(desc) => {
                    self.status = format!("Undid {}", desc);
                    crate::log_info!("undo: {}", desc);
                }
                None => self.status = "Nothing to undo".to_owned(),
            }
        }
        if ctx.input(|i| i.key_pressed(egui::Key::F)) {
            self.bucket_mode = !self.bucket_mode;
            self.status = format!(
                "Bucket mode: {}",
                if self.bucket_mode { "on" } else { "off" }
            );
        }

        const QUICK_KEYS: [egui::Key; QUICK_SLOTS] = [
            egui::Key::Num1,
            egui::Key::Num2,
            egui::Key::Num3,
            egui::Key::Num4,
            egui::Key::Num5,
            egui::Key::Num6,
        ];
        for (index, key) in QUICK_KEYS.iter().enumerate() {
            if ctx.input(|i| i.key_pressed(*key)) {
                self.palette.select(index);
            }
        }
    }

    fn save(&mut self) {
        match io::export_png(&self.canvas, EXPORT_SCALE, Path::new(".")) {
            Ok(path) => {
                self.status = format!("Saved {}", path.display());
                crate::log_info!("exported {}", path.display());
            }
            Err(e) => {
                // Export failure is user-visible but never fatal.
                self.status = format!("Save failed: {}", e);
                crate::log_err!("export failed: {}", e);
            }
        }
    }

    // ---- canvas ------------------------------------------------------------

    /// Screen position to grid cell, by integer division against the fixed
    /// cell size.  May be out of bounds; the canvas tolerates that.
    fn cell_at(origin: Pos2, pos: Pos2) -> (i32, i32) {
        (
            ((pos.x - origin.x) / PIXEL_SIZE).floor() as i32,
            ((pos.y - origin.y) / PIXEL_SIZE).floor() as i32,
        )
    }

    fn handle_pointer(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let primary_pressed = ctx.input(|i| i.pointer.primary_pressed());
        let secondary_pressed = ctx.input(|i| i.pointer.secondary_pressed());
        let primary_down = ctx.input(|i| i.pointer.primary_down());
        let secondary_down = ctx.input(|i| i.pointer.secondary_down());

        if let Some(pos) = response.hover_pos() {
            let (col, row) = Self::cell_at(response.rect.min, pos);

            if primary_pressed {
                if self.bucket_mode {
                    self.undo.push(&self.canvas, "fill");
                    self.canvas.flood_fill(col, row, self.palette.selected());
                } else {
                    self.undo.push(&self.canvas, "stroke");
                    self.stroke = Some(StrokeKind::Paint);
                    self.last_cell = Some((col, row));
                    self.canvas.set_pixel(col, row, self.palette.selected());
                }
            } else if secondary_pressed {
                self.undo.push(&self.canvas, "erase");
                self.stroke = Some(StrokeKind::Erase);
                self.last_cell = Some((col, row));
                self.canvas.set_pixel(col, row, ERASE_CELL);
            } else if let Some(kind) = self.stroke {
                // Continue the gesture; only write when the pointer entered a
                // new cell.
                let (still_down, color) = match kind {
                    StrokeKind::Paint => (primary_down, self.palette.selected()),
                    StrokeKind::Erase => (secondary_down, ERASE_CELL),
                };
                if still_down && self.last_cell != Some((col, row)) {
                    self.canvas.set_pixel(col, row, color);
                    self.last_cell = Some((col, row));
                }
            }
        }

        // Gesture ends when its button is released, wherever the pointer is.
        let ended = match self.stroke {
            Some(StrokeKind::Paint) => !primary_down,
            Some(StrokeKind::Erase) => !secondary_down,
            None => false,
        };
        if ended {
            self.stroke = None;
            self.last_cell = None;
        }
    }

    fn show_canvas(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let size = Vec2::new(
            PIXELS_X as f32 * PIXEL_SIZE,
            PIXELS_Y as f32 * PIXEL_SIZE,
        );
        let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());

        self.handle_pointer(ctx, &response);

        // Re-upload the texture only when a mutation dirtied the grid.
        if self.canvas.take_dirty() || self.texture.is_none() {
            let img = self.canvas.to_color_image();
            if let Some(texture) = &mut self.texture {
                texture.set(img, TextureOptions::NEAREST);
            } else {
                self.texture = Some(ctx.load_texture("canvas", img, TextureOptions::NEAREST));
            }
        }

        if let Some(texture) = &self.texture {
            painter.image(
                texture.id(),
                response.rect,
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        // Grid lines on top of the cells.
        let origin = response.rect.min;
        let stroke = egui::Stroke::new(1.0, GRID_COLOR);
        for i in 0..=PIXELS_X {
            let x = origin.x + i as f32 * PIXEL_SIZE;
            painter.line_segment([pos2(x, origin.y), pos2(x, response.rect.max.y)], stroke);
        }
        for j in 0..=PIXELS_Y {
            let y = origin.y + j as f32 * PIXEL_SIZE;
            painter.line_segment([pos2(origin.x, y), pos2(response.rect.max.x, y)], stroke);
        }

        // Highlight the hovered cell.
        if let Some(pos) = response.hover_pos() {
            let (col, row) = Self::cell_at(origin, pos);
            if self.canvas.get_pixel(col, row).is_some() {
                let cell_rect = Rect::from_min_size(
                    pos2(
                        origin.x + col as f32 * PIXEL_SIZE,
                        origin.y + row as f32 * PIXEL_SIZE,
                    ),
                    Vec2::splat(PIXEL_SIZE),
                );
                painter.rect_stroke(cell_rect, 0.0, egui::Stroke::new(2.0, HIGHLIGHT_COLOR));
            }
        }
    }

    // ---- palette panel -----------------------------------------------------

    fn show_palette(&mut self, ui: &mut egui::Ui) {
        ui.heading("Palette");
        ui.add_space(4.0);

        let mut picked = None;
        egui::Grid::new("palette_slots").spacing([8.0, 8.0]).show(ui, |ui| {
            for (index, color) in self.palette.colors().iter().enumerate() {
                let (rect, response) =
                    ui.allocate_exact_size(Vec2::splat(SWATCH_SIZE), Sense::click());
                let painter = ui.painter();
                painter.rect_filled(rect, 2.0, swatch_color(*color));
                let border = if self.palette.is_selected(index) {
                    egui::Stroke::new(3.0, HIGHLIGHT_COLOR)
                } else {
                    egui::Stroke::new(1.0, Color32::from_gray(100))
                };
                painter.rect_stroke(rect, 2.0, border);
                if response.clicked() {
                    picked = Some(index);
                }
                // Two swatches per row, like the reference layout.
                if index % 2 == 1 {
                    ui.end_row();
                }
            }
        });

        if let Some(index) = picked {
            self.palette.select(index);
            // Picking from the panel always returns to the pencil.
            self.bucket_mode = false;
        }
    }

    // ---- status bar --------------------------------------------------------

    fn show_status(&self, ui: &mut egui::Ui) {
        ui.label(format!(
            "Tool: {}    Selected: #{}",
            if self.bucket_mode { "Bucket" } else { "Pencil" },
            self.palette.selected_slot(),
        ));
        ui.label("LMB: draw    RMB: erase    F: bucket    S: save");
        ui.label("C: clear    Z: undo    1-6: quick palette    Esc: quit");
        if !self.status.is_empty() {
            ui.label(&self.status);
        }
    }
}

impl eframe::App for PixelFEApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        egui::SidePanel::right("palette_panel")
            .exact_width(PALETTE_PANEL_WIDTH)
            .resizable(false)
            .show(ctx, |ui| self.show_palette(ui));

        egui::TopBottomPanel::bottom("status_panel")
            .exact_height(STATUS_PANEL_HEIGHT)
            .show(ctx, |ui| self.show_status(ui));

        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(BG_COLOR)
                    .inner_margin(MARGIN),
            )
            .show(ctx, |ui| self.show_canvas(ctx, ui));
    }
}
