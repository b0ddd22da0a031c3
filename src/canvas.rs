use std::collections::VecDeque;

use egui::{Color32, ColorImage};
use image::{Rgba, RgbaImage};

/// A cell with zero alpha is empty.  The RGB channels of an empty cell are
/// never rendered or exported, so their value is unobservable; the canvas
/// default keeps them white, the eraser leaves them black.
pub const EMPTY_CELL: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Color written by the eraser (secondary button).
pub const ERASE_CELL: Rgba<u8> = Rgba([0, 0, 0, 0]);

// ============================================================================
// PIXEL CANVAS — fixed-size RGBA grid with flood fill
// ============================================================================

/// In-memory grid of RGBA cells, `cols × rows`, dimensions fixed at
/// construction.  Cells are stored row-major in a flat `Vec`.
///
/// Coordinates are signed so that screen-to-grid mapping can hand over
/// whatever it computed: every operation bounds-checks and treats
/// out-of-bounds as a silent no-op (writes) or `None` (reads).
pub struct PixelCanvas {
    cols: u32,
    rows: u32,
    cells: Vec<Rgba<u8>>,
    dirty: bool,
}

impl PixelCanvas {
    /// Create an empty (all cells transparent) canvas.
    pub fn new(cols: u32, rows: u32) -> Self {
        Self {
            cols,
            rows,
            cells: vec![EMPTY_CELL; (cols * rows) as usize],
            dirty: true,
        }
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Flat cell index for (col, row), or `None` if out of bounds.
    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col >= 0 && (col as u32) < self.cols && row >= 0 && (row as u32) < self.rows {
            Some(row as usize * self.cols as usize + col as usize)
        } else {
            None
        }
    }

    /// Write `color` into (col, row).  Out of bounds is a no-op, not an error.
    pub fn set_pixel(&mut self, col: i32, row: i32, color: Rgba<u8>) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = color;
            self.dirty = true;
        }
    }

    /// Read the cell at (col, row), or `None` if out of bounds.
    pub fn get_pixel(&self, col: i32, row: i32) -> Option<Rgba<u8>> {
        self.index(col, row).map(|i| self.cells[i])
    }

    /// Reset every cell to the empty color.
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY_CELL);
        self.dirty = true;
    }

    /// Flood-fill the 4-connected region of same-colored cells containing
    /// (start_col, start_row) with `new_color`.
    ///
    /// No-op when the start is out of bounds, or when the start cell already
    /// equals `new_color` (the fill would otherwise never terminate: every
    /// repainted cell would still match the target).  The target color is
    /// captured once before any write; each dequeued cell is re-checked
    /// against it, so re-enqueued duplicates fail the comparison and no
    /// explicit visited set is needed.
    pub fn flood_fill(&mut self, start_col: i32, start_row: i32, new_color: Rgba<u8>) {
        let target = match self.get_pixel(start_col, start_row) {
            Some(c) => c,
            None => return,
        };
        if target == new_color {
            return;
        }

        let mut queue = VecDeque::new();
        queue.push_back((start_col, start_row));
        while let Some((c, r)) = queue.pop_front() {
            match self.get_pixel(c, r) {
                Some(cell) if cell == target => {}
                _ => continue,
            }
            self.set_pixel(c, r, new_color);
            queue.push_back((c + 1, r));
            queue.push_back((c - 1, r));
            queue.push_back((c, r + 1));
            queue.push_back((c, r - 1));
        }
    }

    // ---- snapshots ----------------------------------------------------------

    /// Current cell contents, row-major.  Cloned by the undo stack to capture
    /// a snapshot.
    pub fn cells(&self) -> &[Rgba<u8>] {
        &self.cells
    }

    /// Replace the live grid wholesale with a previously captured snapshot.
    pub fn restore(&mut self, snapshot: &[Rgba<u8>]) {
        if snapshot.len() != self.cells.len() {
            crate::log_warn!(
                "PixelCanvas::restore: snapshot has {} cells, canvas has {} — ignored",
                snapshot.len(),
                self.cells.len()
            );
            return;
        }
        self.cells.copy_from_slice(snapshot);
        self.dirty = true;
    }

    // ---- rendering / export -------------------------------------------------

    /// Returns the dirty flag and clears it.  Set by every mutation; the
    /// renderer re-uploads its texture only when this returns true.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// One texel per cell, for the on-screen texture (scaled up by the
    /// renderer with nearest filtering).  Empty cells become fully
    /// transparent texels so the window background shows through.
    pub fn to_color_image(&self) -> ColorImage {
        let pixels = self
            .cells
            .iter()
            .map(|c| {
                if c[3] == 0 {
                    Color32::TRANSPARENT
                } else {
                    Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3])
                }
            })
            .collect();
        ColorImage {
            size: [self.cols as usize, self.rows as usize],
            pixels,
        }
    }

    /// Pixel-exact export image: empty cells map to fully-transparent pixels,
    /// painted cells keep their RGBA value.  `scale` replicates each cell into
    /// a `scale × scale` block (nearest neighbor, no interpolation).
    pub fn to_rgba_image(&self, scale: u32) -> RgbaImage {
        let scale = scale.max(1);
        let mut img = RgbaImage::new(self.cols * scale, self.rows * scale);
        for (x, y, px) in img.enumerate_pixels_mut() {
            let cell = self.cells[(y / scale) as usize * self.cols as usize + (x / scale) as usize];
            *px = if cell[3] == 0 { Rgba([0, 0, 0, 0]) } else { cell };
        }
        img
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    #[test]
    fn set_then_get_round_trips() {
        let mut canvas = PixelCanvas::new(8, 8);
        canvas.set_pixel(3, 5, RED);
        assert_eq!(canvas.get_pixel(3, 5), Some(RED));
        assert_eq!(canvas.get_pixel(3, 4), Some(EMPTY_CELL));
    }

    #[test]
    fn out_of_bounds_is_silent() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.set_pixel(-1, 0, RED);
        canvas.set_pixel(0, -1, RED);
        canvas.set_pixel(4, 0, RED);
        canvas.set_pixel(0, 4, RED);
        assert!(canvas.cells().iter().all(|c| *c == EMPTY_CELL));
        assert_eq!(canvas.get_pixel(-1, 0), None);
        assert_eq!(canvas.get_pixel(4, 4), None);
    }

    #[test]
    fn clear_resets_every_cell() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.set_pixel(0, 0, RED);
        canvas.flood_fill(2, 2, BLUE);
        canvas.clear();
        assert!(canvas.cells().iter().all(|c| *c == EMPTY_CELL));
        assert!(canvas.cells().iter().all(|c| c[3] == 0));
    }

    #[test]
    fn fill_on_empty_grid_paints_everything() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.flood_fill(0, 0, RED);
        assert!(canvas.cells().iter().all(|c| *c == RED));
    }

    #[test]
    fn fill_flows_around_a_single_blocker() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.set_pixel(1, 1, BLUE);
        canvas.flood_fill(0, 0, RED);
        // One blocked cell does not split the region under 4-connectivity.
        assert_eq!(canvas.get_pixel(1, 1), Some(BLUE));
        for row in 0..4 {
            for col in 0..4 {
                if (col, row) != (1, 1) {
                    assert_eq!(canvas.get_pixel(col, row), Some(RED));
                }
            }
        }
    }

    #[test]
    fn fill_stops_at_a_full_wall() {
        let mut canvas = PixelCanvas::new(5, 5);
        for row in 0..5 {
            canvas.set_pixel(2, row, BLUE);
        }
        canvas.flood_fill(0, 0, RED);
        for row in 0..5 {
            assert_eq!(canvas.get_pixel(0, row), Some(RED));
            assert_eq!(canvas.get_pixel(1, row), Some(RED));
            assert_eq!(canvas.get_pixel(2, row), Some(BLUE));
            // Right of the wall is a separate component.
            assert_eq!(canvas.get_pixel(3, row), Some(EMPTY_CELL));
            assert_eq!(canvas.get_pixel(4, row), Some(EMPTY_CELL));
        }
    }

    #[test]
    fn fill_is_idempotent() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.flood_fill(1, 1, RED);
        let after_first = canvas.cells().to_vec();
        canvas.flood_fill(1, 1, RED);
        assert_eq!(canvas.cells(), after_first.as_slice());
    }

    #[test]
    fn fill_with_out_of_bounds_start_is_a_no_op() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.flood_fill(-3, 0, RED);
        canvas.flood_fill(0, 99, RED);
        assert!(canvas.cells().iter().all(|c| *c == EMPTY_CELL));
    }

    #[test]
    fn dirty_flag_tracks_mutation() {
        let mut canvas = PixelCanvas::new(4, 4);
        assert!(canvas.take_dirty()); // fresh canvas needs an initial upload
        assert!(!canvas.take_dirty());
        canvas.set_pixel(0, 0, RED);
        assert!(canvas.take_dirty());
        canvas.set_pixel(-1, -1, RED); // out of bounds must not dirty
        assert!(!canvas.take_dirty());
    }

    #[test]
    fn export_is_pixel_exact_at_scale_one() {
        let mut canvas = PixelCanvas::new(3, 2);
        canvas.set_pixel(1, 0, RED);
        canvas.set_pixel(2, 1, BLUE);
        let img = canvas.to_rgba_image(1);
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(*img.get_pixel(1, 0), RED);
        assert_eq!(*img.get_pixel(2, 1), BLUE);
        // Empty cells export as fully transparent, RGB zeroed.
        assert_eq!(*img.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn export_upscales_nearest_neighbor() {
        let mut canvas = PixelCanvas::new(2, 1);
        canvas.set_pixel(0, 0, RED);
        let img = canvas.to_rgba_image(3);
        assert_eq!(img.dimensions(), (6, 3));
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(*img.get_pixel(x, y), RED);
                assert_eq!(*img.get_pixel(x + 3, y), Rgba([0, 0, 0, 0]));
            }
        }
    }
}
