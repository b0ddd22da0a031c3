use std::collections::VecDeque;

use image::Rgba;

use crate::canvas::PixelCanvas;

/// Maximum number of undo snapshots kept in memory.
pub const UNDO_LIMIT: usize = 20;

// ============================================================================
// UNDO STACK — bounded stack of full-grid snapshots
// ============================================================================

/// One undoable state: a full independent copy of the grid, captured just
/// before a mutating gesture (stroke start, fill, clear).
struct Snapshot {
    cells: Vec<Rgba<u8>>,
    /// Human-readable gesture name, for the session log.
    description: &'static str,
}

/// Bounded stack of grid snapshots.  Pushing at capacity evicts the oldest
/// entry first; undoing pops the newest and restores it wholesale.
///
/// A continuous paint/erase drag pushes exactly one snapshot at button-down,
/// so undo reverts the whole stroke, not a single pixel.
pub struct UndoStack {
    snapshots: VecDeque<Snapshot>,
    capacity: usize,
}

impl UndoStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Capture the canvas state before a mutating gesture.  Evicts the oldest
    /// snapshot when the stack is full.
    pub fn push(&mut self, canvas: &PixelCanvas, description: &'static str) {
        if self.snapshots.len() >= self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(Snapshot {
            cells: canvas.cells().to_vec(),
            description,
        });
    }

    /// Pop the most recent snapshot into the canvas.  Returns the gesture
    /// name that was undone, or `None` when the stack is empty (a no-op,
    /// not an error).
    pub fn undo(&mut self, canvas: &mut PixelCanvas) -> Option<&'static str> {
        let snapshot = self.snapshots.pop_back()?;
        canvas.restore(&snapshot.cells);
        Some(snapshot.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);

    #[test]
    fn undo_restores_the_exact_pre_gesture_state() {
        let mut canvas = PixelCanvas::new(4, 4);
        let mut undo = UndoStack::new(UNDO_LIMIT);
        canvas.set_pixel(0, 0, GREEN);
        let before = canvas.cells().to_vec();

        undo.push(&canvas, "stroke");
        canvas.set_pixel(1, 1, RED);
        canvas.flood_fill(3, 3, RED);

        assert_eq!(undo.undo(&mut canvas), Some("stroke"));
        assert_eq!(canvas.cells(), before.as_slice());
    }

    #[test]
    fn undo_on_empty_stack_is_a_no_op() {
        let mut canvas = PixelCanvas::new(4, 4);
        let mut undo = UndoStack::new(UNDO_LIMIT);
        canvas.set_pixel(2, 2, RED);
        let before = canvas.cells().to_vec();
        assert_eq!(undo.undo(&mut canvas), None);
        assert_eq!(canvas.cells(), before.as_slice());
    }

    #[test]
    fn pushing_past_capacity_discards_the_oldest() {
        let mut canvas = PixelCanvas::new(2, 2);
        let mut undo = UndoStack::new(3);

        // State 0 is never snapshot-reachable once four pushes have happened.
        for i in 0..4i32 {
            undo.push(&canvas, "stroke");
            canvas.set_pixel(i % 2, i / 2, RED);
        }
        assert_eq!(undo.len(), 3);

        // Undo everything: we land on the state before push #2 (one pixel
        // painted), not the original empty grid.
        while undo.undo(&mut canvas).is_some() {}
        assert_eq!(canvas.get_pixel(0, 0), Some(RED));
        assert_eq!(canvas.cells().iter().filter(|c| **c == RED).count(), 1);
    }

    #[test]
    fn snapshots_do_not_alias_the_live_grid() {
        let mut canvas = PixelCanvas::new(2, 2);
        let mut undo = UndoStack::new(UNDO_LIMIT);
        undo.push(&canvas, "stroke");
        canvas.set_pixel(0, 0, RED);
        undo.undo(&mut canvas).unwrap();
        assert_ne!(canvas.get_pixel(0, 0), Some(RED));
    }
}
