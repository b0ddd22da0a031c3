use egui::Color32;
use image::Rgba;

/// The fixed paint palette.  Order matters: digit shortcuts `1`–`6` map to
/// the first six entries.
pub const PALETTE: [Rgba<u8>; 9] = [
    Rgba([0, 0, 0, 255]),       // black
    Rgba([255, 255, 255, 255]), // white
    Rgba([255, 0, 0, 255]),     // red
    Rgba([0, 255, 0, 255]),     // green
    Rgba([0, 0, 255, 255]),     // blue
    Rgba([255, 200, 0, 255]),   // yellow/orange
    Rgba([180, 0, 180, 255]),   // purple
    Rgba([255, 150, 200, 255]), // pink
    Rgba([100, 100, 100, 255]), // gray
];

/// Palette index selected at startup (red).
pub const DEFAULT_SLOT: usize = 2;

/// Number of palette slots reachable via digit shortcuts.
pub const QUICK_SLOTS: usize = 6;

/// Paint color selection state: the fixed color list plus the active slot.
pub struct Palette {
    selected: usize,
}

impl Palette {
    pub fn new() -> Self {
        Self {
            selected: DEFAULT_SLOT,
        }
    }

    pub fn colors(&self) -> &'static [Rgba<u8>] {
        &PALETTE
    }

    /// The active paint color.
    pub fn selected(&self) -> Rgba<u8> {
        PALETTE[self.selected]
    }

    /// 1-based slot number of the active color, for the status line.
    pub fn selected_slot(&self) -> usize {
        self.selected + 1
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected == index
    }

    /// Select a slot by index.  Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) {
        if index < PALETTE.len() {
            self.selected = index;
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

/// RGBA cell color to an egui draw color (palette swatches are always opaque).
pub fn swatch_color(color: Rgba<u8>) -> Color32 {
    Color32::from_rgb(color[0], color[1], color[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_red() {
        let palette = Palette::new();
        assert_eq!(palette.selected(), PALETTE[DEFAULT_SLOT]);
        assert_eq!(palette.selected_slot(), 3);
    }

    #[test]
    fn select_ignores_out_of_range() {
        let mut palette = Palette::new();
        palette.select(PALETTE.len());
        assert_eq!(palette.selected(), PALETTE[DEFAULT_SLOT]);
        palette.select(0);
        assert_eq!(palette.selected(), PALETTE[0]);
    }

    #[test]
    fn all_palette_colors_are_opaque_and_distinct() {
        for (i, a) in PALETTE.iter().enumerate() {
            assert_eq!(a[3], 255);
            for b in &PALETTE[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
