// src/app/layout.rs
use super::types::SlotId;

/// Pixels per scale step.
pub const SCALE_UNIT: u32 = 16;
/// Horizontal space between columns.
pub const GUTTER: u32 = 4;
/// Padding between a cell edge and its image.
pub const CELL_PADDING: u32 = 10;

pub const DEFAULT_SCALE: u32 = 8;
pub const MIN_SCALE: u32 = 2;
pub const MAX_SCALE: u32 = 24;
/// Hard ceiling for any configured scale (1024px columns).
pub const SCALE_LIMIT: u32 = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLayout {
    scale: u32,
    min_scale: u32,
    max_scale: u32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE, MIN_SCALE, MAX_SCALE)
    }
}

impl GridLayout {
    pub fn new(scale: u32, min_scale: u32, max_scale: u32) -> Self {
        let min_scale = min_scale.clamp(1, SCALE_LIMIT);
        let max_scale = max_scale.clamp(min_scale, SCALE_LIMIT);
        Self {
            scale: scale.clamp(min_scale, max_scale),
            min_scale,
            max_scale,
        }
    }

    pub const fn scale(&self) -> u32 {
        self.scale
    }

    pub const fn bounds(&self) -> (u32, u32) {
        (self.min_scale, self.max_scale)
    }

    /// Store a new scale, clamped into bounds. Returns the stored value.
    pub fn set_scale(&mut self, scale: u32) -> u32 {
        self.scale = scale.clamp(self.min_scale, self.max_scale);
        self.scale
    }

    pub const fn at_min(&self) -> bool {
        self.scale <= self.min_scale
    }

    pub const fn at_max(&self) -> bool {
        self.scale >= self.max_scale
    }

    pub const fn column_width(&self) -> u32 {
        self.scale * SCALE_UNIT
    }

    /// Width thumbnails are scaled to.
    pub fn display_width(&self) -> u32 {
        self.column_width().saturating_sub(CELL_PADDING).max(1)
    }

    /// How many columns fit. A surface narrower than one column yields zero.
    pub fn column_count(&self, available_width: i32) -> usize {
        if available_width <= 0 {
            return 0;
        }
        (available_width as u32 / (self.column_width() + GUTTER)) as usize
    }
}

/// Row-major cell for the `index`-th task, or `None` when nothing fits.
pub fn cell_for(index: usize, cols: usize) -> Option<SlotId> {
    (cols > 0).then(|| SlotId {
        row: index / cols,
        col: index % cols,
    })
}
