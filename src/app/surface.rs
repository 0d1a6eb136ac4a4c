// src/app/surface.rs
use image::RgbaImage;

use super::types::{Resolution, SlotId};

/// The visual grid a pipeline renders into.
///
/// Implementations only borrow images for the duration of a call; anything
/// they want to keep they copy (the egui surface turns it into a texture).
pub trait RenderSurface {
    /// Width available for columns, in pixels.
    fn available_width(&self) -> i32;

    /// Drop all rows and set up `columns` columns of `column_width` pixels.
    fn reset(&mut self, columns: usize, column_width: u32);

    /// Create the cell at `slot`, optionally with its image already known.
    fn bind_cell(&mut self, slot: SlotId, image: Option<&RgbaImage>, resolution: Option<Resolution>);

    /// Replace the image of an already bound cell.
    fn update_cell(&mut self, slot: SlotId, image: &RgbaImage, resolution: Option<Resolution>);

    /// Resize every row to its tallest cell.
    fn fit_rows(&mut self);

    fn set_empty_state(&mut self, visible: bool);

    fn set_loading(&mut self, loading: bool);

    fn set_zoom_enabled(&mut self, zoom_out: bool, zoom_in: bool);
}
