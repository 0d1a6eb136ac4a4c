// src/app/pipeline/select.rs
use tracing::{debug, info};

use super::ThumbnailPipeline;
use crate::app::fetch::Transport;
use crate::app::surface::RenderSurface;
use crate::app::types::{ImageCategory, Outcome, PipelineEvent, SlotId};

/// Widest window the picker opens with.
const MAX_INITIAL_WIDTH: u32 = 1200;

/// Window size for a picker opened over a parent of `parent` size.
pub fn initial_window_size(parent: (u32, u32)) -> (u32, u32) {
    let (w, h) = parent;
    (
        MAX_INITIAL_WIDTH.min(w.saturating_sub(100)),
        h.saturating_sub(50),
    )
}

impl<T: Transport, S: RenderSurface> ThumbnailPipeline<T, S> {
    /// Start a fresh selection flow for `category`, using its persisted scale.
    pub fn open(&mut self, category: ImageCategory) {
        debug!(category = category.as_str(), "open picker");
        self.cancel_all();
        self.category = category;
        let scale = self.prefs.scale(category).unwrap_or(self.default_scale);
        self.layout.set_scale(scale);
        self.apply_zoom_bounds();
        self.selected = None;
        self.outcome = Outcome::Open;
        self.render_all();
    }

    /// Pick the task bound at `(row, col)`. Returns false for an empty cell.
    pub fn select_cell(&mut self, row: usize, col: usize) -> bool {
        let slot = SlotId { row, col };
        let Some(task) = self.tasks.iter().find(|t| t.render_slot == Some(slot)) else {
            debug!(row, col, "no image in clicked cell");
            return false;
        };
        let url = task.source_url.clone();
        self.choose(url);
        true
    }

    pub(super) fn choose(&mut self, url: String) {
        self.selected = Some(url.clone());
        self.emit(PipelineEvent::Selected(url));
        self.accept();
    }

    pub fn accept(&mut self) {
        self.finish(true);
    }

    pub fn reject(&mut self) {
        self.finish(false);
    }

    fn finish(&mut self, accepted: bool) {
        self.cancel_all();
        if let Some(size) = self.window_size {
            self.prefs.set_window_size(size);
        }
        self.prefs.set_scale(self.category, self.layout.scale());
        self.save_prefs();

        if !accepted {
            self.selected = None;
        }
        self.outcome = match &self.selected {
            Some(url) => Outcome::Accepted(url.clone()),
            None => Outcome::Rejected,
        };
        info!(outcome = ?self.outcome, "picker closed");
        self.emit(PipelineEvent::Closed);
    }

    /// Identifier chosen in the last flow, `None` if it was dismissed.
    pub fn image_url(&self) -> Option<&str> {
        self.selected.as_deref()
    }
}
