// src/app/pipeline/render.rs
use tracing::debug;

use super::ThumbnailPipeline;
use crate::app::fetch::Transport;
use crate::app::gfx;
use crate::app::layout;
use crate::app::surface::RenderSurface;

impl<T: Transport, S: RenderSurface> ThumbnailPipeline<T, S> {
    pub fn column_count(&self) -> usize {
        self.layout.column_count(self.surface.available_width())
    }

    /// Rebuild the whole grid from the queue.
    pub fn render_all(&mut self) {
        let cols = self.column_count();
        self.columns = cols;
        let display_width = self.layout.display_width();
        debug!(cols, tasks = self.tasks.len(), "render grid");

        self.surface.reset(cols, self.layout.column_width());
        for (i, task) in self.tasks.iter_mut().enumerate() {
            let Some(slot) = layout::cell_for(i, cols) else {
                task.render_slot = None;
                continue;
            };
            if let Some(raw) = &task.raw_image {
                let stale = task
                    .display_image
                    .as_ref()
                    .is_none_or(|d| d.width() != display_width);
                if stale {
                    task.display_image = Some(gfx::scale_to_width(raw, display_width));
                }
            }
            // resolution only goes with an image
            let resolution = task.display_image.as_ref().and(task.shown_resolution());
            self.surface
                .bind_cell(slot, task.display_image.as_ref(), resolution);
            task.render_slot = Some(slot);
        }
        self.surface.fit_rows();
        self.surface.set_empty_state(self.tasks.is_empty());
    }

    /// The surface changed width; re-render only if the column count moved.
    pub fn on_resize(&mut self) {
        if self.column_count() != self.columns {
            self.render_all();
        }
    }

    pub fn update_display_scale(&mut self, new_scale: u32) {
        let scale = self.layout.set_scale(new_scale);
        debug!(requested = new_scale, scale, "display scale");
        self.apply_zoom_bounds();
        self.prefs.set_scale(self.category, scale);
        self.save_prefs();
        self.render_all();
    }

    pub fn zoom_in(&mut self) {
        self.update_display_scale(self.layout.scale().saturating_add(1));
    }

    pub fn zoom_out(&mut self) {
        self.update_display_scale(self.layout.scale().saturating_sub(1));
    }

    pub(super) fn apply_zoom_bounds(&mut self) {
        self.surface
            .set_zoom_enabled(!self.layout.at_min(), !self.layout.at_max());
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::app::gfx::png_bytes;
    use crate::app::types::{ImageCategory, SlotId};

    #[test]
    fn zero_width_renders_nothing() {
        let (mut p, _rx) = pipeline(0);
        p.enqueue_batch(candidates(3));
        assert_eq!(p.column_count(), 0);
        assert_eq!(p.surface().columns, 0);
        assert_eq!(p.surface().rows(), 0);
        assert!(p.tasks().iter().all(|t| t.render_slot.is_none()));
        // fetching still works without a grid
        complete_current(&mut p, Ok(png_bytes(10, 10)));
        assert!(p.tasks()[0].display_image.is_some());
    }

    #[test]
    fn tasks_fill_rows_left_to_right() {
        // 3 columns of 132px
        let (mut p, _rx) = pipeline(400);
        p.enqueue_batch(candidates(5));
        assert_eq!(p.column_count(), 3);
        let slots: Vec<_> = p.tasks().iter().map(|t| t.render_slot.unwrap()).collect();
        assert_eq!(slots[3], SlotId { row: 1, col: 0 });
        assert_eq!(slots[4], SlotId { row: 1, col: 1 });
        assert_eq!(p.surface().rows(), 2);
        assert!(!p.surface().empty_visible);
    }

    #[test]
    fn empty_queue_shows_empty_state() {
        let (mut p, _rx) = pipeline(400);
        assert!(p.surface().empty_visible);
        p.enqueue_batch(candidates(1));
        assert!(!p.surface().empty_visible);
        p.clear();
        assert!(p.surface().empty_visible);
    }

    #[test]
    fn task_added_after_render_has_no_slot_until_next_pass() {
        let (mut p, _rx) = pipeline(400);
        p.enqueue_batch(candidates(1));
        // bypass the render that enqueue does
        p.tasks.push(crate::app::types::DownloadTask::from_candidate(
            crate::app::types::Candidate::single("x"),
        ));
        assert!(p.tasks()[1].render_slot.is_none());
        p.render_all();
        assert!(p.tasks()[1].render_slot.is_some());
    }

    #[test]
    fn rescale_reuses_fetched_image() {
        let (mut p, _rx) = pipeline(1000);
        assert_eq!(p.layout().scale(), 8);
        p.enqueue_batch(candidates(1));
        complete_current(&mut p, Ok(png_bytes(400, 600)));
        assert_eq!(p.tasks()[0].display_image.as_ref().unwrap().width(), 118);

        p.update_display_scale(4);

        let img = p.tasks()[0].display_image.as_ref().unwrap();
        assert_eq!(img.dimensions(), (54, 81));
        assert_eq!(p.surface().image_at(0, 0), Some((54, 81)));
        assert_eq!(p.surface().column_width, 64);
        assert_eq!(p.transport().started.len(), 1);
        assert_eq!(p.prefs().scale(ImageCategory::Poster), Some(4));
    }

    #[test]
    fn zoom_controls_disable_at_bounds() {
        let (mut p, _rx) = pipeline(1000);
        assert_eq!(p.surface().zoom, (true, true));
        p.update_display_scale(100);
        assert_eq!(p.layout().scale(), 24);
        assert_eq!(p.surface().zoom, (true, false));
        p.zoom_in();
        assert_eq!(p.layout().scale(), 24);
        p.update_display_scale(2);
        assert_eq!(p.surface().zoom, (false, true));
        p.zoom_out();
        assert_eq!(p.layout().scale(), 2);
        p.zoom_in();
        assert_eq!(p.layout().scale(), 3);
        assert_eq!(p.surface().zoom, (true, true));
    }

    #[test]
    fn resize_only_rerenders_when_columns_change() {
        let (mut p, _rx) = pipeline(400);
        p.enqueue_batch(candidates(2));
        let resets = p.surface().resets;

        p.surface_mut().width = 420;
        p.on_resize();
        assert_eq!(p.surface().resets, resets);

        p.surface_mut().width = 540;
        p.on_resize();
        assert_eq!(p.surface().resets, resets + 1);
        assert_eq!(p.surface().columns, 4);
    }
}
