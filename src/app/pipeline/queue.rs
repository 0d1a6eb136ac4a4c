// src/app/pipeline/queue.rs
use std::path::Path;

use tracing::{debug, info, warn};

use super::{InFlight, ThumbnailPipeline};
use crate::app::error::LoadError;
use crate::app::fetch::{file_url_to_path, Transport};
use crate::app::gfx;
use crate::app::surface::RenderSurface;
use crate::app::types::{
    Candidate, DownloadTask, FetchCompletion, LocalSource, PipelineEvent, RequestId,
};

/// Extensions offered for a local pick.
pub const LOCAL_IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

impl<T: Transport, S: RenderSurface> ThumbnailPipeline<T, S> {
    /// Append candidates (existing tasks stay) and start downloading.
    pub fn enqueue_batch(&mut self, candidates: impl IntoIterator<Item = Candidate>) {
        let before = self.tasks.len();
        self.tasks
            .extend(candidates.into_iter().map(DownloadTask::from_candidate));
        debug!(added = self.tasks.len() - before, total = self.tasks.len(), "enqueue batch");

        self.set_loading(true);
        self.advance();
        self.render_all();
    }

    /// Replace whatever is queued with a new candidate list.
    pub fn set_candidates(&mut self, candidates: impl IntoIterator<Item = Candidate>) {
        self.clear();
        self.enqueue_batch(candidates);
    }

    /// Start the next unfetched task, or go idle when there is none.
    pub(crate) fn advance(&mut self) {
        if self.in_flight.is_some() {
            return;
        }

        let Some(index) = self.tasks.iter().position(|t| !t.fetched) else {
            if self.loading {
                self.set_loading(false);
                self.emit(PipelineEvent::QueueDrained);
            }
            return;
        };

        self.next_request += 1;
        let id = RequestId(self.next_request);
        self.in_flight = Some(InFlight { index, id });
        let url = self.tasks[index].thumbnail_url.clone();
        debug!(index, ?id, "fetching {url}");
        self.transport.fetch(id, &url);
    }

    /// Drain completions the transport has ready. Call once per frame.
    pub fn poll_fetches(&mut self) -> usize {
        let mut drained = 0usize;
        while let Some(done) = self.transport.poll_completion() {
            drained += 1;
            self.on_fetch_complete(done);
        }
        drained
    }

    /// Terminal outcome of the in-flight fetch. Anything else is stale and ignored.
    pub fn on_fetch_complete(&mut self, done: FetchCompletion) {
        let Some(flight) = self.in_flight.filter(|f| f.id == done.id) else {
            debug!(id = ?done.id, "ignoring completion for request no longer in flight");
            return;
        };
        self.in_flight = None;

        let display_width = self.layout.display_width();
        let mut ready = false;
        if let Some(task) = self.tasks.get_mut(flight.index) {
            match done.result {
                Err(e) => {
                    warn!("thumbnail fetch failed for {}: {e}", task.thumbnail_url);
                }
                Ok(bytes) => match gfx::decode(&bytes) {
                    Ok(img) => {
                        let display = gfx::scale_to_width(&img, display_width);
                        task.raw_image = Some(img);
                        if let Some(slot) = task.render_slot {
                            self.surface
                                .update_cell(slot, &display, task.shown_resolution());
                        }
                        task.display_image = Some(display);
                        ready = true;
                    }
                    Err(e) => debug!("undecodable thumbnail {}: {e}", task.thumbnail_url),
                },
            }
            task.fetched = true;
        }

        self.surface.fit_rows();
        if ready {
            self.emit(PipelineEvent::ThumbnailReady(flight.index));
        }
        self.advance();
    }

    /// Abort the outstanding fetch and drop every task.
    pub fn cancel_all(&mut self) {
        let running = self.tasks.iter().any(|t| !t.fetched);
        if running {
            if let Some(flight) = self.in_flight {
                debug!(id = ?flight.id, "aborting in-flight fetch");
                self.transport.abort(flight.id);
            }
        }
        self.in_flight = None;
        self.tasks.clear();
        self.set_loading(false);
    }

    /// `cancel_all` plus an empty grid.
    pub fn clear(&mut self) {
        self.cancel_all();
        self.render_all();
    }

    /// Add an image that does not go over the network, then pick it.
    pub fn insert_local(&mut self, source: LocalSource) {
        if let Some(identifier) = self.add_local(source) {
            self.choose(identifier);
        }
    }

    /// Append a fetched task for `source` and bind it. Returns the identifier
    /// the caller gets back, or `None` when the path cannot be named as text.
    fn add_local(&mut self, source: LocalSource) -> Option<String> {
        let (identifier, path) = match source {
            LocalSource::Path(p) => {
                let Some(id) = p.to_str().map(str::to_string) else {
                    warn!("ignoring local image with non UTF-8 path {}", p.display());
                    return None;
                };
                (id, Some(p))
            }
            LocalSource::Dropped(url) => {
                let path = file_url_to_path(&url);
                (url, path)
            }
        };
        info!("local image chosen: {identifier}");

        let index = self.tasks.len();
        self.tasks
            .push(DownloadTask::from_candidate(Candidate::single(identifier.clone())));
        // Render first so the new task has a cell to draw into.
        self.render_all();

        let display_width = self.layout.display_width();
        let loaded = path.as_deref().map(gfx::load_path);
        let task = &mut self.tasks[index];
        match loaded {
            Some(Ok(img)) => {
                let display = gfx::scale_to_width(&img, display_width);
                task.raw_image = Some(img);
                if let Some(slot) = task.render_slot {
                    self.surface
                        .update_cell(slot, &display, task.shown_resolution());
                }
                task.display_image = Some(display);
                task.fetched = true;
                self.surface.fit_rows();
                self.emit(PipelineEvent::ThumbnailReady(index));
            }
            Some(Err(e)) => {
                debug!("local image not loadable: {e}");
                task.fetched = true;
            }
            None => task.fetched = true,
        }

        Some(identifier)
    }

    /// File-dialog entry point: only the offered image types are accepted.
    pub fn choose_local_file(&mut self, path: &Path) -> Result<(), LoadError> {
        let ext_ok = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .is_some_and(|e| LOCAL_IMAGE_EXTENSIONS.contains(&e.as_str()));
        if !ext_ok {
            return Err(LoadError::UnsupportedExtension(path.to_path_buf()));
        }
        if path.to_str().is_none() {
            return Err(LoadError::NotUtf8(path.to_path_buf()));
        }
        std::fs::metadata(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.insert_local(LocalSource::Path(path.to_path_buf()));
        Ok(())
    }

    /// Something was dropped on the grid.
    pub fn drop_resource(&mut self, url: &str) {
        self.insert_local(LocalSource::Dropped(url.to_string()));
    }
}
