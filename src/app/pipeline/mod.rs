// src/app/pipeline/mod.rs: sequential thumbnail download + grid render
//
// One task is fetched at a time. Completions are fed back on the owner's
// thread (see `poll_fetches`), so nothing here needs locking.

mod queue;
mod render;
mod select;
#[cfg(test)]
mod test_support;

use std::sync::mpsc::{self, Receiver, Sender};

use tracing::warn;

use super::fetch::Transport;
use super::layout::GridLayout;
use super::prefs::PreferenceStore;
use super::surface::RenderSurface;
use super::types::{DownloadTask, ImageCategory, Outcome, PipelineEvent, RequestId};

pub use select::initial_window_size;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct InFlight {
    index: usize,
    id: RequestId,
}

pub struct ThumbnailPipeline<T: Transport, S: RenderSurface> {
    // data
    tasks: Vec<DownloadTask>,

    // collaborators
    transport: T,
    surface: S,
    prefs: Box<dyn PreferenceStore>,

    // grid
    layout: GridLayout,
    default_scale: u32,
    columns: usize,
    category: ImageCategory,

    // fetch plumbing
    in_flight: Option<InFlight>,
    next_request: u64,
    loading: bool,

    // dialog state
    selected: Option<String>,
    outcome: Outcome,
    window_size: Option<(u32, u32)>,

    events_tx: Sender<PipelineEvent>,
}

impl<T: Transport, S: RenderSurface> ThumbnailPipeline<T, S> {
    /// `layout` carries the scale bounds and the fallback scale used when the
    /// category has nothing persisted.
    pub fn new(
        transport: T,
        surface: S,
        prefs: Box<dyn PreferenceStore>,
        layout: GridLayout,
        category: ImageCategory,
    ) -> (Self, Receiver<PipelineEvent>) {
        let (events_tx, events_rx) = mpsc::channel();
        let mut pipeline = Self {
            tasks: Vec::new(),
            transport,
            surface,
            prefs,
            layout,
            default_scale: layout.scale(),
            columns: 0,
            category,
            in_flight: None,
            next_request: 0,
            loading: false,
            selected: None,
            outcome: Outcome::Open,
            window_size: None,
            events_tx,
        };
        pipeline.open(category);
        (pipeline, events_rx)
    }

    pub fn tasks(&self) -> &[DownloadTask] {
        &self.tasks
    }

    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub const fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub const fn category(&self) -> ImageCategory {
        self.category
    }

    pub const fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub const fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn prefs(&self) -> &dyn PreferenceStore {
        self.prefs.as_ref()
    }

    /// Current window size, persisted on accept/reject.
    pub fn set_window_size(&mut self, size: (u32, u32)) {
        self.window_size = Some(size);
    }

    // ---- tiny helpers ----
    fn emit(&self, ev: PipelineEvent) {
        // Nobody listening is fine.
        let _ = self.events_tx.send(ev);
    }

    fn set_loading(&mut self, loading: bool) {
        if self.loading != loading {
            self.loading = loading;
            self.surface.set_loading(loading);
            self.emit(PipelineEvent::LoadingChanged(loading));
        }
    }

    fn save_prefs(&mut self) {
        if let Err(e) = self.prefs.save() {
            warn!("failed to save picker prefs: {e}");
        }
    }
}
