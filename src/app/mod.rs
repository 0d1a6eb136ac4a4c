// src/app/mod.rs: image picker window: pipeline + egui grid

// ---- Standard lib imports ----
use std::sync::mpsc::Receiver;
use std::time::Duration;

// ---- Crates ----
use eframe::egui as eg;
use tracing::{info, warn};

// ---- Local modules ----
pub mod error;
pub mod fetch;
pub mod gfx;
pub mod layout;
pub mod pipeline;
pub mod prefs;
pub mod surface;
pub mod types;
pub mod ui;

pub use pipeline::{initial_window_size, ThumbnailPipeline};
pub use types::{Candidate, ImageCategory, LocalSource, Outcome, PipelineEvent};

use crate::config::AppConfig;
use error::FetchError;
use fetch::HttpTransport;
use layout::GridLayout;
use prefs::PreferenceStore;
use ui::grid::EguiSurface;
use ui::UiAction;

// ---- Tunables ----
const REPAINT_WHILE_LOADING: Duration = Duration::from_millis(50);

pub struct PickerApp {
    pipeline: ThumbnailPipeline<HttpTransport, EguiSurface>,
    events: Receiver<PipelineEvent>,

    // ui state
    local_path_input: String,
    status: String,
    close_sent: bool,
}

impl PickerApp {
    pub fn new(
        cfg: &AppConfig,
        prefs: Box<dyn PreferenceStore>,
        category: ImageCategory,
        candidates: Vec<Candidate>,
    ) -> Result<Self, FetchError> {
        let transport = HttpTransport::new(&cfg.user_agent, cfg.fetch_timeout)?;
        let layout = GridLayout::new(cfg.default_scale, cfg.min_scale, cfg.max_scale);
        let (mut pipeline, events) =
            ThumbnailPipeline::new(transport, EguiSurface::default(), prefs, layout, category);
        info!(
            category = category.as_str(),
            candidates = candidates.len(),
            "picker ready"
        );
        pipeline.set_candidates(candidates);

        Ok(Self {
            pipeline,
            events,
            local_path_input: String::new(),
            status: String::new(),
            close_sent: false,
        })
    }

    fn set_status<S: Into<String>>(&mut self, s: S) {
        self.status = s.into();
    }

    fn apply_actions(&mut self, actions: Vec<UiAction>) {
        for action in actions {
            if *self.pipeline.outcome() != Outcome::Open {
                break;
            }
            match action {
                UiAction::CellClicked(slot) => {
                    self.pipeline.select_cell(slot.row, slot.col);
                }
                UiAction::SetScale(scale) => self.pipeline.update_display_scale(scale),
                UiAction::ZoomIn => self.pipeline.zoom_in(),
                UiAction::ZoomOut => self.pipeline.zoom_out(),
                UiAction::Resized => self.pipeline.on_resize(),
                UiAction::ChooseLocal(path) => {
                    if let Err(e) = self.pipeline.choose_local_file(&path) {
                        warn!("local pick rejected: {e}");
                        self.set_status(e.to_string());
                    }
                }
                UiAction::Dropped(LocalSource::Dropped(url)) => self.pipeline.drop_resource(&url),
                UiAction::Dropped(source) => self.pipeline.insert_local(source),
                UiAction::Close => self.pipeline.reject(),
            }
        }
    }

    fn drain_events(&mut self, ctx: &eg::Context) {
        while let Ok(ev) = self.events.try_recv() {
            match ev {
                PipelineEvent::ThumbnailReady(_) | PipelineEvent::LoadingChanged(_) => {
                    ctx.request_repaint();
                }
                PipelineEvent::QueueDrained => {
                    let n = self.pipeline.tasks().len();
                    let shown = self
                        .pipeline
                        .tasks()
                        .iter()
                        .filter(|t| t.display_image.is_some())
                        .count();
                    self.set_status(format!("{shown}/{n} thumbnails loaded."));
                }
                PipelineEvent::Selected(url) => {
                    // The chosen identifier is the program's output.
                    println!("{url}");
                }
                PipelineEvent::Closed => {
                    if !self.close_sent {
                        self.close_sent = true;
                        ctx.send_viewport_cmd(eg::ViewportCommand::Close);
                    }
                }
            }
        }
    }
}

impl eframe::App for PickerApp {
    fn update(&mut self, ctx: &eg::Context, _frame: &mut eframe::Frame) {
        self.pipeline.poll_fetches();

        let size = ctx.screen_rect().size();
        self.pipeline
            .set_window_size((size.x.round() as u32, size.y.round() as u32));

        let mut actions = Vec::new();
        if ctx.input(|i| i.viewport().close_requested()) {
            actions.push(UiAction::Close);
        }
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        actions.extend(
            dropped
                .into_iter()
                .filter_map(ui::dropped_source)
                .map(UiAction::Dropped),
        );

        eg::TopBottomPanel::top("topbar").show(ctx, |ui| {
            self.ui_render_topbar(ui, &mut actions);
        });
        eg::CentralPanel::default().show(ctx, |ui| {
            self.pipeline.surface_mut().show(ui, &mut actions);
        });

        self.apply_actions(actions);
        self.drain_events(ctx);

        if self.pipeline.is_loading() {
            ctx.request_repaint_after(REPAINT_WHILE_LOADING);
        }
    }
}
