// src/app/pipeline/test_support.rs
use std::sync::mpsc::Receiver;

use super::ThumbnailPipeline;
use crate::app::error::FetchError;
use crate::app::fetch::fake::FakeTransport;
use crate::app::layout::GridLayout;
use crate::app::prefs::MemoryPrefs;
use crate::app::surface::fake::FakeSurface;
use crate::app::types::{Candidate, FetchCompletion, ImageCategory, PipelineEvent};

pub use crate::app::prefs::PreferenceStore;

pub type TestPipeline = ThumbnailPipeline<FakeTransport, FakeSurface>;

/// Poster picker on a surface `width` pixels wide, default scale 8.
pub fn pipeline(width: i32) -> (TestPipeline, Receiver<PipelineEvent>) {
    ThumbnailPipeline::new(
        FakeTransport::default(),
        FakeSurface::with_width(width),
        Box::new(MemoryPrefs::default()),
        GridLayout::default(),
        ImageCategory::Poster,
    )
}

pub fn candidates(n: usize) -> Vec<Candidate> {
    (0..n)
        .map(|i| Candidate::new(format!("orig-{i}"), format!("thumb-{i}")).with_resolution(1000, 1500))
        .collect()
}

/// Deliver `result` for the request currently in flight.
pub fn complete_current(p: &mut TestPipeline, result: Result<Vec<u8>, FetchError>) {
    let (id, _) = p
        .transport()
        .last()
        .cloned()
        .expect("a fetch was started");
    p.on_fetch_complete(FetchCompletion { id, result });
}

pub fn drain(rx: &Receiver<PipelineEvent>) -> Vec<PipelineEvent> {
    rx.try_iter().collect()
}
