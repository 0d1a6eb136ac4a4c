// src/app/ui/mod.rs
pub mod grid;
pub mod topbar;

use std::path::PathBuf;

use egui as eg;
use tracing::debug;

use crate::app::types::{LocalSource, SlotId};

/// What the user did this frame. Applied to the pipeline after painting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiAction {
    CellClicked(SlotId),
    SetScale(u32),
    ZoomIn,
    ZoomOut,
    Resized,
    ChooseLocal(PathBuf),
    Dropped(LocalSource),
    Close,
}

/// Desktop drops carry a path. Elsewhere only the name is known, which is
/// passed on as the dropped resource.
pub fn dropped_source(file: eg::DroppedFile) -> Option<LocalSource> {
    if let Some(path) = file.path {
        return Some(LocalSource::Path(path));
    }
    if file.name.trim().is_empty() {
        debug!("ignoring drop with neither path nor name");
        return None;
    }
    Some(LocalSource::Dropped(file.name))
}
